//! Ratatui front end: a movie table with add/edit/delete popups, an export
//! prompt and a help panel. All persistence goes through `MovieStore`.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
