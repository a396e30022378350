//! Core library surface for the movie bookmark manager.
//!
//! `MovieStore` persists movies in SQLite, `export` writes the listing to CSV,
//! and `ui` drives both from a terminal front end. The binary only wires these
//! together.
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod ui;

pub use config::{Cli, Config};
pub use db::MovieStore;
pub use error::{Error, Result};
pub use export::{export, write_records};
pub use models::{Movie, MovieInput, Selection};
pub use ui::{run_app, App};
