//! Persistence layer: the `MovieStore` owning the SQLite connection, split
//! into connection setup and the movie queries.

mod connection;
mod movies;

pub use connection::{default_db_path, MovieStore};
