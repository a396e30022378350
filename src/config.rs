//! Command line and environment configuration.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::db::default_db_path;

/// Log file name written beside the database when no override is given.
const LOG_FILE_NAME: &str = "movies.log";

#[derive(Parser, Debug)]
#[command(
    name = "movie-bookmarks",
    version,
    about = "Keep a personal list of movies with genre, rating and favorites"
)]
pub struct Cli {
    /// SQLite database file (default: ~/.movie-bookmarks/movies.sqlite)
    #[arg(long, env = "MOVIE_DB")]
    pub db: Option<PathBuf>,

    /// Where to write the log; the terminal is taken by the UI
    #[arg(long, env = "MOVIE_LOG")]
    pub log_file: Option<PathBuf>,

    /// Export the current listing to this CSV file and exit without the UI
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

/// Paths resolved from the command line plus defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
    pub export_path: Option<PathBuf>,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let db_path = match cli.db {
            Some(path) => path,
            None => default_db_path()?,
        };
        let log_path = cli
            .log_file
            .unwrap_or_else(|| db_path.with_file_name(LOG_FILE_NAME));

        Ok(Self {
            db_path,
            log_path,
            export_path: cli.export,
        })
    }
}
