use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;
use rusqlite::Connection;
use tracing::info;

use crate::error::Error;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".movie-bookmarks";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "movies.sqlite";

/// Schema of the single table this application owns. Existing files created by
/// earlier builds share this exact shape, so there is nothing to migrate.
const CREATE_MOVIES_TABLE: &str = "CREATE TABLE IF NOT EXISTS movies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL UNIQUE,
    genre TEXT NOT NULL,
    rating INTEGER NOT NULL,
    favorite INTEGER DEFAULT 0
)";

/// Owner of the one SQLite connection the process uses. It is built once in
/// `main`, handed to the TUI, and dropped when the TUI returns, which closes
/// the file on every exit path.
#[derive(Debug)]
pub struct MovieStore {
    pub(super) conn: Connection,
}

impl MovieStore {
    /// Create the parent directory if needed, open the database file and make
    /// sure the `movies` table exists.
    pub fn open(path: &Path) -> Result<Self, Error> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| Error::Initialization {
                path: path.to_path_buf(),
                source: Box::new(err),
            })?;
        }

        let store = Connection::open(path)
            .and_then(Self::with_connection)
            .map_err(|err| Error::Initialization {
                path: path.to_path_buf(),
                source: Box::new(err),
            })?;

        info!(path = %path.display(), "opened movie database");
        Ok(store)
    }

    /// Throwaway store backed by memory. Handy for tests and previews.
    pub fn in_memory() -> Result<Self, Error> {
        Connection::open_in_memory()
            .and_then(Self::with_connection)
            .map_err(|err| Error::Initialization {
                path: PathBuf::from(":memory:"),
                source: Box::new(err),
            })
    }

    fn with_connection(conn: Connection) -> rusqlite::Result<Self> {
        conn.execute(CREATE_MOVIES_TABLE, [])?;
        Ok(Self { conn })
    }

    /// Close the connection explicitly so a failing close can be reported.
    /// Dropping the store closes it too, silently.
    pub fn close(self) -> Result<(), Error> {
        self.conn.close().map_err(|(_, err)| Error::Storage(err))?;
        info!("closed movie database");
        Ok(())
    }
}

/// Resolve the default database location inside the user's home.
pub fn default_db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_missing_directories_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("movies.sqlite");

        let store = MovieStore::open(&path).unwrap();
        assert!(path.exists());

        let tables: i64 = store
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'movies'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
        store.close().unwrap();
    }

    #[test]
    fn reopening_keeps_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.sqlite");

        let store = MovieStore::open(&path).unwrap();
        store
            .conn
            .execute(
                "INSERT INTO movies (title, genre, rating) VALUES ('Heat', 'Thriller', 8)",
                [],
            )
            .unwrap();
        drop(store);

        let store = MovieStore::open(&path).unwrap();
        let count: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn unopenable_path_is_an_initialization_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a database file.
        let err = MovieStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Initialization { .. }));
    }
}
