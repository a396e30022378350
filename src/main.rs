//! Binary entry point: parse the command line, open the database, then either
//! run a one-shot export or hand the store to the Ratatui event loop.
use std::process::ExitCode;

use clap::Parser;
use movie_bookmarks::{export, logging, run_app, App, Cli, Config, MovieStore};
use tracing::{error, info};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// The store is opened once here and closed on the way out, whichever way the
/// UI returns.
fn run() -> anyhow::Result<()> {
    let config = Config::from_cli(Cli::parse())?;
    logging::init(&config.log_path)?;
    info!(db = %config.db_path.display(), "starting");

    let store = MovieStore::open(&config.db_path)?;

    if let Some(path) = &config.export_path {
        let movies = store.list_all()?;
        export(&movies, path)?;
        println!("Data berhasil diekspor ke {}", path.display());
        return store.close().map_err(Into::into);
    }

    let mut app = App::new(store)?;
    let result = run_app(&mut app);
    let closed = app.into_store().close();
    finish(result, closed)
}

/// Combine the UI outcome with the close outcome. An error from the UI takes
/// precedence; a close failure behind it is only logged.
fn finish(
    result: anyhow::Result<()>,
    closed: Result<(), movie_bookmarks::Error>,
) -> anyhow::Result<()> {
    match (result, closed) {
        (Err(err), Err(close_err)) => {
            error!(error = %close_err, "failed to close database after UI error");
            Err(err)
        }
        (Err(err), Ok(())) => Err(err),
        (Ok(()), closed) => closed.map_err(Into::into),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    fn close_failure() -> movie_bookmarks::Error {
        movie_bookmarks::Error::Storage(rusqlite::Error::QueryReturnedNoRows)
    }

    #[test]
    fn ui_error_wins_over_close_error() {
        let err = finish(Err(anyhow!("terminal went away")), Err(close_failure())).unwrap_err();
        assert_eq!(err.to_string(), "terminal went away");
    }

    #[test]
    fn close_error_surfaces_after_clean_exit() {
        let err = finish(Ok(()), Err(close_failure())).unwrap_err();
        assert!(err.downcast_ref::<movie_bookmarks::Error>().is_some());
    }

    #[test]
    fn clean_exit_and_close_is_ok() {
        assert!(finish(Ok(()), Ok(())).is_ok());
    }
}
