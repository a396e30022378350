//! CSV export of the movie listing.

use std::io;
use std::path::Path;

use csv::Writer;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::Movie;

/// Header row written above the records, matching the table columns.
pub const HEADER: [&str; 5] = ["ID", "Judul", "Genre", "Rating", "Favorit"];

/// Write `movies` to `path` in the order given, replacing any existing file.
/// Lines end with CRLF. Nothing is cleaned up when a write fails halfway.
pub fn export(movies: &[Movie], path: &Path) -> Result<()> {
    let file = Writer::from_path(path).map_err(|source| Error::Export {
        path: path.to_path_buf(),
        source,
    })?;

    write_all(file, movies).map_err(|source| Error::Export {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), count = movies.len(), "exported movies");
    Ok(())
}

/// Serialize `movies` with the header row into any writer.
pub fn write_records<W: io::Write>(movies: &[Movie], writer: W) -> csv::Result<()> {
    write_all(Writer::from_writer(writer), movies)
}

fn write_all<W: io::Write>(mut writer: Writer<W>, movies: &[Movie]) -> csv::Result<()> {
    writer.write_record(HEADER)?;
    for movie in movies {
        let id = movie.id.to_string();
        let rating = movie.rating.to_string();
        writer.write_record([
            id.as_str(),
            movie.title.as_str(),
            movie.genre.as_str(),
            rating.as_str(),
            movie.favorite_label(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
