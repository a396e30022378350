//! Domain models that mirror the `movies` table and get passed between the
//! store, the exporter and the TUI. They stay plain data holders so the other
//! layers can focus on persistence and presentation.

use std::fmt;

use crate::error::{Error, Result};

/// Genres offered by the form. The store itself accepts any text, so rows
/// written by other tools may carry a genre outside this list.
pub const GENRES: [&str; 9] = [
    "Action",
    "Comedy",
    "Drama",
    "Horror",
    "Sci-Fi",
    "Romance",
    "Thriller",
    "Animation",
    "Documentary",
];

/// Lowest rating the form lets the user pick.
pub const MIN_RATING: i64 = 1;
/// Highest rating the form lets the user pick.
pub const MAX_RATING: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single row of the `movies` table.
pub struct Movie {
    /// Primary key assigned by SQLite. Edit and delete flows hand it back to
    /// the store through a [`Selection`].
    pub id: i64,
    pub title: String,
    pub genre: String,
    pub rating: i64,
    pub favorite: bool,
}

impl Movie {
    /// Text shown in the `Favorit` column of the table and the export.
    pub fn favorite_label(&self) -> &'static str {
        favorite_label(self.favorite)
    }

    /// Strip the id so the record can be fed back into the edit form.
    pub fn to_input(&self) -> MovieInput {
        MovieInput {
            title: self.title.clone(),
            genre: self.genre.clone(),
            rating: self.rating,
            favorite: self.favorite,
        }
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Render the favorite flag the way the table and the export spell it.
pub fn favorite_label(favorite: bool) -> &'static str {
    if favorite {
        "Ya"
    } else {
        "Tidak"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Editable fields submitted on add and update.
pub struct MovieInput {
    pub title: String,
    pub genre: String,
    pub rating: i64,
    pub favorite: bool,
}

impl MovieInput {
    pub fn new(title: impl Into<String>, genre: impl Into<String>, rating: i64, favorite: bool) -> Self {
        Self {
            title: title.into(),
            genre: genre.into(),
            rating,
            favorite,
        }
    }

    /// Title with surrounding whitespace removed, or `EmptyTitle` when nothing
    /// is left.
    pub fn trimmed_title(&self) -> Result<&str> {
        let title = self.title.trim();
        if title.is_empty() {
            Err(Error::EmptyTitle)
        } else {
            Ok(title)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Identifies the record a caller picked from a listing. Update and delete
/// only accept a selection, never a bare id.
pub struct Selection {
    id: i64,
}

impl Selection {
    /// Build a selection from a raw id. SQLite never hands out ids below 1, so
    /// those can only come from a caller that skipped the selection step.
    pub fn new(id: i64) -> Result<Self> {
        if id < 1 {
            return Err(Error::InvalidSelection);
        }
        Ok(Self { id })
    }

    pub fn id(&self) -> i64 {
        self.id
    }
}

impl From<&Movie> for Selection {
    fn from(movie: &Movie) -> Self {
        Self { id: movie.id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_rejects_ids_sqlite_never_assigns() {
        assert!(matches!(Selection::new(0), Err(Error::InvalidSelection)));
        assert!(matches!(Selection::new(-4), Err(Error::InvalidSelection)));
        assert_eq!(Selection::new(7).unwrap().id(), 7);
    }

    #[test]
    fn selection_from_listed_movie_keeps_its_id() {
        let movie = Movie {
            id: 12,
            title: "Dune".into(),
            genre: "Sci-Fi".into(),
            rating: 9,
            favorite: true,
        };
        assert_eq!(Selection::from(&movie).id(), 12);
        assert_eq!(movie.favorite_label(), "Ya");
    }

    #[test]
    fn blank_titles_are_rejected() {
        let input = MovieInput::new("   ", "Drama", 5, false);
        assert!(matches!(input.trimmed_title(), Err(Error::EmptyTitle)));

        let input = MovieInput::new("  Alien ", "Horror", 8, false);
        assert_eq!(input.trimmed_title().unwrap(), "Alien");
    }
}
