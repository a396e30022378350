use rusqlite::{ffi, params, Error as SqlError, Row};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::{Movie, MovieInput, Selection};

use super::MovieStore;

impl MovieStore {
    /// Retrieve every movie sorted by title. This is the only read path, and
    /// the TUI calls it after every mutation to refresh the table.
    pub fn list_all(&self) -> Result<Vec<Movie>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, genre, rating, favorite FROM movies ORDER BY title")?;

        let movies = stmt
            .query_map([], movie_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = movies.len(), "loaded movies");
        Ok(movies)
    }

    /// Insert a new movie and return the id SQLite assigned to it.
    pub fn add(&self, input: &MovieInput) -> Result<i64> {
        let title = input.trimmed_title()?;

        self.conn
            .execute(
                "INSERT INTO movies (title, genre, rating, favorite) VALUES (?1, ?2, ?3, ?4)",
                params![title, input.genre, input.rating, input.favorite],
            )
            .map_err(|err| map_unique_constraint(err, title))?;

        let id = self.conn.last_insert_rowid();
        info!(id, title, "added movie");
        Ok(id)
    }

    /// Overwrite every field of the selected movie. A selection that no longer
    /// matches a row is accepted without complaint, the same way a bare
    /// `UPDATE ... WHERE id = ?` behaves.
    pub fn update(&self, selection: Selection, input: &MovieInput) -> Result<()> {
        let title = input.trimmed_title()?;

        let updated = self
            .conn
            .execute(
                "UPDATE movies SET title = ?1, genre = ?2, rating = ?3, favorite = ?4 WHERE id = ?5",
                params![title, input.genre, input.rating, input.favorite, selection.id()],
            )
            .map_err(|err| map_unique_constraint(err, title))?;

        if updated == 0 {
            warn!(id = selection.id(), "update matched no movie");
        } else {
            info!(id = selection.id(), title, "updated movie");
        }
        Ok(())
    }

    /// Remove the selected movie. Deleting a row that is already gone is a
    /// no-op.
    pub fn delete(&self, selection: Selection) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM movies WHERE id = ?1", params![selection.id()])?;

        if deleted == 0 {
            debug!(id = selection.id(), "delete matched no movie");
        } else {
            info!(id = selection.id(), "deleted movie");
        }
        Ok(())
    }
}

/// Only a stored `1` counts as a favorite. NULL or any other number reads as
/// not a favorite.
fn movie_from_row(row: &Row<'_>) -> rusqlite::Result<Movie> {
    Ok(Movie {
        id: row.get(0)?,
        title: row.get(1)?,
        genre: row.get(2)?,
        rating: row.get(3)?,
        favorite: row.get::<_, Option<i64>>(4)? == Some(1),
    })
}

/// Turn the unique-title violation into `DuplicateTitle`. Everything else stays
/// a plain storage error.
fn map_unique_constraint(err: SqlError, title: &str) -> Error {
    match &err {
        SqlError::SqliteFailure(cause, _)
            if cause.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            warn!(title, "rejected duplicate title");
            Error::DuplicateTitle {
                title: title.to_string(),
            }
        }
        _ => Error::Storage(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MovieStore {
        MovieStore::in_memory().unwrap()
    }

    fn titles(store: &MovieStore) -> Vec<String> {
        store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|movie| movie.title)
            .collect()
    }

    #[test]
    fn added_movie_comes_back_with_its_fields() {
        let store = store();
        let id = store
            .add(&MovieInput::new("Dune", "Sci-Fi", 9, true))
            .unwrap();

        let movies = store.list_all().unwrap();
        assert_eq!(
            movies,
            vec![Movie {
                id,
                title: "Dune".into(),
                genre: "Sci-Fi".into(),
                rating: 9,
                favorite: true,
            }]
        );
    }

    #[test]
    fn titles_are_stored_trimmed() {
        let store = store();
        store
            .add(&MovieInput::new("  Heat  ", "Thriller", 8, false))
            .unwrap();
        assert_eq!(titles(&store), vec!["Heat"]);
    }

    #[test]
    fn blank_title_is_rejected_before_touching_the_table() {
        let store = store();
        let err = store
            .add(&MovieInput::new("  ", "Drama", 5, false))
            .unwrap_err();
        assert!(matches!(err, Error::EmptyTitle));
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn duplicate_title_is_rejected_and_table_unchanged() {
        let store = store();
        store
            .add(&MovieInput::new("Alien", "Horror", 8, false))
            .unwrap();
        let before = store.list_all().unwrap();

        let err = store
            .add(&MovieInput::new("Alien", "Sci-Fi", 3, true))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateTitle { ref title } if title == "Alien"));
        assert_eq!(store.list_all().unwrap(), before);
    }

    #[test]
    fn title_uniqueness_is_case_sensitive() {
        let store = store();
        store
            .add(&MovieInput::new("alien", "Horror", 8, false))
            .unwrap();
        store
            .add(&MovieInput::new("Alien", "Horror", 8, false))
            .unwrap();
        assert_eq!(store.list_all().unwrap().len(), 2);
    }

    #[test]
    fn listing_is_sorted_by_title_regardless_of_insert_order() {
        let store = store();
        for title in ["Zodiac", "Amelie", "Memento", "Alien"] {
            store
                .add(&MovieInput::new(title, "Drama", 7, false))
                .unwrap();
        }
        assert_eq!(titles(&store), vec!["Alien", "Amelie", "Memento", "Zodiac"]);
    }

    #[test]
    fn update_overwrites_all_fields_and_is_idempotent() {
        let store = store();
        let id = store
            .add(&MovieInput::new("Alien", "Horror", 8, false))
            .unwrap();
        let selection = Selection::new(id).unwrap();
        let input = MovieInput::new("Aliens", "Action", 9, true);

        store.update(selection, &input).unwrap();
        let once = store.list_all().unwrap();
        store.update(selection, &input).unwrap();
        let twice = store.list_all().unwrap();

        assert_eq!(once, twice);
        assert_eq!(
            once,
            vec![Movie {
                id,
                title: "Aliens".into(),
                genre: "Action".into(),
                rating: 9,
                favorite: true,
            }]
        );
    }

    #[test]
    fn update_of_unknown_id_is_a_silent_no_op() {
        let store = store();
        store
            .add(&MovieInput::new("Alien", "Horror", 8, false))
            .unwrap();
        let before = store.list_all().unwrap();

        store
            .update(
                Selection::new(999).unwrap(),
                &MovieInput::new("Ghost", "Drama", 2, false),
            )
            .unwrap();
        assert_eq!(store.list_all().unwrap(), before);
    }

    #[test]
    fn update_into_an_existing_title_is_a_duplicate() {
        let store = store();
        store
            .add(&MovieInput::new("Alien", "Horror", 8, false))
            .unwrap();
        let id = store
            .add(&MovieInput::new("Amelie", "Drama", 7, true))
            .unwrap();

        let err = store
            .update(
                Selection::new(id).unwrap(),
                &MovieInput::new("Alien", "Drama", 7, true),
            )
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateTitle { .. }));
        assert_eq!(titles(&store), vec!["Alien", "Amelie"]);
    }

    #[test]
    fn delete_is_final_and_repeatable() {
        let store = store();
        let id = store
            .add(&MovieInput::new("Alien", "Horror", 8, false))
            .unwrap();
        let selection = Selection::new(id).unwrap();

        store.delete(selection).unwrap();
        assert!(store.list_all().unwrap().iter().all(|m| m.id != id));
        store.delete(selection).unwrap();
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = store();
        let first = store
            .add(&MovieInput::new("Alien", "Horror", 8, false))
            .unwrap();
        store.delete(Selection::new(first).unwrap()).unwrap();
        let second = store
            .add(&MovieInput::new("Alien", "Horror", 8, false))
            .unwrap();
        assert!(second > first);
    }

    #[test]
    fn null_favorite_reads_as_false() {
        let store = store();
        store
            .conn
            .execute(
                "INSERT INTO movies (title, genre, rating, favorite) VALUES ('Heat', 'Thriller', 8, NULL)",
                [],
            )
            .unwrap();
        assert!(!store.list_all().unwrap()[0].favorite);
    }

    #[test]
    fn only_a_stored_one_reads_as_favorite() {
        let store = store();
        store
            .conn
            .execute_batch(
                "INSERT INTO movies (title, genre, rating, favorite) VALUES ('A', 'Drama', 5, 1);
                 INSERT INTO movies (title, genre, rating, favorite) VALUES ('B', 'Drama', 5, 2);
                 INSERT INTO movies (title, genre, rating, favorite) VALUES ('C', 'Drama', 5, 0);",
            )
            .unwrap();
        let favorites: Vec<bool> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|movie| movie.favorite)
            .collect();
        assert_eq!(favorites, vec![true, false, false]);
    }
}
