use std::path::PathBuf;

use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::error::Error;
use crate::models::{favorite_label, Movie, MovieInput, Selection, GENRES, MAX_RATING, MIN_RATING};

/// File name suggested by the export prompt.
const DEFAULT_EXPORT_FILE: &str = "movies.csv";

/// Fields of the movie form, in focus order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum MovieField {
    #[default]
    Title,
    Genre,
    Rating,
    Favorite,
}

impl MovieField {
    fn next(self) -> Self {
        match self {
            MovieField::Title => MovieField::Genre,
            MovieField::Genre => MovieField::Rating,
            MovieField::Rating => MovieField::Favorite,
            MovieField::Favorite => MovieField::Title,
        }
    }

    fn previous(self) -> Self {
        match self {
            MovieField::Title => MovieField::Favorite,
            MovieField::Genre => MovieField::Title,
            MovieField::Rating => MovieField::Genre,
            MovieField::Favorite => MovieField::Rating,
        }
    }
}

/// State of the add/edit popup. Genre and rating are pickers rather than free
/// text, so the only way to produce invalid input is a blank title.
#[derive(Clone, Debug)]
pub(crate) struct MovieForm {
    pub(crate) title: String,
    pub(crate) genre: String,
    pub(crate) rating: i64,
    pub(crate) favorite: bool,
    pub(crate) active: MovieField,
    pub(crate) error: Option<String>,
}

impl Default for MovieForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            genre: GENRES[0].to_string(),
            rating: MIN_RATING,
            favorite: false,
            active: MovieField::Title,
            error: None,
        }
    }
}

impl MovieForm {
    /// Populate the form from a listed movie when editing.
    pub(crate) fn from_movie(movie: &Movie) -> Self {
        let input = movie.to_input();
        Self {
            title: input.title,
            genre: input.genre,
            rating: input.rating,
            favorite: input.favorite,
            ..Self::default()
        }
    }

    pub(crate) fn focus_next(&mut self) {
        self.active = self.active.next();
    }

    pub(crate) fn focus_previous(&mut self) {
        self.active = self.active.previous();
    }

    /// Left/right on a picker field. Genres wrap around, ratings stop at the
    /// bounds, the favorite checkbox flips.
    pub(crate) fn adjust(&mut self, delta: isize) {
        match self.active {
            MovieField::Title => {}
            MovieField::Genre => {
                // A genre outside the list (written by another tool) restarts at the first entry.
                let len = GENRES.len() as isize;
                let next = match GENRES.iter().position(|g| *g == self.genre) {
                    Some(idx) => (idx as isize + delta).rem_euclid(len) as usize,
                    None => 0,
                };
                self.genre = GENRES[next].to_string();
            }
            MovieField::Rating => {
                self.rating = self
                    .rating
                    .saturating_add(delta as i64)
                    .clamp(MIN_RATING, MAX_RATING);
            }
            MovieField::Favorite => self.favorite = !self.favorite,
        }
    }

    /// Feed a typed character to the active field. Returns whether it was
    /// accepted.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            MovieField::Title => {
                if ch.is_control() {
                    return false;
                }
                self.title.push(ch);
                true
            }
            MovieField::Rating => {
                let Some(digit) = ch.to_digit(10).map(i64::from) else {
                    return false;
                };
                // "1" then "0" reads as 10; anything out of range starts over.
                let appended = self.rating.saturating_mul(10).saturating_add(digit);
                if (MIN_RATING..=MAX_RATING).contains(&appended) {
                    self.rating = appended;
                } else if (MIN_RATING..=MAX_RATING).contains(&digit) {
                    self.rating = digit;
                } else {
                    return false;
                }
                true
            }
            MovieField::Favorite => {
                if ch == ' ' {
                    self.favorite = !self.favorite;
                    true
                } else {
                    false
                }
            }
            MovieField::Genre => false,
        }
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            MovieField::Title => {
                self.title.pop();
            }
            MovieField::Rating => self.rating = MIN_RATING,
            MovieField::Genre | MovieField::Favorite => {}
        }
    }

    /// Validate the inputs and return values ready for the store.
    pub(crate) fn parse_inputs(&self) -> Result<MovieInput> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::EmptyTitle.into());
        }
        Ok(MovieInput::new(title, self.genre.clone(), self.rating, self.favorite))
    }

    /// Render one `Label: value` line, highlighting the focused field.
    pub(crate) fn build_line(&self, field_name: &str, field: MovieField) -> Line<'static> {
        let value = match field {
            MovieField::Title if self.title.is_empty() => "<wajib diisi>".to_string(),
            MovieField::Title => self.title.clone(),
            MovieField::Genre => format!("< {} >", self.genre),
            MovieField::Rating => format!("< {} >", self.rating),
            MovieField::Favorite => {
                let mark = if self.favorite { "x" } else { " " };
                format!("[{mark}] {}", favorite_label(self.favorite))
            }
        };

        let style = if self.active == field {
            Style::default().fg(Color::Yellow)
        } else if field == MovieField::Title && self.title.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(value, style),
        ])
    }

    pub(crate) fn title_len(&self) -> usize {
        self.title.chars().count()
    }
}

/// Pending delete, waiting for the user to confirm.
#[derive(Clone, Debug)]
pub(crate) struct ConfirmDelete {
    pub(crate) selection: Selection,
    pub(crate) title: String,
}

impl ConfirmDelete {
    pub(crate) fn for_movie(movie: &Movie) -> Self {
        Self {
            selection: Selection::from(movie),
            title: movie.title.clone(),
        }
    }
}

/// Destination prompt shown before exporting.
#[derive(Clone, Debug)]
pub(crate) struct ExportForm {
    pub(crate) path: String,
    pub(crate) error: Option<String>,
}

impl Default for ExportForm {
    fn default() -> Self {
        Self {
            path: DEFAULT_EXPORT_FILE.to_string(),
            error: None,
        }
    }
}

impl ExportForm {
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.path.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.path.pop();
    }

    pub(crate) fn parse_path(&self) -> Result<PathBuf> {
        let path = self.path.trim();
        if path.is_empty() {
            return Err(anyhow!("Nama file tidak boleh kosong."));
        }
        Ok(PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_accepts_two_digit_ten_and_restarts_otherwise() {
        let mut form = MovieForm {
            active: MovieField::Rating,
            ..MovieForm::default()
        };
        assert!(form.push_char('0'));
        assert_eq!(form.rating, 10);

        assert!(form.push_char('7'));
        assert_eq!(form.rating, 7);

        form.rating = 1;
        assert!(!form.push_char('x'));
        assert_eq!(form.rating, 1);
    }

    #[test]
    fn out_of_range_stored_ratings_do_not_overflow() {
        let mut form = MovieForm {
            rating: i64::MAX,
            active: MovieField::Rating,
            ..MovieForm::default()
        };
        assert!(form.push_char('5'));
        assert_eq!(form.rating, 5);

        form.rating = i64::MAX;
        form.adjust(1);
        assert_eq!(form.rating, MAX_RATING);

        form.rating = i64::MIN;
        form.adjust(-1);
        assert_eq!(form.rating, MIN_RATING);
    }

    #[test]
    fn confirm_delete_targets_the_listed_movie() {
        let movie = Movie {
            id: 9,
            title: "Heat".into(),
            genre: "Thriller".into(),
            rating: 8,
            favorite: false,
        };
        let confirm = ConfirmDelete::for_movie(&movie);
        assert_eq!(confirm.selection.id(), 9);
        assert_eq!(confirm.title, "Heat");
    }

    #[test]
    fn rating_arrows_stop_at_bounds() {
        let mut form = MovieForm {
            active: MovieField::Rating,
            ..MovieForm::default()
        };
        form.adjust(-1);
        assert_eq!(form.rating, MIN_RATING);
        for _ in 0..20 {
            form.adjust(1);
        }
        assert_eq!(form.rating, MAX_RATING);
    }

    #[test]
    fn genre_wraps_around_the_list() {
        let mut form = MovieForm {
            active: MovieField::Genre,
            ..MovieForm::default()
        };
        form.adjust(-1);
        assert_eq!(form.genre, "Documentary");
        form.adjust(1);
        assert_eq!(form.genre, "Action");

        form.genre = "Western".into();
        form.adjust(1);
        assert_eq!(form.genre, "Action");
    }

    #[test]
    fn focus_cycles_through_every_field() {
        let mut form = MovieForm::default();
        for expected in [
            MovieField::Genre,
            MovieField::Rating,
            MovieField::Favorite,
            MovieField::Title,
        ] {
            form.focus_next();
            assert_eq!(form.active, expected);
        }
        form.focus_previous();
        assert_eq!(form.active, MovieField::Favorite);
    }

    #[test]
    fn blank_title_fails_validation() {
        let form = MovieForm {
            title: "   ".into(),
            ..MovieForm::default()
        };
        let err = form.parse_inputs().unwrap_err();
        assert_eq!(err.to_string(), "Judul film tidak boleh kosong.");
    }

    #[test]
    fn edit_form_round_trips_listed_movie() {
        let movie = Movie {
            id: 3,
            title: "Amelie".into(),
            genre: "Drama".into(),
            rating: 7,
            favorite: true,
        };
        let form = MovieForm::from_movie(&movie);
        assert_eq!(form.parse_inputs().unwrap(), movie.to_input());
    }
}
