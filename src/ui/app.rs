use std::mem;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::db::MovieStore;
use crate::export::{export, HEADER};
use crate::models::{Movie, Selection};

use super::forms::{ConfirmDelete, ExportForm, MovieField, MovieForm};
use super::helpers::{centered_rect, surface_error, text_cursor_x};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Width of the help panel on the right of the table.
const INFO_PANEL_WIDTH: u16 = 34;
/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 10;

/// What the keyboard currently drives: the table or one of the popups.
enum Mode {
    Normal,
    Adding(MovieForm),
    Editing {
        selection: Selection,
        form: MovieForm,
    },
    ConfirmDelete(ConfirmDelete),
    Exporting(ExportForm),
    About,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Application state for the TUI. It owns the store, so the database closes
/// when the app is dropped.
pub struct App {
    store: MovieStore,
    movies: Vec<Movie>,
    selected: usize,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Build the app and load the initial listing.
    pub fn new(store: MovieStore) -> Result<Self> {
        let movies = store.list_all().context("Tidak dapat memuat film")?;
        Ok(Self {
            store,
            movies,
            selected: 0,
            mode: Mode::Normal,
            status: None,
        })
    }

    /// Hand the store back, e.g. to close it explicitly.
    pub fn into_store(self) -> MovieStore {
        self.store
    }

    /// Movies in the order the table shows them.
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Text of the footer status line, if any.
    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    /// Dispatch a key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Adding(form) => self.handle_add(code, form),
            Mode::Editing { selection, form } => self.handle_edit(code, selection, form),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
            Mode::Exporting(form) => self.handle_export(code, form),
            Mode::About => Mode::Normal,
        };

        exit
    }

    /// Ctrl+E opens the export prompt from the table.
    pub(crate) fn handle_ctrl_e(&mut self) {
        if matches!(self.mode, Mode::Normal) {
            self.mode = self.open_export();
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.move_selection(PAGE_STEP),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.movies.len().saturating_sub(1),
            KeyCode::Char('+') | KeyCode::Char('a') | KeyCode::Char('A') => {
                self.clear_status();
                return Mode::Adding(MovieForm::default());
            }
            KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Some(movie) = self.current_movie() {
                    let mode = Mode::Editing {
                        selection: Selection::from(movie),
                        form: MovieForm::from_movie(movie),
                    };
                    self.clear_status();
                    return mode;
                }
                self.set_status(
                    "Harap pilih film dari tabel untuk diperbarui.",
                    StatusKind::Error,
                );
            }
            KeyCode::Char('-') | KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
                if let Some(movie) = self.current_movie() {
                    let confirm = ConfirmDelete::for_movie(movie);
                    self.clear_status();
                    return Mode::ConfirmDelete(confirm);
                }
                self.set_status("Harap pilih film untuk dihapus.", StatusKind::Error);
            }
            KeyCode::Char('x') | KeyCode::Char('X') => return self.open_export(),
            KeyCode::Char('r') | KeyCode::Char('R') => match self.reload(None) {
                Ok(()) => self.clear_status(),
                Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
            },
            KeyCode::Char('?') => return Mode::About,
            _ => {}
        }
        Mode::Normal
    }

    fn handle_add(&mut self, code: KeyCode, mut form: MovieForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.clear_status();
                return Mode::Normal;
            }
            KeyCode::Enter => match self.save_new_movie(&form) {
                Ok(()) => return Mode::Normal,
                Err(err) => self.report_form_error(&mut form, &err),
            },
            code => edit_form(&mut form, code),
        }
        Mode::Adding(form)
    }

    fn handle_edit(&mut self, code: KeyCode, selection: Selection, mut form: MovieForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.clear_status();
                return Mode::Normal;
            }
            KeyCode::Enter => match self.save_existing_movie(selection, &form) {
                Ok(()) => return Mode::Normal,
                Err(err) => self.report_form_error(&mut form, &err),
            },
            code => edit_form(&mut form, code),
        }
        Mode::Editing { selection, form }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => Mode::Normal,
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Err(err) = self.perform_delete(&confirm) {
                    self.set_status(surface_error(&err), StatusKind::Error);
                }
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn handle_export(&mut self, code: KeyCode, mut form: ExportForm) -> Mode {
        match code {
            KeyCode::Esc => return Mode::Normal,
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.perform_export(&form) {
                Ok(()) => return Mode::Normal,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::Exporting(form)
    }

    fn open_export(&mut self) -> Mode {
        if self.movies.is_empty() {
            self.set_status("Tidak ada data untuk diekspor.", StatusKind::Info);
            return Mode::Normal;
        }
        self.clear_status();
        Mode::Exporting(ExportForm::default())
    }

    fn report_form_error(&mut self, form: &mut MovieForm, err: &anyhow::Error) {
        let message = surface_error(err);
        form.error = Some(message.clone());
        self.set_status(message, StatusKind::Error);
    }

    fn save_new_movie(&mut self, form: &MovieForm) -> Result<()> {
        let input = form.parse_inputs()?;
        let id = self.store.add(&input).context("Tidak dapat menambahkan film")?;
        self.reload(Some(id))?;
        self.set_status(
            format!("Berhasil menambahkan '{}'!", input.title),
            StatusKind::Info,
        );
        Ok(())
    }

    fn save_existing_movie(&mut self, selection: Selection, form: &MovieForm) -> Result<()> {
        let input = form.parse_inputs()?;
        self.store
            .update(selection, &input)
            .context("Tidak dapat memperbarui film")?;
        self.reload(Some(selection.id()))?;
        self.set_status(
            format!("Berhasil memperbarui catatan untuk ID {}!", selection.id()),
            StatusKind::Info,
        );
        Ok(())
    }

    fn perform_delete(&mut self, confirm: &ConfirmDelete) -> Result<()> {
        self.store
            .delete(confirm.selection)
            .context("Tidak dapat menghapus film")?;
        self.reload(None)?;
        self.set_status(
            format!("Berhasil menghapus '{}'!", confirm.title),
            StatusKind::Info,
        );
        Ok(())
    }

    fn perform_export(&mut self, form: &ExportForm) -> Result<()> {
        let path = form.parse_path()?;
        export(&self.movies, &path)?;
        self.set_status(
            format!("Data berhasil diekspor ke {}", path.display()),
            StatusKind::Info,
        );
        Ok(())
    }

    /// Re-read the table and keep the cursor on `focus_id` when it is still
    /// listed.
    fn reload(&mut self, focus_id: Option<i64>) -> Result<()> {
        self.movies = self.store.list_all().context("Tidak dapat memuat film")?;
        if let Some(idx) = focus_id.and_then(|id| self.movies.iter().position(|m| m.id == id)) {
            self.selected = idx;
        } else if self.selected >= self.movies.len() {
            self.selected = self.movies.len().saturating_sub(1);
        }
        Ok(())
    }

    fn current_movie(&self) -> Option<&Movie> {
        self.movies.get(self.selected)
    }

    fn move_selection(&mut self, offset: isize) {
        if self.movies.is_empty() {
            self.selected = 0;
            return;
        }
        let last = self.movies.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
            .split(area);
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(INFO_PANEL_WIDTH)])
            .split(chunks[0]);

        self.draw_table(frame, body[0]);
        self.draw_info_panel(frame, body[1]);
        self.draw_footer(frame, chunks[1]);

        match &self.mode {
            Mode::Normal => {}
            Mode::Adding(form) => self.draw_movie_form(frame, area, "Tambah Film", form),
            Mode::Editing { form, .. } => {
                self.draw_movie_form(frame, area, "Perbarui Film", form)
            }
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Exporting(form) => self.draw_export_prompt(frame, area, form),
            Mode::About => self.draw_about(frame, area),
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Pengelola Bookmark Film");

        if self.movies.is_empty() {
            let message = Paragraph::new("Belum ada film. Tekan '+' untuk menambahkan.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header_style = Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD);
        let header = Row::new(HEADER.iter().map(|title| Cell::from(*title))).style(header_style);

        let rows = self.movies.iter().map(|movie| {
            Row::new(vec![
                Cell::from(movie.id.to_string()),
                Cell::from(movie.title.clone()),
                Cell::from(movie.genre.clone()),
                Cell::from(movie.rating.to_string()),
                Cell::from(movie.favorite_label()),
            ])
        });

        let widths = [
            Constraint::Length(6),
            Constraint::Min(20),
            Constraint::Length(13),
            Constraint::Length(7),
            Constraint::Length(8),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_info_panel(&self, frame: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let lines = vec![
            Line::from(Span::styled("Bantuan Aplikasi", bold)),
            Line::from(""),
            Line::from(vec![
                Span::styled("Tambah: ", bold),
                Span::raw("tekan '+', isi formulir, lalu Enter."),
            ]),
            Line::from(vec![
                Span::styled("Perbarui: ", bold),
                Span::raw("pilih film, tekan 'e', ubah detail, lalu Enter."),
            ]),
            Line::from(vec![
                Span::styled("Hapus: ", bold),
                Span::raw("pilih film dan tekan '-'."),
            ]),
            Line::from(vec![
                Span::styled("Ekspor: ", bold),
                Span::raw("Ctrl+E untuk menyimpan data ke CSV."),
            ]),
        ];

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Panel Info"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = match &self.status {
            Some(status) => Line::from(vec![Span::styled(status.text.clone(), status.kind.style())]),
            None => Line::from(format!("{} film", self.movies.len())),
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::Adding(_) | Mode::Editing { .. } => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Pindah   "),
                Span::styled("[←→]", key_style),
                Span::raw(" Ubah   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Simpan   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Batal"),
            ]),
            Mode::Exporting(_) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Ekspor   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Batal"),
            ]),
            _ => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Pilih   "),
                Span::styled("[+]", key_style),
                Span::raw(" Tambah   "),
                Span::styled("[e]", key_style),
                Span::raw(" Perbarui   "),
                Span::styled("[-]", key_style),
                Span::raw(" Hapus   "),
                Span::styled("[Ctrl+E]", key_style),
                Span::raw(" Ekspor   "),
                Span::styled("[?]", key_style),
                Span::raw(" Tentang   "),
                Span::styled("[q]", key_style),
                Span::raw(" Keluar"),
            ]),
        }
    }

    fn draw_movie_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &MovieForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Judul", MovieField::Title),
            form.build_line("Genre", MovieField::Genre),
            form.build_line("Rating", MovieField::Rating),
            form.build_line("Favorit", MovieField::Favorite),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter untuk menyimpan • Tab untuk pindah • Esc untuk batal",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if form.active == MovieField::Title {
            let cursor_x = text_cursor_x(inner, "Judul: ", form.title_len());
            frame.set_cursor_position((cursor_x, inner.y));
        }
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Konfirmasi Hapus")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Apakah Anda yakin ingin menghapus '{}'?",
                confirm.title
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Tekan Y untuk konfirmasi atau N / Esc untuk batal.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_export_prompt(&self, frame: &mut Frame, area: Rect, form: &ExportForm) {
        let popup_area = centered_rect(70, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Simpan File CSV")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            Line::from(format!("File: {}", form.path)),
            Line::from(""),
        ];
        match &form.error {
            Some(error) => lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            ))),
            None => lines.push(Line::from(Span::styled(
                format!("{} film akan diekspor.", self.movies.len()),
                Style::default().fg(Color::Gray),
            ))),
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let cursor_x = text_cursor_x(inner, "File: ", form.path.chars().count());
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_about(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let lines = vec![
            Line::from(Span::styled(
                "Pengelola Bookmark Film",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("Versi {}", env!("CARGO_PKG_VERSION"))),
            Line::from("Katalog film pribadi dengan genre, rating, dan favorit."),
            Line::from(""),
            Line::from(Span::styled(
                "Tekan tombol apa saja untuk menutup.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().title("Tentang").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}

/// Keys shared by the add and edit popups.
fn edit_form(form: &mut MovieForm, code: KeyCode) {
    match code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
        KeyCode::Left => form.adjust(-1),
        KeyCode::Right => form.adjust(1),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(ch) => {
            if form.push_char(ch) {
                form.error = None;
            }
        }
        _ => {}
    }
}
