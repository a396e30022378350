use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::error::Error as StoreError;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Column for a text cursor sitting after `prefix` and `text_len` characters,
/// kept on the last cell of `area` when the text is wider than it.
pub(crate) fn text_cursor_x(area: Rect, prefix: &str, text_len: usize) -> u16 {
    let offset = prefix.chars().count().saturating_add(text_len);
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);
    area.x
        .saturating_add(offset)
        .min(area.right().saturating_sub(1))
        .max(area.x)
}

/// Build the footer message for a failed operation. User-correctable errors
/// already read as a sentence. Storage and export failures show the outermost
/// context (which operation failed) followed by the root cause.
pub(crate) fn surface_error(err: &Error) -> String {
    let root = err
        .chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string());

    match err.downcast_ref::<StoreError>() {
        Some(StoreError::Storage(_) | StoreError::Export { .. }) => format!("{err}: {root}"),
        _ => root,
    }
}
