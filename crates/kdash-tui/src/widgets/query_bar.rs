//! Query bar widget: single-line text input at the bottom of a pane.
//!
//! Every pane with a search field owns one [`QueryBarState`]. Results update
//! as the user types; the app shell re-evaluates the pane after each edit.
//!
//! # Editing
//!
//! - `Char(c)` inserts at the cursor.
//! - `Backspace` deletes the character before the cursor.
//! - `Nav(Left)` / `Nav(Right)` move the cursor.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct QueryBarState {
    /// The text typed by the user.
    pub query: String,
    /// Byte offset of the cursor within `query`.
    pub cursor: usize,
}

impl QueryBarState {
    /// Apply an editing event. Returns `true` when the query text changed.
    pub fn handle(&mut self, event: &AppEvent) -> bool {
        match event {
            AppEvent::Char(c) => {
                self.query.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                tracing::debug!(query = %self.query, cursor = self.cursor, "query: char inserted");
                true
            }
            AppEvent::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                let prev = prev_boundary(&self.query, self.cursor);
                self.query.remove(prev);
                self.cursor = prev;
                tracing::debug!(query = %self.query, cursor = self.cursor, "query: backspace");
                true
            }
            AppEvent::Nav(Direction::Left) => {
                self.cursor = prev_boundary(&self.query, self.cursor);
                false
            }
            AppEvent::Nav(Direction::Right) => {
                self.cursor = next_boundary(&self.query, self.cursor);
                false
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
    }
}

pub(crate) fn prev_boundary(s: &str, cursor: usize) -> usize {
    s[..cursor]
        .char_indices()
        .last()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub(crate) fn next_boundary(s: &str, cursor: usize) -> usize {
    s[cursor..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| cursor + i)
        .unwrap_or(s.len())
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct QueryBar<'a> {
    title: &'a str,
    state: &'a QueryBarState,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> QueryBar<'a> {
    pub fn new(title: &'a str, state: &'a QueryBarState, focused: bool, theme: &'a Theme) -> Self {
        Self {
            title,
            state,
            focused,
            theme,
        }
    }

    /// Absolute terminal position of the text cursor within this widget's
    /// rendered area. Pass to `frame.set_cursor_position()` after rendering.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        // The block adds 1-cell borders; text starts at (area.x+1, area.y+1).
        let col = self.state.query[..self.state.cursor].chars().count() as u16;
        let x = (area.x + 1 + col).min(area.right().saturating_sub(1));
        let y = area.y + 1;
        (x, y)
    }
}

impl Widget for QueryBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(self.title)
            .border_style(self.theme.border(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        let line = if self.state.query.is_empty() && !self.focused {
            Line::from(Span::styled(
                "paina / hakeaksesi",
                Style::default().add_modifier(Modifier::DIM),
            ))
        } else {
            Line::from(self.state.query.as_str())
        };
        Paragraph::new(line).render(inner, buf);
    }
}
