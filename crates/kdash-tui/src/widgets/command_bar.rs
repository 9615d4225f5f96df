//! Vim-style command bar: a single-line overlay at the bottom of the screen.
//!
//! Activated by pressing `:` outside the query bars. Displays a `:` prefix
//! followed by the typed command. `Enter` parses the command (see
//! [`crate::commands`]); `Escape` cancels.

use super::query_bar::{next_boundary, prev_boundary};
use crate::commands::Command;
use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Widget},
};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Result of feeding one event to the command bar.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandInput {
    /// Keep the bar open.
    Editing,
    /// Close without acting.
    Cancelled,
    /// Close and execute.
    Submit(Command),
}

/// Persistent state for the command bar.
#[derive(Debug, Default)]
pub struct CommandBarState {
    /// The text typed after the `:` prefix.
    pub input: String,
    /// Byte offset of the cursor within `input`.
    pub cursor: usize,
    /// Error message from the last failed command, cleared on the next key.
    pub error: Option<String>,
}

impl CommandBarState {
    /// Reset to a blank, error-free state. Call when opening the bar.
    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
        self.error = None;
    }

    /// Handle a key event while the command bar is focused.
    pub fn handle(&mut self, event: &AppEvent) -> CommandInput {
        // Any keypress dismisses the error display so the user can edit again.
        self.error = None;

        match event {
            AppEvent::Escape => {
                tracing::debug!("command bar cancelled");
                self.clear();
                CommandInput::Cancelled
            }
            AppEvent::Enter => match Command::parse(&self.input) {
                Ok(cmd) => {
                    tracing::debug!(command = ?cmd, "command submitted");
                    self.clear();
                    CommandInput::Submit(cmd)
                }
                Err(msg) if msg.is_empty() => {
                    self.clear();
                    CommandInput::Cancelled
                }
                Err(msg) => {
                    self.error = Some(msg);
                    CommandInput::Editing
                }
            },
            AppEvent::Char(c) => {
                self.input.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                CommandInput::Editing
            }
            AppEvent::Backspace => {
                if self.cursor > 0 {
                    let prev = prev_boundary(&self.input, self.cursor);
                    self.input.remove(prev);
                    self.cursor = prev;
                }
                CommandInput::Editing
            }
            AppEvent::Nav(Direction::Left) => {
                self.cursor = prev_boundary(&self.input, self.cursor);
                CommandInput::Editing
            }
            AppEvent::Nav(Direction::Right) => {
                self.cursor = next_boundary(&self.input, self.cursor);
                CommandInput::Editing
            }
            _ => CommandInput::Editing,
        }
    }

    /// Absolute terminal column of the text cursor within `area`.
    ///
    /// The `:` glyph occupies column 0, so the cursor starts at column 1.
    pub fn cursor_col(&self, area: Rect) -> u16 {
        let col = 1 + self.input[..self.cursor].chars().count() as u16;
        (area.x + col).min(area.right().saturating_sub(1))
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

/// Single-row command-bar overlay.
///
/// The caller is responsible for passing a 1-row `Rect` at the bottom of the
/// terminal. `CommandBar` clears that row with [`Clear`] and renders either
/// the `:<input>` prompt or an error message.
pub struct CommandBar<'a> {
    state: &'a CommandBarState,
    theme: &'a Theme,
}

impl<'a> CommandBar<'a> {
    pub fn new(state: &'a CommandBarState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl Widget for CommandBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let line = if let Some(ref err) = self.state.error {
            Line::from(Span::styled(
                format!("E  {err}"),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
        } else {
            Line::from(vec![
                Span::styled(":", self.theme.border_command_bar.add_modifier(Modifier::BOLD)),
                Span::raw(self.state.input.as_str()),
            ])
        };

        buf.set_line(area.x, area.y, &line, area.width);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
