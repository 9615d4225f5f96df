//! Tab bar widget: renders the strip of dashboard panes at the top of the
//! screen.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Tabs, Widget},
};

/// Renders the 1-line strip of pane names at the top of the screen.
///
/// The focused pane is highlighted. Keybinding hints (`q:quit  ?:help`) are
/// right-aligned in the same row.
pub struct TabBar<'a> {
    labels: &'a [String],
    active: Option<usize>,
    theme: &'a Theme,
}

impl<'a> TabBar<'a> {
    /// `active` is `None` while focus sits in a query or command bar.
    pub fn new(labels: &'a [String], active: Option<usize>, theme: &'a Theme) -> Self {
        Self {
            labels,
            active,
            theme,
        }
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let labels: Vec<Line> = self
            .labels
            .iter()
            .map(|label| Line::from(format!(" {label} ")))
            .collect();

        Tabs::new(labels)
            .select(self.active)
            .highlight_style(self.theme.border_focused.add_modifier(Modifier::REVERSED))
            .divider("│")
            .render(area, buf);

        // Keybinding hints at the right edge
        let hint = " q:lopeta  ?:ohje ";
        let hint_x = area.right().saturating_sub(hint.chars().count() as u16);
        buf.set_string(
            hint_x,
            area.y,
            hint,
            Style::default().add_modifier(Modifier::DIM),
        );
    }
}
