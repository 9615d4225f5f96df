//! Record list widget: the bordered, scrollable pane used for decisions,
//! agendas and news.
//!
//! The pane does not know what it lists. Callers build the rows (see
//! [`super::rows`]) and decide on the placeholder and footer hints; the pane
//! draws them, highlights the selected row when focused and keeps it in
//! view.
//!
//! # Navigation (when pane is focused)
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑` / `k` | Move selection up one row |
//! | `↓` / `j` | Move selection down one row |
//! | `PageUp` / `Ctrl+u` | Up one page |
//! | `PageDown` / `Ctrl+d` | Down one page |

use super::cursor::ListCursor;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};

pub struct RecordList<'a> {
    title: String,
    rows: Vec<Line<'static>>,
    placeholder: Option<&'a str>,
    footer: Vec<Line<'static>>,
    cursor: ListCursor,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> RecordList<'a> {
    pub fn new(
        title: impl Into<String>,
        rows: Vec<Line<'static>>,
        cursor: ListCursor,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            title: title.into(),
            rows,
            placeholder: None,
            footer: Vec::new(),
            cursor,
            focused,
            theme,
        }
    }

    /// Replace the rows with a single centred-ish message.
    pub fn placeholder(mut self, text: Option<&'a str>) -> Self {
        self.placeholder = text;
        self
    }

    /// Lines pinned to the bottom of the pane ("show more" hints, notes).
    pub fn footer(mut self, lines: Vec<Line<'static>>) -> Self {
        self.footer = lines;
        self
    }
}

impl Widget for RecordList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(self.title.as_str())
            .border_style(self.theme.border(self.focused));
        let inner = block.inner(area);
        block.render(area, buf);

        let footer_height = (self.footer.len() as u16).min(inner.height);
        let list_area = Rect {
            height: inner.height - footer_height,
            ..inner
        };
        let footer_area = Rect {
            y: list_area.bottom(),
            height: footer_height,
            ..inner
        };
        Paragraph::new(self.footer).render(footer_area, buf);

        if let Some(text) = self.placeholder {
            Paragraph::new(Line::from(Span::styled(format!(" {text}"), self.theme.placeholder)))
                .render(list_area, buf);
            return;
        }

        let height = list_area.height as usize;
        let total = self.rows.len();
        let start = self.cursor.offset(total, height);
        let end = (start + height).min(total);
        let selected = if self.focused {
            self.cursor.selected(total)
        } else {
            None
        };

        let lines: Vec<Line<'static>> = self
            .rows
            .into_iter()
            .enumerate()
            .skip(start)
            .take(end - start)
            .map(|(idx, line)| {
                if Some(idx) == selected {
                    line.patch_style(Style::default().add_modifier(Modifier::REVERSED))
                } else {
                    line
                }
            })
            .collect();

        let text_area = Rect {
            width: list_area.width.saturating_sub(1),
            ..list_area
        };
        let sb_area = Rect {
            x: list_area.right().saturating_sub(1),
            width: 1,
            ..list_area
        };
        Paragraph::new(lines).render(text_area, buf);

        if total > height {
            let mut sb_state = ScrollbarState::new(total)
                .position(start)
                .viewport_content_length(height);
            StatefulWidget::render(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(None)
                    .end_symbol(None),
                sb_area,
                buf,
                &mut sb_state,
            );
        }
    }
}
