//! Headline statistics: three cards side by side.

use crate::theme::Theme;
use kdash_core::stats::{Indicator, Stats};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

pub struct StatsBar<'a> {
    stats: &'a Stats,
    theme: &'a Theme,
}

impl<'a> StatsBar<'a> {
    pub fn new(stats: &'a Stats, theme: &'a Theme) -> Self {
        Self { stats, theme }
    }

    fn card(&self, indicator: &Indicator) -> Paragraph<'static> {
        let mut lines = vec![Line::from(Span::styled(
            indicator.value_text().to_string(),
            self.theme.stat_value,
        ))];
        if let Some(change) = &indicator.change {
            lines.push(Line::from(Span::styled(
                change.clone(),
                self.theme.trend_style(indicator.trend),
            )));
        }
        Paragraph::new(lines).block(
            Block::bordered()
                .title(format!(" {} ", indicator.label))
                .border_style(self.theme.border_unfocused),
        )
    }
}

impl Widget for StatsBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cols = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(area);
        for (indicator, col) in self.stats.cards().into_iter().zip(cols.iter()) {
            self.card(indicator).render(*col, buf);
        }
    }
}
