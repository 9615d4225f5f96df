//! Detail popup for the selected record.

use super::help::centered_rect;
use crate::theme::Theme;
use kdash_core::locale::{format_date, NO_DESCRIPTION};
use kdash_core::Record;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget, Wrap},
};

pub struct DetailPopup<'a> {
    record: &'a Record,
    theme: &'a Theme,
}

impl<'a> DetailPopup<'a> {
    pub fn new(record: &'a Record, theme: &'a Theme) -> Self {
        Self { record, theme }
    }

    /// `issuer · date`, leaving out whichever part is missing.
    fn byline(&self) -> String {
        let date = self
            .record
            .published_at
            .or(self.record.date)
            .map(|d| format_date(&d));
        let parts: Vec<String> = [Some(self.record.issuer.clone()), date]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        parts.join(" · ")
    }
}

impl Widget for DetailPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width.saturating_mul(3) / 4;
        let height = area.height.saturating_mul(2) / 3;
        let popup = centered_rect(width.max(30), height.max(8), area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" Tiedot (Esc sulkee) ")
            .border_style(self.theme.border_focused);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let description = if self.record.description.trim().is_empty() {
            NO_DESCRIPTION
        } else {
            self.record.description.as_str()
        };

        let mut lines = vec![
            Line::from(Span::styled(
                self.record.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(self.byline(), self.theme.date)),
            Line::default(),
            Line::from(description.to_string()),
        ];
        if !self.record.link.is_empty() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                self.record.link.clone(),
                Style::default().add_modifier(Modifier::UNDERLINED),
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kdash_core::Category;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(record: &Record) -> String {
        let theme = Theme::load_default();
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|frame| frame.render_widget(DetailPopup::new(record, &theme), frame.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn missing_description_shows_fallback() {
        let record = Record::new(Category::Decision, "Otsikko", "Otsikko", "", "Lautakunta");
        assert!(render(&record).contains(NO_DESCRIPTION));
    }

    #[test]
    fn byline_joins_issuer_and_date() {
        let at = NaiveDate::from_ymd_opt(2025, 5, 12)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let record = Record::new(Category::Decision, "X", "X", "kuvaus", "Kaupunginhallitus")
            .with_published("", Some(at))
            .with_link("https://example.invalid/1");
        let theme = Theme::load_default();
        let popup = DetailPopup::new(&record, &theme);
        assert_eq!(popup.byline(), "Kaupunginhallitus · 12.5.2025");
        assert!(render(&record).contains("https://example.invalid/1"));
    }
}
