//! Row builders for the record panes.

use crate::theme::Theme;
use kdash_core::filter::news::NewsView;
use kdash_core::filter::Shown;
use kdash_core::locale::{format_date, format_date_with_weekday};
use kdash_core::Record;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use std::ops::Range;

/// Placeholder for records that arrived without a title.
const NO_TITLE: &str = "–";

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

/// Split `title` into spans with `range` drawn in `highlight`.
pub fn title_spans(
    title: &str,
    range: Option<&Range<usize>>,
    base: Style,
    highlight: Style,
) -> Vec<Span<'static>> {
    let title = if title.is_empty() { NO_TITLE } else { title };
    match range {
        Some(r) if r.end <= title.len() => vec![
            Span::styled(title[..r.start].to_string(), base),
            Span::styled(title[r.clone()].to_string(), highlight),
            Span::styled(title[r.end..].to_string(), base),
        ],
        _ => vec![Span::styled(title.to_string(), base)],
    }
}

fn display_date(record: &Record) -> String {
    record
        .published_at
        .or(record.date)
        .map(|d| format_date(&d))
        .unwrap_or_default()
}

/// `Päätös  12.5.2025  Kaupunginhallitus │ Talousarvio 2025`
pub fn decision_row(shown: &Shown<'_>, show_dates: bool, theme: &Theme) -> Line<'static> {
    let record = shown.record;
    let status = record.status();
    let mut spans = vec![Span::styled(
        format!("{:<7} ", status.map(|s| s.label()).unwrap_or_default()),
        theme.status_style(status),
    )];
    if show_dates {
        spans.push(Span::styled(format!("{:<10} ", display_date(record)), theme.date));
    }
    spans.push(Span::styled(
        format!("{} ", record.issuer),
        theme.issuer_style(&record.issuer),
    ));
    spans.push(Span::styled("│ ", dim()));
    spans.extend(title_spans(
        &record.title,
        shown.highlight.as_ref(),
        Style::default(),
        theme.search_highlight,
    ));
    Line::from(spans)
}

/// `ma 12.5.2025  Kaupunginhallitus esityslista`
pub fn agenda_row(record: &Record, theme: &Theme) -> Line<'static> {
    let date = record
        .date
        .map(|d| format_date_with_weekday(&d))
        .unwrap_or_default();
    let mut spans = vec![Span::styled(format!("{date:<13} "), theme.date)];
    spans.extend(title_spans(&record.title, None, Style::default(), Style::default()));
    Line::from(spans)
}

/// `4.3.2026  Satama laajenee`, with the query highlighted while searching.
pub fn news_row(record: &Record, query: &str, theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    if !record.published.is_empty() {
        spans.push(Span::styled(format!("{} ", record.published), theme.date));
    }
    let range = kdash_core::filter::highlight(&record.title, query);
    spans.extend(title_spans(
        &record.title,
        range.as_ref(),
        Style::default().add_modifier(Modifier::BOLD),
        theme.search_highlight,
    ));
    Line::from(spans)
}

/// Footer hints of a news pane.
pub fn news_footer(view: &NewsView<'_>, theme: &Theme) -> Vec<Line<'static>> {
    if view.searching {
        return Vec::new();
    }
    if view.remaining > 0 {
        vec![Line::from(Span::styled(
            format!("+ Näytä lisää ({} uutista)", view.remaining),
            theme.hint,
        ))]
    } else if view.show_less {
        vec![Line::from(Span::styled("↑ Näytä vähemmän", theme.hint))]
    } else {
        Vec::new()
    }
}
