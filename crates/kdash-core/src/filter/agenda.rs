//! Agenda ordering and filtering.
//!
//! Agendas are split around "now": upcoming items (dated now or later, or
//! undated) and past items. Ingestion orders upcoming ascending followed by
//! past descending; the list view re-sorts by the active filter and always
//! truncates.

use crate::types::Record;
use chrono::{Datelike, NaiveDateTime};
use std::cmp::Ordering;
use std::str::FromStr;

/// Issuer name matched by [`AgendaFilter::CityBoard`].
pub const CITY_BOARD: &str = "kaupunginhallitus";

/// Default number of agenda rows.
pub const DEFAULT_AGENDA_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgendaFilter {
    All,
    #[default]
    Upcoming,
    Past,
    CityBoard,
}

impl AgendaFilter {
    pub const CYCLE: [AgendaFilter; 4] = [
        AgendaFilter::Upcoming,
        AgendaFilter::Past,
        AgendaFilter::CityBoard,
        AgendaFilter::All,
    ];

    pub fn next(self) -> Self {
        let i = Self::CYCLE.iter().position(|f| *f == self).unwrap_or(0);
        Self::CYCLE[(i + 1) % Self::CYCLE.len()]
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgendaFilter::All => "Kaikki",
            AgendaFilter::Upcoming => "Tulevat",
            AgendaFilter::Past => "Menneet",
            AgendaFilter::CityBoard => "Kaupunginhallitus",
        }
    }
}

impl std::fmt::Display for AgendaFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgendaFilter::All => write!(f, "kaikki"),
            AgendaFilter::Upcoming => write!(f, "tulevat"),
            AgendaFilter::Past => write!(f, "menneet"),
            AgendaFilter::CityBoard => write!(f, "kh"),
        }
    }
}

impl FromStr for AgendaFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kaikki" | "all" => Ok(AgendaFilter::All),
            "tulevat" | "upcoming" => Ok(AgendaFilter::Upcoming),
            "menneet" | "past" => Ok(AgendaFilter::Past),
            "kh" | CITY_BOARD => Ok(AgendaFilter::CityBoard),
            other => Err(format!("unknown agenda filter: {other}")),
        }
    }
}

/// Upcoming means dated now or later, or undated.
pub fn is_upcoming(record: &Record, now: NaiveDateTime) -> bool {
    record.date.map_or(true, |d| d >= now)
}

/// Ingestion order: upcoming ascending (undated first), then past
/// descending. Stable within equal dates.
pub fn order_ingested(records: &mut Vec<Record>, now: NaiveDateTime) {
    let (mut upcoming, mut past): (Vec<Record>, Vec<Record>) =
        records.drain(..).partition(|r| is_upcoming(r, now));
    upcoming.sort_by(ascending);
    past.sort_by(descending);
    records.extend(upcoming);
    records.extend(past);
}

// `None < Some(_)` gives undated items the front of an ascending list and the
// back of a descending one.
fn ascending(a: &Record, b: &Record) -> Ordering {
    a.date.cmp(&b.date)
}

fn descending(a: &Record, b: &Record) -> Ordering {
    b.date.cmp(&a.date)
}

/// Parameters of one agenda render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaQuery {
    pub filter: AgendaFilter,
    /// Lowercased title search. Empty matches everything.
    pub search: String,
    pub limit: usize,
    /// Past items older than this year are hidden.
    pub year_floor: i32,
}

impl Default for AgendaQuery {
    fn default() -> Self {
        Self {
            filter: AgendaFilter::default(),
            search: String::new(),
            limit: DEFAULT_AGENDA_LIMIT,
            year_floor: 2026,
        }
    }
}

impl AgendaQuery {
    fn keeps(&self, record: &Record, now: NaiveDateTime) -> bool {
        let title = record.title.to_lowercase();
        let by_filter = match self.filter {
            AgendaFilter::All => true,
            AgendaFilter::Upcoming => is_upcoming(record, now),
            AgendaFilter::Past => record
                .date
                .is_some_and(|d| d < now && d.year() >= self.year_floor),
            AgendaFilter::CityBoard => title.contains(CITY_BOARD),
        };
        by_filter && (self.search.is_empty() || title.contains(&self.search))
    }
}

/// Filter, order and truncate agendas for display.
pub fn agenda_view<'a>(
    records: &'a [Record],
    query: &AgendaQuery,
    now: NaiveDateTime,
) -> Vec<&'a Record> {
    let mut kept: Vec<&Record> = records.iter().filter(|r| query.keeps(r, now)).collect();
    if query.filter == AgendaFilter::Upcoming {
        kept.sort_by(|a, b| ascending(a, b));
    } else {
        kept.sort_by(|a, b| descending(a, b));
    }
    kept.truncate(query.limit);
    kept
}
