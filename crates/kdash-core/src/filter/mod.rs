//! Filter engine: category, text and pagination rules over the store.
//!
//! The decisions list is driven by an immutable [`FilterState`]. User input
//! becomes a [`FilterAction`], [`FilterState::apply`] returns the next state,
//! and [`evaluate`] projects the current records through it. Nothing here
//! holds on to records between renders.
//!
//! News paging lives in [`news`], agenda ordering in [`agenda`].

pub mod agenda;
pub mod news;

use crate::types::{Record, Status};
use chrono::NaiveDateTime;
use std::ops::Range;
use std::str::FromStr;

/// Items shown before "show more" when no query is active.
pub const DEFAULT_PAGE_SIZE: usize = 15;

// ---------------------------------------------------------------------------
// Category filter
// ---------------------------------------------------------------------------

/// Category filter of the decisions list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionFilter {
    All,
    /// Published decisions only (`viranomais`).
    OfficialOnly,
    /// Decisions plus meeting items whose date has passed (`paatokset`).
    Decided,
    /// Meeting items without a date or dated now or later (`esitykset`).
    Proposed,
    /// Exact status-tag equality.
    Status(Status),
}

impl DecisionFilter {
    /// Filters in the order the filter key cycles through them.
    pub const CYCLE: [DecisionFilter; 4] = [
        DecisionFilter::All,
        DecisionFilter::OfficialOnly,
        DecisionFilter::Decided,
        DecisionFilter::Proposed,
    ];

    pub fn matches(&self, record: &Record, now: NaiveDateTime) -> bool {
        let status = record.status();
        match self {
            DecisionFilter::All => true,
            DecisionFilter::OfficialOnly => status == Some(Status::Passed),
            DecisionFilter::Decided => match status {
                Some(Status::Passed) => true,
                Some(Status::Meeting) => record.date.is_some_and(|d| d < now),
                None => false,
            },
            DecisionFilter::Proposed => {
                status == Some(Status::Meeting) && record.date.map_or(true, |d| d >= now)
            }
            DecisionFilter::Status(tag) => status == Some(*tag),
        }
    }

    /// Next filter in [`DecisionFilter::CYCLE`]; status filters wrap to `All`.
    pub fn next(self) -> Self {
        let pos = Self::CYCLE.iter().position(|f| *f == self);
        match pos {
            Some(i) => Self::CYCLE[(i + 1) % Self::CYCLE.len()],
            None => DecisionFilter::All,
        }
    }

    /// Finnish name shown in the list header.
    pub fn label(&self) -> &'static str {
        match self {
            DecisionFilter::All => "Kaikki",
            DecisionFilter::OfficialOnly => "Viranomaispäätökset",
            DecisionFilter::Decided => "Päätetyt",
            DecisionFilter::Proposed => "Esitykset",
            DecisionFilter::Status(tag) => tag.label(),
        }
    }
}

impl std::fmt::Display for DecisionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionFilter::All => write!(f, "all"),
            DecisionFilter::OfficialOnly => write!(f, "viranomais"),
            DecisionFilter::Decided => write!(f, "paatokset"),
            DecisionFilter::Proposed => write!(f, "esitykset"),
            DecisionFilter::Status(tag) => write!(f, "{tag}"),
        }
    }
}

impl FromStr for DecisionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "kaikki" => Ok(DecisionFilter::All),
            "viranomais" => Ok(DecisionFilter::OfficialOnly),
            "paatokset" | "päätökset" => Ok(DecisionFilter::Decided),
            "esitykset" => Ok(DecisionFilter::Proposed),
            other => other
                .parse::<Status>()
                .map(DecisionFilter::Status)
                .map_err(|_| format!("unknown filter: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Everything a decisions-list render depends on besides the records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub filter: DecisionFilter,
    /// Trimmed, lowercased query. Empty means no text filter.
    pub query: String,
    /// Set by "show more"; stays set until the filter changes.
    pub show_all: bool,
    pub page_size: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// A user interaction that changes the decisions list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    SetFilter(DecisionFilter),
    SetQuery(String),
    ClearQuery,
    ShowMore,
}

impl FilterState {
    pub fn new(page_size: usize) -> Self {
        Self {
            filter: DecisionFilter::All,
            query: String::new(),
            show_all: false,
            page_size,
        }
    }

    /// Return the state after `action`. `self` is left untouched.
    pub fn apply(&self, action: FilterAction) -> FilterState {
        let mut next = self.clone();
        match action {
            FilterAction::SetFilter(filter) => {
                next.filter = filter;
                next.show_all = false;
            }
            FilterAction::SetQuery(query) => next.query = query.trim().to_lowercase(),
            FilterAction::ClearQuery => next.query.clear(),
            FilterAction::ShowMore => next.show_all = true,
        }
        tracing::debug!(
            filter = %next.filter,
            query = %next.query,
            show_all = next.show_all,
            "filter state updated"
        );
        next
    }

    /// Whether the page cap applies to the next render.
    pub fn paginates(&self) -> bool {
        !self.show_all && self.query.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// One record in the rendered list, with the byte range of the query match
/// inside its title.
#[derive(Debug, Clone, PartialEq)]
pub struct Shown<'a> {
    pub record: &'a Record,
    pub highlight: Option<Range<usize>>,
}

/// Projection of the decisions list for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionView<'a> {
    pub shown: Vec<Shown<'a>>,
    /// Records passing category and query filters, before the page cap.
    pub matching: usize,
    /// Count reported to the empty-state check; capped at the page size
    /// while paginating.
    pub visible_count: usize,
    /// True exactly when the page cap hides some matching records.
    pub show_more: bool,
}

impl DecisionView<'_> {
    pub fn is_empty(&self) -> bool {
        self.visible_count == 0
    }

    /// Number of matching records hidden by the page cap.
    pub fn hidden(&self) -> usize {
        self.matching - self.shown.len()
    }
}

/// Run the filter state over `items` in their render order.
pub fn evaluate<'a, I>(items: I, state: &FilterState, now: NaiveDateTime) -> DecisionView<'a>
where
    I: IntoIterator<Item = &'a Record>,
{
    let paginate = state.paginates();
    let mut shown = Vec::new();
    let mut matching = 0usize;

    for record in items {
        if !state.filter.matches(record, now) || !record.matches(&state.query) {
            continue;
        }
        matching += 1;
        if paginate && shown.len() >= state.page_size {
            continue;
        }
        shown.push(Shown {
            record,
            highlight: highlight(&record.title, &state.query),
        });
    }

    let visible_count = if paginate {
        matching.min(state.page_size)
    } else {
        matching
    };

    DecisionView {
        shown,
        matching,
        visible_count,
        show_more: paginate && matching > state.page_size,
    }
}

// ---------------------------------------------------------------------------
// Highlighting
// ---------------------------------------------------------------------------

/// Byte range of the first case-insensitive occurrence of `query` in
/// `title`. Only the first occurrence is ever marked.
pub fn highlight(title: &str, query: &str) -> Option<Range<usize>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    // Search the lowercased title as a whole so context-sensitive mappings
    // (final sigma) agree with record matching, then map back to `title`.
    let found = title.to_lowercase().find(&needle)?;
    let found_end = found + needle.len();
    let mut start = None;
    let mut lowered = 0;
    for (offset, ch) in title.char_indices() {
        lowered += ch.to_lowercase().map(char::len_utf8).sum::<usize>();
        if start.is_none() && found < lowered {
            start = Some(offset);
        }
        if let Some(start) = start {
            if found_end <= lowered {
                return Some(start..offset + ch.len_utf8());
            }
        }
    }
    None
}

/// `title` with the highlighted range wrapped in `open`/`close`.
pub fn mark(title: &str, range: Option<&Range<usize>>, open: &str, close: &str) -> String {
    match range {
        Some(r) => format!(
            "{}{open}{}{close}{}",
            &title[..r.start],
            &title[r.clone()],
            &title[r.end..]
        ),
        None => title.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
