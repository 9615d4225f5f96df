//! Core types for kdash-core.
//!
//! This module defines the fundamental data structures shared across all
//! pipeline layers: the normalised [`Record`], the feed [`Category`] it came
//! from, and the [`Status`] tag the decision filters evaluate.

use chrono::NaiveDateTime;
use serde::Serialize;

/// A normalised feed item produced by the normalizer and held by the store.
///
/// Records are built once at ingestion and never mutated afterwards; a new
/// load of the same category replaces them wholesale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Display title. The issuer prefix is removed for decisions and meetings,
    /// the embedded date is removed for agendas.
    pub title: String,
    pub description: String,
    pub link: String,
    /// Publication label exactly as the feed delivered it (`pubDate` or
    /// `julkaistu`). Empty when absent.
    pub published: String,
    /// Parsed publication time in local time. `None` when unparseable.
    pub published_at: Option<NaiveDateTime>,
    /// The date the filters and orderings compare against "now".
    pub date: Option<NaiveDateTime>,
    pub category: Category,
    pub issuer: String,
    /// Lowercased `full title + " " + description`, the search haystack.
    #[serde(skip)]
    raw_text: String,
}

impl Record {
    /// Build a record. `full_title` is the title as received from the feed
    /// (before issuer/date stripping) and only feeds the search text.
    pub fn new(
        category: Category,
        full_title: &str,
        title: impl Into<String>,
        description: impl Into<String>,
        issuer: impl Into<String>,
    ) -> Self {
        let description = description.into();
        let raw_text = format!("{} {}", full_title, description).to_lowercase();
        Self {
            title: title.into(),
            description,
            link: String::new(),
            published: String::new(),
            published_at: None,
            date: None,
            category,
            issuer: issuer.into(),
            raw_text,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    pub fn with_published(mut self, label: impl Into<String>, at: Option<NaiveDateTime>) -> Self {
        self.published = label.into();
        self.published_at = at;
        self
    }

    pub fn with_date(mut self, date: Option<NaiveDateTime>) -> Self {
        self.date = date;
        self
    }

    /// Lowercased search text. Computed once in [`Record::new`].
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Status tag used by the decision filters. Only decisions and meeting
    /// items carry one.
    pub fn status(&self) -> Option<Status> {
        match self.category {
            Category::Decision => Some(Status::Passed),
            Category::Meeting => Some(Status::Meeting),
            Category::Agenda | Category::News => None,
        }
    }

    /// Case-insensitive substring match against the precomputed search text.
    /// `query` must already be lowercase; empty matches everything.
    pub fn matches(&self, query: &str) -> bool {
        query.is_empty() || self.raw_text.contains(query)
    }
}

/// Which feed a record was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Decision,
    Meeting,
    Agenda,
    News,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Decision => write!(f, "decision"),
            Category::Meeting => write!(f, "meeting"),
            Category::Agenda => write!(f, "agenda"),
            Category::News => write!(f, "news"),
        }
    }
}

/// Status tag of an item in the decisions list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// A published decision.
    Passed,
    /// A meeting item (proposal until its meeting date has passed).
    Meeting,
}

impl Status {
    /// Finnish badge text shown next to the item.
    pub fn label(self) -> &'static str {
        match self {
            Status::Passed => "Päätös",
            Status::Meeting => "Kokous",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Passed => write!(f, "passed"),
            Status::Meeting => write!(f, "meeting"),
        }
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "passed" => Ok(Status::Passed),
            "meeting" => Ok(Status::Meeting),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_text_is_lowercase_title_and_description() {
        let r = Record::new(
            Category::Decision,
            "Kaupunginhallitus / Talousarvio 2025",
            "Talousarvio 2025",
            "Päätös HYVÄKSYTTY",
            "Kaupunginhallitus",
        );
        assert_eq!(
            r.raw_text(),
            "kaupunginhallitus / talousarvio 2025 päätös hyväksytty"
        );
    }

    #[test]
    fn empty_query_matches() {
        let r = Record::new(Category::News, "Otsikko", "Otsikko", "", "kokkola");
        assert!(r.matches(""));
        assert!(r.matches("otsik"));
        assert!(!r.matches("satama"));
    }

    #[test]
    fn status_follows_category() {
        let mk = |c| Record::new(c, "t", "t", "", "x");
        assert_eq!(mk(Category::Decision).status(), Some(Status::Passed));
        assert_eq!(mk(Category::Meeting).status(), Some(Status::Meeting));
        assert_eq!(mk(Category::Agenda).status(), None);
    }
}
