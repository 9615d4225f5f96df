//! Test builders: ergonomic constructors for `Record`s and fixed clocks.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use chrono::{NaiveDate, NaiveDateTime};
use kdash_core::{Category, Record};

/// `YYYY-MM-DD HH:MM` as a local timestamp.
pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|day| day.and_hms_opt(h, min, 0))
        .expect("valid test timestamp")
}

/// Fixed "now" shared by the harnesses: 1.3.2026 12:00.
pub fn now() -> NaiveDateTime {
    at(2026, 3, 1, 12, 0)
}

// ---------------------------------------------------------------------------
// RecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Record`] fixtures.
///
/// # Example
///
/// ```rust,ignore
/// let r = RecordBuilder::meeting("Tekninen lautakunta 12.5.2026")
///     .issuer("Tekninen lautakunta")
///     .date(at(2026, 5, 12, 0, 0))
///     .build();
/// ```
pub struct RecordBuilder {
    category: Category,
    title: String,
    description: String,
    issuer: String,
    link: String,
    date: Option<NaiveDateTime>,
}

impl RecordBuilder {
    pub fn new(category: Category, title: impl Into<String>) -> Self {
        Self {
            category,
            title: title.into(),
            description: String::new(),
            issuer: "Kokkola".to_string(),
            link: String::new(),
            date: None,
        }
    }

    pub fn decision(title: impl Into<String>) -> Self {
        Self::new(Category::Decision, title)
    }

    pub fn meeting(title: impl Into<String>) -> Self {
        Self::new(Category::Meeting, title)
    }

    pub fn agenda(title: impl Into<String>) -> Self {
        Self::new(Category::Agenda, title)
    }

    pub fn news(title: impl Into<String>) -> Self {
        Self::new(Category::News, title)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    pub fn date(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(date);
        self
    }

    pub fn build(self) -> Record {
        Record::new(
            self.category,
            &self.title,
            self.title.clone(),
            self.description,
            self.issuer,
        )
        .with_link(self.link)
        .with_date(self.date)
    }
}

/// `n` decisions titled `"{prefix} {i}"`.
pub fn decisions(prefix: &str, n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| RecordBuilder::decision(format!("{prefix} {i}")).build())
        .collect()
}
