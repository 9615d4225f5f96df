//! Title splitting and embedded date extraction.
//!
//! Council feeds encode the issuing body as a `"<issuer> / <title>"` prefix
//! and meeting/agenda feeds embed the meeting day as `D.M.YYYY` somewhere in
//! the title. Both conventions are handled here so the normalizer stays a
//! thin mapping layer.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// Separator between the issuer and the actual title.
pub const ISSUER_SEPARATOR: &str = " / ";

static DOTTED_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,2})\.([0-9]{1,2})\.([0-9]{4})").expect("dotted date pattern is valid")
});

/// Split a composite title into `(issuer, title)`.
///
/// Everything before the first `" / "` is the issuer; the rest (re-joined
/// with `" / "` when the separator occurs more than once) is the title.
/// Without a separator the issuer is `organization` and the whole string is
/// the title.
pub fn split_issuer(raw: &str, organization: &str) -> (String, String) {
    match raw.split_once(ISSUER_SEPARATOR) {
        Some((issuer, rest)) => (issuer.trim().to_string(), rest.trim().to_string()),
        None => (organization.to_string(), raw.to_string()),
    }
}

/// A calendar date found inside a title, with the byte range it occupied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    pub date: NaiveDate,
    pub range: Range<usize>,
}

/// Find the first `D.M.YYYY` / `DD.MM.YYYY` substring and turn it into a date.
///
/// Only the first match is considered. A match that is not a real calendar
/// date (e.g. `31.2.2025`) yields `None`.
pub fn extract_date(text: &str) -> Option<DateMatch> {
    let caps = DOTTED_DATE.captures(text)?;
    let whole = caps.get(0)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(DateMatch {
        date,
        range: whole.range(),
    })
}

/// Agenda form of [`extract_date`]: also removes the matched substring and
/// the whitespace around it from the title.
///
/// `"Kaupunginhallitus 12.5.2025 esityslista"` becomes
/// `("Kaupunginhallitus esityslista", Some(2025-05-12))`. Titles without a
/// valid date come back trimmed but otherwise untouched.
pub fn strip_date(title: &str) -> (String, Option<NaiveDate>) {
    let Some(found) = extract_date(title) else {
        return (title.trim().to_string(), None);
    };
    let left = title[..found.range.start].trim();
    let right = title[found.range.end..].trim();
    let stripped = match (left.is_empty(), right.is_empty()) {
        (false, false) => format!("{left} {right}"),
        (false, true) => left.to_string(),
        (true, _) => right.to_string(),
    };
    (stripped, Some(found.date))
}

/// Midnight at the start of `date`, the instant a title date stands for.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

/// Unix epoch as a naive timestamp; the sort key of undatable news.
pub fn epoch() -> NaiveDateTime {
    DateTime::<Utc>::UNIX_EPOCH.naive_utc()
}

/// Parse an RSS `pubDate` (RFC 822 style), falling back to RFC 3339.
///
/// The result is converted to local time. `None` when neither format fits.
pub fn parse_pub_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(s)
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .ok()
        .map(|dt| dt.with_timezone(&Local).naive_local())
}

/// Sort key for news items.
///
/// Tries a dotted `D.M.YYYY` date embedded in the published label first,
/// then generic formats, and falls back to the Unix epoch so unparseable
/// items sort last in a newest-first ordering.
pub fn parse_news_date(label: &str) -> NaiveDateTime {
    let label = label.trim();
    if label.is_empty() {
        return epoch();
    }
    if let Some(found) = extract_date(label) {
        return start_of_day(found.date);
    }
    parse_pub_date(label)
        .or_else(|| {
            NaiveDateTime::parse_from_str(label, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(label, "%Y-%m-%d %H:%M:%S"))
                .ok()
        })
        .or_else(|| {
            NaiveDate::parse_from_str(label, "%Y-%m-%d")
                .ok()
                .map(start_of_day)
        })
        .unwrap_or_else(epoch)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn split_on_first_separator() {
        assert_eq!(
            split_issuer("Kaupunginhallitus / Talousarvio 2025", "Kokkola"),
            ("Kaupunginhallitus".to_string(), "Talousarvio 2025".to_string())
        );
    }

    #[test]
    fn split_rejoins_remaining_separators() {
        assert_eq!(
            split_issuer("Tekninen lautakunta / Kaava / Muutos", "Kokkola"),
            ("Tekninen lautakunta".to_string(), "Kaava / Muutos".to_string())
        );
    }

    #[test]
    fn no_separator_uses_organization() {
        assert_eq!(
            split_issuer("Talousarvio 2025", "Kokkola"),
            ("Kokkola".to_string(), "Talousarvio 2025".to_string())
        );
        // A bare slash without surrounding spaces is not the separator.
        assert_eq!(split_issuer("A/B", "Kokkola").0, "Kokkola");
    }

    #[rstest]
    #[case("Kaupunginhallitus 12.5.2025 esityslista", ymd(2025, 5, 12))]
    #[case("Valtuusto 01.09.2026", ymd(2026, 9, 1))]
    #[case("3.1.2027 ylimääräinen kokous", ymd(2027, 1, 3))]
    fn extracts_dotted_dates(#[case] title: &str, #[case] expected: NaiveDate) {
        assert_eq!(extract_date(title).map(|m| m.date), Some(expected));
    }

    #[rstest]
    #[case("Kokous 31.2.2025")]
    #[case("Kokous 12.13.2025")]
    #[case("Kokous 0.5.2025")]
    #[case("Kokous 12.5.25")]
    #[case("Ei päivämäärää")]
    fn invalid_or_missing_dates_yield_none(#[case] title: &str) {
        assert_eq!(extract_date(title), None);
    }

    #[test]
    fn strip_removes_date_and_surrounding_space() {
        assert_eq!(
            strip_date("Kaupunginhallitus 12.5.2025 esityslista"),
            ("Kaupunginhallitus esityslista".to_string(), Some(ymd(2025, 5, 12)))
        );
        assert_eq!(
            strip_date("Kaupunginvaltuusto 8.6.2026"),
            ("Kaupunginvaltuusto".to_string(), Some(ymd(2026, 6, 8)))
        );
    }

    #[test]
    fn strip_keeps_title_with_invalid_date() {
        assert_eq!(
            strip_date(" Kokous 31.2.2025 "),
            ("Kokous 31.2.2025".to_string(), None)
        );
    }

    #[test]
    fn pub_date_rfc2822_and_garbage() {
        let parsed = parse_pub_date("Mon, 12 May 2025 12:00:00 +0000").unwrap();
        assert_eq!(parsed.date(), ymd(2025, 5, 12));
        assert_eq!(parse_pub_date("eilen"), None);
        assert_eq!(parse_pub_date(""), None);
    }

    #[test]
    fn news_date_prefers_dotted_label() {
        assert_eq!(
            parse_news_date("Julkaistu 4.3.2026 klo 12.15"),
            start_of_day(ymd(2026, 3, 4))
        );
        assert_eq!(parse_news_date("2026-03-05"), start_of_day(ymd(2026, 3, 5)));
    }

    #[test]
    fn news_date_defaults_to_epoch() {
        assert_eq!(parse_news_date(""), epoch());
        assert_eq!(parse_news_date("joskus"), epoch());
    }

    proptest! {
        #[test]
        fn split_never_panics_and_reassembles(a in "[A-Za-zäö ]{1,12}", b in "[A-Za-zäö /]{0,20}") {
            let a = a.trim().to_string();
            prop_assume!(!a.is_empty() && !a.contains(" / "));
            let raw = format!("{a}{ISSUER_SEPARATOR}{b}");
            let (issuer, title) = split_issuer(&raw, "Kokkola");
            prop_assert_eq!(issuer, a);
            prop_assert_eq!(title, b.trim());
        }

        #[test]
        fn extract_date_never_panics(s in "\\PC{0,40}") {
            let _ = extract_date(&s);
            let _ = strip_date(&s);
        }
    }
}
