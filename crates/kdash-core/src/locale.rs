//! Finnish (`fi-FI`) display strings and number/date formatting.

use chrono::{Datelike, NaiveDateTime, Weekday};

pub const LOADING_DECISIONS: &str = "⏳ Ladataan päätöksiä...";
pub const NO_DECISIONS: &str = "⚠️ Ei päätöksiä saatavilla";
pub const DECISIONS_FAILED: &str = "⚠️ Virhe ladattaessa päätöksiä.";
pub const MEETINGS_FAILED: &str = "⚠️ Virhe ladattaessa kokousasioita.";
pub const NO_MEETINGS: &str = "Ei kokouksia";
pub const AGENDAS_FAILED: &str = "Virhe ladattaessa kokouksia";
pub const NO_NEWS: &str = "Ei uutisia saatavilla";
pub const NEWS_FAILED: &str = "Virhe ladattaessa uutisia";
pub const NO_RESULTS: &str = "Ei hakutuloksia";
pub const NO_DESCRIPTION: &str = "Ei kuvausta saatavilla.";
pub const STAT_UNAVAILABLE: &str = "–";
pub const LOADING: &str = "⏳ Ladataan...";

/// `12.5.2025`
pub fn format_date(dt: &NaiveDateTime) -> String {
    format!("{}.{}.{}", dt.day(), dt.month(), dt.year())
}

/// `ma 12.5.2025`: the agenda list format.
pub fn format_date_with_weekday(dt: &NaiveDateTime) -> String {
    format!("{} {}", weekday_short(dt.weekday()), format_date(dt))
}

fn weekday_short(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "ma",
        Weekday::Tue => "ti",
        Weekday::Wed => "ke",
        Weekday::Thu => "to",
        Weekday::Fri => "pe",
        Weekday::Sat => "la",
        Weekday::Sun => "su",
    }
}

/// Group an integer's digits in threes with a no-break space, the way the
/// `fi-FI` locale prints counts (`47 909`, `-1 204`).
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('\u{a0}');
        }
        out.push(ch);
    }
    out
}

/// `N kpl` count badge.
pub fn count_badge(n: usize) -> String {
    format!("{n} kpl")
}
