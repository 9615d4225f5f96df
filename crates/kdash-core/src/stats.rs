//! Headline statistics: population, share of under-18s and unemployment.
//!
//! The proxy serves them precomputed as one JSON object ([`StatsPayload`]).
//! The statistics-API variant assembles the same payload from PxWeb
//! selection queries ([`PxQuery`], [`first_value`]). Either way the panel
//! renders [`Stats`], built by [`Stats::from_payload`].

use crate::config::{IndicatorQuery, StatsConfig};
use crate::locale::{group_thousands, STAT_UNAVAILABLE};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// `/stats` response. Any value may be missing or `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPayload {
    #[serde(default)]
    pub vaesto: Option<f64>,
    #[serde(default)]
    pub vaesto_prev: Option<f64>,
    #[serde(default)]
    pub nuoret: Option<f64>,
    #[serde(default)]
    pub nuoret_prev: Option<f64>,
    #[serde(default)]
    pub tyottomyys: Option<f64>,
    #[serde(default)]
    pub tyottomyys_prev: Option<f64>,
    /// Month label of the unemployment figure.
    #[serde(default)]
    pub tyottomyys_kk: Option<String>,
}

// ---------------------------------------------------------------------------
// Display model
// ---------------------------------------------------------------------------

/// Direction of change against the comparison period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Neutral,
}

impl Trend {
    fn of(diff: f64) -> Self {
        if diff > 0.0 {
            Trend::Up
        } else if diff < 0.0 {
            Trend::Down
        } else {
            Trend::Neutral
        }
    }
}

/// One stat card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Indicator {
    pub label: &'static str,
    /// Formatted headline value, `None` when unavailable.
    pub value: Option<String>,
    pub change: Option<String>,
    pub trend: Trend,
}

impl Indicator {
    fn unavailable(label: &'static str) -> Self {
        Self {
            label,
            value: None,
            change: None,
            trend: Trend::Neutral,
        }
    }

    /// Headline value or the unavailable dash.
    pub fn value_text(&self) -> &str {
        self.value.as_deref().unwrap_or(STAT_UNAVAILABLE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub population: Indicator,
    pub youth_share: Indicator,
    pub unemployment: Indicator,
}

/// Period labels used in the change texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Periods {
    pub year: String,
    pub previous_year: String,
}

impl Default for Periods {
    fn default() -> Self {
        Self {
            year: "2024".to_string(),
            previous_year: "2023".to_string(),
        }
    }
}

impl From<&StatsConfig> for Periods {
    fn from(cfg: &StatsConfig) -> Self {
        Self {
            year: cfg.population.period.clone(),
            previous_year: cfg.population.previous.clone(),
        }
    }
}

impl Stats {
    /// Every card shows the unavailable dash.
    pub fn unavailable() -> Self {
        Self {
            population: Indicator::unavailable("Väkiluku"),
            youth_share: Indicator::unavailable("Alle 18-vuotiaat"),
            unemployment: Indicator::unavailable("Työttömyysaste"),
        }
    }

    pub fn from_payload(p: &StatsPayload, periods: &Periods) -> Self {
        let mut stats = Self::unavailable();
        let years = format!("({} vs {})", periods.year, periods.previous_year);

        if let Some(value) = finite(p.vaesto) {
            stats.population.value = Some(group_thousands(value.round() as i64));
            if let Some(prev) = finite(p.vaesto_prev) {
                let diff = value - prev;
                stats.population.change = Some(format!(
                    "{}{} hlö {years}",
                    sign(diff),
                    group_thousands(diff.round() as i64)
                ));
                stats.population.trend = Trend::of(diff);
            }
        }

        if let Some(value) = finite(p.nuoret) {
            stats.youth_share.value = Some(format!("{value:.1}%"));
            if let Some(prev) = finite(p.nuoret_prev) {
                let diff = value - prev;
                stats.youth_share.change = Some(format!("{}{diff:.1}% {years}", sign(diff)));
                stats.youth_share.trend = Trend::of(diff);
            }
        }

        if let Some(value) = finite(p.tyottomyys) {
            stats.unemployment.value = Some(format!("{value:.1}%"));
            if let Some(prev) = finite(p.tyottomyys_prev) {
                let diff = value - prev;
                let month = p.tyottomyys_kk.as_deref().unwrap_or_default();
                stats.unemployment.change = Some(format!(
                    "{}{diff:.1}% vs vuosi sitten ({month})",
                    sign(diff)
                ));
                stats.unemployment.trend = Trend::of(diff);
            }
        }

        stats
    }

    pub fn cards(&self) -> [&Indicator; 3] {
        [&self.population, &self.youth_share, &self.unemployment]
    }
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

fn sign(diff: f64) -> &'static str {
    if diff >= 0.0 {
        "+"
    } else {
        ""
    }
}

// ---------------------------------------------------------------------------
// PxWeb
// ---------------------------------------------------------------------------

/// PxWeb selection query body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PxQuery {
    pub query: Vec<PxSelection>,
    pub response: PxResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PxSelection {
    pub code: String,
    pub selection: PxFilter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PxFilter {
    pub filter: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PxResponse {
    pub format: String,
}

impl PxQuery {
    /// Select one area, one indicator and one period. Periods such as
    /// `2025M06` select the monthly dimension, plain years the yearly one.
    pub fn new(area_code: &str, indicator: &str, period: &str) -> Self {
        let period_code = if period.contains('M') { "Kuukausi" } else { "Vuosi" };
        let item = |code: &str, value: &str| PxSelection {
            code: code.to_string(),
            selection: PxFilter {
                filter: "item".to_string(),
                values: vec![value.to_string()],
            },
        };
        Self {
            query: vec![
                item("Alue", area_code),
                item("Tiedot", indicator),
                item(period_code, period),
            ],
            response: PxResponse {
                format: "json".to_string(),
            },
        }
    }

    /// Current and comparison queries for one configured indicator.
    pub fn pair(area_code: &str, q: &IndicatorQuery) -> (Self, Self) {
        (
            Self::new(area_code, &q.indicator, &q.period),
            Self::new(area_code, &q.indicator, &q.previous),
        )
    }
}

/// The scalar of interest in a PxWeb response: `data[0].values[0]`, which
/// the API serves as a string.
pub fn first_value(response: &serde_json::Value) -> Option<f64> {
    let v = response.get("data")?.get(0)?.get("values")?.get(0)?;
    match v {
        serde_json::Value::String(s) => s.trim().parse().ok(),
        serde_json::Value::Number(n) => n.as_f64(),
        _ => None,
    }
}
