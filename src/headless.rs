//! Headless mode: print the decisions list without a terminal UI.
//!
//! Loads decisions and meeting items, runs them through the same filter
//! engine the dashboard uses and writes one line (or one JSON object) per
//! shown record. The "show more" hint follows when the page cap hid records.

use anyhow::bail;
use chrono::NaiveDateTime;
use kdash_core::{
    config::Config,
    filter::{self, DecisionFilter, DecisionView, FilterAction, FilterState},
    locale,
    stats::Periods,
    Category, Record, RegionState, Status, Store,
};
use kdash_feeds::{loader, FeedSource, LoadSettings, Loader};
use serde::Serialize;
use std::io::Write;

/// Output format of headless mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines with `[match]` markers.
    #[default]
    Text,
    /// One JSON object per line.
    Jsonl,
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessOptions {
    pub filter: Option<DecisionFilter>,
    pub query: Option<String>,
    /// Lift the page cap, like pressing "show more".
    pub all: bool,
    pub format: OutputFormat,
}

impl HeadlessOptions {
    /// Filter state these options describe.
    pub fn filter_state(&self, page_size: usize) -> FilterState {
        let mut state = FilterState::new(page_size);
        if let Some(f) = self.filter {
            state = state.apply(FilterAction::SetFilter(f));
        }
        if let Some(q) = &self.query {
            state = state.apply(FilterAction::SetQuery(q.clone()));
        }
        if self.all {
            state = state.apply(FilterAction::ShowMore);
        }
        state
    }
}

#[derive(Serialize)]
struct JsonRow<'a> {
    #[serde(flatten)]
    record: &'a Record,
    status: Option<Status>,
    /// Byte range of the query match in the title.
    highlight: Option<[usize; 2]>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load decisions and meetings from `source` into a fresh store.
///
/// Fails only when both feeds failed; one failing feed still yields the
/// other's records.
pub async fn load<S: FeedSource + 'static>(
    source: S,
    config: &Config,
    now: NaiveDateTime,
) -> anyhow::Result<Store> {
    let (tx, mut rx) = loader::channel();
    let loader = Loader::new(source, LoadSettings::from(config), tx);
    loader.spawn_decision_list();
    // The channel closes once the spawned tasks drop their senders.
    drop(loader);

    let mut store = Store::new(
        &config.news.topics,
        config.news.page_size,
        Periods::from(&config.stats),
    );
    while let Some(event) = rx.recv().await {
        store.apply_at(event, now);
    }

    if let (RegionState::Failed(_), RegionState::Failed(_)) = (
        store.region(Category::Decision),
        store.region(Category::Meeting),
    ) {
        bail!("every source failed ({})", config.proxy.base_url);
    }
    Ok(store)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Write the filtered decisions list to `out`.
pub fn render(
    store: &Store,
    config: &Config,
    opts: &HeadlessOptions,
    now: NaiveDateTime,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let state = opts.filter_state(config.dashboard.decisions_page_size);
    let view = filter::evaluate(store.decision_items(), &state, now);
    tracing::debug!(
        matching = view.matching,
        shown = view.shown.len(),
        "headless render"
    );

    match opts.format {
        OutputFormat::Text => render_text(store, &state, &view, config.ui.show_dates, out)?,
        OutputFormat::Jsonl => {
            for shown in &view.shown {
                let row = JsonRow {
                    record: shown.record,
                    status: shown.record.status(),
                    highlight: shown.highlight.as_ref().map(|r| [r.start, r.end]),
                };
                writeln!(out, "{}", serde_json::to_string(&row)?)?;
            }
        }
    }
    Ok(())
}

fn render_text(
    store: &Store,
    state: &FilterState,
    view: &DecisionView<'_>,
    show_dates: bool,
    out: &mut impl Write,
) -> std::io::Result<()> {
    if view.is_empty() {
        let text = match store.region(Category::Decision) {
            RegionState::Failed(msg) => msg.as_str(),
            _ if !state.query.is_empty() => locale::NO_RESULTS,
            _ => locale::NO_DECISIONS,
        };
        return writeln!(out, "{text}");
    }

    for shown in &view.shown {
        writeln!(out, "{}", text_line(shown.record, shown.highlight.as_ref(), show_dates))?;
    }
    if view.show_more {
        writeln!(out, "+ Näytä lisää ({} lisää, --all)", view.hidden())?;
    }
    if let RegionState::Failed(msg) = store.region(Category::Meeting) {
        writeln!(out, "{msg}")?;
    }
    Ok(())
}

/// `Päätös  12.5.2025  Kaupunginhallitus │ Talousarvio [2025]`
pub fn text_line(
    record: &Record,
    highlight: Option<&std::ops::Range<usize>>,
    show_dates: bool,
) -> String {
    let status = record.status().map(Status::label).unwrap_or_default();
    let title = filter::mark(&record.title, highlight, "[", "]");
    if show_dates {
        let date = record
            .published_at
            .or(record.date)
            .map(|d| locale::format_date(&d))
            .unwrap_or_default();
        format!("{status:<7} {date:<10} {} │ {title}", record.issuer)
    } else {
        format!("{status:<7} {} │ {title}", record.issuer)
    }
}
