//! Store: in-memory record collections per category, plus news per topic and
//! the headline statistics.
//!
//! The store is the single source of truth; views are projections of it and
//! never hold state of their own. Loader tasks never touch the store
//! directly: they send [`LoadEvent`]s, and the owner applies them in arrival
//! order with [`Store::apply`].

use crate::error::FeedError;
use crate::filter::agenda;
use crate::filter::news::NewsFeed;
use crate::locale;
use crate::stats::{Periods, Stats, StatsPayload};
use crate::types::{Category, Record};
use chrono::{Local, NaiveDateTime};
use std::collections::{BTreeMap, HashMap};

// ---------------------------------------------------------------------------
// Events and region state
// ---------------------------------------------------------------------------

/// Completion report of one load task.
#[derive(Debug)]
pub enum LoadEvent {
    /// Decisions, meetings or agendas finished.
    Records {
        category: Category,
        result: Result<Vec<Record>, FeedError>,
    },
    /// A news topic finished. `limit` is set for "show more" refetches.
    News {
        topic: String,
        limit: Option<usize>,
        result: Result<Vec<Record>, FeedError>,
    },
    Stats(Result<StatsPayload, FeedError>),
}

/// Display state of one dashboard region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegionState {
    #[default]
    Loading,
    Ready,
    Empty,
    /// Localized message for the placeholder.
    Failed(String),
}

impl RegionState {
    fn for_len(len: usize) -> Self {
        if len == 0 {
            RegionState::Empty
        } else {
            RegionState::Ready
        }
    }
}

fn failure_text(category: Category) -> &'static str {
    match category {
        Category::Decision => locale::DECISIONS_FAILED,
        Category::Meeting => locale::MEETINGS_FAILED,
        Category::Agenda => locale::AGENDAS_FAILED,
        Category::News => locale::NEWS_FAILED,
    }
}

fn empty_text(category: Category) -> &'static str {
    match category {
        Category::Decision => locale::NO_DECISIONS,
        Category::Meeting | Category::Agenda => locale::NO_MEETINGS,
        Category::News => locale::NO_NEWS,
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Store {
    records: HashMap<Category, Vec<Record>>,
    regions: HashMap<Category, RegionState>,
    /// News topics in configured order; topics first seen in a load follow.
    topics: Vec<String>,
    news: BTreeMap<String, NewsFeed>,
    news_regions: BTreeMap<String, RegionState>,
    news_page_size: usize,
    stats: Stats,
    stats_region: RegionState,
    periods: Periods,
}

impl Store {
    /// An empty store with every region loading. `topics` fixes the news
    /// feeds the store tracks.
    pub fn new<S: AsRef<str>>(topics: &[S], news_page_size: usize, periods: Periods) -> Self {
        let news = topics
            .iter()
            .map(|t| {
                let t = t.as_ref().to_string();
                (t.clone(), NewsFeed::new(t, news_page_size))
            })
            .collect();
        let news_regions = topics
            .iter()
            .map(|t| (t.as_ref().to_string(), RegionState::Loading))
            .collect();
        Self {
            records: HashMap::new(),
            regions: HashMap::new(),
            topics: topics.iter().map(|t| t.as_ref().to_string()).collect(),
            news,
            news_regions,
            news_page_size,
            stats: Stats::unavailable(),
            stats_region: RegionState::Loading,
            periods,
        }
    }

    /// Replace the records of `category`. Agendas are reordered against the
    /// current local time.
    pub fn load(&mut self, category: Category, records: Vec<Record>) {
        self.load_at(category, records, Local::now().naive_local());
    }

    pub fn load_at(&mut self, category: Category, mut records: Vec<Record>, now: NaiveDateTime) {
        if category == Category::Agenda {
            agenda::order_ingested(&mut records, now);
        }
        tracing::info!(%category, count = records.len(), "records loaded");
        self.regions.insert(category, RegionState::for_len(records.len()));
        self.records.insert(category, records);
    }

    /// Replace the cached news of `topic`; its visible limit is kept.
    pub fn load_news(&mut self, topic: &str, records: Vec<Record>) {
        tracing::info!(topic, count = records.len(), "news loaded");
        if !self.topics.iter().any(|t| t == topic) {
            self.topics.push(topic.to_string());
        }
        let page_size = self.news_page_size;
        self.news_regions
            .insert(topic.to_string(), RegionState::for_len(records.len()));
        self.news
            .entry(topic.to_string())
            .or_insert_with(|| NewsFeed::new(topic, page_size))
            .replace(records);
    }

    /// Mark `category` failed. Its previous records are dropped.
    pub fn fail(&mut self, category: Category, error: &FeedError) {
        tracing::warn!(%category, %error, "load failed");
        self.records.remove(&category);
        self.regions
            .insert(category, RegionState::Failed(failure_text(category).to_string()));
    }

    /// Apply one loader completion.
    pub fn apply(&mut self, event: LoadEvent) {
        self.apply_at(event, Local::now().naive_local());
    }

    pub fn apply_at(&mut self, event: LoadEvent, now: NaiveDateTime) {
        match event {
            LoadEvent::Records { category, result } => match result {
                Ok(records) => self.load_at(category, records, now),
                Err(e) => self.fail(category, &e),
            },
            LoadEvent::News {
                topic,
                limit,
                result,
            } => match (result, limit) {
                (Ok(records), _) => self.load_news(&topic, records),
                // A failed refetch keeps what is already shown.
                (Err(e), Some(limit)) => {
                    tracing::warn!(%topic, limit, error = %e, "news refetch failed");
                }
                (Err(e), None) => {
                    tracing::warn!(%topic, error = %e, "news load failed");
                    self.news_regions
                        .insert(topic, RegionState::Failed(locale::NEWS_FAILED.to_string()));
                }
            },
            LoadEvent::Stats(result) => match result {
                Ok(payload) => {
                    tracing::info!("stats loaded");
                    self.stats = Stats::from_payload(&payload, &self.periods);
                    self.stats_region = RegionState::Ready;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stats load failed");
                    self.stats = Stats::unavailable();
                    self.stats_region = RegionState::Failed(locale::STAT_UNAVAILABLE.to_string());
                }
            },
        }
    }

    /// Put every region back to loading ahead of a reload. Records stay until
    /// their replacements arrive.
    pub fn begin_reload(&mut self) {
        for state in self.regions.values_mut() {
            *state = RegionState::Loading;
        }
        for state in self.news_regions.values_mut() {
            *state = RegionState::Loading;
        }
        self.stats_region = RegionState::Loading;
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn records(&self, category: Category) -> &[Record] {
        self.records.get(&category).map(Vec::as_slice).unwrap_or_default()
    }

    /// Decisions followed by meeting items, the decisions-list order.
    pub fn decision_items(&self) -> impl Iterator<Item = &Record> {
        self.records(Category::Decision)
            .iter()
            .chain(self.records(Category::Meeting))
    }

    /// Badge count: decisions plus meetings, from the current collections.
    pub fn total_count(&self) -> usize {
        self.records(Category::Decision).len() + self.records(Category::Meeting).len()
    }

    pub fn region(&self, category: Category) -> &RegionState {
        self.regions.get(&category).unwrap_or(&RegionState::Loading)
    }

    /// Placeholder text for `category`, or `None` when its records should be
    /// rendered.
    pub fn placeholder(&self, category: Category) -> Option<&str> {
        match self.region(category) {
            RegionState::Ready => None,
            RegionState::Loading => Some(match category {
                Category::Decision | Category::Meeting => locale::LOADING_DECISIONS,
                _ => locale::LOADING,
            }),
            RegionState::Empty => Some(empty_text(category)),
            RegionState::Failed(msg) => Some(msg.as_str()),
        }
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(String::as_str)
    }

    pub fn news(&self, topic: &str) -> Option<&NewsFeed> {
        self.news.get(topic)
    }

    pub fn news_mut(&mut self, topic: &str) -> Option<&mut NewsFeed> {
        self.news.get_mut(topic)
    }

    pub fn news_region(&self, topic: &str) -> &RegionState {
        self.news_regions.get(topic).unwrap_or(&RegionState::Loading)
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn stats_region(&self) -> &RegionState {
        &self.stats_region
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(&["arctial", "kokkola"], crate::filter::news::NEWS_PAGE_SIZE, Periods::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
