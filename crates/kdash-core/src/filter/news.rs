//! Per-topic news paging.
//!
//! Each topic keeps its cached records (newest first) and a visible limit that
//! grows a page at a time. Growing past the cache asks the caller to refetch
//! with the larger limit; shrinking never fetches.

use crate::title::epoch;
use crate::types::Record;

/// Default news page size.
pub const NEWS_PAGE_SIZE: usize = 10;

/// What the caller must do after a paging step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsStep {
    /// The cache covers the new limit; re-render.
    Render,
    /// Fetch `/news/{topic}?limit={limit}` and then re-render.
    Refetch { limit: usize },
}

/// Cached news of one topic plus its paging state.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsFeed {
    topic: String,
    items: Vec<Record>,
    visible_limit: usize,
    page_size: usize,
}

impl NewsFeed {
    pub fn new(topic: impl Into<String>, page_size: usize) -> Self {
        Self {
            topic: topic.into(),
            items: Vec::new(),
            visible_limit: page_size,
            page_size,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn items(&self) -> &[Record] {
        &self.items
    }

    pub fn visible_limit(&self) -> usize {
        self.visible_limit
    }

    /// Replace the cache. Items are re-sorted newest first; items without a
    /// usable date sort last. The visible limit is kept.
    pub fn replace(&mut self, mut records: Vec<Record>) {
        sort_newest_first(&mut records);
        self.items = records;
    }

    pub fn show_more(&mut self) -> NewsStep {
        self.visible_limit += self.page_size;
        if self.visible_limit > self.items.len() {
            NewsStep::Refetch {
                limit: self.visible_limit,
            }
        } else {
            NewsStep::Render
        }
    }

    pub fn show_less(&mut self) {
        self.visible_limit = self.page_size;
    }

    /// Project the feed for rendering. A non-empty `query` (already
    /// lowercased) filters title and description and shows every match.
    pub fn view(&self, query: &str) -> NewsView<'_> {
        if !query.is_empty() {
            let shown: Vec<&Record> = self.items.iter().filter(|r| r.matches(query)).collect();
            return NewsView {
                shown,
                remaining: 0,
                show_less: false,
                searching: true,
            };
        }

        let limit = self.visible_limit.min(self.items.len());
        let remaining = self.items.len() - limit;
        NewsView {
            shown: self.items[..limit].iter().collect(),
            remaining,
            show_less: remaining == 0 && self.items.len() > self.page_size,
            searching: false,
        }
    }
}

/// One render of a news feed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsView<'a> {
    pub shown: Vec<&'a Record>,
    /// Cached items beyond the visible limit; drives the "show more" hint.
    pub remaining: usize,
    /// Everything cached is shown and it is more than one page.
    pub show_less: bool,
    pub searching: bool,
}

impl NewsView<'_> {
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }
}

/// Stable newest-first order on each record's date; undated records are
/// treated as the Unix epoch.
pub fn sort_newest_first(records: &mut [Record]) {
    records.sort_by(|a, b| {
        let a = a.date.unwrap_or_else(epoch);
        let b = b.date.unwrap_or_else(epoch);
        b.cmp(&a)
    });
}
