#![allow(unused)]
//! News paging integration harness.
//!
//! # What this covers
//!
//! - **Show more within the cache** re-renders without a request.
//! - **Show more past the cache** refetches `/news/{topic}?limit=N` through
//!   the loader and the larger result replaces the cache.
//! - **Failed refetch** keeps the cached items on screen.
//! - **Show less** drops back to one page without fetching.
//! - **Search** filters the cached items and ignores the visible limit.
//!
//! # What this does NOT cover
//!
//! - Topic switching in the dashboard (see the TUI crate's `app` tests)
//!
//! # Running
//!
//! ```sh
//! cargo test --test news_harness
//! ```

mod common;
use common::*;
use kdash_core::config::Config;
use kdash_core::filter::news::NewsStep;
use kdash_core::{LoadEvent, RegionState, Store};
use kdash_feeds::{loader, FeedClient, LoadSettings, Loader};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

const TOPIC: &str = "arctial";
const PATH: &str = "/news/arctial";

/// Fake proxy, real client and loader, and the store they feed.
struct Rig {
    proxy: FakeProxy,
    loader: Loader<FeedClient>,
    rx: UnboundedReceiver<LoadEvent>,
    store: Store,
}

impl Rig {
    /// Serve `n` items and load them the way the dashboard does on start-up.
    async fn start(n: usize) -> Self {
        let proxy = FakeProxy::start().await.unwrap();
        proxy.set_news(TOPIC, news_items(TOPIC, n)).await;

        let mut config = Config::defaults();
        config.proxy.base_url = proxy.base_url();
        let client = FeedClient::new(proxy.base_url()).unwrap();
        let (tx, rx) = loader::channel();
        let loader = Loader::new(client.clone(), LoadSettings::from(&config), tx);

        let mut store = Store::default();
        let result = client.fetch_news(TOPIC, None).await;
        store.apply_at(
            LoadEvent::News {
                topic: TOPIC.to_string(),
                limit: None,
                result,
            },
            now(),
        );

        Self {
            proxy,
            loader,
            rx,
            store,
        }
    }

    /// Run one "show more" refetch through the loader and apply its event.
    async fn refetch(&mut self, limit: usize) {
        self.loader
            .spawn_news_refetch(TOPIC, limit)
            .await
            .expect("refetch task");
        let event = tokio::time::timeout(Duration::from_secs(5), self.rx.recv())
            .await
            .expect("refetch completes")
            .expect("loader alive");
        self.store.apply_at(event, now());
    }

    fn show_more(&mut self) -> NewsStep {
        self.store.news_mut(TOPIC).unwrap().show_more()
    }

    fn shown(&self) -> usize {
        self.store.news(TOPIC).unwrap().view("").shown.len()
    }
}

#[tokio::test]
async fn first_page_is_ten_newest() {
    let rig = Rig::start(14).await;
    let feed = rig.store.news(TOPIC).unwrap();
    let view = feed.view("");
    assert_eq!(view.shown.len(), 10);
    assert_eq!(view.remaining, 4);
    assert!(!view.show_less);
    assert_eq!(view.shown[0].title, "arctial uutinen 0");
    assert_dated_order!(view.shown, >=);
    assert_eq!(rig.proxy.news_limits(TOPIC).await, vec![None]);
}

#[tokio::test]
async fn show_more_inside_the_cache_does_not_fetch() {
    let mut rig = Rig::start(25).await;
    assert_eq!(rig.show_more(), NewsStep::Render);
    assert_eq!(rig.shown(), 20);
    assert_eq!(rig.proxy.hits(PATH).await, 1);
}

#[tokio::test]
async fn show_more_past_a_partial_page_asks_for_more() {
    // Fourteen cached: the next limit of twenty lies beyond the cache.
    let mut rig = Rig::start(14).await;
    assert_eq!(rig.show_more(), NewsStep::Refetch { limit: 20 });
    assert_eq!(rig.proxy.hits(PATH).await, 1);
}

#[tokio::test]
async fn show_more_past_the_cache_refetches_with_limit() {
    // The proxy's first answer holds one page; more exists upstream.
    let mut rig = Rig::start(10).await;
    rig.proxy.set_news(TOPIC, news_items(TOPIC, 25)).await;

    let step = rig.show_more();
    assert_eq!(step, NewsStep::Refetch { limit: 20 });
    rig.refetch(20).await;

    assert_eq!(rig.proxy.news_limits(TOPIC).await, vec![None, Some(20)]);
    let feed = rig.store.news(TOPIC).unwrap();
    assert_eq!(feed.items().len(), 20);
    assert_eq!(rig.shown(), 20);
    // Twenty cached, twenty shown: offer "show less".
    assert!(feed.view("").show_less);
}

#[tokio::test]
async fn failed_refetch_keeps_cached_items() {
    let mut rig = Rig::start(10).await;
    rig.proxy.remove_news(TOPIC).await;

    let NewsStep::Refetch { limit } = rig.show_more() else {
        panic!("cache holds exactly one page");
    };
    rig.refetch(limit).await;

    assert_eq!(rig.proxy.hits(PATH).await, 2);
    assert_eq!(rig.store.news(TOPIC).unwrap().items().len(), 10);
    assert_eq!(rig.shown(), 10);
    assert_eq!(rig.store.news_region(TOPIC), &RegionState::Ready);
}

#[tokio::test]
async fn show_less_returns_to_one_page_without_fetching() {
    let mut rig = Rig::start(14).await;
    rig.show_more();
    assert_eq!(rig.shown(), 14);

    rig.store.news_mut(TOPIC).unwrap().show_less();
    assert_eq!(rig.shown(), 10);
    assert_eq!(rig.proxy.hits(PATH).await, 1);
}

#[tokio::test]
async fn search_ignores_the_visible_limit() {
    let rig = Rig::start(14).await;
    let feed = rig.store.news(TOPIC).unwrap();
    // "uutinen 1" matches items 1, 10 .. 13; three of them sit past the page.
    let view = feed.view("uutinen 1");
    assert!(view.searching);
    assert_eq!(
        titles(view.shown.iter().copied()),
        vec![
            "arctial uutinen 1",
            "arctial uutinen 10",
            "arctial uutinen 11",
            "arctial uutinen 12",
            "arctial uutinen 13",
        ]
    );
    assert_eq!(view.remaining, 0);
}
