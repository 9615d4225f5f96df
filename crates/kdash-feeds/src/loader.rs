//! Dashboard loader: the concurrent load tasks behind one dashboard view.
//!
//! Four tasks start together: decisions, statistics, meetings, and agendas
//! followed by news. They race, and each reports its own completion over an
//! unbounded channel. A task never retries and never waits on another; a
//! failure becomes an `Err` result in its event and nothing more.

use kdash_core::config::{Config, StatsConfig};
use kdash_core::{Category, LoadEvent};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::FeedSource;

/// What the load tasks need from the configuration.
#[derive(Debug, Clone)]
pub struct LoadSettings {
    pub organization: String,
    pub topics: Vec<String>,
    pub stats: StatsConfig,
}

impl From<&Config> for LoadSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            organization: cfg.dashboard.organization.clone(),
            topics: cfg.news.topics.clone(),
            stats: cfg.stats.clone(),
        }
    }
}

/// A fresh completion channel.
pub fn channel() -> (UnboundedSender<LoadEvent>, UnboundedReceiver<LoadEvent>) {
    mpsc::unbounded_channel()
}

pub struct Loader<S> {
    source: Arc<S>,
    settings: Arc<LoadSettings>,
    tx: UnboundedSender<LoadEvent>,
}

impl<S> Clone for Loader<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            settings: Arc::clone(&self.settings),
            tx: self.tx.clone(),
        }
    }
}

impl<S: FeedSource + 'static> Loader<S> {
    pub fn new(source: S, settings: LoadSettings, tx: UnboundedSender<LoadEvent>) -> Self {
        Self {
            source: Arc::new(source),
            settings: Arc::new(settings),
            tx,
        }
    }

    /// Start every dashboard load. Must be called inside a tokio runtime.
    pub fn spawn_dashboard(&self) -> Vec<JoinHandle<()>> {
        tracing::info!("dashboard load started");
        vec![
            self.spawn_records(Category::Decision),
            self.spawn_stats(),
            self.spawn_records(Category::Meeting),
            self.spawn_agendas_then_news(),
        ]
    }

    /// Load only decisions and meetings; the headless listing needs nothing
    /// else.
    pub fn spawn_decision_list(&self) -> Vec<JoinHandle<()>> {
        vec![
            self.spawn_records(Category::Decision),
            self.spawn_records(Category::Meeting),
        ]
    }

    /// Refetch `topic` with a larger `limit` after "show more" ran past the
    /// cache.
    pub fn spawn_news_refetch(&self, topic: &str, limit: usize) -> JoinHandle<()> {
        let this = self.clone();
        let topic = topic.to_string();
        tokio::spawn(async move {
            tracing::debug!(%topic, limit, "refetching news");
            let result = this.source.news(&topic, Some(limit)).await;
            this.send(LoadEvent::News {
                topic,
                limit: Some(limit),
                result,
            });
        })
    }

    fn spawn_records(&self, category: Category) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            let result = this
                .source
                .records(category, &this.settings.organization)
                .await;
            this.send(LoadEvent::Records { category, result });
        })
    }

    fn spawn_stats(&self) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            let result = this.source.stats(&this.settings.stats).await;
            this.send(LoadEvent::Stats(result));
        })
    }

    // News only starts once the agenda request has settled, either way.
    fn spawn_agendas_then_news(&self) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            let result = this
                .source
                .records(Category::Agenda, &this.settings.organization)
                .await;
            this.send(LoadEvent::Records {
                category: Category::Agenda,
                result,
            });

            for topic in &this.settings.topics {
                let result = this.source.news(topic, None).await;
                this.send(LoadEvent::News {
                    topic: topic.clone(),
                    limit: None,
                    result,
                });
            }
        })
    }

    fn send(&self, event: LoadEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("load event dropped, receiver closed");
        }
    }
}
