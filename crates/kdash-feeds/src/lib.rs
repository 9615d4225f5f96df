//! kdash-feeds: open-data proxy client and dashboard loader for kdash.
//!
//! [`client::FeedClient`] fetches and normalizes the proxy feeds.
//! [`loader::Loader`] runs the independent load tasks and reports each
//! completion as a [`kdash_core::LoadEvent`] on an async channel for the
//! store owner.

pub mod client;
pub mod loader;

pub use client::FeedClient;
pub use loader::{LoadSettings, Loader};

use kdash_core::config::StatsConfig;
use kdash_core::error::Result;
use kdash_core::stats::StatsPayload;
use kdash_core::{Category, Record};
use std::future::Future;

/// Trait implemented by each source of dashboard data.
///
/// The loader only talks to this seam, so tests can drive it with canned
/// results instead of a proxy.
pub trait FeedSource: Send + Sync {
    /// Normalized records of one XML category.
    fn records(
        &self,
        category: Category,
        organization: &str,
    ) -> impl Future<Output = Result<Vec<Record>>> + Send;

    /// News of `topic`; `limit` requests more than the default page.
    fn news(
        &self,
        topic: &str,
        limit: Option<usize>,
    ) -> impl Future<Output = Result<Vec<Record>>> + Send;

    fn stats(&self, cfg: &StatsConfig) -> impl Future<Output = Result<StatsPayload>> + Send;
}
