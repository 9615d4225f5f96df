//! HTTP client for the open-data proxy.
//!
//! XML feeds (`/decisions`, `/meetings`, `/agendas`) are served as
//! Windows-1252 bytes under a misleading declaration, so they are always
//! decoded through [`kdash_core::normalizer::prepare_xml`] before parsing.
//! News and statistics are plain JSON.

use bytes::Bytes;
use kdash_core::config::{StatsConfig, StatsSource};
use kdash_core::error::{FeedError, Result};
use kdash_core::normalizer;
use kdash_core::stats::{first_value, PxQuery, StatsPayload};
use kdash_core::{Category, Record};
use serde::Serialize;

use crate::FeedSource;

/// Proxy path serving `category`.
pub fn endpoint(category: Category) -> String {
    match category {
        Category::Decision => "/decisions".to_string(),
        Category::Meeting => "/meetings".to_string(),
        Category::Agenda => "/agendas".to_string(),
        Category::News => "/news".to_string(),
    }
}

/// `/news/{topic}`
pub fn news_endpoint(topic: &str) -> String {
    format!("/news/{topic}")
}

#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: String,
}

impl FeedClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("kdash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FeedError::fetch("client", e))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` with optional query parameters. Non-success statuses are
    /// fetch failures.
    pub async fn fetch_bytes(&self, path: &str, query: &[(&str, String)]) -> Result<Bytes> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, ?query, "GET");
        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| FeedError::fetch(path, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::fetch(path, format!("HTTP {}", status.as_u16())));
        }
        resp.bytes().await.map_err(|e| FeedError::fetch(path, e))
    }

    /// GET a legacy-encoded XML feed and return it as UTF-8 text with a
    /// matching declaration.
    pub async fn fetch_xml(&self, path: &str) -> Result<String> {
        let bytes = self.fetch_bytes(path, &[]).await?;
        Ok(normalizer::prepare_xml(&bytes))
    }

    /// GET and normalize one XML category.
    pub async fn fetch_records(&self, category: Category, organization: &str) -> Result<Vec<Record>> {
        let xml = self.fetch_xml(&endpoint(category)).await?;
        normalizer::xml_records(&xml, category, organization)
    }

    /// GET `/news/{topic}`, with `?limit=N` when paging past the cache.
    pub async fn fetch_news(&self, topic: &str, limit: Option<usize>) -> Result<Vec<Record>> {
        let query: Vec<(&str, String)> = limit
            .map(|n| vec![("limit", n.to_string())])
            .unwrap_or_default();
        let bytes = self.fetch_bytes(&news_endpoint(topic), &query).await?;
        let text = std::str::from_utf8(&bytes).map_err(|e| FeedError::Decode(e.to_string()))?;
        normalizer::news_records(text, topic)
    }

    /// GET the precomputed `/stats` object.
    pub async fn fetch_stats(&self) -> Result<StatsPayload> {
        let bytes = self.fetch_bytes("/stats", &[]).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// POST a JSON body to an absolute URL and parse the JSON answer.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<serde_json::Value> {
        tracing::debug!(%url, "POST");
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| FeedError::fetch(url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::fetch(url, format!("HTTP {}", status.as_u16())));
        }
        let bytes = resp.bytes().await.map_err(|e| FeedError::fetch(url, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Assemble the stats payload from six PxWeb queries.
    pub async fn fetch_pxweb_stats(&self, cfg: &StatsConfig) -> Result<StatsPayload> {
        let mut values = Vec::with_capacity(6);
        for indicator in [&cfg.population, &cfg.youth_share, &cfg.unemployment] {
            let url = format!("{}/{}", cfg.pxweb_url.trim_end_matches('/'), indicator.table);
            let (current, previous) = PxQuery::pair(&cfg.area_code, indicator);
            for query in [current, previous] {
                let resp = self.post_json(&url, &query).await?;
                values.push(first_value(&resp));
            }
        }
        Ok(StatsPayload {
            vaesto: values[0],
            vaesto_prev: values[1],
            nuoret: values[2],
            nuoret_prev: values[3],
            tyottomyys: values[4],
            tyottomyys_prev: values[5],
            tyottomyys_kk: Some(cfg.unemployment.period.clone()),
        })
    }
}

impl FeedSource for FeedClient {
    async fn records(&self, category: Category, organization: &str) -> Result<Vec<Record>> {
        self.fetch_records(category, organization).await
    }

    async fn news(&self, topic: &str, limit: Option<usize>) -> Result<Vec<Record>> {
        self.fetch_news(topic, limit).await
    }

    async fn stats(&self, cfg: &StatsConfig) -> Result<StatsPayload> {
        match cfg.source {
            StatsSource::Proxy => self.fetch_stats().await,
            StatsSource::Pxweb => self.fetch_pxweb_stats(cfg).await,
        }
    }
}
