//! Fake open-data proxy for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves:
//! - `GET /decisions`, `/meetings`, `/agendas`: configured XML bytes
//! - `GET /news/{topic}`: configured JSON; `?limit=N` truncates the array
//! - `GET /stats`: configured JSON
//! - `POST /pxweb/{*table}`: PxWeb-shaped answer for the selected
//!   indicator and period
//!
//! Routes without a configured body answer `500`. Every request is counted
//! per path so tests can assert what the loader actually fetched.
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn demo() {
//! let proxy = FakeProxy::start().await.unwrap();
//! proxy.set_xml("/decisions", DECISIONS_XML.as_bytes().to_vec()).await;
//! let client = kdash_feeds::FeedClient::new(proxy.base_url()).unwrap();
//! # }
//! ```

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// State shared between the router and test code.
#[derive(Default)]
struct ProxyState {
    xml: HashMap<String, Vec<u8>>,
    news: HashMap<String, serde_json::Value>,
    stats: Option<serde_json::Value>,
    /// `(indicator, period)` to the value served as `data[0].values[0]`.
    pxweb: HashMap<(String, String), String>,
    hits: HashMap<String, usize>,
    /// `limit` query values seen per news topic, in arrival order.
    news_limits: HashMap<String, Vec<Option<usize>>>,
}

type Shared = Arc<Mutex<ProxyState>>;

/// Handle to the running fake proxy.
pub struct FakeProxy {
    addr: SocketAddr,
    state: Shared,
}

impl FakeProxy {
    /// Start the server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state: Shared = Arc::new(Mutex::new(ProxyState::default()));

        let app = Router::new()
            .route("/decisions", get(decisions))
            .route("/meetings", get(meetings))
            .route("/agendas", get(agendas))
            .route("/news/{topic}", get(news))
            .route("/stats", get(stats))
            .route("/pxweb/{*table}", post(pxweb))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Base URL for the proxy (e.g. `http://127.0.0.1:PORT`).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Serve `body` (raw bytes, any charset) at an XML path.
    pub async fn set_xml(&self, path: &str, body: Vec<u8>) {
        self.state.lock().await.xml.insert(path.to_string(), body);
    }

    pub async fn set_news(&self, topic: &str, items: serde_json::Value) {
        self.state.lock().await.news.insert(topic.to_string(), items);
    }

    /// Stop serving `topic`; later requests answer `500`.
    pub async fn remove_news(&self, topic: &str) {
        self.state.lock().await.news.remove(topic);
    }

    pub async fn set_pxweb(&self, indicator: &str, period: &str, value: &str) {
        self.state.lock().await.pxweb.insert(
            (indicator.to_string(), period.to_string()),
            value.to_string(),
        );
    }

    /// PxWeb URL for a `StatsConfig::pxweb_url` pointing at this proxy.
    pub fn pxweb_url(&self) -> String {
        format!("{}/pxweb", self.base_url())
    }

    pub async fn set_stats(&self, payload: serde_json::Value) {
        self.state.lock().await.stats = Some(payload);
    }

    /// Number of requests seen for `path` (e.g. `/news/arctial`).
    pub async fn hits(&self, path: &str) -> usize {
        self.state.lock().await.hits.get(path).copied().unwrap_or(0)
    }

    pub async fn news_limits(&self, topic: &str) -> Vec<Option<usize>> {
        self.state
            .lock()
            .await
            .news_limits
            .get(topic)
            .cloned()
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn serve_xml(state: Shared, path: &str) -> Response {
    let mut state = state.lock().await;
    *state.hits.entry(path.to_string()).or_default() += 1;
    match state.xml.get(path) {
        Some(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/rss+xml")],
            body.clone(),
        )
            .into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn decisions(State(state): State<Shared>) -> Response {
    serve_xml(state, "/decisions").await
}

async fn meetings(State(state): State<Shared>) -> Response {
    serve_xml(state, "/meetings").await
}

async fn agendas(State(state): State<Shared>) -> Response {
    serve_xml(state, "/agendas").await
}

#[derive(Deserialize)]
struct NewsParams {
    limit: Option<usize>,
}

async fn news(
    Path(topic): Path<String>,
    Query(params): Query<NewsParams>,
    State(state): State<Shared>,
) -> Response {
    let mut state = state.lock().await;
    *state.hits.entry(format!("/news/{topic}")).or_default() += 1;
    state
        .news_limits
        .entry(topic.clone())
        .or_default()
        .push(params.limit);

    let Some(items) = state.news.get(&topic).cloned() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    let items = match (items, params.limit) {
        (serde_json::Value::Array(mut arr), Some(limit)) => {
            arr.truncate(limit);
            serde_json::Value::Array(arr)
        }
        (other, _) => other,
    };
    axum::Json(items).into_response()
}

async fn stats(State(state): State<Shared>) -> Response {
    let mut state = state.lock().await;
    *state.hits.entry("/stats".to_string()).or_default() += 1;
    match state.stats.clone() {
        Some(payload) => axum::Json(payload).into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// Value of the selection whose `code` is one of `codes`.
fn selected<'a>(body: &'a serde_json::Value, codes: &[&str]) -> Option<&'a str> {
    body.get("query")?
        .as_array()?
        .iter()
        .find(|s| s.get("code").and_then(|c| c.as_str()).is_some_and(|c| codes.contains(&c)))?
        .get("selection")?
        .get("values")?
        .get(0)?
        .as_str()
}

async fn pxweb(
    State(state): State<Shared>,
    axum::Json(body): axum::Json<serde_json::Value>,
) -> Response {
    let mut state = state.lock().await;
    *state.hits.entry("/pxweb".to_string()).or_default() += 1;
    let key = match (
        selected(&body, &["Tiedot"]),
        selected(&body, &["Vuosi", "Kuukausi"]),
    ) {
        (Some(indicator), Some(period)) => (indicator.to_string(), period.to_string()),
        _ => return StatusCode::BAD_REQUEST.into_response(),
    };
    match state.pxweb.get(&key) {
        Some(value) => axum::Json(serde_json::json!({
            "data": [{ "key": [], "values": [value] }]
        }))
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
