//! kdash: municipal open-data dashboard.
//!
//! Terminal dashboard for one municipality's open data: council decisions,
//! meeting items, meeting agendas, news per topic and headline statistics.
//! The workspace crates hold the layers; this crate adds the binary and the
//! headless mode so integration tests can drive both.
//!
//! # Architecture
//!
//! ```text
//! kdash-feeds (fetch, load tasks) ──► kdash-core (normalize, store, filter)
//!                                           │
//!                          ┌────────────────┴──────────────┐
//!                          ▼                               ▼
//!                   kdash-tui (dashboard)          headless (text / jsonl)
//! ```
//!
//! Load tasks report over a `tokio` channel. The UI drives the main thread;
//! fetching runs on background tasks.

pub mod headless;

pub use headless::{HeadlessOptions, OutputFormat};
