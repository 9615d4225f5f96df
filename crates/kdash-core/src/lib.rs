//! kdash-core: municipal open-data dashboard core library.
//!
//! This crate holds everything between the raw feed bytes and the rendered
//! lists: normalization, title handling, the aggregate store and the filter
//! engine, plus the shared types and configuration.
//!
//! # Architecture
//!
//! ```text
//! bytes ──► normalizer ──► Store ──► filter ──► view
//!              │
//!              └──► title (issuer split, date extraction)
//! ```
//!
//! Fetching is done elsewhere; loader tasks report through
//! [`store::LoadEvent`] and the view owner applies them.

pub mod config;
pub mod error;
pub mod filter;
pub mod locale;
pub mod normalizer;
pub mod stats;
pub mod store;
pub mod title;
pub mod types;

pub use error::FeedError;
pub use store::{LoadEvent, RegionState, Store};
pub use types::{Category, Record, Status};
