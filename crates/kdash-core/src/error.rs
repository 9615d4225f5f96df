//! Error taxonomy for feed loading.
//!
//! Date parse problems are not errors at all: the date field is simply left
//! empty. Per-field problems inside an item fall back to defaults. What
//! remains is terminal for one load and is shown as a region placeholder.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FeedError>;

#[derive(Debug, Error)]
pub enum FeedError {
    /// Network failure or non-success HTTP status.
    #[error("fetch failed for {endpoint}: {reason}")]
    Fetch { endpoint: String, reason: String },

    /// Payload could not be decoded or is not well-formed XML.
    #[error("decode failed: {0}")]
    Decode(String),

    /// Payload decoded but does not have the expected shape.
    #[error("parse failed: {0}")]
    Parse(String),
}

impl FeedError {
    pub fn fetch(endpoint: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        FeedError::Fetch {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<quick_xml::Error> for FeedError {
    fn from(e: quick_xml::Error) -> Self {
        FeedError::Decode(e.to_string())
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(e: serde_json::Error) -> Self {
        FeedError::Parse(e.to_string())
    }
}
