//! Errors the feed can report.
//!
//! - [`StoreError`] is what the remote store hands back. Network and server
//!   rejections are surfaced to the presentation layer as a single `error`
//!   value on the snapshot.
//! - [`FeedError`] covers local mistakes: bad configuration, filters that
//!   cannot be coerced, malformed amounts.
//!
//! A response that arrives after its query was replaced is not an error:
//! it comes back as [`LoadOutcome::Stale`] and is dropped.
//!
//!  [`LoadOutcome::Stale`]: crate::LoadOutcome::Stale
use thiserror::Error;

/// Failure reported by a [`RemoteStore`](crate::RemoteStore) call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("{status}: {message}")]
    Rejected { status: u16, message: String },
}

/// Feed custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("Invalid loader config: {0}")]
    InvalidConfig(String),
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}
