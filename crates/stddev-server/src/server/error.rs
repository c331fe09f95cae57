//! Error types for the standard-deviation service.
//!
//! This module defines the central `Error` enum, which captures all
//! reportable error cases within the fan-out pipeline and the upstream
//! source it drives.
//!
//! ## Error Cases
//! - `RequestInit`: the upstream HTTP client could not be constructed.
//! - `Send`: the upstream request failed in transit.
//! - `Status`: the upstream answered with a non-success status.
//! - `ContentType`: the upstream payload carried an unsupported content
//!   type.
//! - `ParseInteger`: a payload line could not be parsed as an integer.
//! - `Cancelled`: an invocation was aborted because a sibling failed.
//! - `Channel`: an internal hand-off failure between tasks.
//! - `Join`: a spawned invocation task did not run to completion.

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the standard-deviation service.
///
/// Every variant except `Cancelled`, `Channel`, and `Join` belongs to the
/// "generation failure" class: the upstream source could not deliver an
/// integer set. The coordinator surfaces whichever failure it observes
/// first and discards the rest.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The upstream HTTP client could not be initialized.
    #[error("failed to initialize random generator: {context}")]
    RequestInit { context: String },

    /// Sending the upstream request failed outright.
    #[error("random generator failure: {0}")]
    Send(#[from] reqwest::Error),

    /// The upstream responded with a non-success status code.
    #[error("random generator failure: status code {status}; body {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The upstream payload carried an unsupported content type.
    #[error("failed to obtain random items: unsupported content type: {0}")]
    ContentType(String),

    /// A line of the upstream payload was not an integer.
    #[error("failed to obtain random items: invalid integer line: {line}")]
    ParseInteger { line: String },

    /// The invocation was aborted because a sibling invocation failed.
    #[error("request cancelled")]
    Cancelled,

    /// Internal channel send/receive failure (e.g., closed channel).
    #[error("channel error: {context}")]
    Channel { context: String },

    /// A spawned invocation task panicked or was aborted.
    #[error("generator task failure: {0}")]
    Join(#[from] tokio::task::JoinError),
}
