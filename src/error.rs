//! Domain-specific error types for the session bridge.
//!
//! All fallible operations return `Result<T, SessionError>`.
//! No panics on invalid input — every error is typed and recoverable,
//! except for protocol dispatch failures, which are fatal to the pump
//! (see [`crate::pump::MessagePump`]).

use std::time::Duration;
use thiserror::Error;

/// The canonical error type for the session bridge.
#[derive(Debug, Error)]
pub enum SessionError {
    // ── Protocol Errors ──────────────────────────────────────────
    /// An outbound protocol call (pointer, key, cut-text, update
    /// request) could not be sent.
    #[error("protocol send failed: {0}")]
    Send(String),

    /// The protocol engine failed while dispatching inbound messages.
    /// This is fatal to the session: the pump deregisters itself and
    /// signals application shutdown.
    #[error("protocol dispatch failed: {0}")]
    Dispatch(String),

    /// The underlying transport reported an I/O error.
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    // ── Session Errors ───────────────────────────────────────────
    /// A notification channel was closed unexpectedly.
    #[error("channel closed")]
    ChannelClosed,

    /// An operation exceeded its deadline.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// A configuration value is out of range or malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Catch-all for errors that do not fit another variant.
    #[error("{0}")]
    Other(String),
}

// ── Convenient From implementations ──────────────────────────────

impl From<String> for SessionError {
    fn from(s: String) -> Self {
        SessionError::Other(s)
    }
}

impl From<&str> for SessionError {
    fn from(s: &str) -> Self {
        SessionError::Other(s.to_string())
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for SessionError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        SessionError::ChannelClosed
    }
}
