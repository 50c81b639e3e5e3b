//! Live data source error types.

use thiserror::Error;

/// Failures talking to the live intensity feed. Every variant maps to
/// the same fallback outcome; the distinction exists for logs.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("connect failed: {0}")]
    Connect(String),

    #[error("http handshake failed: {0}")]
    Handshake(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("non-success status: {0}")]
    Status(u16),

    #[error("unusable payload: {0}")]
    Payload(String),

    #[error("deadline of {0} ms exceeded")]
    DeadlineExceeded(u64),
}

pub type SourceResult<T> = Result<T, SourceError>;
