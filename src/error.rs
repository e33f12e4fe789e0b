//! Error types for the wire server.

use thiserror::Error;

/// Result alias for request parsing and server operations.
pub type Result<T> = std::result::Result<T, SwiftQueueError>;

/// Errors raised while framing requests, reading the metadata log, or serving.
///
/// Protocol-level failures (unsupported version, unknown topic) are never
/// errors: they travel inside a well-formed response as numeric codes.
#[derive(Error, Debug)]
pub enum SwiftQueueError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A declared length promises more bytes than were delivered.
    #[error("Truncated request: {0}")]
    Truncated(String),

    #[error("Malformed request: {0}")]
    Malformed(String),

    #[error("Unsupported api_key {0}")]
    UnsupportedApiKey(i16),

    #[error("Configuration error: {0}")]
    Config(String),
}
