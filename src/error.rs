//! Error types for snapwire.

use std::time::Duration;

use thiserror::Error;

/// Main error type for all snapwire operations.
#[derive(Debug, Error)]
pub enum SnapwireError {
    /// I/O error during socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Connect did not complete within the configured timeout.
    ///
    /// No bytes were written; the payload was not delivered.
    #[error("connect timed out after {0:?}")]
    ConnectTimeout(Duration),

    /// The peer actively refused the connection (nothing listening).
    #[error("connection refused by {0}")]
    ConnectRefused(String),

    /// Stream closed or reset mid-frame.
    ///
    /// Ends the affected connection only; other connections are unaffected.
    #[error("framing error: {0}")]
    Framing(#[source] std::io::Error),

    /// Protocol violation (implausible frame length, invalid address, etc.).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Payload too large to represent in the 4-byte length prefix.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// MsgPack serialization error.
    #[error("MsgPack encode error: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    /// MsgPack deserialization error.
    #[error("MsgPack decode error: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),
}

/// Result type alias using SnapwireError.
pub type Result<T> = std::result::Result<T, SnapwireError>;
