//! Sender - one-shot client side of the transport.
//!
//! Each send is a full connect-send-close transaction: open a new TCP
//! connection with a bounded connect timeout, write one frame, flush, close.
//! There is no batching, pipelining, or connection reuse across calls, and
//! no retry anywhere in this crate - retry policy belongs to the caller.
//!
//! Failures are surfaced as typed errors instead of being swallowed, so the
//! calling application can decide whether to inform a user that an image was
//! dropped:
//! - [`SnapwireError::ConnectTimeout`] - connect exceeded the timeout
//! - [`SnapwireError::ConnectRefused`] - nothing listening on the target
//! - [`SnapwireError::Io`] - the write or flush failed after connecting
//!
//! # Example
//!
//! ```ignore
//! use snapwire::Sender;
//!
//! let sender = Sender::new("127.0.0.1", 5000);
//! sender.send(&image_bytes).await?;
//! ```

use std::io::ErrorKind;
use std::time::Duration;

use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::codec::MsgPackCodec;
use crate::error::{Result, SnapwireError};
use crate::listener::DEFAULT_PORT;
use crate::protocol::encode_frame;

/// Default target host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(100);

/// One-shot frame sender.
///
/// Holds a default destination and connect timeout; each call to a send
/// method opens and closes its own connection.
#[derive(Debug, Clone)]
pub struct Sender {
    host: String,
    port: u16,
    connect_timeout: Duration,
}

impl Sender {
    /// Create a sender targeting `host:port`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Set the connect timeout (default 100 ms).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Send a payload to this sender's default destination.
    pub async fn send(&self, payload: &[u8]) -> Result<()> {
        self.send_to(&self.host, self.port, payload).await
    }

    /// Send a payload to an explicit destination, overriding the default.
    ///
    /// Encodes one frame, writes it on a fresh connection, flushes, and
    /// closes - success or failure, the connection is not kept.
    pub async fn send_to(&self, host: &str, port: u16, payload: &[u8]) -> Result<()> {
        if host.trim().is_empty() {
            return Err(SnapwireError::Protocol(
                "destination host is empty".to_string(),
            ));
        }

        let frame = encode_frame(payload)?;

        let mut stream = connect(host, port, self.connect_timeout).await?;
        stream.write_all(&frame).await?;
        stream.flush().await?;
        stream.shutdown().await?;

        tracing::debug!(host, port, len = payload.len(), "frame sent");
        Ok(())
    }

    /// Serialize a value with [`MsgPackCodec`] and send the resulting bytes.
    ///
    /// The object-to-bytes step is a plain payload codec; the receiver sees
    /// an opaque frame like any other.
    pub async fn send_value<T: Serialize>(&self, value: &T) -> Result<()> {
        let payload = MsgPackCodec::encode(value)?;
        self.send(&payload).await
    }
}

impl Default for Sender {
    /// Sender targeting `127.0.0.1:5000`.
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

/// Connect with a bounded timeout, mapping failures to the send taxonomy.
async fn connect(host: &str, port: u16, timeout: Duration) -> Result<TcpStream> {
    match tokio::time::timeout(timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => {
            Err(SnapwireError::ConnectRefused(format!("{host}:{port}")))
        }
        Ok(Err(e)) => Err(SnapwireError::Io(e)),
        Err(_) => Err(SnapwireError::ConnectTimeout(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sender_targets_localhost() {
        let sender = Sender::default();
        assert_eq!(sender.host, DEFAULT_HOST);
        assert_eq!(sender.port, DEFAULT_PORT);
        assert_eq!(sender.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
    }

    #[test]
    fn test_connect_timeout_override() {
        let sender = Sender::new("10.0.0.1", 1234).connect_timeout(Duration::from_millis(250));
        assert_eq!(sender.connect_timeout, Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_send_to_empty_host_is_protocol_error() {
        let sender = Sender::default();
        let result = sender.send_to("  ", 5000, b"payload").await;
        assert!(matches!(result, Err(SnapwireError::Protocol(_))));
    }

    #[tokio::test]
    async fn test_send_to_closed_port_is_refused() {
        // Bind then drop to get a port with nothing listening.
        let socket = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = socket.local_addr().unwrap().port();
        drop(socket);

        let sender = Sender::new("127.0.0.1", port);
        let result = sender.send(b"payload").await;
        assert!(matches!(result, Err(SnapwireError::ConnectRefused(_))));
    }
}
