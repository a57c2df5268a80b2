//! Notification interface - how the listener surfaces received frames.
//!
//! The listener raises one notification per successfully decoded frame,
//! invoked synchronously on that connection's handler task: the next frame on
//! the same connection is not decoded until the sink returns. Sinks for
//! different connections run concurrently. There is no acknowledgement
//! channel back to the sender - by the time the sink runs, the sender has
//! already closed its connection.

use std::net::SocketAddr;

use bytes::Bytes;

/// An ephemeral decoded frame handed to the application.
///
/// Carries the payload bytes and the originating peer address; the transport
/// attaches no meaning to the bytes. Anything durable the application does
/// with them (writing an image file, triggering a device) is its own concern.
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    /// Decoded payload (zero-copy via `bytes::Bytes`).
    pub payload: Bytes,
    /// Address of the peer that sent the frame.
    pub origin: SocketAddr,
}

impl ReceivedMessage {
    /// Create a new received message.
    pub fn new(payload: Bytes, origin: SocketAddr) -> Self {
        Self { payload, origin }
    }

    /// Get a reference to the payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Originating peer IP as a string (without the port).
    pub fn origin_ip(&self) -> String {
        self.origin.ip().to_string()
    }
}

/// Observer contract for received frames.
///
/// Implemented automatically for `Fn(ReceivedMessage) + Send + Sync`
/// closures, so a listener can be wired up with a plain closure:
///
/// ```
/// use snapwire::{Listener, ReceivedMessage};
///
/// let listener = Listener::builder()
///     .sink(|msg: ReceivedMessage| {
///         println!("{} bytes from {}", msg.payload().len(), msg.origin_ip());
///     })
///     .build();
/// ```
pub trait MessageSink: Send + Sync {
    /// Called once per decoded frame, on the receiving connection's task.
    fn on_message(&self, message: ReceivedMessage);
}

impl<F> MessageSink for F
where
    F: Fn(ReceivedMessage) + Send + Sync,
{
    fn on_message(&self, message: ReceivedMessage) {
        self(message)
    }
}
