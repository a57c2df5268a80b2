//! # snapwire
//!
//! Point-to-point binary transport for moving a captured image (or any
//! opaque byte payload) from a capture client to a receiving process.
//!
//! ## Architecture
//!
//! - **Wire format**: 4-byte Little Endian length prefix + payload, no type
//!   tag or checksum
//! - **Listener**: accept loop on its own task, one handler task per
//!   connection, cooperative shutdown
//! - **Sender**: one connect-send-close transaction per payload, bounded
//!   connect timeout, no pooling or retry
//!
//! ## Example
//!
//! ```ignore
//! use snapwire::{Listener, ReceivedMessage, Sender};
//!
//! #[tokio::main]
//! async fn main() -> snapwire::Result<()> {
//!     let listener = Listener::new(|msg: ReceivedMessage| {
//!         println!("{} bytes from {}", msg.payload().len(), msg.origin_ip());
//!     });
//!     listener.start(5000).await?;
//!
//!     let sender = Sender::new("127.0.0.1", 5000);
//!     sender.send(b"\x01\x02\x03").await?;
//!
//!     listener.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! Delivery is best effort, at most once per attempt: there is no
//! acknowledgement channel, and a failed send surfaces as a typed error for
//! the caller to act on.

pub mod codec;
pub mod error;
pub mod protocol;

mod listener;
mod notify;
mod registry;
mod sender;

pub use error::{Result, SnapwireError};
pub use listener::{Listener, ListenerBuilder, DEFAULT_PORT};
pub use notify::{MessageSink, ReceivedMessage};
pub use registry::{ConnectionGuard, ConnectionRegistry};
pub use sender::{Sender, DEFAULT_CONNECT_TIMEOUT, DEFAULT_HOST};
