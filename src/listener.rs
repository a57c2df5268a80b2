//! Listener - accept loop and per-connection frame handlers.
//!
//! The listener owns a bound TCP socket and runs an accept loop on its own
//! task. Each accepted connection is handed to an independently spawned
//! handler task that repeatedly decodes frames and raises them through the
//! [`MessageSink`] until the peer disconnects or an I/O error occurs.
//!
//! Shutdown is cooperative: `stop()` signals the accept loop and awaits it
//! instead of aborting the task. In-flight handlers are deliberately left
//! running; they wind down when their peers disconnect or error.
//!
//! # Example
//!
//! ```ignore
//! use snapwire::{Listener, ReceivedMessage};
//!
//! let listener = Listener::builder()
//!     .sink(|msg: ReceivedMessage| save_image(msg.payload()))
//!     .build();
//!
//! listener.start(5000).await?;
//! // ...
//! listener.stop().await;
//! ```

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;

use crate::error::{Result, SnapwireError};
use crate::notify::{MessageSink, ReceivedMessage};
use crate::protocol::{read_frame, DEFAULT_MAX_FRAME_SIZE};
use crate::registry::ConnectionRegistry;

/// Default receive port.
pub const DEFAULT_PORT: u16 = 5000;

/// Builder for configuring and creating a [`Listener`].
pub struct ListenerBuilder {
    sink: Option<Arc<dyn MessageSink>>,
    registry: ConnectionRegistry,
    max_frame_size: u32,
}

impl ListenerBuilder {
    /// Create a new listener builder.
    pub fn new() -> Self {
        Self {
            sink: None,
            registry: ConnectionRegistry::new(),
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }

    /// Set the message sink that receives decoded frames.
    pub fn sink(mut self, sink: impl MessageSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Inject a connection registry shared with the caller.
    ///
    /// Defaults to a fresh registry owned by this listener.
    pub fn registry(mut self, registry: ConnectionRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set the maximum accepted frame size in bytes.
    ///
    /// Frames declaring a larger length are rejected with a protocol error
    /// before any payload allocation. Default: 64 MiB.
    pub fn max_frame_size(mut self, max_frame_size: u32) -> Self {
        self.max_frame_size = max_frame_size;
        self
    }

    /// Build the listener. It does not accept connections until `start()`.
    pub fn build(self) -> Listener {
        let sink = self.sink.unwrap_or_else(|| {
            Arc::new(|msg: ReceivedMessage| {
                tracing::debug!(origin = %msg.origin, len = msg.payload().len(), "frame dropped: no sink configured");
            })
        });

        Listener {
            sink,
            registry: self.registry,
            max_frame_size: self.max_frame_size,
            state: Mutex::new(ListenState::Created),
            accept_failed: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Default for ListenerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Listener lifecycle state.
enum ListenState {
    Created,
    Listening(AcceptLoop),
    Stopped,
}

/// Handle to a running accept loop.
struct AcceptLoop {
    shutdown: Arc<Notify>,
    task: JoinHandle<()>,
    local_addr: SocketAddr,
}

/// Frame-receiving TCP server.
///
/// Lifecycle: `Created -> Listening -> Stopped`, with restart permitted after
/// a stop. `start()` while already listening is a no-op.
pub struct Listener {
    sink: Arc<dyn MessageSink>,
    registry: ConnectionRegistry,
    max_frame_size: u32,
    state: Mutex<ListenState>,
    accept_failed: Arc<AtomicBool>,
}

impl Listener {
    /// Create a listener builder.
    pub fn builder() -> ListenerBuilder {
        ListenerBuilder::new()
    }

    /// Create a listener with the given sink and default configuration.
    pub fn new(sink: impl MessageSink + 'static) -> Self {
        Self::builder().sink(sink).build()
    }

    /// Bind `0.0.0.0:port` and begin accepting connections.
    ///
    /// Returns the bound local address (useful with port 0). Calling `start`
    /// while already listening is a no-op and returns the existing address.
    ///
    /// # Errors
    ///
    /// Returns [`SnapwireError::Io`] if the bind fails (e.g. port in use).
    pub async fn start(&self, port: u16) -> Result<SocketAddr> {
        let mut state = self.state.lock().await;

        if let ListenState::Listening(ref accept_loop) = *state {
            tracing::debug!(addr = %accept_loop.local_addr, "start: already listening");
            return Ok(accept_loop.local_addr);
        }

        let socket = TcpListener::bind(("0.0.0.0", port)).await?;
        let local_addr = socket.local_addr()?;
        self.accept_failed.store(false, Ordering::Release);

        let shutdown = Arc::new(Notify::new());
        let task = tokio::spawn(accept_loop(
            socket,
            shutdown.clone(),
            self.sink.clone(),
            self.registry.clone(),
            self.max_frame_size,
            self.accept_failed.clone(),
        ));

        tracing::info!(addr = %local_addr, "listener started");

        *state = ListenState::Listening(AcceptLoop {
            shutdown,
            task,
            local_addr,
        });

        Ok(local_addr)
    }

    /// Stop accepting new connections.
    ///
    /// Signals the accept loop, awaits its clean exit, and closes the accept
    /// socket. In-flight handler connections are not touched; they continue
    /// until their peers disconnect or error, and the registry count reflects
    /// them until then. No-op unless currently listening.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;

        if let ListenState::Listening(accept_loop) =
            std::mem::replace(&mut *state, ListenState::Stopped)
        {
            accept_loop.shutdown.notify_one();
            if accept_loop.task.await.is_err() {
                tracing::warn!("accept loop task panicked during stop");
            }
            tracing::info!(addr = %accept_loop.local_addr, "listener stopped");
        }
    }

    /// Address the accept socket is bound to, if listening.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        match *self.state.lock().await {
            ListenState::Listening(ref accept_loop) => Some(accept_loop.local_addr),
            _ => None,
        }
    }

    /// Whether the listener is currently accepting connections.
    pub async fn is_listening(&self) -> bool {
        matches!(*self.state.lock().await, ListenState::Listening(_))
    }

    /// Whether the accept loop terminated on an accept error.
    ///
    /// A true value means the server is no longer accepting new connections
    /// even though `stop()` was never called - fatal for the listening
    /// capability, unlike an ordinary per-connection error.
    pub fn has_accept_failed(&self) -> bool {
        self.accept_failed.load(Ordering::Acquire)
    }

    /// The registry tracking this listener's live connections.
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }
}

/// Accept loop body - runs on its own task until stopped or failed.
async fn accept_loop(
    socket: TcpListener,
    shutdown: Arc<Notify>,
    sink: Arc<dyn MessageSink>,
    registry: ConnectionRegistry,
    max_frame_size: u32,
    accept_failed: Arc<AtomicBool>,
) {
    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                tracing::debug!("accept loop shutting down");
                break;
            }
            accepted = socket.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        let sink = sink.clone();
                        let registry = registry.clone();
                        tokio::spawn(async move {
                            // Guard pairs the increment with exactly one
                            // decrement on every handler exit path.
                            let _guard = registry.guard();
                            handle_connection(stream, peer, sink, max_frame_size).await;
                        });
                    }
                    Err(e) => {
                        // Fatal for the listening capability: no further
                        // connections will be accepted.
                        tracing::error!(error = %e, "accept failed, listener no longer accepting");
                        accept_failed.store(true, Ordering::Release);
                        break;
                    }
                }
            }
        }
    }
    // The accept socket closes here when `socket` drops.
}

/// Per-connection handler: decode frames and raise notifications until the
/// peer disconnects or errors.
async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    sink: Arc<dyn MessageSink>,
    max_frame_size: u32,
) {
    tracing::info!(%peer, "connection accepted");

    loop {
        match read_frame(&mut stream, max_frame_size).await {
            Ok(Some(payload)) => {
                // Synchronous on this task: the next frame on this connection
                // is not decoded until the sink returns.
                sink.on_message(ReceivedMessage::new(payload, peer));
            }
            Ok(None) => {
                tracing::debug!(%peer, "peer disconnected");
                break;
            }
            Err(SnapwireError::Protocol(msg)) => {
                tracing::warn!(%peer, %msg, "protocol violation, closing connection");
                break;
            }
            Err(e) => {
                tracing::warn!(%peer, error = %e, "connection error, closing");
                break;
            }
        }
    }
}
