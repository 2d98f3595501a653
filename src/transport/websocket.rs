//! WebSocket transport.
//!
//! Carries one envelope per JSON text frame. The transport spawns a tokio
//! task that owns the socket:
//!
//! - Incoming text frames are parsed and delivered to the listener
//! - Outgoing envelopes are written in the order they were sent
//! - Binary, ping and pong frames are ignored
//!
//! When the socket closes or errors the task ends, and every later
//! [`Transport::send`] fails with [`Error::ConnectionClosed`].

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, trace, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::protocol::Envelope;

use super::{Listener, ListenerSlot, Transport};

// ============================================================================
// SocketCommand
// ============================================================================

/// Internal commands for the event loop.
enum SocketCommand {
    /// Write an encoded envelope.
    Send(String),
    /// Close the socket.
    Shutdown,
}

// ============================================================================
// WebSocketTransport
// ============================================================================

/// Envelope transport over a WebSocket connection to the host.
///
/// Cloning yields another handle to the same socket.
#[derive(Clone)]
pub struct WebSocketTransport {
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<SocketCommand>,
    /// Inbound delivery (shared with event loop).
    inbound: Arc<ListenerSlot>,
}

impl fmt::Debug for WebSocketTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebSocketTransport")
            .field("closed", &self.command_tx.is_closed())
            .finish_non_exhaustive()
    }
}

impl WebSocketTransport {
    /// Connects to a host listening at `url`.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if `url` is not a `ws://` or `wss://` URL
    /// - [`Error::WebSocket`] if the connection or upgrade fails
    pub async fn connect(url: &str) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|e| Error::config(format!("Invalid WebSocket URL {url:?}: {e}")))?;

        if !matches!(parsed.scheme(), "ws" | "wss") {
            return Err(Error::config(format!(
                "WebSocket URL must use ws:// or wss://, got {}://",
                parsed.scheme()
            )));
        }

        let (ws_stream, _) = tokio_tungstenite::connect_async(parsed.as_str()).await?;
        debug!(url = %parsed, "WebSocket connected");

        Ok(Self::from_stream(ws_stream))
    }

    /// Wraps an established WebSocket stream.
    ///
    /// Spawns the event loop task internally.
    pub fn from_stream<S>(ws_stream: WebSocketStream<S>) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let inbound = Arc::new(ListenerSlot::default());

        tokio::spawn(Self::run_event_loop(
            ws_stream,
            command_rx,
            Arc::clone(&inbound),
        ));

        Self {
            command_tx,
            inbound,
        }
    }

    /// Closes the socket.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(SocketCommand::Shutdown);
    }

    /// Returns `true` once the event loop has exited.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }

    /// Event loop that handles WebSocket I/O.
    async fn run_event_loop<S>(
        ws_stream: WebSocketStream<S>,
        mut command_rx: mpsc::UnboundedReceiver<SocketCommand>,
        inbound: Arc<ListenerSlot>,
    ) where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => match Envelope::from_json(text.as_str()) {
                            Ok(envelope) => {
                                trace!(kind = envelope.kind(), "Envelope received");
                                inbound.deliver(envelope);
                            }
                            Err(e) => warn!(error = %e, text = %text.as_str(), "Failed to parse incoming frame"),
                        },

                        Some(Ok(Message::Close(_))) => {
                            debug!("WebSocket closed by host");
                            break;
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            break;
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            break;
                        }

                        // Ignore Binary, Ping, Pong
                        _ => {}
                    }
                }

                command = command_rx.recv() => {
                    match command {
                        Some(SocketCommand::Send(json)) => {
                            if let Err(e) = ws_write.send(Message::Text(json.into())).await {
                                error!(error = %e, "Failed to write envelope");
                                break;
                            }
                        }

                        Some(SocketCommand::Shutdown) => {
                            debug!("Shutdown command received");
                            let _ = ws_write.close().await;
                            break;
                        }

                        None => {
                            debug!("Command channel closed");
                            break;
                        }
                    }
                }
            }
        }

        debug!("WebSocket event loop terminated");
    }
}

impl Transport for WebSocketTransport {
    fn send(&self, envelope: Envelope) -> Result<()> {
        let json = envelope.to_json()?;
        self.command_tx
            .send(SocketCommand::Send(json))
            .map_err(|_| Error::ConnectionClosed)
    }

    fn subscribe(&self, listener: Listener) {
        self.inbound.subscribe(listener);
    }
}

// ============================================================================
// Tests
// ============================================================================
