//! In-memory transport.
//!
//! [`channel()`] returns a [`ChannelTransport`] for the child and a
//! [`HostEnd`] that plays the host: it reads the child's requests and posts
//! `init`/`response` envelopes back. Useful for in-process embedders,
//! tests and benchmarks.
//!
//! # Example
//!
//! ```ignore
//! let (transport, mut host) = framepost::transport::channel();
//! host.send_init(Context::with_features(["modals"]));
//!
//! let client = Client::builder().transport(transport).build()?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::trace;

use crate::error::{Error, Result};
use crate::identifiers::RequestId;
use crate::protocol::{Context, Envelope, RequestType};

use super::{Listener, ListenerSlot, Transport};

// ============================================================================
// Constructor
// ============================================================================

/// Creates a connected child transport and host handle.
#[must_use]
pub fn channel() -> (ChannelTransport, HostEnd) {
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let inbound = Arc::new(ListenerSlot::default());

    let transport = ChannelTransport {
        outbound: outbound_tx,
        inbound: Arc::clone(&inbound),
    };
    let host = HostEnd {
        outbound: outbound_rx,
        inbound,
    };

    (transport, host)
}

// ============================================================================
// ChannelTransport
// ============================================================================

/// Child side of an in-memory channel.
#[derive(Clone)]
pub struct ChannelTransport {
    /// Child → host queue.
    outbound: mpsc::UnboundedSender<Envelope>,
    /// Host → child delivery.
    inbound: Arc<ListenerSlot>,
}

impl fmt::Debug for ChannelTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelTransport")
            .field("closed", &self.outbound.is_closed())
            .finish_non_exhaustive()
    }
}

impl Transport for ChannelTransport {
    fn send(&self, envelope: Envelope) -> Result<()> {
        trace!(kind = envelope.kind(), "Queueing envelope for host");
        self.outbound
            .send(envelope)
            .map_err(|_| Error::ConnectionClosed)
    }

    fn subscribe(&self, listener: Listener) {
        self.inbound.subscribe(listener);
    }
}

// ============================================================================
// HostEnd
// ============================================================================

/// Host side of an in-memory channel.
///
/// Dropping it closes the channel: further child sends fail with
/// [`Error::ConnectionClosed`].
pub struct HostEnd {
    /// Child → host queue.
    outbound: mpsc::UnboundedReceiver<Envelope>,
    /// Host → child delivery.
    inbound: Arc<ListenerSlot>,
}

impl fmt::Debug for HostEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostEnd")
            .field("queued", &self.outbound.len())
            .finish_non_exhaustive()
    }
}

impl HostEnd {
    /// Delivers an envelope to the child.
    ///
    /// Runs the child's listener before returning.
    pub fn post(&self, envelope: Envelope) {
        self.inbound.deliver(envelope);
    }

    /// Sends the `init` handshake.
    pub fn send_init(&self, context: Context) {
        self.post(Envelope::init(context));
    }

    /// Answers a request with a result.
    pub fn respond(&self, id: RequestId, result: Value) {
        self.post(Envelope::success(id, result));
    }

    /// Answers a request with an error.
    pub fn fail(&self, id: RequestId, message: impl Into<String>) {
        self.post(Envelope::failure(id, message));
    }

    /// Waits for the next envelope sent by the child.
    ///
    /// Returns `None` once every child transport is dropped.
    pub async fn recv(&mut self) -> Option<Envelope> {
        self.outbound.recv().await
    }

    /// Returns the next envelope sent by the child without waiting.
    pub fn try_recv(&mut self) -> Option<Envelope> {
        self.outbound.try_recv().ok()
    }

    /// Waits for the next `request` envelope, skipping anything else.
    pub async fn next_request(&mut self) -> Option<(RequestId, RequestType, Value)> {
        while let Some(envelope) = self.recv().await {
            if let Envelope::Request {
                id,
                request_type,
                payload,
            } = envelope
            {
                return Some((id, request_type, payload));
            }
        }
        None
    }
}

// ============================================================================
// Tests
// ============================================================================
