//! Transport layer.
//!
//! A transport hands envelopes to a single fixed counterpart and reports
//! every inbound envelope to one registered listener. It has no request or
//! handshake semantics of its own; those live in [`crate::rpc`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Child (Rust)   │        Envelope (JSON)       │  Host document  │
//! │                 │◄────────────────────────────►│                 │
//! │  Connection     │   send() / subscribe()       │  HostEnd / WS   │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `channel` | In-memory transport paired with a [`HostEnd`] |
//! | `websocket` | JSON text frames over a WebSocket stream |

// ============================================================================
// Submodules
// ============================================================================

/// In-memory transport pair.
pub mod channel;

/// WebSocket transport.
pub mod websocket;

// ============================================================================
// Imports
// ============================================================================

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::error::Result;
use crate::protocol::Envelope;

// ============================================================================
// Re-exports
// ============================================================================

pub use channel::{ChannelTransport, HostEnd, channel};
pub use websocket::WebSocketTransport;

// ============================================================================
// Types
// ============================================================================

/// Inbound envelope callback.
///
/// Invoked once per inbound envelope, never concurrently with itself.
pub type Listener = Box<dyn Fn(Envelope) + Send + Sync>;

// ============================================================================
// Transport
// ============================================================================

/// Raw envelope channel to the host.
pub trait Transport: Send + Sync + 'static {
    /// Hands an envelope to the channel.
    ///
    /// Returns once the envelope is queued; delivery is not confirmed.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::ConnectionClosed`] if the channel is gone
    /// - [`crate::Error::Json`] if the envelope cannot be encoded
    fn send(&self, envelope: Envelope) -> Result<()>;

    /// Registers the inbound listener, replacing any previous one.
    ///
    /// Envelopes that arrived before the first subscription are delivered
    /// to the new listener in arrival order.
    fn subscribe(&self, listener: Listener);
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, envelope: Envelope) -> Result<()> {
        (**self).send(envelope)
    }

    fn subscribe(&self, listener: Listener) {
        (**self).subscribe(listener);
    }
}

// ============================================================================
// ListenerSlot
// ============================================================================

/// Inbound side shared by the bundled transports.
///
/// Holds the listener and a backlog of envelopes received before anyone
/// subscribed. Delivery happens under the slot lock, so envelopes are
/// processed one at a time. A listener must not deliver into its own slot.
#[derive(Default)]
pub(crate) struct ListenerSlot {
    state: Mutex<SlotState>,
}

#[derive(Default)]
struct SlotState {
    listener: Option<Listener>,
    backlog: VecDeque<Envelope>,
}

impl ListenerSlot {
    /// Installs a listener and flushes the backlog into it.
    pub(crate) fn subscribe(&self, listener: Listener) {
        let mut state = self.state.lock();
        let backlog = std::mem::take(&mut state.backlog);

        if !backlog.is_empty() {
            trace!(count = backlog.len(), "Flushing buffered envelopes");
        }

        for envelope in backlog {
            listener(envelope);
        }

        state.listener = Some(listener);
    }

    /// Delivers an envelope to the listener, or buffers it.
    pub(crate) fn deliver(&self, envelope: Envelope) {
        let mut state = self.state.lock();
        match state.listener {
            Some(ref listener) => listener(envelope),
            None => state.backlog.push_back(envelope),
        }
    }

    /// Returns the number of buffered envelopes.
    #[cfg(test)]
    pub(crate) fn backlog_len(&self) -> usize {
        self.state.lock().backlog.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
