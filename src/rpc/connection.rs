//! Request/response correlation and the context handshake.
//!
//! [`Connection`] turns the fire-and-forget [`Transport`] into awaitable
//! requests:
//!
//! - Each request gets a fresh [`RequestId`] and a pending entry
//! - Inbound `response` envelopes resolve the entry with the same id
//! - The first inbound `init` envelope becomes the cached [`Context`]
//!
//! Responses may arrive in any order. A response whose id matches no pending
//! entry is dropped.
//!
//! # Handshake liveness
//!
//! Without [`ClientOptions::context_timeout`], [`Connection::get_context`]
//! waits forever if the host never sends `init`. With it, the handshake
//! expires at the deadline (measured from construction) and every pending
//! and future context-dependent call fails with [`Error::ContextTimeout`].

// ============================================================================
// Imports
// ============================================================================

use std::collections::hash_map::Entry;
use std::fmt;
use std::mem;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::time::{Instant, timeout, timeout_at};
use tracing::{debug, trace, warn};

use crate::client::ClientOptions;
use crate::error::{Error, Result};
use crate::identifiers::RequestId;
use crate::protocol::envelope::into_result;
use crate::protocol::{Context, Envelope, RequestType};
use crate::transport::Transport;

// ============================================================================
// Types
// ============================================================================

/// Map of request IDs to pending continuations.
type PendingMap = FxHashMap<RequestId, PendingRequest>;

/// An outstanding request.
struct PendingRequest {
    /// Resumes the caller.
    response_tx: oneshot::Sender<Result<Value>>,
    /// Operation name, for diagnostics.
    request_type: RequestType,
    /// When the request was sent.
    created_at: Instant,
}

/// Handshake progress.
enum Handshake {
    /// No `init` yet; callers parked here.
    Waiting(Vec<oneshot::Sender<Arc<Context>>>),
    /// `init` received.
    Ready(Arc<Context>),
    /// Deadline passed before `init`.
    Expired,
}

/// Shared state of a connection.
struct ConnectionInner {
    /// Outbound/inbound channel to the host.
    transport: Arc<dyn Transport>,
    /// Outstanding requests.
    pending: Mutex<PendingMap>,
    /// Handshake state.
    handshake: Mutex<Handshake>,
    /// Set once the inbound listener is registered.
    listening: AtomicBool,
    /// Per-request deadline.
    request_timeout: Option<Duration>,
    /// Handshake deadline and its configured length.
    context_deadline: Option<(Instant, Duration)>,
}

// ============================================================================
// Connection
// ============================================================================

/// Correlation engine between the child and its host.
///
/// Cheap to clone; clones share the pending table and cached context.
#[derive(Clone)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("listening", &self.is_initialized())
            .field("pending", &self.pending_count())
            .field("has_context", &self.context().is_some())
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Creates a connection over `transport`.
    ///
    /// Does not listen until [`Connection::initialize`] is called. The
    /// handshake deadline, if any, starts now.
    pub fn new(transport: Arc<dyn Transport>, options: &ClientOptions) -> Self {
        let context_deadline = options
            .context_timeout
            .map(|limit| (Instant::now() + limit, limit));

        Self {
            inner: Arc::new(ConnectionInner {
                transport,
                pending: Mutex::new(PendingMap::default()),
                handshake: Mutex::new(Handshake::Waiting(Vec::new())),
                listening: AtomicBool::new(false),
                request_timeout: options.request_timeout,
                context_deadline,
            }),
        }
    }

    /// Registers the inbound listener on the transport.
    ///
    /// Idempotent: later calls register nothing and leave pending requests
    /// untouched.
    pub fn initialize(&self) {
        if self.inner.listening.swap(true, Ordering::AcqRel) {
            trace!("Connection already initialized");
            return;
        }

        let weak = Arc::downgrade(&self.inner);
        self.inner.transport.subscribe(Box::new(move |envelope| {
            if let Some(inner) = weak.upgrade() {
                inner.dispatch(envelope);
            }
        }));

        debug!("Inbound listener registered");
    }

    /// Returns `true` once [`Connection::initialize`] has run.
    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.inner.listening.load(Ordering::Acquire)
    }

    /// Sends a request and waits for the matching response.
    ///
    /// A response without `result` resolves to [`Value::Null`].
    ///
    /// # Errors
    ///
    /// - [`Error::Remote`] if the host answered with an error
    /// - [`Error::RequestTimeout`] if a request timeout is configured and elapses
    /// - [`Error::ConnectionClosed`] or [`Error::Json`] if the transport rejects the envelope
    pub async fn request(&self, request_type: RequestType, payload: Value) -> Result<Value> {
        let (response_tx, response_rx) = oneshot::channel();

        // Store correlation before sending
        let request_id = {
            let mut pending = self.inner.pending.lock();
            loop {
                let candidate = RequestId::generate();
                if let Entry::Vacant(slot) = pending.entry(candidate) {
                    slot.insert(PendingRequest {
                        response_tx,
                        request_type,
                        created_at: Instant::now(),
                    });
                    break candidate;
                }
            }
        };

        let envelope = Envelope::request(request_id, request_type, payload);
        if let Err(e) = self.inner.transport.send(envelope) {
            self.inner.pending.lock().remove(&request_id);
            return Err(e);
        }

        trace!(%request_id, %request_type, "Request sent");

        let received = match self.inner.request_timeout {
            Some(limit) => match timeout(limit, response_rx).await {
                Ok(received) => received,
                Err(_) => {
                    self.inner.pending.lock().remove(&request_id);
                    debug!(%request_id, %request_type, "Request timed out");
                    return Err(Error::request_timeout(
                        request_id,
                        limit.as_millis() as u64,
                    ));
                }
            },
            None => response_rx.await,
        };

        received.map_err(|_| Error::ConnectionClosed)?
    }

    /// Returns the handshake context, waiting for `init` if necessary.
    ///
    /// Every caller receives the same `Arc`.
    ///
    /// # Errors
    ///
    /// [`Error::ContextTimeout`] if a context timeout is configured and has
    /// passed without `init`. Never fails otherwise.
    pub async fn get_context(&self) -> Result<Arc<Context>> {
        let context_rx = {
            let mut handshake = self.inner.handshake.lock();
            match *handshake {
                Handshake::Ready(ref context) => return Ok(Arc::clone(context)),
                Handshake::Expired => return Err(self.context_timeout_error()),
                Handshake::Waiting(ref mut waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    rx
                }
            }
        };

        let received = match self.inner.context_deadline {
            Some((deadline, _)) => match timeout_at(deadline, context_rx).await {
                Ok(received) => received,
                Err(_) => return self.expire_handshake(),
            },
            None => context_rx.await,
        };

        match received {
            Ok(context) => Ok(context),
            // Waiters are only dropped on expiry
            Err(_) => self.expire_handshake(),
        }
    }

    /// Returns the cached context without waiting.
    #[inline]
    #[must_use]
    pub fn context(&self) -> Option<Arc<Context>> {
        match *self.inner.handshake.lock() {
            Handshake::Ready(ref context) => Some(Arc::clone(context)),
            _ => None,
        }
    }

    /// Returns the number of pending requests.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.pending.lock().len()
    }

    /// Marks the handshake expired unless `init` won the race.
    fn expire_handshake(&self) -> Result<Arc<Context>> {
        let waiters = {
            let mut handshake = self.inner.handshake.lock();
            match *handshake {
                Handshake::Ready(ref context) => return Ok(Arc::clone(context)),
                Handshake::Expired => Vec::new(),
                Handshake::Waiting(ref mut waiters) => {
                    let waiters = mem::take(waiters);
                    *handshake = Handshake::Expired;
                    waiters
                }
            }
        };

        if !waiters.is_empty() {
            warn!(waiters = waiters.len(), "Handshake expired before init");
        }
        drop(waiters);

        Err(self.context_timeout_error())
    }

    fn context_timeout_error(&self) -> Error {
        let timeout_ms = self
            .inner
            .context_deadline
            .map_or(0, |(_, limit)| limit.as_millis() as u64);
        Error::context_timeout(timeout_ms)
    }
}

// ============================================================================
// Inbound Dispatch
// ============================================================================

impl ConnectionInner {
    /// Handles one inbound envelope.
    fn dispatch(&self, envelope: Envelope) {
        match envelope {
            Envelope::Init { context } => self.handle_init(context),

            Envelope::Response { id, result, error } => {
                let entry = self.pending.lock().remove(&id);

                match entry {
                    Some(pending) => {
                        trace!(
                            request_id = %id,
                            request_type = %pending.request_type,
                            elapsed_ms = pending.created_at.elapsed().as_millis() as u64,
                            failed = error.is_some(),
                            "Response received"
                        );
                        let _ = pending.response_tx.send(into_result(result, error));
                    }
                    None => debug!(request_id = %id, "Response for unknown request dropped"),
                }
            }

            Envelope::Request {
                id, request_type, ..
            } => {
                warn!(request_id = %id, %request_type, "Ignoring request envelope from host");
            }
        }
    }

    fn deadline_passed(&self) -> bool {
        self.context_deadline
            .is_some_and(|(deadline, _)| Instant::now() >= deadline)
    }

    fn handle_init(&self, context: Context) {
        let (context, waiters) = {
            let mut handshake = self.handshake.lock();
            match *handshake {
                Handshake::Ready(_) => {
                    debug!("Ignoring repeated init envelope");
                    return;
                }
                Handshake::Expired => {
                    warn!("Ignoring init envelope after handshake expired");
                    return;
                }
                Handshake::Waiting(ref mut waiters) => {
                    let waiters = mem::take(waiters);
                    if self.deadline_passed() {
                        *handshake = Handshake::Expired;
                        warn!(waiters = waiters.len(), "Ignoring init envelope after deadline");
                        return;
                    }

                    let context = Arc::new(context);
                    *handshake = Handshake::Ready(Arc::clone(&context));
                    (context, waiters)
                }
            }
        };

        debug!(
            waiters = waiters.len(),
            features = ?context.features(),
            "Handshake completed"
        );

        for waiter in waiters {
            let _ = waiter.send(Arc::clone(&context));
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
