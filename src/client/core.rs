//! Client handle.
//!
//! The [`Client`] bundles the [`Connection`] with the feature clients built
//! on top of it.
//!
//! # Example
//!
//! ```ignore
//! let client = Client::builder().transport(transport).build()?;
//!
//! let context = client.get_context().await?;
//! if context.has_feature("modals") {
//!     client.modal().open("settings").await?;
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::Result;
use crate::features::ModalClient;
use crate::protocol::Context;
use crate::rpc::{CapabilityGate, Connection};
use crate::transport::Transport;

use super::builder::ClientBuilder;
use super::options::ClientOptions;

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for the client.
struct ClientInner {
    /// Correlation engine.
    connection: Connection,
    /// Feature checks.
    gate: CapabilityGate,
    /// Modal feature client.
    modal: ModalClient,
    /// Options the client was built with.
    options: ClientOptions,
}

// ============================================================================
// Client
// ============================================================================

/// Entry point for talking to the host.
///
/// Cheap to clone; clones share one connection.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("connection", &self.inner.connection)
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a configuration builder for the client.
    #[inline]
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Wires the client and registers the inbound listener.
    pub(crate) fn new(transport: Arc<dyn Transport>, options: ClientOptions) -> Self {
        let connection = Connection::new(transport, &options);
        connection.initialize();

        let gate = CapabilityGate::new(connection.clone());
        let modal = ModalClient::new(options.debug, gate.clone(), connection.clone());

        debug!(debug = options.debug, "Client created");

        Self {
            inner: Arc::new(ClientInner {
                connection,
                gate,
                modal,
                options,
            }),
        }
    }
}

// ============================================================================
// Client - Public API
// ============================================================================

impl Client {
    /// Returns the modal feature client.
    #[inline]
    #[must_use]
    pub fn modal(&self) -> &ModalClient {
        &self.inner.modal
    }

    /// Returns the handshake context, waiting for it if necessary.
    ///
    /// # Errors
    ///
    /// [`crate::Error::ContextTimeout`] if a context timeout is configured and
    /// passes without the handshake.
    pub async fn get_context(&self) -> Result<Arc<Context>> {
        self.inner.connection.get_context().await
    }

    /// Returns the handshake context if it already arrived.
    #[inline]
    #[must_use]
    pub fn context(&self) -> Option<Arc<Context>> {
        self.inner.connection.context()
    }

    /// Returns `true` if the host advertises `feature`.
    ///
    /// Waits for the handshake first.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::Error::ContextTimeout`] from the handshake wait.
    pub async fn has_feature(&self, feature: &str) -> Result<bool> {
        self.inner.gate.has_feature(feature).await
    }

    /// Invokes `callback` with the context once the handshake completes.
    ///
    /// The callback runs on a spawned tokio task.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn on_context<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Arc<Context>) + Send + 'static,
    {
        let connection = self.inner.connection.clone();

        tokio::spawn(async move {
            match connection.get_context().await {
                Ok(context) => callback(context),
                Err(e) => warn!(error = %e, "Context callback not invoked"),
            }
        })
    }

    /// Returns the underlying connection.
    #[inline]
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.inner.connection
    }

    /// Returns the options the client was built with.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &ClientOptions {
        &self.inner.options
    }
}

// ============================================================================
// Tests
// ============================================================================
