//! Builder pattern for client configuration.
//!
//! # Example
//!
//! ```ignore
//! use framepost::{Client, transport};
//!
//! let (transport, _host) = transport::channel();
//! let client = Client::builder()
//!     .transport(transport)
//!     .debug(true)
//!     .build()?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::transport::Transport;

use super::core::Client;
use super::options::ClientOptions;

// ============================================================================
// ClientBuilder
// ============================================================================

/// Builder for configuring a [`Client`] instance.
///
/// Use [`Client::builder()`] to create a new builder.
#[derive(Default, Clone)]
pub struct ClientBuilder {
    /// Channel to the host.
    transport: Option<Arc<dyn Transport>>,
    /// Client options.
    options: ClientOptions,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("has_transport", &self.transport.is_some())
            .field("options", &self.options)
            .finish()
    }
}

// ============================================================================
// ClientBuilder Implementation
// ============================================================================

impl ClientBuilder {
    /// Creates a new client builder with no transport.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the transport to the host.
    #[inline]
    #[must_use]
    pub fn transport(mut self, transport: impl Transport) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Replaces all options.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Enables or disables verbose diagnostics.
    #[inline]
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.options.debug = debug;
        self
    }

    /// Sets the per-request timeout.
    #[inline]
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.options.request_timeout = Some(timeout);
        self
    }

    /// Sets the handshake timeout.
    #[inline]
    #[must_use]
    pub fn context_timeout(mut self, timeout: Duration) -> Self {
        self.options.context_timeout = Some(timeout);
        self
    }

    /// Builds the client and starts listening for host envelopes.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if no transport is set
    /// - [`Error::Config`] if options are invalid
    pub fn build(self) -> Result<Client> {
        let transport = self.transport.ok_or_else(|| {
            Error::config(
                "Transport is required. Use .transport() to set it.\n\
                 Example: Client::builder().transport(transport::channel().0)",
            )
        })?;

        self.options.validate()?;

        Ok(Client::new(transport, self.options))
    }
}

// ============================================================================
// Tests
// ============================================================================
