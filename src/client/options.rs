//! Client configuration.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use framepost::ClientOptions;
//!
//! let options = ClientOptions::new()
//!     .with_debug()
//!     .with_request_timeout(Duration::from_secs(10))
//!     .with_context_timeout(Duration::from_secs(5));
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::error::{Error, Result};

// ============================================================================
// ClientOptions
// ============================================================================

/// Client configuration options.
///
/// Both timeouts are off by default: requests and the handshake wait as
/// long as it takes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    /// Verbose per-call diagnostics from feature clients.
    pub debug: bool,

    /// Deadline for each request's response.
    pub request_timeout: Option<Duration>,

    /// Deadline for the host's `init` handshake, measured from client
    /// construction.
    pub context_timeout: Option<Duration>,
}

// ============================================================================
// Constructors
// ============================================================================

impl ClientOptions {
    /// Creates a new options instance with default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            debug: false,
            request_timeout: None,
            context_timeout: None,
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl ClientOptions {
    /// Enables verbose diagnostics.
    #[inline]
    #[must_use]
    pub fn with_debug(mut self) -> Self {
        self.debug = true;
        self
    }

    /// Sets the per-request timeout.
    #[inline]
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the handshake timeout.
    #[inline]
    #[must_use]
    pub fn with_context_timeout(mut self, timeout: Duration) -> Self {
        self.context_timeout = Some(timeout);
        self
    }
}

// ============================================================================
// Validation
// ============================================================================

impl ClientOptions {
    /// Validates the options configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::config("Request timeout must be greater than zero"));
        }
        if self.context_timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::config("Context timeout must be greater than zero"));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
