//! Error types for framepost.
//!
//! Every fallible operation in the crate returns [`Result<T>`], which uses
//! [`Error`].
//!
//! # Usage
//!
//! ```ignore
//! use framepost::{Error, Result};
//!
//! async fn example(client: &framepost::Client) -> Result<()> {
//!     match client.modal().open("settings").await {
//!         Err(Error::FeatureDisabled { feature }) => println!("host lacks {feature}"),
//!         other => { other?; }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Local (never sent) | [`Error::InvalidInput`], [`Error::FeatureDisabled`] |
//! | Remote | [`Error::Remote`] |
//! | Timeout | [`Error::RequestTimeout`], [`Error::ContextTimeout`] |
//! | Configuration | [`Error::Config`] |
//! | Transport | [`Error::ConnectionClosed`], [`Error::WebSocket`] |
//! | External | [`Error::Json`], [`Error::WebSocket`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::identifiers::RequestId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Local Errors
    // ========================================================================
    /// Caller-supplied input failed local validation.
    ///
    /// Nothing was sent to the host.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of the validation failure.
        message: String,
    },

    /// The host context does not advertise the required feature.
    ///
    /// Nothing was sent to the host.
    #[error("Feature not enabled: {feature}")]
    FeatureDisabled {
        /// Feature identifier that was required.
        feature: String,
    },

    // ========================================================================
    // Remote Errors
    // ========================================================================
    /// The host answered the request with an error.
    #[error("Remote error: {message}")]
    Remote {
        /// Error description supplied by the host.
        message: String,
    },

    // ========================================================================
    // Timeout Errors
    // ========================================================================
    /// No response arrived before the request deadline.
    #[error("Request {request_id} timed out after {timeout_ms}ms")]
    RequestTimeout {
        /// The request ID that timed out.
        request_id: RequestId,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// The host never delivered the handshake context.
    ///
    /// Terminal: once returned, every later context-dependent call fails
    /// the same way.
    #[error("Handshake context not received after {timeout_ms}ms")]
    ContextTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// Transport or response continuation went away.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an invalid input error.
    #[inline]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a feature disabled error.
    #[inline]
    pub fn feature_disabled(feature: impl Into<String>) -> Self {
        Self::FeatureDisabled {
            feature: feature.into(),
        }
    }

    /// Creates a remote error.
    #[inline]
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }

    /// Creates a request timeout error.
    #[inline]
    pub fn request_timeout(request_id: RequestId, timeout_ms: u64) -> Self {
        Self::RequestTimeout {
            request_id,
            timeout_ms,
        }
    }

    /// Creates a context timeout error.
    #[inline]
    pub fn context_timeout(timeout_ms: u64) -> Self {
        Self::ContextTimeout { timeout_ms }
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::RequestTimeout { .. } | Self::ContextTimeout { .. }
        )
    }

    /// Returns `true` if the error was raised before anything reached the host.
    #[inline]
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::FeatureDisabled { .. }
        )
    }

    /// Returns `true` if the host reported the failure.
    #[inline]
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Returns `true` if this is a transport-level error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::ConnectionClosed | Self::WebSocket(_))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::remote("modal not registered");
        assert_eq!(err.to_string(), "Remote error: modal not registered");
    }

    #[test]
    fn test_feature_disabled_display() {
        let err = Error::feature_disabled("modals");
        assert_eq!(err.to_string(), "Feature not enabled: modals");
    }

    #[test]
    fn test_is_timeout() {
        let request_err = Error::request_timeout(RequestId::generate(), 500);
        let context_err = Error::context_timeout(1000);
        let other_err = Error::remote("nope");

        assert!(request_err.is_timeout());
        assert!(context_err.is_timeout());
        assert!(!other_err.is_timeout());
    }

    #[test]
    fn test_is_local() {
        assert!(Error::invalid_input("missing source").is_local());
        assert!(Error::feature_disabled("modals").is_local());
        assert!(!Error::remote("x").is_local());
        assert!(!Error::ConnectionClosed.is_local());
    }

    #[test]
    fn test_is_connection_error() {
        assert!(Error::ConnectionClosed.is_connection_error());
        assert!(!Error::config("test").is_connection_error());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
