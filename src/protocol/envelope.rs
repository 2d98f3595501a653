//! Envelope message type.
//!
//! The envelope is the only unit placed on the transport. It is tagged by
//! `kind`:
//!
//! | Kind | Direction | Purpose |
//! |------|-----------|---------|
//! | `init` | Host → Child | One-time handshake carrying [`Context`] |
//! | `request` | Child → Host | Correlated operation request |
//! | `response` | Host → Child | Result or error for a request |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::RequestId;

use super::{Context, RequestType};

// ============================================================================
// Envelope
// ============================================================================

/// A message exchanged between child and host.
///
/// # Format
///
/// ```json
/// { "kind": "init", "context": { "app": { "features": ["modals"] } } }
/// { "kind": "request", "id": "uuid", "type": "open-modal", "payload": { ... } }
/// { "kind": "response", "id": "uuid", "result": { ... } }
/// { "kind": "response", "id": "uuid", "error": { "message": "..." } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Envelope {
    /// Host handshake.
    Init {
        /// Context delivered to the child.
        context: Context,
    },

    /// Child request.
    Request {
        /// Correlation identifier.
        id: RequestId,

        /// Operation name.
        #[serde(rename = "type")]
        request_type: RequestType,

        /// Operation-specific payload.
        #[serde(default)]
        payload: Value,
    },

    /// Host response.
    Response {
        /// Matches the request `id`.
        id: RequestId,

        /// Result value (if success).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<Value>,

        /// Error description (if failure).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<RemoteError>,
    },
}

// ============================================================================
// Envelope - Constructors
// ============================================================================

impl Envelope {
    /// Creates an `init` envelope.
    #[inline]
    #[must_use]
    pub fn init(context: Context) -> Self {
        Self::Init { context }
    }

    /// Creates a `request` envelope.
    #[inline]
    #[must_use]
    pub fn request(id: RequestId, request_type: RequestType, payload: Value) -> Self {
        Self::Request {
            id,
            request_type,
            payload,
        }
    }

    /// Creates a successful `response` envelope.
    #[inline]
    #[must_use]
    pub fn success(id: RequestId, result: Value) -> Self {
        Self::Response {
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Creates a failed `response` envelope.
    #[inline]
    #[must_use]
    pub fn failure(id: RequestId, message: impl Into<String>) -> Self {
        Self::Response {
            id,
            result: None,
            error: Some(RemoteError {
                message: message.into(),
            }),
        }
    }
}

// ============================================================================
// Envelope - Accessors
// ============================================================================

impl Envelope {
    /// Returns the wire name of the envelope kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::Request { .. } => "request",
            Self::Response { .. } => "response",
        }
    }

    /// Returns the correlation id, if the envelope carries one.
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<RequestId> {
        match self {
            Self::Init { .. } => None,
            Self::Request { id, .. } | Self::Response { id, .. } => Some(*id),
        }
    }

    /// Encodes the envelope as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if a payload cannot be serialized.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes an envelope from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the text is not a valid envelope.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

// ============================================================================
// RemoteError
// ============================================================================

/// Error indicator carried by a failed `response`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteError {
    /// Host-supplied description.
    #[serde(default)]
    pub message: String,
}

/// Converts the body of a `response` envelope into the caller's result.
///
/// An `error` always wins over a `result`. A missing result is `null`.
pub(crate) fn into_result(result: Option<Value>, error: Option<RemoteError>) -> Result<Value> {
    match error {
        Some(error) => Err(Error::remote(error.message)),
        None => Ok(result.unwrap_or(Value::Null)),
    }
}

// ============================================================================
// Tests
// ============================================================================
