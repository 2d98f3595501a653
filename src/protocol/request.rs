//! Request type tags and feature identifiers.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// RequestType
// ============================================================================

/// Operation named by a `request` envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestType {
    /// Open a modal by key or definition.
    #[serde(rename = "open-modal")]
    OpenModal,

    /// Close a modal by key.
    #[serde(rename = "close-modal")]
    CloseModal,
}

impl RequestType {
    /// Returns the wire name.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenModal => "open-modal",
            Self::CloseModal => "close-modal",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Feature
// ============================================================================

/// Optional host capability advertised in the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Host-rendered modals.
    Modals,
}

impl Feature {
    /// Returns the identifier used in `app.features`.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Modals => "modals",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================
