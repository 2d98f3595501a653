//! Handshake context delivered by the host.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Feature;

// ============================================================================
// Context
// ============================================================================

/// Context carried by the `init` envelope.
///
/// Fields this crate does not interpret are kept in `extra` so they remain
/// visible to the application.
///
/// # Format
///
/// ```json
/// {
///   "app": { "id": "my-app", "features": ["modals"] },
///   "host": { "origin": "https://host.example", "sessionId": "abc" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Descriptor of the embedded app.
    #[serde(default)]
    pub app: AppDescriptor,

    /// Descriptor of the host document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<HostDescriptor>,

    /// Other host-provided fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Context {
    /// Creates a context advertising the given features.
    #[must_use]
    pub fn with_features(features: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            app: AppDescriptor {
                features: features.into_iter().map(Into::into).collect(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Returns `true` if `name` is in the app's feature set.
    #[inline]
    #[must_use]
    pub fn has_feature(&self, name: &str) -> bool {
        self.app.features.iter().any(|f| f == name)
    }

    /// Typed variant of [`Context::has_feature`].
    #[inline]
    #[must_use]
    pub fn supports(&self, feature: Feature) -> bool {
        self.has_feature(feature.as_str())
    }

    /// Returns the enabled feature identifiers.
    #[inline]
    #[must_use]
    pub fn features(&self) -> &[String] {
        &self.app.features
    }
}

// ============================================================================
// AppDescriptor
// ============================================================================

/// The embedded app as seen by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppDescriptor {
    /// Host-assigned app identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Enabled feature identifiers.
    #[serde(default)]
    pub features: Vec<String>,

    /// Other app fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// HostDescriptor
// ============================================================================

/// Identifying fields of the host and session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostDescriptor {
    /// Origin of the host document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    /// Host session identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Host protocol version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================
