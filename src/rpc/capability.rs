//! Feature gating on the handshake context.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::protocol::{Context, Feature};

use super::Connection;

// ============================================================================
// CapabilityGate
// ============================================================================

/// Decides whether a host feature is enabled.
///
/// Every check waits for the handshake first, so it always runs against the
/// context the host actually sent.
#[derive(Debug, Clone)]
pub struct CapabilityGate {
    connection: Connection,
}

impl CapabilityGate {
    /// Creates a gate reading the context of `connection`.
    #[inline]
    #[must_use]
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// Returns `true` if `name` is in the host's feature set.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::ContextTimeout`] from the handshake wait.
    pub async fn has_feature(&self, name: &str) -> Result<bool> {
        let context = self.connection.get_context().await?;
        Ok(context.has_feature(name))
    }

    /// Waits for the context and fails unless `feature` is enabled.
    ///
    /// # Errors
    ///
    /// - [`Error::FeatureDisabled`] if the host does not advertise `feature`
    /// - [`Error::ContextTimeout`] from the handshake wait
    pub async fn require(&self, feature: Feature) -> Result<Arc<Context>> {
        let context = self.connection.get_context().await?;

        if context.supports(feature) {
            Ok(context)
        } else {
            Err(Error::feature_disabled(feature.as_str()))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
