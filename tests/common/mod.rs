//! Shared utilities for integration tests.

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use framepost::Context;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Functions
// ============================================================================

/// Initialize tracing/logging.
///
/// Honors `RUST_LOG`; defaults to `framepost=debug`. Safe to call from every
/// test.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("framepost=debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// Context advertising the `modals` feature.
pub fn modals_context() -> Context {
    Context::with_features(["modals"])
}
