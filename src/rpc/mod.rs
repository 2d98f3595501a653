//! Cross-frame RPC core.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Connection`] | Request/response correlation and handshake |
//! | [`CapabilityGate`] | Feature checks on the handshake context |
//!
//! # Flow
//!
//! ```text
//! request() ──► pending[id] ──► Transport::send(request)
//!                                        │
//!                                      host
//!                                        │
//! caller ◄── pending.remove(id) ◄── listener(response)
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Feature gating.
pub mod capability;

/// Correlation engine.
pub mod connection;

// ============================================================================
// Re-exports
// ============================================================================

pub use capability::CapabilityGate;
pub use connection::Connection;
