//! Feature clients for host-mediated UI capabilities.
//!
//! Each client validates its input, checks the matching host feature, and
//! performs the round trip through [`crate::rpc::Connection`].

// ============================================================================
// Submodules
// ============================================================================

/// Modal open/close.
pub mod modal;

// ============================================================================
// Re-exports
// ============================================================================

pub use modal::{ModalClient, ModalDefinition, ModalPayload, ModalSize, ModalTarget};
