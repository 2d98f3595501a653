//! Message types exchanged with the host.
//!
//! # Protocol Overview
//!
//! | Message | Direction | Purpose |
//! |---------|-----------|---------|
//! | `init` | Host → Child | Handshake with [`Context`] |
//! | `request` | Child → Host | Operation request |
//! | `response` | Host → Child | Operation result or error |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `context` | Handshake context |
//! | `envelope` | Tagged envelope |
//! | `request` | Request type tags and feature names |

// ============================================================================
// Submodules
// ============================================================================

/// Handshake context delivered by the host.
pub mod context;

/// Envelope message type.
pub mod envelope;

/// Request type tags and feature identifiers.
pub mod request;

// ============================================================================
// Re-exports
// ============================================================================

pub use context::{AppDescriptor, Context, HostDescriptor};
pub use envelope::{Envelope, RemoteError};
pub use request::{Feature, RequestType};
