//! framepost - correlated messaging between an embedded frame and its host.
//!
//! An embedded app (the *child*) talks to the document hosting it (the
//! *host*) over an untyped, unordered message channel. This crate layers
//! typed, correlated requests and a one-time context handshake on top, and
//! exposes host UI capabilities that are only available when the host
//! advertises them.
//!
//! # Architecture
//!
//! ```text
//! Client ──► ModalClient ──► CapabilityGate ──► Connection ──► Transport ──► host
//!                                                   ▲                          │
//!                                                   └──── init / response ◄────┘
//! ```
//!
//! Key design principles:
//!
//! - The host sends `init` once; the context is cached and shared
//! - Every request carries a fresh id; responses may arrive in any order
//! - Local validation and feature checks fail before anything is sent
//!
//! # Quick Start
//!
//! ```no_run
//! use framepost::{Client, Result, transport};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let transport = transport::WebSocketTransport::connect("ws://127.0.0.1:9000").await?;
//!     let client = Client::builder().transport(transport).build()?;
//!
//!     let context = client.get_context().await?;
//!     println!("host features: {:?}", context.features());
//!
//!     client.modal().open("settings").await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | [`Client`], builder, options, process-wide [`init`] |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`features`] | Feature clients ([`ModalClient`]) |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Envelope and context types |
//! | [`rpc`] | Correlation engine and capability gate |
//! | [`transport`] | Transport trait and implementations |

// ============================================================================
// Modules
// ============================================================================

/// Client facade.
///
/// Use [`Client::builder()`] or [`init`] to create a client.
pub mod client;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Feature clients for host-mediated UI capabilities.
pub mod features;

/// Type-safe identifiers.
pub mod identifiers;

/// Envelope and context types.
pub mod protocol;

/// Correlation engine and capability gate.
pub mod rpc;

/// Transport trait and bundled transports.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Client types
pub use client::{Client, ClientBuilder, ClientCell, ClientOptions, init, init_with_callback};

// Error types
pub use error::{Error, Result};

// Feature types
pub use features::{ModalClient, ModalDefinition, ModalSize, ModalTarget};

// Identifier types
pub use identifiers::RequestId;

// Protocol types
pub use protocol::{AppDescriptor, Context, Envelope, Feature, HostDescriptor, RequestType};

// RPC types
pub use rpc::{CapabilityGate, Connection};

// Transport types
pub use transport::{
    ChannelTransport, HostEnd, Listener, Transport, WebSocketTransport,
};
