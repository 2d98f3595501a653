//! Client facade.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Client`] | Connection plus feature clients |
//! | [`ClientBuilder`] | Fluent configuration builder |
//! | [`ClientOptions`] | Debug flag and timeouts |
//! | [`ClientCell`] | Single lazily built client |
//!
//! # Example
//!
//! ```ignore
//! use framepost::{ClientOptions, transport};
//!
//! # async fn example() -> framepost::Result<()> {
//! let (child, _host) = transport::channel();
//! let client = framepost::init_with_callback(
//!     ClientOptions::new().with_debug(),
//!     move || child,
//!     |context| println!("features: {:?}", context.features()),
//! )?;
//!
//! client.modal().open("settings").await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for client configuration.
pub mod builder;

/// Client handle.
pub mod core;

/// Process-wide client.
pub mod facade;

/// Client options.
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::ClientBuilder;
pub use core::Client;
pub use facade::{ClientCell, client, init, init_with_callback};
pub use options::ClientOptions;
