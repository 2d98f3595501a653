//! Process-wide client.
//!
//! [`ClientCell`] holds at most one [`Client`]. The first `init` builds it;
//! every later call returns the same client and ignores its arguments.
//! [`crate::init`] and [`crate::init_with_callback`] use a process-wide
//! `static` cell.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::error::Result;
use crate::protocol::Context;
use crate::transport::Transport;

use super::core::Client;
use super::options::ClientOptions;

// ============================================================================
// ClientCell
// ============================================================================

/// Lazily initialized single client.
#[derive(Debug)]
pub struct ClientCell {
    /// The client, once built.
    cell: OnceCell<Client>,
}

impl Default for ClientCell {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientCell {
    /// Creates an empty cell.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Returns the client, building it on the first call.
    ///
    /// `transport` is only invoked when the client does not exist yet; on
    /// later calls both arguments are ignored.
    ///
    /// # Errors
    ///
    /// [`crate::Error::Config`] if `options` are invalid on the first call.
    /// The cell stays empty in that case.
    pub fn init<T, F>(&self, options: ClientOptions, transport: F) -> Result<&Client>
    where
        T: Transport,
        F: FnOnce() -> T,
    {
        if let Some(client) = self.cell.get() {
            debug!("Client already initialized; ignoring options");
            return Ok(client);
        }

        self.cell.get_or_try_init(|| {
            Client::builder()
                .transport(transport())
                .options(options)
                .build()
        })
    }

    /// Like [`ClientCell::init`], then invokes `callback` with the context
    /// once it is available.
    ///
    /// Each call registers its own callback.
    ///
    /// # Errors
    ///
    /// Same as [`ClientCell::init`].
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn init_with_callback<T, F, C>(
        &self,
        options: ClientOptions,
        transport: F,
        callback: C,
    ) -> Result<&Client>
    where
        T: Transport,
        F: FnOnce() -> T,
        C: FnOnce(Arc<Context>) + Send + 'static,
    {
        let client = self.init(options, transport)?;
        client.on_context(callback);
        Ok(client)
    }

    /// Returns the client if it was built.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&Client> {
        self.cell.get()
    }
}

// ============================================================================
// Process-wide Instance
// ============================================================================

static CLIENT: ClientCell = ClientCell::new();

/// Initializes the process-wide client, or returns the existing one.
///
/// # Errors
///
/// See [`ClientCell::init`].
pub fn init<T, F>(options: ClientOptions, transport: F) -> Result<&'static Client>
where
    T: Transport,
    F: FnOnce() -> T,
{
    CLIENT.init(options, transport)
}

/// Initializes the process-wide client and registers a context callback.
///
/// # Errors
///
/// See [`ClientCell::init`].
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
pub fn init_with_callback<T, F, C>(
    options: ClientOptions,
    transport: F,
    callback: C,
) -> Result<&'static Client>
where
    T: Transport,
    F: FnOnce() -> T,
    C: FnOnce(Arc<Context>) + Send + 'static,
{
    CLIENT.init_with_callback(options, transport, callback)
}

/// Returns the process-wide client if it was initialized.
#[inline]
#[must_use]
pub fn client() -> Option<&'static Client> {
    CLIENT.get()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::transport::{self, ChannelTransport};

    #[test]
    fn test_second_init_returns_same_client() {
        let cell = ClientCell::new();
        let (first_transport, _host) = transport::channel();

        let first = cell
            .init(ClientOptions::new(), || first_transport)
            .expect("init") as *const Client;

        let factory_calls = AtomicUsize::new(0);
        let second = cell
            .init(ClientOptions::new().with_debug(), || {
                factory_calls.fetch_add(1, Ordering::SeqCst);
                transport::channel().0
            })
            .expect("init");

        assert!(std::ptr::eq(first, second));
        assert_eq!(factory_calls.load(Ordering::SeqCst), 0);
        assert!(!second.options().debug);
    }

    #[test]
    fn test_invalid_options_leave_cell_empty() {
        let cell = ClientCell::new();
        let options = ClientOptions::new().with_request_timeout(Duration::ZERO);

        assert!(cell.init(options, || transport::channel().0).is_err());
        assert!(cell.get().is_none());

        cell.init(ClientOptions::new(), || transport::channel().0)
            .expect("init");
        assert!(cell.get().is_some());
    }

    #[tokio::test]
    async fn test_each_callback_runs_once() {
        let cell = ClientCell::new();
        let (child, host) = transport::channel();
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        for _ in 0..2 {
            let calls = Arc::clone(&calls);
            let tx = tx.clone();
            let child = child.clone();
            cell.init_with_callback(
                ClientOptions::new(),
                move || -> ChannelTransport { child },
                move |context| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    let _ = tx.send(context);
                },
            )
            .expect("init");
        }

        host.send_init(Context::with_features(["modals"]));

        let first = rx.recv().await.expect("first callback");
        let second = rx.recv().await.expect("second callback");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
