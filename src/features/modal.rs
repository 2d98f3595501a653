//! Host-rendered modals.
//!
//! # Example
//!
//! ```ignore
//! let modal = client.modal();
//!
//! // Open a modal the host already knows by key
//! modal.open("settings").await?;
//!
//! // Open a modal from a definition
//! modal
//!     .open(ModalDefinition::new("confirm", "confirm.html").with_size(ModalSize::Sm))
//!     .await?;
//!
//! modal.close("confirm").await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::{Feature, RequestType};
use crate::rpc::{CapabilityGate, Connection};

// ============================================================================
// ModalSize
// ============================================================================

/// Size hint for the host's modal frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalSize {
    /// Small.
    Sm,
    /// Medium.
    Md,
    /// Large.
    Lg,
    /// Extra large.
    Xl,
}

// ============================================================================
// ModalDefinition
// ============================================================================

/// Caller-side modal definition.
///
/// Both `key` and `source` are required; they are optional here so that
/// definitions deserialized from untrusted configuration are validated
/// before anything is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalDefinition {
    /// Identifier the host uses for this modal.
    #[serde(default)]
    pub key: Option<String>,

    /// Document to load inside the modal.
    #[serde(default)]
    pub source: Option<String>,

    /// Title shown by the host.
    #[serde(default)]
    pub title: Option<String>,

    /// Size hint.
    #[serde(default)]
    pub size: Option<ModalSize>,
}

impl ModalDefinition {
    /// Creates a definition with key and source.
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            source: Some(source.into()),
            ..Default::default()
        }
    }

    /// Sets the title.
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the size hint.
    #[inline]
    #[must_use]
    pub fn with_size(mut self, size: ModalSize) -> Self {
        self.size = Some(size);
        self
    }
}

// ============================================================================
// ModalTarget
// ============================================================================

/// Argument of [`ModalClient::open`]: a bare key or a full definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalTarget {
    /// Modal registered with the host under this key.
    Key(String),
    /// Modal described inline.
    Definition(ModalDefinition),
}

impl From<&str> for ModalTarget {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for ModalTarget {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<ModalDefinition> for ModalTarget {
    fn from(definition: ModalDefinition) -> Self {
        Self::Definition(definition)
    }
}

impl ModalTarget {
    /// Normalizes into the payload sent to the host.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if a definition lacks `key` or `source`.
    pub fn normalize(self) -> Result<ModalPayload> {
        match self {
            Self::Key(key) => Ok(ModalPayload {
                key,
                source: None,
                title: None,
                size: None,
            }),

            Self::Definition(definition) => {
                let Some(key) = definition.key else {
                    return Err(Error::invalid_input("modal definition requires a `key`"));
                };
                let Some(source) = definition.source else {
                    return Err(Error::invalid_input(format!(
                        "modal definition {key:?} requires a `source`"
                    )));
                };

                Ok(ModalPayload {
                    key,
                    source: Some(source),
                    title: definition.title,
                    size: definition.size,
                })
            }
        }
    }
}

// ============================================================================
// ModalPayload
// ============================================================================

/// Validated `open-modal` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalPayload {
    /// Modal key.
    pub key: String,

    /// Document to load.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Title shown by the host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Size hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<ModalSize>,
}

// ============================================================================
// ModalClient
// ============================================================================

/// Opens and closes modals through the host.
///
/// Requires the host to advertise the `modals` feature.
#[derive(Debug, Clone)]
pub struct ModalClient {
    /// Verbose per-call diagnostics.
    debug: bool,
    /// Feature check.
    gate: CapabilityGate,
    /// Round trips.
    connection: Connection,
}

impl ModalClient {
    /// Creates a modal client.
    #[must_use]
    pub fn new(debug: bool, gate: CapabilityGate, connection: Connection) -> Self {
        Self {
            debug,
            gate,
            connection,
        }
    }

    /// Asks the host to open a modal.
    ///
    /// Returns `Ok(None)` without contacting the host when the key is empty,
    /// whether or not the feature is enabled. Otherwise returns the host's
    /// result unchanged (`Some(Value::Null)` when the host answers null).
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] if a definition lacks `key` or `source`
    /// - [`Error::FeatureDisabled`] if the host lacks `modals`
    /// - [`Error::Remote`] if the host rejects the request
    pub async fn open(&self, target: impl Into<ModalTarget>) -> Result<Option<Value>> {
        let payload = target.into().normalize()?;

        if payload.key.is_empty() {
            if self.debug {
                debug!("Ignoring open-modal request with empty key");
            }
            return Ok(None);
        }

        self.gate.require(Feature::Modals).await?;

        if self.debug {
            debug!(key = %payload.key, source = ?payload.source, "Opening modal");
        }

        let result = self
            .connection
            .request(RequestType::OpenModal, serde_json::to_value(&payload)?)
            .await?;

        Ok(Some(result))
    }

    /// Asks the host to close the modal with `key`.
    ///
    /// # Errors
    ///
    /// - [`Error::FeatureDisabled`] if the host lacks `modals`
    /// - [`Error::Remote`] if the host rejects the request
    pub async fn close(&self, key: impl Into<String>) -> Result<Value> {
        let key = key.into();

        self.gate.require(Feature::Modals).await?;

        if self.debug {
            debug!(key = %key, "Closing modal");
        }

        self.connection
            .request(RequestType::CloseModal, Value::String(key))
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use serde_json::json;

    use crate::client::ClientOptions;
    use crate::protocol::Context;
    use crate::transport::{self, HostEnd};

    fn modal_client(context: Context) -> (ModalClient, HostEnd) {
        let (transport, host) = transport::channel();
        let connection = Connection::new(Arc::new(transport), &ClientOptions::new());
        connection.initialize();
        host.send_init(context);

        let gate = CapabilityGate::new(connection.clone());
        (ModalClient::new(true, gate, connection), host)
    }

    fn with_modals() -> Context {
        Context::with_features([Feature::Modals.as_str()])
    }

    #[tokio::test]
    async fn test_open_with_definition() {
        let (client, mut host) = modal_client(with_modals());

        let call = tokio::spawn({
            let client = client.clone();
            async move {
                client
                    .open(ModalDefinition::new("my-modal", "modal.html"))
                    .await
            }
        });

        let (id, request_type, payload) = host.next_request().await.expect("request");
        assert_eq!(request_type, RequestType::OpenModal);
        assert_eq!(payload, json!({ "key": "my-modal", "source": "modal.html" }));

        host.respond(id, Value::Null);
        assert_eq!(call.await.expect("join").expect("open"), Some(Value::Null));
        assert!(host.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_open_with_key() {
        let (client, mut host) = modal_client(with_modals());

        let call = tokio::spawn({
            let client = client.clone();
            async move { client.open("my-modal").await }
        });

        let (id, request_type, payload) = host.next_request().await.expect("request");
        assert_eq!(request_type, RequestType::OpenModal);
        assert_eq!(payload, json!({ "key": "my-modal" }));

        host.respond(id, json!({ "closedBy": "user" }));
        assert_eq!(
            call.await.expect("join").expect("open"),
            Some(json!({ "closedBy": "user" }))
        );
    }

    #[tokio::test]
    async fn test_open_definition_optional_fields() {
        let (client, mut host) = modal_client(with_modals());

        let definition = ModalDefinition::new("confirm", "confirm.html")
            .with_title("Are you sure?")
            .with_size(ModalSize::Sm);
        let call = tokio::spawn({
            let client = client.clone();
            async move { client.open(definition).await }
        });

        let (id, _, payload) = host.next_request().await.expect("request");
        assert_eq!(
            payload,
            json!({
                "key": "confirm",
                "source": "confirm.html",
                "title": "Are you sure?",
                "size": "sm"
            })
        );
        host.respond(id, Value::Null);
        call.await.expect("join").expect("open");
    }

    #[tokio::test]
    async fn test_open_definition_without_key() {
        let (client, mut host) = modal_client(with_modals());

        let definition = ModalDefinition {
            source: Some("modal.html".into()),
            ..Default::default()
        };
        let err = client.open(definition).await.unwrap_err();

        assert!(matches!(err, Error::InvalidInput { .. }));
        assert!(host.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_open_definition_without_source() {
        // Invalid regardless of host support
        for context in [with_modals(), Context::default()] {
            let (client, mut host) = modal_client(context);

            let definition = ModalDefinition {
                key: Some("my-modal".into()),
                ..Default::default()
            };
            let err = client.open(definition).await.unwrap_err();

            assert!(matches!(err, Error::InvalidInput { .. }));
            assert!(host.try_recv().is_none());
        }
    }

    #[tokio::test]
    async fn test_open_empty_key_is_noop() {
        for context in [with_modals(), Context::default()] {
            let (client, mut host) = modal_client(context);

            assert_eq!(client.open("").await.expect("open"), None);
            assert!(host.try_recv().is_none());
        }
    }

    #[tokio::test]
    async fn test_open_empty_key_skips_handshake_wait() {
        let (transport, mut host) = transport::channel();
        let connection = Connection::new(Arc::new(transport), &ClientOptions::new());
        connection.initialize();
        let client = ModalClient::new(false, CapabilityGate::new(connection.clone()), connection);

        // No init was sent; the call must still complete
        assert_eq!(client.open("").await.expect("open"), None);
        assert!(host.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_open_invalid_definition_skips_handshake_wait() {
        let (transport, mut host) = transport::channel();
        let connection = Connection::new(Arc::new(transport), &ClientOptions::new());
        connection.initialize();
        let client = ModalClient::new(false, CapabilityGate::new(connection.clone()), connection);

        let definition = ModalDefinition {
            key: Some("my-modal".into()),
            ..Default::default()
        };

        // No init was sent; validation fails first
        let err = client.open(definition).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
        assert!(host.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_open_without_feature() {
        let (client, mut host) = modal_client(Context::default());

        let err = client
            .open(ModalDefinition::new("my-modal", "modal.html"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::FeatureDisabled { ref feature } if feature == "modals"));
        assert!(host.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_open_remote_error() {
        let (client, mut host) = modal_client(with_modals());

        let call = tokio::spawn({
            let client = client.clone();
            async move { client.open("unknown").await }
        });

        let (id, _, _) = host.next_request().await.expect("request");
        host.fail(id, "no modal registered for key unknown");

        let err = call.await.expect("join").unwrap_err();
        assert!(err.is_remote());
    }

    #[tokio::test]
    async fn test_close_sends_key() {
        let (client, mut host) = modal_client(with_modals());

        let call = tokio::spawn({
            let client = client.clone();
            async move { client.close("my-modal").await }
        });

        let (id, request_type, payload) = host.next_request().await.expect("request");
        assert_eq!(request_type, RequestType::CloseModal);
        assert_eq!(payload, json!("my-modal"));

        host.respond(id, Value::Null);
        assert_eq!(call.await.expect("join").expect("close"), Value::Null);
    }

    #[tokio::test]
    async fn test_close_without_feature() {
        let (client, mut host) = modal_client(Context::default());

        let err = client.close("my-modal").await.unwrap_err();
        assert!(matches!(err, Error::FeatureDisabled { .. }));
        assert!(host.try_recv().is_none());
    }

    #[test]
    fn test_definition_from_json() {
        let definition: ModalDefinition =
            serde_json::from_value(json!({ "key": "k", "source": "s.html", "size": "lg" }))
                .expect("parse");

        let payload = ModalTarget::from(definition).normalize().expect("valid");
        assert_eq!(payload.key, "k");
        assert_eq!(payload.size, Some(ModalSize::Lg));
    }
}
