//! Round trips over a real WebSocket on localhost.

mod common;

use std::time::Duration;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

use framepost::{Client, Envelope, Error, RequestType, WebSocketTransport};

async fn bind_host() -> Result<(TcpListener, String)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let url = format!("ws://{}", listener.local_addr()?);
    Ok((listener, url))
}

#[tokio::test]
async fn test_handshake_and_open_modal() -> Result<()> {
    common::init_logging();
    let (listener, url) = bind_host().await?;

    let host = tokio::spawn(async move {
        let (stream, _) = listener.accept().await?;
        let mut ws = tokio_tungstenite::accept_async(stream).await?;

        let init = Envelope::init(common::modals_context()).to_json()?;
        ws.send(Message::text(init)).await?;
        // Unparseable frames are skipped by the child
        ws.send(Message::text("not an envelope")).await?;

        while let Some(message) = ws.next().await {
            let Message::Text(text) = message? else {
                continue;
            };

            match Envelope::from_json(text.as_str())? {
                Envelope::Request {
                    id,
                    request_type,
                    payload,
                } => {
                    assert_eq!(request_type, RequestType::OpenModal);
                    let reply = Envelope::success(id, json!({ "echo": payload }));
                    ws.send(Message::text(reply.to_json()?)).await?;
                    break;
                }
                other => anyhow::bail!("unexpected envelope: {other:?}"),
            }
        }

        anyhow::Ok(ws)
    });

    let transport = WebSocketTransport::connect(&url).await?;
    let client = Client::builder().transport(transport.clone()).build()?;

    let context = client.get_context().await?;
    assert!(context.has_feature("modals"));

    let result = client.modal().open("my-modal").await?;
    assert_eq!(result, Some(json!({ "echo": { "key": "my-modal" } })));

    // Host hangs up; later requests fail
    let mut ws = host.await??;
    ws.close(None).await?;

    for _ in 0..100 {
        if transport.is_closed() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(transport.is_closed());

    let err = client.modal().close("my-modal").await.unwrap_err();
    assert!(matches!(err, Error::ConnectionClosed));

    Ok(())
}

#[tokio::test]
async fn test_remote_error_over_websocket() -> Result<()> {
    common::init_logging();
    let (listener, url) = bind_host().await?;

    let host = tokio::spawn(async move {
        let (stream, _) = listener.accept().await?;
        let mut ws = tokio_tungstenite::accept_async(stream).await?;

        let init = Envelope::init(common::modals_context()).to_json()?;
        ws.send(Message::text(init)).await?;

        while let Some(message) = ws.next().await {
            let Message::Text(text) = message? else {
                continue;
            };
            if let Some(id) = Envelope::from_json(text.as_str())?.id() {
                let reply = Envelope::failure(id, "modal is not open");
                ws.send(Message::text(reply.to_json()?)).await?;
                break;
            }
        }

        anyhow::Ok(())
    });

    let transport = WebSocketTransport::connect(&url).await?;
    let client = Client::builder().transport(transport.clone()).build()?;

    let err = client.modal().close("settings").await.unwrap_err();
    assert!(matches!(err, Error::Remote { ref message } if message == "modal is not open"));

    host.await??;
    transport.shutdown();
    Ok(())
}
