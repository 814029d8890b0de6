//! WebSocket connection to the instrumentation source

use futures_util::StreamExt;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message as WsMessage};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to connect to {url}")]
    Connect {
        url: String,
        #[source]
        source: tungstenite::Error,
    },
}

/// What the socket produced on one read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// One complete text payload
    Payload(String),
    /// Peer closed, stream ended or read failed; the socket is done
    Closed,
    /// Control or binary frame, nothing to ingest
    Ignored,
}

pub async fn connect(url: &str) -> Result<WsStream, TransportError> {
    let (socket, _response) = connect_async(url)
        .await
        .map_err(|source| TransportError::Connect {
            url: url.to_string(),
            source,
        })?;
    Ok(socket)
}

/// Read the next frame. Cancel safe, so it can sit in a `select!` arm.
pub async fn next_inbound(socket: &mut WsStream) -> Inbound {
    classify(socket.next().await)
}

fn classify(frame: Option<Result<WsMessage, tungstenite::Error>>) -> Inbound {
    match frame {
        Some(Ok(WsMessage::Text(text))) => Inbound::Payload(text),
        Some(Ok(WsMessage::Close(frame))) => {
            tracing::info!(?frame, "connection closed by peer");
            Inbound::Closed
        }
        Some(Ok(_)) => Inbound::Ignored,
        Some(Err(e)) => {
            tracing::warn!(error = %e, "websocket read failed");
            Inbound::Closed
        }
        None => Inbound::Closed,
    }
}
