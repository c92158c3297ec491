// ABOUTME: RelayConnection - one WebSocket connection to a Nostr relay that
// ABOUTME: publishes an event and waits for the relay's matching OK frame.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};
use url::Url;

use super::{ClientMessage, Event, RelayMessage};
use crate::error::NostrError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// The relay's answer to a published event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfirmation {
    pub event_id: String,
    pub accepted: bool,
    pub message: String,
}

/// A lazily connected WebSocket session with a single relay.
pub struct RelayConnection {
    url: Url,
    connect_timeout: Duration,
    ws: Mutex<Option<WsStream>>,
}

impl RelayConnection {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            ws: Mutex::new(None),
        }
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn is_connected(&self) -> bool {
        self.ws.lock().await.is_some()
    }

    /// Open the WebSocket if it is not already open.
    pub async fn connect(&self) -> Result<(), NostrError> {
        let mut ws = self.ws.lock().await;
        if ws.is_none() {
            *ws = Some(self.open().await?);
        }
        Ok(())
    }

    async fn open(&self) -> Result<WsStream, NostrError> {
        info!(relay = %self.url, "connecting to relay");
        match timeout(self.connect_timeout, connect_async(self.url.as_str())).await {
            Ok(Ok((stream, _response))) => Ok(stream),
            Ok(Err(e)) => Err(NostrError::WebSocket(format!("{}: {e}", self.url))),
            Err(_) => Err(NostrError::Timeout(format!(
                "connecting to {} took longer than {:?}",
                self.url, self.connect_timeout
            ))),
        }
    }

    /// Close the WebSocket. Closing an idle connection is a no-op.
    pub async fn disconnect(&self) {
        if let Some(mut stream) = self.ws.lock().await.take() {
            if let Err(e) = stream.close(None).await {
                debug!(relay = %self.url, error = %e, "error while closing relay connection");
            }
        }
    }

    /// Send `event` and wait up to `wait` for the relay's OK frame.
    ///
    /// Connects first when needed. Any transport failure or timeout drops the
    /// connection so the next publish starts fresh.
    pub async fn publish(
        &self,
        event: &Event,
        wait: Duration,
    ) -> Result<PublishConfirmation, NostrError> {
        let mut guard = self.ws.lock().await;
        if guard.is_none() {
            *guard = Some(self.open().await?);
        }
        let Some(stream) = guard.as_mut() else {
            return Err(NostrError::NotConnected(self.url.to_string()));
        };

        let frame = ClientMessage::Event(event.clone()).to_json()?;
        debug!(relay = %self.url, event_id = %event.id, "sending event");

        let result = match timeout(wait, self.exchange(stream, frame, &event.id)).await {
            Ok(result) => result,
            Err(_) => Err(NostrError::Timeout(format!(
                "{} did not confirm event {} within {:?}",
                self.url, event.id, wait
            ))),
        };

        if result.is_err() {
            *guard = None;
        }
        result
    }

    async fn exchange(
        &self,
        stream: &mut WsStream,
        frame: String,
        event_id: &str,
    ) -> Result<PublishConfirmation, NostrError> {
        stream
            .send(Message::Text(frame.into()))
            .await
            .map_err(|e| NostrError::WebSocket(format!("{}: {e}", self.url)))?;

        loop {
            let text = match stream.next().await {
                Some(Ok(Message::Text(text))) => text,
                Some(Ok(Message::Close(_))) | None => {
                    return Err(NostrError::NotConnected(self.url.to_string()));
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    return Err(NostrError::WebSocket(format!("{}: {e}", self.url)));
                }
            };

            match RelayMessage::from_json(text.as_str()) {
                Ok(RelayMessage::Ok {
                    event_id: id,
                    accepted,
                    message,
                }) if id == event_id => {
                    return Ok(PublishConfirmation {
                        event_id: id,
                        accepted,
                        message,
                    });
                }
                Ok(RelayMessage::Notice(notice)) => {
                    warn!(relay = %self.url, %notice, "relay notice");
                }
                Ok(other) => {
                    debug!(relay = %self.url, message = ?other, "ignoring relay message");
                }
                Err(e) => {
                    warn!(relay = %self.url, error = %e, "unparseable relay frame");
                }
            }
        }
    }
}

impl std::fmt::Debug for RelayConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConnection")
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}
