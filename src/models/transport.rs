//! Network transport for match sessions.
//!
//! Architecture:
//! - Every request or stream runs on its own OS thread with a single-threaded
//!   tokio runtime, so the UI thread never blocks on the network
//! - Results come back as [`TransportEvent`]s over a std channel that the
//!   owning model drains from a GPUI task
//! - Outbound frames and the close request travel to the stream thread over a
//!   tokio channel

use std::sync::mpsc::Sender;
use std::thread;

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info};

use crate::config::ServerConfig;
use crate::domain::{
    Connection, MatchId, MatchTransport, NewMatchResponse, SessionError, TransportEvent,
};

/// Commands for the stream thread
#[derive(Debug)]
enum Outbound {
    Text(String),
    Close,
}

/// HTTP + WebSocket transport talking to the match server
#[derive(Clone, Debug)]
pub struct WebSocketTransport {
    config: ServerConfig,
}

impl WebSocketTransport {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}

fn runtime() -> Result<Runtime, SessionError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| SessionError::Connection(format!("failed to start runtime: {e}")))
}

impl MatchTransport for WebSocketTransport {
    fn create_match(&self, events: Sender<TransportEvent>) {
        let url = self.config.new_match_url();
        thread::spawn(move || {
            let result = runtime().and_then(|rt| rt.block_on(request_match(&url)));
            let event = match result {
                Ok(id) => TransportEvent::Created(id),
                Err(e) => {
                    error!(%url, error = %e, "match creation failed");
                    TransportEvent::Error(e.to_string())
                }
            };
            // The session may be gone already; nothing to do then
            let _ = events.send(event);
        });
    }

    fn connect(&self, id: MatchId, events: Sender<TransportEvent>) -> Box<dyn Connection> {
        let url = self.config.play_url(id);
        let (commands_tx, commands_rx) = mpsc::unbounded_channel::<Outbound>();

        thread::spawn(move || match runtime() {
            Ok(rt) => rt.block_on(run_stream(url, commands_rx, events)),
            Err(e) => {
                let _ = events.send(TransportEvent::Error(e.to_string()));
            }
        });

        Box::new(WebSocketConnection {
            commands: commands_tx,
            closed: false,
        })
    }
}

async fn request_match(url: &str) -> Result<MatchId, SessionError> {
    info!(%url, "requesting new match");
    let response = reqwest::Client::new()
        .post(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| SessionError::Http(e.to_string()))?;
    let body: Value = response
        .json()
        .await
        .map_err(|e| SessionError::Http(e.to_string()))?;
    parse_match_id(&body)
}

/// Extract the match id from the creation response body
fn parse_match_id(body: &Value) -> Result<MatchId, SessionError> {
    serde_json::from_value::<NewMatchResponse>(body.clone())
        .map(|response| response.id)
        .map_err(|_| {
            let got = body
                .get("id")
                .map(Value::to_string)
                .unwrap_or_else(|| "nothing".to_string());
            SessionError::InvalidMatchId(got)
        })
}

async fn run_stream(
    url: String,
    mut commands: UnboundedReceiver<Outbound>,
    events: Sender<TransportEvent>,
) {
    let socket = match connect_async(url.as_str()).await {
        Ok((socket, _response)) => socket,
        Err(e) => {
            error!(%url, error = %e, "failed to open play stream");
            let _ = events.send(TransportEvent::Error(e.to_string()));
            return;
        }
    };
    info!(%url, "play stream open");
    if events.send(TransportEvent::Opened).is_err() {
        return;
    }

    let (mut sink, mut stream) = socket.split();
    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(Outbound::Text(text)) => {
                    if let Err(e) = sink.send(Message::text(text)).await {
                        let _ = events.send(TransportEvent::Error(e.to_string()));
                        break;
                    }
                }
                // Close requested, or the connection handle was dropped
                Some(Outbound::Close) | None => {
                    debug!(%url, "closing play stream");
                    let _ = sink.close().await;
                    break;
                }
            },
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if events.send(TransportEvent::Message(text.as_str().to_owned())).is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    let _ = events.send(TransportEvent::Closed);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    error!(%url, error = %e, "play stream failed");
                    let _ = events.send(TransportEvent::Error(e.to_string()));
                    break;
                }
            },
        }
    }
}

/// Handle to a stream running on its own thread
struct WebSocketConnection {
    commands: UnboundedSender<Outbound>,
    closed: bool,
}

impl Connection for WebSocketConnection {
    fn send(&mut self, text: String) -> Result<(), SessionError> {
        if self.closed {
            return Err(SessionError::Closed);
        }
        self.commands
            .send(Outbound::Text(text))
            .map_err(|_| SessionError::Closed)
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let _ = self.commands.send(Outbound::Close);
    }
}

impl Drop for WebSocketConnection {
    fn drop(&mut self) {
        self.close();
    }
}
