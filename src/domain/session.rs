//! Client side of a remote match.
//!
//! [`MatchSession`] creates a match through a [`MatchTransport`], opens the
//! play stream, and folds transport events into a small connection state
//! machine. Transport work happens elsewhere (usually a background thread);
//! it reports back through an event channel that the owner drains with
//! [`MatchSession::poll`].

use std::sync::mpsc::{self, Receiver, Sender};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::protocol::{MatchId, MessageHandler, ServerMessage, dispatch};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("match creation failed: {0}")]
    Http(String),
    #[error("server did not respond with a valid match id: {0}")]
    InvalidMatchId(String),
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("connection is closed")]
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Initial,
    Connecting,
    Connected,
    /// Terminal; there is no automatic retry
    Error { message: String },
}

/// Everything the transport reports back to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The server created a match
    Created(MatchId),
    /// The play stream is open
    Opened,
    /// A text frame arrived
    Message(String),
    Error(String),
    /// The server closed the stream
    Closed,
}

/// An open play stream
pub trait Connection {
    fn send(&mut self, text: String) -> Result<(), SessionError>;
    /// Close the stream. Must tolerate being called on a dead stream.
    fn close(&mut self);
}

/// Network side of a match session
pub trait MatchTransport {
    /// Request a new match. The outcome arrives on `events` as
    /// [`TransportEvent::Created`] or [`TransportEvent::Error`].
    fn create_match(&self, events: Sender<TransportEvent>);

    /// Open the play stream of match `id`, reporting on `events`
    fn connect(&self, id: MatchId, events: Sender<TransportEvent>) -> Box<dyn Connection>;
}

/// What the session has learned about the match lobby
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyStatus {
    pub exists: bool,
    pub players_joined: usize,
    pub identified: Vec<String>,
    pub started: bool,
}

impl Default for LobbyStatus {
    fn default() -> Self {
        Self {
            exists: true,
            players_joined: 0,
            identified: Vec::new(),
            started: false,
        }
    }
}

impl MessageHandler for LobbyStatus {
    fn handle(&mut self, message: &ServerMessage) -> bool {
        match message {
            ServerMessage::GameDoesNotExist => self.exists = false,
            ServerMessage::PlayerJoined => self.players_joined += 1,
            ServerMessage::PlayerIdentified { name } => {
                if let Some(name) = name {
                    self.identified.push(name.clone());
                }
            }
            ServerMessage::GameStarted => self.started = true,
            ServerMessage::Unknown => return false,
        }
        true
    }
}

pub struct MatchSession<T> {
    transport: T,
    match_id: Option<MatchId>,
    state: ConnectionState,
    last_error: Option<String>,
    lobby: LobbyStatus,
    connection: Option<Box<dyn Connection>>,
    /// Set once the session has been closed locally or by the server
    closed: bool,
    events_tx: Sender<TransportEvent>,
    events_rx: Receiver<TransportEvent>,
}

impl<T: MatchTransport> MatchSession<T> {
    pub fn new(transport: T) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            transport,
            match_id: None,
            state: ConnectionState::Initial,
            last_error: None,
            lobby: LobbyStatus::default(),
            connection: None,
            closed: false,
            events_tx,
            events_rx,
        }
    }

    pub fn match_id(&self) -> Option<MatchId> {
        self.match_id
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn lobby(&self) -> &LobbyStatus {
        &self.lobby
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Sender the transport reports on. Exposed so owners can feed events
    /// from elsewhere (e.g. tests).
    pub fn events(&self) -> Sender<TransportEvent> {
        self.events_tx.clone()
    }

    /// Create a new match and connect to it once it exists
    pub fn start(&mut self) -> bool {
        if !self.enter_connecting() {
            return false;
        }
        info!("requesting a new match");
        self.transport.create_match(self.events_tx.clone());
        true
    }

    /// Connect to an already existing match
    pub fn join(&mut self, id: MatchId) -> bool {
        if !self.enter_connecting() {
            return false;
        }
        self.open(id);
        true
    }

    fn enter_connecting(&mut self) -> bool {
        if self.state != ConnectionState::Initial || self.closed {
            warn!(state = ?self.state, "session already started");
            return false;
        }
        self.state = ConnectionState::Connecting;
        true
    }

    fn open(&mut self, id: MatchId) {
        info!(match_id = id, "opening play stream");
        self.match_id = Some(id);
        self.connection = Some(self.transport.connect(id, self.events_tx.clone()));
    }

    /// Send a text frame over the open stream
    pub fn send(&mut self, text: String) -> Result<(), SessionError> {
        match (&self.state, self.connection.as_mut()) {
            (ConnectionState::Connected, Some(connection)) => connection.send(text),
            _ => Err(SessionError::Closed),
        }
    }

    /// Drain all pending transport events. Returns true if any were processed.
    pub fn poll(&mut self, handlers: &mut [&mut dyn MessageHandler]) -> bool {
        let mut processed = false;
        while let Ok(event) = self.events_rx.try_recv() {
            processed |= self.handle_event(event, handlers);
        }
        processed
    }

    /// Apply one transport event. Returns false if it was discarded.
    pub fn handle_event(
        &mut self,
        event: TransportEvent,
        handlers: &mut [&mut dyn MessageHandler],
    ) -> bool {
        if self.closed || matches!(self.state, ConnectionState::Error { .. }) {
            debug!(?event, "discarding event for finished session");
            return false;
        }

        match event {
            TransportEvent::Created(id) => {
                if self.state != ConnectionState::Connecting || self.match_id.is_some() {
                    warn!(match_id = id, "unexpected match creation");
                    return false;
                }
                self.open(id);
            }
            TransportEvent::Opened => {
                if self.state != ConnectionState::Connecting {
                    return false;
                }
                info!(match_id = ?self.match_id, "connected to match");
                self.state = ConnectionState::Connected;
            }
            TransportEvent::Message(text) => {
                let Some(message) = ServerMessage::parse(&text) else {
                    return false;
                };
                debug!(?message, "received message");
                let seen_by_lobby = self.lobby.handle(&message);
                let handled = dispatch(&message, handlers);
                return seen_by_lobby || handled;
            }
            TransportEvent::Error(message) => {
                error!(match_id = ?self.match_id, %message, "match session failed");
                self.last_error = Some(message.clone());
                self.state = ConnectionState::Error { message };
                self.release();
            }
            TransportEvent::Closed => {
                info!(match_id = ?self.match_id, "server closed the connection");
                if self.state == ConnectionState::Connecting {
                    let message = "Connection closed before it was established".to_string();
                    self.last_error = Some(message.clone());
                    self.state = ConnectionState::Error { message };
                }
                self.release();
                self.closed = true;
            }
        }
        true
    }

    /// Close the stream. Safe to call repeatedly; the underlying connection is
    /// closed at most once and no event is processed afterwards.
    pub fn close(&mut self) {
        if !self.closed {
            info!(match_id = ?self.match_id, "closing match session");
        }
        self.release();
        self.closed = true;
    }

    fn release(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            connection.close();
        }
    }

    /// Text for the user describing where the session stands
    pub fn status_message(&self) -> String {
        match &self.state {
            ConnectionState::Initial => "setting everything up...".to_string(),
            ConnectionState::Connecting => "Connecting to the server...".to_string(),
            ConnectionState::Error { message } => format!("Something went wrong: {message}"),
            ConnectionState::Connected if !self.lobby.exists => {
                "This match does not exist.".to_string()
            }
            ConnectionState::Connected if self.lobby.started => "The game has started!".to_string(),
            ConnectionState::Connected if self.closed => "The server closed the connection.".to_string(),
            ConnectionState::Connected => {
                "Connected! Waiting for other players to join...".to_string()
            }
        }
    }
}

impl<T> Drop for MatchSession<T> {
    fn drop(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            connection.close();
        }
    }
}
