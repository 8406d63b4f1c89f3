//! Match model - drives a remote match session from the UI thread.
//!
//! Architecture:
//! - [`WebSocketTransport`] does all network work on background threads
//! - A GPUI task polls the session's event channel and pushes updates to the UI
//! - The task only holds a weak handle, so it ends when the model is dropped

use std::time::Duration;

use gpui::{AsyncApp, Context, EventEmitter, Task, WeakEntity};

use super::transport::WebSocketTransport;
use crate::config::ServerConfig;
use crate::domain::{ConnectionState, MatchId, MatchSession, ServerMessage};

/// Emitted to subscribers as the match progresses
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchEvent {
    /// A known message arrived from the server
    Message(ServerMessage),
    /// The session failed and will not recover
    Failed(String),
    /// The server closed the connection
    Closed,
}

pub struct MatchModel {
    session: MatchSession<WebSocketTransport>,
    /// Background polling task (kept alive while the session is live)
    _poll_task: Option<Task<()>>,
}

impl EventEmitter<MatchEvent> for MatchModel {}

impl MatchModel {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            session: MatchSession::new(WebSocketTransport::new(config)),
            _poll_task: None,
        }
    }

    pub fn session(&self) -> &MatchSession<WebSocketTransport> {
        &self.session
    }

    /// Create a new match on the server and connect to it
    pub fn start(&mut self, cx: &mut Context<Self>) {
        if self.session.start() {
            self.spawn_poll_task(cx);
        }
        cx.notify();
    }

    /// Connect to an existing match
    pub fn join(&mut self, id: MatchId, cx: &mut Context<Self>) {
        if self.session.join(id) {
            self.spawn_poll_task(cx);
        }
        cx.notify();
    }

    /// Leave the match. Safe to call more than once.
    pub fn close(&mut self, cx: &mut Context<Self>) {
        self.session.close();
        self._poll_task = None;
        cx.notify();
    }

    fn spawn_poll_task(&mut self, cx: &mut Context<Self>) {
        let poll_task = cx.spawn(
            async move |weak_entity: WeakEntity<MatchModel>, cx: &mut AsyncApp| {
                Self::run_event_loop(weak_entity, cx).await;
            },
        );
        self._poll_task = Some(poll_task);
    }

    async fn run_event_loop(weak_entity: WeakEntity<MatchModel>, cx: &mut AsyncApp) {
        const POLL_INTERVAL: Duration = Duration::from_millis(16);

        loop {
            cx.background_executor().timer(POLL_INTERVAL).await;

            // Exit once the entity is gone or the session is over
            let should_continue =
                weak_entity.update(cx, |model, cx| model.process_pending_events(cx));

            match should_continue {
                Ok(true) => continue,
                _ => break,
            }
        }
    }

    /// Drain the session's events. Returns false once nothing more can arrive.
    fn process_pending_events(&mut self, cx: &mut Context<Self>) -> bool {
        if self.session.is_closed() {
            return false;
        }

        let mut received = Vec::new();
        let processed = {
            let mut collect = |message: &ServerMessage| {
                received.push(message.clone());
                true
            };
            self.session.poll(&mut [&mut collect])
        };

        for message in received {
            cx.emit(MatchEvent::Message(message));
        }

        let finished = if let ConnectionState::Error { message } = self.session.state() {
            cx.emit(MatchEvent::Failed(message.clone()));
            true
        } else if self.session.is_closed() {
            cx.emit(MatchEvent::Closed);
            true
        } else {
            false
        };

        if processed || finished {
            cx.notify();
        }
        !finished
    }
}

impl Drop for MatchModel {
    fn drop(&mut self) {
        self.session.close();
    }
}
