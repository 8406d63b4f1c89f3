//! Match lobby view - connection status and what the server has told us.

use gpui::{Context, Entity, Subscription, Window, div, prelude::*, px, rgb};
use gpui_component::button::{Button, ButtonVariants};

use crate::domain::{ConnectionState, ServerMessage};
use crate::models::{MatchEvent, MatchModel};
use crate::ui::theme::{
    BOARD_PADDING, BORDER_COLOR, OVERLAY_BG, PANEL_BG, TEXT_ERROR, TEXT_PRIMARY, TEXT_SECONDARY,
};

/// Keep the lobby log short
const MAX_LOG_LINES: usize = 50;

pub struct MatchView {
    model: Entity<MatchModel>,
    log: Vec<String>,
    _subscriptions: Vec<Subscription>,
}

impl MatchView {
    pub fn new(model: Entity<MatchModel>, cx: &mut Context<Self>) -> Self {
        let _subscriptions = vec![
            cx.observe(&model, |_, _, cx| cx.notify()),
            cx.subscribe(&model, |this, _, event: &MatchEvent, cx| {
                this.push_log(describe(event));
                cx.notify();
            }),
        ];
        Self {
            model,
            log: Vec::new(),
            _subscriptions,
        }
    }

    fn push_log(&mut self, line: String) {
        self.log.push(line);
        if self.log.len() > MAX_LOG_LINES {
            let excess = self.log.len() - MAX_LOG_LINES;
            self.log.drain(0..excess);
        }
    }
}

/// One log line for a match event
fn describe(event: &MatchEvent) -> String {
    match event {
        MatchEvent::Message(ServerMessage::GameDoesNotExist) => {
            "The server does not know this match".to_string()
        }
        MatchEvent::Message(ServerMessage::PlayerJoined) => "A player joined".to_string(),
        MatchEvent::Message(ServerMessage::PlayerIdentified { name: Some(name) }) => {
            format!("{name} is ready")
        }
        MatchEvent::Message(ServerMessage::PlayerIdentified { name: None }) => {
            "A player is ready".to_string()
        }
        MatchEvent::Message(ServerMessage::GameStarted) => "The game has started".to_string(),
        MatchEvent::Message(ServerMessage::Unknown) => "Unrecognised message".to_string(),
        MatchEvent::Failed(message) => format!("Connection failed: {message}"),
        MatchEvent::Closed => "Connection closed".to_string(),
    }
}

impl Render for MatchView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let model_leave = self.model.clone();

        let session = self.model.read(cx).session();
        let title = match session.match_id() {
            Some(id) => format!("Match #{id}"),
            None => "New match".to_string(),
        };
        let status = session.status_message();
        let status_color = match session.state() {
            ConnectionState::Error { .. } => TEXT_ERROR,
            _ => TEXT_PRIMARY,
        };
        let lobby = session.lobby();
        let players = format!("Players joined: {}", lobby.players_joined);
        let names = (!lobby.identified.is_empty())
            .then(|| format!("Ready: {}", lobby.identified.join(", ")));
        let can_leave = !session.is_closed();

        let log = div()
            .id("match-log")
            .flex_1()
            .overflow_y_scroll()
            .p_4()
            .pt_2()
            .children(self.log.iter().map(|line| {
                div()
                    .text_sm()
                    .text_color(rgb(TEXT_SECONDARY))
                    .child(line.clone())
            }));

        let panel = div()
            .flex_1()
            .flex()
            .flex_col()
            .bg(rgb(OVERLAY_BG))
            .border_1()
            .border_color(rgb(BORDER_COLOR))
            .rounded_md()
            .overflow_hidden()
            .child(
                div()
                    .p_4()
                    .pb_2()
                    .text_color(rgb(TEXT_PRIMARY))
                    .border_b_1()
                    .border_color(rgb(BORDER_COLOR))
                    .child(title),
            )
            .child(
                div()
                    .flex()
                    .flex_col()
                    .gap_1()
                    .p_4()
                    .child(div().text_color(rgb(status_color)).child(status))
                    .child(div().text_sm().text_color(rgb(TEXT_SECONDARY)).child(players))
                    .when_some(names, |el, names| {
                        el.child(div().text_sm().text_color(rgb(TEXT_SECONDARY)).child(names))
                    }),
            )
            .child(log)
            .child(
                div()
                    .flex()
                    .justify_center()
                    .p_3()
                    .border_t_1()
                    .border_color(rgb(BORDER_COLOR))
                    .when(can_leave, |el| {
                        el.child(
                            Button::new("leave-match")
                                .label("Leave")
                                .danger()
                                .compact()
                                .on_click(move |_, _, cx| {
                                    model_leave.update(cx, |model, cx| model.close(cx));
                                }),
                        )
                    }),
            );

        div()
            .size_full()
            .flex()
            .flex_col()
            .bg(rgb(PANEL_BG))
            .p(px(BOARD_PADDING))
            .child(panel)
    }
}
