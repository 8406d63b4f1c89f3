//! Chess board view - click or keyboard driven piece movement.
//!
//! Every square owns a focus handle registered with a [`FocusNavigator`].
//! Arrow keys move focus between squares, Enter/Space activate the focused
//! square like a click, and Escape drops the piece that is picked up.
//! Keys are handled on the view's root, so they keep working while focus sits
//! in the side panel.

use gpui::{
    Context, Entity, FocusHandle, KeyDownEvent, MouseButton, MouseDownEvent, Pixels,
    Subscription, Window, canvas, div, prelude::*, px, rgb, rgba,
};
use gpui_component::button::{Button, ButtonVariants};
use gpui_component::resizable::{h_resizable, resizable_panel};
use tracing::debug;

use crate::domain::{BOARD_SIZE, BoardKey, Coordinate, FocusNavigator, KeyOutcome, Phase};
use crate::models::GameModel;
use crate::ui::components::{render_promotion_picker, render_square};
use crate::ui::display::board_cells;
use crate::ui::theme::{
    BOARD_PADDING, BORDER_COLOR, INITIAL_LEFT_PANEL, INITIAL_RIGHT_PANEL, OVERLAY_BG, PANEL_BG,
    TEXT_ERROR, TEXT_PRIMARY,
};
use crate::ui::views::render_status_panel;

/// Square that gets focus when the board opens (e2)
const INITIAL_FOCUS: (usize, usize) = (4, 6);

/// The main chess board view that observes a GameModel
pub struct ChessBoardView {
    model: Entity<GameModel>,
    navigator: FocusNavigator<FocusHandle>,
    /// Focus of the whole view, outside any square
    focus_handle: FocusHandle,
    _subscription: Subscription,
}

impl ChessBoardView {
    pub fn new(model: Entity<GameModel>, cx: &mut Context<Self>) -> Self {
        let _subscription = cx.observe(&model, |_, _, cx| cx.notify());

        let mut navigator = FocusNavigator::new();
        for at in Coordinate::all() {
            navigator.register(at, cx.focus_handle());
        }
        let (x, y) = INITIAL_FOCUS;
        if let Some(home) = Coordinate::new(x, y) {
            navigator.set_home(home);
        }

        Self {
            model,
            navigator,
            focus_handle: cx.focus_handle(),
            _subscription,
        }
    }

    /// Give keyboard focus to the board
    pub fn focus_initial(&self, window: &mut Window) {
        match self.navigator.home().and_then(|at| self.navigator.get(at)) {
            Some(handle) => handle.focus(window),
            None => self.focus_handle.focus(window),
        }
    }

    fn focused_cell(&self, window: &Window) -> Option<Coordinate> {
        self.navigator
            .focused_coordinate(|handle| handle.is_focused(window))
    }

    /// Same as clicking the square
    fn activate(&mut self, at: Coordinate, window: &mut Window, cx: &mut Context<Self>) {
        if let Some(handle) = self.navigator.get(at) {
            handle.focus(window);
        }
        self.model.update(cx, |game, cx| game.click(at, cx));
    }

    fn on_key_down(&mut self, event: &KeyDownEvent, window: &mut Window, cx: &mut Context<Self>) {
        let focused = self.focused_cell(window);
        let key = event.keystroke.key.as_str();

        if matches!(key, "enter" | "space") {
            if let Some(at) = focused {
                self.activate(at, window, cx);
                cx.stop_propagation();
            }
            return;
        }

        let Some(key) = BoardKey::from_key_name(key) else {
            return;
        };
        match self.navigator.handle_key(key, focused) {
            KeyOutcome::Focus(at, handle) => {
                debug!(%at, "moving focus");
                handle.focus(window);
                cx.notify();
            }
            KeyOutcome::Dispatch(command) => {
                self.model.update(cx, |game, cx| game.dispatch(command, cx));
            }
            KeyOutcome::Ignored => {}
        }
        cx.stop_propagation();
    }
}

impl Render for ChessBoardView {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let model_measure = self.model.clone();
        let model_restart = self.model.clone();
        let view_focus = self.focus_handle.clone();
        let focused = self.focused_cell(window);

        let game = self.model.read(cx);
        let layout = game.layout();
        let state = game.state();
        let phase = state.phase.clone();
        let player = state.game.player;
        let cells = board_cells(state);

        // Sizing based on measured panel dimensions
        let square_size = layout.square_size();
        let piece_size = layout.piece_size();
        let board_total_size = layout.board_total_size();

        let focused_label = focused
            .and_then(|at| cells.iter().find(|cell| cell.at == at))
            .map(|cell| cell.label.clone());

        let rows = cells.chunks(BOARD_SIZE).map(|row| {
            div().flex().flex_shrink_0().children(row.iter().map(|cell| {
                let at = cell.at;
                render_square(cell, focused == Some(at), square_size, piece_size)
                    .id(("cell", at.y() * BOARD_SIZE + at.x()))
                    .when_some(self.navigator.get(at), |el, handle| el.track_focus(handle))
                    .on_mouse_down(
                        MouseButton::Left,
                        cx.listener(move |this, _: &MouseDownEvent, window, cx| {
                            this.activate(at, window, cx);
                        }),
                    )
            }))
        });

        let overlay = match &phase {
            Phase::Promoting { .. } => Some(
                render_promotion_picker(&self.model, player, piece_size).into_any_element(),
            ),
            Phase::GameOver { winner } => Some(
                render_result(
                    format!("Checkmate! {winner} wins"),
                    false,
                    model_restart,
                    view_focus,
                )
                    .into_any_element(),
            ),
            Phase::Errored { message } => Some(
                render_result(message.clone(), true, model_restart, view_focus)
                    .into_any_element(),
            ),
            _ => None,
        };

        // Board element with fixed size - always maintains 1:1 aspect ratio
        let board = div()
            .relative()
            .flex_shrink_0()
            .flex()
            .flex_col()
            .w(px(board_total_size))
            .h(px(board_total_size))
            .overflow_hidden()
            .rounded_md()
            .children(rows)
            .when_some(overlay, |el, overlay| {
                el.child(
                    div()
                        .absolute()
                        .top_0()
                        .left_0()
                        .size_full()
                        .flex()
                        .items_center()
                        .justify_center()
                        .bg(rgba(0x00000099))
                        .child(
                            div()
                                .p_4()
                                .rounded_md()
                                .bg(rgb(OVERLAY_BG))
                                .border_1()
                                .border_color(rgb(BORDER_COLOR))
                                .child(overlay),
                        ),
                )
            });

        let board_panel_content = div()
            .id("board-panel")
            .relative()
            .size_full()
            .overflow_hidden()
            .bg(rgb(PANEL_BG))
            .p(px(BOARD_PADDING))
            .child(board);

        // Canvas to measure actual panel size
        let measure_canvas = canvas(
            move |bounds, _window, cx| {
                model_measure.update(cx, |game, cx| {
                    if game.panel_size != bounds.size {
                        game.panel_size = bounds.size;
                        cx.notify();
                    }
                });
            },
            |_, _, _, _| {},
        )
        .absolute()
        .top_0()
        .left_0()
        .size_full();

        let board_panel_with_measure = div()
            .relative()
            .size_full()
            .child(measure_canvas)
            .child(board_panel_content);

        let status_panel =
            render_status_panel(&self.model, focused_label, self.focus_handle.clone(), cx);

        div()
            .id("chess-board-view")
            .track_focus(&self.focus_handle)
            .key_context("ChessBoard")
            .on_key_down(cx.listener(Self::on_key_down))
            .size_full()
            .child(
                h_resizable("chess-layout")
                    .child(
                        resizable_panel()
                            .size(px(INITIAL_LEFT_PANEL))
                            .size_range(px(320.)..px(1200.))
                            .child(board_panel_with_measure),
                    )
                    .child(
                        resizable_panel()
                            .size(px(INITIAL_RIGHT_PANEL))
                            .size_range(px(150.)..Pixels::MAX)
                            .child(status_panel),
                    ),
            )
    }
}

/// Game over or error notice with a way to start again
fn render_result(
    message: String,
    is_error: bool,
    model: Entity<GameModel>,
    board_focus: FocusHandle,
) -> impl IntoElement {
    let color = if is_error { TEXT_ERROR } else { TEXT_PRIMARY };
    div()
        .flex()
        .flex_col()
        .items_center()
        .gap_3()
        .child(div().text_color(rgb(color)).child(message))
        .child(
            Button::new("new-game")
                .label("New game")
                .primary()
                .compact()
                .on_click(move |_, window, cx| {
                    model.update(cx, |game, cx| game.restart(cx));
                    board_focus.focus(window);
                }),
        )
}
