//! Status panel - whose turn it is, the focused square and game controls.

use gpui::{App, Div, Entity, FocusHandle, div, prelude::*, px, rgb};
use gpui_component::button::{Button, ButtonVariants};

use crate::domain::Phase;
use crate::models::GameModel;
use crate::ui::display::status_line;
use crate::ui::theme::{
    BOARD_PADDING, BORDER_COLOR, OVERLAY_BG, PANEL_BG, TEXT_ERROR, TEXT_PRIMARY, TEXT_SECONDARY,
};

const KEYBOARD_HINT: &str = "Arrows move, Enter picks up or drops, Esc cancels";

/// Render the panel beside the board.
/// `focused_label` is the screen-reader text of the focused square.
/// Restarting hands focus back to `board_focus`.
pub fn render_status_panel(
    model: &Entity<GameModel>,
    focused_label: Option<String>,
    board_focus: FocusHandle,
    cx: &App,
) -> Div {
    let game = model.read(cx);
    let state = game.state();
    let status = status_line(state);
    let status_color = if matches!(state.phase, Phase::Errored { .. }) {
        TEXT_ERROR
    } else {
        TEXT_PRIMARY
    };
    let fen = game.fen();

    let model_restart = model.clone();

    let panel = div()
        .flex_1()
        .flex()
        .flex_col()
        .bg(rgb(OVERLAY_BG))
        .border_1()
        .border_color(rgb(BORDER_COLOR))
        .rounded_md()
        .overflow_hidden()
        // Header
        .child(
            div()
                .p_4()
                .pb_2()
                .text_color(rgb(TEXT_PRIMARY))
                .border_b_1()
                .border_color(rgb(BORDER_COLOR))
                .child("Game"),
        )
        .child(
            div()
                .flex_1()
                .flex()
                .flex_col()
                .gap_2()
                .p_4()
                .pt_2()
                .child(div().text_color(rgb(status_color)).child(status))
                .when_some(focused_label, |el, label| {
                    el.child(
                        div()
                            .text_sm()
                            .text_color(rgb(TEXT_SECONDARY))
                            .child(format!("Focused: {label}")),
                    )
                })
                .child(
                    div()
                        .text_xs()
                        .text_color(rgb(TEXT_SECONDARY))
                        .child(KEYBOARD_HINT),
                )
                .child(
                    div()
                        .text_xs()
                        .text_color(rgb(TEXT_SECONDARY))
                        .child(fen),
                ),
        )
        .child(
            div()
                .flex()
                .items_center()
                .justify_center()
                .p_3()
                .border_t_1()
                .border_color(rgb(BORDER_COLOR))
                .child(
                    Button::new("restart-game")
                        .label("Restart")
                        .danger()
                        .compact()
                        .on_click(move |_, window, cx| {
                            model_restart.update(cx, |game, cx| game.restart(cx));
                            board_focus.focus(window);
                        }),
                ),
        );

    div()
        .size_full()
        .flex()
        .flex_col()
        .bg(rgb(PANEL_BG))
        .p(px(BOARD_PADDING))
        .child(panel)
}
