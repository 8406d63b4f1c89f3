//! Promotion picker - lets the player choose what a pawn becomes.

use gpui::{Entity, div, img, prelude::*, px, rgb};
use gpui_component::button::{Button, ButtonVariants};

use crate::domain::{Color, Command, Piece, PromotedFigure};
use crate::models::GameModel;
use super::piece::svg_path;
use crate::ui::theme::TEXT_PRIMARY;

/// Render one button per promotion figure plus a cancel button
pub fn render_promotion_picker(
    model: &Entity<GameModel>,
    color: Color,
    piece_size: f32,
) -> impl IntoElement {
    let choices = PromotedFigure::CHOICES
        .into_iter()
        .enumerate()
        .map(|(index, figure)| {
            let model = model.clone();
            let piece = Piece::new(color, figure.to_figure());
            div()
                .flex()
                .flex_col()
                .items_center()
                .gap_1()
                .child(img(svg_path(piece)).size(px(piece_size)))
                .child(
                    Button::new(("promote", index))
                        .label(figure.to_figure().to_string())
                        .primary()
                        .compact()
                        .on_click(move |_, _, cx| {
                            model.update(cx, |game, cx| {
                                game.dispatch(Command::Promote(figure), cx);
                            });
                        }),
                )
        });

    let model_cancel = model.clone();
    div()
        .flex()
        .flex_col()
        .items_center()
        .gap_3()
        .child(
            div()
                .text_color(rgb(TEXT_PRIMARY))
                .child("Promote pawn to"),
        )
        .child(div().flex().gap_3().children(choices))
        .child(
            Button::new("cancel-promotion")
                .label("Cancel")
                .compact()
                .on_click(move |_, _, cx| {
                    model_cancel.update(cx, |game, cx| {
                        game.dispatch(Command::AbortSelection, cx);
                    });
                }),
        )
}
