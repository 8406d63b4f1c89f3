//! Square rendering component.

use crate::ui::components::render_piece;
use crate::ui::theme::{
    CAPTURE_RING, CHECK_SQUARE, FOCUS_RING, SELECTED_SQUARE, TARGET_DOT, square_color,
};
use crate::ui::view_models::{CellView, SquareHighlight};
use gpui::{Div, div, prelude::*, px, rgb};

/// Render a single board square with its piece and highlight.
///
/// Returns the bare `Div` so the caller can attach focus and mouse handling.
pub fn render_square(cell: &CellView, focused: bool, square_size: f32, piece_size: f32) -> Div {
    let background = match cell.highlight {
        SquareHighlight::Selected => rgb(SELECTED_SQUARE),
        SquareHighlight::Check => rgb(CHECK_SQUARE),
        _ => square_color(cell.at),
    };

    div()
        .flex_shrink_0() // never shrink - maintain aspect ratio
        .size(px(square_size))
        .bg(background)
        .flex()
        .items_center()
        .justify_center()
        .when(cell.highlight == SquareHighlight::Capture, |el| {
            el.border_4().border_color(rgb(CAPTURE_RING))
        })
        .when(focused, |el| el.border_2().border_color(rgb(FOCUS_RING)))
        .when_some(cell.piece, |el, piece| el.child(render_piece(piece, piece_size)))
        .when(cell.highlight == SquareHighlight::Target, |el| {
            el.child(
                div()
                    .size(px(square_size * 0.3))
                    .rounded_full()
                    .opacity(0.6)
                    .bg(rgb(TARGET_DOT)),
            )
        })
}
