//! Piece rendering component.

use crate::domain::{Color, Figure, Piece};
use gpui::{div, img, prelude::*, px};

/// Asset path of the artwork for a piece
pub fn svg_path(piece: Piece) -> &'static str {
    match (piece.figure, piece.color) {
        (Figure::Pawn, Color::White) => "assets/pawn-white.svg",
        (Figure::Pawn, Color::Black) => "assets/pawn-black.svg",
        (Figure::Rook, Color::White) => "assets/rook-white.svg",
        (Figure::Rook, Color::Black) => "assets/rook-black.svg",
        (Figure::Knight, Color::White) => "assets/knight-white.svg",
        (Figure::Knight, Color::Black) => "assets/knight-black.svg",
        (Figure::Bishop, Color::White) => "assets/bishop-white.svg",
        (Figure::Bishop, Color::Black) => "assets/bishop-black.svg",
        (Figure::Queen, Color::White) => "assets/queen-white.svg",
        (Figure::Queen, Color::Black) => "assets/queen-black.svg",
        (Figure::King, Color::White) => "assets/king-white.svg",
        (Figure::King, Color::Black) => "assets/king-black.svg",
    }
}

/// Render a chess piece centered in its container
pub fn render_piece(piece: Piece, piece_size: f32) -> impl IntoElement {
    div()
        .size_full()
        .flex()
        .items_center()
        .justify_center()
        .child(img(svg_path(piece)).size(px(piece_size)))
}
