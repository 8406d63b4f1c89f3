//! View models for rendering the board.
//!
//! These types prepare interaction state for display. They live in the UI
//! layer, not the domain layer.

use crate::domain::{Coordinate, Piece};

/// How a square is emphasised
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SquareHighlight {
    None,
    /// Origin of the piece that is picked up
    Selected,
    /// Empty square the picked-up piece may move to
    Target,
    /// Occupied square the picked-up piece may capture on
    Capture,
    /// King of the side to move, in check
    Check,
}

/// Display data for a single board square
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellView {
    pub at: Coordinate,
    pub piece: Option<Piece>,
    pub highlight: SquareHighlight,
    /// Screen-reader text
    pub label: String,
}
