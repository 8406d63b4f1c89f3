//! Screen-reader labels for board cells.

use super::chess::{Cell, Coordinate};

/// Human-readable label for a cell, e.g. `capture Black Knight at f6` or `e4`
pub fn cell_label(position: Coordinate, captures: bool, contents: Cell) -> String {
    let origin = position.algebraic();
    match contents {
        Some(piece) => {
            let prefix = if captures { "capture " } else { "" };
            format!("{prefix}{} {} at {origin}", piece.color, piece.figure)
        }
        None => origin,
    }
}
