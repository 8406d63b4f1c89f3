//! Theme constants and colors for the chess UI.

use gpui::{Rgba, rgb};

use crate::domain::Coordinate;

// Layout constants
pub const BOARD_PADDING: f32 = 20.0;
pub const PIECE_SCALE: f32 = 0.9; // piece size relative to square
pub const MIN_SQUARE_SIZE: f32 = 30.0;

// Initial panel sizes
pub const INITIAL_LEFT_PANEL: f32 = 560.0;
pub const INITIAL_RIGHT_PANEL: f32 = 300.0;

// Board colors
pub const LIGHT_SQUARE: u32 = 0xEFD9B5;
pub const DARK_SQUARE: u32 = 0xB48764;

// Highlights
pub const SELECTED_SQUARE: u32 = 0xF6F669;
pub const TARGET_DOT: u32 = 0x3f6e35;
pub const CAPTURE_RING: u32 = 0xc0392b;
pub const CHECK_SQUARE: u32 = 0xe05a4f;
pub const FOCUS_RING: u32 = 0x4a9eff;

// Panel colors
pub const PANEL_BG: u32 = 0x2a2a2a;
pub const OVERLAY_BG: u32 = 0x1e1e1e;
pub const BORDER_COLOR: u32 = 0x4a4a4a;
pub const TEXT_PRIMARY: u32 = 0xffffff;
pub const TEXT_SECONDARY: u32 = 0x888888;
pub const TEXT_ERROR: u32 = 0xf87171;

/// Get the color for a board square based on its position
pub fn square_color(at: Coordinate) -> Rgba {
    if (at.x() + at.y()) % 2 == 0 {
        rgb(LIGHT_SQUARE)
    } else {
        rgb(DARK_SQUARE)
    }
}
