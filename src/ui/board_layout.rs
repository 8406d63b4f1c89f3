//! Board layout calculations - square and piece sizes for the measured panel.

use crate::domain::BOARD_SIZE;
use crate::ui::theme::{BOARD_PADDING, MIN_SQUARE_SIZE, PIECE_SCALE};
use gpui::{Pixels, Size};

#[derive(Clone, Copy, Debug)]
pub struct BoardLayout {
    pub panel_size: Size<Pixels>,
}

impl BoardLayout {
    pub fn new(panel_size: Size<Pixels>) -> Self {
        Self { panel_size }
    }

    /// Largest square size that fits the panel, never below the minimum
    pub fn square_size(&self) -> f32 {
        let panel_width: f32 = self.panel_size.width.into();
        let panel_height: f32 = self.panel_size.height.into();
        let available_width = panel_width - BOARD_PADDING * 2.0;
        let available_height = panel_height - BOARD_PADDING * 2.0;
        (available_width.min(available_height) / BOARD_SIZE as f32).max(MIN_SQUARE_SIZE)
    }

    pub fn piece_size(&self) -> f32 {
        self.square_size() * PIECE_SCALE
    }

    pub fn board_total_size(&self) -> f32 {
        self.square_size() * BOARD_SIZE as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpui::px;

    fn layout(width: f32, height: f32) -> BoardLayout {
        BoardLayout::new(Size {
            width: px(width),
            height: px(height),
        })
    }

    #[test]
    fn test_square_size_uses_shorter_side() {
        let layout = layout(840.0, 440.0);
        assert_eq!(layout.square_size(), 50.0);
        assert_eq!(layout.board_total_size(), 400.0);
        assert_eq!(layout.piece_size(), 45.0);
    }

    #[test]
    fn test_square_size_has_a_floor() {
        assert_eq!(layout(100.0, 100.0).square_size(), MIN_SQUARE_SIZE);
    }
}
