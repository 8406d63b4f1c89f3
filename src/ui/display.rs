//! Display generation for the board and its status line.
//!
//! This module transforms interaction state into display-ready view models.
//! It lives in the UI layer and depends on domain, not vice versa.

use crate::domain::{
    Coordinate, Figure, InteractionState, Phase, can_move_to, cell_label, has_picked_up,
};
use crate::ui::view_models::{CellView, SquareHighlight};

/// All 64 cells in row-major order, row 0 (Black's back rank) first
pub fn board_cells(state: &InteractionState) -> Vec<CellView> {
    let checked_king = state.check.then(|| king_square(state)).flatten();

    Coordinate::all()
        .map(|at| {
            let piece = state.game.piece_at(at);
            let target = can_move_to(state, at);
            let highlight = if has_picked_up(state, at) {
                SquareHighlight::Selected
            } else if target && piece.is_some() {
                SquareHighlight::Capture
            } else if target {
                SquareHighlight::Target
            } else if checked_king == Some(at) {
                SquareHighlight::Check
            } else {
                SquareHighlight::None
            };
            CellView {
                at,
                piece,
                highlight,
                label: cell_label(at, target && piece.is_some(), piece),
            }
        })
        .collect()
}

fn king_square(state: &InteractionState) -> Option<Coordinate> {
    let player = state.game.player;
    Coordinate::all().find(|&at| {
        state
            .game
            .piece_at(at)
            .is_some_and(|piece| piece.belongs_to(player) && piece.figure == Figure::King)
    })
}

/// One line describing what the board is waiting for
pub fn status_line(state: &InteractionState) -> String {
    let player = state.game.player;
    match &state.phase {
        Phase::SelectingFrom if state.check => format!("{player} to move, in check"),
        Phase::SelectingFrom => format!("{player} to move"),
        Phase::SelectingTo { from, piece, .. } => {
            format!("{player} moves the {} on {from}", piece.figure)
        }
        Phase::Promoting { to, .. } => format!("Choose a promotion for the pawn on {to}"),
        Phase::GameOver { winner } => format!("Checkmate! {winner} wins"),
        Phase::Errored { message } => message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Color, Command, GameState, Piece, SelectionMachine, ShakmatyRules,
    };

    fn at(x: usize, y: usize) -> Coordinate {
        Coordinate::new(x, y).unwrap()
    }

    fn cell(cells: &[CellView], x: usize, y: usize) -> &CellView {
        &cells[y * 8 + x]
    }

    #[test]
    fn test_initial_board_cells() {
        let state = InteractionState::new(GameState::initial());
        let cells = board_cells(&state);
        assert_eq!(cells.len(), 64);
        assert!(cells.iter().all(|c| c.highlight == SquareHighlight::None));
        assert_eq!(cell(&cells, 0, 0).label, "Black Rook at a8");
        assert_eq!(cell(&cells, 4, 4).label, "e4");
        assert_eq!(cell(&cells, 4, 6).piece, Some(Piece::white(Figure::Pawn)));
        assert_eq!(status_line(&state), "White to move");
    }

    #[test]
    fn test_pickup_highlights_targets() {
        let mut machine = SelectionMachine::new(ShakmatyRules::new());
        machine.dispatch(Command::SelectFrom(at(4, 6)));
        let cells = board_cells(machine.state());

        assert_eq!(cell(&cells, 4, 6).highlight, SquareHighlight::Selected);
        assert_eq!(cell(&cells, 4, 5).highlight, SquareHighlight::Target);
        assert_eq!(cell(&cells, 4, 4).highlight, SquareHighlight::Target);
        assert_eq!(cell(&cells, 4, 3).highlight, SquareHighlight::None);
        assert_eq!(status_line(machine.state()), "White moves the Pawn on e2");
    }

    #[test]
    fn test_capture_target_is_labelled() {
        // 1. e4 d5, white pawn on e4 can take on d5
        let game = GameState::from_fen(
            "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2",
        )
        .unwrap();
        let mut machine =
            SelectionMachine::with_state(ShakmatyRules::new(), InteractionState::new(game));
        machine.dispatch(Command::SelectFrom(at(4, 4)));
        let cells = board_cells(machine.state());

        let capture = cell(&cells, 3, 3);
        assert_eq!(capture.highlight, SquareHighlight::Capture);
        assert_eq!(capture.label, "capture Black Pawn at d5");
    }

    #[test]
    fn test_check_and_mate() {
        let mut machine = SelectionMachine::new(ShakmatyRules::new());
        for (from, to) in [((5, 6), (5, 5)), ((4, 1), (4, 3)), ((6, 6), (6, 4)), ((3, 0), (7, 4))] {
            machine.dispatch(Command::SelectFrom(at(from.0, from.1)));
            machine.dispatch(Command::SelectTo(at(to.0, to.1)));
        }
        let state = machine.state();
        assert_eq!(state.phase, Phase::GameOver { winner: Color::Black });
        assert_eq!(status_line(state), "Checkmate! Black wins");

        let cells = board_cells(state);
        assert_eq!(cell(&cells, 4, 7).highlight, SquareHighlight::Check);
    }

    #[test]
    fn test_errored_status_shows_message() {
        let mut machine = SelectionMachine::new(ShakmatyRules::new());
        machine.dispatch(Command::SelectFrom(at(4, 4)));
        assert_eq!(status_line(machine.state()), "No piece to move");
    }
}
