//! Forsyth-Edwards Notation for [`GameState`] snapshots.
//!
//! Encoding and parsing go through shakmaty's [`Setup`]/[`Fen`] codec. This
//! module also owns the conversion between domain snapshots and shakmaty
//! setups, which the rules adapter builds its positions from.

use shakmaty::fen::{Fen, LossyFenError, ParseFenError};
use shakmaty::{
    Board as SBoard, CastlingMode, Chess, Color as SColor, File, FromSetup, Piece as SPiece,
    Rank, Role, Setup, Square,
};
use thiserror::Error;

use super::chess::{
    CastleSides, CastlingRights, Color, Coordinate, Figure, GameState, Piece, empty_board,
};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error(transparent)]
    Parse(#[from] ParseFenError),
    #[error("expected 6 fields, found {0}")]
    FieldCount(usize),
    #[error("castling field '{0}' repeats a right")]
    Castling(String),
    #[error("fullmove number starts at 1")]
    Fullmove,
    /// Readable FEN describing a position that cannot occur
    #[error("{0}")]
    Position(String),
}

/// Convert a coordinate (row 0 = rank 8) to a shakmaty square
pub(super) fn to_square(c: Coordinate) -> Square {
    let file = File::new(c.x() as u32);
    let rank = Rank::new(7 - c.y() as u32);
    Square::from_coords(file, rank)
}

pub(super) fn from_square(sq: Square) -> Coordinate {
    let x = sq.file() as usize;
    let y = 7 - sq.rank() as usize;
    // Squares always map onto the board
    Coordinate::new(x, y).unwrap_or_else(|| unreachable!("square {sq} off the board"))
}

fn to_role(figure: Figure) -> Role {
    match figure {
        Figure::Pawn => Role::Pawn,
        Figure::Knight => Role::Knight,
        Figure::Bishop => Role::Bishop,
        Figure::Rook => Role::Rook,
        Figure::Queen => Role::Queen,
        Figure::King => Role::King,
    }
}

fn from_role(role: Role) -> Figure {
    match role {
        Role::Pawn => Figure::Pawn,
        Role::Knight => Figure::Knight,
        Role::Bishop => Figure::Bishop,
        Role::Rook => Figure::Rook,
        Role::Queen => Figure::Queen,
        Role::King => Figure::King,
    }
}

fn to_color(color: Color) -> SColor {
    match color {
        Color::White => SColor::White,
        Color::Black => SColor::Black,
    }
}

fn from_color(color: SColor) -> Color {
    match color {
        SColor::White => Color::White,
        SColor::Black => Color::Black,
    }
}

impl GameState {
    /// Shakmaty setup for this snapshot. Castling rights become the
    /// corresponding rook squares.
    pub(super) fn to_setup(&self) -> Setup {
        let mut board = SBoard::empty();
        for c in Coordinate::all() {
            if let Some(piece) = self.piece_at(c) {
                board.set_piece_at(
                    to_square(c),
                    SPiece {
                        color: to_color(piece.color),
                        role: to_role(piece.figure),
                    },
                );
            }
        }

        let mut setup = Setup::empty();
        setup.board = board;
        setup.turn = to_color(self.player);
        for (enabled, rook) in [
            (self.castling.white.king_side, Square::H1),
            (self.castling.white.queen_side, Square::A1),
            (self.castling.black.king_side, Square::H8),
            (self.castling.black.queen_side, Square::A8),
        ] {
            if enabled {
                setup.castling_rights.add(rook);
            }
        }
        setup.ep_square = self.en_passant_target.map(to_square);
        setup.halfmoves = self.halfmove_clock;
        // Zero is not a move number; the setup starts counting at 1
        setup.fullmoves = self.fullmove_number.try_into().unwrap_or(setup.fullmoves);
        setup
    }

    pub(super) fn from_setup(setup: &Setup) -> GameState {
        let mut board = empty_board();
        for c in Coordinate::all() {
            board[c.y()][c.x()] = setup.board.piece_at(to_square(c)).map(|p| Piece {
                color: from_color(p.color),
                figure: from_role(p.role),
            });
        }

        let rights = setup.castling_rights;
        let castling = CastlingRights {
            white: CastleSides {
                king_side: rights.contains(Square::H1),
                queen_side: rights.contains(Square::A1),
            },
            black: CastleSides {
                king_side: rights.contains(Square::H8),
                queen_side: rights.contains(Square::A8),
            },
        };

        GameState {
            player: from_color(setup.turn),
            board,
            castling,
            en_passant_target: setup.ep_square.map(from_square),
            fullmove_number: setup.fullmoves.get(),
            halfmove_clock: setup.halfmoves,
        }
    }

    /// Playable standard-chess position for this snapshot
    pub(super) fn to_position(&self) -> Result<Chess, FenError> {
        Chess::from_setup(self.to_setup(), CastlingMode::Standard)
            .map_err(|e| FenError::Position(e.to_string()))
    }

    pub fn to_fen(&self) -> String {
        Fen::try_from_setup(self.to_setup())
            .unwrap_or_else(LossyFenError::ignore)
            .to_string()
    }

    /// Parse a full six-field FEN. Besides syntax, the position itself must
    /// be playable, so an en passant square on the wrong rank is rejected.
    pub fn from_fen(fen: &str) -> Result<GameState, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::FieldCount(fields.len()));
        }

        let setup = Fen::from_ascii(fen.as_bytes())?.into_setup();

        // shakmaty folds repeated letters into the same rook square
        let castling = fields[2];
        if castling
            .char_indices()
            .any(|(i, c)| castling[..i].contains(c))
        {
            return Err(FenError::Castling(castling.to_string()));
        }
        // ... and clamps a zero move number to 1
        if fields[5].parse::<u32>() == Ok(0) {
            return Err(FenError::Fullmove);
        }

        Chess::from_setup(setup.clone(), CastlingMode::Standard)
            .map_err(|e| FenError::Position(e.to_string()))?;
        Ok(GameState::from_setup(&setup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_fen() {
        assert_eq!(GameState::initial().to_fen(), START_FEN);
    }

    #[test]
    fn test_parse_start_fen() {
        let parsed = GameState::from_fen(START_FEN).unwrap();
        assert_eq!(parsed, GameState::initial());
    }

    #[test]
    fn test_parse_midgame_fen() {
        let fen = "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w Kq c6 0 2";
        let state = GameState::from_fen(fen).unwrap();
        assert_eq!(state.player, Color::White);
        assert!(state.castling.white.king_side);
        assert!(!state.castling.white.queen_side);
        assert!(!state.castling.black.king_side);
        assert!(state.castling.black.queen_side);
        assert_eq!(state.en_passant_target, Coordinate::from_algebraic("c6"));
        assert_eq!(state.halfmove_clock, 0);
        assert_eq!(state.fullmove_number, 2);
        assert_eq!(
            state.piece_at(Coordinate::from_algebraic("c5").unwrap()),
            Some(Piece::black(Figure::Pawn))
        );
        assert_eq!(state.to_fen(), fen);
    }

    #[test]
    fn test_rejects_malformed_fen() {
        assert_eq!(
            GameState::from_fen("8/8/8 w - - 0 1"),
            Err(FenError::Parse(ParseFenError::InvalidBoard))
        );
        assert_eq!(
            GameState::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"),
            Err(FenError::FieldCount(4))
        );
        assert_eq!(
            GameState::from_fen("rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::Parse(ParseFenError::InvalidBoard))
        );
        assert_eq!(
            GameState::from_fen("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::Parse(ParseFenError::InvalidBoard))
        );
        assert_eq!(
            GameState::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"),
            Err(FenError::Parse(ParseFenError::InvalidTurn))
        );
    }

    #[test]
    fn test_rejects_zero_padded_row() {
        assert_eq!(
            GameState::from_fen("rnbqkbnr/pppppppp/08/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::Parse(ParseFenError::InvalidBoard))
        );
    }

    #[test]
    fn test_rejects_repeated_castling_rights() {
        assert_eq!(
            GameState::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KKQQ - 0 1"),
            Err(FenError::Castling("KKQQ".to_string()))
        );
    }

    #[test]
    fn test_rejects_zero_fullmove_number() {
        assert_eq!(
            GameState::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e4 0 0"),
            Err(FenError::Fullmove)
        );
    }

    #[test]
    fn test_rejects_en_passant_square_on_wrong_rank() {
        let result =
            GameState::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e4 0 1");
        assert!(matches!(result, Err(FenError::Position(_))));

        let after_push =
            GameState::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
                .unwrap();
        assert_eq!(after_push.en_passant_target, Coordinate::from_algebraic("e3"));
    }

    #[test]
    fn test_rejects_castling_without_rook() {
        let result = GameState::from_fen("rnbqkbn1/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(matches!(result, Err(FenError::Position(_))));
    }

    #[test]
    fn test_setup_round_trip_keeps_snapshot() {
        let state =
            GameState::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w Kq - 3 7").unwrap();
        assert_eq!(GameState::from_setup(&state.to_setup()), state);
        assert!(state.to_position().is_ok());
    }
}
