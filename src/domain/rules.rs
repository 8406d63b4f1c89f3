//! The rules engine boundary.
//!
//! The interaction layer only ever talks to chess rules through
//! [`RulesEngine`]. [`ShakmatyRules`] is the production implementation. It
//! builds shakmaty positions through the snapshot conversions in `fen`.

use shakmaty::{Chess, EnPassantMode, File, Move as SMove, Position, Role, Square};
use thiserror::Error;
use tracing::warn;

use super::chess::{Coordinate, GameState, Move, PromotedFigure};
use super::fen::{from_square, to_square};

/// Result of a successfully applied move
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub next_state: GameState,
    /// The side to move in `next_state` is in check
    pub check: bool,
    /// The side to move in `next_state` is checkmated
    pub mate: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The move is legal once a promotion figure is chosen
    #[error("move requires a promotion choice")]
    NeedsPromotion,
    #[error("{reason}")]
    Illegal { reason: String },
}

impl MoveError {
    fn illegal(reason: impl Into<String>) -> Self {
        MoveError::Illegal {
            reason: reason.into(),
        }
    }
}

/// Typed boundary to the chess rules.
///
/// Both queries are synchronous and side-effect free: they take a snapshot and
/// return a new value, never mutating the input.
pub trait RulesEngine {
    /// Fresh game in the starting position
    fn new_game(&self) -> GameState;

    /// Destinations the piece at `from` may move to. Empty if the cell is
    /// empty or the piece has nowhere to go.
    fn legal_moves(&self, state: &GameState, from: Coordinate) -> Vec<Coordinate>;

    fn apply_move(&self, state: &GameState, the_move: Move) -> Result<MoveOutcome, MoveError>;
}

/// Rules engine backed by `shakmaty`
#[derive(Clone, Copy, Debug, Default)]
pub struct ShakmatyRules;

impl ShakmatyRules {
    pub fn new() -> Self {
        Self
    }

    fn position(state: &GameState) -> Result<Chess, MoveError> {
        state
            .to_position()
            .map_err(|e| MoveError::illegal(format!("Impossible position: {e}")))
    }

    /// Candidate engine moves for a from/to pair as the user sees it
    fn candidates(position: &Chess, from: Square, to: Square) -> Vec<SMove> {
        position
            .legal_moves()
            .into_iter()
            .filter(|m| user_squares(m) == Some((from, to)))
            .collect()
    }
}

impl RulesEngine for ShakmatyRules {
    fn new_game(&self) -> GameState {
        snapshot(&Chess::default())
    }

    fn legal_moves(&self, state: &GameState, from: Coordinate) -> Vec<Coordinate> {
        let position = match Self::position(state) {
            Ok(position) => position,
            Err(error) => {
                warn!(%error, "cannot compute legal moves");
                return Vec::new();
            }
        };

        let from_sq = to_square(from);
        let mut destinations = Vec::new();
        for m in &position.legal_moves() {
            if let Some((move_from, move_to)) = user_squares(m) {
                let to = from_square(move_to);
                // Promotions yield one engine move per figure
                if move_from == from_sq && !destinations.contains(&to) {
                    destinations.push(to);
                }
            }
        }
        destinations
    }

    fn apply_move(&self, state: &GameState, the_move: Move) -> Result<MoveOutcome, MoveError> {
        let Some(piece) = state.piece_at(the_move.from) else {
            return Err(MoveError::illegal("No piece to move"));
        };
        if !piece.belongs_to(state.player) {
            return Err(MoveError::illegal("Piece belongs to the other player"));
        }

        let position = Self::position(state)?;
        let candidates = Self::candidates(&position, to_square(the_move.from), to_square(the_move.to));
        if candidates.is_empty() {
            return Err(MoveError::illegal(format!(
                "Illegal move {}{}",
                the_move.from, the_move.to
            )));
        }

        let promotes = candidates.iter().any(|m| m.promotion().is_some());
        let chosen = match (promotes, the_move.promotion) {
            (true, None) => return Err(MoveError::NeedsPromotion),
            (true, Some(figure)) => {
                let role = promoted_role(figure);
                candidates
                    .into_iter()
                    .find(|m| m.promotion() == Some(role))
                    .ok_or_else(|| MoveError::illegal(format!("Cannot promote to {}", figure.to_figure())))?
            }
            (false, Some(_)) => {
                return Err(MoveError::illegal(format!(
                    "{}{} is not a promotion",
                    the_move.from, the_move.to
                )));
            }
            (false, None) => candidates
                .into_iter()
                .next()
                .ok_or_else(|| MoveError::illegal("No candidate move"))?,
        };

        let next = position
            .play(chosen)
            .map_err(|e| MoveError::illegal(format!("Engine rejected move: {e}")))?;

        Ok(MoveOutcome {
            next_state: snapshot(&next),
            check: next.is_check(),
            mate: next.is_checkmate(),
        })
    }
}

/// The from/to squares a user would click for an engine move.
/// Castling is entered by moving the king two squares.
fn user_squares(m: &SMove) -> Option<(Square, Square)> {
    match m {
        SMove::Normal { from, to, .. } => Some((*from, *to)),
        SMove::EnPassant { from, to, .. } => Some((*from, *to)),
        SMove::Castle { king, rook } => {
            let king_dest = if rook.file() == File::H {
                Square::from_coords(File::G, rook.rank())
            } else {
                Square::from_coords(File::C, rook.rank())
            };
            Some((*king, king_dest))
        }
        SMove::Put { .. } => None,
    }
}

fn promoted_role(figure: PromotedFigure) -> Role {
    match figure {
        PromotedFigure::Queen => Role::Queen,
        PromotedFigure::Rook => Role::Rook,
        PromotedFigure::Bishop => Role::Bishop,
        PromotedFigure::Knight => Role::Knight,
    }
}

/// Convert a shakmaty position into a domain snapshot
fn snapshot(position: &Chess) -> GameState {
    GameState::from_setup(&position.to_setup(EnPassantMode::Legal))
}
