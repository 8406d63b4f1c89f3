//! Pure chess client logic. Nothing in here knows about gpui.

pub mod accessibility;
pub mod chess;
pub mod fen;
pub mod focus;
pub mod interaction;
pub mod protocol;
pub mod rules;
pub mod session;

pub use accessibility::cell_label;
pub use chess::{
    BOARD_SIZE, Board, CastleSides, CastlingRights, Cell, Color, Coordinate, Figure, GameState,
    Move, Piece, PromotedFigure,
};
pub use fen::{FenError, START_FEN};
pub use focus::{BoardKey, FocusNavigator, KeyOutcome};
pub use interaction::{
    Command, InteractionState, Phase, SelectionMachine, can_move_to, can_pick_up,
    command_for_click, has_picked_up, transition,
};
pub use protocol::{MatchId, MessageHandler, NewMatchResponse, ServerMessage};
pub use rules::{MoveError, MoveOutcome, RulesEngine, ShakmatyRules};
pub use session::{
    Connection, ConnectionState, LobbyStatus, MatchSession, MatchTransport, SessionError,
    TransportEvent,
};
