//! Interaction state machine: piece pickup, move, promotion and game over.
//!
//! [`transition`] is a pure function from the current [`InteractionState`]
//! and a [`Command`] to the next state. It never interprets chess rules
//! itself; every verdict comes from the [`RulesEngine`] it is given.
//! [`SelectionMachine`] wraps it with the current state and a list of
//! subscribers so any UI layer can drive it.

use tracing::debug;

use super::chess::{
    Cell, CastlingRights, Color, Coordinate, GameState, Move, Piece, PromotedFigure, empty_board,
};
use super::rules::{MoveError, MoveOutcome, RulesEngine};

/// Step of the human move currently in progress
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No piece picked up
    SelectingFrom,
    /// A piece is picked up. `legal_moves` is the engine's answer at pickup time.
    SelectingTo {
        from: Coordinate,
        piece: Piece,
        legal_moves: Vec<Coordinate>,
    },
    /// A pawn move is waiting for the promotion figure
    Promoting { from: Coordinate, to: Coordinate },
    GameOver { winner: Color },
    /// Only a restart leaves this phase
    Errored { message: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InteractionState {
    pub game: GameState,
    /// Whether the side to move is in check, per the last engine verdict
    pub check: bool,
    pub phase: Phase,
}

impl InteractionState {
    /// A fresh interaction over `game` with nothing picked up
    pub fn new(game: GameState) -> Self {
        Self {
            game,
            check: false,
            phase: Phase::SelectingFrom,
        }
    }

    fn with_phase(self, phase: Phase) -> Self {
        Self { phase, ..self }
    }

    fn errored(self, message: impl Into<String>) -> Self {
        self.with_phase(Phase::Errored {
            message: message.into(),
        })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, Phase::GameOver { .. } | Phase::Errored { .. })
    }
}

impl Default for InteractionState {
    /// Empty board, nothing picked up
    fn default() -> Self {
        Self::new(GameState {
            player: Color::White,
            board: empty_board(),
            castling: CastlingRights::none(),
            en_passant_target: None,
            fullmove_number: 1,
            halfmove_clock: 0,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Begin(GameState),
    SelectFrom(Coordinate),
    SelectTo(Coordinate),
    AbortSelection,
    Promote(PromotedFigure),
}

/// Compute the next interaction state.
pub fn transition<E: RulesEngine + ?Sized>(
    engine: &E,
    state: InteractionState,
    command: Command,
) -> InteractionState {
    if let Command::Begin(game) = command {
        return InteractionState::new(game);
    }
    if state.is_terminal() {
        return state;
    }

    match (&state.phase, command) {
        (Phase::SelectingFrom, Command::SelectFrom(from)) => match state.game.piece_at(from) {
            None => state.errored("No piece to move"),
            Some(piece) if !piece.belongs_to(state.game.player) => {
                state.errored("Piece belongs to the other player")
            }
            Some(piece) => pick_up(engine, state, from, piece),
        },

        (Phase::SelectingTo { .. }, Command::SelectFrom(from)) => {
            match state.game.piece_at(from) {
                Some(piece) if piece.belongs_to(state.game.player) => {
                    pick_up(engine, state, from, piece)
                }
                _ => state,
            }
        }

        (Phase::SelectingTo { from, .. }, Command::SelectTo(to)) => {
            let the_move = Move::new(*from, to);
            let from = *from;
            match engine.apply_move(&state.game, the_move) {
                Ok(outcome) => after_move(state, outcome),
                Err(MoveError::NeedsPromotion) => state.with_phase(Phase::Promoting { from, to }),
                Err(error) => state.errored(error.to_string()),
            }
        }

        (Phase::SelectingTo { .. } | Phase::Promoting { .. }, Command::AbortSelection) => {
            state.with_phase(Phase::SelectingFrom)
        }

        (Phase::Promoting { from, to }, Command::Promote(figure)) => {
            let the_move = Move::promoting(*from, *to, figure);
            match engine.apply_move(&state.game, the_move) {
                Ok(outcome) => after_move(state, outcome),
                Err(error) => state.errored(error.to_string()),
            }
        }

        // Everything else is rejected without touching the state
        _ => state,
    }
}

fn pick_up<E: RulesEngine + ?Sized>(
    engine: &E,
    state: InteractionState,
    from: Coordinate,
    piece: Piece,
) -> InteractionState {
    let legal_moves = engine.legal_moves(&state.game, from);
    state.with_phase(Phase::SelectingTo {
        from,
        piece,
        legal_moves,
    })
}

fn after_move(state: InteractionState, outcome: MoveOutcome) -> InteractionState {
    let mover = state.game.player;
    let phase = if outcome.mate {
        Phase::GameOver { winner: mover }
    } else {
        Phase::SelectingFrom
    };
    InteractionState {
        game: outcome.next_state,
        check: outcome.check,
        phase,
    }
}

/// Whether a cell holds a piece the given player may pick up
pub fn can_pick_up(cell: Cell, player: Color) -> bool {
    cell.is_some_and(|piece| piece.belongs_to(player))
}

/// Whether `cell` is the origin of the piece currently picked up
pub fn has_picked_up(state: &InteractionState, cell: Coordinate) -> bool {
    matches!(state.phase, Phase::SelectingTo { from, .. } if from == cell)
}

/// Whether the piece currently picked up may move to `to`
pub fn can_move_to(state: &InteractionState, to: Coordinate) -> bool {
    match &state.phase {
        Phase::SelectingTo { legal_moves, .. } => legal_moves.contains(&to),
        _ => false,
    }
}

/// The command a click on `cell` stands for in the current state
pub fn command_for_click(state: &InteractionState, cell: Coordinate) -> Option<Command> {
    match &state.phase {
        Phase::SelectingFrom => can_pick_up(state.game.piece_at(cell), state.game.player)
            .then_some(Command::SelectFrom(cell)),
        Phase::SelectingTo { .. } => {
            if can_move_to(state, cell) {
                Some(Command::SelectTo(cell))
            } else if can_pick_up(state.game.piece_at(cell), state.game.player) {
                Some(Command::SelectFrom(cell))
            } else if state.game.piece_at(cell).is_none() {
                Some(Command::AbortSelection)
            } else {
                None
            }
        }
        _ => None,
    }
}

type Subscriber = Box<dyn FnMut(&InteractionState)>;

/// Holds the current interaction state and the engine that drives it.
pub struct SelectionMachine<E> {
    engine: E,
    state: InteractionState,
    subscribers: Vec<Subscriber>,
}

impl<E: RulesEngine> SelectionMachine<E> {
    /// Start a fresh game from the engine's initial position
    pub fn new(engine: E) -> Self {
        let state = InteractionState::new(engine.new_game());
        Self {
            engine,
            state,
            subscribers: Vec::new(),
        }
    }

    pub fn with_state(engine: E, state: InteractionState) -> Self {
        Self {
            engine,
            state,
            subscribers: Vec::new(),
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Call `subscriber` after every dispatched command
    pub fn subscribe(&mut self, subscriber: impl FnMut(&InteractionState) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Apply a command, notify subscribers and return the new state
    pub fn dispatch(&mut self, command: Command) -> &InteractionState {
        let previous = std::mem::take(&mut self.state);
        debug!(?command, phase = ?previous.phase, "dispatching command");
        self.state = transition(&self.engine, previous, command);
        debug!(phase = ?self.state.phase, check = self.state.check, "new interaction state");

        for subscriber in &mut self.subscribers {
            subscriber(&self.state);
        }
        &self.state
    }

    /// Start over with a new game from the engine
    pub fn restart(&mut self) -> &InteractionState {
        let game = self.engine.new_game();
        self.dispatch(Command::Begin(game))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::domain::chess::Figure;
    use crate::domain::rules::ShakmatyRules;

    fn at(name: &str) -> Coordinate {
        Coordinate::from_algebraic(name).unwrap()
    }

    fn initial() -> InteractionState {
        InteractionState::new(GameState::initial())
    }

    fn run(state: InteractionState, commands: impl IntoIterator<Item = Command>) -> InteractionState {
        commands
            .into_iter()
            .fold(state, |state, command| transition(&ShakmatyRules, state, command))
    }

    /// Engine that refuses everything, for checking that terminal states never call it
    struct PanickingEngine;

    impl RulesEngine for PanickingEngine {
        fn new_game(&self) -> GameState {
            GameState::initial()
        }
        fn legal_moves(&self, _: &GameState, _: Coordinate) -> Vec<Coordinate> {
            panic!("engine must not be queried")
        }
        fn apply_move(&self, _: &GameState, _: Move) -> Result<MoveOutcome, MoveError> {
            panic!("engine must not be queried")
        }
    }

    #[test]
    fn test_select_empty_cell_errors_for_every_empty_cell() {
        let game = GameState::initial();
        for c in Coordinate::all().filter(|c| game.piece_at(*c).is_none()) {
            let next = transition(&ShakmatyRules, initial(), Command::SelectFrom(c));
            assert_eq!(
                next.phase,
                Phase::Errored {
                    message: "No piece to move".to_string()
                }
            );
        }
    }

    #[test]
    fn test_initial_pawn_pickup() {
        let next = transition(
            &ShakmatyRules,
            initial(),
            Command::SelectFrom(Coordinate::new(4, 6).unwrap()),
        );
        let Phase::SelectingTo {
            from,
            piece,
            mut legal_moves,
        } = next.phase
        else {
            panic!("expected SelectingTo, got {:?}", next.phase);
        };
        assert_eq!(from, Coordinate::new(4, 6).unwrap());
        assert_eq!(piece, Piece::white(Figure::Pawn));
        legal_moves.sort_by_key(|c| c.y());
        assert_eq!(
            legal_moves,
            vec![Coordinate::new(4, 4).unwrap(), Coordinate::new(4, 5).unwrap()]
        );
    }

    #[test]
    fn test_picking_up_opponent_piece_is_rejected() {
        let next = transition(&ShakmatyRules, initial(), Command::SelectFrom(at("e7")));
        assert!(matches!(next.phase, Phase::Errored { .. }));
    }

    #[test]
    fn test_abort_keeps_game_state() {
        let picked = transition(&ShakmatyRules, initial(), Command::SelectFrom(at("g1")));
        let game_before = picked.game.clone();
        let aborted = transition(&ShakmatyRules, picked, Command::AbortSelection);
        assert_eq!(aborted.phase, Phase::SelectingFrom);
        assert_eq!(aborted.game, game_before);
    }

    #[test]
    fn test_abort_then_reselect_gives_same_moves() {
        let first = transition(&ShakmatyRules, initial(), Command::SelectFrom(at("b1")));
        let again = run(
            first.clone(),
            [Command::AbortSelection, Command::SelectFrom(at("b1"))],
        );
        assert_eq!(first.phase, again.phase);
    }

    #[test]
    fn test_repick_switches_selection() {
        let next = run(
            initial(),
            [Command::SelectFrom(at("e2")), Command::SelectFrom(at("g1"))],
        );
        let Phase::SelectingTo {
            from, legal_moves, ..
        } = next.phase
        else {
            panic!("expected SelectingTo");
        };
        assert_eq!(from, at("g1"));
        assert!(legal_moves.contains(&at("f3")));
    }

    #[test]
    fn test_select_from_empty_while_selecting_to_is_ignored() {
        let picked = transition(&ShakmatyRules, initial(), Command::SelectFrom(at("e2")));
        let next = transition(&ShakmatyRules, picked.clone(), Command::SelectFrom(at("e5")));
        assert_eq!(next, picked);
    }

    #[test]
    fn test_move_hands_turn_over() {
        let next = run(
            initial(),
            [Command::SelectFrom(at("e2")), Command::SelectTo(at("e4"))],
        );
        assert_eq!(next.phase, Phase::SelectingFrom);
        assert_eq!(next.game.player, Color::Black);
        assert_eq!(next.game.piece_at(at("e4")), Some(Piece::white(Figure::Pawn)));
    }

    #[test]
    fn test_illegal_destination_errors() {
        let picked = transition(&ShakmatyRules, initial(), Command::SelectFrom(at("e2")));
        let Phase::SelectingTo { legal_moves, .. } = &picked.phase else {
            panic!("expected SelectingTo");
        };
        for to in Coordinate::all().filter(|c| !legal_moves.contains(c)) {
            let next = transition(&ShakmatyRules, picked.clone(), Command::SelectTo(to));
            assert!(
                matches!(next.phase, Phase::Errored { .. }),
                "{to} should be rejected"
            );
            assert_eq!(next.game, picked.game);
        }
    }

    #[test]
    fn test_promotion_flow() {
        let game = GameState::from_fen("7k/P7/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let promoting = run(
            InteractionState::new(game),
            [Command::SelectFrom(at("a7")), Command::SelectTo(at("a8"))],
        );
        assert_eq!(
            promoting.phase,
            Phase::Promoting {
                from: at("a7"),
                to: at("a8")
            }
        );

        let done = transition(
            &ShakmatyRules,
            promoting,
            Command::Promote(PromotedFigure::Queen),
        );
        assert_eq!(done.phase, Phase::SelectingFrom);
        assert_eq!(done.game.piece_at(at("a8")), Some(Piece::white(Figure::Queen)));
        assert!(done.check);
    }

    #[test]
    fn test_abort_cancels_promotion() {
        let game = GameState::from_fen("7k/P7/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let next = run(
            InteractionState::new(game.clone()),
            [
                Command::SelectFrom(at("a7")),
                Command::SelectTo(at("a8")),
                Command::AbortSelection,
            ],
        );
        assert_eq!(next.phase, Phase::SelectingFrom);
        assert_eq!(next.game, game);
    }

    #[test]
    fn test_select_from_while_promoting_is_ignored() {
        let game = GameState::from_fen("7k/P7/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let promoting = run(
            InteractionState::new(game),
            [Command::SelectFrom(at("a7")), Command::SelectTo(at("a8"))],
        );
        let next = transition(&ShakmatyRules, promoting.clone(), Command::SelectFrom(at("a1")));
        assert_eq!(next, promoting);
    }

    fn fools_mate() -> InteractionState {
        run(
            initial(),
            [
                Command::SelectFrom(at("f2")),
                Command::SelectTo(at("f3")),
                Command::SelectFrom(at("e7")),
                Command::SelectTo(at("e5")),
                Command::SelectFrom(at("g2")),
                Command::SelectTo(at("g4")),
                Command::SelectFrom(at("d8")),
                Command::SelectTo(at("h4")),
            ],
        )
    }

    #[test]
    fn test_mate_ends_game() {
        let over = fools_mate();
        assert_eq!(
            over.phase,
            Phase::GameOver {
                winner: Color::Black
            }
        );
        assert!(over.check);
    }

    #[test]
    fn test_game_over_only_accepts_begin() {
        let over = fools_mate();
        for command in [
            Command::SelectFrom(at("a2")),
            Command::SelectTo(at("a3")),
            Command::AbortSelection,
            Command::Promote(PromotedFigure::Queen),
        ] {
            assert_eq!(transition(&PanickingEngine, over.clone(), command), over);
        }
    }

    #[test]
    fn test_errored_only_accepts_begin() {
        let errored = transition(&ShakmatyRules, initial(), Command::SelectFrom(at("e4")));
        for command in [
            Command::SelectFrom(at("e2")),
            Command::SelectTo(at("e4")),
            Command::AbortSelection,
        ] {
            assert_eq!(transition(&PanickingEngine, errored.clone(), command), errored);
        }
    }

    #[test]
    fn test_begin_recovers_from_any_state() {
        let fresh = GameState::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 3 40").unwrap();
        let errored = transition(&ShakmatyRules, initial(), Command::SelectFrom(at("e4")));
        let picked = transition(&ShakmatyRules, initial(), Command::SelectFrom(at("e2")));
        for state in [initial(), picked, errored, fools_mate()] {
            let next = transition(&PanickingEngine, state, Command::Begin(fresh.clone()));
            assert_eq!(next, InteractionState::new(fresh.clone()));
        }
    }

    #[test]
    fn test_click_commands() {
        let state = initial();
        assert_eq!(
            command_for_click(&state, at("e2")),
            Some(Command::SelectFrom(at("e2")))
        );
        assert_eq!(command_for_click(&state, at("e7")), None);

        let picked = transition(&ShakmatyRules, state, Command::SelectFrom(at("e2")));
        assert!(has_picked_up(&picked, at("e2")));
        assert!(can_move_to(&picked, at("e4")));
        assert_eq!(
            command_for_click(&picked, at("e4")),
            Some(Command::SelectTo(at("e4")))
        );
        assert_eq!(
            command_for_click(&picked, at("d2")),
            Some(Command::SelectFrom(at("d2")))
        );
        assert_eq!(
            command_for_click(&picked, at("a5")),
            Some(Command::AbortSelection)
        );
        assert_eq!(command_for_click(&picked, at("e7")), None);
    }

    #[test]
    fn test_machine_notifies_subscribers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut machine = SelectionMachine::new(ShakmatyRules);
        let sink = Rc::clone(&seen);
        machine.subscribe(move |state| sink.borrow_mut().push(state.phase.clone()));

        machine.dispatch(Command::SelectFrom(at("e2")));
        machine.dispatch(Command::AbortSelection);
        machine.restart();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert!(matches!(seen[0], Phase::SelectingTo { .. }));
        assert_eq!(seen[1], Phase::SelectingFrom);
        assert_eq!(machine.state(), &InteractionState::new(GameState::initial()));
    }

    #[test]
    fn test_default_state_is_an_empty_board() {
        let state = InteractionState::default();
        assert_eq!(state.phase, Phase::SelectingFrom);
        assert!(Coordinate::all().all(|c| state.game.piece_at(c).is_none()));
    }

    #[test]
    fn test_dispatch_hands_the_live_state_to_the_engine() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let game = GameState::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        let mut machine =
            SelectionMachine::with_state(ShakmatyRules, InteractionState::new(game.clone()));
        let sink = Rc::clone(&seen);
        machine.subscribe(move |state| sink.borrow_mut().push(state.clone()));

        machine.dispatch(Command::SelectFrom(at("e2")));
        let state = machine.dispatch(Command::SelectTo(at("e4"))).clone();

        assert_eq!(state.phase, Phase::SelectingFrom);
        assert_eq!(state.game.piece_at(at("e4")), Some(Piece::white(Figure::Pawn)));
        assert_eq!(state.game.piece_at(at("e2")), None);
        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].game, game);
        assert_eq!(seen[1], state);
    }
}
