//! Game model - owns the interaction state machine for the local board.

use gpui::{Context, Pixels, Size, px};
use tracing::{info, warn};

use crate::domain::{
    Command, Coordinate, InteractionState, Phase, SelectionMachine, ShakmatyRules,
    command_for_click,
};
use crate::ui::BoardLayout;
use crate::ui::theme::INITIAL_LEFT_PANEL;

/// The main game model. Views observe it and re-render on every change.
pub struct GameModel {
    machine: SelectionMachine<ShakmatyRules>,
    /// Measured panel size from canvas
    pub panel_size: Size<Pixels>,
}

impl GameModel {
    pub fn new() -> Self {
        let mut machine = SelectionMachine::new(ShakmatyRules::new());
        machine.subscribe(|state| match &state.phase {
            Phase::GameOver { winner } => info!(%winner, "checkmate"),
            Phase::Errored { message } => warn!(%message, "move rejected"),
            _ => {}
        });
        Self {
            machine,
            panel_size: Size {
                width: px(INITIAL_LEFT_PANEL),
                height: px(600.0),
            },
        }
    }

    pub fn state(&self) -> &InteractionState {
        self.machine.state()
    }

    pub fn layout(&self) -> BoardLayout {
        BoardLayout::new(self.panel_size)
    }

    /// FEN of the position on the board
    pub fn fen(&self) -> String {
        self.state().game.to_fen()
    }

    pub fn dispatch(&mut self, command: Command, cx: &mut Context<Self>) {
        self.machine.dispatch(command);
        cx.notify();
    }

    /// A click or activation on `cell`. Does nothing if the cell means
    /// nothing in the current phase.
    pub fn click(&mut self, cell: Coordinate, cx: &mut Context<Self>) {
        if let Some(command) = command_for_click(self.state(), cell) {
            self.dispatch(command, cx);
        }
    }

    /// Throw the current game away and start from the initial position
    pub fn restart(&mut self, cx: &mut Context<Self>) {
        self.machine.restart();
        cx.notify();
    }
}

impl Default for GameModel {
    fn default() -> Self {
        Self::new()
    }
}
