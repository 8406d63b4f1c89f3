//! Keyboard navigation across board cells.
//!
//! The navigator keeps a sparse registry from coordinates to opaque focus
//! handles. Cells register themselves when they are rendered and unregister
//! when they go away. Which cell is active is always derived from the handle
//! that currently has focus, never from the interaction state.

use std::collections::HashMap;

use super::chess::Coordinate;
use super::interaction::Command;

/// Keys the board reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardKey {
    Up,
    Down,
    Left,
    Right,
    Escape,
}

impl BoardKey {
    /// Map a key name (gpui keystroke or DOM style) to a board key
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "up" | "ArrowUp" => Some(BoardKey::Up),
            "down" | "ArrowDown" => Some(BoardKey::Down),
            "left" | "ArrowLeft" => Some(BoardKey::Left),
            "right" | "ArrowRight" => Some(BoardKey::Right),
            "escape" | "Escape" => Some(BoardKey::Escape),
            _ => None,
        }
    }

    /// Direction on the board, row 0 being at the top
    pub fn vector(self) -> Option<(isize, isize)> {
        match self {
            BoardKey::Up => Some((0, -1)),
            BoardKey::Down => Some((0, 1)),
            BoardKey::Left => Some((-1, 0)),
            BoardKey::Right => Some((1, 0)),
            BoardKey::Escape => None,
        }
    }
}

/// What the caller should do in response to a key press
#[derive(Debug, PartialEq, Eq)]
pub enum KeyOutcome<'a, H> {
    /// Move focus to this handle
    Focus(Coordinate, &'a H),
    Dispatch(Command),
    Ignored,
}

#[derive(Debug)]
pub struct FocusNavigator<H> {
    cells: HashMap<Coordinate, H>,
    /// Where arrow keys land while no cell has focus
    home: Option<Coordinate>,
}

impl<H> FocusNavigator<H> {
    pub fn new() -> Self {
        Self {
            cells: HashMap::new(),
            home: None,
        }
    }

    pub fn set_home(&mut self, at: Coordinate) {
        self.home = Some(at);
    }

    pub fn home(&self) -> Option<Coordinate> {
        self.home
    }

    /// Record the focus handle of a mounted cell
    pub fn register(&mut self, at: Coordinate, handle: H) {
        self.cells.insert(at, handle);
    }

    /// Forget the handle of an unmounted cell
    pub fn unregister(&mut self, at: Coordinate) -> Option<H> {
        self.cells.remove(&at)
    }

    pub fn get(&self, at: Coordinate) -> Option<&H> {
        self.cells.get(&at)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Coordinate of the registered cell for which `is_focused` holds
    pub fn focused_coordinate(&self, is_focused: impl Fn(&H) -> bool) -> Option<Coordinate> {
        self.cells
            .iter()
            .find(|(_, handle)| is_focused(handle))
            .map(|(at, _)| *at)
    }

    /// Resolve a key press. `focused` is the active cell, if any.
    ///
    /// Arrow keys target the neighbouring registered cell; there is no
    /// wraparound and a missing neighbour is ignored. With nothing focused
    /// they go to the home cell. Escape always aborts the current selection.
    pub fn handle_key(&self, key: BoardKey, focused: Option<Coordinate>) -> KeyOutcome<'_, H> {
        let Some((dx, dy)) = key.vector() else {
            return KeyOutcome::Dispatch(Command::AbortSelection);
        };
        let target = match focused {
            Some(at) => at.offset(dx, dy),
            None => self.home,
        };
        target
            .and_then(|target| self.cells.get(&target).map(|handle| (target, handle)))
            .map_or(KeyOutcome::Ignored, |(target, handle)| {
                KeyOutcome::Focus(target, handle)
            })
    }
}

impl<H> Default for FocusNavigator<H> {
    fn default() -> Self {
        Self::new()
    }
}
