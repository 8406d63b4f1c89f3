//! Pure chess domain types and utilities.
//! No GPUI or engine dependencies - this is the domain layer.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: usize = 8;

/// A board cell, zero-indexed. `x` is the file (column), `y` the row, and
/// row 0 is Black's back rank.
///
/// Coordinates can only be built through [`Coordinate::new`], so every value
/// is within the board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct Coordinate {
    x: u8,
    y: u8,
}

#[derive(Serialize, Deserialize)]
struct RawCoordinate {
    x: usize,
    y: usize,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = String;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.x, raw.y)
            .ok_or_else(|| format!("coordinate ({}, {}) is off the board", raw.x, raw.y))
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(c: Coordinate) -> Self {
        Self { x: c.x(), y: c.y() }
    }
}

impl Coordinate {
    pub fn new(x: usize, y: usize) -> Option<Self> {
        (x < BOARD_SIZE && y < BOARD_SIZE).then_some(Self {
            x: x as u8,
            y: y as u8,
        })
    }

    pub fn x(&self) -> usize {
        self.x as usize
    }

    pub fn y(&self) -> usize {
        self.y as usize
    }

    /// The neighbouring coordinate `(x + dx, y + dy)`, if it is on the board
    pub fn offset(&self, dx: isize, dy: isize) -> Option<Self> {
        let x = self.x().checked_add_signed(dx)?;
        let y = self.y().checked_add_signed(dy)?;
        Self::new(x, y)
    }

    /// All 64 coordinates in row-major order
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (0..BOARD_SIZE).flat_map(|y| (0..BOARD_SIZE).filter_map(move |x| Coordinate::new(x, y)))
    }

    /// Algebraic name of the square, e.g. `e2` for (4, 6)
    pub fn algebraic(&self) -> String {
        let file = (b'a' + self.x) as char;
        let rank = BOARD_SIZE - self.y();
        format!("{file}{rank}")
    }

    /// Parse an algebraic square name such as `e2`
    pub fn from_algebraic(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let file = chars.next()?;
        let rank = chars.next()?.to_digit(10)? as usize;
        if chars.next().is_some() || !('a'..='h').contains(&file) || !(1..=8).contains(&rank) {
            return None;
        }
        Self::new(file as usize - 'a' as usize, BOARD_SIZE - rank)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.algebraic())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Figure {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The figures a pawn may be promoted to. Pawn and King are not representable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PromotedFigure {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl PromotedFigure {
    /// Order in which the promotion dialog offers the choices
    pub const CHOICES: [PromotedFigure; 4] = [
        PromotedFigure::Rook,
        PromotedFigure::Knight,
        PromotedFigure::Bishop,
        PromotedFigure::Queen,
    ];

    pub fn to_figure(self) -> Figure {
        match self {
            PromotedFigure::Queen => Figure::Queen,
            PromotedFigure::Rook => Figure::Rook,
            PromotedFigure::Bishop => Figure::Bishop,
            PromotedFigure::Knight => Figure::Knight,
        }
    }
}

impl TryFrom<Figure> for PromotedFigure {
    type Error = Figure;

    fn try_from(figure: Figure) -> Result<Self, Self::Error> {
        match figure {
            Figure::Queen => Ok(PromotedFigure::Queen),
            Figure::Rook => Ok(PromotedFigure::Rook),
            Figure::Bishop => Ok(PromotedFigure::Bishop),
            Figure::Knight => Ok(PromotedFigure::Knight),
            Figure::King | Figure::Pawn => Err(figure),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub figure: Figure,
}

impl Piece {
    pub const fn new(color: Color, figure: Figure) -> Self {
        Self { color, figure }
    }

    pub const fn white(figure: Figure) -> Self {
        Self::new(Color::White, figure)
    }

    pub const fn black(figure: Figure) -> Self {
        Self::new(Color::Black, figure)
    }

    pub fn belongs_to(&self, player: Color) -> bool {
        self.color == player
    }
}

pub type Cell = Option<Piece>;
pub type Row = [Cell; BOARD_SIZE];
pub type Board = [Row; BOARD_SIZE];

pub const fn empty_board() -> Board {
    [[None; BOARD_SIZE]; BOARD_SIZE]
}

/// Which castling moves are still available to one side
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CastleSides {
    pub king_side: bool,
    pub queen_side: bool,
}

impl CastleSides {
    pub const fn both() -> Self {
        Self {
            king_side: true,
            queen_side: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            king_side: false,
            queen_side: false,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white: CastleSides,
    pub black: CastleSides,
}

impl CastlingRights {
    pub const fn all() -> Self {
        Self {
            white: CastleSides::both(),
            black: CastleSides::both(),
        }
    }

    pub const fn none() -> Self {
        Self {
            white: CastleSides::none(),
            black: CastleSides::none(),
        }
    }
}

/// Snapshot of a game as produced by the rules engine.
///
/// The UI only ever reads these; a new snapshot replaces the old one after
/// every move.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GameState {
    pub player: Color,
    pub board: Board,
    pub castling: CastlingRights,
    pub en_passant_target: Option<Coordinate>,
    pub fullmove_number: u32,
    pub halfmove_clock: u32,
}

impl GameState {
    /// The standard starting position, White to move
    pub fn initial() -> Self {
        use Figure::*;
        const BACK_RANK: [Figure; BOARD_SIZE] =
            [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        let mut board = empty_board();
        for (x, figure) in BACK_RANK.into_iter().enumerate() {
            board[0][x] = Some(Piece::black(figure));
            board[1][x] = Some(Piece::black(Pawn));
            board[6][x] = Some(Piece::white(Pawn));
            board[7][x] = Some(Piece::white(figure));
        }

        Self {
            player: Color::White,
            board,
            castling: CastlingRights::all(),
            en_passant_target: None,
            fullmove_number: 1,
            halfmove_clock: 0,
        }
    }

    pub fn piece_at(&self, at: Coordinate) -> Cell {
        self.board[at.y()][at.x()]
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Move {
    pub from: Coordinate,
    pub to: Coordinate,
    pub promotion: Option<PromotedFigure>,
}

impl Move {
    pub fn new(from: Coordinate, to: Coordinate) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn promoting(from: Coordinate, to: Coordinate, figure: PromotedFigure) -> Self {
        Self {
            from,
            to,
            promotion: Some(figure),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(figure) = self.promotion {
            write!(f, "={}", figure.to_figure())?;
        }
        Ok(())
    }
}
