//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no behaviour beyond parsing and small helpers, making them
//! usable in any context (core rules, cascade orchestration, event consumers, the replay runner).
//!
//! # Coordinates
//!
//! Cells are addressed as `(row, col)` with row 0 at the top and col 0 at the left.
//! `Pos` uses signed components so that requests from the outside world (which may be
//! off-grid) can be represented and rejected rather than wrapped.
//!
//! # Rule Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_RUN` | 3 | Shortest run that clears |
//! | `ROCKET_RUN` | 4 | Run length that spawns a line rocket |
//! | `DISCO_RUN` | 5 | Run length that spawns a disco |
//! | `SCORE_PER_TILE` | 20 | Score awarded per destroyed tile |
//! | `BOMB_AREA_MIN`/`BOMB_AREA_MAX` | -1 / +2 | Bomb footprint offsets (4x4 block) |
//!
//! # Examples
//!
//! ```
//! use tile_cascade_types::{Pos, SpecialType, Outcome};
//!
//! let a = Pos::new(2, 3);
//! assert!(a.is_adjacent(Pos::new(2, 4)));
//! assert!(!a.is_adjacent(Pos::new(3, 4)));
//!
//! assert_eq!(SpecialType::from_str("rocketH"), Some(SpecialType::RocketHorizontal));
//! assert_eq!(Outcome::Win.as_str(), "win");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default board height
pub const DEFAULT_ROWS: usize = 8;

/// Default board width
pub const DEFAULT_COLS: usize = 8;

/// Default number of tile colors
pub const DEFAULT_COLOR_COUNT: u8 = 5;

/// Fewest colors a level may use
pub const MIN_COLOR_COUNT: u8 = 3;

/// Most colors a level may use
pub const MAX_COLOR_COUNT: u8 = 8;

/// Default move budget per level
pub const DEFAULT_MOVE_LIMIT: i32 = 25;

/// Score per destroyed tile
pub const SCORE_PER_TILE: u32 = 20;

/// Default boss damage per destroyed tile
pub const DEFAULT_DAMAGE_PER_TILE: u32 = 1;

/// Shortest same-color run that clears
pub const MIN_RUN: usize = 3;

/// Run length that registers a line rocket candidate
pub const ROCKET_RUN: usize = 4;

/// Run length that registers a disco candidate (takes precedence over rockets)
pub const DISCO_RUN: usize = 5;

/// Bomb footprint, row/col offsets relative to the bomb cell (inclusive)
pub const BOMB_AREA_MIN: i32 = -1;
pub const BOMB_AREA_MAX: i32 = 2;

/// Default random special spawn chances (per generated tile)
pub const DEFAULT_BOMB_CHANCE: f32 = 0.015;
pub const DEFAULT_ROCKET_CHANCE: f32 = 0.02;
pub const DEFAULT_DISCO_CHANCE: f32 = 0.01;

/// A grid coordinate
///
/// Signed so that out-of-grid requests stay representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub row: i32,
    pub col: i32,
}

impl Pos {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two cells
    pub fn manhattan(self, other: Pos) -> u32 {
        self.row
            .abs_diff(other.row)
            .saturating_add(self.col.abs_diff(other.col))
    }

    /// True when the cells share an edge (Manhattan distance 1)
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.manhattan(other) == 1
    }

    pub fn offset(self, d_row: i32, d_col: i32) -> Pos {
        Pos::new(self.row.saturating_add(d_row), self.col.saturating_add(d_col))
    }
}

impl From<(i32, i32)> for Pos {
    fn from((row, col): (i32, i32)) -> Self {
        Pos::new(row, col)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Special tile kinds
///
/// - **Bomb**: clears the 4x4 block spanning rows/cols -1..+2 around it
/// - **Disco**: clears its full row and column
/// - **RocketHorizontal**: clears its full row
/// - **RocketVertical**: clears its full column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpecialType {
    #[default]
    None,
    Bomb,
    Disco,
    RocketHorizontal,
    RocketVertical,
}

impl SpecialType {
    pub const ALL: [SpecialType; 5] = [
        SpecialType::None,
        SpecialType::Bomb,
        SpecialType::Disco,
        SpecialType::RocketHorizontal,
        SpecialType::RocketVertical,
    ];

    pub fn is_special(&self) -> bool {
        !matches!(self, SpecialType::None)
    }

    pub fn is_rocket(&self) -> bool {
        matches!(
            self,
            SpecialType::RocketHorizontal | SpecialType::RocketVertical
        )
    }

    /// Parse special type from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_cascade_types::SpecialType;
    ///
    /// assert_eq!(SpecialType::from_str("bomb"), Some(SpecialType::Bomb));
    /// assert_eq!(SpecialType::from_str("RocketV"), Some(SpecialType::RocketVertical));
    /// assert_eq!(SpecialType::from_str("star"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(SpecialType::None),
            "bomb" => Some(SpecialType::Bomb),
            "disco" => Some(SpecialType::Disco),
            "rocketh" | "rockethorizontal" => Some(SpecialType::RocketHorizontal),
            "rocketv" | "rocketvertical" => Some(SpecialType::RocketVertical),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialType::None => "none",
            SpecialType::Bomb => "bomb",
            SpecialType::Disco => "disco",
            SpecialType::RocketHorizontal => "rocketHorizontal",
            SpecialType::RocketVertical => "rocketVertical",
        }
    }
}

/// A tile record
///
/// `row`/`col` always mirror the cell the tile currently occupies; the board stamps them
/// whenever a tile is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub row: i32,
    pub col: i32,
    pub color_id: u8,
    pub special_type: SpecialType,
}

impl Tile {
    /// Plain tile of the given color (position is stamped on placement)
    pub fn new(color_id: u8) -> Self {
        Self {
            row: 0,
            col: 0,
            color_id,
            special_type: SpecialType::None,
        }
    }

    pub fn with_special(color_id: u8, special_type: SpecialType) -> Self {
        Self {
            special_type,
            ..Self::new(color_id)
        }
    }

    pub fn pos(&self) -> Pos {
        Pos::new(self.row, self.col)
    }

    pub fn is_special(&self) -> bool {
        self.special_type.is_special()
    }
}

/// A cell on the board
///
/// - `None`: Empty cell
/// - `Some(Tile)`: Cell holding a tile
pub type Cell = Option<Tile>;

/// Player swap request between two cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapRequest {
    pub a: Pos,
    pub b: Pos,
}

impl SwapRequest {
    pub fn new(a: impl Into<Pos>, b: impl Into<Pos>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }
}

/// Why a swap request was rejected
///
/// `NoMatch` is the revert case (the swap was legal but produced nothing); animation
/// consumers use it to play a shake cue. Every other reason leaves the board untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InvalidReason {
    #[error("a resolution cycle is still in flight")]
    Busy,
    #[error("the level has already ended")]
    LevelEnded,
    #[error("no moves left")]
    NoMovesLeft,
    #[error("cell {cell} is outside the grid")]
    OutOfBounds { cell: Pos },
    #[error("cell {cell} is not playable")]
    NotPlayable { cell: Pos },
    #[error("cells are not neighbours")]
    NotAdjacent,
    #[error("swap produced no match")]
    NoMatch,
}

impl InvalidReason {
    pub fn code(self) -> &'static str {
        match self {
            InvalidReason::Busy => "busy",
            InvalidReason::LevelEnded => "level_ended",
            InvalidReason::NoMovesLeft => "no_moves_left",
            InvalidReason::OutOfBounds { .. }
            | InvalidReason::NotPlayable { .. }
            | InvalidReason::NotAdjacent => "invalid_move",
            InvalidReason::NoMatch => "no_match",
        }
    }

    /// True for the legal-but-fruitless swap that was reverted
    pub fn is_revert(self) -> bool {
        matches!(self, InvalidReason::NoMatch)
    }
}

/// Terminal outcome of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Win,
    Lose,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Lose => "lose",
        }
    }
}

/// Events published by the engine to external collaborators
///
/// Scoring, audio, animation and boss systems consume these; the engine never calls
/// into them any other way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    /// Tiles destroyed by one clear step (`count == cells.len()`)
    TilesCleared { count: u32, cells: Vec<Pos> },
    /// Score delta for a clear step and the running total
    ScoreAwarded { delta: u32, total: u32 },
    /// A special tile was created at `cell`, by a match anchor or by refill
    #[serde(rename_all = "camelCase")]
    SpecialSpawned { cell: Pos, special_type: SpecialType },
    #[serde(rename_all = "camelCase")]
    MovesChanged { moves_left: i32 },
    /// A fresh grid and session are in place (level start, restart, level switch)
    #[serde(rename_all = "camelCase")]
    LevelStarted { episode_id: u32 },
    InvalidMove { a: Pos, b: Pos, reason: InvalidReason },
    Terminal { outcome: Outcome },
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::TilesCleared { .. } => "tilesCleared",
            GameEvent::ScoreAwarded { .. } => "scoreAwarded",
            GameEvent::SpecialSpawned { .. } => "specialSpawned",
            GameEvent::MovesChanged { .. } => "movesChanged",
            GameEvent::LevelStarted { .. } => "levelStarted",
            GameEvent::InvalidMove { .. } => "invalidMove",
            GameEvent::Terminal { .. } => "terminal",
        }
    }
}
