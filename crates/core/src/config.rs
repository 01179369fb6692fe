//! Level configuration
//!
//! Levels are supplied from outside (JSON in the replay runner) and are immutable for the
//! lifetime of a level. Malformed values are normalized permissively rather than rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Board, PlayableMask};
use crate::types::{
    DEFAULT_BOMB_CHANCE, DEFAULT_COLOR_COUNT, DEFAULT_COLS, DEFAULT_DAMAGE_PER_TILE,
    DEFAULT_DISCO_CHANCE, DEFAULT_MOVE_LIMIT, DEFAULT_ROCKET_CHANCE, DEFAULT_ROWS,
    MAX_COLOR_COUNT, MIN_COLOR_COUNT,
};

/// Fatal level-start errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no tile source configured")]
    MissingTileSource,
    #[error("board is {rows}x{cols} but the level expects {expected_rows}x{expected_cols}")]
    BoardShapeMismatch {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },
    #[error("level queue is empty")]
    EmptyLevelQueue,
}

/// Per-tile random special spawn probabilities
///
/// Tried in the fixed order bomb, rocket, disco against one uniform draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnChances {
    pub bomb: f32,
    pub rocket: f32,
    pub disco: f32,
}

impl SpawnChances {
    pub const NONE: SpawnChances = SpawnChances {
        bomb: 0.0,
        rocket: 0.0,
        disco: 0.0,
    };

    /// Each chance clamped to `[0, 1]`; NaN becomes 0
    pub fn clamped(self) -> Self {
        fn clamp01(v: f32) -> f32 {
            if v.is_nan() {
                0.0
            } else {
                v.clamp(0.0, 1.0)
            }
        }
        Self {
            bomb: clamp01(self.bomb),
            rocket: clamp01(self.rocket),
            disco: clamp01(self.disco),
        }
    }
}

impl Default for SpawnChances {
    fn default() -> Self {
        Self {
            bomb: DEFAULT_BOMB_CHANCE,
            rocket: DEFAULT_ROCKET_CHANCE,
            disco: DEFAULT_DISCO_CHANCE,
        }
    }
}

/// Externally supplied level description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelConfig {
    pub rows: usize,
    pub cols: usize,
    pub color_count: u8,
    pub move_limit: i32,
    /// Non-boss win variant: reaching this score wins the level
    pub target_score: Option<u32>,
    /// Row strings; `'0'`, `'x'`, `'X'`, `'.'` close a cell. Empty means all open.
    pub playable_mask: Vec<String>,
    pub spawn_chances: SpawnChances,
    pub allow_special_on_initial_fill: bool,
    pub allow_special_on_refill: bool,
    /// Boss damage per destroyed tile (consumed by the boss collaborator)
    pub damage_per_tile: u32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            color_count: DEFAULT_COLOR_COUNT,
            move_limit: DEFAULT_MOVE_LIMIT,
            target_score: None,
            playable_mask: Vec::new(),
            spawn_chances: SpawnChances::default(),
            allow_special_on_initial_fill: true,
            allow_special_on_refill: true,
            damage_per_tile: DEFAULT_DAMAGE_PER_TILE,
        }
    }
}

impl LevelConfig {
    /// Rectangular level with no random specials
    pub fn plain(rows: usize, cols: usize, color_count: u8, move_limit: i32) -> Self {
        Self {
            rows,
            cols,
            color_count,
            move_limit,
            spawn_chances: SpawnChances::NONE,
            allow_special_on_initial_fill: false,
            allow_special_on_refill: false,
            ..Self::default()
        }
    }

    /// Copy with every value clamped into its legal range
    pub fn normalized(&self) -> Self {
        Self {
            rows: self.rows.max(1),
            cols: self.cols.max(1),
            color_count: self.color_count.clamp(MIN_COLOR_COUNT, MAX_COLOR_COUNT),
            move_limit: self.move_limit.max(1),
            spawn_chances: self.spawn_chances.clamped(),
            ..self.clone()
        }
    }

    pub fn mask(&self) -> PlayableMask {
        PlayableMask::from_rows(self.rows, self.cols, &self.playable_mask)
    }

    /// Empty board shaped by this level
    pub fn empty_board(&self) -> Board {
        Board::new(self.mask())
    }

    pub fn is_cell_playable(&self, row: usize, col: usize) -> bool {
        self.mask().is_open(row, col)
    }

    /// Check a supplied starting board against this level's shape
    pub fn check_board(&self, board: &Board) -> Result<(), ConfigError> {
        if board.rows() != self.rows || board.cols() != self.cols {
            return Err(ConfigError::BoardShapeMismatch {
                rows: board.rows(),
                cols: board.cols(),
                expected_rows: self.rows,
                expected_cols: self.cols,
            });
        }
        Ok(())
    }
}
