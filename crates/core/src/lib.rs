//! Core board logic - pure, deterministic, and testable
//!
//! This crate contains the grid model and every rule that transforms it. It has
//! **zero dependencies** on rendering, audio, or I/O, making it:
//!
//! - **Deterministic**: Same seed and same swap sequence produce identical boards
//! - **Testable**: Every rule is a free function over a [`Board`]
//! - **Portable**: Runs headless, in a replay tool, or behind any frontend
//!
//! # Module Structure
//!
//! - [`board`]: Dense row-major grid with a playable-cell mask
//! - [`config`]: Level configuration and normalization
//! - [`rng`]: Seeded LCG used by the tile factory
//! - [`factory`]: Tile generation and refill of empty cells
//! - [`matcher`]: Run-length match detection and spawn candidates
//! - [`special`]: Merge precedence, effect areas and flood expansion
//! - [`clear`]: Apply a finalized clear set, keeping spawn anchors
//! - [`gravity`]: Column collapse around permanent gaps
//! - [`settle`]: Quiet fill that strips pre-existing matches
//!
//! # Rules
//!
//! - **Runs**: 3+ equal colors in a row or column clear; 4 spawns a line rocket; 5+ a disco
//! - **Merges**: overlapping candidates resolve through [`merge_special`]
//! - **Expansion**: specials inside a clear set add their area, chaining to a fixpoint
//! - **Gravity**: tiles fall past non-playable cells, never onto them
//! - **Refill**: column-major, top to bottom, one color draw and one special draw per tile
//!
//! # Example
//!
//! ```
//! use tile_cascade_core::{find_matches, populate, LevelConfig, TileFactory};
//!
//! let level = LevelConfig::default();
//! let mut board = level.empty_board();
//! let mut factory = TileFactory::new(12345);
//!
//! populate(&mut board, &mut factory, &level);
//!
//! assert!(board.is_full());
//! assert!(find_matches(&board).is_empty());
//! ```

pub mod board;
pub mod clear;
pub mod config;
pub mod factory;
pub mod gravity;
pub mod matcher;
pub mod rng;
pub mod settle;
pub mod special;

pub use tile_cascade_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, PlayableMask};
pub use clear::{apply_clear, ClearOutcome};
pub use config::{ConfigError, LevelConfig, SpawnChances};
pub use factory::{fill_empty, SpawnContext, TileFactory, TileSource};
pub use gravity::{collapse, CollapseReport, TileMove};
pub use matcher::{find_matches, MatchResult};
pub use rng::SimpleRng;
pub use settle::{populate, SettleReport};
pub use special::{activation_area, effect_area, expand, merge_special, swap_activations, Expansion};
