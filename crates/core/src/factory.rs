//! Tile factory - produces new tiles and refills empty cells
//!
//! The engine receives its tile source by injection; [`TileFactory`] is the seeded
//! implementation used in play. Every tile costs exactly two draws (color, then special),
//! so a given seed always produces the same stream regardless of spawn settings.

use crate::config::LevelConfig;
use crate::rng::SimpleRng;
use crate::types::{SpecialType, Tile};
use crate::Board;

/// Which fill is asking for a tile; gates random specials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpawnContext {
    InitialFill,
    Refill,
}

/// Anything that can hand out new tiles
pub trait TileSource {
    /// Produce the next tile for a level. Position is stamped by the board on placement.
    fn spawn(&mut self, level: &LevelConfig, context: SpawnContext) -> Tile;
}

/// Seeded tile generator
#[derive(Debug, Clone)]
pub struct TileFactory {
    rng: SimpleRng,
}

impl TileFactory {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }

    pub fn from_rng(rng: SimpleRng) -> Self {
        Self { rng }
    }

    /// Uniform color over `[0, color_count)`
    pub fn roll_color(&mut self, color_count: u8) -> u8 {
        self.rng.next_range(u32::from(color_count.max(1))) as u8
    }

    /// One draw against bomb, rocket, disco in that order; remainder is `None`
    pub fn roll_special(&mut self, level: &LevelConfig, context: SpawnContext) -> SpecialType {
        let roll = self.rng.next_unit();

        let allow = match context {
            SpawnContext::InitialFill => level.allow_special_on_initial_fill,
            SpawnContext::Refill => level.allow_special_on_refill,
        };
        if !allow {
            return SpecialType::None;
        }

        let chances = level.spawn_chances.clamped();
        if roll < chances.bomb {
            return SpecialType::Bomb;
        }
        if roll < chances.bomb + chances.rocket {
            return SpecialType::RocketHorizontal;
        }
        if roll < chances.bomb + chances.rocket + chances.disco {
            return SpecialType::Disco;
        }
        SpecialType::None
    }

    /// Current RNG state
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for TileFactory {
    fn default() -> Self {
        Self::new(1)
    }
}

impl TileSource for TileFactory {
    fn spawn(&mut self, level: &LevelConfig, context: SpawnContext) -> Tile {
        let color_id = self.roll_color(level.color_count);
        let special_type = self.roll_special(level, context);
        Tile::with_special(color_id, special_type)
    }
}

/// Generate a tile for every empty playable cell, column-major (left to right, top to bottom).
/// Returns the placed tiles with their coordinates.
pub fn fill_empty(
    board: &mut Board,
    source: &mut dyn TileSource,
    level: &LevelConfig,
    context: SpawnContext,
) -> Vec<Tile> {
    let mut placed = Vec::new();
    for pos in board.empty_playable_cells() {
        let tile = source.spawn(level, context);
        board.set(pos, Some(tile));
        if let Some(t) = board.tile(pos) {
            placed.push(*t);
        }
    }
    placed
}
