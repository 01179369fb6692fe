//! Quiet board population
//!
//! Fills a board and strips every pre-existing match without scoring or spawning, so a level
//! always starts from a stable grid.

use tracing::{debug, warn};

use crate::board::Board;
use crate::clear::apply_clear;
use crate::config::LevelConfig;
use crate::factory::{fill_empty, SpawnContext, TileSource};
use crate::gravity::collapse;
use crate::matcher::find_matches;
use crate::special::expand;

/// Upper bound on clear/refill passes while settling
pub const MAX_SETTLE_PASSES: u32 = 512;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleReport {
    /// Tiles placed by the initial fill
    pub filled: usize,
    /// Clear/collapse/refill passes needed to reach a stable board
    pub passes: u32,
    pub stable: bool,
}

/// Fill every empty playable cell, then clear, collapse and refill until no match remains
pub fn populate(board: &mut Board, source: &mut dyn TileSource, level: &LevelConfig) -> SettleReport {
    let filled = fill_empty(board, source, level, SpawnContext::InitialFill).len();
    let mut report = SettleReport {
        filled,
        ..SettleReport::default()
    };

    loop {
        let matches = find_matches(board);
        if matches.is_empty() {
            report.stable = true;
            break;
        }
        if report.passes >= MAX_SETTLE_PASSES {
            warn!(passes = report.passes, "board did not settle");
            break;
        }

        let expansion = expand(board, &matches.cleared_cells);
        apply_clear(board, &expansion.cells, &matches.special_spawns, false);
        collapse(board);
        fill_empty(board, source, level, SpawnContext::Refill);
        report.passes += 1;
    }

    debug!(filled = report.filled, passes = report.passes, "board populated");
    report
}
