//! Clear application - destroy a finalized clear set, keeping spawn anchors

use std::collections::{BTreeMap, BTreeSet};

use crate::board::Board;
use crate::types::{Pos, SpecialType};

/// What a clear actually did to the board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearOutcome {
    /// Cells whose tile was destroyed, row-major
    pub destroyed: Vec<Pos>,
    /// Anchors converted into specials
    pub spawned: Vec<(Pos, SpecialType)>,
}

impl ClearOutcome {
    pub fn cleared_count(&self) -> u32 {
        self.destroyed.len() as u32
    }
}

/// Remove every tile in `cells`.
///
/// With `allow_spawn`, a cell that carries a spawn candidate keeps its tile (and color),
/// takes the candidate's special type, and is not counted as destroyed. Empty cells are
/// skipped.
pub fn apply_clear(
    board: &mut Board,
    cells: &BTreeSet<Pos>,
    spawns: &BTreeMap<Pos, SpecialType>,
    allow_spawn: bool,
) -> ClearOutcome {
    let mut outcome = ClearOutcome::default();

    for &pos in cells {
        if board.tile(pos).is_none() {
            continue;
        }
        if allow_spawn {
            if let Some(&special) = spawns.get(&pos).filter(|s| s.is_special()) {
                board.set_special(pos, special);
                outcome.spawned.push((pos, special));
                continue;
            }
        }
        board.take(pos);
        outcome.destroyed.push(pos);
    }

    outcome
}
