//! Special tiles - merge precedence, effect areas and flood expansion
//!
//! Expansion runs on an unmodified board: the clear set grows to its fixpoint first, and only
//! then does anything get destroyed.

use std::collections::{BTreeSet, VecDeque};

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::types::{Pos, SpecialType, BOMB_AREA_MAX, BOMB_AREA_MIN};

/// Resolve two spawn candidates that landed on the same cell.
///
/// | a | b | result |
/// |---|---|---|
/// | X | X | X |
/// | None | Y | Y |
/// | Y | None | Y |
/// | RocketH / RocketV (either order) | | RocketHorizontal |
/// | Bomb | anything (either order) | Bomb |
/// | otherwise | | a |
pub fn merge_special(a: SpecialType, b: SpecialType) -> SpecialType {
    use SpecialType::*;

    if a == b {
        return a;
    }
    match (a, b) {
        (None, y) => y,
        (x, None) => x,
        (RocketHorizontal, RocketVertical) | (RocketVertical, RocketHorizontal) => RocketHorizontal,
        (Bomb, _) | (_, Bomb) => Bomb,
        (x, _) => x,
    }
}

/// Cells a special affects when triggered at `origin`, clipped to playable cells.
///
/// Row-major order; plain tiles affect nothing.
pub fn effect_area(board: &Board, origin: Pos, special: SpecialType) -> Vec<Pos> {
    let (rows, cols) = (board.rows() as i32, board.cols() as i32);
    let mut area = Vec::new();

    match special {
        SpecialType::None => {}
        SpecialType::RocketHorizontal => {
            area.extend((0..cols).map(|c| Pos::new(origin.row, c)));
        }
        SpecialType::RocketVertical => {
            area.extend((0..rows).map(|r| Pos::new(r, origin.col)));
        }
        SpecialType::Bomb => {
            for dr in BOMB_AREA_MIN..=BOMB_AREA_MAX {
                for dc in BOMB_AREA_MIN..=BOMB_AREA_MAX {
                    area.push(origin.offset(dr, dc));
                }
            }
        }
        SpecialType::Disco => {
            for r in 0..rows {
                if r == origin.row {
                    area.extend((0..cols).map(|c| Pos::new(r, c)));
                } else {
                    area.push(Pos::new(r, origin.col));
                }
            }
        }
    }

    area.retain(|&p| board.is_playable(p));
    area
}

/// A finished flood expansion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    /// Final clear set
    pub cells: BTreeSet<Pos>,
    /// Specials that fired, in trigger order
    pub triggered: Vec<(Pos, SpecialType)>,
}

/// Grow `base` until no special inside the set adds new cells.
///
/// Each cell is inspected once; a special discovered through another special's area is
/// queued and fires in turn.
pub fn expand(board: &Board, base: &BTreeSet<Pos>) -> Expansion {
    let mut cells = base.clone();
    let mut queue: VecDeque<Pos> = base.iter().copied().collect();
    let mut triggered = Vec::new();

    while let Some(pos) = queue.pop_front() {
        let special = board.special_at(pos);
        if !special.is_special() {
            continue;
        }
        triggered.push((pos, special));
        for cell in effect_area(board, pos, special) {
            if cells.insert(cell) {
                queue.push_back(cell);
            }
        }
    }

    Expansion { cells, triggered }
}

/// Specials a swap brings into play: each swapped cell that holds a special after the swap
pub fn swap_activations(board: &Board, a: Pos, b: Pos) -> ArrayVec<(Pos, SpecialType), 2> {
    let mut seeds = ArrayVec::new();
    for cell in [a, b] {
        let special = board.special_at(cell);
        if special.is_special() {
            seeds.push((cell, special));
        }
    }
    seeds
}

/// Clear set for a manual activation: the seeds' own cells plus their areas, flood-expanded
pub fn activation_area(board: &Board, seeds: &[(Pos, SpecialType)]) -> Expansion {
    let base: BTreeSet<Pos> = seeds
        .iter()
        .filter(|(pos, _)| board.is_playable(*pos))
        .map(|&(pos, _)| pos)
        .collect();
    expand(board, &base)
}
