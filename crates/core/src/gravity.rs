//! Gravity - compact each column downward
//!
//! Non-playable cells are permanent gaps: tiles never land on them, but a tile above a gap
//! falls past it into the next free playable row below.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::types::Pos;

/// One tile moving from `from` to `to` (same column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMove {
    pub from: Pos,
    pub to: Pos,
}

impl TileMove {
    /// Rows fallen
    pub fn distance(&self) -> i32 {
        self.to.row - self.from.row
    }
}

/// Result of one collapse pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseReport {
    /// Moved tiles, column by column, bottom to top
    pub moves: Vec<TileMove>,
    /// Playable cells left empty at the top of each column, ready for refill
    pub empty_cells: Vec<Pos>,
}

/// Collapse every column, preserving the relative order of the tiles within it
pub fn collapse(board: &mut Board) -> CollapseReport {
    let mut report = CollapseReport::default();

    for col in 0..board.cols() as i32 {
        let playable_rows_desc: Vec<i32> = (0..board.rows() as i32)
            .rev()
            .filter(|&r| board.is_playable(Pos::new(r, col)))
            .collect();

        let mut write = 0;
        for &row in &playable_rows_desc {
            let from = Pos::new(row, col);
            let Some(tile) = board.take(from) else {
                continue;
            };
            let to = Pos::new(playable_rows_desc[write], col);
            board.set(to, Some(tile));
            if to != from {
                report.moves.push(TileMove { from, to });
            }
            write += 1;
        }

        report.empty_cells.extend(
            playable_rows_desc[write..]
                .iter()
                .rev()
                .map(|&r| Pos::new(r, col)),
        );
    }

    report
}
