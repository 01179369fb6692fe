//! Match detector - run-length scan of rows and columns
//!
//! Rows are scanned left to right, then columns top to bottom. A run is broken by an empty
//! cell (non-playable cells are always empty) or a color change.
//!
//! - length >= 3: every cell of the run is cleared
//! - length == 4: a line rocket candidate at the run's anchor (orientation follows the scan)
//! - length >= 5: a disco candidate at the anchor, instead of the rocket
//!
//! The anchor is `floor((start + end) / 2)`. Candidates that land on the same cell are merged
//! with [`merge_special`](crate::special::merge_special), row candidates first.

use std::collections::{BTreeMap, BTreeSet};

use crate::board::Board;
use crate::special::merge_special;
use crate::types::{Pos, SpecialType, DISCO_RUN, MIN_RUN, ROCKET_RUN};

/// Result of one detection pass; produced fresh each time
///
/// Ordered collections keep iteration (and everything derived from it) deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub cleared_cells: BTreeSet<Pos>,
    pub special_spawns: BTreeMap<Pos, SpecialType>,
}

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.cleared_cells.is_empty()
    }

    /// Register a spawn candidate, merging with any candidate already on that cell
    pub fn register_spawn(&mut self, cell: Pos, incoming: SpecialType) {
        if !incoming.is_special() {
            return;
        }
        self.special_spawns
            .entry(cell)
            .and_modify(|existing| *existing = merge_special(*existing, incoming))
            .or_insert(incoming);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Row,
    Column,
}

impl Axis {
    fn rocket(self) -> SpecialType {
        match self {
            Axis::Row => SpecialType::RocketHorizontal,
            Axis::Column => SpecialType::RocketVertical,
        }
    }
}

/// Scan the whole board for runs
pub fn find_matches(board: &Board) -> MatchResult {
    let mut result = MatchResult::default();
    let (rows, cols) = (board.rows() as i32, board.cols() as i32);

    for row in 0..rows {
        scan_line(board, (0..cols).map(|c| Pos::new(row, c)), Axis::Row, &mut result);
    }
    for col in 0..cols {
        scan_line(board, (0..rows).map(|r| Pos::new(r, col)), Axis::Column, &mut result);
    }

    result
}

fn scan_line(
    board: &Board,
    line: impl Iterator<Item = Pos>,
    axis: Axis,
    result: &mut MatchResult,
) {
    let mut run: Vec<Pos> = Vec::new();
    let mut run_color: Option<u8> = None;

    for pos in line {
        match board.tile(pos) {
            Some(tile) if Some(tile.color_id) == run_color => run.push(pos),
            Some(tile) => {
                register_run(&run, axis, result);
                run.clear();
                run.push(pos);
                run_color = Some(tile.color_id);
            }
            None => {
                register_run(&run, axis, result);
                run.clear();
                run_color = None;
            }
        }
    }
    register_run(&run, axis, result);
}

fn register_run(run: &[Pos], axis: Axis, result: &mut MatchResult) {
    if run.len() < MIN_RUN {
        return;
    }
    result.cleared_cells.extend(run.iter().copied());

    let anchor = run[(run.len() - 1) / 2];
    if run.len() >= DISCO_RUN {
        result.register_spawn(anchor, SpecialType::Disco);
    } else if run.len() == ROCKET_RUN {
        result.register_spawn(anchor, axis.rocket());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(list: &[(i32, i32)]) -> BTreeSet<Pos> {
        list.iter().map(|&(r, c)| Pos::new(r, c)).collect()
    }

    #[test]
    fn test_no_matches_on_checker_board() {
        let board = Board::from_color_rows(&["0101", "1010", "0101"]);
        assert!(find_matches(&board).is_empty());
    }

    #[test]
    fn test_horizontal_three() {
        let board = Board::from_color_rows(&["0001", "1210", "2102"]);
        let result = find_matches(&board);
        assert_eq!(result.cleared_cells, cells(&[(0, 0), (0, 1), (0, 2)]));
        assert!(result.special_spawns.is_empty());
    }

    #[test]
    fn test_vertical_four_spawns_vertical_rocket() {
        let board = Board::from_color_rows(&["01", "02", "01", "02", "10"]);
        let result = find_matches(&board);
        assert_eq!(result.cleared_cells, cells(&[(0, 0), (1, 0), (2, 0), (3, 0)]));
        // floor((0 + 3) / 2) = 1
        assert_eq!(
            result.special_spawns.get(&Pos::new(1, 0)),
            Some(&SpecialType::RocketVertical)
        );
        assert_eq!(result.special_spawns.len(), 1);
    }

    #[test]
    fn test_horizontal_four_spawns_horizontal_rocket() {
        let board = Board::from_color_rows(&["21111", "01202"]);
        let result = find_matches(&board);
        assert_eq!(result.cleared_cells.len(), 4);
        // run cols 1..=4 -> floor(5 / 2) = 2
        assert_eq!(
            result.special_spawns.get(&Pos::new(0, 2)),
            Some(&SpecialType::RocketHorizontal)
        );
    }

    #[test]
    fn test_six_run_spawns_single_disco() {
        let board = Board::from_color_rows(&["333333", "010101"]);
        let result = find_matches(&board);
        assert_eq!(result.cleared_cells.len(), 6);
        assert_eq!(result.special_spawns.len(), 1);
        assert_eq!(
            result.special_spawns.get(&Pos::new(0, 2)),
            Some(&SpecialType::Disco)
        );
    }

    #[test]
    fn test_empty_cell_breaks_run() {
        let mut board = Board::from_color_rows(&["0000000", "1212121"]);
        board.take(Pos::new(0, 3));
        let result = find_matches(&board);
        // Two runs of three, no specials
        assert_eq!(result.cleared_cells.len(), 6);
        assert!(result.special_spawns.is_empty());
    }

    #[test]
    fn test_hole_breaks_run() {
        let board = Board::from_color_rows(&["00.00", "12121"]);
        assert!(find_matches(&board).is_empty());
    }

    #[test]
    fn test_crossing_fours_merge_to_horizontal() {
        // Row 1 cols 0..=3 and column 1 rows 0..=3 both anchor at (1, 1)
        let board = Board::from_color_rows(&[
            "2023", //
            "0000", //
            "3031", //
            "1012", //
            "2321", //
        ]);
        let result = find_matches(&board);
        assert_eq!(
            result.special_spawns.get(&Pos::new(1, 1)),
            Some(&SpecialType::RocketHorizontal)
        );
        assert_eq!(result.cleared_cells.len(), 7);
    }
}
