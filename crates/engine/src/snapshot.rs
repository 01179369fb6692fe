//! Engine snapshots - serializable state plus an FNV-1a board hash

use serde::{Deserialize, Serialize};

use crate::core::Board;
use crate::session::Phase;
use crate::types::{Outcome, SpecialType};

/// Serializable view of one engine state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
    pub rows: usize,
    pub cols: usize,
    /// Row-major cells: `None` for empty (or non-playable), else `(colorId, specialType)`
    pub cells: Vec<Option<CellSnapshot>>,
    pub board_hash: u64,
    pub moves_left: i32,
    pub moves_made: u32,
    pub score: u32,
    pub phase: Phase,
    pub terminal: Option<Outcome>,
    pub episode_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellSnapshot {
    pub color_id: u8,
    pub special_type: SpecialType,
}

impl EngineSnapshot {
    /// Row strings for debugging: color digit for plain tiles, `B`/`D`/`H`/`V` for specials
    pub fn render_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.cols.max(1))
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        None => '.',
                        Some(c) => match c.special_type {
                            SpecialType::None => char::from(b'0' + c.color_id % 10),
                            SpecialType::Bomb => 'B',
                            SpecialType::Disco => 'D',
                            SpecialType::RocketHorizontal => 'H',
                            SpecialType::RocketVertical => 'V',
                        },
                    })
                    .collect()
            })
            .collect()
    }
}

fn fnv1a64_bytes(bytes: impl Iterator<Item = u8>) -> u64 {
    // FNV-1a 64-bit.
    let mut h: u64 = 0xcbf29ce484222325;
    for b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(0x00000100000001B3);
    }
    h
}

fn special_code(special: SpecialType) -> u8 {
    match special {
        SpecialType::None => 0,
        SpecialType::Bomb => 1,
        SpecialType::Disco => 2,
        SpecialType::RocketHorizontal => 3,
        SpecialType::RocketVertical => 4,
    }
}

/// Hash of the `(colorId, specialType)` layout; empty cells hash as `0xFF`
pub fn board_hash(board: &Board) -> u64 {
    fnv1a64_bytes(board.layout().into_iter().flat_map(|cell| match cell {
        None => [0xFF, 0xFF],
        Some((color, special)) => [color, special_code(special)],
    }))
}

pub(crate) fn cells_of(board: &Board) -> Vec<Option<CellSnapshot>> {
    board
        .layout()
        .into_iter()
        .map(|cell| {
            cell.map(|(color_id, special_type)| CellSnapshot {
                color_id,
                special_type,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pos;

    #[test]
    fn test_hash_tracks_layout() {
        let mut board = Board::from_color_rows(&["012", "120"]);
        let before = board_hash(&board);
        assert_eq!(before, board_hash(&board.clone()));

        board.set_special(Pos::new(0, 0), SpecialType::Bomb);
        assert_ne!(board_hash(&board), before);
    }

    #[test]
    fn test_hash_ignores_stamped_coordinates() {
        let mut a = Board::from_color_rows(&["11"]);
        let b = a.clone();
        a.swap(Pos::new(0, 0), Pos::new(0, 1));
        assert_eq!(board_hash(&a), board_hash(&b));
    }

    #[test]
    fn test_cells_of_layout() {
        let mut board = Board::from_color_rows(&["3."]);
        board.set_special(Pos::new(0, 0), SpecialType::Disco);
        let cells = cells_of(&board);
        assert_eq!(
            cells,
            vec![
                Some(CellSnapshot {
                    color_id: 3,
                    special_type: SpecialType::Disco
                }),
                None
            ]
        );
    }
}
