//! Board module - manages the tile grid and the playable-cell mask
//!
//! The board is a `rows x cols` grid where each cell is empty or holds one tile.
//! Uses a flat row-major vector (`row * cols + col`) for cache locality and bounds-checked access.
//! Coordinates: `(row, col)` with row 0 at the top.
//!
//! Non-playable cells never hold a tile; they are excluded from matching, gravity and refill.

use crate::types::{Cell, InvalidReason, Pos, SpecialType, Tile};

/// Characters that close a cell in a row-mask string
const CLOSED_MASK_CHARS: [char; 4] = ['0', 'x', 'X', '.'];

/// Per-cell playable flags, fixed for a level's lifetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayableMask {
    rows: usize,
    cols: usize,
    open: Vec<bool>,
}

impl PlayableMask {
    /// Every cell playable
    pub fn all_open(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            open: vec![true; rows * cols],
        }
    }

    /// Build from row strings (`'0'`, `'x'`, `'X'`, `'.'` close a cell).
    ///
    /// Missing rows and short rows are permissive: absent entries are playable.
    pub fn from_rows<S: AsRef<str>>(rows: usize, cols: usize, mask_rows: &[S]) -> Self {
        let mut mask = Self::all_open(rows, cols);
        for (row, line) in mask_rows.iter().take(rows).enumerate() {
            for (col, ch) in line.as_ref().chars().take(cols).enumerate() {
                if CLOSED_MASK_CHARS.contains(&ch) {
                    mask.open[row * cols + col] = false;
                }
            }
        }
        mask
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_open(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.open[row * self.cols + col]
    }

    pub fn open_count(&self) -> usize {
        self.open.iter().filter(|&&o| o).count()
    }
}

/// The game board - dense row-major grid of [`Cell`]s plus the playable mask
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    mask: PlayableMask,
}

impl Board {
    /// Create an empty board shaped by `mask`
    pub fn new(mask: PlayableMask) -> Self {
        let (rows, cols) = (mask.rows(), mask.cols());
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
            mask,
        }
    }

    /// Create an empty, fully playable board
    pub fn open(rows: usize, cols: usize) -> Self {
        Self::new(PlayableMask::all_open(rows, cols))
    }

    /// Build a board from digit rows, one character per cell.
    ///
    /// `'0'..='9'` places a plain tile of that color; `'.'`, `'x'` and `'#'` mark a
    /// non-playable cell. Intended for fixtures and tools.
    ///
    /// # Panics
    ///
    /// Panics if rows have different lengths or a character is not recognised.
    pub fn from_color_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        assert!(
            rows.iter().all(|r| r.chars().count() == width),
            "all rows must have the same length"
        );

        let mask_rows: Vec<String> = rows
            .iter()
            .map(|r| {
                r.chars()
                    .map(|ch| if matches!(ch, '.' | 'x' | '#') { '.' } else { '1' })
                    .collect()
            })
            .collect();
        let mut board = Self::new(PlayableMask::from_rows(height, width, &mask_rows));

        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let pos = Pos::new(row as i32, col as i32);
                match ch {
                    '.' | 'x' | '#' => {}
                    d if d.is_ascii_digit() => {
                        board.set(pos, Some(Tile::new(d as u8 - b'0')));
                    }
                    other => panic!("unrecognised board character {:?}", other),
                }
            }
        }
        board
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.row < 0 || pos.col < 0 {
            return None;
        }
        let (row, col) = (pos.row as usize, pos.col as usize);
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(row * self.cols + col)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn mask(&self) -> &PlayableMask {
        &self.mask
    }

    /// Check if position is within the grid bounds
    pub fn is_inside(&self, pos: Pos) -> bool {
        self.index(pos).is_some()
    }

    /// Check if position is inside the grid and marked playable
    pub fn is_playable(&self, pos: Pos) -> bool {
        self.is_inside(pos) && self.mask.is_open(pos.row as usize, pos.col as usize)
    }

    pub fn are_neighbors(&self, a: Pos, b: Pos) -> bool {
        a.is_adjacent(b)
    }

    /// Get cell at position; `None` if out of bounds
    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Tile at position, if any
    pub fn tile(&self, pos: Pos) -> Option<&Tile> {
        self.index(pos).and_then(|idx| self.cells[idx].as_ref())
    }

    /// Special type at position (`None` for empty or out-of-bounds cells)
    pub fn special_at(&self, pos: Pos) -> SpecialType {
        self.tile(pos)
            .map(|t| t.special_type)
            .unwrap_or(SpecialType::None)
    }

    /// Set cell at position, stamping the tile's coordinates.
    /// Returns false if out of bounds or if a tile is written to a non-playable cell.
    pub fn set(&mut self, pos: Pos, cell: Cell) -> bool {
        let Some(idx) = self.index(pos) else {
            return false;
        };
        if cell.is_some() && !self.is_playable(pos) {
            debug_assert!(false, "tile written to non-playable cell {}", pos);
            return false;
        }
        self.cells[idx] = cell.map(|tile| Tile {
            row: pos.row,
            col: pos.col,
            ..tile
        });
        true
    }

    /// Remove and return the tile at position
    pub fn take(&mut self, pos: Pos) -> Cell {
        self.index(pos).and_then(|idx| self.cells[idx].take())
    }

    /// Change the special type of the tile at position. Returns false on empty cells.
    pub fn set_special(&mut self, pos: Pos, special_type: SpecialType) -> bool {
        match self.index(pos).and_then(|idx| self.cells[idx].as_mut()) {
            Some(tile) => {
                tile.special_type = special_type;
                true
            }
            None => false,
        }
    }

    /// Swap precondition: both cells inside, both playable, and neighbours
    pub fn validate_swap(&self, a: Pos, b: Pos) -> Result<(), InvalidReason> {
        for cell in [a, b] {
            if !self.is_inside(cell) {
                return Err(InvalidReason::OutOfBounds { cell });
            }
        }
        for cell in [a, b] {
            if !self.is_playable(cell) {
                return Err(InvalidReason::NotPlayable { cell });
            }
        }
        if !self.are_neighbors(a, b) {
            return Err(InvalidReason::NotAdjacent);
        }
        Ok(())
    }

    /// Structural swap: the two cells exchange tiles and the tiles take the new coordinates.
    /// Returns false (no mutation) if either position is out of bounds.
    pub fn swap(&mut self, a: Pos, b: Pos) -> bool {
        let (Some(ia), Some(ib)) = (self.index(a), self.index(b)) else {
            return false;
        };
        self.cells.swap(ia, ib);
        if let Some(tile) = self.cells[ia].as_mut() {
            tile.row = a.row;
            tile.col = a.col;
        }
        if let Some(tile) = self.cells[ib].as_mut() {
            tile.row = b.row;
            tile.col = b.col;
        }
        true
    }

    /// All positions, row-major
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.rows)
            .flat_map(move |r| (0..self.cols).map(move |c| Pos::new(r as i32, c as i32)))
    }

    /// Playable positions, row-major
    pub fn playable_positions(&self) -> impl Iterator<Item = Pos> + '_ {
        self.positions().filter(|&p| self.is_playable(p))
    }

    /// Every tile on the board, row-major
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().filter_map(|c| c.as_ref())
    }

    pub fn playable_count(&self) -> usize {
        self.mask.open_count()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Every playable cell holds a tile and every non-playable cell is empty
    pub fn is_full(&self) -> bool {
        self.positions().all(|p| {
            let occupied = self.tile(p).is_some();
            occupied == self.is_playable(p)
        })
    }

    /// Empty playable cells, column-major (left to right, top to bottom)
    pub fn empty_playable_cells(&self) -> Vec<Pos> {
        let mut out = Vec::new();
        for col in 0..self.cols as i32 {
            for row in 0..self.rows as i32 {
                let p = Pos::new(row, col);
                if self.is_playable(p) && self.tile(p).is_none() {
                    out.push(p);
                }
            }
        }
        out
    }

    /// Get a reference to the internal cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// `(colorId, specialType)` layout, row-major; ignores the stamped coordinates
    pub fn layout(&self) -> Vec<Option<(u8, SpecialType)>> {
        self.cells
            .iter()
            .map(|c| c.map(|t| (t.color_id, t.special_type)))
            .collect()
    }

    /// Remove every tile
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }
}
