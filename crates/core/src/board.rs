//! Board module - the grid of tile values
//!
//! The grid is BOARD_SIZE x BOARD_SIZE. Each cell holds 0 (empty) or a power of
//! two >= 2. Uses a flat row-major array for cache locality and zero-allocation.
//! Coordinates: (row, col), row 0 at the top, col 0 at the left.

use arrayvec::ArrayVec;

use crate::error::EngineError;
use crate::types::{is_tile_value, remap, Direction, Position, BOARD_CELLS, BOARD_SIZE};

/// The tile value grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    /// Flat array of cells, row-major order (row * SIZE + col)
    cells: [u32; BOARD_CELLS],
}

impl Grid {
    /// Create a new empty grid
    pub const fn new() -> Self {
        Self {
            cells: [0; BOARD_CELLS],
        }
    }

    /// Build a grid from rows, without validating values.
    ///
    /// Intended for tests and fixtures; gameplay code goes through
    /// [`Grid::place`].
    pub const fn from_rows(rows: [[u32; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        let mut cells = [0; BOARD_CELLS];
        let mut i = 0;
        while i < BOARD_CELLS {
            cells[i] = rows[i / BOARD_SIZE][i % BOARD_SIZE];
            i += 1;
        }
        Self { cells }
    }

    /// Convert to rows for display and assertions
    pub fn rows(&self) -> [[u32; BOARD_SIZE]; BOARD_SIZE] {
        let mut rows = [[0; BOARD_SIZE]; BOARD_SIZE];
        for (i, &v) in self.cells.iter().enumerate() {
            rows[i / BOARD_SIZE][i % BOARD_SIZE] = v;
        }
        rows
    }

    /// Get cell value at position, None if out of bounds
    #[inline]
    pub fn get(&self, at: Position) -> Option<u32> {
        at.index().map(|idx| self.cells[idx])
    }

    /// Set cell value at position; returns false if out of bounds
    #[inline]
    pub fn set(&mut self, at: Position, value: u32) -> bool {
        match at.index() {
            Some(idx) => {
                self.cells[idx] = value;
                true
            }
            None => false,
        }
    }

    /// Read a cell in the canonical frame of `direction`
    #[inline]
    pub fn get_tilted(&self, direction: Direction, row: usize, col: usize) -> u32 {
        let (r, c) = remap(direction, row, col);
        self.cells[r * BOARD_SIZE + c]
    }

    /// Write a cell in the canonical frame of `direction`
    #[inline]
    pub fn set_tilted(&mut self, direction: Direction, row: usize, col: usize, value: u32) {
        let (r, c) = remap(direction, row, col);
        self.cells[r * BOARD_SIZE + c] = value;
    }

    /// Place a tile on an empty cell, validating position and value
    pub fn place(&mut self, value: u32, at: Position) -> Result<(), EngineError> {
        let idx = at.index().ok_or(EngineError::OutOfRange(at))?;
        if !is_tile_value(value) {
            return Err(EngineError::InvalidValue(value));
        }
        if self.cells[idx] != 0 {
            return Err(EngineError::Occupied(at));
        }
        self.cells[idx] = value;
        Ok(())
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    /// Check if no cell is empty
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&v| v != 0)
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> ArrayVec<Position, BOARD_CELLS> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 0)
            .map(|(i, _)| Position::from_index(i))
            .collect()
    }

    /// Sum of all tile values
    pub fn total(&self) -> u64 {
        self.cells.iter().map(|&v| v as u64).sum()
    }

    /// Largest tile value on the board (0 if empty)
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[u32; BOARD_CELLS] {
        &self.cells
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        self.cells = [0; BOARD_CELLS];
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_flat_layout() {
        let mut grid = Grid::new();
        assert!(grid.set(Position::new(0, 0), 2));
        assert!(grid.set(Position::new(2, 3), 8));

        assert_eq!(grid.cells()[0], 2);
        assert_eq!(grid.cells()[2 * BOARD_SIZE + 3], 8);
        assert!(!grid.set(Position::new(4, 0), 2));
        assert_eq!(grid.get(Position::new(0, 4)), None);
    }

    #[test]
    fn test_rows_roundtrip() {
        let rows = [[2, 0, 0, 4], [0, 8, 0, 0], [0, 0, 0, 0], [16, 0, 0, 2]];
        assert_eq!(Grid::from_rows(rows).rows(), rows);
    }

    #[test]
    fn test_tilted_access_matches_remap() {
        let grid = Grid::from_rows([[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12], [13, 14, 15, 16]]);
        assert_eq!(grid.get_tilted(Direction::North, 0, 0), 1);
        assert_eq!(grid.get_tilted(Direction::South, 0, 0), 13);
        assert_eq!(grid.get_tilted(Direction::East, 0, 0), 4);
        assert_eq!(grid.get_tilted(Direction::West, 0, 1), 5);
    }

    #[test]
    fn test_place_validation() {
        let mut grid = Grid::new();
        assert_eq!(
            grid.place(2, Position::new(4, 0)),
            Err(EngineError::OutOfRange(Position::new(4, 0)))
        );
        assert_eq!(
            grid.place(3, Position::new(0, 0)),
            Err(EngineError::InvalidValue(3))
        );
        assert!(grid.place(4, Position::new(1, 1)).is_ok());
        assert_eq!(
            grid.place(2, Position::new(1, 1)),
            Err(EngineError::Occupied(Position::new(1, 1)))
        );
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn test_max_tile() {
        assert_eq!(Grid::new().max_tile(), 0);
        let grid = Grid::from_rows([[2, 0, 0, 0], [0, 64, 0, 0], [0, 0, 8, 0], [0, 0, 0, 4]]);
        assert_eq!(grid.max_tile(), 64);
    }

    #[test]
    fn test_empty_cells_row_major() {
        let grid = Grid::from_rows([[2, 0, 2, 2], [2, 2, 2, 2], [2, 2, 2, 0], [2, 2, 2, 2]]);
        let empty = grid.empty_cells();
        assert_eq!(empty.as_slice(), &[Position::new(0, 1), Position::new(2, 3)]);
        assert!(!grid.is_full());
    }
}
