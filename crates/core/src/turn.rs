//! Turn record - the three grids describing one committed tilt
//!
//! All three are indexed by the cell a tile ends up at:
//!
//! - `before`: the tile that lands here, with the cell it started from
//!   (an unmoved tile starts and lands on the same cell)
//! - `merging`: the tile that slides in and disappears into the one above
//! - `after`: the tile resting here once the turn settles (a fresh tile
//!   where a merge happened)
//!
//! [`TurnBuilder`] fills them from [`TiltEvent`]s, rejecting any event that
//! does not match the tiles currently on the board.

use crate::engine::TiltEvent;
use crate::error::EngineError;
use crate::types::{Position, BOARD_CELLS};

/// Identity of a tile, stable for as long as the tile exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub value: u32,
}

/// A tile together with the cell it started the turn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tracked {
    pub tile: Tile,
    pub from: Position,
}

/// Tiles by flat row-major cell index
pub type TileGrid = [Option<Tile>; BOARD_CELLS];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRecord {
    pub before: [Option<Tracked>; BOARD_CELLS],
    pub merging: [Option<Tracked>; BOARD_CELLS],
    pub after: TileGrid,
}

impl TurnRecord {
    /// Values of the settled board this turn leads to
    pub fn after_values(&self) -> [u32; BOARD_CELLS] {
        let mut out = [0; BOARD_CELLS];
        for (slot, tile) in out.iter_mut().zip(self.after.iter()) {
            *slot = tile.map_or(0, |t| t.value);
        }
        out
    }
}

/// Accumulates one turn's moves and merges over the settled tiles
pub struct TurnBuilder<'a> {
    before: [Option<Tracked>; BOARD_CELLS],
    merging: [Option<Tracked>; BOARD_CELLS],
    after: TileGrid,
    next_id: &'a mut u32,
}

fn cell(at: Position) -> Result<usize, EngineError> {
    at.index().ok_or(EngineError::OutOfRange(at))
}

impl<'a> TurnBuilder<'a> {
    /// Start a turn over `tiles`; merge results take ids from `next_id`
    pub fn new(tiles: &TileGrid, next_id: &'a mut u32) -> Self {
        let mut before = [None; BOARD_CELLS];
        for (i, tile) in tiles.iter().enumerate() {
            before[i] = tile.map(|tile| Tracked {
                tile,
                from: Position::from_index(i),
            });
        }
        Self {
            before,
            merging: [None; BOARD_CELLS],
            after: [None; BOARD_CELLS],
            next_id,
        }
    }

    /// Move the tile of `value` at `from` onto the empty cell `to`
    pub fn move_tile(
        &mut self,
        value: u32,
        from: Position,
        to: Position,
    ) -> Result<(), EngineError> {
        let src = cell(from)?;
        let dst = cell(to)?;
        let tracked = self.before[src].ok_or(EngineError::NoTile(from))?;
        if src == dst {
            return Ok(());
        }
        if self.merging[src].is_some() {
            return Err(EngineError::AlreadyMerged(from));
        }
        if tracked.tile.value != value {
            return Err(EngineError::WrongValue { value, at: from });
        }
        if self.before[dst].is_some() {
            return Err(EngineError::Occupied(to));
        }

        self.before[src] = None;
        self.before[dst] = Some(tracked);
        self.after[dst] = Some(tracked.tile);
        Ok(())
    }

    /// Merge the tile of `value` at `from` into the equal tile at `to`
    pub fn merge_tile(
        &mut self,
        value: u32,
        from: Position,
        to: Position,
    ) -> Result<(), EngineError> {
        let src = cell(from)?;
        let dst = cell(to)?;
        let tracked = self.before[src].ok_or(EngineError::NoTile(from))?;
        if tracked.tile.value != value {
            return Err(EngineError::WrongValue { value, at: from });
        }
        let target = self.before[dst].ok_or(EngineError::NoMergeTarget(to))?;
        if self.merging[dst].is_some() {
            return Err(EngineError::AlreadyMerged(to));
        }
        if target.tile.value != value {
            return Err(EngineError::MismatchedMerge(to));
        }

        *self.next_id += 1;
        self.before[src] = None;
        self.merging[dst] = Some(tracked);
        self.after[dst] = Some(Tile {
            id: TileId(*self.next_id),
            value: value * 2,
        });
        Ok(())
    }

    /// Apply one engine event
    pub fn apply(&mut self, event: &TiltEvent) -> Result<(), EngineError> {
        match *event {
            TiltEvent::Slide { from, to, value } => self.move_tile(value, from, to),
            TiltEvent::Merge {
                from,
                to,
                value,
                merged,
            } => {
                if merged != value * 2 {
                    return Err(EngineError::InvalidValue(merged));
                }
                self.merge_tile(value, from, to)
            }
        }
    }

    /// Finish the turn: untouched tiles carry over into `after`
    pub fn finish(mut self) -> TurnRecord {
        for i in 0..BOARD_CELLS {
            if self.after[i].is_none() {
                self.after[i] = self.before[i].map(|t| t.tile);
            }
        }
        TurnRecord {
            before: self.before,
            merging: self.merging,
            after: self.after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles(values: [u32; BOARD_CELLS]) -> (TileGrid, u32) {
        let mut grid = [None; BOARD_CELLS];
        let mut id = 0;
        for (i, &v) in values.iter().enumerate() {
            if v != 0 {
                id += 1;
                grid[i] = Some(Tile { id: TileId(id), value: v });
            }
        }
        (grid, id)
    }

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_move_then_merge() {
        let mut values = [0; BOARD_CELLS];
        values[1] = 2;
        values[2] = 2;
        let (grid, mut next_id) = tiles(values);

        let mut turn = TurnBuilder::new(&grid, &mut next_id);
        turn.move_tile(2, p(0, 1), p(0, 0)).unwrap();
        turn.merge_tile(2, p(0, 2), p(0, 0)).unwrap();
        let record = turn.finish();

        let landed = record.before[0].unwrap();
        assert_eq!(landed.tile.id, TileId(1));
        assert_eq!(landed.from, p(0, 1));
        assert_eq!(record.merging[0].unwrap().tile.id, TileId(2));
        assert_eq!(record.after[0], Some(Tile { id: TileId(3), value: 4 }));
        assert_eq!(record.after_values()[0], 4);
        assert!(record.after[1].is_none() && record.after[2].is_none());
        assert_eq!(next_id, 3);
    }

    #[test]
    fn test_unmoved_tiles_carry_over() {
        let mut values = [0; BOARD_CELLS];
        values[5] = 8;
        let (grid, mut next_id) = tiles(values);

        let record = TurnBuilder::new(&grid, &mut next_id).finish();
        assert_eq!(record.after[5], grid[5]);
        assert_eq!(record.before[5].unwrap().from, p(1, 1));
    }

    #[test]
    fn test_invalid_moves_are_rejected() {
        let mut values = [0; BOARD_CELLS];
        values[0] = 2;
        values[1] = 4;
        let (grid, mut next_id) = tiles(values);
        let mut turn = TurnBuilder::new(&grid, &mut next_id);

        assert_eq!(turn.move_tile(2, p(3, 3), p(3, 0)), Err(EngineError::NoTile(p(3, 3))));
        assert_eq!(
            turn.move_tile(8, p(0, 1), p(2, 1)),
            Err(EngineError::WrongValue { value: 8, at: p(0, 1) })
        );
        assert_eq!(turn.move_tile(4, p(0, 1), p(0, 0)), Err(EngineError::Occupied(p(0, 0))));
        assert_eq!(
            turn.merge_tile(4, p(0, 1), p(0, 0)),
            Err(EngineError::MismatchedMerge(p(0, 0)))
        );
        assert_eq!(
            turn.merge_tile(2, p(0, 0), p(2, 2)),
            Err(EngineError::NoMergeTarget(p(2, 2)))
        );
        assert_eq!(
            turn.move_tile(2, p(0, 0), p(0, 4)),
            Err(EngineError::OutOfRange(p(0, 4)))
        );
    }

    #[test]
    fn test_second_merge_into_same_cell_is_rejected() {
        let mut values = [0; BOARD_CELLS];
        values[0] = 2;
        values[4] = 2;
        values[8] = 2;
        let (grid, mut next_id) = tiles(values);
        let mut turn = TurnBuilder::new(&grid, &mut next_id);

        turn.merge_tile(2, p(1, 0), p(0, 0)).unwrap();
        assert_eq!(
            turn.merge_tile(2, p(2, 0), p(0, 0)),
            Err(EngineError::AlreadyMerged(p(0, 0)))
        );
    }

    #[test]
    fn test_apply_checks_merged_value() {
        let mut values = [0; BOARD_CELLS];
        values[0] = 2;
        values[1] = 2;
        let (grid, mut next_id) = tiles(values);
        let mut turn = TurnBuilder::new(&grid, &mut next_id);

        let bad = TiltEvent::Merge {
            from: p(0, 1),
            to: p(0, 0),
            value: 2,
            merged: 8,
        };
        assert_eq!(turn.apply(&bad), Err(EngineError::InvalidValue(8)));
    }
}
