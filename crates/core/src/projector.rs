//! Move projector - turns committed tilts into animatable operations
//!
//! The projector mirrors the engine grid with tile identities. For each turn
//! it receives the [`TurnRecord`] by value, derives the ordered [`MoveOp`]
//! sequence a renderer needs, and runs a small discrete-time animation:
//!
//! ```text
//! Idle --project--> Animating --tick (nothing moved)--> Settled
//! ```
//!
//! Every [`MoveProjector::tick`] advances in-flight sprites toward their
//! destination by `MOVE_STEP` board units, never overshooting. A cell whose
//! sprites have arrived (or never moved) snaps to its final tile. None of this
//! feeds back into score or game over.

use crate::engine::TiltEvent;
use crate::error::EngineError;
use crate::snapshot::TileRecord;
use crate::turn::{Tile, TileGrid, TileId, Tracked, TurnBuilder, TurnRecord};
use crate::types::{is_tile_value, Position, BOARD_CELLS, MOVE_STEP};

/// One animatable operation of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveOp {
    /// `tile` slides from `from` to the empty cell `to`
    Move {
        tile: TileId,
        from: Position,
        to: Position,
    },
    /// `tile` slides from `from` into `into` resting at `to`; both are
    /// replaced by `result` of `value`
    Merge {
        tile: TileId,
        into: TileId,
        result: TileId,
        from: Position,
        to: Position,
        value: u32,
    },
    /// A new tile appears at `at`
    Spawn {
        tile: TileId,
        value: u32,
        at: Position,
    },
}

/// A tile as drawn in the current animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sprite {
    pub id: TileId,
    pub value: u32,
    /// Board-unit coordinate of the tile's top-left corner
    pub x: i32,
    pub y: i32,
}

impl Sprite {
    fn at(tile: Tile, pos: Position) -> Self {
        let (x, y) = pos.coord();
        Self {
            id: tile.id,
            value: tile.value,
            x,
            y,
        }
    }

    /// Advance one step toward `(x, y)`; returns true if it moved
    fn step_toward(&mut self, x: i32, y: i32) -> bool {
        if self.x == x && self.y == y {
            return false;
        }
        self.x = step(self.x, x);
        self.y = step(self.y, y);
        true
    }
}

fn step(from: i32, to: i32) -> i32 {
    if from > to {
        to.max(from - MOVE_STEP)
    } else if from < to {
        to.min(from + MOVE_STEP)
    } else {
        from
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationPhase {
    /// Nothing has been projected since the last reset
    Idle,
    /// At least one sprite has not reached its destination
    Animating,
    /// The last projected turn has come to rest
    Settled,
}

/// Per-destination-cell animation state
#[derive(Debug, Clone, Copy, Default)]
struct CellAnim {
    moving: Option<Sprite>,
    merging: Option<Sprite>,
    after: Option<Tile>,
}

#[derive(Debug, Clone)]
pub struct MoveProjector {
    /// Settled tile identities, mirroring the engine grid
    tiles: TileGrid,
    /// Last id handed out
    next_id: u32,
    phase: AnimationPhase,
    cells: [CellAnim; BOARD_CELLS],
    /// Current frame
    sprites: Vec<Sprite>,
}

impl MoveProjector {
    pub fn new() -> Self {
        Self {
            tiles: [None; BOARD_CELLS],
            next_id: 0,
            phase: AnimationPhase::Idle,
            cells: [CellAnim::default(); BOARD_CELLS],
            sprites: Vec::with_capacity(2 * BOARD_CELLS),
        }
    }

    /// Drop all tiles and any in-flight animation. Ids keep increasing.
    pub fn reset(&mut self) {
        self.tiles = [None; BOARD_CELLS];
        self.cells = [CellAnim::default(); BOARD_CELLS];
        self.sprites.clear();
        self.phase = AnimationPhase::Idle;
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        self.phase == AnimationPhase::Animating
    }

    /// Sprites of the current frame
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    /// Settled tile at a cell
    pub fn tile_at(&self, at: Position) -> Option<Tile> {
        at.index().and_then(|i| self.tiles[i])
    }

    /// Values of the settled tiles, row-major (0 = empty)
    pub fn values(&self) -> [u32; BOARD_CELLS] {
        let mut out = [0; BOARD_CELLS];
        for (slot, tile) in out.iter_mut().zip(self.tiles.iter()) {
            *slot = tile.map_or(0, |t| t.value);
        }
        out
    }

    fn alloc_id(&mut self) -> TileId {
        self.next_id += 1;
        TileId(self.next_id)
    }

    /// Place a new tile immediately, without animation
    pub fn spawn(&mut self, value: u32, at: Position) -> Result<MoveOp, EngineError> {
        if self.is_animating() {
            return Err(EngineError::AnimationInFlight);
        }
        let idx = at.index().ok_or(EngineError::OutOfRange(at))?;
        if !is_tile_value(value) {
            return Err(EngineError::InvalidValue(value));
        }
        if self.tiles[idx].is_some() {
            return Err(EngineError::Occupied(at));
        }

        let tile = Tile {
            id: self.alloc_id(),
            value,
        };
        self.tiles[idx] = Some(tile);
        self.sprites.push(Sprite::at(tile, at));
        Ok(MoveOp::Spawn {
            tile: tile.id,
            value,
            at,
        })
    }

    /// Replace all tiles from a snapshot, without animation
    pub fn load(&mut self, records: &[TileRecord]) -> Result<(), EngineError> {
        let mut tiles: TileGrid = [None; BOARD_CELLS];
        for record in records {
            let at = record.position();
            let idx = at.index().ok_or(EngineError::OutOfRange(at))?;
            if !is_tile_value(record.value) {
                return Err(EngineError::InvalidValue(record.value));
            }
            if tiles[idx].is_some() {
                return Err(EngineError::Occupied(at));
            }
            tiles[idx] = Some(Tile {
                id: self.alloc_id(),
                value: record.value,
            });
        }
        self.reset();
        self.tiles = tiles;
        self.show_settled();
        Ok(())
    }

    /// Build the turn record for a committed tilt's events
    pub fn record(&mut self, events: &[TiltEvent]) -> Result<TurnRecord, EngineError> {
        if self.is_animating() {
            return Err(EngineError::AnimationInFlight);
        }
        let mut turn = TurnBuilder::new(&self.tiles, &mut self.next_id);
        for event in events {
            turn.apply(event)?;
        }
        Ok(turn.finish())
    }

    /// Derive the ordered operations of `record` and start animating it.
    ///
    /// Operations are listed in row-major order of the destination cell;
    /// where a merge target itself slid this turn, its `Move` comes first.
    pub fn project(&mut self, record: TurnRecord) -> Vec<MoveOp> {
        let mut ops = Vec::new();

        for i in 0..BOARD_CELLS {
            let to = Position::from_index(i);
            if let Some(landed) = record.before[i] {
                if landed.from != to {
                    ops.push(MoveOp::Move {
                        tile: landed.tile.id,
                        from: landed.from,
                        to,
                    });
                }
                if let (Some(src), Some(result)) = (record.merging[i], record.after[i]) {
                    ops.push(MoveOp::Merge {
                        tile: src.tile.id,
                        into: landed.tile.id,
                        result: result.id,
                        from: src.from,
                        to,
                        value: result.value,
                    });
                }
            }

            self.cells[i] = CellAnim {
                moving: record.before[i].map(Self::origin_sprite),
                merging: record.merging[i].map(Self::origin_sprite),
                after: record.after[i],
            };
        }

        self.tiles = record.after;
        self.sprites.clear();
        for cell in &self.cells {
            self.sprites.extend(cell.moving);
            self.sprites.extend(cell.merging);
        }
        self.phase = AnimationPhase::Animating;
        ops
    }

    fn origin_sprite(tracked: Tracked) -> Sprite {
        Sprite::at(tracked.tile, tracked.from)
    }

    /// Advance the animation by one step.
    pub fn tick(&mut self) -> AnimationPhase {
        if self.phase != AnimationPhase::Animating {
            return self.phase;
        }

        let mut changing = false;
        self.sprites.clear();
        for i in 0..BOARD_CELLS {
            let (x, y) = Position::from_index(i).coord();
            let cell = &mut self.cells[i];

            let mut moved = false;
            if let Some(sprite) = cell.moving.as_mut() {
                moved |= sprite.step_toward(x, y);
            }
            if let Some(sprite) = cell.merging.as_mut() {
                moved |= sprite.step_toward(x, y);
            }

            if moved {
                self.sprites.extend(cell.moving);
                self.sprites.extend(cell.merging);
            } else {
                // Arrived (or never moved): show the resting tile.
                cell.moving = None;
                cell.merging = None;
                if let Some(tile) = cell.after {
                    self.sprites.push(Sprite { id: tile.id, value: tile.value, x, y });
                }
            }
            changing |= moved;
        }

        if !changing {
            self.phase = AnimationPhase::Settled;
            self.cells = [CellAnim::default(); BOARD_CELLS];
        }
        self.phase
    }

    /// Run the animation to completion, returning the number of ticks taken
    pub fn settle(&mut self) -> u32 {
        let mut ticks = 0;
        while self.tick() == AnimationPhase::Animating {
            ticks += 1;
        }
        ticks
    }

    fn show_settled(&mut self) {
        self.sprites.clear();
        for (i, tile) in self.tiles.iter().enumerate() {
            if let Some(tile) = *tile {
                self.sprites.push(Sprite::at(tile, Position::from_index(i)));
            }
        }
    }
}

impl Default for MoveProjector {
    fn default() -> Self {
        Self::new()
    }
}
