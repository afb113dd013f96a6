//! Board engine - owns the grid and applies tilts
//!
//! The tilt algorithm is written once, in the North-facing canonical frame:
//! row 0 is the edge tiles slide toward. [`remap`] translates canonical
//! coordinates into real ones for the other three directions.
//!
//! For each canonical column the rows are scanned top to bottom. Every tile
//! slides toward row 0 across empty cells, then merges into the tile directly
//! above if the values match and that cell has not already received a merge
//! during this tilt. The merge-history mask is what stops `[2, 2, 2, 2]`
//! from collapsing into a single 8.

use arrayvec::ArrayVec;
use tracing::{debug, trace};

use crate::board::Grid;
use crate::error::EngineError;
use crate::rng::{pick_spawn, SimpleRng, SpawnedTile, TileRng};
use crate::snapshot::TileRecord;
use crate::types::{remap, Direction, Position, BOARD_CELLS, BOARD_SIZE, WIN_VALUE};

/// One tile's movement during a committed tilt, in real board coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TiltEvent {
    /// Tile of `value` slid from `from` to `to` without merging
    Slide {
        from: Position,
        to: Position,
        value: u32,
    },
    /// Tile of `value` moved from `from` into the equal tile at `to`,
    /// leaving a single tile of `merged` there
    Merge {
        from: Position,
        to: Position,
        value: u32,
        merged: u32,
    },
}

/// Result of a tilt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TiltResult {
    /// Whether the grid differs from before the tilt
    pub changed: bool,
    /// Tile movements in processing order (empty unless committed)
    pub events: ArrayVec<TiltEvent, BOARD_CELLS>,
    /// Sum of the values of tiles created by merges
    pub score_gained: u32,
    /// Number of merges performed
    pub merges: u32,
}

/// Everything a tilt would do, computed on a scratch grid
#[derive(Debug, Clone)]
struct Slide {
    grid: Grid,
    events: ArrayVec<TiltEvent, BOARD_CELLS>,
    score_gained: u32,
    merges: u32,
    won: bool,
}

/// Run the tilt algorithm over a copy of `grid`
fn slide(grid: &Grid, direction: Direction) -> Slide {
    let mut board = *grid;
    let mut merged = [[false; BOARD_SIZE]; BOARD_SIZE];
    let mut out = Slide {
        grid: board,
        events: ArrayVec::new(),
        score_gained: 0,
        merges: 0,
        won: false,
    };

    let real = |r: usize, c: usize| {
        let (row, col) = remap(direction, r, c);
        Position::new(row, col)
    };

    for c in 0..BOARD_SIZE {
        for r in 0..BOARD_SIZE {
            let value = board.get_tilted(direction, r, c);
            if value == 0 {
                continue;
            }

            let mut dest = r;
            while dest > 0 && board.get_tilted(direction, dest - 1, c) == 0 {
                dest -= 1;
            }
            if dest != r {
                board.set_tilted(direction, r, c, 0);
                board.set_tilted(direction, dest, c, value);
            }

            let can_merge = dest > 0
                && !merged[dest - 1][c]
                && board.get_tilted(direction, dest - 1, c) == value;

            if can_merge {
                let above = dest - 1;
                let new_value = value * 2;
                board.set_tilted(direction, dest, c, 0);
                board.set_tilted(direction, above, c, new_value);
                merged[above][c] = true;

                out.score_gained += new_value;
                out.merges += 1;
                out.won |= new_value == WIN_VALUE;
                out.events.push(TiltEvent::Merge {
                    from: real(r, c),
                    to: real(above, c),
                    value,
                    merged: new_value,
                });
            } else if dest != r {
                out.events.push(TiltEvent::Slide {
                    from: real(r, c),
                    to: real(dest, c),
                    value,
                });
            }
        }
    }

    out.grid = board;
    out
}

/// Snapshot of a game session, returned by value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionState {
    pub grid: Grid,
    pub score: u32,
    pub max_score: u32,
    pub occupied: usize,
    pub won: bool,
    pub game_over: bool,
    /// Set once the terminal state has been marked for display
    pub ended: bool,
}

/// The board engine: grid, score and terminal flags for one session
#[derive(Debug, Clone)]
pub struct BoardEngine<R = SimpleRng> {
    grid: Grid,
    /// Occupied cell count, kept in step with `grid`
    count: usize,
    score: u32,
    max_score: u32,
    won: bool,
    ended: bool,
    rng: R,
}

impl BoardEngine<SimpleRng> {
    /// Create an empty engine with a seeded [`SimpleRng`]
    pub fn new(seed: u32) -> Self {
        Self::with_rng(SimpleRng::new(seed))
    }
}

impl<R: TileRng> BoardEngine<R> {
    /// Create an empty engine drawing spawns from `rng`
    pub fn with_rng(rng: R) -> Self {
        Self {
            grid: Grid::new(),
            count: 0,
            score: 0,
            max_score: 0,
            won: false,
            ended: false,
            rng,
        }
    }

    /// Empty the grid and reset score and flags; max score is preserved
    pub fn new_game(&mut self) -> SessionState {
        self.grid.clear();
        self.count = 0;
        self.score = 0;
        self.won = false;
        self.ended = false;
        debug!(max_score = self.max_score, "new game");
        self.state()
    }

    /// Add a 2 (90%) or 4 at a random empty cell; no-op on a full board
    pub fn spawn_random_tile(&mut self) -> Option<SpawnedTile> {
        if self.count == BOARD_CELLS {
            return None;
        }
        let empty = self.grid.empty_cells();
        let tile = pick_spawn(&mut self.rng, &empty)?;
        self.grid.set(tile.at, tile.value);
        self.count += 1;
        trace!(value = tile.value, row = tile.at.row, col = tile.at.col, "spawned tile");
        Some(tile)
    }

    /// Tilt the board toward `direction`.
    ///
    /// With `commit = false` the tilt runs on a scratch copy only: grid, score
    /// and count are untouched and no events are returned. With
    /// `commit = true` the result is applied and the tile events recorded.
    pub fn tilt(&mut self, direction: Direction, commit: bool) -> TiltResult {
        let outcome = slide(&self.grid, direction);
        let changed = outcome.grid != self.grid;

        if !commit {
            return TiltResult {
                changed,
                events: ArrayVec::new(),
                score_gained: outcome.score_gained,
                merges: outcome.merges,
            };
        }

        if changed {
            self.grid = outcome.grid;
            self.count -= outcome.merges as usize;
            self.score = self.score.saturating_add(outcome.score_gained);
            self.max_score = self.max_score.max(self.score);
            self.won |= outcome.won;
        }
        trace!(
            direction = direction.as_str(),
            changed,
            merges = outcome.merges,
            score = self.score,
            "tilt"
        );

        TiltResult {
            changed,
            events: outcome.events,
            score_gained: outcome.score_gained,
            merges: outcome.merges,
        }
    }

    /// Would tilting toward `direction` change the board?
    pub fn probe(&self, direction: Direction) -> bool {
        slide(&self.grid, direction).grid != self.grid
    }

    /// True once the game is won, or when the board is full and no tilt
    /// changes it
    pub fn is_game_over(&self) -> bool {
        if self.won {
            return true;
        }
        if self.count < BOARD_CELLS {
            return false;
        }
        !Direction::ALL.iter().any(|&dir| self.probe(dir))
    }

    /// Mark the terminal state for display (idempotent)
    pub fn end_game(&mut self) {
        if !self.ended {
            debug!(score = self.score, won = self.won, "game ended");
        }
        self.ended = true;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    /// Restore scores; the max becomes the greater of the two
    pub fn set_score(&mut self, score: u32, max_score: u32) {
        self.score = score;
        self.max_score = max_score.max(score);
    }

    /// Place a single tile directly, bypassing the tilt algorithm
    pub fn place_tile(&mut self, value: u32, at: Position) -> Result<(), EngineError> {
        self.grid.place(value, at)?;
        self.count += 1;
        Ok(())
    }

    /// Replace the grid with `tiles`, bypassing the tilt algorithm.
    ///
    /// All records are validated before anything is written, so on error the
    /// current grid is left as it was.
    pub fn load_tiles(&mut self, tiles: &[TileRecord]) -> Result<(), EngineError> {
        let mut grid = Grid::new();
        for tile in tiles {
            grid.place(tile.value, tile.position())?;
        }
        self.grid = grid;
        self.count = tiles.len();
        debug!(tiles = self.count, "loaded tiles");
        Ok(())
    }

    /// Occupied cells in row-major order
    pub fn tiles(&self) -> Vec<TileRecord> {
        self.grid
            .cells()
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0)
            .map(|(i, &v)| TileRecord::new(v, Position::from_index(i)))
            .collect()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn occupied_count(&self) -> usize {
        self.count
    }

    pub fn won(&self) -> bool {
        self.won
    }

    pub fn ended(&self) -> bool {
        self.ended
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            grid: self.grid,
            score: self.score,
            max_score: self.max_score,
            occupied: self.count,
            won: self.won,
            game_over: self.is_game_over(),
            ended: self.ended,
        }
    }
}

impl Default for BoardEngine<SimpleRng> {
    fn default() -> Self {
        Self::new(1)
    }
}
