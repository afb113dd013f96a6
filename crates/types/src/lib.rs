//! Core types module - shared data structures and constants
//!
//! Everything here is plain data with no external dependencies, so the same
//! types flow through the engine, the session driver and any input adapter.
//!
//! # Board Dimensions
//!
//! The board is `BOARD_SIZE` x `BOARD_SIZE` (4x4). Coordinates are
//! `(row, col)`, row 0 at the top (North edge), col 0 at the left (West edge).
//!
//! # Animation Geometry
//!
//! Tile coordinates used by the move projector are integer "board units":
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TILE_SEP` | 15 | Gap between tiles (and board edge) |
//! | `TILE_SIDE` | 100 | Side of one tile |
//! | `ROW_SPAN` | 115 | Distance between adjacent cell origins |
//! | `MOVE_STEP` | 59 | Distance a sprite travels per tick (about half a cell) |
//! | `TICK_MS` | 16 | Default animation tick (~60 FPS) |
//!
//! # Examples
//!
//! ```
//! use tui_2048_types::{remap, Command, Direction, BOARD_SIZE};
//!
//! // North is the identity frame.
//! assert_eq!(remap(Direction::North, 1, 2), (1, 2));
//!
//! // Canonical row 0 is always the edge tiles slide toward.
//! assert_eq!(remap(Direction::South, 0, 2), (BOARD_SIZE - 1, 2));
//! assert_eq!(remap(Direction::West, 0, 2), (2, 0));
//!
//! let cmd = Command::from_str("left").unwrap();
//! assert_eq!(cmd.direction(), Some(Direction::West));
//! ```

/// Number of rows (and columns) on the board
pub const BOARD_SIZE: usize = 4;

/// Number of cells on the board
pub const BOARD_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

/// Creating a tile of this value wins the game
pub const WIN_VALUE: u32 = 2048;

/// Chance (in percent) that a spawned tile is a 2 rather than a 4
pub const LOW_TILE_PERCENT: u32 = 90;

/// Gap between tiles, in board units
pub const TILE_SEP: i32 = 15;

/// Side length of a tile, in board units
pub const TILE_SIDE: i32 = 100;

/// Distance between the origins of two adjacent cells, in board units
pub const ROW_SPAN: i32 = TILE_SEP + TILE_SIDE;

/// Distance a sprite moves per animation tick, in board units
pub const MOVE_STEP: i32 = 59;

/// Default animation tick interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Board-unit coordinate of the cell origin at row/column `a`
#[inline]
pub const fn to_coord(a: usize) -> i32 {
    TILE_SEP + (a as i32) * ROW_SPAN
}

/// Returns true for values a tile may hold (powers of two, at least 2)
#[inline]
pub const fn is_tile_value(value: u32) -> bool {
    value >= 2 && value.is_power_of_two()
}


/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Flat row-major index, or None if outside the board
    #[inline]
    pub const fn index(self) -> Option<usize> {
        if self.row < BOARD_SIZE && self.col < BOARD_SIZE {
            Some(self.row * BOARD_SIZE + self.col)
        } else {
            None
        }
    }

    /// Position of a flat row-major index
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self {
            row: index / BOARD_SIZE,
            col: index % BOARD_SIZE,
        }
    }

    /// Board-unit coordinate `(x, y)` of this cell's origin
    #[inline]
    pub const fn coord(self) -> (i32, i32) {
        (to_coord(self.col), to_coord(self.row))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The four sides of the board a tilt can slide tiles toward
///
/// - **North**: toward row 0
/// - **East**: toward the last column
/// - **South**: toward the last row
/// - **West**: toward column 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions, in the order game-over probing tries them
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Parse direction from string
    ///
    /// Accepts compass names, single letters and arrow names (case-insensitive):
    /// "north" | "n" | "up", "east" | "e" | "right", ...
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "north" | "n" | "up" => Some(Direction::North),
            "east" | "e" | "right" => Some(Direction::East),
            "south" | "s" | "down" => Some(Direction::South),
            "west" | "w" | "left" => Some(Direction::West),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }

    /// See [`remap`]
    #[inline]
    pub fn remap(self, row: usize, col: usize) -> (usize, usize) {
        remap(self, row, col)
    }
}

/// Translate `(row, col)` in the canonical (North-facing) frame into actual
/// board coordinates for a tilt toward `direction`.
///
/// | direction | row | col |
/// |-----------|-----|-----|
/// | North | r | c |
/// | South | SIZE-1-r | c |
/// | East | c | SIZE-1-r |
/// | West | c | r |
///
/// Canonical row 0 is always the edge tiles slide toward.
#[inline]
pub fn remap(direction: Direction, row: usize, col: usize) -> (usize, usize) {
    match direction {
        Direction::North => (row, col),
        Direction::South => (BOARD_SIZE - 1 - row, col),
        Direction::East => (col, BOARD_SIZE - 1 - row),
        Direction::West => (col, row),
    }
}

/// Symbolic commands accepted by a session, one per turn
///
/// Decoupled from any input device: key maps, scripts and network adapters
/// all translate into this closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    North,
    East,
    South,
    West,
    /// Abandon the current game and start a fresh one
    NewGame,
    /// Stop the session
    Quit,
}

impl Command {
    /// Parse command from string
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_2048_types::Command;
    ///
    /// assert_eq!(Command::from_str("up"), Some(Command::North));
    /// assert_eq!(Command::from_str("newGame"), Some(Command::NewGame));
    /// assert_eq!(Command::from_str("quit"), Some(Command::Quit));
    /// assert_eq!(Command::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        if let Some(dir) = Direction::from_str(s) {
            return Some(dir.into());
        }
        match s.to_lowercase().as_str() {
            "newgame" | "new" | "restart" => Some(Command::NewGame),
            "quit" | "q" => Some(Command::Quit),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::North => "north",
            Command::East => "east",
            Command::South => "south",
            Command::West => "west",
            Command::NewGame => "newGame",
            Command::Quit => "quit",
        }
    }

    /// The tilt direction of a directional command
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Command::North => Some(Direction::North),
            Command::East => Some(Direction::East),
            Command::South => Some(Direction::South),
            Command::West => Some(Direction::West),
            Command::NewGame | Command::Quit => None,
        }
    }
}

impl From<Direction> for Command {
    fn from(value: Direction) -> Self {
        match value {
            Direction::North => Command::North,
            Direction::East => Command::East,
            Direction::South => Command::South,
            Direction::West => Command::West,
        }
    }
}
