//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds the rules of the sliding-tile merge puzzle and the
//! bookkeeping a renderer needs to animate them. It has **zero dependencies**
//! on UI, storage or platform code:
//!
//! - **Deterministic**: the same seed produces the same spawns and games
//! - **Testable**: every rule is covered by unit tests next to the code
//! - **Portable**: runs headless, in a terminal, or behind any host UI
//!
//! # Module Structure
//!
//! - [`board`]: the 4x4 value grid
//! - [`engine`]: the board engine (tilt, merge, spawn, game over, score)
//! - [`rng`]: seedable random tile selection
//! - [`turn`]: the before / merging / after record of one committed tilt
//! - [`projector`]: move/merge/spawn operations and the settle animation
//! - [`snapshot`]: serde save/restore payload
//! - [`error`]: invalid-operation and snapshot errors
//!
//! # Example
//!
//! ```
//! use tui_2048_core::{BoardEngine, MoveProjector};
//! use tui_2048_types::Direction;
//!
//! let mut engine = BoardEngine::new(12345);
//! let mut projector = MoveProjector::new();
//!
//! for _ in 0..2 {
//!     let tile = engine.spawn_random_tile().unwrap();
//!     projector.spawn(tile.value, tile.at).unwrap();
//! }
//!
//! let result = engine.tilt(Direction::West, true);
//! if result.changed {
//!     let record = projector.record(&result.events).unwrap();
//!     let ops = projector.project(record);
//!     assert!(!ops.is_empty());
//!     projector.settle();
//! }
//! assert_eq!(&projector.values(), engine.grid().cells());
//! ```

pub mod board;
pub mod engine;
pub mod error;
pub mod projector;
pub mod rng;
pub mod snapshot;
pub mod turn;

pub use tui_2048_types as types;

// Re-export commonly used types for convenience
pub use board::Grid;
pub use engine::{BoardEngine, SessionState, TiltEvent, TiltResult};
pub use error::{EngineError, SnapshotError};
pub use projector::{AnimationPhase, MoveOp, MoveProjector, Sprite};
pub use rng::{SimpleRng, SpawnedTile, TileRng};
pub use snapshot::{SessionSnapshot, TileRecord};
pub use turn::{Tile, TileId, TurnRecord};
