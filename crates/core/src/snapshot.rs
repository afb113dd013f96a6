//! Save/restore payload for a session

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::types::Position;

/// One occupied cell in a persisted snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRecord {
    pub value: u32,
    pub row: usize,
    pub col: usize,
}

impl TileRecord {
    pub fn new(value: u32, at: Position) -> Self {
        Self {
            value,
            row: at.row,
            col: at.col,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }
}

/// Save/restore payload: current score and the tiles on the board.
///
/// The max score is kept by the host separately and is not part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub score: u32,
    pub tiles: Vec<TileRecord>,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}
