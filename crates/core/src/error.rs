//! Error types for the board engine and the move projector.

use thiserror::Error;

use crate::types::Position;

/// An operation that would corrupt board or tile state.
///
/// Correct integration never produces one; they are returned, never masked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("square at {0} is out of range")]
    OutOfRange(Position),

    #[error("square at {0} is already occupied")]
    Occupied(Position),

    #[error("{0} is not a valid tile value")]
    InvalidValue(u32),

    #[error("no tile at {0}")]
    NoTile(Position),

    #[error("wrong value ({value}) for tile at {at}")]
    WrongValue { value: u32, at: Position },

    #[error("no tile to merge with at {0}")]
    NoMergeTarget(Position),

    #[error("tile at {0} is already merged")]
    AlreadyMerged(Position),

    #[error("merging mismatched tiles at {0}")]
    MismatchedMerge(Position),

    #[error("must settle pending moves first")]
    AnimationInFlight,
}

/// A persisted snapshot that cannot be restored.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tile in snapshot: {0}")]
    Tile(#[from] EngineError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_square() {
        let err = EngineError::Occupied(Position::new(1, 2));
        assert_eq!(err.to_string(), "square at (1, 2) is already occupied");

        let err = EngineError::WrongValue {
            value: 8,
            at: Position::new(3, 0),
        };
        assert_eq!(err.to_string(), "wrong value (8) for tile at (3, 0)");
    }

    #[test]
    fn snapshot_error_wraps_engine_error() {
        let err: SnapshotError = EngineError::InvalidValue(3).into();
        assert!(matches!(err, SnapshotError::Tile(EngineError::InvalidValue(3))));
    }
}
