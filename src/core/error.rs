//! Engine error type.
//!
//! Only construction-time invariant violations and direct coordinate
//! lookups produce errors. Movement that runs into the edge of the board,
//! a wall or an immovable robot simply stops, and refused phase transitions
//! are reported as `false`.

use thiserror::Error;

use super::player::PlayerId;

/// Errors reported synchronously to the caller.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("coordinates ({x}, {y}) are out of board bounds")]
    OutOfBounds { x: i64, y: i64 },

    #[error("a player named {0:?} is already seated")]
    DuplicatePlayer(String),

    #[error("maximum number of players ({max}) reached")]
    TooManyPlayers { max: usize },

    #[error("game id is already {current}; it may not be changed to {requested}")]
    GameIdAlreadySet { current: u64, requested: u64 },

    #[error("no player in {0}")]
    UnknownPlayer(PlayerId),

    #[error("no seated player named {0:?}")]
    UnknownPlayerName(String),

    #[error("invalid course: {0}")]
    InvalidCourse(String),

    #[error(
        "remote state does not match {expected} seats ({positions} positions, {headings} headings)"
    )]
    SeatCountMismatch {
        expected: usize,
        positions: usize,
        headings: usize,
    },

    #[error("two robots cannot both stand on ({x}, {y})")]
    OverlappingRobots { x: u16, y: u16 },

    #[error("unknown heading {0:?}")]
    UnknownHeading(String),

    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    #[error("{command} is not an option of the pending interactive card")]
    NotAnOption { command: String },

    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("snapshot does not fit this board: expected {expected}, found {found}")]
    SnapshotMismatch { expected: String, found: String },
}

/// Result alias for fallible engine calls.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = EngineError::OutOfBounds { x: 5, y: -1 };
        assert_eq!(err.to_string(), "coordinates (5, -1) are out of board bounds");

        let err = EngineError::TooManyPlayers { max: 6 };
        assert!(err.to_string().contains('6'));

        let err = EngineError::UnknownPlayer(PlayerId::new(3));
        assert_eq!(err.to_string(), "no player in Seat(3)");
    }
}
