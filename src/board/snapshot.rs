//! Board snapshots for save/load and network resync.
//!
//! A snapshot carries the robot state and round state the save-file and
//! lobby collaborators exchange. Card piles stay with the live board.
//! Snapshots are serde types with a compact bincode encoding.

use serde::{Deserialize, Serialize};

use crate::core::{EngineResult, Heading, PlayerId};

use super::grid::Board;
use super::phase::Phase;
use super::space::Coord;

/// Saved state of one robot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub name: String,
    pub color: String,
    pub position: Option<Coord>,
    pub heading: Heading,
    pub energy: u32,
    pub checkpoint: u32,
}

/// Saved state of a board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub course: String,
    pub width: u16,
    pub height: u16,
    pub game_id: Option<u64>,
    pub phase: Phase,
    pub step: usize,
    pub round: u32,
    pub roster: Vec<PlayerId>,
    pub current_player: Option<PlayerId>,
    pub current_turn: Option<PlayerId>,
    /// Robots by seat.
    pub players: Vec<PlayerSnapshot>,
}

impl BoardSnapshot {
    /// Encode with bincode.
    ///
    /// # Errors
    ///
    /// `Snapshot` if encoding fails.
    pub fn to_bytes(&self) -> EngineResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode bytes produced by `to_bytes`.
    ///
    /// # Errors
    ///
    /// `Snapshot` if the bytes are not a valid snapshot.
    pub fn from_bytes(bytes: &[u8]) -> EngineResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl Board {
    /// Capture the current state.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            course: self.name.clone(),
            width: self.width,
            height: self.height,
            game_id: self.game_id,
            phase: self.phase,
            step: self.step,
            round: self.round,
            roster: self.roster.clone(),
            current_player: self.current_player,
            current_turn: self.current_turn,
            players: self
                .players
                .iter()
                .map(|p| PlayerSnapshot {
                    name: p.name().to_string(),
                    color: p.color().to_string(),
                    position: p.position(),
                    heading: p.heading(),
                    energy: p.energy(),
                    checkpoint: p.checkpoint(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Course;
    use crate::core::{EngineError, GameConfig};

    #[test]
    fn test_snapshot_captures_robots() {
        let mut board = Board::new(&Course::new("snap", 3, 3), GameConfig::default()).unwrap();
        let robot = board.add_player("Player 1").unwrap();
        board.place(robot, Some(Coord::new(2, 1)));
        board.set_game_id(11).unwrap();

        let snapshot = board.snapshot();
        assert_eq!(snapshot.game_id, Some(11));
        assert_eq!(snapshot.players[0].position, Some(Coord::new(2, 1)));
        assert_eq!(snapshot.players[0].heading, Heading::South);
        assert_eq!(snapshot.roster, vec![robot]);

        let bytes = snapshot.to_bytes().unwrap();
        assert_eq!(BoardSnapshot::from_bytes(&bytes).unwrap(), snapshot);
    }

    #[test]
    fn test_garbage_bytes_fail() {
        assert!(matches!(
            BoardSnapshot::from_bytes(&[0xff, 0xff, 0xff]),
            Err(EngineError::Snapshot(_))
        ));
    }
}
