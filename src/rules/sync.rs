//! Forcing state from outside: save/load and lobby resync.
//!
//! The lobby collaborator periodically supplies robot positions and
//! headings by seat plus the name of the robot whose turn it is. The
//! save/load collaborator supplies whole `BoardSnapshot`s. Both calls are
//! atomic: every value is checked before the first field is written, so a
//! rejected update leaves the board untouched.

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::board::{Board, BoardSnapshot, Coord, Phase};
use crate::core::{EngineError, EngineResult, Heading, PlayerId};
use crate::events::GameEvent;

use super::controller::GameController;

impl Board {
    /// Put a robot on `(x, y)` directly, without pushing.
    ///
    /// Returns `Ok(false)` if another robot already stands there.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` for coordinates off the grid, `UnknownPlayer` for an
    /// empty seat.
    pub fn move_to(&mut self, player: PlayerId, x: i64, y: i64) -> EngineResult<bool> {
        if !self.in_bounds(x, y) {
            return Err(EngineError::OutOfBounds { x, y });
        }
        self.require(player)?;
        let placed = self.place(player, Some(Coord::new(x as u16, y as u16)));
        if !placed {
            debug!(player = player.index(), x, y, "Target space is occupied");
        }
        Ok(placed)
    }

    fn check_positions(&self, positions: &[Option<Coord>]) -> EngineResult<()> {
        let mut taken = FxHashSet::default();
        for coord in positions.iter().flatten() {
            if self.space(*coord).is_none() {
                return Err(EngineError::OutOfBounds {
                    x: i64::from(coord.x),
                    y: i64::from(coord.y),
                });
            }
            if !taken.insert(*coord) {
                return Err(EngineError::OverlappingRobots {
                    x: coord.x,
                    y: coord.y,
                });
            }
        }
        Ok(())
    }

    /// Move every robot to its given position, lifting all of them first
    /// so robots can swap places.
    fn relocate_all(&mut self, positions: &[Option<Coord>]) {
        for seat in PlayerId::all(self.players.len()) {
            self.place(seat, None);
        }
        for (seat, &position) in PlayerId::all(self.players.len()).zip(positions) {
            self.place(seat, position);
        }
    }

    /// Replace positions, headings and the current turn with the lobby's.
    ///
    /// `positions` and `headings` are ordered by seat.
    ///
    /// # Errors
    ///
    /// `SeatCountMismatch` if either list does not have one entry per
    /// seat, `OutOfBounds` or `OverlappingRobots` for bad positions,
    /// `UnknownHeading` and `UnknownPlayerName` for unparseable values.
    pub fn apply_remote_state(
        &mut self,
        positions: &[(u16, u16)],
        headings: &[String],
        current_turn: Option<&str>,
    ) -> EngineResult<()> {
        let expected = self.players.len();
        if positions.len() != expected || headings.len() != expected {
            warn!(
                expected,
                positions = positions.len(),
                headings = headings.len(),
                "Rejected remote state"
            );
            return Err(EngineError::SeatCountMismatch {
                expected,
                positions: positions.len(),
                headings: headings.len(),
            });
        }

        let coords: Vec<Option<Coord>> = positions
            .iter()
            .map(|&(x, y)| Some(Coord::new(x, y)))
            .collect();
        let parsed: Vec<Heading> = headings
            .iter()
            .map(|h| h.parse::<Heading>())
            .collect::<EngineResult<_>>()
            .map_err(|err| {
                warn!(%err, "Rejected remote headings");
                err
            })?;
        let turn = current_turn
            .map(|name| {
                self.player_id(name)
                    .ok_or_else(|| EngineError::UnknownPlayerName(name.to_string()))
            })
            .transpose()?;
        if let Err(err) = self.check_positions(&coords) {
            warn!(%err, "Rejected remote positions");
            return Err(err);
        }

        self.relocate_all(&coords);
        for (seat, heading) in PlayerId::all(expected).zip(parsed) {
            self.set_heading(seat, heading);
        }
        if let Some(turn) = turn {
            self.current_turn = Some(turn);
        }
        Ok(())
    }

    /// Overwrite robot and round state from a snapshot of this game.
    fn restore(&mut self, snapshot: &BoardSnapshot) -> EngineResult<()> {
        let mismatch = |expected: String, found: String| {
            warn!(%expected, %found, "Rejected snapshot");
            Err(EngineError::SnapshotMismatch { expected, found })
        };

        if (snapshot.width, snapshot.height) != (self.width, self.height) {
            return mismatch(
                format!("{}x{} grid", self.width, self.height),
                format!("{}x{} grid", snapshot.width, snapshot.height),
            );
        }
        if snapshot.players.len() != self.players.len() {
            return mismatch(
                format!("{} players", self.players.len()),
                format!("{} players", snapshot.players.len()),
            );
        }
        for (robot, saved) in self.players.iter().zip(&snapshot.players) {
            if robot.name() != saved.name {
                return mismatch(robot.name().to_string(), saved.name.clone());
            }
        }
        let mut roster = snapshot.roster.clone();
        roster.sort_unstable();
        if roster != PlayerId::all(self.players.len()).collect::<Vec<_>>() {
            return mismatch(
                format!("roster of {} seats", self.players.len()),
                format!("{:?}", snapshot.roster),
            );
        }
        if snapshot.step >= self.config.register_count {
            return mismatch(
                format!("step below {}", self.config.register_count),
                format!("step {}", snapshot.step),
            );
        }
        let executing = matches!(snapshot.phase, Phase::Activation | Phase::PlayerInteraction);
        if executing && snapshot.current_player.is_none() {
            return mismatch(
                format!("current robot during {}", snapshot.phase),
                "no current robot".to_string(),
            );
        }
        for seat in [snapshot.current_player, snapshot.current_turn]
            .into_iter()
            .flatten()
        {
            self.require(seat)?;
        }
        if let (Some(current), Some(requested)) = (self.game_id, snapshot.game_id) {
            if current != requested {
                return Err(EngineError::GameIdAlreadySet { current, requested });
            }
        }
        let positions: Vec<Option<Coord>> =
            snapshot.players.iter().map(|saved| saved.position).collect();
        self.check_positions(&positions)?;

        self.relocate_all(&positions);
        for (seat, saved) in PlayerId::all(self.players.len()).zip(&snapshot.players) {
            self.set_heading(seat, saved.heading);
            let robot = &mut self.players[seat.index()];
            robot.set_energy(saved.energy);
            robot.set_checkpoint(saved.checkpoint);
            self.events.push(GameEvent::EnergyChanged {
                player: seat,
                energy: saved.energy,
            });
        }
        self.set_phase(snapshot.phase);
        self.set_step(snapshot.step);
        self.round = snapshot.round;
        self.roster = snapshot.roster.clone();
        self.register_order = snapshot.roster.clone();
        self.events.push(GameEvent::TurnOrderChanged {
            order: self.roster.clone(),
        });
        self.current_player = snapshot.current_player;
        self.current_turn = snapshot.current_turn;
        if snapshot.game_id.is_some() {
            self.game_id = snapshot.game_id;
        }
        Ok(())
    }
}

impl GameController {
    /// See [`Board::move_to`].
    ///
    /// # Errors
    ///
    /// As `Board::move_to`.
    pub fn move_to(&mut self, player: PlayerId, x: i64, y: i64) -> EngineResult<bool> {
        self.board.move_to(player, x, y)
    }

    /// See [`Board::apply_remote_state`].
    ///
    /// # Errors
    ///
    /// As `Board::apply_remote_state`.
    pub fn apply_remote_state(
        &mut self,
        positions: &[(u16, u16)],
        headings: &[String],
        current_turn: Option<&str>,
    ) -> EngineResult<()> {
        self.board.apply_remote_state(positions, headings, current_turn)
    }

    /// Force the board to a saved state of this game.
    ///
    /// The snapshot must come from a board with the same grid size and the
    /// same robots in the same seats. Any detected winner is forgotten and
    /// checked again against the restored state.
    ///
    /// # Errors
    ///
    /// `SnapshotMismatch` if the snapshot belongs to a different game,
    /// `OutOfBounds` or `OverlappingRobots` for bad positions,
    /// `GameIdAlreadySet` if the game ids disagree.
    pub fn re_initialize(&mut self, snapshot: &BoardSnapshot) -> EngineResult<()> {
        self.board.restore(snapshot)?;
        self.winner = None;
        self.check_winner();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Course;
    use crate::core::GameConfig;

    fn board(players: usize) -> Board {
        let mut board = Board::new(&Course::new("sync", 4, 4), GameConfig::default()).unwrap();
        board.seat_players(players).unwrap();
        board
    }

    fn headings(names: &[&str]) -> Vec<String> {
        names.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn test_move_to() {
        let mut board = board(2);
        let (a, b) = (PlayerId::new(0), PlayerId::new(1));

        assert!(board.move_to(a, 1, 1).unwrap());
        assert!(!board.move_to(b, 1, 1).unwrap());
        assert_eq!(board.player(b).unwrap().position(), None);
        assert!(matches!(
            board.move_to(a, 4, 0),
            Err(EngineError::OutOfBounds { x: 4, y: 0 })
        ));
        assert_eq!(board.player(a).unwrap().position(), Some(Coord::new(1, 1)));
    }

    #[test]
    fn test_apply_remote_state() {
        let mut board = board(2);
        board
            .apply_remote_state(&[(0, 0), (3, 3)], &headings(&["east", "north"]), Some("Player 2"))
            .unwrap();

        assert_eq!(board.positions(), vec![Some(Coord::new(0, 0)), Some(Coord::new(3, 3))]);
        assert_eq!(board.headings_to_strings(), headings(&["east", "north"]));
        assert_eq!(board.current_turn(), Some(PlayerId::new(1)));
    }

    #[test]
    fn test_robots_can_swap_places() {
        let mut board = board(2);
        board
            .apply_remote_state(&[(0, 0), (1, 0)], &headings(&["south", "south"]), None)
            .unwrap();
        board
            .apply_remote_state(&[(1, 0), (0, 0)], &headings(&["south", "south"]), None)
            .unwrap();
        assert_eq!(board.positions(), vec![Some(Coord::new(1, 0)), Some(Coord::new(0, 0))]);
    }

    #[test]
    fn test_remote_state_is_atomic() {
        let mut board = board(2);
        board.move_to(PlayerId::new(0), 2, 2).unwrap();

        let err = board
            .apply_remote_state(&[(0, 0)], &headings(&["east", "east"]), None)
            .unwrap_err();
        assert!(matches!(err, EngineError::SeatCountMismatch { expected: 2, .. }));

        let err = board
            .apply_remote_state(&[(0, 0), (1, 1)], &headings(&["east", "up"]), None)
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownHeading(_)));

        let err = board
            .apply_remote_state(&[(0, 0), (9, 1)], &headings(&["east", "east"]), None)
            .unwrap_err();
        assert!(matches!(err, EngineError::OutOfBounds { .. }));

        let err = board
            .apply_remote_state(&[(0, 0), (0, 0)], &headings(&["east", "east"]), None)
            .unwrap_err();
        assert!(matches!(err, EngineError::OverlappingRobots { x: 0, y: 0 }));

        let err = board
            .apply_remote_state(&[(0, 0), (1, 1)], &headings(&["east", "east"]), Some("Nobody"))
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownPlayerName(_)));

        assert_eq!(board.player(PlayerId::new(0)).unwrap().position(), Some(Coord::new(2, 2)));
        assert_eq!(board.player(PlayerId::new(0)).unwrap().heading(), Heading::South);
    }

    #[test]
    fn test_re_initialize() {
        let mut source = board(2);
        source.move_to(PlayerId::new(0), 3, 0).unwrap();
        source.set_heading(PlayerId::new(1), Heading::West);
        source.determine_turn(3, 0);
        source.set_phase(Phase::Programming);
        let snapshot = source.snapshot();

        let mut game = GameController::new(board(2));
        game.re_initialize(&snapshot).unwrap();

        let restored = game.board();
        assert_eq!(restored.phase(), Phase::Programming);
        assert_eq!(restored.roster(), snapshot.roster.as_slice());
        assert_eq!(restored.player(PlayerId::new(0)).unwrap().position(), Some(Coord::new(3, 0)));
        assert_eq!(restored.player(PlayerId::new(1)).unwrap().heading(), Heading::West);
    }

    #[test]
    fn test_activation_snapshot_needs_current_robot() {
        let mut source = board(2);
        source.move_to(PlayerId::new(1), 0, 0).unwrap();
        source.determine_turn(0, 0);
        source.set_phase(Phase::Activation);
        let mut snapshot = source.snapshot();
        snapshot.current_player = None;

        let mut game = GameController::new(board(2));
        assert!(matches!(
            game.re_initialize(&snapshot),
            Err(EngineError::SnapshotMismatch { .. })
        ));
        assert_eq!(game.board().phase(), Phase::Initialisation);

        snapshot.current_player = Some(PlayerId::new(1));
        game.re_initialize(&snapshot).unwrap();
        assert_eq!(game.board().register_order, snapshot.roster);
        assert_eq!(game.board().current_player(), Some(PlayerId::new(1)));
    }

    #[test]
    fn test_re_initialize_rejects_foreign_snapshot() {
        let snapshot = board(3).snapshot();
        let mut game = GameController::new(board(2));
        assert!(matches!(
            game.re_initialize(&snapshot),
            Err(EngineError::SnapshotMismatch { .. })
        ));
    }
}
