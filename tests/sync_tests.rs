//! Checkpoint, resync and save/load tests.
//!
//! Covers forcing robots onto spaces with `move_to`, the lobby's bulk
//! `apply_remote_state`, snapshot round trips through `re_initialize`, and
//! loading courses from JSON.

use proptest::prelude::*;
use rust_rally::board::{Board, BoardSnapshot, Coord, Course, Phase, SpaceKind};
use rust_rally::cards::Command;
use rust_rally::core::{EngineError, GameConfig, Heading, PlayerId};
use rust_rally::rules::GameController;

fn three_checkpoints() -> Course {
    Course::new("checkpoints", 3, 1)
        .with_space(0, 0, SpaceKind::Checkpoint(1), Heading::North)
        .with_space(1, 0, SpaceKind::Checkpoint(2), Heading::North)
        .with_space(2, 0, SpaceKind::Checkpoint(3), Heading::North)
}

/// A robot placed by hand wins once it has reached all three checkpoints.
#[test]
fn test_three_checkpoint_win() {
    let mut board = Board::new(&three_checkpoints(), GameConfig::default()).unwrap();
    let robot = board.add_player("Player 1").unwrap();
    assert_eq!(board.player(robot).unwrap().position(), None);
    assert_eq!(board.checkpoint_count(), 3);

    for x in 0..3u16 {
        assert!(board.move_to(robot, i64::from(x), 0).unwrap());
        assert_eq!(board.get_winner(), None);
        board.activate_space(Coord::new(x, 0));
    }

    assert_eq!(board.player(robot).unwrap().checkpoint(), 3);
    assert_eq!(board.get_winner(), Some(robot));
}

/// `move_to` refuses spaces off the grid and spaces already taken.
#[test]
fn test_move_to_rules() {
    let mut board = Board::new(&three_checkpoints(), GameConfig::default()).unwrap();
    let seats = board.seat_players(2).unwrap();

    assert!(matches!(
        board.move_to(seats[0], -1, 0),
        Err(EngineError::OutOfBounds { x: -1, y: 0 })
    ));
    assert!(board.move_to(seats[0], 1, 0).unwrap());
    assert!(!board.move_to(seats[1], 1, 0).unwrap());
    assert!(matches!(
        board.move_to(PlayerId::new(4), 0, 0),
        Err(EngineError::UnknownPlayer(_))
    ));
    assert_eq!(board.space(Coord::new(1, 0)).unwrap().occupant(), Some(seats[0]));
}

/// The lobby's view of the table replaces positions, headings and turn.
#[test]
fn test_apply_remote_state() {
    let mut board = Board::new(&Course::new("lobby", 4, 4), GameConfig::default()).unwrap();
    board.seat_players(3).unwrap();
    let mut game = GameController::new(board);

    let headings: Vec<String> = ["north", "EAST", "West"].iter().map(|h| h.to_string()).collect();
    game.apply_remote_state(&[(0, 0), (1, 2), (3, 3)], &headings, Some("Player 3"))
        .unwrap();

    let board = game.board();
    assert_eq!(
        board.positions(),
        vec![Some(Coord::new(0, 0)), Some(Coord::new(1, 2)), Some(Coord::new(3, 3))]
    );
    assert_eq!(board.headings_to_strings(), vec!["north", "east", "west"]);
    assert_eq!(board.current_turn(), Some(PlayerId::new(2)));
    assert_eq!(board.space(Coord::new(1, 2)).unwrap().occupant(), Some(PlayerId::new(1)));
}

/// A snapshot survives bincode and restores a fresh board of the same game.
#[test]
fn test_snapshot_restores_game() {
    let config = GameConfig::default().with_program_commands(vec![Command::Forward]);
    let build = || {
        let mut board = Board::new(&three_checkpoints(), config.clone()).unwrap();
        board.seat_players(2).unwrap();
        board
    };

    let mut source = GameController::new(build());
    source.move_to(PlayerId::new(0), 0, 0).unwrap();
    source.move_to(PlayerId::new(1), 2, 0).unwrap();
    source.board_mut().activate_all();
    source.board_mut().set_game_id(99).unwrap();
    source.start_programming_phase();
    let bytes = source.board().snapshot().to_bytes().unwrap();

    let snapshot = BoardSnapshot::from_bytes(&bytes).unwrap();
    let mut restored = GameController::new(build());
    restored.re_initialize(&snapshot).unwrap();

    let board = restored.board();
    assert_eq!(board.phase(), Phase::Programming);
    assert_eq!(board.game_id(), Some(99));
    assert_eq!(board.positions(), source.board().positions());
    for seat in PlayerId::all(2) {
        let (a, b) = (board.player(seat).unwrap(), source.board().player(seat).unwrap());
        assert_eq!(a.energy(), b.energy());
        assert_eq!(a.checkpoint(), b.checkpoint());
    }
    assert_eq!(restored.get_winner(), None);
}

/// Restoring a snapshot where a robot has every checkpoint declares it the
/// winner.
#[test]
fn test_re_initialize_detects_winner() {
    let mut source = Board::new(&three_checkpoints(), GameConfig::default()).unwrap();
    let robot = source.add_player("Player 1").unwrap();
    for x in 0..3 {
        source.move_to(robot, x, 0).unwrap();
        source.activate_all();
    }
    let snapshot = source.snapshot();

    let mut target = Board::new(&three_checkpoints(), GameConfig::default()).unwrap();
    target.add_player("Player 1").unwrap();
    let mut game = GameController::new(target);
    game.re_initialize(&snapshot).unwrap();

    assert_eq!(game.get_winner(), Some(robot));
    assert!(game.is_finished());
}

/// A snapshot of a different game is refused without changing the board.
#[test]
fn test_foreign_snapshot_is_refused() {
    let mut other = Board::new(&Course::new("other", 5, 5), GameConfig::default()).unwrap();
    other.add_player("Player 1").unwrap();
    let snapshot = other.snapshot();

    let mut board = Board::new(&three_checkpoints(), GameConfig::default()).unwrap();
    let robot = board.add_player("Player 1").unwrap();
    board.move_to(robot, 1, 0).unwrap();
    let mut game = GameController::new(board);

    assert!(matches!(
        game.re_initialize(&snapshot),
        Err(EngineError::SnapshotMismatch { .. })
    ));
    assert_eq!(game.board().player(robot).unwrap().position(), Some(Coord::new(1, 0)));
}

/// Game ids are set once.
#[test]
fn test_conflicting_game_id() {
    let mut source = Board::new(&three_checkpoints(), GameConfig::default()).unwrap();
    source.add_player("Player 1").unwrap();
    source.set_game_id(1).unwrap();
    let snapshot = source.snapshot();

    let mut board = Board::new(&three_checkpoints(), GameConfig::default()).unwrap();
    board.add_player("Player 1").unwrap();
    board.set_game_id(2).unwrap();
    let mut game = GameController::new(board);

    assert!(matches!(
        game.re_initialize(&snapshot),
        Err(EngineError::GameIdAlreadySet { current: 2, requested: 1 })
    ));
}

/// Courses load from JSON.
#[test]
fn test_course_from_json() {
    let json = r#"{
        "name": "json sprint",
        "width": 3,
        "height": 2,
        "spaces": [
            { "x": 0, "y": 0, "kind": "StartingGear", "heading": "East" },
            { "x": 1, "y": 0, "kind": "ConveyorBelt", "heading": "East", "walls": ["North"] },
            { "x": 2, "y": 1, "kind": { "Checkpoint": 1 } }
        ]
    }"#;
    let course: Course = serde_json::from_str(json).unwrap();
    let mut board = Board::new(&course, GameConfig::default()).unwrap();
    let robot = board.add_player("Player 1").unwrap();

    assert!(board.has_starting_gears());
    assert_eq!(board.checkpoint_count(), 1);

    // The belt carries the robot east without turning it.
    board.move_to(robot, 1, 0).unwrap();
    board.activate_space(Coord::new(1, 0));
    assert_eq!(board.player(robot).unwrap().position(), Some(Coord::new(2, 0)));
    assert_eq!(board.player(robot).unwrap().heading(), Heading::South);
}

proptest! {
    /// Checkpoint progress never goes down, whatever spaces are activated.
    #[test]
    fn test_checkpoints_are_monotonic(visits in prop::collection::vec(0u16..3, 1..30)) {
        let mut board = Board::new(&three_checkpoints(), GameConfig::default()).unwrap();
        let robot = board.add_player("Player 1").unwrap();
        let mut last = 0;

        for x in visits {
            board.move_to(robot, i64::from(x), 0).unwrap();
            board.activate_all();
            let reached = board.player(robot).unwrap().checkpoint();
            prop_assert!(reached >= last);
            last = reached;
        }
    }
}
