//! # rust-rally
//!
//! Game-state engine for a programmable robot-racing board game.
//!
//! Robots on a grid are programmed with command cards, one card per
//! register. Each round the controller runs the registers in turn order,
//! then lets the board's tiles push, turn, charge and shoot the robots.
//! The first robot to reach every checkpoint in order wins.
//!
//! ## Design Principles
//!
//! 1. **Owned state**: the `Board` owns every space and robot; spaces point
//!    at robots by `PlayerId`, never by reference.
//!
//! 2. **Deterministic**: all card minting and shuffling goes through seeded
//!    `GameRng` streams, so a seed replays a game exactly.
//!
//! 3. **Events, not callbacks**: every visible state change is queued as a
//!    `GameEvent` for the renderer to drain.
//!
//! ## Modules
//!
//! - `core`: headings, players, RNG, configuration, errors
//! - `board`: spaces, courses, the board itself, snapshots
//! - `cards`: commands, cards, decks, card fields
//! - `events`: typed state-change events
//! - `rules`: the game controller, movement, shop and resync
//! - `courses`: built-in course presets
//!
//! ## Example
//!
//! ```
//! use rust_rally::{courses, Board, GameConfig, GameController};
//!
//! let mut board = Board::new(&courses::starter(), GameConfig::default()).unwrap();
//! board.seat_players(2).unwrap();
//!
//! let mut game = GameController::new(board);
//! assert!(game.start_programming_phase());
//! assert_eq!(game.board().player_count(), 2);
//! ```

pub mod board;
pub mod cards;
pub mod core;
pub mod courses;
pub mod events;
pub mod rules;

pub use crate::core::{EngineError, EngineResult, GameConfig, GameRng, Heading, Player, PlayerId};

pub use crate::board::{
    Board, BoardSnapshot, Coord, Course, Phase, PlayerSnapshot, Space, SpaceKind, TileEffect,
};

pub use crate::cards::{CardField, CardId, CardKind, Command, CommandCard, Deck, FieldRef};

pub use crate::events::{EventQueue, GameEvent};

pub use crate::rules::{GameController, MoveCause};
