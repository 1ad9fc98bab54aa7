//! The board: spaces, course templates, phases and snapshots.
//!
//! ## Key Types
//!
//! - `Coord` / `Space` / `SpaceKind`: grid cells and what they do
//! - `Walls`: blocked edges of a space
//! - `Course`: serde layout a board is built from
//! - `Board`: the grid, the robots and the round state
//! - `BoardSnapshot`: saved robot and round state

pub mod course;
pub mod grid;
pub mod phase;
pub mod snapshot;
pub mod space;

pub use course::{Course, SpaceTemplate};
pub use grid::Board;
pub use phase::Phase;
pub use snapshot::{BoardSnapshot, PlayerSnapshot};
pub use space::{Coord, Space, SpaceKind, TileEffect, Walls};
