//! Game rules on top of the board.
//!
//! - `movement`: walls, pushing and conveyor moves
//! - `controller`: the programming/activation cycle
//! - `commands`: what each programming card does
//! - `shop`: buying and using upgrades
//! - `sync`: forcing state from save files and the lobby

mod commands;
pub mod controller;
pub mod movement;
mod shop;
mod sync;

pub use controller::GameController;
pub use movement::MoveCause;
