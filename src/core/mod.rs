//! Core engine types: headings, players, RNG, configuration, errors.
//!
//! These are the building blocks the board and the rules are made of.
//! Games vary through `GameConfig` rather than by editing the core.

pub mod config;
pub mod error;
pub mod heading;
pub mod player;
pub mod rng;

pub use config::GameConfig;
pub use error::{EngineError, EngineResult};
pub use heading::Heading;
pub use player::{Player, PlayerId};
pub use rng::GameRng;
