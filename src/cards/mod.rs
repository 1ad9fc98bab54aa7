//! Card system: commands, physical cards, decks and fields.
//!
//! ## Key Types
//!
//! - `Command`: the closed catalog of robot actions
//! - `CommandCard`: one physical card (`CardId` + `Command` + `CardKind`)
//! - `Deck`: draw pile, discard pile and retired upgrades
//! - `CardGenerator`: mints every card and owns deck randomness
//! - `CardField` / `FieldRef`: slots cards sit in, and their addresses

pub mod command;
pub mod deck;
pub mod field;
pub mod generator;

pub use command::{CardId, CardKind, Command, CommandCard};
pub use deck::{Deck, DeckKind};
pub use field::{CardField, FieldRef};
pub use generator::CardGenerator;
