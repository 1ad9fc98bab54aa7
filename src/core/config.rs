//! Game configuration.
//!
//! The color palette, the card pools and the register and hand sizes are
//! passed in here at construction rather than fixed in globals.
//! `GameConfig::default()` is the standard game.

use serde::{Deserialize, Serialize};

use crate::cards::Command;

/// Complete game configuration.
///
/// Build with `GameConfig::default()` and the `with_*` builder methods.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Program registers per robot.
    pub register_count: usize,

    /// Cards dealt into a robot's hand each programming phase.
    pub hand_size: usize,

    /// Permanent upgrade slots per robot.
    pub permanent_upgrade_slots: usize,

    /// Temporary upgrade slots per robot.
    pub temporary_upgrade_slots: usize,

    /// Energy every robot starts with.
    pub starting_energy: u32,

    /// Maximum number of seated players.
    pub max_players: usize,

    /// Cards in a freshly generated program deck.
    pub program_deck_size: usize,

    /// Cards in a freshly generated upgrade deck.
    pub upgrade_deck_size: usize,

    /// Draw-pile size at or below which the discard pile is shuffled back in.
    pub low_water_mark: usize,

    /// Energy cost of buying one upgrade in the shop.
    pub upgrade_cost: u32,

    /// Seed for all deck shuffling and card generation.
    pub seed: u64,

    /// Robot colors, assigned by seat.
    pub colors: Vec<String>,

    /// Commands a program deck is generated from.
    pub program_commands: Vec<Command>,

    /// Commands the shared upgrade deck is generated from.
    pub upgrade_commands: Vec<Command>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            register_count: 5,
            hand_size: 8,
            permanent_upgrade_slots: 3,
            temporary_upgrade_slots: 3,
            starting_energy: 5,
            max_players: 6,
            program_deck_size: 52,
            upgrade_deck_size: 33,
            low_water_mark: 8,
            upgrade_cost: 1,
            seed: 42,
            colors: ["red", "green", "blue", "orange", "grey", "magenta"]
                .into_iter()
                .map(String::from)
                .collect(),
            program_commands: Command::PROGRAMMING.to_vec(),
            upgrade_commands: Command::UPGRADES.to_vec(),
        }
    }
}

impl GameConfig {
    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of program registers.
    #[must_use]
    pub fn with_registers(mut self, count: usize) -> Self {
        assert!(count > 0, "Must have at least 1 register");
        self.register_count = count;
        self
    }

    /// Set the hand size.
    #[must_use]
    pub fn with_hand_size(mut self, size: usize) -> Self {
        self.hand_size = size;
        self
    }

    /// Set the maximum number of players.
    #[must_use]
    pub fn with_max_players(mut self, max: usize) -> Self {
        assert!(max > 0, "Must allow at least 1 player");
        assert!(max <= 255, "At most 255 players supported");
        self.max_players = max;
        self
    }

    /// Set the energy every robot starts with.
    #[must_use]
    pub fn with_starting_energy(mut self, energy: u32) -> Self {
        self.starting_energy = energy;
        self
    }

    /// Set the price of an upgrade.
    #[must_use]
    pub fn with_upgrade_cost(mut self, cost: u32) -> Self {
        self.upgrade_cost = cost;
        self
    }

    /// Replace the program card pool.
    #[must_use]
    pub fn with_program_commands(mut self, commands: Vec<Command>) -> Self {
        assert!(!commands.is_empty(), "Program card pool must not be empty");
        self.program_commands = commands;
        self
    }

    /// Replace the upgrade card pool.
    #[must_use]
    pub fn with_upgrade_commands(mut self, commands: Vec<Command>) -> Self {
        assert!(!commands.is_empty(), "Upgrade card pool must not be empty");
        self.upgrade_commands = commands;
        self
    }

    /// Color for a seat, falling back to "black" past the palette.
    #[must_use]
    pub fn color_for(&self, seat: usize) -> &str {
        self.colors.get(seat).map_or("black", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.register_count, 5);
        assert_eq!(config.hand_size, 8);
        assert_eq!(config.starting_energy, 5);
        assert_eq!(config.max_players, 6);
        assert_eq!(config.program_deck_size, 52);
        assert_eq!(config.colors.len(), 6);
        assert!(!config.program_commands.contains(&Command::Spam));
        assert!(config.upgrade_commands.contains(&Command::RammingGear));
    }

    #[test]
    fn test_builder() {
        let config = GameConfig::default()
            .with_seed(7)
            .with_registers(3)
            .with_hand_size(4)
            .with_max_players(2)
            .with_upgrade_cost(0);

        assert_eq!(config.seed, 7);
        assert_eq!(config.register_count, 3);
        assert_eq!(config.hand_size, 4);
        assert_eq!(config.max_players, 2);
        assert_eq!(config.upgrade_cost, 0);
    }

    #[test]
    fn test_color_for() {
        let config = GameConfig::default();
        assert_eq!(config.color_for(0), "red");
        assert_eq!(config.color_for(5), "magenta");
        assert_eq!(config.color_for(6), "black");
    }

    #[test]
    fn test_serde_round_trip() {
        let config = GameConfig::default().with_seed(99);
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 register")]
    fn test_zero_registers() {
        let _ = GameConfig::default().with_registers(0);
    }
}
