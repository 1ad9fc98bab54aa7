//! Player identification and robot state.
//!
//! ## PlayerId
//!
//! A player's seat: the 0-based order in which it joined the board. Seats
//! never change; the roster order used for turns is tracked separately by
//! the board.
//!
//! ## Player
//!
//! Everything one robot owns: position and heading, energy, checkpoint
//! progress, program registers, hand, upgrade slots and its deck. Position
//! is written only by the board, which keeps it consistent with the
//! occupant of the matching space.

use serde::{Deserialize, Serialize};

use crate::board::Coord;
use crate::cards::{CardField, Command, Deck};

use super::config::GameConfig;
use super::heading::Heading;

/// Seat of a player, supporting 1-255 players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all seats for a board with `player_count` players.
    ///
    /// ```
    /// use rust_rally::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(seats, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count.min(256)).map(|i| PlayerId(i as u8))
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat({})", self.0)
    }
}

/// One robot and its cards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    name: String,
    color: String,
    position: Option<Coord>,
    heading: Heading,
    energy: u32,
    checkpoint: u32,
    program: Vec<CardField>,
    hand: Vec<CardField>,
    permanent_upgrades: Vec<CardField>,
    temporary_upgrades: Vec<CardField>,
    deck: Deck,
    history: Vec<Option<Command>>,
}

impl Player {
    /// A robot off the board, facing south.
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        config: &GameConfig,
        deck: Deck,
    ) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            position: None,
            heading: Heading::South,
            energy: config.starting_energy,
            checkpoint: 0,
            program: vec![CardField::new(); config.register_count],
            hand: vec![CardField::new(); config.hand_size],
            permanent_upgrades: vec![CardField::new(); config.permanent_upgrade_slots],
            temporary_upgrades: vec![CardField::new(); config.temporary_upgrade_slots],
            deck,
            history: vec![None; config.register_count],
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Current space, `None` while the robot has not been placed.
    #[must_use]
    pub fn position(&self) -> Option<Coord> {
        self.position
    }

    #[must_use]
    pub fn heading(&self) -> Heading {
        self.heading
    }

    #[must_use]
    pub fn energy(&self) -> u32 {
        self.energy
    }

    /// Number of checkpoints reached so far.
    #[must_use]
    pub fn checkpoint(&self) -> u32 {
        self.checkpoint
    }

    #[must_use]
    pub fn program(&self) -> &[CardField] {
        &self.program
    }

    #[must_use]
    pub fn program_field(&self, register: usize) -> Option<&CardField> {
        self.program.get(register)
    }

    #[must_use]
    pub fn hand(&self) -> &[CardField] {
        &self.hand
    }

    #[must_use]
    pub fn hand_field(&self, slot: usize) -> Option<&CardField> {
        self.hand.get(slot)
    }

    #[must_use]
    pub fn permanent_upgrades(&self) -> &[CardField] {
        &self.permanent_upgrades
    }

    #[must_use]
    pub fn temporary_upgrades(&self) -> &[CardField] {
        &self.temporary_upgrades
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Command actually executed in each register this round.
    #[must_use]
    pub fn history(&self) -> &[Option<Command>] {
        &self.history
    }

    /// Whether a permanent upgrade with this command is installed.
    #[must_use]
    pub fn has_upgrade(&self, command: Command) -> bool {
        self.permanent_upgrades
            .iter()
            .filter_map(CardField::card)
            .any(|card| card.command() == command)
    }

    /// Squared distance to `target`, or `None` if the robot is off the board.
    #[must_use]
    pub fn distance_sq_to(&self, target: Coord) -> Option<u64> {
        self.position.map(|at| {
            let dx = i64::from(at.x) - i64::from(target.x);
            let dy = i64::from(at.y) - i64::from(target.y);
            (dx * dx + dy * dy) as u64
        })
    }

    /// Remove `amount` energy if the robot has enough.
    pub fn spend_energy(&mut self, amount: u32) -> bool {
        match self.energy.checked_sub(amount) {
            Some(rest) => {
                self.energy = rest;
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_position(&mut self, position: Option<Coord>) {
        self.position = position;
    }

    pub(crate) fn set_heading(&mut self, heading: Heading) {
        self.heading = heading;
    }

    pub(crate) fn add_energy(&mut self, amount: u32) {
        self.energy = self.energy.saturating_add(amount);
    }

    pub(crate) fn set_energy(&mut self, energy: u32) {
        self.energy = energy;
    }

    pub(crate) fn advance_checkpoint(&mut self) {
        self.checkpoint += 1;
    }

    pub(crate) fn set_checkpoint(&mut self, checkpoint: u32) {
        self.checkpoint = checkpoint;
    }

    pub(crate) fn program_mut(&mut self) -> &mut [CardField] {
        &mut self.program
    }

    pub(crate) fn hand_mut(&mut self) -> &mut [CardField] {
        &mut self.hand
    }

    pub(crate) fn permanent_upgrades_mut(&mut self) -> &mut [CardField] {
        &mut self.permanent_upgrades
    }

    pub(crate) fn temporary_upgrades_mut(&mut self) -> &mut [CardField] {
        &mut self.temporary_upgrades
    }

    pub(crate) fn deck_mut(&mut self) -> &mut Deck {
        &mut self.deck
    }

    pub(crate) fn record(&mut self, register: usize, command: Option<Command>) {
        if let Some(slot) = self.history.get_mut(register) {
            *slot = command;
        }
    }

    pub(crate) fn clear_history(&mut self) {
        self.history.iter_mut().for_each(|slot| *slot = None);
    }
}
