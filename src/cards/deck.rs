//! Decks: draw pile, discard pile and retired upgrades.
//!
//! The top of the draw pile is the end of the vector, so dealing is a `pop`.
//!
//! ## Refill policy
//!
//! Before each deal, a draw pile at or below the low-water mark takes the
//! shuffled discard pile in beneath it. If it is still empty, a fresh
//! population is generated from the deck's command pool.
//!
//! Retired cards (used temporary upgrades) are never shuffled back in.

use serde::{Deserialize, Serialize};

use crate::core::GameConfig;

use super::command::{Command, CommandCard};
use super::generator::CardGenerator;

/// Which generation policy a deck refills from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeckKind {
    Program,
    Upgrade,
}

/// An ordered supply of command cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    kind: DeckKind,
    pool: Vec<Command>,
    population: usize,
    low_water: usize,
    cards: Vec<CommandCard>,
    discard: Vec<CommandCard>,
    retired: Vec<CommandCard>,
}

impl Deck {
    /// Create a deck and fill it with `population` freshly generated cards.
    pub fn new(
        kind: DeckKind,
        pool: Vec<Command>,
        population: usize,
        low_water: usize,
        generator: &mut CardGenerator,
    ) -> Self {
        let mut deck = Self {
            kind,
            pool,
            population,
            low_water,
            cards: Vec::with_capacity(population),
            discard: Vec::new(),
            retired: Vec::new(),
        };
        deck.regenerate(generator);
        deck
    }

    /// A robot's program deck.
    pub fn program(generator: &mut CardGenerator, config: &GameConfig) -> Self {
        Self::new(
            DeckKind::Program,
            config.program_commands.clone(),
            config.program_deck_size,
            config.low_water_mark,
            generator,
        )
    }

    /// The shared upgrade deck.
    pub fn upgrade(generator: &mut CardGenerator, config: &GameConfig) -> Self {
        Self::new(
            DeckKind::Upgrade,
            config.upgrade_commands.clone(),
            config.upgrade_deck_size,
            config.low_water_mark,
            generator,
        )
    }

    /// A deck holding exactly `cards`, last element on top.
    ///
    /// Useful for scripted scenarios. The deck still regenerates from
    /// `pool` once it runs dry.
    #[must_use]
    pub fn from_cards(kind: DeckKind, pool: Vec<Command>, cards: Vec<CommandCard>) -> Self {
        Self {
            kind,
            pool,
            population: cards.len(),
            low_water: 0,
            cards,
            discard: Vec::new(),
            retired: Vec::new(),
        }
    }

    fn regenerate(&mut self, generator: &mut CardGenerator) {
        for _ in 0..self.population {
            let card = match self.kind {
                DeckKind::Program => generator.program_card(&self.pool),
                DeckKind::Upgrade => generator.upgrade_card(&self.pool),
            };
            self.cards.push(card);
        }
    }

    /// Remove and return the top card, refilling first if needed.
    ///
    /// Returns `None` only for a deck whose population is zero.
    pub fn deal(&mut self, generator: &mut CardGenerator) -> Option<CommandCard> {
        if self.cards.len() <= self.low_water && !self.discard.is_empty() {
            let mut pile = std::mem::take(&mut self.discard);
            generator.shuffle(&mut pile);
            pile.append(&mut self.cards);
            self.cards = pile;
        }
        if self.cards.is_empty() {
            self.regenerate(generator);
        }
        self.cards.pop()
    }

    /// Put a spent card on the discard pile.
    pub fn send_to_discard_pile(&mut self, card: CommandCard) {
        self.discard.push(card);
    }

    /// Retire a used upgrade permanently.
    pub fn send_to_discard_upgrade(&mut self, card: CommandCard) {
        self.retired.push(card);
    }

    /// Shuffle a card into the draw pile at a random depth.
    pub fn add_to_deck(&mut self, card: CommandCard, generator: &mut CardGenerator) {
        let index = generator.insertion_index(self.cards.len());
        self.cards.insert(index, card);
    }

    #[must_use]
    pub fn kind(&self) -> DeckKind {
        self.kind
    }

    /// Cards left in the draw pile.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Draw pile, bottom first.
    #[must_use]
    pub fn cards(&self) -> &[CommandCard] {
        &self.cards
    }

    /// The card `deal` would return next if no refill happens.
    #[must_use]
    pub fn peek(&self) -> Option<&CommandCard> {
        self.cards.last()
    }

    #[must_use]
    pub fn discard_pile(&self) -> &[CommandCard] {
        &self.discard
    }

    #[must_use]
    pub fn retired(&self) -> &[CommandCard] {
        &self.retired
    }
}
