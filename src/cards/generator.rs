//! Card-generation policy.
//!
//! Every physical card in a game is minted here, so card ids never repeat.
//! Program and upgrade draws use separate RNG streams and deck shuffles a
//! third, which keeps one kind of draw from perturbing another.

use crate::core::GameRng;

use super::command::{CardId, CardKind, Command, CommandCard};

/// Mints cards and owns the randomness behind decks.
#[derive(Clone, Debug)]
pub struct CardGenerator {
    program_rng: GameRng,
    upgrade_rng: GameRng,
    shuffle_rng: GameRng,
    next_id: u32,
}

impl CardGenerator {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let root = GameRng::new(seed);
        Self {
            program_rng: root.for_context("program"),
            upgrade_rng: root.for_context("upgrade"),
            shuffle_rng: root.for_context("shuffle"),
            next_id: 0,
        }
    }

    /// Number of cards minted so far.
    #[must_use]
    pub fn minted(&self) -> u32 {
        self.next_id
    }

    fn mint(&mut self, command: Command, kind: CardKind) -> CommandCard {
        let id = CardId::new(self.next_id);
        self.next_id += 1;
        CommandCard::new(id, command, kind)
    }

    /// Random program card drawn uniformly from `pool`.
    ///
    /// An empty pool falls back to `Forward`.
    pub fn program_card(&mut self, pool: &[Command]) -> CommandCard {
        let command = self
            .program_rng
            .choose(pool)
            .copied()
            .unwrap_or(Command::Forward);
        self.mint(command, CardKind::Program)
    }

    /// Random upgrade card drawn uniformly from `pool`.
    pub fn upgrade_card(&mut self, pool: &[Command]) -> CommandCard {
        let command = self
            .upgrade_rng
            .choose(pool)
            .copied()
            .unwrap_or(Command::Recharge);
        self.mint(command, CardKind::Upgrade)
    }

    /// A fresh SPAM damage card.
    pub fn damage_card(&mut self) -> CommandCard {
        self.mint(Command::Spam, CardKind::Damage)
    }

    /// A fresh virus card.
    pub fn virus_card(&mut self) -> CommandCard {
        self.mint(Command::VirusModule, CardKind::Virus)
    }

    /// Card of the given command, minted for tests and scripted setups.
    pub fn card_of(&mut self, command: Command, kind: CardKind) -> CommandCard {
        self.mint(command, kind)
    }

    pub(crate) fn shuffle<T>(&mut self, items: &mut [T]) {
        self.shuffle_rng.shuffle(items);
    }

    pub(crate) fn insertion_index(&mut self, len: usize) -> usize {
        self.shuffle_rng.insertion_index(len)
    }
}
