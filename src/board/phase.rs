//! Round phases.

use serde::{Deserialize, Serialize};

/// Top-level state of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Robots are being placed and the upgrade shop is open.
    Initialisation,
    /// Players fill their registers.
    Programming,
    /// Registers are executed one step at a time.
    Activation,
    /// Execution waits for a player to pick an option.
    PlayerInteraction,
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Initialisation => "INITIALISATION",
            Phase::Programming => "PROGRAMMING",
            Phase::Activation => "ACTIVATION",
            Phase::PlayerInteraction => "PLAYER_INTERACTION",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
