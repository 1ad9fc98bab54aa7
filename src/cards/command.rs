//! Commands and the physical cards that carry them.
//!
//! `Command` is the closed catalog of robot actions. A `CommandCard` is one
//! physical card: it pairs a command with a `CardKind` tag and a `CardId`
//! that is unique for the lifetime of a game, so a card can be followed
//! through hands, registers, discard piles and reshuffles.

use serde::{Deserialize, Serialize};

use crate::core::EngineError;

/// Unique identifier of one physical card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Where a card came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    /// Dealt from a robot's program deck.
    Program,
    /// SPAM damage received from lasers or ramming.
    Damage,
    /// Bought in the upgrade shop.
    Upgrade,
    /// Injected by a virus module.
    Virus,
}

impl CardKind {
    /// Lowercase tag used by external collaborators.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CardKind::Program => "program",
            CardKind::Damage => "damage",
            CardKind::Upgrade => "upgrade",
            CardKind::Virus => "virus",
        }
    }
}

/// Every action a robot can be told to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    Forward,
    Forward2,
    Forward3,
    Back,
    Right,
    Left,
    UTurn,
    Again,
    PowerUp,
    Recharge,
    Spam,
    RammingGear,
    VirusModule,
    Boink,
    OptionLeftRight,
    OptionLeftForward,
}

impl Command {
    pub const ALL: [Command; 16] = [
        Command::Forward,
        Command::Forward2,
        Command::Forward3,
        Command::Back,
        Command::Right,
        Command::Left,
        Command::UTurn,
        Command::Again,
        Command::PowerUp,
        Command::Recharge,
        Command::Spam,
        Command::RammingGear,
        Command::VirusModule,
        Command::Boink,
        Command::OptionLeftRight,
        Command::OptionLeftForward,
    ];

    /// Default program-deck pool: everything except hazards and upgrades.
    pub const PROGRAMMING: [Command; 11] = [
        Command::Forward,
        Command::Forward2,
        Command::Forward3,
        Command::Back,
        Command::Right,
        Command::Left,
        Command::UTurn,
        Command::Again,
        Command::PowerUp,
        Command::OptionLeftRight,
        Command::OptionLeftForward,
    ];

    /// Default upgrade-shop pool.
    pub const UPGRADES: [Command; 4] = [
        Command::Recharge,
        Command::RammingGear,
        Command::VirusModule,
        Command::Boink,
    ];

    /// Short name printed on the card.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Command::Forward => "Fwd",
            Command::Forward2 => "Fwd x2",
            Command::Forward3 => "Fwd x3",
            Command::Back => "Back up",
            Command::Right => "Turn Right",
            Command::Left => "Turn Left",
            Command::UTurn => "U-Turn",
            Command::Again => "Again",
            Command::PowerUp => "Power Up",
            Command::Recharge => "Recha",
            Command::Spam => "Spam",
            Command::RammingGear => "Ram",
            Command::VirusModule => "Virus",
            Command::Boink => "Boink",
            Command::OptionLeftRight => "Option Left or Right",
            Command::OptionLeftForward => "Option Left or Forward",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Command::Forward => "Move your robot in the direction it is facing by 1 space.",
            Command::Forward2 => "Move your robot in the direction it is facing by 2 spaces.",
            Command::Forward3 => "Move your robot in the direction it is facing by 3 spaces.",
            Command::Back => "Move your robot one space back.",
            Command::Right => "Turn your robot 90 degrees to the right.",
            Command::Left => "Turn your robot 90 degrees to the left.",
            Command::UTurn => "Turn your robot 180 degrees so it faces the opposite direction.",
            Command::Again => "Repeat the programming in your previous register.",
            Command::PowerUp => "Take one energy cube.",
            Command::Recharge => "Gain three energy.",
            Command::Spam => "Play the top card of your deck in place of this one.",
            Command::RammingGear => "Deal one SPAM damage card when you push a robot.",
            Command::VirusModule => "Deal one VIRUS card when you push a robot.",
            Command::Boink => "Temporary upgrade with no effect on the board.",
            Command::OptionLeftRight => "Choose to turn left or right.",
            Command::OptionLeftForward => "Choose to turn left or move forward.",
        }
    }

    /// Sub-commands the player chooses between. Empty for ordinary commands.
    #[must_use]
    pub const fn options(self) -> &'static [Command] {
        match self {
            Command::OptionLeftRight => &[Command::Left, Command::Right],
            Command::OptionLeftForward => &[Command::Left, Command::Forward],
            _ => &[],
        }
    }

    /// Whether executing this command needs an external choice.
    #[must_use]
    pub const fn is_interactive(self) -> bool {
        !self.options().is_empty()
    }

    /// Upgrades that stay installed once bought.
    #[must_use]
    pub const fn is_permanent_upgrade(self) -> bool {
        matches!(self, Command::RammingGear | Command::VirusModule)
    }

    /// Upgrades that are used once and then retired.
    #[must_use]
    pub const fn is_temporary_upgrade(self) -> bool {
        matches!(self, Command::Recharge | Command::Boink)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Parses either the display name ("Turn Left") or the variant name
/// ("Left", "u_turn"), ignoring case, spaces, dashes and underscores.
impl std::str::FromStr for Command {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Command::ALL
            .into_iter()
            .find(|command| {
                normalize(command.display_name()) == wanted
                    || normalize(&format!("{command:?}")) == wanted
            })
            .ok_or_else(|| EngineError::UnknownCommand(s.to_string()))
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// One physical card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandCard {
    id: CardId,
    command: Command,
    kind: CardKind,
}

impl CommandCard {
    #[must_use]
    pub const fn new(id: CardId, command: Command, kind: CardKind) -> Self {
        Self { id, command, kind }
    }

    #[must_use]
    pub const fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub const fn command(&self) -> Command {
        self.command
    }

    #[must_use]
    pub const fn kind(&self) -> CardKind {
        self.kind
    }

    /// Display name of the carried command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.command.display_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interactive_commands() {
        let interactive: Vec<_> = Command::ALL
            .into_iter()
            .filter(|c| c.is_interactive())
            .collect();
        assert_eq!(
            interactive,
            vec![Command::OptionLeftRight, Command::OptionLeftForward]
        );
        assert_eq!(
            Command::OptionLeftForward.options(),
            &[Command::Left, Command::Forward]
        );
        assert!(Command::Forward.options().is_empty());
    }

    #[test]
    fn test_pools_are_disjoint() {
        for command in Command::UPGRADES {
            assert!(!Command::PROGRAMMING.contains(&command));
        }
        assert!(!Command::PROGRAMMING.contains(&Command::Spam));
    }

    #[test]
    fn test_upgrade_categories() {
        for command in Command::UPGRADES {
            assert!(command.is_permanent_upgrade() ^ command.is_temporary_upgrade());
        }
        assert!(!Command::Forward.is_permanent_upgrade());
    }

    #[test]
    fn test_parse() {
        assert_eq!("Turn Left".parse::<Command>().unwrap(), Command::Left);
        assert_eq!("left".parse::<Command>().unwrap(), Command::Left);
        assert_eq!("U-Turn".parse::<Command>().unwrap(), Command::UTurn);
        assert_eq!("uturn".parse::<Command>().unwrap(), Command::UTurn);
        assert_eq!("Fwd x2".parse::<Command>().unwrap(), Command::Forward2);
        assert!(matches!(
            "jump".parse::<Command>(),
            Err(EngineError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_card_accessors() {
        let card = CommandCard::new(CardId::new(7), Command::Spam, CardKind::Damage);
        assert_eq!(card.id(), CardId::new(7));
        assert_eq!(card.name(), "Spam");
        assert_eq!(card.kind().as_str(), "damage");
        assert_eq!(card.id().to_string(), "Card(7)");
    }
}
