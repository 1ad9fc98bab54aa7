//! Cardinal headings.
//!
//! Robots, conveyor belts and walls all refer to one of four headings.
//! `next()` turns clockwise, `prev()` counter-clockwise.

use serde::{Deserialize, Serialize};

use super::error::EngineError;

/// One of the four cardinal facings.
///
/// North is "up" on the grid (decreasing `y`), east is increasing `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    /// All headings in clockwise order, starting north.
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    /// Heading after a 90° clockwise turn.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Heading::North => Heading::East,
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
        }
    }

    /// Heading after a 90° counter-clockwise turn.
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Heading::North => Heading::West,
            Heading::East => Heading::North,
            Heading::South => Heading::East,
            Heading::West => Heading::South,
        }
    }

    /// The opposite heading.
    #[must_use]
    pub const fn opposite(self) -> Self {
        self.next().next()
    }

    /// Grid delta `(dx, dy)` for one step in this heading.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Heading::North => (0, -1),
            Heading::East => (1, 0),
            Heading::South => (0, 1),
            Heading::West => (-1, 0),
        }
    }

    /// Bit used by [`crate::board::Walls`].
    #[must_use]
    pub(crate) const fn bit(self) -> u8 {
        match self {
            Heading::North => 0b0001,
            Heading::East => 0b0010,
            Heading::South => 0b0100,
            Heading::West => 0b1000,
        }
    }

    /// Lowercase name, as exchanged with the lobby service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Heading::North => "north",
            Heading::East => "east",
            Heading::South => "south",
            Heading::West => "west",
        }
    }
}

/// Tiles without an explicit heading face north.
impl Default for Heading {
    fn default() -> Self {
        Heading::North
    }
}

impl std::fmt::Display for Heading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Heading {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" => Ok(Heading::North),
            "east" => Ok(Heading::East),
            "south" => Ok(Heading::South),
            "west" => Ok(Heading::West),
            _ => Err(EngineError::UnknownHeading(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_cycles() {
        for heading in Heading::ALL {
            assert_eq!(heading.next().prev(), heading);
            assert_eq!(heading.next().next().next().next(), heading);
            assert_eq!(heading.opposite().opposite(), heading);
        }
        assert_eq!(Heading::North.next(), Heading::East);
        assert_eq!(Heading::North.prev(), Heading::West);
        assert_eq!(Heading::East.opposite(), Heading::West);
    }

    #[test]
    fn test_delta_opposes() {
        for heading in Heading::ALL {
            let (dx, dy) = heading.delta();
            let (ox, oy) = heading.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("south".parse::<Heading>().unwrap(), Heading::South);
        assert_eq!("WEST".parse::<Heading>().unwrap(), Heading::West);
        assert!(matches!(
            "up".parse::<Heading>(),
            Err(EngineError::UnknownHeading(_))
        ));
        assert_eq!(Heading::East.to_string(), "east");
    }
}
