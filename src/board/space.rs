//! Spaces: one cell of the course grid.
//!
//! A space has fixed coordinates, a kind, a heading for directional kinds
//! and a set of walls on its edges. Occupancy is the only mutable part and
//! only `Board::place` writes it.

use serde::{Deserialize, Serialize};

use crate::core::{Heading, PlayerId};

/// A coordinate on the grid. `(0, 0)` is the north-west corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
}

impl Coord {
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Functional category of a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpaceKind {
    #[default]
    Normal,
    ConveyorBelt,
    DoubleConveyorBelt,
    DoubleLeftTreeConveyorBelt,
    DoubleRightTreeConveyorBelt,
    LeftConveyorBelt,
    RightConveyorBelt,
    PushPanel,
    StartingGear,
    LeftGear,
    RightGear,
    BoardLaserStart,
    BoardLaser,
    BoardLaserEnd,
    Pit,
    EnergySpace,
    /// Checkpoint with its 1-based index on the course.
    Checkpoint(u32),
    /// Impassable block.
    Wall,
    PriorityAntenna,
    Respawn,
}

impl SpaceKind {
    /// Whether robots can enter a space of this kind.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, SpaceKind::Wall)
    }

    #[must_use]
    pub const fn is_checkpoint(self) -> bool {
        matches!(self, SpaceKind::Checkpoint(_))
    }
}

/// What activating an occupied space does to its occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileEffect {
    /// Nothing happens.
    None,
    /// Move `distance` cells toward `direction`, keeping the robot's heading.
    Convey { direction: Heading, distance: usize },
    /// Turn the robot 90°.
    Rotate { clockwise: bool },
    /// One energy.
    Energy,
    /// Checkpoint progress +1.
    Checkpoint,
    /// Recompute turn order around this space.
    Antenna,
    /// One SPAM damage card.
    Laser,
}

/// Set of blocked edges of a space.
///
/// An east wall on `(1, 1)` blocks movement between `(1, 1)` and `(2, 1)` in
/// both directions; the board checks both sides of every edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Walls(u8);

impl Walls {
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Walls on each of the given sides.
    #[must_use]
    pub fn from_headings(sides: &[Heading]) -> Self {
        let mut walls = Self::empty();
        for &side in sides {
            walls.insert(side);
        }
        walls
    }

    #[must_use]
    pub const fn contains(self, side: Heading) -> bool {
        self.0 & side.bit() != 0
    }

    pub fn insert(&mut self, side: Heading) {
        self.0 |= side.bit();
    }

    pub fn remove(&mut self, side: Heading) {
        self.0 &= !side.bit();
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Walled sides in clockwise order from north.
    pub fn iter(self) -> impl Iterator<Item = Heading> {
        Heading::ALL.into_iter().filter(move |&side| self.contains(side))
    }
}

/// One cell of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    coord: Coord,
    kind: SpaceKind,
    heading: Heading,
    walls: Walls,
    occupant: Option<PlayerId>,
}

impl Space {
    #[must_use]
    pub const fn new(coord: Coord, kind: SpaceKind, heading: Heading, walls: Walls) -> Self {
        Self {
            coord,
            kind,
            heading,
            walls,
            occupant: None,
        }
    }

    #[must_use]
    pub const fn coord(&self) -> Coord {
        self.coord
    }

    #[must_use]
    pub const fn kind(&self) -> SpaceKind {
        self.kind
    }

    #[must_use]
    pub const fn heading(&self) -> Heading {
        self.heading
    }

    #[must_use]
    pub const fn walls(&self) -> Walls {
        self.walls
    }

    #[must_use]
    pub const fn occupant(&self) -> Option<PlayerId> {
        self.occupant
    }

    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub(crate) fn set_occupant(&mut self, occupant: Option<PlayerId>) {
        self.occupant = occupant;
    }

    /// The effect this space has on a robot standing on it.
    #[must_use]
    pub fn effect(&self) -> TileEffect {
        let heading = self.heading;
        match self.kind {
            SpaceKind::ConveyorBelt | SpaceKind::PushPanel => TileEffect::Convey {
                direction: heading,
                distance: 1,
            },
            SpaceKind::DoubleConveyorBelt
            | SpaceKind::DoubleLeftTreeConveyorBelt
            | SpaceKind::DoubleRightTreeConveyorBelt => TileEffect::Convey {
                direction: heading,
                distance: 2,
            },
            SpaceKind::LeftConveyorBelt => TileEffect::Convey {
                direction: heading.prev(),
                distance: 1,
            },
            SpaceKind::RightConveyorBelt => TileEffect::Convey {
                direction: heading.next(),
                distance: 1,
            },
            SpaceKind::LeftGear => TileEffect::Rotate { clockwise: false },
            SpaceKind::RightGear => TileEffect::Rotate { clockwise: true },
            SpaceKind::EnergySpace => TileEffect::Energy,
            SpaceKind::Checkpoint(_) => TileEffect::Checkpoint,
            SpaceKind::PriorityAntenna => TileEffect::Antenna,
            SpaceKind::BoardLaser => TileEffect::Laser,
            SpaceKind::Normal
            | SpaceKind::StartingGear
            | SpaceKind::BoardLaserStart
            | SpaceKind::BoardLaserEnd
            | SpaceKind::Pit
            | SpaceKind::Wall
            | SpaceKind::Respawn => TileEffect::None,
        }
    }
}
