//! Built-in courses.
//!
//! Both presets have six starting gears along the west edge, so a full
//! table of robots can take part.

use crate::board::{Course, SpaceKind};
use crate::core::Heading;

/// Names accepted by [`by_name`].
pub const NAMES: [&str; 2] = ["starter", "sprint"];

/// Look up a preset by name.
#[must_use]
pub fn by_name(name: &str) -> Option<Course> {
    match name {
        "starter" => Some(starter()),
        "sprint" => Some(sprint()),
        _ => None,
    }
}

fn starting_column(mut course: Course, x: u16, rows: std::ops::Range<u16>) -> Course {
    for y in rows {
        course = course.with_space(x, y, SpaceKind::StartingGear, Heading::East);
    }
    course
}

/// A 10x8 course with three checkpoints.
///
/// Uses every kind of active tile: conveyors, gears, a board laser, an
/// energy space, walls and a priority antenna.
#[must_use]
pub fn starter() -> Course {
    let course = Course::new("starter", 10, 8)
        .with_space(0, 0, SpaceKind::PriorityAntenna, Heading::East);
    starting_column(course, 0, 1..7)
        // Conveyor run towards the first checkpoint.
        .with_space(3, 1, SpaceKind::ConveyorBelt, Heading::East)
        .with_space(4, 1, SpaceKind::ConveyorBelt, Heading::East)
        .with_space(5, 1, SpaceKind::ConveyorBelt, Heading::East)
        .with_space(6, 1, SpaceKind::RightConveyorBelt, Heading::East)
        .with_space(6, 6, SpaceKind::DoubleConveyorBelt, Heading::North)
        .with_space(6, 5, SpaceKind::DoubleConveyorBelt, Heading::North)
        .with_space(4, 4, SpaceKind::RightGear, Heading::North)
        .with_space(7, 3, SpaceKind::LeftGear, Heading::North)
        .with_space(5, 2, SpaceKind::BoardLaserStart, Heading::South)
        .with_space(5, 3, SpaceKind::BoardLaser, Heading::South)
        .with_space(5, 4, SpaceKind::BoardLaserEnd, Heading::South)
        .with_space(2, 6, SpaceKind::EnergySpace, Heading::North)
        .with_space(8, 1, SpaceKind::EnergySpace, Heading::North)
        .with_space(7, 0, SpaceKind::Pit, Heading::North)
        .with_space(2, 4, SpaceKind::Wall, Heading::North)
        .with_space(9, 1, SpaceKind::Checkpoint(1), Heading::North)
        .with_space(7, 6, SpaceKind::Checkpoint(2), Heading::North)
        .with_space(3, 4, SpaceKind::Checkpoint(3), Heading::North)
        .with_wall(2, 2, Heading::East)
        .with_wall(3, 5, Heading::North)
        .with_wall(8, 4, Heading::West)
        .with_wall(9, 2, Heading::North)
}

/// A 12x6 drag race with two checkpoints at the far edge.
#[must_use]
pub fn sprint() -> Course {
    let mut course = Course::new("sprint", 12, 6)
        .with_space(1, 0, SpaceKind::PriorityAntenna, Heading::East);
    course = starting_column(course, 0, 0..6);
    for x in 3..9 {
        course = course.with_space(x, 2, SpaceKind::DoubleConveyorBelt, Heading::East);
    }
    course
        .with_space(6, 4, SpaceKind::PushPanel, Heading::North)
        .with_space(9, 3, SpaceKind::EnergySpace, Heading::North)
        .with_space(10, 1, SpaceKind::Pit, Heading::North)
        .with_space(11, 2, SpaceKind::Checkpoint(1), Heading::North)
        .with_space(11, 5, SpaceKind::Checkpoint(2), Heading::North)
        .with_wall(8, 4, Heading::East)
        .with_wall(10, 2, Heading::South)
}
