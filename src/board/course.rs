//! Course templates.
//!
//! A `Course` describes a board before any robot joins it: its size and
//! every space that is not a plain, wall-less `Normal` tile. Courses are
//! plain serde data, so presets can live in code and custom layouts can be
//! loaded from JSON by the caller.
//!
//! ```
//! use rust_rally::board::{Course, SpaceKind};
//! use rust_rally::core::Heading;
//!
//! let course = Course::new("sprint", 3, 1)
//!     .with_space(0, 0, SpaceKind::Checkpoint(1), Heading::North)
//!     .with_wall(1, 0, Heading::East);
//! assert!(course.validate().is_ok());
//! ```

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::{EngineError, EngineResult, Heading};

use super::space::SpaceKind;

/// Layout of one non-default space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceTemplate {
    pub x: u16,
    pub y: u16,
    #[serde(default)]
    pub kind: SpaceKind,
    #[serde(default)]
    pub heading: Heading,
    #[serde(default)]
    pub walls: Vec<Heading>,
}

/// A board layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    pub width: u16,
    pub height: u16,
    #[serde(default)]
    pub spaces: Vec<SpaceTemplate>,
}

impl Course {
    /// An empty course of plain spaces.
    #[must_use]
    pub fn new(name: impl Into<String>, width: u16, height: u16) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            spaces: Vec::new(),
        }
    }

    fn template_mut(&mut self, x: u16, y: u16) -> &mut SpaceTemplate {
        let index = match self.spaces.iter().position(|t| t.x == x && t.y == y) {
            Some(index) => index,
            None => {
                self.spaces.push(SpaceTemplate {
                    x,
                    y,
                    kind: SpaceKind::Normal,
                    heading: Heading::default(),
                    walls: Vec::new(),
                });
                self.spaces.len() - 1
            }
        };
        &mut self.spaces[index]
    }

    /// Set the kind and heading of the space at `(x, y)`.
    #[must_use]
    pub fn with_space(mut self, x: u16, y: u16, kind: SpaceKind, heading: Heading) -> Self {
        let template = self.template_mut(x, y);
        template.kind = kind;
        template.heading = heading;
        self
    }

    /// Add a wall on one side of the space at `(x, y)`.
    #[must_use]
    pub fn with_wall(mut self, x: u16, y: u16, side: Heading) -> Self {
        let template = self.template_mut(x, y);
        if !template.walls.contains(&side) {
            template.walls.push(side);
        }
        self
    }

    /// Check the layout can be built into a board.
    ///
    /// # Errors
    ///
    /// `InvalidCourse` for an empty grid, a template outside the grid, two
    /// templates for one space, or repeated checkpoint indices.
    pub fn validate(&self) -> EngineResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidCourse(format!(
                "{} has an empty {}x{} grid",
                self.name, self.width, self.height
            )));
        }

        let mut seen = FxHashSet::default();
        let mut checkpoints = FxHashSet::default();
        for template in &self.spaces {
            if template.x >= self.width || template.y >= self.height {
                return Err(EngineError::InvalidCourse(format!(
                    "space ({}, {}) lies outside the {}x{} grid",
                    template.x, template.y, self.width, self.height
                )));
            }
            if !seen.insert((template.x, template.y)) {
                return Err(EngineError::InvalidCourse(format!(
                    "space ({}, {}) is defined twice",
                    template.x, template.y
                )));
            }
            if let SpaceKind::Checkpoint(index) = template.kind {
                if !checkpoints.insert(index) {
                    return Err(EngineError::InvalidCourse(format!(
                        "checkpoint {index} appears more than once"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_merges_templates() {
        let course = Course::new("test", 4, 4)
            .with_space(1, 1, SpaceKind::Pit, Heading::North)
            .with_wall(1, 1, Heading::East)
            .with_wall(1, 1, Heading::East);

        assert_eq!(course.spaces.len(), 1);
        assert_eq!(course.spaces[0].kind, SpaceKind::Pit);
        assert_eq!(course.spaces[0].walls, vec![Heading::East]);
    }

    #[test]
    fn test_validate_rejects_bad_layouts() {
        assert!(Course::new("empty", 0, 3).validate().is_err());

        let outside = Course::new("outside", 2, 2).with_space(2, 0, SpaceKind::Pit, Heading::North);
        assert!(matches!(outside.validate(), Err(EngineError::InvalidCourse(_))));

        let mut twice = Course::new("twice", 2, 2).with_space(0, 0, SpaceKind::Pit, Heading::North);
        twice.spaces.push(twice.spaces[0].clone());
        assert!(twice.validate().is_err());

        let repeated = Course::new("repeated", 2, 1)
            .with_space(0, 0, SpaceKind::Checkpoint(1), Heading::North)
            .with_space(1, 0, SpaceKind::Checkpoint(1), Heading::North);
        assert!(repeated.validate().is_err());
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{
            "name": "json",
            "width": 2,
            "height": 2,
            "spaces": [
                { "x": 1, "y": 0, "kind": { "Checkpoint": 1 } },
                { "x": 0, "y": 1, "kind": "ConveyorBelt", "heading": "East", "walls": ["South"] }
            ]
        }"#;
        let course: Course = serde_json::from_str(json).unwrap();

        assert_eq!(course.spaces[0].heading, Heading::North);
        assert!(course.spaces[0].walls.is_empty());
        assert_eq!(course.spaces[1].kind, SpaceKind::ConveyorBelt);
        assert_eq!(course.spaces[1].walls, vec![Heading::South]);
        assert!(course.validate().is_ok());
    }
}
