//! Card fields: the slots a card can sit in.
//!
//! Registers, hand slots, upgrade slots and shop slots are all `CardField`s.
//! A `FieldRef` names one of them from outside the engine, which is how the
//! drag-and-drop collaborator asks for a card to be moved.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

use super::command::CommandCard;

/// A slot holding at most one card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardField {
    card: Option<CommandCard>,
    visible: bool,
}

impl Default for CardField {
    fn default() -> Self {
        Self::new()
    }
}

impl CardField {
    /// An empty, visible field.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            card: None,
            visible: true,
        }
    }

    #[must_use]
    pub fn card(&self) -> Option<&CommandCard> {
        self.card.as_ref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.card.is_none()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Put a card in the field, returning whatever was there.
    pub fn set_card(&mut self, card: Option<CommandCard>) -> Option<CommandCard> {
        std::mem::replace(&mut self.card, card)
    }

    /// Empty the field.
    pub fn take(&mut self) -> Option<CommandCard> {
        self.card.take()
    }
}

/// Address of a card field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldRef {
    /// Program register `index` of a robot.
    Program(PlayerId, usize),
    /// Hand slot `index` of a robot.
    Hand(PlayerId, usize),
    PermanentUpgrade(PlayerId, usize),
    TemporaryUpgrade(PlayerId, usize),
    /// Shared shop slot `index`.
    Shop(usize),
}

impl FieldRef {
    /// The robot owning the field, if any.
    #[must_use]
    pub const fn owner(self) -> Option<PlayerId> {
        match self {
            FieldRef::Program(player, _)
            | FieldRef::Hand(player, _)
            | FieldRef::PermanentUpgrade(player, _)
            | FieldRef::TemporaryUpgrade(player, _) => Some(player),
            FieldRef::Shop(_) => None,
        }
    }
}
