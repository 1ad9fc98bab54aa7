//! State-change events.
//!
//! The board records a `GameEvent` for every observable change. Renderers
//! and network layers call `Board::drain_events` after each engine call
//! and refresh whatever the events touch; the engine never calls out.
//!
//! ## Event Data
//!
//! Events carry the new value, not a diff, so a consumer that missed
//! earlier events still ends up consistent.
//!
//! ## Capacity
//!
//! A queue holds at most `EventQueue::DEFAULT_CAPACITY` events. When it is
//! full the oldest event is dropped, so a board nobody drains stays
//! bounded in memory.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::board::{Coord, Phase};
use crate::cards::FieldRef;
use crate::core::{Heading, PlayerId};

/// Something observable that changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: Phase, to: Phase },
    StepChanged { step: usize },
    RobotMoved {
        player: PlayerId,
        from: Option<Coord>,
        to: Option<Coord>,
    },
    HeadingChanged { player: PlayerId, heading: Heading },
    EnergyChanged { player: PlayerId, energy: u32 },
    CheckpointReached { player: PlayerId, checkpoint: u32 },
    /// Roster reordered; `order[0]` has the current turn.
    TurnOrderChanged { order: Vec<PlayerId> },
    CardFieldChanged { field: FieldRef },
    WinnerDetected { player: PlayerId },
}

/// Events recorded since the last drain, oldest first.
///
/// FIFO with a fixed capacity: when full, the oldest event is removed.
#[derive(Clone, Debug)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
    max_events: usize,
}

impl EventQueue {
    /// Capacity of a queue built with `new`.
    pub const DEFAULT_CAPACITY: usize = 4096;

    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// A queue keeping at most `max_events` pending events.
    #[must_use]
    pub fn with_capacity(max_events: usize) -> Self {
        assert!(max_events > 0, "event queue needs room for one event");
        Self {
            events: VecDeque::new(),
            max_events,
        }
    }

    /// Record an event, dropping the oldest one if the queue is full.
    pub fn push(&mut self, event: GameEvent) {
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Take every pending event.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_events
    }

    /// Pending events without removing them.
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::StepChanged { step: 1 });
        queue.push(GameEvent::EnergyChanged {
            player: PlayerId::new(0),
            energy: 6,
        });
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert_eq!(drained[0], GameEvent::StepChanged { step: 1 });
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_full_queue_drops_oldest() {
        let mut queue = EventQueue::with_capacity(3);
        for step in 0..5 {
            queue.push(GameEvent::StepChanged { step });
        }
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.capacity(), 3);

        let steps: Vec<_> = queue
            .drain()
            .into_iter()
            .map(|event| match event {
                GameEvent::StepChanged { step } => step,
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(steps, vec![2, 3, 4]);
    }

    #[test]
    fn test_undrained_board_stays_bounded() {
        let mut queue = EventQueue::new();
        for step in 0..EventQueue::DEFAULT_CAPACITY + 10 {
            queue.push(GameEvent::StepChanged { step });
        }
        assert_eq!(queue.len(), EventQueue::DEFAULT_CAPACITY);
        assert_eq!(queue.iter().next(), Some(&GameEvent::StepChanged { step: 10 }));
    }
}
