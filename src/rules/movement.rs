//! Robot movement and pushing.
//!
//! Every move, whether from a program card or a conveyor, goes through
//! `Board::move_robot` with an explicit direction. The robot's heading is
//! never consulted here, so belts carry robots sideways without turning
//! them.
//!
//! ## Pushing
//!
//! Moving into an occupied space pushes the occupant one space further in
//! the same direction, and that robot may push the next one. The whole
//! chain moves together or not at all: if the last robot in the chain is
//! stopped by the edge of the board, a wall or a wall block, nobody moves.

use smallvec::SmallVec;
use tracing::debug;

use crate::board::{Board, Coord};
use crate::cards::Command;
use crate::core::{Heading, PlayerId};

/// Why a robot is moving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveCause {
    /// A program card: ramming and virus upgrades apply.
    Program,
    /// A board element.
    Tile,
}

impl Board {
    /// The space one step from `from` toward `direction`, if a robot may
    /// cross that edge.
    ///
    /// The edge is blocked by a wall on either side of it; a `Wall` space
    /// cannot be entered at all.
    #[must_use]
    pub fn passable_neighbour(&self, from: Coord, direction: Heading) -> Option<Coord> {
        let here = self.space(from)?;
        if here.walls().contains(direction) {
            return None;
        }
        let to = self.neighbour(from, direction)?;
        let there = self.space(to)?;
        if there.walls().contains(direction.opposite()) || !there.kind().is_passable() {
            return None;
        }
        Some(to)
    }

    /// Move a robot up to `distance` spaces toward `direction`.
    ///
    /// Stops at the first step that cannot be taken; steps already taken
    /// stand. Returns the number of spaces moved.
    pub fn move_robot(
        &mut self,
        player: PlayerId,
        direction: Heading,
        distance: usize,
        cause: MoveCause,
    ) -> usize {
        for moved in 0..distance {
            if !self.try_step(player, direction, cause) {
                debug!(
                    player = player.index(),
                    %direction,
                    moved,
                    distance,
                    "Movement blocked"
                );
                return moved;
            }
        }
        distance
    }

    /// Move a robot one space, pushing any robots in the way.
    ///
    /// Returns `false`, with nothing moved, if the robot is off the board
    /// or the step (or any push it causes) is blocked.
    pub fn try_step(&mut self, player: PlayerId, direction: Heading, cause: MoveCause) -> bool {
        let Some(from) = self.player(player).and_then(|p| p.position()) else {
            return false;
        };

        let mut chain: SmallVec<[PlayerId; 4]> = SmallVec::new();
        let mut cursor = from;
        loop {
            let Some(next) = self.passable_neighbour(cursor, direction) else {
                return false;
            };
            match self.space(next).and_then(|s| s.occupant()) {
                Some(occupant) => {
                    chain.push(occupant);
                    cursor = next;
                }
                None => break,
            }
        }

        // Move the far end of the chain first so every destination is free.
        for &pushed in chain.iter().rev() {
            let destination = self
                .player(pushed)
                .and_then(|p| p.position())
                .and_then(|at| self.neighbour(at, direction));
            if !self.place(pushed, destination) {
                return false;
            }
        }
        let Some(destination) = self.neighbour(from, direction) else {
            return false;
        };
        if !self.place(player, Some(destination)) {
            return false;
        }

        if let Some(&victim) = chain.first() {
            debug!(
                pusher = player.index(),
                pushed = chain.len(),
                %direction,
                "Robots pushed"
            );
            if cause == MoveCause::Program {
                self.ram(player, victim);
            }
        }
        true
    }

    /// Damage from the pusher's upgrades to the robot it pushed directly.
    fn ram(&mut self, pusher: PlayerId, victim: PlayerId) {
        let Some(robot) = self.player(pusher) else {
            return;
        };
        let ramming = robot.has_upgrade(Command::RammingGear);
        let virus = robot.has_upgrade(Command::VirusModule);
        if ramming {
            self.inject(victim, false);
        }
        if virus {
            self.inject(victim, true);
        }
    }
}
