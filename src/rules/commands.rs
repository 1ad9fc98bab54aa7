//! Command interpretation.
//!
//! `execute_command` is total over `Command`: every variant either changes
//! the board or is a documented no-op. After each command every space is
//! activated again, since a push may have moved another robot onto an
//! active space, and the win check runs.

use tracing::trace;

use crate::cards::Command;
use crate::core::{Heading, PlayerId};

use super::controller::GameController;
use super::movement::MoveCause;

impl GameController {
    /// Execute one command for a robot in the current register.
    ///
    /// The command actually carried out is recorded for the register so a
    /// later `Again` can repeat it.
    pub fn execute_command(&mut self, player: PlayerId, command: Command) {
        if self.board.player(player).is_none() {
            return;
        }
        let step = self.board.step;
        let executed = self.apply(player, command);
        self.board.players[player.index()].record(step, executed);

        self.board.activate_all();
        self.check_winner();
    }

    /// Carry out a command, returning what was effectively executed.
    fn apply(&mut self, player: PlayerId, command: Command) -> Option<Command> {
        trace!(player = player.index(), %command, "Command");
        match command {
            Command::Forward => {
                self.move_forward(player, 1, true);
            }
            Command::Forward2 => {
                self.move_forward(player, 2, true);
            }
            Command::Forward3 => {
                self.move_forward(player, 3, true);
            }
            Command::Back => {
                self.move_forward(player, 1, false);
            }
            Command::Right => self.turn(player, Heading::next),
            Command::Left => self.turn(player, Heading::prev),
            Command::UTurn => self.turn(player, Heading::opposite),
            Command::Again => {
                let previous = self.previous_command(player)?;
                return self.apply(player, previous);
            }
            Command::PowerUp => self.board.add_energy(player, 1),
            Command::Recharge => self.board.add_energy(player, 3),
            Command::Spam => self.play_top_card(player),
            Command::RammingGear | Command::VirusModule | Command::Boink => {}
            Command::OptionLeftRight | Command::OptionLeftForward => return None,
        }
        Some(command)
    }

    /// Move a robot along its heading, or backwards against it.
    ///
    /// Returns the number of spaces actually moved.
    pub fn move_forward(&mut self, player: PlayerId, spaces: usize, forward: bool) -> usize {
        let Some(heading) = self.board.player(player).map(|robot| robot.heading()) else {
            return 0;
        };
        let direction = if forward { heading } else { heading.opposite() };
        self.board.move_robot(player, direction, spaces, MoveCause::Program)
    }

    fn turn(&mut self, player: PlayerId, rotate: fn(Heading) -> Heading) {
        if let Some(robot) = self.board.player(player) {
            let heading = rotate(robot.heading());
            self.board.set_heading(player, heading);
        }
    }

    /// Command executed in the register before the current one.
    fn previous_command(&self, player: PlayerId) -> Option<Command> {
        let previous = self.board.step.checked_sub(1)?;
        self.board
            .player(player)?
            .history()
            .get(previous)
            .copied()
            .flatten()
    }

    /// SPAM: the top card of the robot's own deck is played in its place.
    fn play_top_card(&mut self, player: PlayerId) {
        let Some(card) = self.board.draw(player) else {
            return;
        };
        if !card.command().is_interactive() {
            self.apply(player, card.command());
        }
        self.board.discard(player, card);
    }
}
