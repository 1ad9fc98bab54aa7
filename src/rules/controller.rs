//! The game controller: phase machine and external API.
//!
//! ## Phases
//!
//! ```text
//! Initialisation -> Programming -> Activation <-> PlayerInteraction
//!                       ^              |
//!                       +--------------+
//! ```
//!
//! During activation each register is played in the roster order fixed
//! when it starts, one robot at a time. An interactive card pauses the game in `PlayerInteraction`
//! until `execute_command_option_and_continue` supplies the choice. When
//! the last robot has played a register, every space is activated, the
//! spent cards are discarded and the next register becomes visible. After
//! the last register a new programming phase starts.
//!
//! ## Granularity
//!
//! `execute_programs` runs until programming, a pause or a win;
//! `execute_register` finishes the current register; `execute_step` plays
//! exactly one card. A resumed interaction continues in whichever of these
//! was running when it paused.
//!
//! Once a winner is detected every progression call is a no-op.

use tracing::{debug, info};

use crate::board::{Board, Phase, SpaceKind};
use crate::cards::{CardField, Command, CommandCard, FieldRef};
use crate::core::{EngineError, EngineResult, PlayerId};
use crate::events::GameEvent;

/// How far a call to the controller should run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Granularity {
    Programs,
    Register,
    Step,
}

/// Drives a `Board` through the phases of the game.
#[derive(Clone, Debug)]
pub struct GameController {
    pub(crate) board: Board,
    pub(crate) winner: Option<PlayerId>,
    pub(crate) granularity: Granularity,
    pub(crate) shop_done: Vec<bool>,
}

impl GameController {
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            board,
            winner: None,
            granularity: Granularity::Programs,
            shop_done: Vec::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board, for seating players and draining events.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[must_use]
    pub fn into_board(self) -> Board {
        self.board
    }

    /// The winner, once one has been detected.
    #[must_use]
    pub fn get_winner(&self) -> Option<PlayerId> {
        self.winner.or_else(|| self.board.get_winner())
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    #[must_use]
    pub fn status_message(&self) -> String {
        self.board.status_message()
    }

    // === Phase transitions ===

    /// Begin a programming phase.
    ///
    /// Leftover register and hand cards go to each robot's discard pile,
    /// a fresh hand is dealt and every robot gains one energy.
    pub fn start_programming_phase(&mut self) -> bool {
        if self.winner.is_some() {
            debug!("Programming refused: game is over");
            return false;
        }

        self.board.set_phase(Phase::Programming);
        self.board.set_step(0);
        self.board.current_player = self.board.roster.first().copied();

        let registers = self.board.config.register_count;
        let hand_size = self.board.config.hand_size;
        for seat in PlayerId::all(self.board.player_count()) {
            for register in 0..registers {
                if let Some(card) = self.board.take_card(FieldRef::Program(seat, register)) {
                    self.board.discard(seat, card);
                }
                if let Some(field) = self.board.field_mut(FieldRef::Program(seat, register)) {
                    field.set_visible(true);
                }
            }
            for slot in 0..hand_size {
                if let Some(card) = self.board.take_card(FieldRef::Hand(seat, slot)) {
                    self.board.discard(seat, card);
                }
            }
            self.board.players[seat.index()].clear_history();

            for slot in 0..hand_size {
                let card = self.board.draw(seat);
                self.board.put_card(FieldRef::Hand(seat, slot), card);
            }
            self.board.add_energy(seat, 1);
        }

        self.shop_done.clear();
        true
    }

    /// End programming and start executing registers.
    ///
    /// Refused in any phase but programming. In the first round it is also
    /// refused until every robot has been placed, on a starting gear if the
    /// course has any.
    pub fn finish_programming_phase(&mut self) -> bool {
        if self.winner.is_some() {
            debug!("Activation refused: game is over");
            return false;
        }
        if self.board.phase != Phase::Programming {
            debug!(phase = %self.board.phase, "Activation refused: not programming");
            return false;
        }
        if self.board.round == 0 && !self.starting_positions_ready() {
            debug!("Activation refused: robots are not on their starting spaces");
            return false;
        }

        if let Some(antenna) = self.board.antenna {
            self.board.determine_turn(antenna.x, antenna.y);
        }
        for robot in &mut self.board.players {
            for (register, field) in robot.program_mut().iter_mut().enumerate() {
                field.set_visible(register == 0);
            }
        }

        self.board.set_phase(Phase::Activation);
        self.board.set_step(0);
        self.begin_register();
        self.board.round += 1;
        true
    }

    /// Fix the play order of the register about to run.
    ///
    /// Turn order changes from the antenna during the register apply from
    /// the next one.
    fn begin_register(&mut self) {
        self.board.register_order = self.board.roster.clone();
        self.board.current_player = self.board.register_order.first().copied();
    }

    fn starting_positions_ready(&self) -> bool {
        let gears = self.board.has_starting_gears();
        !self.board.players.is_empty()
            && self.board.players.iter().all(|robot| {
                robot.position().is_some_and(|at| {
                    !gears
                        || self
                            .board
                            .space(at)
                            .is_some_and(|space| space.kind() == SpaceKind::StartingGear)
                })
            })
    }

    // === Execution ===

    /// Run registers until programming, an interactive pause or a win.
    pub fn execute_programs(&mut self) {
        self.run(Granularity::Programs);
    }

    /// Finish the current register.
    pub fn execute_register(&mut self) {
        self.run(Granularity::Register);
    }

    /// Play exactly one card.
    pub fn execute_step(&mut self) {
        self.run(Granularity::Step);
    }

    pub(crate) fn run(&mut self, granularity: Granularity) {
        self.granularity = granularity;
        self.board.set_step_mode(granularity != Granularity::Programs);

        loop {
            if self.winner.is_some() || self.board.phase != Phase::Activation {
                break;
            }
            let step = self.board.step;
            if !self.execute_next_step() {
                debug!("Activation stalled: no robot to play");
                break;
            }
            match granularity {
                Granularity::Step => break,
                Granularity::Register if self.board.step != step => break,
                _ => {}
            }
        }
    }

    /// Play the current robot's card. Returns `false` if there is no
    /// current robot, so nothing could happen.
    fn execute_next_step(&mut self) -> bool {
        let Some(current) = self.board.current_player else {
            return false;
        };
        let step = self.board.step;
        let command = self
            .board
            .player(current)
            .and_then(|robot| robot.program_field(step))
            .and_then(CardField::card)
            .map(CommandCard::command);

        match command {
            Some(command) if command.is_interactive() => {
                debug!(player = current.index(), card = %command, "Waiting for a choice");
                self.board.set_phase(Phase::PlayerInteraction);
                return true;
            }
            Some(command) => self.execute_command(current, command),
            None => self.board.players[current.index()].record(step, None),
        }

        if self.winner.is_none() {
            self.advance(current);
        }
        true
    }

    /// Hand the register to the next robot, or close it.
    fn advance(&mut self, current: PlayerId) {
        let order = &self.board.register_order;
        let next = order
            .iter()
            .position(|&p| p == current)
            .and_then(|at| order.get(at + 1))
            .copied();

        match next {
            Some(next) => self.board.current_player = Some(next),
            None => self.end_register(),
        }
    }

    fn end_register(&mut self) {
        self.board.activate_all();
        self.check_winner();

        let step = self.board.step;
        for seat in PlayerId::all(self.board.player_count()) {
            if let Some(card) = self.board.take_card(FieldRef::Program(seat, step)) {
                self.board.discard(seat, card);
            }
        }
        if self.winner.is_some() {
            return;
        }

        let next = step + 1;
        if next < self.board.config.register_count {
            self.board.set_step(next);
            for robot in &mut self.board.players {
                if let Some(field) = robot.program_mut().get_mut(next) {
                    field.set_visible(true);
                }
            }
            self.begin_register();
        } else {
            self.start_programming_phase();
        }
    }

    /// Resolve a paused interactive card with the chosen option.
    ///
    /// Returns `Ok(false)` when nothing is waiting for this robot.
    ///
    /// # Errors
    ///
    /// `UnknownPlayer` for an empty seat, `NotAnOption` if `option` is not
    /// one of the paused card's choices.
    pub fn execute_command_option_and_continue(
        &mut self,
        player: PlayerId,
        option: Command,
    ) -> EngineResult<bool> {
        self.board.require(player)?;
        if self.winner.is_some()
            || self.board.phase != Phase::PlayerInteraction
            || self.board.current_player != Some(player)
        {
            debug!(player = player.index(), phase = %self.board.phase, "No choice pending");
            return Ok(false);
        }

        let step = self.board.step;
        let Some(pending) = self
            .board
            .player(player)
            .and_then(|robot| robot.program_field(step))
            .and_then(CardField::card)
            .map(CommandCard::command)
        else {
            return Ok(false);
        };
        if !pending.options().contains(&option) {
            return Err(EngineError::NotAnOption {
                command: option.display_name().to_string(),
            });
        }

        self.board.set_phase(Phase::Activation);
        self.execute_command(player, option);
        if self.winner.is_none() {
            self.advance(player);
        }

        match self.granularity {
            Granularity::Programs => self.run(Granularity::Programs),
            Granularity::Register if self.board.step == step => {
                self.run(Granularity::Register);
            }
            _ => {}
        }
        Ok(true)
    }

    /// As `execute_command_option_and_continue`, with the option by name.
    ///
    /// # Errors
    ///
    /// `UnknownCommand` if the name matches no command, otherwise as
    /// `execute_command_option_and_continue`.
    pub fn execute_command_option_by_name(
        &mut self,
        player: PlayerId,
        option: &str,
    ) -> EngineResult<bool> {
        let option: Command = option.parse()?;
        self.execute_command_option_and_continue(player, option)
    }

    pub(crate) fn check_winner(&mut self) {
        if self.winner.is_some() {
            return;
        }
        if let Some(winner) = self.board.get_winner() {
            let name = self.board.players[winner.index()].name().to_string();
            info!(winner = %name, round = self.board.round, "Winner detected");
            self.winner = Some(winner);
            self.board.events.push(GameEvent::WinnerDetected { player: winner });
        }
    }

    // === Cards ===

    /// Move a card between two fields of the same robot.
    ///
    /// Fails if the source is empty, the target is occupied, the fields
    /// belong to different robots, or either is a shop slot.
    pub fn move_cards(&mut self, source: FieldRef, target: FieldRef) -> bool {
        let owner = source.owner();
        if owner.is_none() || owner != target.owner() {
            return false;
        }
        let Some(target_field) = self.board.field(target) else {
            return false;
        };
        if !target_field.is_empty() {
            return false;
        }
        let Some(card) = self.board.take_card(source) else {
            return false;
        };
        self.board.put_card(target, Some(card));
        true
    }
}
