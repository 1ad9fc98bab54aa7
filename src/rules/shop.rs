//! The shared upgrade shop.
//!
//! The shop has one slot per seat, filled from the board's upgrade deck.
//! Robots shop in turn order (`current_turn`): each may buy upgrades for
//! energy and then passes the turn. When every robot has had its shop turn
//! during initialisation, the first programming phase starts.
//!
//! Permanent upgrades (`RammingGear`, `VirusModule`) stay installed and
//! act whenever their owner pushes a robot. Temporary upgrades (`Recharge`,
//! `Boink`) are used once and retired from the game.

use tracing::{debug, info};

use crate::board::Phase;
use crate::cards::{Command, FieldRef};
use crate::core::{EngineResult, PlayerId};

use super::controller::GameController;

impl GameController {
    fn shop_open(&self) -> bool {
        self.winner.is_none()
            && matches!(self.board.phase, Phase::Initialisation | Phase::Programming)
    }

    /// Restock every shop slot and give the first robot the shop turn.
    ///
    /// Unsold cards go back to the upgrade deck's discard pile.
    pub fn open_shop(&mut self) -> bool {
        if !self.shop_open() {
            debug!(phase = %self.board.phase, "Shop refused");
            return false;
        }

        for slot in 0..self.board.shop.len() {
            if let Some(unsold) = self.board.take_card(FieldRef::Shop(slot)) {
                self.board.upgrade_deck.send_to_discard_pile(unsold);
            }
            let card = self.board.upgrade_deck.deal(&mut self.board.generator);
            self.board.put_card(FieldRef::Shop(slot), card);
        }
        self.board.current_turn = self.board.roster.first().copied();
        self.shop_done = vec![false; self.board.player_count()];
        true
    }

    /// Buy the card in shop slot `slot` for the robot whose turn it is.
    ///
    /// Returns `Ok(false)` if it is not this robot's turn, the slot is
    /// empty, no matching upgrade slot is free, or the robot cannot pay.
    ///
    /// # Errors
    ///
    /// `UnknownPlayer` for an empty seat.
    pub fn purchase_upgrade(&mut self, player: PlayerId, slot: usize) -> EngineResult<bool> {
        let robot = self.board.require(player)?;
        if !self.shop_open() || self.board.current_turn != Some(player) {
            return Ok(false);
        }
        let Some(card) = self
            .board
            .field(FieldRef::Shop(slot))
            .and_then(|field| field.card())
            .copied()
        else {
            return Ok(false);
        };

        let command = card.command();
        let target = if command.is_permanent_upgrade() {
            robot
                .permanent_upgrades()
                .iter()
                .position(|field| field.is_empty())
                .map(|free| FieldRef::PermanentUpgrade(player, free))
        } else if command.is_temporary_upgrade() {
            robot
                .temporary_upgrades()
                .iter()
                .position(|field| field.is_empty())
                .map(|free| FieldRef::TemporaryUpgrade(player, free))
        } else {
            None
        };
        let Some(target) = target else {
            debug!(player = player.index(), upgrade = %command, "No free upgrade slot");
            return Ok(false);
        };

        let cost = self.board.config.upgrade_cost;
        if !self.board.spend_energy(player, cost) {
            debug!(player = player.index(), cost, "Not enough energy");
            return Ok(false);
        }

        self.board.take_card(FieldRef::Shop(slot));
        self.board.put_card(target, Some(card));
        info!(player = player.index(), upgrade = %command, cost, "Upgrade bought");
        Ok(true)
    }

    /// End this robot's shop turn.
    ///
    /// During initialisation the last robot to finish starts the first
    /// programming phase. Returns `Ok(false)` if the shop is not open, it is
    /// not this robot's turn, or the robot already finished since the shop
    /// was last opened.
    ///
    /// # Errors
    ///
    /// `UnknownPlayer` for an empty seat.
    pub fn finish_shop_turn(&mut self, player: PlayerId) -> EngineResult<bool> {
        self.board.require(player)?;
        if !self.shop_open() || self.board.current_turn != Some(player) {
            return Ok(false);
        }
        if self.shop_done.is_empty() || self.shop_done.get(player.index()) == Some(&true) {
            debug!(player = player.index(), "Shop turn already finished");
            return Ok(false);
        }

        let seats = self.board.player_count();
        self.shop_done.resize(seats, false);
        self.shop_done[player.index()] = true;
        self.board.move_current_turn();

        if self.board.phase == Phase::Initialisation && self.shop_done.iter().all(|&done| done) {
            self.start_programming_phase();
        }
        Ok(true)
    }

    /// Use a temporary upgrade and retire it.
    ///
    /// `Recharge` gives three energy; `Boink` has no effect on the board.
    ///
    /// # Errors
    ///
    /// `UnknownPlayer` for an empty seat.
    pub fn use_temporary_upgrade(&mut self, player: PlayerId, slot: usize) -> EngineResult<bool> {
        self.board.require(player)?;
        if self.winner.is_some() {
            return Ok(false);
        }
        let Some(card) = self.board.take_card(FieldRef::TemporaryUpgrade(player, slot)) else {
            return Ok(false);
        };

        if card.command() == Command::Recharge {
            self.board.add_energy(player, 3);
        }
        debug!(player = player.index(), upgrade = %card.command(), "Temporary upgrade used");
        self.board.upgrade_deck.send_to_discard_upgrade(card);
        self.check_winner();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Course};
    use crate::cards::CardKind;
    use crate::core::{EngineError, GameConfig};

    fn shop(players: usize) -> GameController {
        let mut board = Board::new(&Course::new("shop", 4, 4), GameConfig::default()).unwrap();
        board.seat_players(players).unwrap();
        let mut game = GameController::new(board);
        assert!(game.open_shop());
        game
    }

    fn stock(game: &mut GameController, slot: usize, command: Command) {
        let card = game.board.generator.card_of(command, CardKind::Upgrade);
        game.board.put_card(FieldRef::Shop(slot), Some(card));
    }

    #[test]
    fn test_open_shop_fills_slots() {
        let game = shop(3);
        assert_eq!(game.board().shop().len(), 3);
        assert!(game.board().shop().iter().all(|field| !field.is_empty()));
        assert_eq!(game.board().upgrade_deck().len(), 30);
    }

    #[test]
    fn test_purchase_permanent_upgrade() {
        let mut game = shop(2);
        stock(&mut game, 1, Command::RammingGear);
        let buyer = PlayerId::new(0);

        assert!(game.purchase_upgrade(buyer, 1).unwrap());

        let robot = game.board().player(buyer).unwrap();
        assert!(robot.has_upgrade(Command::RammingGear));
        assert_eq!(robot.energy(), 4);
        assert!(game.board().shop()[1].is_empty());
        assert!(!game.purchase_upgrade(buyer, 1).unwrap());
    }

    #[test]
    fn test_purchase_out_of_turn() {
        let mut game = shop(2);
        assert!(!game.purchase_upgrade(PlayerId::new(1), 0).unwrap());
        assert!(matches!(
            game.purchase_upgrade(PlayerId::new(5), 0),
            Err(EngineError::UnknownPlayer(_))
        ));
    }

    #[test]
    fn test_purchase_needs_energy() {
        let mut board = Board::new(
            &Course::new("poor", 2, 2),
            GameConfig::default().with_starting_energy(0),
        )
        .unwrap();
        board.seat_players(1).unwrap();
        let mut game = GameController::new(board);
        game.open_shop();

        assert!(!game.purchase_upgrade(PlayerId::new(0), 0).unwrap());
        assert!(!game.board().shop()[0].is_empty());
    }

    #[test]
    fn test_shop_turns_start_programming() {
        let mut game = shop(2);
        assert!(!game.finish_shop_turn(PlayerId::new(1)).unwrap());

        assert!(game.finish_shop_turn(PlayerId::new(0)).unwrap());
        assert_eq!(game.board().phase(), Phase::Initialisation);
        assert_eq!(game.board().current_turn(), Some(PlayerId::new(1)));

        assert!(game.finish_shop_turn(PlayerId::new(1)).unwrap());
        assert_eq!(game.board().phase(), Phase::Programming);
    }

    #[test]
    fn test_shop_turn_finishes_once() {
        let mut board = Board::new(&Course::new("shop", 4, 4), GameConfig::default()).unwrap();
        board.seat_players(2).unwrap();
        let mut game = GameController::new(board);
        game.start_programming_phase();
        assert!(game.open_shop());

        assert!(game.finish_shop_turn(PlayerId::new(0)).unwrap());
        assert!(game.finish_shop_turn(PlayerId::new(1)).unwrap());
        // The last robot keeps the turn but has nothing left to finish.
        assert_eq!(game.board().current_turn(), Some(PlayerId::new(1)));
        assert!(!game.finish_shop_turn(PlayerId::new(1)).unwrap());
        assert_eq!(game.board().phase(), Phase::Programming);

        // Programming closes the shop until it is opened again.
        game.start_programming_phase();
        assert!(!game.finish_shop_turn(PlayerId::new(1)).unwrap());
    }

    #[test]
    fn test_use_temporary_upgrade() {
        let mut game = shop(1);
        stock(&mut game, 0, Command::Recharge);
        let robot = PlayerId::new(0);
        assert!(game.purchase_upgrade(robot, 0).unwrap());
        assert_eq!(game.board().player(robot).unwrap().energy(), 4);

        assert!(game.use_temporary_upgrade(robot, 0).unwrap());
        assert_eq!(game.board().player(robot).unwrap().energy(), 7);
        assert_eq!(game.board().upgrade_deck().retired().len(), 1);
        assert!(!game.use_temporary_upgrade(robot, 0).unwrap());
    }
}
