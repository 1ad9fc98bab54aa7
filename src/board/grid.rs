//! The board: grid of spaces, robots and round state.
//!
//! ## Storage
//!
//! Spaces live in a row-major `Vec` indexed by coordinate, robots in a
//! `Vec` indexed by seat. Spaces refer to robots by `PlayerId` and robots
//! hold a `Coord`, so there are no reference cycles. `Board::place` is the
//! only code that changes occupancy and it always updates both sides.
//!
//! ## Round state
//!
//! `phase`, `step`, `current_player` (activation pointer) and
//! `current_turn` (placement and shop pointer) are stored here and driven
//! by `GameController`. `roster` is the turn order: seats in joining order
//! until a priority antenna reorders them. A reorder during activation only
//! takes effect from the next register, whose play order is copied from the
//! roster when it starts.
//!
//! ## Events
//!
//! Every mutation records a `GameEvent`. Callers drain them with
//! `drain_events`; a queue nobody drains keeps only the most recent
//! events (see `EventQueue`).

use smallvec::SmallVec;
use tracing::{debug, info, trace};

use crate::cards::{CardField, CardGenerator, CommandCard, Deck, FieldRef};
use crate::core::{EngineError, EngineResult, GameConfig, Heading, Player, PlayerId};
use crate::events::{EventQueue, GameEvent};
use crate::rules::movement::MoveCause;

use super::course::Course;
use super::phase::Phase;
use super::space::{Coord, Space, SpaceKind, TileEffect, Walls};

/// Game board.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) name: String,
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) spaces: Vec<Space>,
    pub(crate) players: Vec<Player>,
    pub(crate) roster: Vec<PlayerId>,
    /// Play order of the register being executed, fixed when it starts.
    pub(crate) register_order: Vec<PlayerId>,
    pub(crate) phase: Phase,
    pub(crate) step: usize,
    pub(crate) round: u32,
    pub(crate) current_player: Option<PlayerId>,
    pub(crate) current_turn: Option<PlayerId>,
    pub(crate) step_mode: bool,
    pub(crate) game_id: Option<u64>,
    pub(crate) checkpoint_count: u32,
    pub(crate) antenna: Option<Coord>,
    pub(crate) shop: Vec<CardField>,
    pub(crate) upgrade_deck: Deck,
    pub(crate) generator: CardGenerator,
    pub(crate) config: GameConfig,
    pub(crate) events: EventQueue,
}

impl Board {
    /// Build an empty board from a course.
    ///
    /// # Errors
    ///
    /// `InvalidCourse` if the course fails validation.
    pub fn new(course: &Course, config: GameConfig) -> EngineResult<Self> {
        course.validate()?;

        let mut spaces = Vec::with_capacity(usize::from(course.width) * usize::from(course.height));
        for y in 0..course.height {
            for x in 0..course.width {
                spaces.push(Space::new(
                    Coord::new(x, y),
                    SpaceKind::Normal,
                    Heading::default(),
                    Walls::empty(),
                ));
            }
        }
        for template in &course.spaces {
            let index = usize::from(template.y) * usize::from(course.width) + usize::from(template.x);
            spaces[index] = Space::new(
                Coord::new(template.x, template.y),
                template.kind,
                template.heading,
                Walls::from_headings(&template.walls),
            );
        }

        let checkpoint_count = spaces.iter().filter(|s| s.kind().is_checkpoint()).count() as u32;
        let antenna = spaces
            .iter()
            .find(|s| s.kind() == SpaceKind::PriorityAntenna)
            .map(Space::coord);

        let mut generator = CardGenerator::new(config.seed);
        let upgrade_deck = Deck::upgrade(&mut generator, &config);

        info!(
            course = %course.name,
            width = course.width,
            height = course.height,
            checkpoints = checkpoint_count,
            "Board created"
        );

        Ok(Self {
            name: course.name.clone(),
            width: course.width,
            height: course.height,
            spaces,
            players: Vec::new(),
            roster: Vec::new(),
            register_order: Vec::new(),
            phase: Phase::Initialisation,
            step: 0,
            round: 0,
            current_player: None,
            current_turn: None,
            step_mode: false,
            game_id: None,
            checkpoint_count,
            antenna,
            shop: Vec::new(),
            upgrade_deck,
            generator,
            config,
            events: EventQueue::new(),
        })
    }

    // === Geometry ===

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Whether `(x, y)` lies on the grid.
    #[must_use]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    fn index_of(&self, coord: Coord) -> Option<usize> {
        (coord.x < self.width && coord.y < self.height)
            .then(|| usize::from(coord.y) * usize::from(self.width) + usize::from(coord.x))
    }

    /// Space at a coordinate, `None` off the grid.
    #[must_use]
    pub fn space(&self, coord: Coord) -> Option<&Space> {
        self.index_of(coord).map(|index| &self.spaces[index])
    }

    /// Space at raw coordinates.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `(x, y)` is off the grid.
    pub fn space_at(&self, x: i64, y: i64) -> EngineResult<&Space> {
        if !self.in_bounds(x, y) {
            return Err(EngineError::OutOfBounds { x, y });
        }
        Ok(&self.spaces[y as usize * usize::from(self.width) + x as usize])
    }

    /// All spaces, row-major.
    #[must_use]
    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    /// The adjacent coordinate toward `heading`, `None` past the edge.
    #[must_use]
    pub fn neighbour(&self, coord: Coord, heading: Heading) -> Option<Coord> {
        let (dx, dy) = heading.delta();
        let x = i64::from(coord.x) + i64::from(dx);
        let y = i64::from(coord.y) + i64::from(dy);
        self.in_bounds(x, y).then(|| Coord::new(x as u16, y as u16))
    }

    #[must_use]
    pub fn checkpoint_count(&self) -> u32 {
        self.checkpoint_count
    }

    /// Position of the priority antenna, if the course has one.
    #[must_use]
    pub fn antenna(&self) -> Option<Coord> {
        self.antenna
    }

    #[must_use]
    pub fn has_starting_gears(&self) -> bool {
        self.spaces.iter().any(|s| s.kind() == SpaceKind::StartingGear)
    }

    // === Players ===

    /// Seat a new robot. Colors follow the configured palette by seat.
    ///
    /// # Errors
    ///
    /// `DuplicatePlayer` if the name is taken, `TooManyPlayers` once
    /// `max_players` robots are seated.
    pub fn add_player(&mut self, name: impl Into<String>) -> EngineResult<PlayerId> {
        let name = name.into();
        if self.players.iter().any(|p| p.name() == name) {
            return Err(EngineError::DuplicatePlayer(name));
        }
        let max = self.config.max_players.min(usize::from(u8::MAX));
        if self.players.len() >= max {
            return Err(EngineError::TooManyPlayers { max });
        }

        let seat = PlayerId::new(self.players.len() as u8);
        let color = self.config.color_for(seat.index()).to_string();
        let deck = Deck::program(&mut self.generator, &self.config);
        info!(player = %name, seat = seat.index(), color = %color, "Player seated");

        self.players.push(Player::new(name, color, &self.config, deck));
        self.roster.push(seat);
        self.shop.push(CardField::new());
        self.current_player.get_or_insert(seat);
        self.current_turn.get_or_insert(seat);
        Ok(seat)
    }

    /// Seat `count` robots named "Player 1", "Player 2", ...
    ///
    /// # Errors
    ///
    /// As `add_player`.
    pub fn seat_players(&mut self, count: usize) -> EngineResult<Vec<PlayerId>> {
        (1..=count)
            .map(|n| self.add_player(format!("Player {n}")))
            .collect()
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> Option<&Player> {
        self.players.get(player.index())
    }

    /// Robots by seat.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Seat of the robot with this name.
    #[must_use]
    pub fn player_id(&self, name: &str) -> Option<PlayerId> {
        self.players
            .iter()
            .position(|p| p.name() == name)
            .map(|seat| PlayerId::new(seat as u8))
    }

    /// Current turn order.
    #[must_use]
    pub fn roster(&self) -> &[PlayerId] {
        &self.roster
    }

    pub(crate) fn require(&self, player: PlayerId) -> EngineResult<&Player> {
        self.player(player).ok_or(EngineError::UnknownPlayer(player))
    }

    // === Round state ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Completed programming rounds.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn current_player(&self) -> Option<PlayerId> {
        self.current_player
    }

    pub fn set_current_player(&mut self, player: PlayerId) {
        if self.player(player).is_some() {
            self.current_player = Some(player);
        }
    }

    #[must_use]
    pub fn current_turn(&self) -> Option<PlayerId> {
        self.current_turn
    }

    pub fn set_current_turn(&mut self, player: PlayerId) {
        if self.player(player).is_some() {
            self.current_turn = Some(player);
        }
    }

    /// Pass the turn to the next robot in the roster.
    ///
    /// The last robot keeps the turn.
    pub fn move_current_turn(&mut self) {
        let next = match self.current_turn {
            Some(current) => self
                .roster
                .iter()
                .position(|&p| p == current)
                .and_then(|at| self.roster.get(at + 1))
                .copied()
                .unwrap_or(current),
            None => match self.roster.first() {
                Some(&first) => first,
                None => return,
            },
        };
        self.current_turn = Some(next);
    }

    /// Whether the last execution call stopped after a step or a register
    /// rather than running whole programs. Renderers use it to show the
    /// single-step controls; the engine itself does not branch on it.
    #[must_use]
    pub fn is_step_mode(&self) -> bool {
        self.step_mode
    }

    pub fn set_step_mode(&mut self, step_mode: bool) {
        self.step_mode = step_mode;
    }

    #[must_use]
    pub fn game_id(&self) -> Option<u64> {
        self.game_id
    }

    /// Assign the lobby's game id. Setting the same id again is allowed.
    ///
    /// # Errors
    ///
    /// `GameIdAlreadySet` when a different id was assigned before.
    pub fn set_game_id(&mut self, game_id: u64) -> EngineResult<()> {
        match self.game_id {
            Some(current) if current != game_id => Err(EngineError::GameIdAlreadySet {
                current,
                requested: game_id,
            }),
            _ => {
                self.game_id = Some(game_id);
                Ok(())
            }
        }
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            info!(from = %self.phase, to = %phase, "Phase change");
            self.events.push(GameEvent::PhaseChanged {
                from: self.phase,
                to: phase,
            });
            self.phase = phase;
        }
    }

    pub(crate) fn set_step(&mut self, step: usize) {
        if self.step != step {
            self.step = step;
            self.events.push(GameEvent::StepChanged { step });
        }
    }

    // === Robot mutation ===

    /// Move a robot to `target` (or off the board), keeping the space and
    /// the robot in agreement.
    ///
    /// Refuses, returning `false`, if another robot holds `target`.
    pub(crate) fn place(&mut self, player: PlayerId, target: Option<Coord>) -> bool {
        let Some(robot) = self.players.get(player.index()) else {
            return false;
        };
        let from = robot.position();
        if from == target {
            return true;
        }

        let target_index = match target {
            Some(coord) => match self.index_of(coord) {
                Some(index) => {
                    if self.spaces[index].occupant().is_some_and(|other| other != player) {
                        return false;
                    }
                    Some(index)
                }
                None => return false,
            },
            None => None,
        };

        if let Some(old) = from.and_then(|coord| self.index_of(coord)) {
            self.spaces[old].set_occupant(None);
        }
        if let Some(index) = target_index {
            self.spaces[index].set_occupant(Some(player));
        }
        self.players[player.index()].set_position(target);
        self.events.push(GameEvent::RobotMoved {
            player,
            from,
            to: target,
        });
        true
    }

    pub(crate) fn set_heading(&mut self, player: PlayerId, heading: Heading) {
        if let Some(robot) = self.players.get_mut(player.index()) {
            if robot.heading() != heading {
                robot.set_heading(heading);
                self.events.push(GameEvent::HeadingChanged { player, heading });
            }
        }
    }

    pub(crate) fn add_energy(&mut self, player: PlayerId, amount: u32) {
        if let Some(robot) = self.players.get_mut(player.index()) {
            robot.add_energy(amount);
            self.events.push(GameEvent::EnergyChanged {
                player,
                energy: robot.energy(),
            });
        }
    }

    pub(crate) fn spend_energy(&mut self, player: PlayerId, amount: u32) -> bool {
        let Some(robot) = self.players.get_mut(player.index()) else {
            return false;
        };
        if !robot.spend_energy(amount) {
            return false;
        }
        self.events.push(GameEvent::EnergyChanged {
            player,
            energy: robot.energy(),
        });
        true
    }

    pub(crate) fn advance_checkpoint(&mut self, player: PlayerId) {
        if let Some(robot) = self.players.get_mut(player.index()) {
            robot.advance_checkpoint();
            debug!(player = %robot.name(), checkpoint = robot.checkpoint(), "Checkpoint reached");
            self.events.push(GameEvent::CheckpointReached {
                player,
                checkpoint: robot.checkpoint(),
            });
        }
    }

    // === Cards ===

    /// Draw the top card of a robot's own deck.
    pub(crate) fn draw(&mut self, player: PlayerId) -> Option<CommandCard> {
        let robot = self.players.get_mut(player.index())?;
        robot.deck_mut().deal(&mut self.generator)
    }

    pub(crate) fn discard(&mut self, player: PlayerId, card: CommandCard) {
        if let Some(robot) = self.players.get_mut(player.index()) {
            robot.deck_mut().send_to_discard_pile(card);
        }
    }

    /// Laser hit: one SPAM card onto the discard pile.
    pub(crate) fn deal_damage(&mut self, player: PlayerId) {
        let card = self.generator.damage_card();
        debug!(player = player.index(), card = %card.id(), "Laser damage");
        self.discard(player, card);
    }

    /// Ramming or virus hit: one card shuffled into the deck and another
    /// onto the discard pile.
    pub(crate) fn inject(&mut self, player: PlayerId, virus: bool) {
        let Some(robot) = self.players.get_mut(player.index()) else {
            return;
        };
        let (into_deck, into_discard) = if virus {
            (self.generator.virus_card(), self.generator.virus_card())
        } else {
            (self.generator.damage_card(), self.generator.damage_card())
        };
        debug!(player = %robot.name(), virus, "Card injection");
        robot.deck_mut().add_to_deck(into_deck, &mut self.generator);
        robot.deck_mut().send_to_discard_pile(into_discard);
    }

    /// Field a reference points at.
    #[must_use]
    pub fn field(&self, field: FieldRef) -> Option<&CardField> {
        match field {
            FieldRef::Program(p, i) => self.player(p)?.program().get(i),
            FieldRef::Hand(p, i) => self.player(p)?.hand().get(i),
            FieldRef::PermanentUpgrade(p, i) => self.player(p)?.permanent_upgrades().get(i),
            FieldRef::TemporaryUpgrade(p, i) => self.player(p)?.temporary_upgrades().get(i),
            FieldRef::Shop(i) => self.shop.get(i),
        }
    }

    pub(crate) fn field_mut(&mut self, field: FieldRef) -> Option<&mut CardField> {
        match field {
            FieldRef::Program(p, i) => self.players.get_mut(p.index())?.program_mut().get_mut(i),
            FieldRef::Hand(p, i) => self.players.get_mut(p.index())?.hand_mut().get_mut(i),
            FieldRef::PermanentUpgrade(p, i) => self
                .players
                .get_mut(p.index())?
                .permanent_upgrades_mut()
                .get_mut(i),
            FieldRef::TemporaryUpgrade(p, i) => self
                .players
                .get_mut(p.index())?
                .temporary_upgrades_mut()
                .get_mut(i),
            FieldRef::Shop(i) => self.shop.get_mut(i),
        }
    }

    /// Replace the card in a field, returning the previous one.
    pub(crate) fn put_card(
        &mut self,
        field: FieldRef,
        card: Option<CommandCard>,
    ) -> Option<CommandCard> {
        let slot = self.field_mut(field)?;
        let previous = slot.set_card(card);
        self.events.push(GameEvent::CardFieldChanged { field });
        previous
    }

    /// Empty a field, returning its card.
    pub(crate) fn take_card(&mut self, field: FieldRef) -> Option<CommandCard> {
        if self.field(field)?.is_empty() {
            return None;
        }
        self.put_card(field, None)
    }

    /// Shared upgrade shop slots, one per seat.
    #[must_use]
    pub fn shop(&self) -> &[CardField] {
        &self.shop
    }

    #[must_use]
    pub fn upgrade_deck(&self) -> &Deck {
        &self.upgrade_deck
    }

    // === Turn order ===

    /// Reorder the roster by distance to `(x, y)`, nearest first.
    ///
    /// Equal distances keep seat order; robots off the board go last.
    /// The nearest robot gets the current turn.
    pub fn determine_turn(&mut self, x: u16, y: u16) {
        let target = Coord::new(x, y);
        let players = &self.players;
        self.roster.sort_by_key(|&id| {
            let distance = players[id.index()].distance_sq_to(target);
            (distance.is_none(), distance.unwrap_or(0), id)
        });
        self.current_turn = self.roster.first().copied();
        debug!(antenna = %target, order = ?self.roster, "Turn order determined");
        self.events.push(GameEvent::TurnOrderChanged {
            order: self.roster.clone(),
        });
    }

    // === Tile activation ===

    /// Apply the effect of one space to its occupant, if any.
    pub fn activate_space(&mut self, coord: Coord) {
        let Some(space) = self.space(coord) else {
            return;
        };
        let Some(player) = space.occupant() else {
            return;
        };
        let effect = space.effect();
        trace!(space = %coord, kind = ?space.kind(), player = player.index(), "Tile activation");

        match effect {
            TileEffect::None => {}
            TileEffect::Convey {
                direction,
                distance,
            } => {
                self.move_robot(player, direction, distance, MoveCause::Tile);
            }
            TileEffect::Rotate { clockwise } => {
                let heading = self.players[player.index()].heading();
                let turned = if clockwise {
                    heading.next()
                } else {
                    heading.prev()
                };
                self.set_heading(player, turned);
            }
            TileEffect::Energy => self.add_energy(player, 1),
            TileEffect::Checkpoint => self.advance_checkpoint(player),
            TileEffect::Antenna => self.determine_turn(coord.x, coord.y),
            TileEffect::Laser => self.deal_damage(player),
        }
    }

    /// Activate every occupied space once.
    ///
    /// Occupancy is captured first; a space is only activated if the robot
    /// captured on it is still there, so no robot is affected twice in one
    /// pass.
    pub fn activate_all(&mut self) {
        let occupied: SmallVec<[(Coord, PlayerId); 8]> = self
            .spaces
            .iter()
            .filter_map(|space| space.occupant().map(|player| (space.coord(), player)))
            .collect();

        for (coord, player) in occupied {
            if self.space(coord).and_then(Space::occupant) == Some(player) {
                self.activate_space(coord);
            }
        }
    }

    // === Queries ===

    /// First robot in turn order that has reached every checkpoint.
    ///
    /// A board without checkpoints has no winner.
    #[must_use]
    pub fn get_winner(&self) -> Option<PlayerId> {
        if self.checkpoint_count == 0 {
            return None;
        }
        self.roster
            .iter()
            .copied()
            .find(|id| self.players[id.index()].checkpoint() == self.checkpoint_count)
    }

    /// One-line summary for a status bar.
    #[must_use]
    pub fn status_message(&self) -> String {
        let player = self
            .current_player
            .and_then(|id| self.player(id))
            .map_or("none", Player::name);
        format!(
            "Phase: {}, Player = {}, Step: {}",
            self.phase, player, self.step
        )
    }

    /// Robot headings by seat, lowercase.
    #[must_use]
    pub fn headings_to_strings(&self) -> Vec<String> {
        self.players
            .iter()
            .map(|p| p.heading().as_str().to_string())
            .collect()
    }

    /// Robot positions by seat.
    #[must_use]
    pub fn positions(&self) -> Vec<Option<Coord>> {
        self.players.iter().map(Player::position).collect()
    }

    /// Take every event recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }
}
