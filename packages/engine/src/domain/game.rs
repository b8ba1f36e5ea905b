//! Game aggregate: owns the map, the card stacks, the cube and laboratory
//! pools, the turn list, and the terminal outcome flags. Every mutation of
//! engine state goes through a method on this type (or an action/event that
//! it hands itself to); the transport and presentation layers only read.
//!
//! The engine is single-writer and fully synchronous: an infection cascade
//! resolves completely, including chained outbreaks, before control
//! returns.

use std::collections::{HashSet, VecDeque};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::actions::Action;
use crate::domain::approval::ApprovableRequest;
use crate::domain::card_stack::{seed_epidemics, CardStack};
use crate::domain::cards::{CityCard, EventCard, InfectionCard, PlayerCard};
use crate::domain::events::EventPlay;
use crate::domain::map::{FieldId, GameMap};
use crate::domain::plague::{CubePool, Plague, PlagueCube, PlagueStatus};
use crate::domain::player::{Player, PlayerId, PlayerIdentity};
use crate::domain::rules::{
    infection_rate, starting_hand_size, Difficulty, CITIES_PER_INFECTION_WAVE,
    INITIAL_INFECTION_WAVES, LABORATORIES, MAX_OUTBREAKS,
};
use crate::domain::turn::{InfectionRecord, PlayerTurn, TurnPhase};
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};

/// Why the game was won.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    AllAntidotesDiscovered,
}

/// Why the game was lost.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossReason {
    NoPlagueCubesLeft,
    MaxOutbreaksReached,
    NoPlayerCardsLeft,
    PlayerLeft,
}

/// Terminal result. Won and lost are mutually exclusive; the first reason
/// recorded is final.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", content = "reason", rename_all = "snake_case")]
pub enum GameOutcome {
    Won(WinReason),
    Lost(LossReason),
}

/// Everything needed to construct a game. The same config (players, map,
/// difficulty, seed) always produces the identical game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    pub seed: u64,
    /// Turn order is the order of this list.
    pub players: Vec<PlayerIdentity>,
    /// `None` uses the built-in map.
    pub map: Option<GameMap>,
}

/// Result of one forced player-card draw.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerCardDraw {
    /// `None` when the draw stack was empty: the game is lost.
    pub card: Option<PlayerCard>,
    /// The extra cascade when the card was an epidemic.
    pub epidemic: Option<InfectionRecord>,
    pub phase_after: TurnPhase,
}

/// Result of one forced infection-card draw.
#[derive(Debug, Clone, PartialEq)]
pub struct InfectionCardDraw {
    /// True when a quiet night consumed the whole infection phase.
    pub skipped: bool,
    pub card: Option<InfectionCard>,
    pub infection: Option<InfectionRecord>,
    /// Set when this draw completed the turn and the next one began.
    pub next_player: Option<PlayerId>,
}

/// Aggregate root for one match.
#[derive(Debug, Clone)]
pub struct Game {
    id: Uuid,
    difficulty: Difficulty,
    map: GameMap,
    players: Vec<Player>,
    active_idx: usize,
    past_turns: Vec<PlayerTurn>,
    current_turn: PlayerTurn,
    cube_pool: CubePool,
    laboratories_left: u8,
    plague_status: [PlagueStatus; Plague::COUNT],
    outbreak_level: u8,
    infection_level: usize,
    player_draw: CardStack<PlayerCard>,
    player_discard: CardStack<PlayerCard>,
    infection_draw: CardStack<InfectionCard>,
    infection_discard: CardStack<InfectionCard>,
    quiet_night: bool,
    outcome: Option<GameOutcome>,
    rng: ChaCha8Rng,
}

impl Game {
    /// Build a fresh game: shuffled infection stack, dealt starting hands,
    /// epidemic-seeded draw stack, initial infection, and the first turn.
    pub fn new(config: GameConfig) -> Result<Game, DomainError> {
        let player_count = config.players.len();
        let hand_size = starting_hand_size(player_count).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::InvalidPlayerCount,
                format!("{player_count} players, need 2..=4"),
            )
        })?;

        let mut map = config.map.unwrap_or_else(GameMap::default_map);
        let setup_cities = INITIAL_INFECTION_WAVES.len() * CITIES_PER_INFECTION_WAVE;
        if map.field_count() < setup_cities {
            return Err(DomainError::validation(
                ValidationKind::InvalidMap,
                format!("map needs at least {setup_cities} fields"),
            ));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        // First laboratory sits on the start field.
        let start = map.start_field();
        map.field_mut(start)?.has_laboratory = true;

        let mut players: Vec<Player> = config
            .players
            .into_iter()
            .enumerate()
            .map(|(i, identity)| Player::new(PlayerId(i as u8), identity, start))
            .collect();

        // Infection stack: one card per city.
        let mut infection_draw = CardStack::from_cards(
            map.fields()
                .iter()
                .map(|f| InfectionCard {
                    field: f.id,
                    plague: f.home_plague,
                })
                .collect(),
        );
        infection_draw.shuffle(&mut rng);

        // Base player stack: every city card plus one of each event card.
        let mut base: Vec<PlayerCard> = map
            .fields()
            .iter()
            .map(|f| {
                PlayerCard::City(CityCard {
                    field: f.id,
                    plague: f.home_plague,
                })
            })
            .collect();
        base.extend(EventCard::ALL.into_iter().map(PlayerCard::Event));
        base.shuffle(&mut rng);

        let dealt = player_count * usize::from(hand_size);
        if base.len() < dealt {
            return Err(DomainError::validation(
                ValidationKind::InvalidMap,
                "map too small to deal starting hands",
            ));
        }

        for player in &mut players {
            for _ in 0..hand_size {
                let card = base.pop().ok_or_else(|| {
                    DomainError::validation_other("base stack exhausted while dealing")
                })?;
                player.add_card(card);
            }
        }

        let player_draw = seed_epidemics(base, config.difficulty.epidemic_cards(), &mut rng);

        let first_player = players[0].id;
        let mut game = Game {
            id: Uuid::new_v4(),
            difficulty: config.difficulty,
            map,
            players,
            active_idx: 0,
            past_turns: Vec::new(),
            current_turn: PlayerTurn::begin(first_player, infection_rate(0)),
            cube_pool: CubePool::full(),
            laboratories_left: LABORATORIES - 1,
            plague_status: [PlagueStatus::Active; Plague::COUNT],
            outbreak_level: 0,
            infection_level: 0,
            player_draw,
            player_discard: CardStack::new(),
            infection_draw,
            infection_discard: CardStack::new(),
            quiet_night: false,
            outcome: None,
            rng,
        };

        game.setup_initial_infection()?;

        info!(
            game_id = %game.id,
            players = game.players.len(),
            difficulty = ?game.difficulty,
            "game created"
        );
        Ok(game)
    }

    /// Three waves of three cities at 3/2/1 cubes, drawn from the infection
    /// stack before the first turn. Every city is distinct, so no outbreak
    /// can occur here.
    fn setup_initial_infection(&mut self) -> Result<(), DomainError> {
        for &cubes in INITIAL_INFECTION_WAVES.iter() {
            for _ in 0..CITIES_PER_INFECTION_WAVE {
                let card = self.infection_draw.pop()?;
                for _ in 0..cubes {
                    self.infect_field(card.field, card.plague)?;
                }
                self.infection_discard.push(card);
            }
        }
        Ok(())
    }

    // ---- identity & read access ------------------------------------------

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, DomainError> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, format!("no player {}", id.0)))
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, DomainError> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, format!("no player {}", id.0)))
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.active_idx]
    }

    /// The authoritative turn: always the latest one.
    pub fn current_turn(&self) -> &PlayerTurn {
        &self.current_turn
    }

    /// Completed turns, oldest first.
    pub fn past_turns(&self) -> &[PlayerTurn] {
        &self.past_turns
    }

    pub fn players_on(&self, field: FieldId) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.field == field)
            .map(|p| p.id)
            .collect()
    }

    pub(crate) fn other_players_on(&self, field: FieldId, except: PlayerId) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.field == field && p.id != except)
            .map(|p| p.id)
            .collect()
    }

    pub fn outbreak_level(&self) -> u8 {
        self.outbreak_level
    }

    pub fn infection_level(&self) -> usize {
        self.infection_level
    }

    /// Infection cards drawn per turn at the current level.
    pub fn current_infection_rate(&self) -> u8 {
        infection_rate(self.infection_level)
    }

    pub fn plague_status(&self, plague: Plague) -> PlagueStatus {
        self.plague_status[plague.index()]
    }

    pub fn cubes_remaining(&self, plague: Plague) -> u8 {
        self.cube_pool.remaining(plague)
    }

    pub fn laboratories_left(&self) -> u8 {
        self.laboratories_left
    }

    pub fn quiet_night_pending(&self) -> bool {
        self.quiet_night
    }

    pub fn player_draw_len(&self) -> usize {
        self.player_draw.len()
    }

    pub fn infection_draw_len(&self) -> usize {
        self.infection_draw.len()
    }

    pub fn player_discard(&self) -> &CardStack<PlayerCard> {
        &self.player_discard
    }

    pub fn infection_discard(&self) -> &CardStack<InfectionCard> {
        &self.infection_discard
    }

    /// Top of the infection draw stack, next-drawn first (Forecast peek).
    pub fn infection_stack_top(&self, n: usize) -> Vec<InfectionCard> {
        self.infection_draw.peek_top(n).copied().collect()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_won(&self) -> bool {
        matches!(self.outcome, Some(GameOutcome::Won(_)))
    }

    pub fn is_lost(&self) -> bool {
        matches!(self.outcome, Some(GameOutcome::Lost(_)))
    }

    /// Refuse mutation once the game is decided.
    pub(crate) fn ensure_active(&self) -> Result<(), DomainError> {
        match self.outcome {
            Some(outcome) => Err(DomainError::validation(
                ValidationKind::GameOver,
                format!("game already decided: {outcome:?}"),
            )),
            None => Ok(()),
        }
    }

    // ---- entry points ----------------------------------------------------

    /// Execute a self-directed action for the current player.
    pub fn perform_action(&mut self, action: &Action) -> Result<TurnPhase, DomainError> {
        action.execute(self)?;
        Ok(self.current_turn.phase())
    }

    /// Trigger an event card play that needs no approval.
    pub fn play_event(&mut self, play: &EventPlay) -> Result<(), DomainError> {
        play.execute(self)
    }

    /// Execute the payload of an approved request.
    pub fn execute_approved(&mut self, request: &ApprovableRequest) -> Result<(), DomainError> {
        request.execute(self)
    }

    /// A player leaving ends the cooperative game.
    pub fn player_left(&mut self, player: PlayerId) -> Result<(), DomainError> {
        self.ensure_active()?;
        let id = self.player(player)?.id;
        info!(game_id = %self.id, player = id.0, "player left, game over");
        self.set_outcome(GameOutcome::Lost(LossReason::PlayerLeft));
        Ok(())
    }

    /// Voluntary discard, e.g. to get back under the hand limit.
    pub fn discard_from_hand(
        &mut self,
        player: PlayerId,
        card: &PlayerCard,
    ) -> Result<(), DomainError> {
        self.ensure_active()?;
        self.discard_from_player(player, card)
    }

    /// Forced draw during the player-draw phase. An epidemic card resolves
    /// immediately; an empty draw stack loses the game.
    pub fn draw_player_card(&mut self) -> Result<PlayerCardDraw, DomainError> {
        self.ensure_active()?;
        self.current_turn.note_player_draw()?;

        let card = match self.player_draw.pop() {
            Ok(card) => card,
            Err(_) => {
                self.set_outcome(GameOutcome::Lost(LossReason::NoPlayerCardsLeft));
                return Ok(PlayerCardDraw {
                    card: None,
                    epidemic: None,
                    phase_after: self.current_turn.phase(),
                });
            }
        };

        let epidemic = if card.is_epidemic() {
            self.player_discard.push(card);
            Some(self.resolve_epidemic()?)
        } else {
            self.players[self.active_idx].add_card(card);
            None
        };

        Ok(PlayerCardDraw {
            card: Some(card),
            epidemic,
            phase_after: self.current_turn.phase(),
        })
    }

    /// Forced draw during the infection phase. Requires the current player
    /// at or under the hand limit. Completing the phase starts the next
    /// player's turn.
    pub fn draw_infection_card(&mut self) -> Result<InfectionCardDraw, DomainError> {
        self.ensure_active()?;
        if self.current_turn.phase() != TurnPhase::Infection {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "not in the infection phase",
            ));
        }

        if self.quiet_night {
            self.quiet_night = false;
            self.current_turn.skip_infection_phase();
            info!(game_id = %self.id, "quiet night, infection phase skipped");
            let next_player = self.advance_turn_if_complete();
            return Ok(InfectionCardDraw {
                skipped: true,
                card: None,
                infection: None,
                next_player,
            });
        }

        if self.players[self.active_idx].over_hand_limit() {
            return Err(DomainError::validation(
                ValidationKind::HandLimitExceeded,
                "discard down to the hand limit first",
            ));
        }

        self.current_turn.note_infection_draw()?;
        let card = self.pop_infection_card()?;
        let record = self.infect_field(card.field, card.plague)?;
        self.infection_discard.push(card);
        self.current_turn.record_infection(record.clone());

        let next_player = self.advance_turn_if_complete();
        Ok(InfectionCardDraw {
            skipped: false,
            card: Some(card),
            infection: Some(record),
            next_player,
        })
    }

    // ---- infection & cure ------------------------------------------------

    /// Infect a field with one cube of `plague`, cascading outbreaks across
    /// neighbors. Worklist traversal with a visited set: each field cascades
    /// at most once per call, so the walk terminates on any finite graph and
    /// the outbreak counter rises by at most the number of fields.
    pub fn infect_field(
        &mut self,
        origin: FieldId,
        plague: Plague,
    ) -> Result<InfectionRecord, DomainError> {
        self.ensure_active()?;
        self.map.field(origin)?;

        let mut record = InfectionRecord::new(origin, plague);
        if self.plague_status[plague.index()] == PlagueStatus::Exterminated {
            return Ok(record);
        }

        let mut visited: HashSet<FieldId> = HashSet::new();
        let mut queue: VecDeque<FieldId> = VecDeque::new();
        queue.push_back(origin);

        while let Some(field_id) = queue.pop_front() {
            if !visited.insert(field_id) {
                continue;
            }
            if self.map.field(field_id)?.at_capacity(plague) {
                self.outbreak_level += 1;
                record.outbreaks.push(field_id);
                info!(
                    game_id = %self.id,
                    field = field_id.0,
                    level = self.outbreak_level,
                    "outbreak"
                );
                if self.outbreak_level >= MAX_OUTBREAKS {
                    self.set_outcome(GameOutcome::Lost(LossReason::MaxOutbreaksReached));
                    break;
                }
                for &neighbor in self.map.neighbors(field_id) {
                    if !visited.contains(&neighbor) {
                        queue.push_back(neighbor);
                    }
                }
            } else {
                match self.cube_pool.take(plague) {
                    Some(_cube) => {
                        self.map.field_mut(field_id)?.try_add_cube(plague);
                        record.placements.push(field_id);
                        debug!(game_id = %self.id, field = field_id.0, plague = ?plague, "cube placed");
                    }
                    None => {
                        self.set_outcome(GameOutcome::Lost(LossReason::NoPlagueCubesLeft));
                        break;
                    }
                }
            }
        }

        Ok(record)
    }

    /// Remove one cube of `plague` from a field, returning it to the pool.
    pub fn cure_field(&mut self, field: FieldId, plague: Plague) -> Result<(), DomainError> {
        self.ensure_active()?;
        self.map.field_mut(field)?.remove_cube(plague)?;
        self.cube_pool.put_back(PlagueCube { plague });
        self.check_extermination(plague);
        Ok(())
    }

    /// A cured plague with zero cubes anywhere is exterminated.
    fn check_extermination(&mut self, plague: Plague) {
        if self.plague_status[plague.index()] == PlagueStatus::Cured
            && self.map.cubes_on_map(plague) == 0
        {
            self.plague_status[plague.index()] = PlagueStatus::Exterminated;
            info!(game_id = %self.id, plague = ?plague, "plague exterminated");
        }
    }

    /// Place the antidote marker for a plague; discovering the last one wins
    /// the game.
    pub(crate) fn place_antidote(&mut self, plague: Plague) {
        if self.plague_status[plague.index()] == PlagueStatus::Active {
            self.plague_status[plague.index()] = if self.map.cubes_on_map(plague) == 0 {
                PlagueStatus::Exterminated
            } else {
                PlagueStatus::Cured
            };
            info!(game_id = %self.id, plague = ?plague, "antidote discovered");
        }
        if self
            .plague_status
            .iter()
            .all(|s| *s != PlagueStatus::Active)
        {
            self.set_outcome(GameOutcome::Won(WinReason::AllAntidotesDiscovered));
        }
    }

    // ---- epidemic & stacks -----------------------------------------------

    /// Epidemic: infection level rises, the infection discard is shuffled
    /// back on top of the draw stack, and one extra cascade runs off the
    /// top.
    fn resolve_epidemic(&mut self) -> Result<InfectionRecord, DomainError> {
        self.infection_level += 1;
        info!(
            game_id = %self.id,
            level = self.infection_level,
            rate = self.current_infection_rate(),
            "epidemic"
        );

        let mut discard = self.infection_discard.take_all();
        discard.shuffle(&mut self.rng);
        self.infection_draw.add_all(discard);

        let card = self.infection_draw.pop()?;
        let record = self.infect_field(card.field, card.plague)?;
        self.infection_discard.push(card);
        self.current_turn.record_infection(record.clone());
        Ok(record)
    }

    fn pop_infection_card(&mut self) -> Result<InfectionCard, DomainError> {
        if self.infection_draw.is_empty() {
            let mut discard = self.infection_discard.take_all();
            discard.shuffle(&mut self.rng);
            self.infection_draw.add_all(discard);
        }
        self.infection_draw.pop()
    }

    /// Restack the top of the infection draw stack (Forecast). `reordered`
    /// must be a permutation of the current top cards; `reordered[0]`
    /// becomes the next draw.
    pub(crate) fn forecast_restack(
        &mut self,
        reordered: &[InfectionCard],
    ) -> Result<(), DomainError> {
        let top = self.infection_stack_top(crate::domain::rules::FORECAST_CARDS);
        let mut expect = top.clone();
        let mut given = reordered.to_vec();
        expect.sort();
        given.sort();
        if expect.is_empty() || expect != given {
            return Err(DomainError::validation(
                ValidationKind::NotPermutation,
                "forecast must reorder exactly the top infection cards",
            ));
        }
        for _ in 0..top.len() {
            self.infection_draw.pop()?;
        }
        for card in reordered.iter().rev() {
            self.infection_draw.push(*card);
        }
        Ok(())
    }

    /// Permanently remove a card from the infection discard (Resilient
    /// Population).
    pub(crate) fn remove_infection_discard(
        &mut self,
        card: &InfectionCard,
    ) -> Result<(), DomainError> {
        self.infection_discard
            .remove_first(|c| c == card)
            .map(|_| ())
            .ok_or_else(|| {
                DomainError::not_found(
                    NotFoundKind::Card,
                    format!("{card:?} is not in the infection discard"),
                )
            })
    }

    pub(crate) fn set_quiet_night(&mut self) {
        self.quiet_night = true;
    }

    // ---- turn bookkeeping ------------------------------------------------

    pub(crate) fn spend_action(&mut self) -> Result<(), DomainError> {
        self.current_turn.spend_action()
    }

    pub(crate) fn waive_actions(&mut self) {
        self.current_turn.waive_actions();
    }

    /// Wrap to the next player once the current turn has exhausted every
    /// counter. No new turn begins after the game is decided.
    fn advance_turn_if_complete(&mut self) -> Option<PlayerId> {
        if self.outcome.is_some() || !self.current_turn.is_over() {
            return None;
        }
        self.active_idx = (self.active_idx + 1) % self.players.len();
        let player = self.players[self.active_idx].id;
        let rate = self.current_infection_rate();
        let finished = std::mem::replace(&mut self.current_turn, PlayerTurn::begin(player, rate));
        self.past_turns.push(finished);
        info!(game_id = %self.id, player = player.0, "turn began");
        Some(player)
    }

    // ---- internal mutation helpers (actions & events) --------------------

    pub(crate) fn move_player(&mut self, id: PlayerId, field: FieldId) -> Result<(), DomainError> {
        self.map.field(field)?;
        self.player_mut(id)?.field = field;
        Ok(())
    }

    pub(crate) fn discard_from_player(
        &mut self,
        id: PlayerId,
        card: &PlayerCard,
    ) -> Result<(), DomainError> {
        let card = self.player_mut(id)?.take_card(card)?;
        self.player_discard.push(card);
        Ok(())
    }

    pub(crate) fn transfer_card(
        &mut self,
        from: PlayerId,
        to: PlayerId,
        card: &PlayerCard,
    ) -> Result<(), DomainError> {
        self.player(to)?;
        let card = self.player_mut(from)?.take_card(card)?;
        self.player_mut(to)?.add_card(card);
        Ok(())
    }

    pub(crate) fn build_laboratory(&mut self, field: FieldId) -> Result<(), DomainError> {
        if self.laboratories_left == 0 {
            return Err(DomainError::validation_other("no laboratories left"));
        }
        let field = self.map.field_mut(field)?;
        if field.has_laboratory {
            return Err(DomainError::validation_other(
                "field already has a laboratory",
            ));
        }
        field.has_laboratory = true;
        self.laboratories_left -= 1;
        Ok(())
    }

    fn set_outcome(&mut self, outcome: GameOutcome) {
        if self.outcome.is_none() {
            info!(game_id = %self.id, outcome = ?outcome, "game decided");
            self.outcome = Some(outcome);
        }
    }

    /// Test hook: place a card on top of the player draw stack.
    #[cfg(test)]
    pub(crate) fn stack_player_card(&mut self, card: PlayerCard) {
        self.player_draw.push(card);
    }

    /// Test hook: inspect the player draw stack.
    #[cfg(test)]
    pub(crate) fn player_draw_stack(&self) -> &CardStack<PlayerCard> {
        &self.player_draw
    }

    /// Test hook: rotate to the next player without playing out the turn.
    #[cfg(test)]
    pub(crate) fn force_next_player(&mut self) -> PlayerId {
        self.current_turn.waive_actions();
        self.current_turn.skip_infection_phase();
        while self.current_turn.player_draws_left() > 0 {
            let _ = self.current_turn.note_player_draw();
        }
        self.advance_turn_if_complete()
            .unwrap_or_else(|| self.current_player().id)
    }
}
