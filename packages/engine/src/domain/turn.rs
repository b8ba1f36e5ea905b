//! Per-turn state: action budget, forced draw obligations, and the
//! infection batches placed during the turn.

use serde::{Deserialize, Serialize};

use crate::domain::map::FieldId;
use crate::domain::plague::Plague;
use crate::domain::player::PlayerId;
use crate::domain::rules::{ACTIONS_PER_TURN, PLAYER_CARDS_PER_TURN};
use crate::errors::domain::{DomainError, ValidationKind};

/// Phase of a turn, derived from the remaining counters. The phases are
/// strictly ordered: actions, then player-card draws, then infection-card
/// draws.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    Actions,
    PlayerDraw,
    Infection,
    Done,
}

/// One infection cascade: where it started and everything it touched, kept
/// per turn so clients can replay the spread without engine round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfectionRecord {
    pub origin: FieldId,
    pub plague: Plague,
    /// Every field that received a cube, in placement order.
    pub placements: Vec<FieldId>,
    /// Every field that broke out, in cascade order.
    pub outbreaks: Vec<FieldId>,
}

impl InfectionRecord {
    pub(crate) fn new(origin: FieldId, plague: Plague) -> Self {
        Self {
            origin,
            plague,
            placements: Vec::new(),
            outbreaks: Vec::new(),
        }
    }

    pub fn cubes_placed(&self) -> usize {
        self.placements.len()
    }
}

/// One player's turn. Created when the turn starts; the game only ever
/// mutates the latest turn, so a superseded turn is effectively immutable
/// history.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerTurn {
    pub player: PlayerId,
    actions_left: u8,
    player_draws_left: u8,
    infection_draws_left: u8,
    infections: Vec<InfectionRecord>,
}

impl PlayerTurn {
    pub(crate) fn begin(player: PlayerId, infection_rate: u8) -> Self {
        Self {
            player,
            actions_left: ACTIONS_PER_TURN,
            player_draws_left: PLAYER_CARDS_PER_TURN,
            infection_draws_left: infection_rate,
            infections: Vec::new(),
        }
    }

    pub fn phase(&self) -> TurnPhase {
        if self.actions_left > 0 {
            TurnPhase::Actions
        } else if self.player_draws_left > 0 {
            TurnPhase::PlayerDraw
        } else if self.infection_draws_left > 0 {
            TurnPhase::Infection
        } else {
            TurnPhase::Done
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase() == TurnPhase::Done
    }

    pub fn actions_left(&self) -> u8 {
        self.actions_left
    }

    pub fn player_draws_left(&self) -> u8 {
        self.player_draws_left
    }

    pub fn infection_draws_left(&self) -> u8 {
        self.infection_draws_left
    }

    pub fn infections(&self) -> &[InfectionRecord] {
        &self.infections
    }

    pub(crate) fn spend_action(&mut self) -> Result<(), DomainError> {
        if self.phase() != TurnPhase::Actions {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "no actions left this turn",
            ));
        }
        self.actions_left -= 1;
        Ok(())
    }

    /// Forfeit the remainder of the action budget.
    pub(crate) fn waive_actions(&mut self) {
        self.actions_left = 0;
    }

    pub(crate) fn note_player_draw(&mut self) -> Result<(), DomainError> {
        if self.phase() != TurnPhase::PlayerDraw {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "not in the player draw phase",
            ));
        }
        self.player_draws_left -= 1;
        Ok(())
    }

    pub(crate) fn note_infection_draw(&mut self) -> Result<(), DomainError> {
        if self.phase() != TurnPhase::Infection {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "not in the infection phase",
            ));
        }
        self.infection_draws_left -= 1;
        Ok(())
    }

    /// Drop all remaining infection draws (quiet night).
    pub(crate) fn skip_infection_phase(&mut self) {
        self.infection_draws_left = 0;
    }

    pub(crate) fn record_infection(&mut self, record: InfectionRecord) {
        self.infections.push(record);
    }
}
