//! Event card plays and their trigger effects.
//!
//! Events follow the same capability contract as actions but live outside
//! the turn budget: any player may play one they hold at any time while the
//! game is undecided. Airlifting another player routes through the approval
//! protocol first.

use serde::{Deserialize, Serialize};

use crate::domain::cards::{EventCard, InfectionCard, PlayerCard};
use crate::domain::game::Game;
use crate::domain::map::FieldId;
use crate::domain::player::PlayerId;
use crate::errors::domain::{DomainError, ValidationKind};

/// An event effect with its targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventEffect {
    /// Place a laboratory anywhere, no city card needed.
    GovernmentGrant { field: FieldId },
    /// Move any player to any field. Moving someone else needs their consent.
    Airlift {
        passenger: PlayerId,
        destination: FieldId,
    },
    /// Restack the top of the infection draw stack in a chosen order. The
    /// caller peeks via `Game::infection_stack_top` first; `reordered[0]`
    /// becomes the next card drawn.
    Forecast { reordered: Vec<InfectionCard> },
    /// Skip the next infection phase entirely.
    OneQuietNight,
    /// Permanently remove one card from the infection discard pile.
    ResilientPopulation { card: InfectionCard },
}

impl EventEffect {
    /// The hand card this effect is printed on.
    pub fn card(&self) -> EventCard {
        match self {
            EventEffect::GovernmentGrant { .. } => EventCard::GovernmentGrant,
            EventEffect::Airlift { .. } => EventCard::Airlift,
            EventEffect::Forecast { .. } => EventCard::Forecast,
            EventEffect::OneQuietNight => EventCard::OneQuietNight,
            EventEffect::ResilientPopulation { .. } => EventCard::ResilientPopulation,
        }
    }
}

/// One player's event card play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPlay {
    pub player: PlayerId,
    pub effect: EventEffect,
}

impl EventPlay {
    pub fn new(player: PlayerId, effect: EventEffect) -> Self {
        Self { player, effect }
    }

    /// The player holds the card and the effect class has something to act on.
    pub fn is_available(&self, game: &Game) -> bool {
        let Ok(player) = game.player(self.player) else {
            return false;
        };
        if !player.holds(&PlayerCard::Event(self.effect.card())) {
            return false;
        }
        match &self.effect {
            EventEffect::GovernmentGrant { .. } => game.laboratories_left() > 0,
            EventEffect::Airlift { .. } => true,
            EventEffect::Forecast { .. } => !game.infection_stack_top(1).is_empty(),
            EventEffect::OneQuietNight => true,
            EventEffect::ResilientPopulation { .. } => !game.infection_discard().is_empty(),
        }
    }

    fn targets_valid(&self, game: &Game) -> bool {
        match &self.effect {
            EventEffect::GovernmentGrant { field } => {
                game.map().field(*field).is_ok_and(|f| !f.has_laboratory)
            }
            EventEffect::Airlift {
                passenger,
                destination,
            } => game.player(*passenger).is_ok() && game.map().field(*destination).is_ok(),
            EventEffect::Forecast { reordered } => {
                let mut top = game.infection_stack_top(crate::domain::rules::FORECAST_CARDS);
                let mut chosen = reordered.clone();
                top.sort();
                chosen.sort();
                !top.is_empty() && top == chosen
            }
            EventEffect::OneQuietNight => true,
            EventEffect::ResilientPopulation { card } => {
                game.infection_discard().iter().any(|c| c == card)
            }
        }
    }

    /// The player whose consent this play needs, derived from the effect.
    pub fn approving_player(&self) -> Option<PlayerId> {
        match &self.effect {
            EventEffect::Airlift { passenger, .. } if *passenger != self.player => Some(*passenger),
            _ => None,
        }
    }

    pub fn requires_approval(&self) -> bool {
        self.approving_player().is_some()
    }

    pub fn is_executable(&self, game: &Game) -> bool {
        game.ensure_active().is_ok()
            && self.is_available(game)
            && self.targets_valid(game)
            && !self.requires_approval()
    }

    /// Trigger the effect and discard the event card.
    ///
    /// Fails without mutating anything when `is_executable` is false.
    pub fn execute(&self, game: &mut Game) -> Result<(), DomainError> {
        if !self.is_executable(game) {
            return Err(DomainError::validation(
                ValidationKind::NotExecutable,
                format!("event {:?} is not executable", self.effect.card()),
            ));
        }
        self.apply(game)
    }

    /// Execution path for plays arriving through an approved request.
    pub(crate) fn execute_approved(&self, game: &mut Game) -> Result<(), DomainError> {
        if game.ensure_active().is_err() || !self.is_available(game) || !self.targets_valid(game) {
            return Err(DomainError::validation(
                ValidationKind::NotExecutable,
                format!(
                    "approved event {:?} is no longer executable",
                    self.effect.card()
                ),
            ));
        }
        self.apply(game)
    }

    fn apply(&self, game: &mut Game) -> Result<(), DomainError> {
        game.discard_from_player(self.player, &PlayerCard::Event(self.effect.card()))?;
        match &self.effect {
            EventEffect::GovernmentGrant { field } => game.build_laboratory(*field)?,
            EventEffect::Airlift {
                passenger,
                destination,
            } => game.move_player(*passenger, *destination)?,
            EventEffect::Forecast { reordered } => game.forecast_restack(reordered)?,
            EventEffect::OneQuietNight => game.set_quiet_night(),
            EventEffect::ResilientPopulation { card } => game.remove_infection_discard(card)?,
        }
        Ok(())
    }
}
