//! Player actions: the closed set of per-turn moves with their shared
//! capability contract.
//!
//! Every action answers three questions against the current game state:
//! `is_available` (could the actor do this kind of thing at all),
//! `is_executable` (do the concrete targets check out, right now, for the
//! player whose turn it is), and `execute` (perform the mutation and spend
//! one action from the turn budget). Actions that take a choice away from
//! another player (card transfers) never execute directly; they go through
//! the approval protocol in `domain::approval`.

use serde::{Deserialize, Serialize};

use crate::domain::cards::{CityCard, PlayerCard};
use crate::domain::game::Game;
use crate::domain::map::FieldId;
use crate::domain::plague::{Plague, PlagueStatus};
use crate::domain::player::PlayerId;
use crate::domain::rules::CARDS_FOR_ANTIDOTE;
use crate::domain::turn::TurnPhase;
use crate::errors::domain::{DomainError, ValidationKind};

/// Closed set of action kinds. Targets are part of the variant; an action
/// is fully specified at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionKind {
    /// Move to an adjacent field.
    DriveFerry { target: FieldId },
    /// Discard a city card, move to that city.
    DirectFlight { card: CityCard },
    /// Discard the card of the current city, move anywhere.
    CharterFlight { target: FieldId },
    /// Move between two laboratory fields.
    ShuttleFlight { target: FieldId },
    /// Remove one cube of `plague` from the current field (all of them once
    /// the antidote is discovered).
    Cure { plague: Plague },
    /// Discard the current city's card and place a laboratory here.
    BuildLaboratory,
    /// Hand the current city's card to a co-located player. Needs the
    /// receiver's approval.
    SendCard { receiver: PlayerId, card: CityCard },
    /// Take the current city's card from a co-located player. Needs the
    /// sender's approval.
    ReceiveCard { sender: PlayerId, card: CityCard },
    /// At a laboratory, discard five city cards of one plague to place its
    /// antidote marker.
    DiscoverAntidote { plague: Plague, cards: Vec<CityCard> },
    /// Forfeit the remainder of the action budget.
    Waive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub actor: PlayerId,
    pub kind: ActionKind,
}

impl Action {
    pub fn new(actor: PlayerId, kind: ActionKind) -> Self {
        Self { actor, kind }
    }

    /// Pure predicate: does the current game state offer the actor this
    /// kind of action at all, ignoring the concrete targets.
    pub fn is_available(&self, game: &Game) -> bool {
        let Ok(actor) = game.player(self.actor) else {
            return false;
        };
        let here = actor.field;
        let Ok(field) = game.map().field(here) else {
            return false;
        };

        match &self.kind {
            ActionKind::DriveFerry { .. } => !game.map().neighbors(here).is_empty(),
            ActionKind::DirectFlight { .. } => actor
                .hand()
                .iter()
                .filter_map(PlayerCard::as_city)
                .any(|c| c.field != here),
            ActionKind::CharterFlight { .. } => actor.holds_city_card_of(here),
            ActionKind::ShuttleFlight { .. } => {
                field.has_laboratory
                    && game
                        .map()
                        .laboratory_fields()
                        .any(|f| f.id != here)
            }
            ActionKind::Cure { .. } => Plague::ALL.iter().any(|&p| field.cubes_of(p) > 0),
            ActionKind::BuildLaboratory => {
                game.laboratories_left() > 0
                    && !field.has_laboratory
                    && actor.holds_city_card_of(here)
            }
            ActionKind::SendCard { .. } => {
                actor.holds_city_card_of(here) && !game.other_players_on(here, self.actor).is_empty()
            }
            ActionKind::ReceiveCard { .. } => game
                .other_players_on(here, self.actor)
                .iter()
                .filter_map(|&id| game.player(id).ok())
                .any(|p| p.holds_city_card_of(here)),
            ActionKind::DiscoverAntidote { .. } => {
                field.has_laboratory
                    && Plague::ALL.iter().any(|&p| {
                        game.plague_status(p) == PlagueStatus::Active
                            && actor
                                .hand()
                                .iter()
                                .filter_map(PlayerCard::as_city)
                                .filter(|c| c.plague == p)
                                .count()
                                >= CARDS_FOR_ANTIDOTE
                    })
            }
            ActionKind::Waive => true,
        }
    }

    /// Do the concrete targets check out against the current state.
    fn targets_valid(&self, game: &Game) -> bool {
        let Ok(actor) = game.player(self.actor) else {
            return false;
        };
        let here = actor.field;

        match &self.kind {
            ActionKind::DriveFerry { target } => game.map().are_adjacent(here, *target),
            ActionKind::DirectFlight { card } => {
                card.field != here && actor.holds(&PlayerCard::City(*card))
            }
            ActionKind::CharterFlight { target } => {
                *target != here && game.map().field(*target).is_ok()
            }
            ActionKind::ShuttleFlight { target } => {
                *target != here
                    && game
                        .map()
                        .field(*target)
                        .is_ok_and(|f| f.has_laboratory)
            }
            ActionKind::Cure { plague } => game
                .map()
                .field(here)
                .is_ok_and(|f| f.cubes_of(*plague) > 0),
            ActionKind::BuildLaboratory => true,
            ActionKind::SendCard { receiver, card } => {
                *receiver != self.actor
                    && card.field == here
                    && actor.holds(&PlayerCard::City(*card))
                    && game.player(*receiver).is_ok_and(|p| p.field == here)
            }
            ActionKind::ReceiveCard { sender, card } => {
                *sender != self.actor
                    && card.field == here
                    && game
                        .player(*sender)
                        .is_ok_and(|p| p.field == here && p.holds(&PlayerCard::City(*card)))
            }
            ActionKind::DiscoverAntidote { plague, cards } => {
                if cards.len() != CARDS_FOR_ANTIDOTE {
                    return false;
                }
                if game.plague_status(*plague) != PlagueStatus::Active {
                    return false;
                }
                let mut fields: Vec<FieldId> = cards.iter().map(|c| c.field).collect();
                fields.sort();
                fields.dedup();
                fields.len() == CARDS_FOR_ANTIDOTE
                    && cards.iter().all(|c| {
                        c.plague == *plague && actor.holds(&PlayerCard::City(*c))
                    })
            }
            ActionKind::Waive => true,
        }
    }

    /// The player whose consent this action needs, derived from the action
    /// itself (never chosen by the requester).
    pub fn approving_player(&self) -> Option<PlayerId> {
        match &self.kind {
            ActionKind::SendCard { receiver, .. } => Some(*receiver),
            ActionKind::ReceiveCard { sender, .. } => Some(*sender),
            _ => None,
        }
    }

    pub fn requires_approval(&self) -> bool {
        self.approving_player().is_some()
    }

    fn preconditions(&self, game: &Game) -> Result<(), DomainError> {
        game.ensure_active()?;
        if game.current_player().id != self.actor {
            return Err(DomainError::validation(
                ValidationKind::OutOfTurn,
                "not this player's turn",
            ));
        }
        if game.current_turn().phase() != TurnPhase::Actions {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "action budget exhausted",
            ));
        }
        Ok(())
    }

    /// Available, fully targeted, in turn, and not waiting on anyone's
    /// consent.
    pub fn is_executable(&self, game: &Game) -> bool {
        self.preconditions(game).is_ok()
            && self.is_available(game)
            && self.targets_valid(game)
            && !self.requires_approval()
    }

    /// Perform the action and spend one action from the turn budget.
    ///
    /// Fails without mutating anything when `is_executable` is false.
    pub fn execute(&self, game: &mut Game) -> Result<(), DomainError> {
        if !self.is_executable(game) {
            return Err(DomainError::validation(
                ValidationKind::NotExecutable,
                format!("action {:?} is not executable", self.kind),
            ));
        }
        self.apply(game)
    }

    /// Execution path for actions arriving through an approved request.
    /// Identical to `execute` minus the consent guard; the approval state
    /// has already been checked by the request.
    pub(crate) fn execute_approved(&self, game: &mut Game) -> Result<(), DomainError> {
        if self.preconditions(game).is_err()
            || !self.is_available(game)
            || !self.targets_valid(game)
        {
            return Err(DomainError::validation(
                ValidationKind::NotExecutable,
                format!("approved action {:?} is no longer executable", self.kind),
            ));
        }
        self.apply(game)
    }

    fn apply(&self, game: &mut Game) -> Result<(), DomainError> {
        match &self.kind {
            ActionKind::DriveFerry { target } => {
                game.move_player(self.actor, *target)?;
            }
            ActionKind::DirectFlight { card } => {
                game.discard_from_player(self.actor, &PlayerCard::City(*card))?;
                game.move_player(self.actor, card.field)?;
            }
            ActionKind::CharterFlight { target } => {
                let here = game.player(self.actor)?.field;
                let card = CityCard {
                    field: here,
                    plague: game.map().field(here)?.home_plague,
                };
                game.discard_from_player(self.actor, &PlayerCard::City(card))?;
                game.move_player(self.actor, *target)?;
            }
            ActionKind::ShuttleFlight { target } => {
                game.move_player(self.actor, *target)?;
            }
            ActionKind::Cure { plague } => {
                let here = game.player(self.actor)?.field;
                if game.plague_status(*plague) == PlagueStatus::Active {
                    game.cure_field(here, *plague)?;
                } else {
                    // Antidote discovered: the whole field is cleared as one action.
                    while game.map().field(here)?.cubes_of(*plague) > 0 {
                        game.cure_field(here, *plague)?;
                    }
                }
            }
            ActionKind::BuildLaboratory => {
                let here = game.player(self.actor)?.field;
                let card = CityCard {
                    field: here,
                    plague: game.map().field(here)?.home_plague,
                };
                game.discard_from_player(self.actor, &PlayerCard::City(card))?;
                game.build_laboratory(here)?;
            }
            ActionKind::SendCard { receiver, card } => {
                game.transfer_card(self.actor, *receiver, &PlayerCard::City(*card))?;
            }
            ActionKind::ReceiveCard { sender, card } => {
                game.transfer_card(*sender, self.actor, &PlayerCard::City(*card))?;
            }
            ActionKind::DiscoverAntidote { plague, cards } => {
                for card in cards {
                    game.discard_from_player(self.actor, &PlayerCard::City(*card))?;
                }
                game.place_antidote(*plague);
            }
            ActionKind::Waive => {}
        }

        match self.kind {
            ActionKind::Waive => game.waive_actions(),
            _ => game.spend_action()?,
        }
        Ok(())
    }
}
