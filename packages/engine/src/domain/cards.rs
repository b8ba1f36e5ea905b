//! Card types: city, event, epidemic, and infection cards.

use serde::{Deserialize, Serialize};

use crate::domain::map::FieldId;
use crate::domain::plague::Plague;

/// A player card naming one city; discarded to fly there, build a
/// laboratory, or research an antidote of its plague.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct CityCard {
    pub field: FieldId,
    pub plague: Plague,
}

/// An infection card naming the city that gets infected when it is drawn.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct InfectionCard {
    pub field: FieldId,
    pub plague: Plague,
}

/// Event cards. Fixed set, never extended at runtime; trigger effects live
/// in `domain::events`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCard {
    GovernmentGrant,
    Airlift,
    Forecast,
    OneQuietNight,
    ResilientPopulation,
}

impl EventCard {
    pub const ALL: [EventCard; 5] = [
        EventCard::GovernmentGrant,
        EventCard::Airlift,
        EventCard::Forecast,
        EventCard::OneQuietNight,
        EventCard::ResilientPopulation,
    ];
}

/// Player draw stack cards.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "card", content = "data", rename_all = "snake_case")]
pub enum PlayerCard {
    City(CityCard),
    Event(EventCard),
    Epidemic,
}

impl PlayerCard {
    pub fn is_epidemic(&self) -> bool {
        matches!(self, PlayerCard::Epidemic)
    }

    pub fn as_city(&self) -> Option<&CityCard> {
        match self {
            PlayerCard::City(card) => Some(card),
            _ => None,
        }
    }

    pub fn as_event(&self) -> Option<EventCard> {
        match self {
            PlayerCard::Event(card) => Some(*card),
            _ => None,
        }
    }
}
