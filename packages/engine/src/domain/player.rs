//! Players: identity binding, hand cards, and map position.

use serde::{Deserialize, Serialize};

use crate::domain::cards::PlayerCard;
use crate::domain::map::FieldId;
use crate::domain::rules::MAX_HAND_CARDS;
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

/// Identity binding: a networked user or a named AI. Both share the same
/// capability surface; they differ only in how they are addressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayerIdentity {
    User { user_id: i64, display_name: String },
    Ai { display_name: String },
}

impl PlayerIdentity {
    pub fn display_name(&self) -> &str {
        match self {
            PlayerIdentity::User { display_name, .. } => display_name,
            PlayerIdentity::Ai { display_name } => display_name,
        }
    }

    pub fn is_ai(&self) -> bool {
        matches!(self, PlayerIdentity::Ai { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub identity: PlayerIdentity,
    /// Field the player currently stands on. Field occupancy is derived
    /// from this; fields hold no player back-references.
    pub field: FieldId,
    hand: Vec<PlayerCard>,
}

impl Player {
    pub(crate) fn new(id: PlayerId, identity: PlayerIdentity, field: FieldId) -> Self {
        Self {
            id,
            identity,
            field,
            hand: Vec::new(),
        }
    }

    pub fn hand(&self) -> &[PlayerCard] {
        &self.hand
    }

    pub fn holds(&self, card: &PlayerCard) -> bool {
        self.hand.contains(card)
    }

    pub fn holds_city_card_of(&self, field: FieldId) -> bool {
        self.hand
            .iter()
            .any(|c| c.as_city().is_some_and(|city| city.field == field))
    }

    pub fn is_ai(&self) -> bool {
        self.identity.is_ai()
    }

    pub fn over_hand_limit(&self) -> bool {
        self.hand.len() > MAX_HAND_CARDS
    }

    pub(crate) fn add_card(&mut self, card: PlayerCard) {
        self.hand.push(card);
    }

    /// Remove a card from the hand, failing when it is not held. A card
    /// instance never sits in two hands or stacks at once, so taking it
    /// here is the only way it moves on.
    pub(crate) fn take_card(&mut self, card: &PlayerCard) -> Result<PlayerCard, DomainError> {
        let pos = self.hand.iter().position(|c| c == card).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::CardNotInHand,
                format!("{} does not hold {card:?}", self.identity.display_name()),
            )
        })?;
        Ok(self.hand.remove(pos))
    }
}
