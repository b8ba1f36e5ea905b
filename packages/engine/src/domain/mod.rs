//! Domain layer: the game rules model.

pub mod actions;
pub mod approval;
pub mod card_stack;
pub mod cards;
pub mod events;
pub mod game;
pub mod map;
pub mod plague;
pub mod player;
pub mod rules;
pub mod snapshot;
pub mod turn;

#[cfg(test)]
mod test_game_helpers;
#[cfg(test)]
mod tests_actions;
#[cfg(test)]
mod tests_props_infection;
#[cfg(test)]
mod tests_props_stack;

// Re-exports for ergonomics
pub use card_stack::CardStack;
pub use cards::{CityCard, EventCard, InfectionCard, PlayerCard};
pub use map::{FieldId, GameMap};
pub use plague::{Plague, PlagueStatus};
pub use player::{PlayerId, PlayerIdentity};
pub use rules::{infection_rate, starting_hand_size, Difficulty};
