#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

//! Rules engine for a cooperative disease-control board game.
//!
//! This crate is the shared model between server and clients: the game
//! aggregate, the card stacks, the city graph with its outbreak cascade,
//! the turn state machine, the action capability system, and the
//! cross-player approval protocol. Transport (sockets, sessions) and
//! presentation (rendering, animation) live elsewhere and only call the
//! entry points on [`domain::game::Game`] and the action/event types.

pub mod domain;
pub mod errors;
pub mod protocol;

// Re-exports for public API
pub use domain::actions::{Action, ActionKind};
pub use domain::approval::{Approvable, ApprovableRequest, ApprovalStatus};
pub use domain::cards::{CityCard, EventCard, InfectionCard, PlayerCard};
pub use domain::events::{EventEffect, EventPlay};
pub use domain::game::{Game, GameConfig, GameOutcome, LossReason, WinReason};
pub use domain::map::{FieldId, GameMap};
pub use domain::plague::{Plague, PlagueStatus};
pub use domain::player::{PlayerId, PlayerIdentity};
pub use domain::rules::Difficulty;
pub use domain::snapshot::{snapshot, GameSnapshot};
pub use domain::turn::{PlayerTurn, TurnPhase};
pub use errors::domain::DomainError;
