//! Public snapshot API for observing game state without exposing internals.
//!
//! Snapshots are what the transport layer serializes out to clients and what
//! the presentation layer renders. Hands are public: this is a cooperative
//! game. Draw stacks expose only their sizes; discard piles are open
//! information.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cards::{InfectionCard, PlayerCard};
use crate::domain::game::{Game, GameOutcome};
use crate::domain::map::FieldId;
use crate::domain::plague::{Plague, PlagueStatus};
use crate::domain::player::PlayerId;
use crate::domain::turn::{InfectionRecord, TurnPhase};

/// Game-level header present in every snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameHeader {
    pub id: Uuid,
    pub outbreak_level: u8,
    pub infection_level: usize,
    pub infection_rate: u8,
    /// Remaining pool cubes, indexed like `Plague::ALL`.
    pub cubes_remaining: [u8; Plague::COUNT],
    pub laboratories_left: u8,
    /// Antidote progress, indexed like `Plague::ALL`.
    pub plague_status: [PlagueStatus; Plague::COUNT],
    pub quiet_night_pending: bool,
    pub outcome: Option<GameOutcome>,
}

/// Public info about a single field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldPublic {
    pub id: FieldId,
    pub name: String,
    pub home_plague: Plague,
    /// Cube counts, indexed like `Plague::ALL`.
    pub cubes: [u8; Plague::COUNT],
    pub has_laboratory: bool,
    pub players: Vec<PlayerId>,
}

/// Public info about a single player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerPublic {
    pub id: PlayerId,
    pub display_name: String,
    pub is_ai: bool,
    pub field: FieldId,
    pub hand: Vec<PlayerCard>,
}

/// The current turn as clients see it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnPublic {
    pub player: PlayerId,
    pub phase: TurnPhase,
    pub actions_left: u8,
    pub player_draws_left: u8,
    pub infection_draws_left: u8,
    /// Infection cascades of this turn, for replay.
    pub infections: Vec<InfectionRecord>,
}

/// Stack visibility: sizes for draw stacks, contents for discards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StacksPublic {
    pub player_draw: usize,
    pub infection_draw: usize,
    pub player_discard: Vec<PlayerCard>,
    pub infection_discard: Vec<InfectionCard>,
}

/// Top-level snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game: GameHeader,
    pub fields: Vec<FieldPublic>,
    pub players: Vec<PlayerPublic>,
    pub turn: TurnPublic,
    pub stacks: StacksPublic,
}

/// Entry point: produce a snapshot of the current game state. Never panics.
pub fn snapshot(game: &Game) -> GameSnapshot {
    let mut cubes_remaining = [0u8; Plague::COUNT];
    let mut plague_status = [PlagueStatus::Active; Plague::COUNT];
    for plague in Plague::ALL {
        cubes_remaining[plague.index()] = game.cubes_remaining(plague);
        plague_status[plague.index()] = game.plague_status(plague);
    }

    let header = GameHeader {
        id: game.id(),
        outbreak_level: game.outbreak_level(),
        infection_level: game.infection_level(),
        infection_rate: game.current_infection_rate(),
        cubes_remaining,
        laboratories_left: game.laboratories_left(),
        plague_status,
        quiet_night_pending: game.quiet_night_pending(),
        outcome: game.outcome(),
    };

    let fields = game
        .map()
        .fields()
        .iter()
        .map(|f| {
            let mut cubes = [0u8; Plague::COUNT];
            for plague in Plague::ALL {
                cubes[plague.index()] = f.cubes_of(plague);
            }
            FieldPublic {
                id: f.id,
                name: f.name.clone(),
                home_plague: f.home_plague,
                cubes,
                has_laboratory: f.has_laboratory,
                players: game.players_on(f.id),
            }
        })
        .collect();

    let players = game
        .players()
        .iter()
        .map(|p| PlayerPublic {
            id: p.id,
            display_name: p.identity.display_name().to_string(),
            is_ai: p.is_ai(),
            field: p.field,
            hand: p.hand().to_vec(),
        })
        .collect();

    let turn = game.current_turn();
    let turn = TurnPublic {
        player: turn.player,
        phase: turn.phase(),
        actions_left: turn.actions_left(),
        player_draws_left: turn.player_draws_left(),
        infection_draws_left: turn.infection_draws_left(),
        infections: turn.infections().to_vec(),
    };

    let stacks = StacksPublic {
        player_draw: game.player_draw_len(),
        infection_draw: game.infection_draw_len(),
        player_discard: game.player_discard().iter().copied().collect(),
        infection_discard: game.infection_discard().iter().copied().collect(),
    };

    GameSnapshot {
        game: header,
        fields,
        players,
        turn,
        stacks,
    }
}
