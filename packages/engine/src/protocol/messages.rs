use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::actions::Action;
use crate::domain::approval::{Approvable, ApprovalStatus};
use crate::domain::cards::{InfectionCard, PlayerCard};
use crate::domain::events::EventPlay;
use crate::domain::game::GameOutcome;
use crate::domain::map::FieldId;
use crate::domain::player::PlayerId;
use crate::domain::turn::InfectionRecord;

pub const PROTOCOL_VERSION: i32 = 1;

/// Requests a client may submit against one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameRequest {
    ExecuteAction { action: Action },
    PlayEvent { event: EventPlay },
    DrawPlayerCard,
    DrawInfectionCard,
    Discard { player: PlayerId, card: PlayerCard },
    SubmitApprovable { payload: Approvable },
    RespondApproval { request_id: Uuid, approve: bool },
    ExecuteApproved { request_id: Uuid },
    Leave { player: PlayerId },
}

/// Server-push notifications relayed to every client of a game.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameNotification {
    TurnBegan {
        player: PlayerId,
        infection_draws: u8,
    },

    ActionExecuted {
        action: Action,
    },

    EventPlayed {
        event: EventPlay,
    },

    PlayerCardDrawn {
        player: PlayerId,
        card: Option<PlayerCard>,
    },

    EpidemicOccurred {
        infection_rate: u8,
        infection: InfectionRecord,
    },

    InfectionCardDrawn {
        card: InfectionCard,
        infection: InfectionRecord,
    },

    OutbreakOccurred {
        field: FieldId,
        level: u8,
    },

    ApprovalRequested {
        request_id: Uuid,
        approver: PlayerId,
    },

    ApprovalResolved {
        request_id: Uuid,
        status: ApprovalStatus,
    },

    GameEnded {
        outcome: GameOutcome,
    },

    Error {
        code: ErrorCode,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadRequest,
    NotExecutable,
    OutOfTurn,
    GameOver,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "bad_request",
            ErrorCode::NotExecutable => "not_executable",
            ErrorCode::OutOfTurn => "out_of_turn",
            ErrorCode::GameOver => "game_over",
        }
    }
}
