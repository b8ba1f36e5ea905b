//! Cross-player approval protocol.
//!
//! A request wraps an action or event play that takes a choice away from
//! another player and walks an explicit state machine:
//! Outbound → Pending → Approved | Rejected. The approving player is always
//! derived from the wrapped payload. Approval and execution are decoupled:
//! after approval the caller invokes `execute` itself, and the approval is
//! not reset afterwards — preventing a double execute is the caller's
//! responsibility (the second attempt fails on its own preconditions).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::actions::Action;
use crate::domain::events::EventPlay;
use crate::domain::game::Game;
use crate::domain::player::PlayerId;
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Created, not yet delivered to the approving player.
    Outbound,
    /// Delivered; waiting for an answer. May stay here forever as far as
    /// the engine is concerned.
    Pending,
    Approved,
    Rejected,
}

/// Payload of an approvable request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Approvable {
    Action(Action),
    Event(EventPlay),
}

impl Approvable {
    pub fn requesting_player(&self) -> PlayerId {
        match self {
            Approvable::Action(action) => action.actor,
            Approvable::Event(play) => play.player,
        }
    }

    pub fn approving_player(&self) -> Option<PlayerId> {
        match self {
            Approvable::Action(action) => action.approving_player(),
            Approvable::Event(play) => play.approving_player(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovableRequest {
    pub id: Uuid,
    pub payload: Approvable,
    status: ApprovalStatus,
    approver: PlayerId,
}

impl ApprovableRequest {
    /// Wrap a payload that needs someone's consent. Fails when the payload
    /// does not.
    pub fn new(payload: Approvable) -> Result<Self, DomainError> {
        let approver = payload.approving_player().ok_or_else(|| {
            DomainError::validation(
                ValidationKind::NotExecutable,
                "payload requires no approval",
            )
        })?;
        Ok(Self {
            id: Uuid::new_v4(),
            payload,
            status: ApprovalStatus::Outbound,
            approver,
        })
    }

    pub fn status(&self) -> ApprovalStatus {
        self.status
    }

    pub fn approving_player(&self) -> PlayerId {
        self.approver
    }

    pub fn is_approved(&self) -> bool {
        self.status == ApprovalStatus::Approved
    }

    /// Mark the request as handed to the approving player.
    pub fn deliver(&mut self) -> Result<(), DomainError> {
        if self.status != ApprovalStatus::Outbound {
            return Err(DomainError::validation(
                ValidationKind::AlreadyResolved,
                format!("request is {:?}, not outbound", self.status),
            ));
        }
        self.status = ApprovalStatus::Pending;
        Ok(())
    }

    /// Record the approving player's answer. Terminal either way.
    pub fn respond(&mut self, approve: bool) -> Result<(), DomainError> {
        if self.status != ApprovalStatus::Pending {
            return Err(DomainError::validation(
                ValidationKind::AlreadyResolved,
                format!("request is {:?}, not pending", self.status),
            ));
        }
        self.status = if approve {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::Rejected
        };
        Ok(())
    }

    /// Execute the approved payload. Rejection or a still-open request is a
    /// `NotApproved` error; nothing is mutated in that case.
    pub fn execute(&self, game: &mut Game) -> Result<(), DomainError> {
        if !self.is_approved() {
            return Err(DomainError::validation(
                ValidationKind::NotApproved,
                format!("request is {:?}", self.status),
            ));
        }
        match &self.payload {
            Approvable::Action(action) => action.execute_approved(game),
            Approvable::Event(play) => play.execute_approved(game),
        }
    }
}
