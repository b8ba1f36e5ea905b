//! Domain-level error type used across the rules engine.
//!
//! This error type is transport- and UI-agnostic. It covers tier-1 failures
//! only: precondition and validation violations the caller should reject and
//! not retry. Game-terminal conditions (win/loss) are not errors; they live
//! on the game aggregate as an outcome flag.

use thiserror::Error;

/// Validation / precondition violation kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    PhaseMismatch,
    OutOfTurn,
    NotExecutable,
    NotApproved,
    AlreadyResolved,
    CardNotInHand,
    EmptyStack,
    NoCubesOfPlagueOnField,
    HandLimitExceeded,
    GameOver,
    InvalidPlayerCount,
    InvalidMap,
    NotPermutation,
    Other(String),
}

/// Domain-level not found entities.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Field,
    Player,
    Card,
    Other(String),
}

/// Central domain error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input validation or business rule violation
    #[error("validation error {0:?}: {1}")]
    Validation(ValidationKind, String),
    /// Missing resource in domain terms
    #[error("not found {0:?}: {1}")]
    NotFound(NotFoundKind, String),
}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn validation_other(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::Validation(ValidationKind::Other(detail.clone()), detail)
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }

    /// Validation kind, if this is a validation error.
    pub fn kind(&self) -> Option<&ValidationKind> {
        match self {
            DomainError::Validation(kind, _) => Some(kind),
            DomainError::NotFound(..) => None,
        }
    }
}
