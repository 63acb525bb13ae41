//! Domain-level error type used across the engine and services.
//!
//! This error type is transport-agnostic. The protocol layer converts it into
//! wire error events using `ErrorCode`.

use thiserror::Error;

/// Validation failures: the caller asked for something the rules forbid.
/// State is never mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    PhaseMismatch,
    CardNotInHand,
    ChopsticksUnavailable,
    InvalidSecondCard,
    InvalidPlayerCount,
    NotHost,
    NotEnoughPlayers,
    RoundNotComplete,
    Other(String),
}

/// Semantic conflict kinds (extend as needed)
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    DuplicateName,
    GameFull,
    GameAlreadyStarted,
    JoinCodeConflict,
    Other(String),
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Game,
    Player,
    Other(String),
}

/// Central domain error type.
///
/// `Validation`, `Conflict` and `NotFound` are user errors: rejected
/// synchronously and surfaced only to the offending caller. `Integrity`
/// means the engine itself broke an invariant; the session owning the state
/// is torn down and the error is never retried or tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("validation error {0:?}: {1}")]
    Validation(ValidationKind, String),
    #[error("conflict {0:?}: {1}")]
    Conflict(ConflictKind, String),
    #[error("not found {0:?}: {1}")]
    NotFound(NotFoundKind, String),
    #[error("integrity violation: {0}")]
    Integrity(String),
}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn validation_other(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::Validation(ValidationKind::Other(detail.clone()), detail)
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn integrity(detail: impl Into<String>) -> Self {
        Self::Integrity(detail.into())
    }

    /// True for errors that indicate a defect in the engine rather than a bad
    /// request. Fatal to the owning session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DomainError::Integrity(_))
    }
}
