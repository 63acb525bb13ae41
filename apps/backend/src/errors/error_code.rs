//! Error codes carried by protocol error events.
//!
//! Add new codes here; never pass ad-hoc strings as error codes. All codes
//! are SCREAMING_SNAKE_CASE and map 1:1 to the strings that appear on the
//! wire.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};

/// Centralized error codes for the session protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Request validation
    PhaseMismatch,
    CardNotInHand,
    ChopsticksUnavailable,
    InvalidSecondCard,
    InvalidPlayerCount,
    NotHost,
    NotEnoughPlayers,
    RoundNotComplete,
    ValidationError,

    // Conflicts
    DuplicateName,
    GameFull,
    GameAlreadyStarted,
    JoinCodeConflict,
    Conflict,

    // Missing resources
    GameNotFound,
    PlayerNotFound,
    NotFound,

    // Engine defects; terminal for the session
    IntegrityError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::PhaseMismatch => "PHASE_MISMATCH",
            ErrorCode::CardNotInHand => "CARD_NOT_IN_HAND",
            ErrorCode::ChopsticksUnavailable => "CHOPSTICKS_UNAVAILABLE",
            ErrorCode::InvalidSecondCard => "INVALID_SECOND_CARD",
            ErrorCode::InvalidPlayerCount => "INVALID_PLAYER_COUNT",
            ErrorCode::NotHost => "NOT_HOST",
            ErrorCode::NotEnoughPlayers => "NOT_ENOUGH_PLAYERS",
            ErrorCode::RoundNotComplete => "ROUND_NOT_COMPLETE",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::DuplicateName => "DUPLICATE_NAME",
            ErrorCode::GameFull => "GAME_FULL",
            ErrorCode::GameAlreadyStarted => "GAME_ALREADY_STARTED",
            ErrorCode::JoinCodeConflict => "JOIN_CODE_CONFLICT",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::GameNotFound => "GAME_NOT_FOUND",
            ErrorCode::PlayerNotFound => "PLAYER_NOT_FOUND",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::IntegrityError => "INTEGRITY_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&DomainError> for ErrorCode {
    fn from(err: &DomainError) -> Self {
        match err {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::PhaseMismatch => ErrorCode::PhaseMismatch,
                ValidationKind::CardNotInHand => ErrorCode::CardNotInHand,
                ValidationKind::ChopsticksUnavailable => ErrorCode::ChopsticksUnavailable,
                ValidationKind::InvalidSecondCard => ErrorCode::InvalidSecondCard,
                ValidationKind::InvalidPlayerCount => ErrorCode::InvalidPlayerCount,
                ValidationKind::NotHost => ErrorCode::NotHost,
                ValidationKind::NotEnoughPlayers => ErrorCode::NotEnoughPlayers,
                ValidationKind::RoundNotComplete => ErrorCode::RoundNotComplete,
                _ => ErrorCode::ValidationError,
            },
            DomainError::Conflict(kind, _) => match kind {
                ConflictKind::DuplicateName => ErrorCode::DuplicateName,
                ConflictKind::GameFull => ErrorCode::GameFull,
                ConflictKind::GameAlreadyStarted => ErrorCode::GameAlreadyStarted,
                ConflictKind::JoinCodeConflict => ErrorCode::JoinCodeConflict,
                _ => ErrorCode::Conflict,
            },
            DomainError::NotFound(kind, _) => match kind {
                NotFoundKind::Game => ErrorCode::GameNotFound,
                NotFoundKind::Player => ErrorCode::PlayerNotFound,
                _ => ErrorCode::NotFound,
            },
            DomainError::Integrity(_) => ErrorCode::IntegrityError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_string_matches_serde() {
        let json = serde_json::to_string(&ErrorCode::CardNotInHand).unwrap();
        assert_eq!(json, format!("\"{}\"", ErrorCode::CardNotInHand.as_str()));
    }

    #[test]
    fn integrity_maps_to_terminal_code() {
        let err = DomainError::integrity("hand count drifted");
        assert_eq!(ErrorCode::from(&err), ErrorCode::IntegrityError);
    }
}
