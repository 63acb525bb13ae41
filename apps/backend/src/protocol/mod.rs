//! Wire-level command and event types: the boundary between the engine and
//! whatever transport carries it.
//!
//! Commands flow in, get validated against the session's phase, and either
//! mutate state or come back as an `Error` event to the offending caller
//! only. Everything is adjacently tagged serde, so a transport can speak
//! JSON without knowing anything about the engine.

use serde::{Deserialize, Serialize};

use crate::domain::cards::CardId;
use crate::domain::lifecycle::RoundEndReport;
use crate::domain::player::PlayerId;
use crate::domain::scoring::GameEndScores;
use crate::domain::snapshot::GameSnapshot;
use crate::domain::state::PassDirection;
use crate::domain::turns::RevealedPlay;
use crate::errors::domain::DomainError;
use crate::errors::ErrorCode;

pub const PROTOCOL_VERSION: i32 = 1;

/// Commands consumed from the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    CreateGame {
        host_name: String,
    },
    JoinGame {
        code: String,
        player_name: String,
    },
    StartGame {
        code: String,
        player_id: PlayerId,
    },
    Select {
        code: String,
        player_id: PlayerId,
        card_id: CardId,
        #[serde(default)]
        use_chopsticks: bool,
        #[serde(default)]
        second_card_id: Option<CardId>,
    },
    NextRound {
        code: String,
        player_id: PlayerId,
    },
    Connect {
        code: String,
        player_id: PlayerId,
    },
    Disconnect {
        code: String,
        player_id: PlayerId,
    },
    GetState {
        code: String,
        player_id: PlayerId,
    },
}

/// Events produced for the transport layer to deliver.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Per-viewer snapshot; carries only the recipient's own hand.
    GameState { state: GameSnapshot },

    GameStarted,

    PlayerConnected {
        player_id: PlayerId,
        name: String,
    },

    PlayerDisconnected {
        player_id: PlayerId,
    },

    /// A player's selection was recorded (contents stay hidden).
    PlayerReady {
        player_id: PlayerId,
    },

    /// Barrier crossed: everyone's plays for the turn, pre-rotation.
    CardsRevealed {
        turn: u8,
        plays: Vec<RevealedPlay>,
    },

    NewRound {
        round: u8,
        pass_direction: PassDirection,
    },

    RoundEnd {
        report: RoundEndReport,
    },

    GameEnd {
        scores: GameEndScores,
        winner: Option<String>,
    },

    Error {
        code: ErrorCode,
        message: String,
    },
}

impl Event {
    /// Build the error event for a rejected command.
    pub fn error(err: &DomainError) -> Self {
        Event::Error {
            code: ErrorCode::from(err),
            message: err.to_string(),
        }
    }
}

/// Successful outcome of a dispatched command, for request/reply transports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CommandOutcome {
    GameCreated {
        code: String,
        player_id: PlayerId,
    },
    Joined {
        player_id: PlayerId,
    },
    Ok,
    State {
        state: GameSnapshot,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn commands_deserialize_from_tagged_json() {
        let cmd: Command = serde_json::from_str(
            r#"{"type":"select","code":"AB12CD","player_id":"7f1c0a44-9f2b-4d30-8c11-2a8e1c2f0b4e","card_id":17}"#,
        )
        .unwrap();
        match cmd {
            Command::Select {
                card_id,
                use_chopsticks,
                second_card_id,
                ..
            } => {
                assert_eq!(card_id.0, 17);
                assert!(!use_chopsticks);
                assert!(second_card_id.is_none());
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn error_event_carries_stable_code() {
        let err = crate::errors::domain::DomainError::validation(
            crate::errors::domain::ValidationKind::CardNotInHand,
            "Card 3 is not in hand",
        );
        let json = serde_json::to_value(Event::error(&err)).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["code"], "CARD_NOT_IN_HAND");
    }

    #[test]
    fn player_ready_round_trips() {
        let event = Event::PlayerReady {
            player_id: Uuid::new_v4(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        match (event, back) {
            (Event::PlayerReady { player_id: a }, Event::PlayerReady { player_id: b }) => {
                assert_eq!(a, b)
            }
            _ => panic!("variant changed in round trip"),
        }
    }
}
