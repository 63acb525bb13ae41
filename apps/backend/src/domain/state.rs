//! The session aggregate: phase, round/turn counters, players, and the
//! pending-selection map that feeds the simultaneous-reveal barrier.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cards::{Card, CardId};
use crate::domain::player::{Player, PlayerId};
use crate::domain::rules::{DECK_SIZE, MAX_PLAYERS};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};

/// Discrete phases of a game session.
///
/// `Dealing` and `Revealing` are transient: they are only ever observable in
/// snapshots taken while a lifecycle step or barrier commit is in flight,
/// which a session processes atomically.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for players to join; game not started.
    Lobby,
    /// Fresh deck being built and dealt.
    Dealing,
    /// Players choosing cards from their hands.
    Selecting,
    /// Barrier fired; selections being committed and revealed.
    Revealing,
    /// Round scored, waiting for the host to continue.
    RoundEnd,
    /// All rounds complete, final scores fixed.
    GameEnd,
}

/// Which way the remaining hands rotate after each reveal.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassDirection {
    /// Player i receives the hand of player i+1 (mod player count).
    Left,
    /// Mirror of left: player i receives the hand of player i-1.
    Right,
}

/// One player's pending pick for the current turn. Recorded, not applied:
/// hands only mutate at the barrier commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub card_id: CardId,
    pub use_chopsticks: bool,
    pub second_card_id: Option<CardId>,
}

impl Selection {
    pub fn single(card_id: CardId) -> Self {
        Self {
            card_id,
            use_chopsticks: false,
            second_card_id: None,
        }
    }

    pub fn with_chopsticks(card_id: CardId, second_card_id: CardId) -> Self {
        Self {
            card_id,
            use_chopsticks: true,
            second_card_id: Some(second_card_id),
        }
    }
}

/// Complete state for one game session.
///
/// The session service owns exactly one `GameState` and hands out transient
/// `&mut` borrows to the turn and lifecycle functions; nothing else ever
/// holds player or deck state.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Join code; unique among live sessions.
    pub code: String,
    pub host_id: PlayerId,
    /// Base seed; every round's shuffle seed derives from it.
    pub game_seed: u64,
    pub phase: Phase,
    /// Current round, 1..=3. Zero until the game starts.
    pub round: u8,
    /// Current turn within the round, 1-based. Resets each round.
    pub turn: u8,
    pub pass_direction: PassDirection,
    /// Players in seating order. Never removed mid-game, only marked
    /// disconnected.
    pub players: Vec<Player>,
    /// Cards dealt to nobody this round; set aside, but counted by the
    /// conservation invariant.
    pub deck_remaining: Vec<Card>,
    /// Selections recorded since the last barrier crossing.
    pub pending_selections: HashMap<PlayerId, Selection>,
}

impl GameState {
    /// Create a session in the lobby with the host already seated.
    pub fn new(code: impl Into<String>, host_name: impl Into<String>, game_seed: u64) -> Self {
        let host_id = Uuid::new_v4();
        Self {
            code: code.into(),
            host_id,
            game_seed,
            phase: Phase::Lobby,
            round: 0,
            turn: 0,
            pass_direction: PassDirection::Left,
            players: vec![Player::new(host_id, host_name)],
            deck_remaining: Vec::new(),
            pending_selections: HashMap::new(),
        }
    }

    /// Seat a new player. Lobby only; names must be unique within a session.
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<PlayerId, DomainError> {
        let name = name.into();
        if self.phase != Phase::Lobby {
            return Err(DomainError::conflict(
                ConflictKind::GameAlreadyStarted,
                "Game already started",
            ));
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(DomainError::conflict(
                ConflictKind::GameFull,
                format!("Game already has {MAX_PLAYERS} players"),
            ));
        }
        if self.players.iter().any(|p| p.name == name) {
            return Err(DomainError::conflict(
                ConflictKind::DuplicateName,
                format!("Name already taken: {name}"),
            ));
        }
        let id = Uuid::new_v4();
        self.players.push(Player::new(id, name));
        Ok(id)
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, DomainError> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, "Unknown player"))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, DomainError> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, "Unknown player"))
    }

    pub fn player_index(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub fn connected_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_connected).count()
    }

    pub fn require_phase(&self, phase: Phase) -> Result<(), DomainError> {
        if self.phase != phase {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                format!("Expected phase {phase:?}, got {:?}", self.phase),
            ));
        }
        Ok(())
    }

    pub fn require_host(&self, requester: PlayerId) -> Result<(), DomainError> {
        if requester != self.host_id {
            return Err(DomainError::validation(
                ValidationKind::NotHost,
                "Only the host may do that",
            ));
        }
        Ok(())
    }
}

/// Verify the round's card population: remainder + hands + played piles must
/// account for all 108 cards, with no id appearing twice. Violations are a
/// core defect, fatal to the session.
pub fn check_card_conservation(state: &GameState) -> Result<(), DomainError> {
    if state.round == 0 {
        return Ok(());
    }

    let mut seen: HashSet<u32> = HashSet::with_capacity(DECK_SIZE);
    let mut total = 0usize;
    let mut record = |id: CardId| -> Result<(), DomainError> {
        total += 1;
        if !seen.insert(id.0) {
            return Err(DomainError::integrity(format!(
                "Duplicate card id {} in round population",
                id.0
            )));
        }
        Ok(())
    };

    for card in &state.deck_remaining {
        record(card.id)?;
    }
    for player in &state.players {
        for card in &player.hand {
            record(card.id)?;
        }
        for played in &player.played_cards {
            record(played.card.id)?;
        }
    }

    if total != DECK_SIZE {
        return Err(DomainError::integrity(format!(
            "Card conservation violated: {total} cards accounted for, expected {DECK_SIZE}"
        )));
    }
    Ok(())
}
