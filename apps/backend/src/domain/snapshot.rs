//! Per-viewer snapshot of game state.
//!
//! The information-hiding invariant is structural: `PlayerPublic` has no
//! hand field at all, so no serialization path can leak an opponent's hand.
//! The viewer's own hand rides at the top level of the snapshot.

use serde::{Deserialize, Serialize};

use crate::domain::cards::Card;
use crate::domain::player::{PlayedCard, PlayerId};
use crate::domain::rules::ROUNDS;
use crate::domain::state::{GameState, PassDirection, Phase};

/// Public info about one seat: everything except the hand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerPublic {
    pub player_id: PlayerId,
    pub name: String,
    pub score: i32,
    pub round_scores: [i32; ROUNDS as usize],
    pub played_cards: Vec<PlayedCard>,
    pub pudding_count: u32,
    pub hand_count: usize,
    pub has_chopsticks: bool,
    pub is_ready: bool,
    pub is_connected: bool,
}

/// Full state as seen by one player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub code: String,
    pub phase: Phase,
    pub round: u8,
    pub turn: u8,
    pub pass_direction: PassDirection,
    pub host_id: PlayerId,
    pub players: Vec<PlayerPublic>,
    /// The requesting player's own id and hand; the only hand present.
    pub player_id: PlayerId,
    pub hand: Vec<Card>,
}

/// Produce the snapshot for `viewer`. Seating order is preserved.
pub fn snapshot_for(state: &GameState, viewer: PlayerId) -> GameSnapshot {
    let players = state
        .players
        .iter()
        .map(|p| PlayerPublic {
            player_id: p.id,
            name: p.name.clone(),
            score: p.score,
            round_scores: p.round_scores,
            played_cards: p.played_cards.clone(),
            pudding_count: p.pudding_count,
            hand_count: p.hand.len(),
            has_chopsticks: p.has_chopsticks(),
            is_ready: state.pending_selections.contains_key(&p.id),
            is_connected: p.is_connected,
        })
        .collect();

    let hand = state
        .players
        .iter()
        .find(|p| p.id == viewer)
        .map(|p| p.hand.clone())
        .unwrap_or_default();

    GameSnapshot {
        code: state.code.clone(),
        phase: state.phase,
        round: state.round,
        turn: state.turn,
        pass_direction: state.pass_direction,
        host_id: state.host_id,
        players,
        player_id: viewer,
        hand,
    }
}
