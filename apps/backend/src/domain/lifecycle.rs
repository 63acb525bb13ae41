//! Round and game lifecycle: starting the game, dealing rounds, applying
//! round scores, and closing the game out.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::deck::Deck;
use crate::domain::player::PlayerId;
use crate::domain::rules::{derive_round_seed, pass_direction_for_round, MIN_PLAYERS, ROUNDS};
use crate::domain::scoring::{score_game_end, score_round, GameEndScores, RoundBreakdown};
use crate::domain::state::{check_card_conservation, GameState, Phase};
use crate::errors::domain::{DomainError, ValidationKind};

/// Per-player entry in a round-end report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRoundScore {
    pub player_id: PlayerId,
    pub name: String,
    pub breakdown: RoundBreakdown,
}

/// Scores for a completed round, in seating order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundEndReport {
    pub round: u8,
    pub scores: Vec<PlayerRoundScore>,
}

/// Start the game: host only, at least two players, lobby phase. Deals
/// round 1 and opens the first selection window.
pub fn start_game(state: &mut GameState, requester: PlayerId) -> Result<(), DomainError> {
    state.require_host(requester)?;
    state.require_phase(Phase::Lobby)?;
    if state.players.len() < MIN_PLAYERS {
        return Err(DomainError::validation(
            ValidationKind::NotEnoughPlayers,
            format!("Need at least {MIN_PLAYERS} players"),
        ));
    }

    info!(code = %state.code, players = state.players.len(), "Starting game");
    state.round = 1;
    start_round(state)
}

/// Deal the current round: fresh seeded deck, per-round player reset, pass
/// direction for the round, turn counter back to 1.
fn start_round(state: &mut GameState) -> Result<(), DomainError> {
    state.phase = Phase::Dealing;

    let seed = derive_round_seed(state.game_seed, state.round);
    let dealt = Deck::build(seed).deal(state.players.len())?;

    for (player, hand) in state.players.iter_mut().zip(dealt.hands) {
        player.reset_for_round();
        player.hand = hand;
    }
    state.deck_remaining = dealt.remainder;
    state.pass_direction = pass_direction_for_round(state.round);
    state.turn = 1;
    state.pending_selections.clear();
    state.phase = Phase::Selecting;

    check_card_conservation(state)?;
    debug!(code = %state.code, round = state.round, direction = ?state.pass_direction, "Round dealt");
    Ok(())
}

/// Score the just-finished round and move to `RoundEnd`. Takes over from
/// the `Revealing` phase left by the final turn commit.
pub fn complete_round(state: &mut GameState) -> Result<RoundEndReport, DomainError> {
    state.require_phase(Phase::Revealing)?;

    let breakdowns = score_round(&state.players);
    let round_idx = (state.round - 1) as usize;
    let mut scores = Vec::with_capacity(state.players.len());
    for (player, breakdown) in state.players.iter_mut().zip(&breakdowns) {
        player.round_scores[round_idx] = breakdown.total;
        player.score += breakdown.total;
        scores.push(PlayerRoundScore {
            player_id: player.id,
            name: player.name.clone(),
            breakdown: *breakdown,
        });
    }

    state.phase = Phase::RoundEnd;
    info!(code = %state.code, round = state.round, "Round scored");
    Ok(RoundEndReport {
        round: state.round,
        scores,
    })
}

/// Advance to the next round. Host only; valid only in `RoundEnd` after
/// rounds 1 and 2 (the third round closes the game by itself).
pub fn advance_round(state: &mut GameState, requester: PlayerId) -> Result<(), DomainError> {
    state.require_host(requester)?;
    if state.phase != Phase::RoundEnd {
        return Err(DomainError::validation(
            ValidationKind::RoundNotComplete,
            "Round is not complete",
        ));
    }
    if state.round >= ROUNDS {
        return Err(DomainError::validation(
            ValidationKind::RoundNotComplete,
            "All rounds already played",
        ));
    }

    state.round += 1;
    start_round(state)
}

/// Close the game after the final round: apply the pudding bonus exactly
/// once, fix the ranking, move to `GameEnd`.
pub fn finish_game(state: &mut GameState) -> Result<GameEndScores, DomainError> {
    state.require_phase(Phase::RoundEnd)?;
    if state.round < ROUNDS {
        return Err(DomainError::validation(
            ValidationKind::RoundNotComplete,
            "Game still has rounds to play",
        ));
    }

    let end = score_game_end(&state.players);
    for (player, bonus) in state.players.iter_mut().zip(&end.bonuses) {
        player.score += bonus.bonus;
    }
    state.phase = Phase::GameEnd;
    info!(code = %state.code, "Game finished");
    Ok(end)
}
