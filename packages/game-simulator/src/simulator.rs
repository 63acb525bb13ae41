//! In-memory game simulation with randomly-selecting bots.
//!
//! Drives the domain layer directly (no session actors, no transport) so a
//! full three-round game runs in microseconds. Every selection still goes
//! through the real validation, barrier, and scoring paths.

use rand::rngs::StdRng;
use rand::Rng;

use sushigo_backend::domain::lifecycle::{advance_round, complete_round, finish_game, start_game};
use sushigo_backend::domain::rules::ROUNDS;
use sushigo_backend::domain::scoring::GameEndScores;
use sushigo_backend::domain::turns::{barrier_ready, commit_turn, record_selection};
use sushigo_backend::{GameState, Phase, Selection};

/// How often a bot reaches for its chopsticks when it can (percent).
const CHOPSTICKS_RATE: u32 = 30;

#[derive(Debug)]
pub struct GameResult {
    pub scores: GameEndScores,
    pub turns_played: u32,
}

/// Run one full game with `player_count` random bots.
pub fn run_game(player_count: usize, game_seed: u64, rng: &mut StdRng) -> GameResult {
    let mut state = GameState::new("SIM000", "bot-0", game_seed);
    for i in 1..player_count {
        state
            .add_player(format!("bot-{i}"))
            .expect("lobby has room for every bot");
    }
    let host = state.host_id;
    start_game(&mut state, host).expect("simulated game starts");

    let mut turns_played = 0u32;
    loop {
        while state.phase == Phase::Selecting {
            for idx in 0..state.players.len() {
                let selection = choose_selection(&state, idx, rng);
                let player_id = state.players[idx].id;
                record_selection(&mut state, player_id, selection)
                    .expect("bot selections are always legal");
            }
            assert!(barrier_ready(&state));
            commit_turn(&mut state).expect("simulated commits never corrupt state");
            turns_played += 1;
        }

        let report = complete_round(&mut state).expect("round scoring succeeds");
        tracing::debug!(round = report.round, "round scored");

        if state.round >= ROUNDS {
            let scores = finish_game(&mut state).expect("game end scoring succeeds");
            return GameResult {
                scores,
                turns_played,
            };
        }
        advance_round(&mut state, host).expect("host advances the round");
    }
}

/// Pick a random card; occasionally a chopsticks double-pick when legal.
fn choose_selection(state: &GameState, player_idx: usize, rng: &mut StdRng) -> Selection {
    let player = &state.players[player_idx];
    let hand = &player.hand;

    if player.has_chopsticks() && hand.len() >= 2 && rng.random_range(0..100) < CHOPSTICKS_RATE {
        let first = rng.random_range(0..hand.len());
        let mut second = rng.random_range(0..hand.len() - 1);
        if second >= first {
            second += 1;
        }
        return Selection::with_chopsticks(hand[first].id, hand[second].id);
    }

    let pick = rng.random_range(0..hand.len());
    Selection::single(hand[pick].id)
}
