//! Property tests: the card-count invariants hold across whole random games.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sushigo_backend::domain::lifecycle::{advance_round, complete_round, finish_game, start_game};
use sushigo_backend::domain::rules::{hand_size_for_players, DECK_SIZE, ROUNDS};
use sushigo_backend::domain::turns::{barrier_ready, commit_turn, record_selection};
use sushigo_backend::{GameState, Phase, Selection};

fn population(state: &GameState) -> usize {
    state.deck_remaining.len()
        + state
            .players
            .iter()
            .map(|p| p.hand.len() + p.played_cards.len())
            .sum::<usize>()
}

fn random_selection(state: &GameState, idx: usize, rng: &mut StdRng) -> Selection {
    let player = &state.players[idx];
    let hand = &player.hand;
    if player.has_chopsticks() && hand.len() >= 2 && rng.random_range(0..100) < 40 {
        let first = rng.random_range(0..hand.len());
        let mut second = rng.random_range(0..hand.len() - 1);
        if second >= first {
            second += 1;
        }
        Selection::with_chopsticks(hand[first].id, hand[second].id)
    } else {
        Selection::single(hand[rng.random_range(0..hand.len())].id)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn invariants_hold_across_random_games(
        player_count in 2usize..=5,
        game_seed in any::<u64>(),
        play_seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(play_seed);
        let mut state = GameState::new("PROP01", "p0", game_seed);
        for i in 1..player_count {
            state.add_player(format!("p{i}")).unwrap();
        }
        let host = state.host_id;
        start_game(&mut state, host).unwrap();

        let deal_size = hand_size_for_players(player_count).unwrap() as usize;

        for round in 1..=ROUNDS {
            prop_assert_eq!(state.round, round);
            prop_assert_eq!(population(&state), DECK_SIZE);

            let mut turns = 0usize;
            while state.phase == Phase::Selecting {
                let hand_sizes_before: Vec<usize> =
                    state.players.iter().map(|p| p.hand.len()).collect();
                let puddings_before: Vec<u32> =
                    state.players.iter().map(|p| p.pudding_count).collect();

                for idx in 0..state.players.len() {
                    let selection = random_selection(&state, idx, &mut rng);
                    let id = state.players[idx].id;
                    record_selection(&mut state, id, selection).unwrap();
                }
                prop_assert!(barrier_ready(&state));
                commit_turn(&mut state).unwrap();
                turns += 1;

                // Every hand shrank by exactly one, chopsticks or not.
                for (player, before) in state.players.iter().zip(&hand_sizes_before) {
                    prop_assert_eq!(player.hand.len(), before - 1);
                }
                // Puddings only ever grow.
                for (player, before) in state.players.iter().zip(&puddings_before) {
                    prop_assert!(player.pudding_count >= *before);
                }
                prop_assert_eq!(population(&state), DECK_SIZE);
            }

            // A round is exactly deal-size turns, ending with empty hands.
            prop_assert_eq!(turns, deal_size);
            prop_assert!(state.players.iter().all(|p| p.hand.is_empty()));

            complete_round(&mut state).unwrap();
            if round < ROUNDS {
                advance_round(&mut state, host).unwrap();
            }
        }

        let pre_bonus: Vec<i32> = state.players.iter().map(|p| p.score).collect();
        let end = finish_game(&mut state).unwrap();
        prop_assert_eq!(state.phase, Phase::GameEnd);

        // Final scores are the three round totals plus the bonus, once.
        for (i, player) in state.players.iter().enumerate() {
            let round_sum: i32 = player.round_scores.iter().sum();
            prop_assert_eq!(pre_bonus[i], round_sum);
            prop_assert_eq!(player.score, round_sum + end.bonuses[i].bonus);
        }

        // Ranking is sorted by final score, descending.
        let ranked_scores: Vec<i32> = end.ranking.iter().map(|r| r.score).collect();
        let mut sorted = ranked_scores.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        prop_assert_eq!(ranked_scores, sorted);
    }
}
