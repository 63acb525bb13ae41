use crate::domain::lifecycle::{advance_round, complete_round, finish_game, start_game};
use crate::domain::rules::hand_size_for_players;
use crate::domain::state::{GameState, PassDirection, Phase, Selection};
use crate::domain::turns::{barrier_ready, commit_turn};
use crate::errors::domain::{DomainError, ValidationKind};

fn lobby_with_players(n: usize) -> GameState {
    let mut state = GameState::new("ABC123", "host", 4242);
    for i in 1..n {
        state.add_player(format!("guest{i}")).unwrap();
    }
    state
}

/// Drive the current round to completion by always selecting the first card.
fn play_out_round(state: &mut GameState) -> u32 {
    let mut turns = 0;
    while state.phase == Phase::Selecting {
        for i in 0..state.players.len() {
            let (id, first) = (state.players[i].id, state.players[i].hand[0].id);
            crate::domain::turns::record_selection(state, id, Selection::single(first)).unwrap();
        }
        assert!(barrier_ready(state));
        commit_turn(state).unwrap();
        turns += 1;
    }
    turns
}

#[test]
fn start_game_requires_host() {
    let mut state = lobby_with_players(2);
    let guest = state.players[1].id;
    let err = start_game(&mut state, guest).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::NotHost, _)
    ));
}

#[test]
fn start_game_requires_two_players() {
    let mut state = lobby_with_players(1);
    let host = state.host_id;
    let err = start_game(&mut state, host).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::NotEnoughPlayers, _)
    ));
}

#[test]
fn start_game_deals_round_one() {
    for n in 2..=5 {
        let mut state = lobby_with_players(n);
        let host = state.host_id;
        start_game(&mut state, host).unwrap();

        assert_eq!(state.phase, Phase::Selecting);
        assert_eq!(state.round, 1);
        assert_eq!(state.turn, 1);
        assert_eq!(state.pass_direction, PassDirection::Left);
        let expected = hand_size_for_players(n).unwrap() as usize;
        for p in &state.players {
            assert_eq!(p.hand.len(), expected);
            assert!(p.played_cards.is_empty());
        }
    }
}

#[test]
fn round_runs_exactly_deal_size_turns() {
    let mut state = lobby_with_players(3);
    let host = state.host_id;
    start_game(&mut state, host).unwrap();

    let turns = play_out_round(&mut state);
    assert_eq!(turns, hand_size_for_players(3).unwrap() as u32);
    assert_eq!(state.phase, Phase::Revealing);
    assert!(state.players.iter().all(|p| p.hand.is_empty()));
}

#[test]
fn complete_round_applies_totals_once() {
    let mut state = lobby_with_players(2);
    let host = state.host_id;
    start_game(&mut state, host).unwrap();
    play_out_round(&mut state);

    let report = complete_round(&mut state).unwrap();
    assert_eq!(state.phase, Phase::RoundEnd);
    assert_eq!(report.round, 1);
    for (player, entry) in state.players.iter().zip(&report.scores) {
        assert_eq!(player.round_scores[0], entry.breakdown.total);
        assert_eq!(player.score, entry.breakdown.total);
    }

    // Scoring again is a phase error, not a double application.
    assert!(complete_round(&mut state).is_err());
}

#[test]
fn advance_round_flips_direction_and_reseeds() {
    let mut state = lobby_with_players(2);
    let host = state.host_id;
    start_game(&mut state, host).unwrap();
    let round1_first_hand: Vec<_> = state.players[0].hand.clone();
    play_out_round(&mut state);
    complete_round(&mut state).unwrap();

    advance_round(&mut state, host).unwrap();
    assert_eq!(state.round, 2);
    assert_eq!(state.turn, 1);
    assert_eq!(state.pass_direction, PassDirection::Right);
    assert_eq!(state.phase, Phase::Selecting);
    // A fresh deck: the round-2 deal is not the round-1 deal.
    assert_ne!(state.players[0].hand, round1_first_hand);
}

#[test]
fn advance_round_guards_host_and_phase() {
    let mut state = lobby_with_players(2);
    let host = state.host_id;
    let guest = state.players[1].id;
    start_game(&mut state, host).unwrap();

    let err = advance_round(&mut state, guest).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::NotHost, _)
    ));

    // Mid-round: the round is not complete.
    let err = advance_round(&mut state, host).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::RoundNotComplete, _)
    ));
}

#[test]
fn full_game_applies_pudding_bonus_exactly_once() {
    let mut state = lobby_with_players(2);
    let host = state.host_id;
    start_game(&mut state, host).unwrap();

    for round in 1..=3u8 {
        play_out_round(&mut state);
        complete_round(&mut state).unwrap();
        if round < 3 {
            advance_round(&mut state, host).unwrap();
        }
    }

    let pre_bonus: Vec<i32> = state.players.iter().map(|p| p.score).collect();
    let round_sums: Vec<i32> = state
        .players
        .iter()
        .map(|p| p.round_scores.iter().sum())
        .collect();
    assert_eq!(pre_bonus, round_sums);

    let end = finish_game(&mut state).unwrap();
    assert_eq!(state.phase, Phase::GameEnd);
    for (i, player) in state.players.iter().enumerate() {
        assert_eq!(player.score, pre_bonus[i] + end.bonuses[i].bonus);
    }

    // Closing twice is a phase error; the bonus cannot double-apply.
    assert!(finish_game(&mut state).is_err());
}

#[test]
fn pudding_counts_survive_round_boundaries() {
    let mut state = lobby_with_players(2);
    let host = state.host_id;
    start_game(&mut state, host).unwrap();

    play_out_round(&mut state);
    let after_round1: Vec<u32> = state.players.iter().map(|p| p.pudding_count).collect();
    complete_round(&mut state).unwrap();
    advance_round(&mut state, host).unwrap();

    for (p, &before) in state.players.iter().zip(&after_round1) {
        assert!(p.pudding_count >= before);
        assert!(p.played_cards.is_empty());
    }
}

#[test]
fn join_guards_in_lobby_and_after_start() {
    let mut state = lobby_with_players(5);
    assert!(matches!(
        state.add_player("sixth"),
        Err(DomainError::Conflict(
            crate::errors::domain::ConflictKind::GameFull,
            _
        ))
    ));

    let mut state = lobby_with_players(2);
    assert!(matches!(
        state.add_player("host"),
        Err(DomainError::Conflict(
            crate::errors::domain::ConflictKind::DuplicateName,
            _
        ))
    ));

    let host = state.host_id;
    start_game(&mut state, host).unwrap();
    assert!(matches!(
        state.add_player("late"),
        Err(DomainError::Conflict(
            crate::errors::domain::ConflictKind::GameAlreadyStarted,
            _
        ))
    ));
}
