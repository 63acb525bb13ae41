use crate::domain::cards::CardType;
use crate::domain::state::{Phase, Selection};
use crate::domain::test_helpers::{card, maki_card, mid_round_state};
use crate::domain::turns::{barrier_ready, commit_turn, record_selection};
use crate::errors::domain::{DomainError, ValidationKind};

#[test]
fn selection_requires_selecting_phase() {
    let (mut state, ids) = mid_round_state(vec![
        vec![card(1, CardType::Tempura)],
        vec![card(2, CardType::Sashimi)],
    ]);
    state.phase = Phase::Lobby;
    let err = record_selection(&mut state, ids[0], Selection::single(card(1, CardType::Tempura).id))
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::PhaseMismatch, _)
    ));
}

#[test]
fn selection_requires_card_in_hand() {
    let (mut state, ids) = mid_round_state(vec![
        vec![card(1, CardType::Tempura)],
        vec![card(2, CardType::Sashimi)],
    ]);
    let err =
        record_selection(&mut state, ids[0], Selection::single(card(99, CardType::Egg).id))
            .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::CardNotInHand, _)
    ));
}

#[test]
fn chopsticks_selection_requires_played_chopsticks() {
    let (mut state, ids) = mid_round_state(vec![
        vec![card(1, CardType::Tempura), card(2, CardType::Sashimi)],
        vec![card(3, CardType::Egg), card(4, CardType::Egg)],
    ]);
    let sel = Selection::with_chopsticks(card(1, CardType::Tempura).id, card(2, CardType::Sashimi).id);
    let err = record_selection(&mut state, ids[0], sel).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::ChopsticksUnavailable, _)
    ));
}

#[test]
fn chopsticks_second_card_must_be_distinct_and_in_hand() {
    let (mut state, ids) = mid_round_state(vec![
        vec![card(1, CardType::Tempura), card(2, CardType::Sashimi)],
        vec![card(3, CardType::Egg), card(4, CardType::Egg)],
    ]);
    // Give player 0 a chopsticks card on the pile.
    state.players[0]
        .played_cards
        .push(crate::domain::player::PlayedCard::plain(card(
            200,
            CardType::Chopsticks,
        )));
    // Re-pad conservation: swap one filler out for the extra played card.
    state.deck_remaining.pop();

    let same = Selection::with_chopsticks(card(1, CardType::Tempura).id, card(1, CardType::Tempura).id);
    let err = record_selection(&mut state, ids[0], same).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidSecondCard, _)
    ));

    let missing = Selection::with_chopsticks(card(1, CardType::Tempura).id, card(99, CardType::Egg).id);
    let err = record_selection(&mut state, ids[0], missing).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidSecondCard, _)
    ));
}

#[test]
fn second_card_without_chopsticks_flag_is_rejected() {
    let (mut state, ids) = mid_round_state(vec![
        vec![card(1, CardType::Tempura), card(2, CardType::Sashimi)],
        vec![card(3, CardType::Egg), card(4, CardType::Egg)],
    ]);
    let sel = Selection {
        card_id: card(1, CardType::Tempura).id,
        use_chopsticks: false,
        second_card_id: Some(card(2, CardType::Sashimi).id),
    };
    let err = record_selection(&mut state, ids[0], sel).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidSecondCard, _)
    ));
}

#[test]
fn last_selection_wins_until_barrier_fires() {
    let (mut state, ids) = mid_round_state(vec![
        vec![card(1, CardType::Tempura), card(2, CardType::Sashimi)],
        vec![card(3, CardType::Egg), card(4, CardType::Egg)],
    ]);
    assert!(!record_selection(&mut state, ids[0], Selection::single(card(1, CardType::Tempura).id)).unwrap());
    assert!(!record_selection(&mut state, ids[0], Selection::single(card(2, CardType::Sashimi).id)).unwrap());
    assert_eq!(
        state.pending_selections[&ids[0]].card_id,
        card(2, CardType::Sashimi).id
    );

    // The second player's selection completes the barrier.
    assert!(record_selection(&mut state, ids[1], Selection::single(card(3, CardType::Egg).id)).unwrap());
    assert!(barrier_ready(&state));

    let outcome = commit_turn(&mut state).unwrap();
    // The overwrite held: player 0 played the sashimi, not the tempura.
    assert_eq!(outcome.reveals[0].cards[0].card.card_type, CardType::Sashimi);
}

#[test]
fn barrier_ignores_disconnected_players() {
    let (mut state, ids) = mid_round_state(vec![
        vec![card(1, CardType::Tempura), card(2, CardType::Sashimi)],
        vec![card(3, CardType::Egg), card(4, CardType::Egg)],
        vec![card(5, CardType::Pudding), card(6, CardType::Dumpling)],
    ]);
    state.players[2].is_connected = false;

    record_selection(&mut state, ids[0], Selection::single(card(1, CardType::Tempura).id)).unwrap();
    assert!(!barrier_ready(&state));
    let ready =
        record_selection(&mut state, ids[1], Selection::single(card(3, CardType::Egg).id)).unwrap();
    assert!(ready, "two connected selections should fire the barrier");
}

#[test]
fn disconnected_player_auto_plays_first_card() {
    let (mut state, ids) = mid_round_state(vec![
        vec![card(1, CardType::Tempura), card(2, CardType::Sashimi)],
        vec![card(3, CardType::Egg), card(4, CardType::Dumpling)],
    ]);
    state.players[1].is_connected = false;
    record_selection(&mut state, ids[0], Selection::single(card(1, CardType::Tempura).id)).unwrap();

    let outcome = commit_turn(&mut state).unwrap();
    assert_eq!(outcome.reveals[1].cards[0].card.card_type, CardType::Egg);
    assert_eq!(state.players[1].hand.len(), 1);
}

#[test]
fn disconnected_players_recorded_selection_is_honored() {
    let (mut state, ids) = mid_round_state(vec![
        vec![card(1, CardType::Tempura), card(2, CardType::Sashimi)],
        vec![card(3, CardType::Egg), card(4, CardType::Dumpling)],
    ]);
    record_selection(&mut state, ids[1], Selection::single(card(4, CardType::Dumpling).id)).unwrap();
    state.players[1].is_connected = false;
    record_selection(&mut state, ids[0], Selection::single(card(1, CardType::Tempura).id)).unwrap();

    let outcome = commit_turn(&mut state).unwrap();
    assert_eq!(outcome.reveals[1].cards[0].card.card_type, CardType::Dumpling);
}

#[test]
fn commit_shrinks_every_hand_by_exactly_one() {
    let (mut state, ids) = mid_round_state(vec![
        vec![card(1, CardType::Tempura), card(2, CardType::Sashimi), card(3, CardType::Egg)],
        vec![card(4, CardType::Egg), card(5, CardType::Pudding), maki_card(6, 2)],
    ]);

    record_selection(&mut state, ids[0], Selection::single(card(1, CardType::Tempura).id)).unwrap();
    record_selection(&mut state, ids[1], Selection::single(card(4, CardType::Egg).id)).unwrap();
    commit_turn(&mut state).unwrap();

    assert_eq!(state.players[0].hand.len(), 2);
    assert_eq!(state.players[1].hand.len(), 2);
    assert_eq!(state.turn, 2);
    assert_eq!(state.phase, Phase::Selecting);
}

#[test]
fn hands_rotate_left_from_next_seat() {
    let (mut state, ids) = mid_round_state(vec![
        vec![card(1, CardType::Tempura), card(2, CardType::Tempura)],
        vec![card(3, CardType::Sashimi), card(4, CardType::Sashimi)],
        vec![card(5, CardType::Dumpling), card(6, CardType::Dumpling)],
    ]);
    record_selection(&mut state, ids[0], Selection::single(card(1, CardType::Tempura).id)).unwrap();
    record_selection(&mut state, ids[1], Selection::single(card(3, CardType::Sashimi).id)).unwrap();
    record_selection(&mut state, ids[2], Selection::single(card(5, CardType::Dumpling).id)).unwrap();
    commit_turn(&mut state).unwrap();

    // Left pass: player 0 now holds what player 1 kept, and so on around.
    assert_eq!(state.players[0].hand[0].card_type, CardType::Sashimi);
    assert_eq!(state.players[1].hand[0].card_type, CardType::Dumpling);
    assert_eq!(state.players[2].hand[0].card_type, CardType::Tempura);
}

#[test]
fn hands_rotate_right_in_round_two_direction() {
    let (mut state, ids) = mid_round_state(vec![
        vec![card(1, CardType::Tempura), card(2, CardType::Tempura)],
        vec![card(3, CardType::Sashimi), card(4, CardType::Sashimi)],
        vec![card(5, CardType::Dumpling), card(6, CardType::Dumpling)],
    ]);
    state.pass_direction = crate::domain::state::PassDirection::Right;
    record_selection(&mut state, ids[0], Selection::single(card(1, CardType::Tempura).id)).unwrap();
    record_selection(&mut state, ids[1], Selection::single(card(3, CardType::Sashimi).id)).unwrap();
    record_selection(&mut state, ids[2], Selection::single(card(5, CardType::Dumpling).id)).unwrap();
    commit_turn(&mut state).unwrap();

    assert_eq!(state.players[0].hand[0].card_type, CardType::Dumpling);
    assert_eq!(state.players[1].hand[0].card_type, CardType::Tempura);
    assert_eq!(state.players[2].hand[0].card_type, CardType::Sashimi);
}

#[test]
fn wasabi_triples_next_sushi_only() {
    let (mut state, ids) = mid_round_state(vec![
        vec![card(1, CardType::Wasabi), card(2, CardType::Squid), card(3, CardType::Salmon)],
        vec![card(4, CardType::Tempura), card(5, CardType::Tempura), card(6, CardType::Tempura)],
    ]);

    // Turn 1: player 0 plays wasabi. Hands rotate, so chase the cards.
    record_selection(&mut state, ids[0], Selection::single(card(1, CardType::Wasabi).id)).unwrap();
    record_selection(&mut state, ids[1], Selection::single(card(4, CardType::Tempura).id)).unwrap();
    commit_turn(&mut state).unwrap();
    assert_eq!(state.players[0].unused_wasabi, 1);

    // Turn 2: player 0 holds the tempura hand now; player 1 holds squid and
    // salmon. Play a tempura and the squid.
    let p1_squid = state.players[1].hand.iter().find(|c| c.card_type == CardType::Squid).unwrap().id;
    let p0_first = state.players[0].hand[0].id;
    record_selection(&mut state, ids[0], Selection::single(p0_first)).unwrap();
    record_selection(&mut state, ids[1], Selection::single(p1_squid)).unwrap();
    commit_turn(&mut state).unwrap();

    // The squid landed on player 1's pile, which has no wasabi; player 0's
    // wasabi is still armed.
    assert_eq!(state.players[0].unused_wasabi, 1);
    let squid_play = state.players[1]
        .played_cards
        .iter()
        .find(|p| p.card.card_type == CardType::Squid)
        .unwrap();
    assert!(!squid_play.tripled, "no wasabi on player 1's pile");

    // Final turn: player 0 holds the salmon, which lands on the wasabi.
    let p0_salmon = state.players[0].hand.iter().find(|c| c.card_type == CardType::Salmon).unwrap().id;
    let p1_first = state.players[1].hand[0].id;
    record_selection(&mut state, ids[0], Selection::single(p0_salmon)).unwrap();
    record_selection(&mut state, ids[1], Selection::single(p1_first)).unwrap();
    let outcome = commit_turn(&mut state).unwrap();

    let salmon_play = state.players[0]
        .played_cards
        .iter()
        .find(|p| p.card.card_type == CardType::Salmon)
        .unwrap();
    assert!(salmon_play.tripled);
    assert_eq!(state.players[0].unused_wasabi, 0);
    assert!(outcome.round_complete);
}

#[test]
fn chopsticks_returns_to_hand_and_nets_minus_one() {
    let (mut state, ids) = mid_round_state(vec![
        vec![card(1, CardType::Tempura), card(2, CardType::Sashimi), card(3, CardType::Egg)],
        vec![card(4, CardType::Egg), card(5, CardType::Pudding), card(6, CardType::Salmon)],
    ]);
    state.players[0]
        .played_cards
        .push(crate::domain::player::PlayedCard::plain(card(
            200,
            CardType::Chopsticks,
        )));
    state.deck_remaining.pop();

    let sel = Selection::with_chopsticks(card(1, CardType::Tempura).id, card(2, CardType::Sashimi).id);
    record_selection(&mut state, ids[0], sel).unwrap();
    record_selection(&mut state, ids[1], Selection::single(card(4, CardType::Egg).id)).unwrap();
    let outcome = commit_turn(&mut state).unwrap();

    // Both cards revealed, chopsticks flagged.
    assert!(outcome.reveals[0].used_chopsticks);
    assert_eq!(outcome.reveals[0].cards.len(), 2);

    // The chopsticks card is no longer on the pile; it traveled with the
    // rotation inside the passed hand.
    assert!(!state.players[0].has_chopsticks());
    let p1_hand_types: Vec<CardType> = state.players[1].hand.iter().map(|c| c.card_type).collect();
    assert!(p1_hand_types.contains(&CardType::Chopsticks));

    // Net change: both hands went from 3 to 2.
    assert_eq!(state.players[0].hand.len(), 2);
    assert_eq!(state.players[1].hand.len(), 2);
}

#[test]
fn pudding_play_increments_persistent_count() {
    let (mut state, ids) = mid_round_state(vec![
        vec![card(1, CardType::Pudding), card(2, CardType::Sashimi)],
        vec![card(3, CardType::Egg), card(4, CardType::Egg)],
    ]);
    record_selection(&mut state, ids[0], Selection::single(card(1, CardType::Pudding).id)).unwrap();
    record_selection(&mut state, ids[1], Selection::single(card(3, CardType::Egg).id)).unwrap();
    commit_turn(&mut state).unwrap();

    assert_eq!(state.players[0].pudding_count, 1);
    // The pudding card also sits on the pile, keeping conservation exact.
    assert_eq!(state.players[0].count_type(CardType::Pudding), 1);
}

#[test]
fn corrupted_population_fails_commit_with_integrity_error() {
    let (mut state, ids) = mid_round_state(vec![
        vec![card(1, CardType::Tempura), card(2, CardType::Sashimi)],
        vec![card(3, CardType::Egg), card(4, CardType::Egg)],
    ]);
    state.deck_remaining.pop();

    record_selection(&mut state, ids[0], Selection::single(card(1, CardType::Tempura).id)).unwrap();
    record_selection(&mut state, ids[1], Selection::single(card(3, CardType::Egg).id)).unwrap();
    let err = commit_turn(&mut state).unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn final_commit_leaves_revealing_for_scoring() {
    let (mut state, ids) = mid_round_state(vec![
        vec![card(1, CardType::Tempura)],
        vec![card(2, CardType::Sashimi)],
    ]);
    record_selection(&mut state, ids[0], Selection::single(card(1, CardType::Tempura).id)).unwrap();
    record_selection(&mut state, ids[1], Selection::single(card(2, CardType::Sashimi).id)).unwrap();
    let outcome = commit_turn(&mut state).unwrap();

    assert!(outcome.round_complete);
    assert_eq!(state.phase, Phase::Revealing);
    assert!(state.players.iter().all(|p| p.hand.is_empty()));
}
