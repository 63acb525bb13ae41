//! Shared builders for domain tests: crafted hands, played piles, and
//! mid-round game states that still satisfy the conservation invariant.

use crate::domain::cards::{Card, CardId, CardType};
use crate::domain::player::{PlayedCard, Player, PlayerId};
use crate::domain::rules::DECK_SIZE;
use crate::domain::state::{GameState, PassDirection, Phase};
use uuid::Uuid;

pub fn card(id: u32, card_type: CardType) -> Card {
    Card::new(CardId(id), card_type)
}

pub fn maki_card(id: u32, symbols: u8) -> Card {
    Card::maki(CardId(id), symbols)
}

/// A player whose played pile holds the given card types, ids auto-assigned
/// from `base_id`. Scoring tests only look at the pile, never the hand.
pub fn player_with_played(name: &str, base_id: u32, types: &[CardType]) -> Player {
    let mut player = Player::new(Uuid::new_v4(), name);
    for (i, &t) in types.iter().enumerate() {
        player.played_cards.push(PlayedCard::plain(card(base_id + i as u32, t)));
    }
    player
}

/// A player with the given total maki symbols on the pile (as 1-symbol
/// cards), for placement tests.
pub fn player_with_maki(name: &str, base_id: u32, symbols: u32) -> Player {
    let mut player = Player::new(Uuid::new_v4(), name);
    for i in 0..symbols {
        player
            .played_cards
            .push(PlayedCard::plain(maki_card(base_id + i, 1)));
    }
    player
}

/// A mid-round state with the given hands, one player per hand. The first
/// player is the host. Filler cards pad `deck_remaining` so the 108-card
/// conservation check holds.
pub fn mid_round_state(hands: Vec<Vec<Card>>) -> (GameState, Vec<PlayerId>) {
    assert!(hands.len() >= 2, "mid_round_state needs at least 2 hands");

    let mut players = Vec::with_capacity(hands.len());
    for (i, hand) in hands.into_iter().enumerate() {
        let mut p = Player::new(Uuid::new_v4(), format!("p{i}"));
        p.hand = hand;
        players.push(p);
    }
    let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();

    let in_hands: usize = players.iter().map(|p| p.hand.len()).sum();
    let filler_base = 100_000u32;
    let deck_remaining = (0..(DECK_SIZE - in_hands))
        .map(|i| card(filler_base + i as u32, CardType::Tempura))
        .collect();

    let host_id = ids[0];
    let state = GameState {
        code: "TEST42".into(),
        host_id,
        game_seed: 0,
        phase: Phase::Selecting,
        round: 1,
        turn: 1,
        pass_direction: PassDirection::Left,
        players,
        deck_remaining,
        pending_selections: Default::default(),
    };
    (state, ids)
}
