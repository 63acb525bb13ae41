//! Simultaneous-selection barrier and turn commit.
//!
//! Selections are recorded without touching any hand; once every connected
//! player has one, the barrier fires and `commit_turn` applies the whole
//! turn as a single indivisible mutation: removals, appends with wasabi
//! pairing, chopsticks return, reveal records, hand rotation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::cards::{Card, CardId, CardType};
use crate::domain::player::{PlayedCard, Player, PlayerId};
use crate::domain::state::{check_card_conservation, GameState, PassDirection, Phase, Selection};
use crate::errors::domain::{DomainError, ValidationKind};

/// What one player revealed this turn, in seating order within the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealedPlay {
    pub player_id: PlayerId,
    /// Cards played this turn with their tripled flags, in selection order.
    pub cards: Vec<PlayedCard>,
    pub used_chopsticks: bool,
}

/// Result of a committed turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// The turn number that was just committed (1-based within the round).
    pub turn: u8,
    pub reveals: Vec<RevealedPlay>,
    /// True when every hand is now empty and the round must be scored.
    pub round_complete: bool,
}

/// Record a player's pending selection for the current turn.
///
/// Does not mutate hands. Overwrites any earlier selection by the same
/// player (last write wins) until the barrier fires. Returns whether the
/// barrier is ready after this write.
pub fn record_selection(
    state: &mut GameState,
    player_id: PlayerId,
    selection: Selection,
) -> Result<bool, DomainError> {
    state.require_phase(Phase::Selecting)?;
    let player = state.player(player_id)?;

    require_in_hand(player, selection.card_id)?;

    if selection.use_chopsticks {
        if !player.has_chopsticks() {
            return Err(DomainError::validation(
                ValidationKind::ChopsticksUnavailable,
                "No chopsticks on the played pile",
            ));
        }
        let second = selection.second_card_id.ok_or_else(|| {
            DomainError::validation(
                ValidationKind::InvalidSecondCard,
                "Chopsticks use requires a second card",
            )
        })?;
        if second == selection.card_id {
            return Err(DomainError::validation(
                ValidationKind::InvalidSecondCard,
                "Second card must differ from the first",
            ));
        }
        require_second_in_hand(player, second)?;
    } else if selection.second_card_id.is_some() {
        return Err(DomainError::validation(
            ValidationKind::InvalidSecondCard,
            "Second card given without chopsticks",
        ));
    }

    state.pending_selections.insert(player_id, selection);
    Ok(barrier_ready(state))
}

/// The barrier fires once every connected player has a pending selection.
///
/// Disconnected players neither block the barrier nor lose a selection they
/// recorded before dropping; see `commit_turn` for how a silent hand plays.
pub fn barrier_ready(state: &GameState) -> bool {
    if state.phase != Phase::Selecting {
        return false;
    }
    if state.connected_count() == 0 {
        return false;
    }
    state
        .players
        .iter()
        .filter(|p| p.is_connected)
        .all(|p| state.pending_selections.contains_key(&p.id))
}

/// Apply the whole turn atomically. Only callable when the barrier is ready.
///
/// A disconnected player with no recorded selection auto-plays the first
/// card of their hand, keeping every hand on the same schedule: each hand
/// shrinks by exactly one card per turn, chopsticks or not.
pub fn commit_turn(state: &mut GameState) -> Result<TurnOutcome, DomainError> {
    state.require_phase(Phase::Selecting)?;
    state.phase = Phase::Revealing;

    let turn = state.turn;
    let mut reveals = Vec::with_capacity(state.players.len());

    for idx in 0..state.players.len() {
        let player_id = state.players[idx].id;
        let selection = match state.pending_selections.get(&player_id).copied() {
            Some(sel) => sel,
            None => {
                let player = &state.players[idx];
                if player.is_connected {
                    return Err(DomainError::integrity(
                        "Barrier fired with a connected player unselected",
                    ));
                }
                let card = player.hand.first().copied().ok_or_else(|| {
                    DomainError::integrity("Empty hand during an active turn")
                })?;
                debug!(code = %state.code, %player_id, "Auto-playing for disconnected player");
                Selection::single(card.id)
            }
        };
        let reveal = apply_selection(&mut state.players[idx], selection)?;
        reveals.push(reveal);
    }

    rotate_hands(state);
    state.pending_selections.clear();
    state.turn += 1;

    check_card_conservation(state)?;

    let empty_hands = state.players.iter().filter(|p| p.hand.is_empty()).count();
    let round_complete = empty_hands == state.players.len();
    if !round_complete && empty_hands > 0 {
        return Err(DomainError::integrity(
            "Hands emptied unevenly within a round",
        ));
    }

    // Round completion is scored by the lifecycle step, which takes over
    // from the Revealing phase; otherwise the next selection window opens.
    if !round_complete {
        state.phase = Phase::Selecting;
    }

    Ok(TurnOutcome {
        turn,
        reveals,
        round_complete,
    })
}

/// Apply one player's selection: remove from hand, append to the played
/// pile with wasabi pairing, return the chopsticks card when it was used.
fn apply_selection(player: &mut Player, selection: Selection) -> Result<RevealedPlay, DomainError> {
    let hand_before = player.hand.len();
    let mut cards = Vec::with_capacity(2);

    let first = take_from_hand(player, selection.card_id)?;
    cards.push(play_onto_pile(player, first));

    if selection.use_chopsticks {
        let second_id = selection.second_card_id.ok_or_else(|| {
            DomainError::integrity("Chopsticks selection committed without a second card")
        })?;
        let second = take_from_hand(player, second_id)?;
        cards.push(play_onto_pile(player, second));

        // The spent chopsticks card goes back to the hand; it is never
        // passed onward with the rest of the hand this turn.
        let pos = player
            .played_cards
            .iter()
            .position(|p| p.card.card_type == CardType::Chopsticks)
            .ok_or_else(|| {
                DomainError::integrity("Chopsticks used but none on the played pile")
            })?;
        let chopsticks = player.played_cards.remove(pos);
        player.hand.push(chopsticks.card);
    }

    let delta = hand_before as i64 - player.hand.len() as i64;
    if delta != 1 {
        return Err(DomainError::integrity(format!(
            "Hand of {} changed by {delta} cards in one turn",
            player.name
        )));
    }

    Ok(RevealedPlay {
        player_id: player.id,
        cards,
        used_chopsticks: selection.use_chopsticks,
    })
}

fn take_from_hand(player: &mut Player, card_id: CardId) -> Result<Card, DomainError> {
    let pos = player
        .hand
        .iter()
        .position(|c| c.id == card_id)
        .ok_or_else(|| {
            DomainError::integrity(format!("Selected card {} left the hand", card_id.0))
        })?;
    Ok(player.hand.remove(pos))
}

/// Append a card to the played pile, resolving wasabi pairing at append
/// time: a wasabi arms the counter, the next sushi card consumes it.
fn play_onto_pile(player: &mut Player, card: Card) -> PlayedCard {
    let played = match card.card_type {
        CardType::Wasabi => {
            player.unused_wasabi += 1;
            PlayedCard::plain(card)
        }
        CardType::Salmon | CardType::Squid | CardType::Egg => {
            let tripled = player.unused_wasabi > 0;
            if tripled {
                player.unused_wasabi -= 1;
            }
            PlayedCard { card, tripled }
        }
        CardType::Pudding => {
            player.pudding_count += 1;
            PlayedCard::plain(card)
        }
        CardType::Maki
        | CardType::Tempura
        | CardType::Sashimi
        | CardType::Dumpling
        | CardType::Chopsticks => PlayedCard::plain(card),
    };
    player.played_cards.push(played);
    played
}

/// Rotate the post-removal hands one seat along the pass direction.
fn rotate_hands(state: &mut GameState) {
    if state.players.len() < 2 {
        return;
    }
    let mut hands: Vec<Vec<Card>> = state
        .players
        .iter_mut()
        .map(|p| std::mem::take(&mut p.hand))
        .collect();
    match state.pass_direction {
        // Left: hand flows from player i+1 to player i.
        PassDirection::Left => hands.rotate_left(1),
        PassDirection::Right => hands.rotate_right(1),
    }
    for (player, hand) in state.players.iter_mut().zip(hands) {
        player.hand = hand;
    }
}

fn require_in_hand(player: &Player, card_id: CardId) -> Result<(), DomainError> {
    if !player.hand.iter().any(|c| c.id == card_id) {
        return Err(DomainError::validation(
            ValidationKind::CardNotInHand,
            format!("Card {} is not in hand", card_id.0),
        ));
    }
    Ok(())
}

fn require_second_in_hand(player: &Player, card_id: CardId) -> Result<(), DomainError> {
    if !player.hand.iter().any(|c| c.id == card_id) {
        return Err(DomainError::validation(
            ValidationKind::InvalidSecondCard,
            format!("Second card {} is not in hand", card_id.0),
        ));
    }
    Ok(())
}
