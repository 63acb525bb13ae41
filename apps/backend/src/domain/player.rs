//! Per-player mutable state.
//!
//! A `Player` is a plain state container: hand and played-pile mutation is
//! performed exclusively by the turn commit in [`crate::domain::turns`],
//! under a transient borrow from the owning session.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cards::{Card, CardType};
use crate::domain::rules::ROUNDS;

pub type PlayerId = Uuid;

/// A card on a player's played pile. `tripled` is fixed at append time when
/// a sushi card lands on an unused wasabi; a card is multiplied at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedCard {
    pub card: Card,
    pub tripled: bool,
}

impl PlayedCard {
    pub fn plain(card: Card) -> Self {
        Self {
            card,
            tripled: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Cards currently in hand; visible only to this player.
    pub hand: Vec<Card>,
    /// Cards played this round, in play order; visible to everyone.
    pub played_cards: Vec<PlayedCard>,
    /// Wasabi played this round that no sushi has landed on yet.
    pub unused_wasabi: u8,
    /// Puddings collected across the whole game. Never reset, never
    /// decremented.
    pub pudding_count: u32,
    /// Cumulative score; the pudding bonus is folded in only at game end.
    pub score: i32,
    /// Points earned in each round.
    pub round_scores: [i32; ROUNDS as usize],
    pub is_connected: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            hand: Vec::new(),
            played_cards: Vec::new(),
            unused_wasabi: 0,
            pudding_count: 0,
            score: 0,
            round_scores: [0; ROUNDS as usize],
            is_connected: true,
        }
    }

    /// A chopsticks card on the played pile that could power a two-card
    /// selection this turn. A player has at most one pending selection, so
    /// "already spent this selection" reduces to the selection's own flag.
    pub fn has_chopsticks(&self) -> bool {
        self.played_cards
            .iter()
            .any(|p| p.card.card_type == CardType::Chopsticks)
    }

    /// Total maki symbols on the played pile.
    pub fn maki_symbols(&self) -> u32 {
        self.played_cards
            .iter()
            .filter(|p| p.card.card_type == CardType::Maki)
            .map(|p| p.card.maki_value as u32)
            .sum()
    }

    pub fn count_type(&self, card_type: CardType) -> usize {
        self.played_cards
            .iter()
            .filter(|p| p.card.card_type == card_type)
            .count()
    }

    /// Clear round-scoped state. Puddings and scores persist.
    pub fn reset_for_round(&mut self) {
        self.hand.clear();
        self.played_cards.clear();
        self.unused_wasabi = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards::CardId;

    fn played(card_type: CardType) -> PlayedCard {
        PlayedCard::plain(Card::new(CardId(0), card_type))
    }

    #[test]
    fn chopsticks_detected_on_played_pile() {
        let mut p = Player::new(Uuid::new_v4(), "a");
        assert!(!p.has_chopsticks());
        p.played_cards.push(played(CardType::Chopsticks));
        assert!(p.has_chopsticks());
    }

    #[test]
    fn maki_symbols_sum_played_maki_only() {
        let mut p = Player::new(Uuid::new_v4(), "a");
        p.played_cards.push(PlayedCard::plain(Card::maki(CardId(1), 3)));
        p.played_cards.push(PlayedCard::plain(Card::maki(CardId(2), 2)));
        p.played_cards.push(played(CardType::Tempura));
        assert_eq!(p.maki_symbols(), 5);
    }

    #[test]
    fn round_reset_preserves_puddings_and_score() {
        let mut p = Player::new(Uuid::new_v4(), "a");
        p.pudding_count = 4;
        p.score = 21;
        p.unused_wasabi = 1;
        p.played_cards.push(played(CardType::Sashimi));
        p.reset_for_round();
        assert_eq!(p.pudding_count, 4);
        assert_eq!(p.score, 21);
        assert_eq!(p.unused_wasabi, 0);
        assert!(p.played_cards.is_empty());
        assert!(p.hand.is_empty());
    }
}
