//! Deck construction, shuffling, and per-round dealing.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

use crate::domain::cards::{Card, CardId, CardType};
use crate::domain::rules::{hand_size_for_players, DECK_SIZE, MAX_PLAYERS, MIN_PLAYERS};
use crate::errors::domain::{DomainError, ValidationKind};

/// The fixed 108-card composition:
///
/// - 6 maki (1 symbol), 12 maki (2 symbols), 8 maki (3 symbols)
/// - 14 tempura, 14 sashimi, 14 dumpling
/// - 10 salmon, 5 squid, 5 egg
/// - 10 pudding, 6 wasabi, 4 chopsticks
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

/// One round's worth of dealt hands plus the unused remainder.
///
/// The remainder is kept (not discarded) so the card-conservation invariant
/// `|remainder| + Σ|hand| + Σ|played| == 108` stays checkable all round.
#[derive(Debug, Clone)]
pub struct DealtRound {
    pub hands: Vec<Vec<Card>>,
    pub remainder: Vec<Card>,
}

impl Deck {
    /// Build the full deck and Fisher-Yates shuffle it from `seed`.
    pub fn build(seed: u64) -> Self {
        let mut cards = Self::compose();
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        cards.shuffle(&mut rng);
        Self { cards }
    }

    fn compose() -> Vec<Card> {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        let plain_counts = [
            (CardType::Tempura, 14),
            (CardType::Sashimi, 14),
            (CardType::Dumpling, 14),
            (CardType::Salmon, 10),
            (CardType::Squid, 5),
            (CardType::Egg, 5),
            (CardType::Pudding, 10),
            (CardType::Wasabi, 6),
            (CardType::Chopsticks, 4),
        ];
        for (card_type, count) in plain_counts {
            for _ in 0..count {
                cards.push(Card::new(CardId(cards.len() as u32), card_type));
            }
        }
        for (maki_value, count) in [(1u8, 6usize), (2, 12), (3, 8)] {
            for _ in 0..count {
                cards.push(Card::maki(CardId(cards.len() as u32), maki_value));
            }
        }

        debug_assert_eq!(cards.len(), DECK_SIZE);
        cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Deal one hand per player, consuming the deck. The hand size depends
    /// on the player count; everything not dealt is the round's remainder.
    pub fn deal(self, player_count: usize) -> Result<DealtRound, DomainError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
            return Err(DomainError::validation(
                ValidationKind::InvalidPlayerCount,
                format!("Player count must be {MIN_PLAYERS}..={MAX_PLAYERS}, got {player_count}"),
            ));
        }
        let hand_size = hand_size_for_players(player_count).ok_or_else(|| {
            DomainError::validation(ValidationKind::InvalidPlayerCount, "No hand size")
        })? as usize;

        let mut cards = self.cards;
        let remainder = cards.split_off(player_count * hand_size);
        let mut hands = Vec::with_capacity(player_count);
        for chunk in cards.chunks(hand_size) {
            hands.push(chunk.to_vec());
        }

        Ok(DealtRound { hands, remainder })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn deck_has_exact_composition() {
        let deck = Deck::build(1);
        assert_eq!(deck.len(), DECK_SIZE);

        let mut by_type: HashMap<CardType, usize> = HashMap::new();
        let mut maki_by_value: HashMap<u8, usize> = HashMap::new();
        for card in &deck.cards {
            *by_type.entry(card.card_type).or_default() += 1;
            if card.card_type == CardType::Maki {
                *maki_by_value.entry(card.maki_value).or_default() += 1;
            }
        }

        assert_eq!(by_type[&CardType::Maki], 26);
        assert_eq!(maki_by_value[&1], 6);
        assert_eq!(maki_by_value[&2], 12);
        assert_eq!(maki_by_value[&3], 8);
        assert_eq!(by_type[&CardType::Tempura], 14);
        assert_eq!(by_type[&CardType::Sashimi], 14);
        assert_eq!(by_type[&CardType::Dumpling], 14);
        assert_eq!(by_type[&CardType::Salmon], 10);
        assert_eq!(by_type[&CardType::Squid], 5);
        assert_eq!(by_type[&CardType::Egg], 5);
        assert_eq!(by_type[&CardType::Pudding], 10);
        assert_eq!(by_type[&CardType::Wasabi], 6);
        assert_eq!(by_type[&CardType::Chopsticks], 4);
    }

    #[test]
    fn card_ids_are_unique() {
        let deck = Deck::build(42);
        let ids: HashSet<u32> = deck.cards.iter().map(|c| c.id.0).collect();
        assert_eq!(ids.len(), DECK_SIZE);
    }

    #[test]
    fn shuffle_is_deterministic_per_seed() {
        let a = Deck::build(12345);
        let b = Deck::build(12345);
        assert_eq!(a.cards, b.cards);

        let c = Deck::build(54321);
        assert_ne!(a.cards, c.cards);
    }

    #[test]
    fn deal_sizes_follow_player_count() {
        for (players, hand_size) in [(2usize, 10usize), (3, 9), (4, 8), (5, 7)] {
            let dealt = Deck::build(7).deal(players).unwrap();
            assert_eq!(dealt.hands.len(), players);
            for hand in &dealt.hands {
                assert_eq!(hand.len(), hand_size);
            }
            assert_eq!(dealt.remainder.len(), DECK_SIZE - players * hand_size);
        }
    }

    #[test]
    fn deal_validates_player_count() {
        assert!(Deck::build(7).deal(1).is_err());
        assert!(Deck::build(7).deal(6).is_err());
    }
}
