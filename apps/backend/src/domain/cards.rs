//! Core card types: CardId, CardType, Card.

use serde::{Deserialize, Serialize};

/// Identifies one physical card within a round's deck. Unique per instance,
/// not per type: two salmon cards have distinct ids.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CardId(pub u32);

/// All card types in the game. Scoring and play behavior dispatch on this
/// enum exhaustively, so a new card type fails to compile until every match
/// is extended.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CardType {
    Maki,
    Tempura,
    Sashimi,
    Dumpling,
    Salmon,
    Squid,
    Egg,
    Wasabi,
    Chopsticks,
    Pudding,
}

/// A single card. Built once at deck construction and never mutated; the
/// "landed on wasabi" fact lives on the played pile, not the card.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub card_type: CardType,
    /// Maki symbol count (1..=3); zero for every other card type.
    pub maki_value: u8,
}

impl Card {
    pub fn new(id: CardId, card_type: CardType) -> Self {
        debug_assert!(card_type != CardType::Maki, "maki cards need a symbol count");
        Self {
            id,
            card_type,
            maki_value: 0,
        }
    }

    pub fn maki(id: CardId, maki_value: u8) -> Self {
        debug_assert!((1..=3).contains(&maki_value));
        Self {
            id,
            card_type: CardType::Maki,
            maki_value,
        }
    }

    /// Sushi cards are the ones a wasabi can triple.
    pub fn is_sushi(&self) -> bool {
        matches!(
            self.card_type,
            CardType::Salmon | CardType::Squid | CardType::Egg
        )
    }

    /// Base point value for sushi cards; zero for everything else.
    pub fn base_value(&self) -> i32 {
        match self.card_type {
            CardType::Egg => 1,
            CardType::Salmon => 2,
            CardType::Squid => 3,
            CardType::Maki
            | CardType::Tempura
            | CardType::Sashimi
            | CardType::Dumpling
            | CardType::Wasabi
            | CardType::Chopsticks
            | CardType::Pudding => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sushi_base_values() {
        assert_eq!(Card::new(CardId(0), CardType::Egg).base_value(), 1);
        assert_eq!(Card::new(CardId(1), CardType::Salmon).base_value(), 2);
        assert_eq!(Card::new(CardId(2), CardType::Squid).base_value(), 3);
        assert_eq!(Card::maki(CardId(3), 2).base_value(), 0);
    }

    #[test]
    fn only_salmon_squid_egg_are_sushi() {
        assert!(Card::new(CardId(0), CardType::Salmon).is_sushi());
        assert!(!Card::new(CardId(1), CardType::Wasabi).is_sushi());
        assert!(!Card::new(CardId(2), CardType::Pudding).is_sushi());
    }
}
