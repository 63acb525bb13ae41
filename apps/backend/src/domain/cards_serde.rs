//! Serialization and deserialization for card types.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::cards::CardType;

impl Serialize for CardType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = match self {
            CardType::Maki => "maki",
            CardType::Tempura => "tempura",
            CardType::Sashimi => "sashimi",
            CardType::Dumpling => "dumpling",
            CardType::Salmon => "salmon",
            CardType::Squid => "squid",
            CardType::Egg => "egg",
            CardType::Wasabi => "wasabi",
            CardType::Chopsticks => "chopsticks",
            CardType::Pudding => "pudding",
        };
        serializer.serialize_str(s)
    }
}

impl<'de> Deserialize<'de> for CardType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "maki" => Ok(CardType::Maki),
            "tempura" => Ok(CardType::Tempura),
            "sashimi" => Ok(CardType::Sashimi),
            "dumpling" => Ok(CardType::Dumpling),
            "salmon" => Ok(CardType::Salmon),
            "squid" => Ok(CardType::Squid),
            "egg" => Ok(CardType::Egg),
            "wasabi" => Ok(CardType::Wasabi),
            "chopsticks" => Ok(CardType::Chopsticks),
            "pudding" => Ok(CardType::Pudding),
            _ => Err(serde::de::Error::custom(format!("Invalid card type: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::cards::{Card, CardId};
    use super::*;

    #[test]
    fn card_type_round_trips() {
        for ct in [
            CardType::Maki,
            CardType::Tempura,
            CardType::Sashimi,
            CardType::Dumpling,
            CardType::Salmon,
            CardType::Squid,
            CardType::Egg,
            CardType::Wasabi,
            CardType::Chopsticks,
            CardType::Pudding,
        ] {
            let json = serde_json::to_string(&ct).unwrap();
            let back: CardType = serde_json::from_str(&json).unwrap();
            assert_eq!(ct, back);
        }
    }

    #[test]
    fn card_serializes_with_lowercase_type() {
        let card = Card::maki(CardId(7), 3);
        let v = serde_json::to_value(card).unwrap();
        assert_eq!(v["card_type"], "maki");
        assert_eq!(v["maki_value"], 3);
        assert_eq!(v["id"], 7);
    }
}
