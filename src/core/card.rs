//! Trait cards: a signed food value paired with a trait.
//!
//! Wire shape: `[value, trait]`.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::traits::Trait;

/// An Evolution trait card.
///
/// Non-carnivore cards carry a food value in `[-3, 3]`; carnivore cards
/// carry a value in `[-8, 8]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TraitCard {
    pub value: i8,
    pub trait_: Trait,
}

impl TraitCard {
    /// Inclusive food-value bounds for non-carnivore cards.
    pub const FOOD_VALUE_MIN: i8 = -3;
    pub const FOOD_VALUE_MAX: i8 = 3;

    /// Inclusive food-value bounds for carnivore cards.
    pub const FOOD_VALUE_CARNIVORE_MIN: i8 = -8;
    pub const FOOD_VALUE_CARNIVORE_MAX: i8 = 8;

    /// Create a new trait card.
    #[must_use]
    pub const fn new(value: i8, trait_: Trait) -> Self {
        Self { value, trait_ }
    }

    /// Check that the card's value is within range for its trait.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let (min, max) = if self.trait_ == Trait::Carnivore {
            (Self::FOOD_VALUE_CARNIVORE_MIN, Self::FOOD_VALUE_CARNIVORE_MAX)
        } else {
            (Self::FOOD_VALUE_MIN, Self::FOOD_VALUE_MAX)
        };
        (min..=max).contains(&self.value)
    }
}

/// Cards order by trait first, then value. This is the canonical deck
/// ordering used by the deterministic dealer.
impl Ord for TraitCard {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.trait_, self.value).cmp(&(other.trait_, other.value))
    }
}

impl PartialOrd for TraitCard {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for TraitCard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.value, self.trait_).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TraitCard {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (value, trait_) = <(i8, Trait)>::deserialize(deserializer)?;
        let card = TraitCard::new(value, trait_);
        if !card.is_valid() {
            return Err(D::Error::custom(format!(
                "food value {value} out of range for trait {trait_}"
            )));
        }
        Ok(card)
    }
}

/// Every legal trait card, one per (trait, value) pair: 7 values for each
/// of the 15 non-carnivore traits plus 17 carnivore values, 122 in total.
#[must_use]
pub fn full_deck() -> Vec<TraitCard> {
    let mut cards = Vec::new();
    for trait_ in Trait::ALL {
        let (min, max) = if trait_ == Trait::Carnivore {
            (
                TraitCard::FOOD_VALUE_CARNIVORE_MIN,
                TraitCard::FOOD_VALUE_CARNIVORE_MAX,
            )
        } else {
            (TraitCard::FOOD_VALUE_MIN, TraitCard::FOOD_VALUE_MAX)
        };
        for value in min..=max {
            cards.push(TraitCard::new(value, trait_));
        }
    }
    cards
}
