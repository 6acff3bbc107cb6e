//! The feeding-step reply: one of five choices.
//!
//! Wire shapes:
//!
//! - `false` declines further feeding while staying eligible for scavenging
//! - `Nat` feeds the indexed vegetarian species
//! - `[Nat, Nat]` stores tokens on the indexed fat-tissue species
//! - `[Nat, Nat, Nat]` attacks: attacker index, target player index into
//!   the feeding queue (current player last), defender index
//!
//! Anything else parses as [`FeedingChoice::CannotFeed`], the claim that
//! no feeding is possible. That claim is checked against the actual
//! options before it is honored; a false claim counts as a fault.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::core::Species;
use crate::player::Player;

use super::options::FeedingOptions;

/// A player's answer to "which species feeds next".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedingChoice {
    /// Decline to feed. Scavengers still collect when carnivores eat.
    NoFeeding,
    /// Feed a hungry vegetarian species one token.
    Vegetarian { species_index: usize },
    /// Store tokens on a fat-tissue species.
    FatTissue {
        species_index: usize,
        food_tokens: u8,
    },
    /// Attack another species with a hungry carnivore. `player_index`
    /// counts through the feeding queue starting after the current
    /// player, with the current player in the final slot.
    Carnivore {
        species_index: usize,
        player_index: usize,
        defender_index: usize,
    },
    /// No species can feed or store.
    CannotFeed,
}

impl FeedingChoice {
    /// Check this choice against the chooser's actual options.
    ///
    /// `opponents` holds the other players' boards in feeding-queue order
    /// starting after the chooser; carnivore target indices count through
    /// that slice with the chooser's own boards in the final slot.
    #[must_use]
    pub fn validate(&self, player: &Player, opponents: &[Vec<Species>], watering_hole: u32) -> bool {
        match *self {
            FeedingChoice::NoFeeding => true,
            FeedingChoice::Vegetarian { .. } => {
                player.possible_vegetarian_feedings().contains(self)
            }
            FeedingChoice::FatTissue { .. } => player
                .possible_fat_tissue_feedings(watering_hole, true)
                .contains(self),
            FeedingChoice::Carnivore { .. } => {
                player.possible_carnivore_feedings(opponents, true).contains(self)
            }
            FeedingChoice::CannotFeed => {
                FeedingOptions::gather(player, opponents, watering_hole).none_available()
            }
        }
    }
}

impl Serialize for FeedingChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            FeedingChoice::NoFeeding => serializer.serialize_bool(false),
            FeedingChoice::Vegetarian { species_index } => {
                serializer.serialize_u64(species_index as u64)
            }
            FeedingChoice::FatTissue {
                species_index,
                food_tokens,
            } => (species_index, food_tokens).serialize(serializer),
            FeedingChoice::Carnivore {
                species_index,
                player_index,
                defender_index,
            } => (species_index, player_index, defender_index).serialize(serializer),
            FeedingChoice::CannotFeed => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for FeedingChoice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(choice_from_value(&value))
    }
}

fn nat(value: &Value) -> Option<usize> {
    value.as_u64().and_then(|n| usize::try_from(n).ok())
}

/// Lenient parse: any payload that matches none of the defined shapes is
/// read as the claim that no feeding is possible.
pub(crate) fn choice_from_value(value: &Value) -> FeedingChoice {
    if value.as_bool() == Some(false) {
        return FeedingChoice::NoFeeding;
    }
    if let Some(species_index) = nat(value) {
        return FeedingChoice::Vegetarian { species_index };
    }
    if let Some(items) = value.as_array() {
        match items.as_slice() {
            [a, b] => {
                if let (Some(species_index), Some(food_tokens)) =
                    (nat(a), b.as_u64().and_then(|n| u8::try_from(n).ok()))
                {
                    return FeedingChoice::FatTissue {
                        species_index,
                        food_tokens,
                    };
                }
            }
            [a, b, c] => {
                if let (Some(species_index), Some(player_index), Some(defender_index)) =
                    (nat(a), nat(b), nat(c))
                {
                    return FeedingChoice::Carnivore {
                        species_index,
                        player_index,
                        defender_index,
                    };
                }
            }
            _ => {}
        }
    }
    FeedingChoice::CannotFeed
}
