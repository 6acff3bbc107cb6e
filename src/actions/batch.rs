//! The per-turn action batch (`Action4`): validation and application.
//!
//! Wire shape:
//!
//! ```text
//! [discard, [GrowPopulation, ...], [GrowBody, ...],
//!           [BoardTransfer, ...], [ReplaceTrait, ...]]
//! ```
//!
//! A batch is validated as a whole against the owning player's state; any
//! violation rejects the entire batch and the dealer prunes the player.
//! Application order is fixed because later steps depend on indices
//! created by earlier ones: board transfers first (so grow and replace
//! actions can address the new boards), then population growth, body
//! growth, trait replacement, and finally card removal.

use serde::de::Error as DeError;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use smallvec::SmallVec;
use thiserror::Error;

use super::parts::{BoardTransfer, GrowBody, GrowPopulation, ReplaceTrait};
use crate::core::{Species, Trait};
use crate::player::Player;

/// Why an action batch was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("card index {card_index} used more than once")]
    DuplicateCard { card_index: usize },

    #[error("card index {card_index} out of range for hand of {hand_size}")]
    CardOutOfRange { card_index: usize, hand_size: usize },

    #[error("species index {species_index} out of range")]
    SpeciesOutOfRange { species_index: usize },

    #[error("population of species {species_index} would exceed the cap")]
    PopulationOverflow { species_index: usize },

    #[error("body of species {species_index} would exceed the cap")]
    BodyOverflow { species_index: usize },

    #[error("board transfer attaches more than {} trait cards", Species::MAX_TRAITS)]
    TooManyTransferTraits,

    #[error("board transfer attaches the same trait twice")]
    DuplicateTransferTraits,

    #[error("trait slot {trait_slot} does not exist on species {species_index}")]
    TraitSlotOutOfRange {
        species_index: usize,
        trait_slot: usize,
    },

    #[error("species {species_index} would carry duplicate traits")]
    DuplicateTraits { species_index: usize },
}

/// A player's complete set of card-driven actions for one turn.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Action4 {
    /// Index of the card discarded to the watering hole.
    pub discard: usize,
    pub grow_population: Vec<GrowPopulation>,
    pub grow_body: Vec<GrowBody>,
    pub board_transfer: Vec<BoardTransfer>,
    pub replace_trait: Vec<ReplaceTrait>,
}

impl Action4 {
    /// A batch that only discards the given card.
    #[must_use]
    pub fn discard_only(discard: usize) -> Self {
        Self {
            discard,
            ..Self::default()
        }
    }

    /// Every card index consumed by this batch, duplicates included.
    #[must_use]
    pub fn used_cards(&self) -> Vec<usize> {
        let mut used = vec![self.discard];
        used.extend(self.grow_population.iter().map(|gp| gp.card_index));
        used.extend(self.grow_body.iter().map(|gb| gb.card_index));
        for bt in &self.board_transfer {
            used.push(bt.card_index);
            used.extend(bt.trait_card_indices.iter().copied());
        }
        used.extend(self.replace_trait.iter().map(|rt| rt.card_index));
        used
    }

    /// Validate the whole batch against the player's current state.
    pub fn validate(&self, player: &Player) -> Result<(), ActionError> {
        self.validate_card_indices(player)?;
        self.validate_board_transfers(player)?;
        self.validate_growth(player)?;
        self.validate_replace_traits(player)?;
        Ok(())
    }

    fn validate_card_indices(&self, player: &Player) -> Result<(), ActionError> {
        let hand_size = player.hand.len();
        let mut seen = vec![false; hand_size];
        for card_index in self.used_cards() {
            if card_index >= hand_size {
                return Err(ActionError::CardOutOfRange {
                    card_index,
                    hand_size,
                });
            }
            if seen[card_index] {
                return Err(ActionError::DuplicateCard { card_index });
            }
            seen[card_index] = true;
        }
        Ok(())
    }

    fn validate_board_transfers(&self, player: &Player) -> Result<(), ActionError> {
        for bt in &self.board_transfer {
            if bt.trait_card_indices.len() > Species::MAX_TRAITS {
                return Err(ActionError::TooManyTransferTraits);
            }
            let traits = bt.traits(player);
            if has_duplicates(&traits) {
                return Err(ActionError::DuplicateTransferTraits);
            }
        }
        Ok(())
    }

    /// Aggregate growth requests per target and check the caps. Requests
    /// targeting boards created by this batch are checked against a fresh
    /// board (population 1, body 0).
    fn validate_growth(&self, player: &Player) -> Result<(), ActionError> {
        let existing = player.species.len();
        let available = existing + self.board_transfer.len();

        let mut population_counts = vec![0u8; available];
        for gp in &self.grow_population {
            if gp.species_index >= available {
                return Err(ActionError::SpeciesOutOfRange {
                    species_index: gp.species_index,
                });
            }
            population_counts[gp.species_index] += 1;
        }
        for (species_index, &count) in population_counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let target = target_board(player, species_index);
            if !target.can_grow_population(count) {
                return Err(ActionError::PopulationOverflow { species_index });
            }
        }

        let mut body_counts = vec![0u8; available];
        for gb in &self.grow_body {
            if gb.species_index >= available {
                return Err(ActionError::SpeciesOutOfRange {
                    species_index: gb.species_index,
                });
            }
            body_counts[gb.species_index] += 1;
        }
        for (species_index, &count) in body_counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let target = target_board(player, species_index);
            if !target.can_grow_body(count) {
                return Err(ActionError::BodyOverflow { species_index });
            }
        }

        Ok(())
    }

    /// Each replace must address an occupied slot, and no species may end
    /// up with duplicate traits once every replace in the batch has been
    /// applied to a snapshot including the pending board transfers.
    fn validate_replace_traits(&self, player: &Player) -> Result<(), ActionError> {
        let existing = player.species.len();
        let available = existing + self.board_transfer.len();

        let mut trait_lists: Vec<SmallVec<[Trait; 3]>> = player
            .species
            .iter()
            .map(|s| SmallVec::from_slice(s.traits()))
            .collect();
        trait_lists.extend(self.board_transfer.iter().map(|bt| bt.traits(player)));

        for rt in &self.replace_trait {
            if rt.species_index >= available {
                return Err(ActionError::SpeciesOutOfRange {
                    species_index: rt.species_index,
                });
            }
            if rt.trait_slot >= trait_lists[rt.species_index].len() {
                return Err(ActionError::TraitSlotOutOfRange {
                    species_index: rt.species_index,
                    trait_slot: rt.trait_slot,
                });
            }
            trait_lists[rt.species_index][rt.trait_slot] = player.hand[rt.card_index].trait_;
        }

        for (species_index, traits) in trait_lists.iter().enumerate() {
            if has_duplicates(traits) {
                return Err(ActionError::DuplicateTraits { species_index });
            }
        }

        Ok(())
    }

    /// Apply the batch to its (pre-validated) owner. Returns the food
    /// value of the discarded card, which the dealer credits to the
    /// watering hole.
    ///
    /// Panics on out-of-range indices: those are caught by
    /// [`Self::validate`], so reaching one here is an implementation bug.
    pub fn apply(&self, player: &mut Player) -> i8 {
        for bt in &self.board_transfer {
            bt.apply(player);
        }
        for gp in &self.grow_population {
            gp.apply(player);
        }
        for gb in &self.grow_body {
            gb.apply(player);
        }
        for rt in &self.replace_trait {
            rt.apply(player);
        }

        let discard_value = player.hand[self.discard].value;
        player.remove_cards(&self.used_cards());
        discard_value
    }
}

fn target_board(player: &Player, species_index: usize) -> Species {
    player
        .species
        .get(species_index)
        .cloned()
        .unwrap_or_else(Species::new_board)
}

fn has_duplicates(traits: &[Trait]) -> bool {
    let mut sorted: SmallVec<[Trait; 3]> = SmallVec::from_slice(traits);
    sorted.sort_unstable();
    sorted.windows(2).any(|w| w[0] == w[1])
}

impl Serialize for Action4 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(5))?;
        seq.serialize_element(&self.discard)?;
        seq.serialize_element(&self.grow_population)?;
        seq.serialize_element(&self.grow_body)?;
        seq.serialize_element(&self.board_transfer)?;
        seq.serialize_element(&self.replace_trait)?;
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Action4 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        action4_from_value(&value).map_err(D::Error::custom)
    }
}

fn nat(value: &Value, what: &str) -> Result<usize, String> {
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| format!("{what} is not a natural number"))
}

fn elements<'a>(value: &'a Value, what: &str) -> Result<&'a [Value], String> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| format!("{what} is not an array"))
}

fn tagged_grow(value: &Value, tag: &str) -> Result<(usize, usize), String> {
    let parts = elements(value, "grow action")?;
    if parts.len() != 3 || parts[0].as_str() != Some(tag) {
        return Err(format!("grow action is not a [{tag:?}, i, j] triple"));
    }
    Ok((nat(&parts[1], "species index")?, nat(&parts[2], "card index")?))
}

pub(crate) fn action4_from_value(value: &Value) -> Result<Action4, String> {
    let parts = elements(value, "action4")?;
    if parts.len() != 5 {
        return Err("action4 must have 5 entries".to_string());
    }

    let discard = nat(&parts[0], "discard")?;

    let mut grow_population = Vec::new();
    for gp in elements(&parts[1], "grow-population list")? {
        let (species_index, card_index) = tagged_grow(gp, "population")?;
        grow_population.push(GrowPopulation {
            species_index,
            card_index,
        });
    }

    let mut grow_body = Vec::new();
    for gb in elements(&parts[2], "grow-body list")? {
        let (species_index, card_index) = tagged_grow(gb, "body")?;
        grow_body.push(GrowBody {
            species_index,
            card_index,
        });
    }

    let mut board_transfer = Vec::new();
    for bt in elements(&parts[3], "board-transfer list")? {
        let indices = elements(bt, "board transfer")?;
        if indices.is_empty() || indices.len() > 1 + Species::MAX_TRAITS {
            return Err("board transfer must hold 1 to 4 card indices".to_string());
        }
        let card_index = nat(&indices[0], "board card index")?;
        let trait_card_indices = indices[1..]
            .iter()
            .map(|v| nat(v, "trait card index"))
            .collect::<Result<SmallVec<[usize; 3]>, _>>()?;
        board_transfer.push(BoardTransfer {
            card_index,
            trait_card_indices,
        });
    }

    let mut replace_trait = Vec::new();
    for rt in elements(&parts[4], "replace-trait list")? {
        let triple = elements(rt, "replace trait")?;
        if triple.len() != 3 {
            return Err("replace trait must be a [b, i, j] triple".to_string());
        }
        replace_trait.push(ReplaceTrait {
            species_index: nat(&triple[0], "species index")?,
            trait_slot: nat(&triple[1], "trait slot")?,
            card_index: nat(&triple[2], "card index")?,
        });
    }

    Ok(Action4 {
        discard,
        grow_population,
        grow_body,
        board_transfer,
        replace_trait,
    })
}
