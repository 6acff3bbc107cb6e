//! The four card-driven action kinds composed into an [`Action4`] batch.
//!
//! Wire shapes:
//!
//! - GrowPopulation: `["population", species, card]`
//! - GrowBody: `["body", species, card]`
//! - BoardTransfer: `[card, trait_card...]` (up to 3 trait cards)
//! - ReplaceTrait: `[species, slot, card]`
//!
//! [`Action4`]: super::Action4

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use smallvec::SmallVec;

use crate::core::Trait;
use crate::player::Player;

/// Trade one card for a population growth of one species board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowPopulation {
    pub species_index: usize,
    pub card_index: usize,
}

impl GrowPopulation {
    pub(crate) fn apply(&self, player: &mut Player) {
        player.species[self.species_index].grow_population();
    }
}

impl Serialize for GrowPopulation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ("population", self.species_index, self.card_index).serialize(serializer)
    }
}

/// Trade one card for a body growth of one species board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowBody {
    pub species_index: usize,
    pub card_index: usize,
}

impl GrowBody {
    pub(crate) fn apply(&self, player: &mut Player) {
        player.species[self.species_index].grow_body();
    }
}

impl Serialize for GrowBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ("body", self.species_index, self.card_index).serialize(serializer)
    }
}

/// Pay one card for a new species board, with up to three further cards
/// attached as its traits. New boards append to the right of the owner's
/// board sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardTransfer {
    pub card_index: usize,
    pub trait_card_indices: SmallVec<[usize; 3]>,
}

impl BoardTransfer {
    /// The traits the new board will carry, looked up in the hand.
    #[must_use]
    pub fn traits(&self, player: &Player) -> SmallVec<[Trait; 3]> {
        self.trait_card_indices
            .iter()
            .map(|&idx| player.hand[idx].trait_)
            .collect()
    }

    pub(crate) fn apply(&self, player: &mut Player) {
        let traits = self.traits(player);
        player.add_species(&traits);
    }
}

impl Serialize for BoardTransfer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(1 + self.trait_card_indices.len()))?;
        seq.serialize_element(&self.card_index)?;
        for idx in &self.trait_card_indices {
            seq.serialize_element(idx)?;
        }
        seq.end()
    }
}

/// Replace the trait in a given slot of a species board with a card's
/// trait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplaceTrait {
    pub species_index: usize,
    pub trait_slot: usize,
    pub card_index: usize,
}

impl ReplaceTrait {
    pub(crate) fn apply(&self, player: &mut Player) {
        let trait_ = player.hand[self.card_index].trait_;
        player.species[self.species_index].replace_trait(self.trait_slot, trait_);
    }
}

impl Serialize for ReplaceTrait {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.species_index, self.trait_slot, self.card_index).serialize(serializer)
    }
}
