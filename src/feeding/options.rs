//! Enumeration of a player's feeding options and the forced-choice rule.
//!
//! Before asking a decision maker for a feeding, the engine works out
//! whether there is anything to decide. When a player has no options at
//! all the step resolves to [`FeedingChoice::CannotFeed`]; when exactly
//! one option exists it is taken automatically. Only genuinely ambiguous
//! situations reach the decision maker.

use crate::core::Species;
use crate::player::Player;

use super::choice::FeedingChoice;

/// All defender indices on `boards` that `attacker` may attack, honoring
/// positional protections. `exclude` removes the attacker's own slot when
/// scanning its owner's boards.
pub(crate) fn attackable_indices(
    boards: &[Species],
    attacker: &Species,
    exclude: Option<usize>,
) -> Vec<usize> {
    let mut indices = Vec::new();
    for (idx, defender) in boards.iter().enumerate() {
        if Some(idx) == exclude {
            continue;
        }
        let left = idx.checked_sub(1).map(|i| &boards[i]);
        let right = boards.get(idx + 1);
        if defender.is_attackable(attacker, left, right) {
            indices.push(idx);
        }
    }
    indices
}

/// A player's complete feeding options at one point in the feeding step.
///
/// The fat-tissue list carries one entry per storable species, requesting
/// the maximum token count; suboptimal token counts are accepted during
/// validation but do not create extra options here.
#[derive(Clone, Debug, Default)]
pub struct FeedingOptions {
    pub has_hungry: bool,
    pub vegetarian: Vec<FeedingChoice>,
    pub fat_tissue: Vec<FeedingChoice>,
    /// Carnivore attacks on any board in the game, own boards included.
    pub carnivore_any: Vec<FeedingChoice>,
    /// Carnivore attacks restricted to other players' boards.
    pub carnivore_others: Vec<FeedingChoice>,
}

impl FeedingOptions {
    /// Enumerate the options for `player` against the other players'
    /// boards, given in feeding-queue order starting after the player.
    #[must_use]
    pub fn gather(player: &Player, opponents: &[Vec<Species>], watering_hole: u32) -> Self {
        Self {
            has_hungry: player.species.iter().any(Species::is_hungry),
            vegetarian: player.possible_vegetarian_feedings(),
            fat_tissue: player.possible_fat_tissue_feedings(watering_hole, false),
            carnivore_any: player.possible_carnivore_feedings(opponents, true),
            carnivore_others: player.possible_carnivore_feedings(opponents, false),
        }
    }

    /// Whether the player has no way to feed or store anything: no hungry
    /// species at all, or only hungry carnivores without a target, and in
    /// either case no fat capacity left.
    #[must_use]
    pub fn none_available(&self) -> bool {
        let no_feedable = !self.has_hungry
            || (self.vegetarian.is_empty() && self.carnivore_any.is_empty());
        no_feedable && self.fat_tissue.is_empty()
    }

    /// The choice that requires no decision, if there is one.
    ///
    /// A single option of one kind is forced only when no option of any
    /// other kind exists; a carnivore attack is additionally forced only
    /// when the sole target belongs to another player, since a player is
    /// never made to attack itself.
    #[must_use]
    pub fn forced(&self) -> Option<FeedingChoice> {
        if self.none_available() {
            return Some(FeedingChoice::CannotFeed);
        }
        if self.fat_tissue.len() == 1
            && self.vegetarian.is_empty()
            && self.carnivore_any.is_empty()
        {
            return Some(self.fat_tissue[0]);
        }
        if self.vegetarian.len() == 1
            && self.fat_tissue.is_empty()
            && self.carnivore_any.is_empty()
        {
            return Some(self.vegetarian[0]);
        }
        if self.carnivore_others.len() == 1
            && self.carnivore_any.len() == 1
            && self.fat_tissue.is_empty()
            && self.vegetarian.is_empty()
        {
            return Some(self.carnivore_any[0]);
        }
        None
    }
}
