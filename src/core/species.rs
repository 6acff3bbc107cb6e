//! The species board: food, body, population, traits, fat storage.
//!
//! A species is the unit everything else acts on. All trait-conditioned
//! predicates (attackability, hunger, storage) and the primitive mutators
//! (feeding bites, damage, growth) live here; chained effects that cross
//! species boundaries (cooperation, long-neck, scavenging) are driven by
//! the owning `Player`.
//!
//! Wire shape (order-significant pairs):
//!
//! ```text
//! [["food", Nat], ["body", Nat], ["population", Nat], ["traits", [Trait, ...]]]
//! ```
//!
//! with a trailing `["fat-food", Nat]` entry only when the species carries
//! fat-tissue and has stored at least one token.

use serde::de::Error as DeError;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use smallvec::SmallVec;

use super::traits::{Trait, HARD_SHELL_THRESHOLD};

/// Result of one trait-aware feeding attempt on a single species.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeedResult {
    /// Watering-hole tokens consumed.
    pub tokens_used: u32,
    /// Number of bites actually applied (foraging can make this 2).
    pub times_fed: u32,
    /// Whether the species has cooperation; the owner chain-feeds the
    /// right neighbor once per bite when set.
    pub cooperation: bool,
}

/// A species board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Species {
    pub food: u8,
    pub body: u8,
    pub population: u8,
    traits: SmallVec<[Trait; 3]>,
    pub fat_food: u8,
}

impl Species {
    pub const MAX_BODY: u8 = 7;
    pub const MAX_POPULATION: u8 = 7;
    pub const MAX_TRAITS: usize = 3;

    /// Tokens consumed by a single bite.
    pub const BITE_SIZE: u32 = 1;

    /// A fresh board as granted by the dealer: population 1, all else zero.
    #[must_use]
    pub fn new_board() -> Self {
        Self {
            food: 0,
            body: 0,
            population: 1,
            traits: SmallVec::new(),
            fat_food: 0,
        }
    }

    /// Build a species with the given counters and traits.
    ///
    /// Panics if more than [`Self::MAX_TRAITS`] traits are given; callers
    /// are expected to have validated trait counts already.
    #[must_use]
    pub fn with_parts(food: u8, body: u8, population: u8, traits: &[Trait], fat_food: u8) -> Self {
        assert!(
            traits.len() <= Self::MAX_TRAITS,
            "a species can have at most {} traits",
            Self::MAX_TRAITS
        );
        Self {
            food,
            body,
            population,
            traits: SmallVec::from_slice(traits),
            fat_food,
        }
    }

    // === Traits ===

    /// The traits on this board, in slot order.
    #[must_use]
    pub fn traits(&self) -> &[Trait] {
        &self.traits
    }

    #[must_use]
    pub fn has_trait(&self, trait_: Trait) -> bool {
        self.traits.contains(&trait_)
    }

    /// Attach a trait to the next free slot.
    ///
    /// Panics when all slots are occupied; trait counts are validated
    /// before application, so overflow here is an implementation bug.
    pub fn add_trait(&mut self, trait_: Trait) {
        assert!(
            self.traits.len() < Self::MAX_TRAITS,
            "a species can have at most {} traits",
            Self::MAX_TRAITS
        );
        self.traits.push(trait_);
    }

    /// Replace the trait in `slot` with `trait_`. Replacing a fat-tissue
    /// slot discards any stored fat food.
    pub fn replace_trait(&mut self, slot: usize, trait_: Trait) {
        if self.traits[slot] == Trait::FatTissue {
            self.fat_food = 0;
        }
        self.traits[slot] = trait_;
    }

    // === Predicates ===

    #[must_use]
    pub fn is_carnivore(&self) -> bool {
        self.has_trait(Trait::Carnivore)
    }

    #[must_use]
    pub fn is_scavenger(&self) -> bool {
        self.has_trait(Trait::Scavenger)
    }

    #[must_use]
    pub fn is_hungry(&self) -> bool {
        self.population > self.food
    }

    #[must_use]
    pub fn is_extinct(&self) -> bool {
        self.population == 0
    }

    /// Whether more tokens can be stored on the fat-tissue trait.
    #[must_use]
    pub fn can_store_fat_food(&self) -> bool {
        self.has_trait(Trait::FatTissue) && self.fat_food < self.body
    }

    /// Body size when attacking: pack-hunting adds population.
    #[must_use]
    pub fn attacking_body(&self) -> u8 {
        if self.has_trait(Trait::PackHunting) {
            self.body + self.population
        } else {
            self.body
        }
    }

    /// Whether `attacker` may attack this species, given this species'
    /// positional neighbors on its owner's board sequence.
    ///
    /// The defender is protected when any of the following holds:
    /// - a neighbor has warning-call and the attacker lacks ambush
    /// - burrowing with food equal to population
    /// - climbing, unless the attacker also climbs
    /// - hard-shell and the attacker's body advantage is below the threshold
    /// - herding and the attacker's population is not strictly greater
    /// - symbiosis with a right neighbor of strictly greater body
    #[must_use]
    pub fn is_attackable(
        &self,
        attacker: &Species,
        left: Option<&Species>,
        right: Option<&Species>,
    ) -> bool {
        let neighbor_warns = left.is_some_and(|s| s.has_trait(Trait::WarningCall))
            || right.is_some_and(|s| s.has_trait(Trait::WarningCall));
        if neighbor_warns && !attacker.has_trait(Trait::Ambush) {
            return false;
        }
        if self.has_trait(Trait::Burrowing) && self.food == self.population {
            return false;
        }
        if self.has_trait(Trait::Climbing) && !attacker.has_trait(Trait::Climbing) {
            return false;
        }
        if self.has_trait(Trait::HardShell)
            && attacker.attacking_body().saturating_sub(self.body) < HARD_SHELL_THRESHOLD
        {
            return false;
        }
        if self.has_trait(Trait::Herding) && attacker.population <= self.population {
            return false;
        }
        if self.has_trait(Trait::Symbiosis) && right.is_some_and(|s| s.body > self.body) {
            return false;
        }
        true
    }

    // === Growth ===

    pub fn grow_population(&mut self) {
        self.population += 1;
    }

    pub fn grow_body(&mut self) {
        self.body += 1;
    }

    /// Whether population can grow `n` more times without exceeding the cap.
    #[must_use]
    pub fn can_grow_population(&self, n: u8) -> bool {
        self.population + n <= Self::MAX_POPULATION
    }

    /// Whether body can grow `n` more times without exceeding the cap.
    #[must_use]
    pub fn can_grow_body(&self, n: u8) -> bool {
        self.body + n <= Self::MAX_BODY
    }

    // === Feeding ===

    /// Attempt a single bite: consumes one token when the species is
    /// hungry and the hole can supply it. Returns tokens used.
    pub fn feed_one(&mut self, watering_hole: u32) -> u32 {
        if self.is_hungry() && watering_hole >= Self::BITE_SIZE {
            self.food += 1;
            Self::BITE_SIZE
        } else {
            0
        }
    }

    /// Trait-aware feeding: one bite, plus a second for foraging.
    pub fn feed(&mut self, watering_hole: u32) -> FeedResult {
        let mut tokens_used = self.feed_one(watering_hole);
        if self.has_trait(Trait::Foraging) {
            tokens_used += self.feed_one(watering_hole - tokens_used);
        }
        FeedResult {
            tokens_used,
            times_fed: tokens_used / Self::BITE_SIZE,
            cooperation: self.has_trait(Trait::Cooperation),
        }
    }

    /// Store tokens on the fat-tissue trait. The caller must have checked
    /// capacity via [`Self::can_store_fat_food`] and the requested amount.
    pub fn store_fat(&mut self, food_tokens: u8) {
        self.fat_food += food_tokens;
    }

    /// Drain stored fat food toward the current food deficit.
    pub fn move_fat_tissue(&mut self) {
        let need = self.population.saturating_sub(self.food);
        let transfer = self.fat_food.min(need);
        self.food += transfer;
        self.fat_food -= transfer;
    }

    // === Damage / end of turn ===

    /// Remove `damage` population. Food is clamped down to the reduced
    /// population. Returns `(extinct, has_horns)`.
    pub fn hurt(&mut self, damage: u8) -> (bool, bool) {
        self.population = self.population.saturating_sub(damage);
        if self.food > self.population {
            self.food = self.population;
        }
        (self.is_extinct(), self.has_trait(Trait::Horns))
    }

    /// End-of-turn accounting: population clamps down to food; a surviving
    /// species banks its food. Returns `(extinct, banked_food)`; the food
    /// value is meaningless when extinct.
    pub fn end_turn(&mut self) -> (bool, u32) {
        self.population = self.population.min(self.food);
        if self.is_extinct() {
            return (true, 0);
        }
        let banked = u32::from(self.food);
        self.food = 0;
        (false, banked)
    }

    fn serializes_fat_food(&self) -> bool {
        self.has_trait(Trait::FatTissue) && self.fat_food > 0
    }
}

impl Default for Species {
    fn default() -> Self {
        Self::new_board()
    }
}

impl Serialize for Species {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let with_fat = self.serializes_fat_food();
        let len = if with_fat { 5 } else { 4 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&("food", self.food))?;
        seq.serialize_element(&("body", self.body))?;
        seq.serialize_element(&("population", self.population))?;
        seq.serialize_element(&("traits", &self.traits))?;
        if with_fat {
            seq.serialize_element(&("fat-food", self.fat_food))?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Species {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        species_from_value(&value).map_err(D::Error::custom)
    }
}

/// Parse the `[key, value]` pair at `index`, checking the key name.
fn pair<'a>(entries: &'a [Value], index: usize, key: &str) -> Result<&'a Value, String> {
    let entry = entries
        .get(index)
        .and_then(Value::as_array)
        .ok_or_else(|| format!("species entry {index} is not a pair"))?;
    if entry.len() != 2 || entry[0].as_str() != Some(key) {
        return Err(format!("species entry {index} is not a [{key:?}, _] pair"));
    }
    Ok(&entry[1])
}

fn nat_u8(value: &Value, what: &str) -> Result<u8, String> {
    value
        .as_u64()
        .and_then(|n| u8::try_from(n).ok())
        .ok_or_else(|| format!("{what} is not a small natural number"))
}

pub(crate) fn species_from_value(value: &Value) -> Result<Species, String> {
    let entries = value
        .as_array()
        .ok_or_else(|| "species is not an array".to_string())?;
    if entries.len() != 4 && entries.len() != 5 {
        return Err("species must have 4 or 5 entries".to_string());
    }

    let food = nat_u8(pair(entries, 0, "food")?, "food")?;
    let body = nat_u8(pair(entries, 1, "body")?, "body")?;
    let population = nat_u8(pair(entries, 2, "population")?, "population")?;

    let trait_values = pair(entries, 3, "traits")?
        .as_array()
        .ok_or_else(|| "traits is not an array".to_string())?;
    if trait_values.len() > Species::MAX_TRAITS {
        return Err("too many traits".to_string());
    }
    let mut traits = SmallVec::<[Trait; 3]>::new();
    for tv in trait_values {
        let name = tv.as_str().ok_or_else(|| "trait is not a string".to_string())?;
        let trait_ = Trait::from_name(name).ok_or_else(|| format!("unknown trait {name:?}"))?;
        traits.push(trait_);
    }

    let fat_food = if entries.len() == 5 {
        nat_u8(pair(entries, 4, "fat-food")?, "fat-food")?
    } else {
        0
    };

    Ok(Species {
        food,
        body,
        population,
        traits,
        fat_food,
    })
}
