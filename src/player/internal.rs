//! The player as the dealer sees it.
//!
//! A `Player` owns its boards, food bag, and hand, plus the boxed
//! [`DecisionMaker`] that answers for it. All cross-species feeding
//! effects on one player's boards (cooperation chains, scavenging,
//! automatic traits) run here; the dealer only moves tokens between the
//! watering hole and players.
//!
//! Wire shape (order-significant pairs, cards omitted when the hand is
//! empty):
//!
//! ```text
//! [["id", Nat], ["species", [Species, ...]], ["bag", Nat],
//!  ["cards", [TraitCard, ...]]]
//! ```

use serde::de::Error as DeError;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::actions::Action4;
use crate::core::{Deadline, Species, Trait, TraitCard};
use crate::feeding::options::attackable_indices;
use crate::feeding::{FeedingChoice, FeedingOptions};

use super::decision::{deadline_checked, DecisionError, DecisionMaker, PlayerState};
use super::silly::SillyStrategy;

/// One player: boards, bag, hand, and the decision maker behind them.
pub struct Player {
    id: u64,
    pub species: Vec<Species>,
    pub bag: u32,
    pub hand: Vec<TraitCard>,
    external: Box<dyn DecisionMaker>,
}

impl Player {
    /// A fresh player answered by the given decision maker.
    #[must_use]
    pub fn new(id: u64, external: Box<dyn DecisionMaker>) -> Self {
        Self {
            id,
            species: Vec::new(),
            bag: 0,
            hand: Vec::new(),
            external,
        }
    }

    /// A player with explicit state, answered by the built-in strategy.
    #[must_use]
    pub fn from_parts(id: u64, species: Vec<Species>, bag: u32, hand: Vec<TraitCard>) -> Self {
        Self {
            id,
            species,
            bag,
            hand,
            external: Box::<SillyStrategy>::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Final score: banked food plus the population and trait count of
    /// every surviving board.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.bag
            + self
                .species
                .iter()
                .map(|s| u32::from(s.population) + s.traits().len() as u32)
                .sum::<u32>()
    }

    pub fn add_cards(&mut self, cards: Vec<TraitCard>) {
        self.hand.extend(cards);
    }

    /// Append a new board carrying the given traits.
    pub fn add_species(&mut self, traits: &[Trait]) {
        let mut board = Species::new_board();
        for &trait_ in traits {
            board.add_trait(trait_);
        }
        self.species.push(board);
    }

    /// The state snapshot shown to this player's decision maker.
    #[must_use]
    pub fn player_state(&self) -> PlayerState {
        PlayerState {
            species: self.species.clone(),
            bag: self.bag,
            hand: self.hand.clone(),
        }
    }

    // === Decision-maker calls ===

    /// Start a turn: grant a board when the player has none, hand over
    /// the dealt cards, and notify the decision maker.
    pub fn begin_turn(
        &mut self,
        watering_hole: u32,
        cards: Vec<TraitCard>,
        deadline: Deadline,
    ) -> Result<(), DecisionError> {
        if self.species.is_empty() {
            self.species.push(Species::new_board());
        }
        self.add_cards(cards);
        let state = self.player_state();
        let result = self.external.start(watering_hole, &state, deadline);
        deadline_checked(deadline, result)
    }

    /// Ask the decision maker for this turn's action batch. `before` and
    /// `after` hold the boards of the players seated around this one.
    pub fn choose(
        &mut self,
        before: &[Vec<Species>],
        after: &[Vec<Species>],
        deadline: Deadline,
    ) -> Result<Action4, DecisionError> {
        let result = self.external.choose(before, after, deadline);
        deadline_checked(deadline, result)
    }

    /// Determine the next feeding: automatically when at most one option
    /// exists, otherwise by asking the decision maker. `opponents` holds
    /// the other players' boards in queue order starting after this one.
    pub fn feeding_choice(
        &mut self,
        opponents: &[Vec<Species>],
        watering_hole: u32,
        deadline: Deadline,
    ) -> Result<FeedingChoice, DecisionError> {
        let options = FeedingOptions::gather(self, opponents, watering_hole);
        if let Some(choice) = options.forced() {
            return Ok(choice);
        }
        let state = self.player_state();
        let result = self
            .external
            .feed_next(&state, opponents, watering_hole, deadline);
        deadline_checked(deadline, result)
    }

    // === Feeding mechanics ===

    /// Feed the indexed species, chaining cooperation to the right
    /// neighbor once per bite. Returns tokens consumed.
    pub fn feed_species(&mut self, species_index: usize, watering_hole: u32) -> u32 {
        let result = self.species[species_index].feed(watering_hole);
        let mut tokens_used = result.tokens_used;
        if result.cooperation {
            for _ in 0..result.times_fed {
                tokens_used += self.cooperate(species_index, watering_hole - tokens_used);
            }
        }
        tokens_used
    }

    /// One cooperation trigger: feed the right neighbor if there is one.
    pub fn cooperate(&mut self, species_index: usize, watering_hole: u32) -> u32 {
        let right = species_index + 1;
        if right < self.species.len() {
            self.feed_species(right, watering_hole)
        } else {
            0
        }
    }

    pub fn store_fat_tissue(&mut self, species_index: usize, food_tokens: u8) {
        self.species[species_index].store_fat(food_tokens);
    }

    /// Feed every scavenger on this player's boards, left to right.
    /// Returns tokens consumed.
    pub fn scavenge(&mut self, watering_hole: u32) -> u32 {
        let mut taken = 0;
        for idx in 0..self.species.len() {
            if self.species[idx].is_scavenger() {
                taken += self.feed_species(idx, watering_hole - taken);
            }
        }
        taken
    }

    /// Run the automatic traits on every board, left to right: fertile
    /// population growth, long-neck feeding, and fat-food transfer.
    /// Returns tokens consumed.
    pub fn auto_traits(&mut self, watering_hole: u32) -> u32 {
        let mut taken = 0;
        for idx in 0..self.species.len() {
            let board = &mut self.species[idx];
            if board.has_trait(Trait::Fertile) && board.can_grow_population(1) {
                board.grow_population();
            }
            if self.species[idx].has_trait(Trait::LongNeck) {
                taken += self.feed_species(idx, watering_hole - taken);
            }
            self.species[idx].move_fat_tissue();
        }
        taken
    }

    /// Remove `damage` population from the indexed species, removing the
    /// board when it goes extinct. Returns `(extinct, has_horns)`.
    pub fn hurt_species(&mut self, species_index: usize, damage: u8) -> (bool, bool) {
        let (extinct, horns) = self.species[species_index].hurt(damage);
        if extinct {
            self.species.remove(species_index);
        }
        (extinct, horns)
    }

    /// Remove the cards at the given indices from the hand. Indices must
    /// be unique and in range.
    pub fn remove_cards(&mut self, indices: &[usize]) {
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        for idx in sorted {
            self.hand.remove(idx);
        }
    }

    /// End-of-turn accounting: survivors bank their food, extinct boards
    /// are removed. Returns the number of extinctions.
    pub fn end_turn(&mut self) -> usize {
        let mut extinct_indices = Vec::new();
        for (idx, board) in self.species.iter_mut().enumerate() {
            let (extinct, banked) = board.end_turn();
            if extinct {
                extinct_indices.push(idx);
            } else {
                self.bag += banked;
            }
        }
        for idx in extinct_indices.iter().rev() {
            self.species.remove(*idx);
        }
        extinct_indices.len()
    }

    // === Feeding-option enumeration ===

    /// All feedable hungry vegetarian boards.
    #[must_use]
    pub fn possible_vegetarian_feedings(&self) -> Vec<FeedingChoice> {
        self.species
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_carnivore() && s.is_hungry())
            .map(|(species_index, _)| FeedingChoice::Vegetarian { species_index })
            .collect()
    }

    /// All fat-tissue storage requests. Without `include_suboptimal` one
    /// maximum-token entry per storable board; with it, every legal token
    /// count.
    #[must_use]
    pub fn possible_fat_tissue_feedings(
        &self,
        watering_hole: u32,
        include_suboptimal: bool,
    ) -> Vec<FeedingChoice> {
        let mut feedings = Vec::new();
        for (species_index, board) in self.species.iter().enumerate() {
            if !board.can_store_fat_food() {
                continue;
            }
            let capacity = u32::from(board.body - board.fat_food);
            let max_tokens = capacity.min(watering_hole) as u8;
            if include_suboptimal {
                feedings.extend((1..=max_tokens).map(|food_tokens| FeedingChoice::FatTissue {
                    species_index,
                    food_tokens,
                }));
            } else {
                feedings.push(FeedingChoice::FatTissue {
                    species_index,
                    food_tokens: max_tokens,
                });
            }
        }
        feedings
    }

    /// All legal carnivore attacks against the given opponent boards,
    /// optionally including this player's own boards as the final target
    /// slot (a board can never attack itself).
    #[must_use]
    pub fn possible_carnivore_feedings(
        &self,
        opponents: &[Vec<Species>],
        include_self: bool,
    ) -> Vec<FeedingChoice> {
        let mut feedings = Vec::new();
        for (species_index, attacker) in self.species.iter().enumerate() {
            if !(attacker.is_carnivore() && attacker.is_hungry()) {
                continue;
            }
            for (player_index, boards) in opponents.iter().enumerate() {
                for defender_index in attackable_indices(boards, attacker, None) {
                    feedings.push(FeedingChoice::Carnivore {
                        species_index,
                        player_index,
                        defender_index,
                    });
                }
            }
            if include_self {
                let player_index = opponents.len();
                for defender_index in
                    attackable_indices(&self.species, attacker, Some(species_index))
                {
                    feedings.push(FeedingChoice::Carnivore {
                        species_index,
                        player_index,
                        defender_index,
                    });
                }
            }
        }
        feedings
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("species", &self.species)
            .field("bag", &self.bag)
            .field("hand", &self.hand)
            .finish_non_exhaustive()
    }
}

/// State comparison only; the decision maker does not take part.
impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.species == other.species
            && self.bag == other.bag
            && self.hand == other.hand
    }
}

impl Eq for Player {}

impl Serialize for Player {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.hand.is_empty() { 3 } else { 4 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&("id", self.id))?;
        seq.serialize_element(&("species", &self.species))?;
        seq.serialize_element(&("bag", self.bag))?;
        if !self.hand.is_empty() {
            seq.serialize_element(&("cards", &self.hand))?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Player {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        player_from_value(&value).map_err(D::Error::custom)
    }
}

fn pair<'a>(entries: &'a [Value], index: usize, key: &str) -> Result<&'a Value, String> {
    let entry = entries
        .get(index)
        .and_then(Value::as_array)
        .ok_or_else(|| format!("player entry {index} is not a pair"))?;
    if entry.len() != 2 || entry[0].as_str() != Some(key) {
        return Err(format!("player entry {index} is not a [{key:?}, _] pair"));
    }
    Ok(&entry[1])
}

/// Parse a player from its wire shape. Deserialized players answer with
/// the built-in strategy until a decision maker is attached.
pub(crate) fn player_from_value(value: &Value) -> Result<Player, String> {
    let entries = value
        .as_array()
        .ok_or_else(|| "player is not an array".to_string())?;
    if entries.len() != 3 && entries.len() != 4 {
        return Err("player must have 3 or 4 entries".to_string());
    }

    let id = pair(entries, 0, "id")?
        .as_u64()
        .ok_or_else(|| "player id is not a natural number".to_string())?;

    let species = pair(entries, 1, "species")?
        .as_array()
        .ok_or_else(|| "player species is not an array".to_string())?
        .iter()
        .map(crate::core::species::species_from_value)
        .collect::<Result<Vec<_>, _>>()?;

    let bag = pair(entries, 2, "bag")?
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| "player bag is not a natural number".to_string())?;

    let hand = if entries.len() == 4 {
        serde_json::from_value::<Vec<TraitCard>>(pair(entries, 3, "cards")?.clone())
            .map_err(|e| format!("player cards: {e}"))?
    } else {
        Vec::new()
    };

    Ok(Player::from_parts(id, species, bag, hand))
}
