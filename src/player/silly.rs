//! The built-in baseline strategy.
//!
//! Deterministic and simple on purpose: it spends cards in ascending
//! card order and always feeds the neediest or largest board. It is the
//! default decision maker for players created without one, and the
//! reference opponent in tests.

use smallvec::smallvec;

use crate::actions::{Action4, BoardTransfer, GrowBody, GrowPopulation, ReplaceTrait};
use crate::core::{Deadline, Species};
use crate::feeding::options::attackable_indices;
use crate::feeding::FeedingChoice;

use super::decision::{DecisionError, DecisionMaker, PlayerState};

/// Orders species by population, then food, then body.
fn size_key(species: &Species) -> (u8, u8, u8) {
    (species.population, species.food, species.body)
}

/// First index whose key is maximal under `key`, or `None` when the
/// iterator is empty. Ties go to the earliest index.
fn argmax_first<K: Ord>(
    indices: impl Iterator<Item = usize>,
    mut key: impl FnMut(usize) -> K,
) -> Option<usize> {
    let mut best: Option<(usize, K)> = None;
    for idx in indices {
        let k = key(idx);
        match &best {
            Some((_, best_k)) if k <= *best_k => {}
            _ => best = Some((idx, k)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// A strategy that plays legally but without judgment.
#[derive(Debug, Default)]
pub struct SillyStrategy {
    state: PlayerState,
}

impl SillyStrategy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn hungry_carnivores(&self) -> Vec<usize> {
        self.state
            .species
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_carnivore() && s.is_hungry())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Hungry carnivores with at least one legal target among `boards`,
    /// where `own_boards` marks that the boards are the strategy's own.
    fn carnivores_with_targets(&self, boards: &[Vec<Species>], own_boards: bool) -> Vec<usize> {
        self.hungry_carnivores()
            .into_iter()
            .filter(|&attacker_idx| {
                let attacker = &self.state.species[attacker_idx];
                boards.iter().any(|b| {
                    let exclude = own_boards.then_some(attacker_idx);
                    !attackable_indices(b, attacker, exclude).is_empty()
                })
            })
            .collect()
    }

    fn store_fat(&self, watering_hole: u32, candidates: &[usize]) -> FeedingChoice {
        let fat_need =
            |idx: usize| self.state.species[idx].body - self.state.species[idx].fat_food;
        let best = argmax_first(candidates.iter().copied(), |idx| {
            (fat_need(idx), size_key(&self.state.species[idx]))
        });
        // candidates is non-empty here
        let species_index = best.unwrap_or(0);
        let food_tokens = u32::from(fat_need(species_index)).min(watering_hole) as u8;
        FeedingChoice::FatTissue {
            species_index,
            food_tokens,
        }
    }

    fn attack(&self, opponents: &[Vec<Species>], attackers: &[usize]) -> FeedingChoice {
        let species_index = argmax_first(attackers.iter().copied(), |idx| {
            size_key(&self.state.species[idx])
        })
        .unwrap_or(0);
        let attacker = &self.state.species[species_index];

        // The largest attackable board of each opponent, then the largest
        // of those; earlier opponents win ties.
        let mut best: Option<(usize, usize, (u8, u8, u8))> = None;
        for (player_index, boards) in opponents.iter().enumerate() {
            let targets = attackable_indices(boards, attacker, None);
            let Some(largest) = argmax_first(targets.into_iter(), |idx| size_key(&boards[idx]))
            else {
                continue;
            };
            let k = size_key(&boards[largest]);
            match &best {
                Some((_, _, best_k)) if k <= *best_k => {}
                _ => best = Some((player_index, largest, k)),
            }
        }

        match best {
            Some((player_index, largest, _)) => {
                // Leftmost board equal to the chosen target, whether or
                // not that particular board is the attackable one.
                let chosen = opponents[player_index][largest].clone();
                let defender_index = opponents[player_index]
                    .iter()
                    .position(|s| *s == chosen)
                    .unwrap_or(largest);
                FeedingChoice::Carnivore {
                    species_index,
                    player_index,
                    defender_index,
                }
            }
            None => FeedingChoice::CannotFeed,
        }
    }
}

impl DecisionMaker for SillyStrategy {
    fn start(
        &mut self,
        _watering_hole: u32,
        state: &PlayerState,
        _deadline: Deadline,
    ) -> Result<(), DecisionError> {
        self.state = state.clone();
        Ok(())
    }

    /// Spend the hand in ascending card order: the smallest card goes to
    /// the watering hole, the next two buy a board with one trait, and
    /// any remaining cards grow and then re-trait that board.
    fn choose(
        &mut self,
        _before: &[Vec<Species>],
        _after: &[Vec<Species>],
        _deadline: Deadline,
    ) -> Result<Action4, DecisionError> {
        let hand = &self.state.hand;
        let mut order: Vec<usize> = (0..hand.len()).collect();
        order.sort_by_key(|&i| hand[i]);

        if order.len() < 3 {
            return Err(DecisionError::Fault(
                "not enough cards to choose actions".to_string(),
            ));
        }

        let new_species_index = self.state.species.len();
        let mut batch = Action4 {
            discard: order[0],
            board_transfer: vec![BoardTransfer {
                card_index: order[1],
                trait_card_indices: smallvec![order[2]],
            }],
            ..Action4::default()
        };

        let mut rest = order[3..].iter().copied();
        if let Some(card_index) = rest.next() {
            batch.grow_population.push(GrowPopulation {
                species_index: new_species_index,
                card_index,
            });
        }
        if let Some(card_index) = rest.next() {
            batch.grow_body.push(GrowBody {
                species_index: new_species_index,
                card_index,
            });
        }
        if let Some(card_index) = rest.next() {
            batch.replace_trait.push(ReplaceTrait {
                species_index: new_species_index,
                trait_slot: 0,
                card_index,
            });
        }

        Ok(batch)
    }

    /// Preference order: fill the neediest fat-tissue board, feed the
    /// largest hungry vegetarian, attack the largest target with the
    /// largest carnivore, decline if only own boards can be attacked.
    fn feed_next(
        &mut self,
        state: &PlayerState,
        opponents: &[Vec<Species>],
        watering_hole: u32,
        _deadline: Deadline,
    ) -> Result<FeedingChoice, DecisionError> {
        self.state = state.clone();

        let fat_candidates: Vec<usize> = self
            .state
            .species
            .iter()
            .enumerate()
            .filter(|(_, s)| s.can_store_fat_food())
            .map(|(idx, _)| idx)
            .collect();
        if !fat_candidates.is_empty() {
            return Ok(self.store_fat(watering_hole, &fat_candidates));
        }

        let hungry_vegetarians: Vec<usize> = self
            .state
            .species
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_hungry() && !s.is_carnivore())
            .map(|(idx, _)| idx)
            .collect();
        if let Some(species_index) =
            argmax_first(hungry_vegetarians.into_iter(), |idx| {
                size_key(&self.state.species[idx])
            })
        {
            return Ok(FeedingChoice::Vegetarian { species_index });
        }

        let attackers = self.carnivores_with_targets(opponents, false);
        if !attackers.is_empty() {
            return Ok(self.attack(opponents, &attackers));
        }

        let own = [self.state.species.clone()];
        if !self.carnivores_with_targets(&own, true).is_empty() {
            return Ok(FeedingChoice::NoFeeding);
        }

        Ok(FeedingChoice::CannotFeed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Trait, TraitCard};

    fn species(food: u8, body: u8, population: u8, traits: &[Trait]) -> Species {
        Species::with_parts(food, body, population, traits, 0)
    }

    fn strategy_with(boards: Vec<Species>, hand: Vec<TraitCard>) -> SillyStrategy {
        let mut strategy = SillyStrategy::new();
        let state = PlayerState {
            species: boards,
            bag: 0,
            hand,
        };
        strategy
            .start(0, &state, Deadline::standard())
            .expect("start never fails");
        strategy
    }

    fn feed(
        strategy: &mut SillyStrategy,
        opponents: &[Vec<Species>],
        watering_hole: u32,
    ) -> FeedingChoice {
        let state = strategy.state.clone();
        strategy
            .feed_next(&state, opponents, watering_hole, Deadline::standard())
            .expect("silly strategy never fails to feed")
    }

    #[test]
    fn test_choose_spends_cards_in_ascending_order() {
        let mut strategy = strategy_with(
            vec![Species::new_board()],
            vec![
                TraitCard::new(3, Trait::Horns),      // 0: largest, spent last
                TraitCard::new(-3, Trait::Ambush),    // 1: smallest, discarded
                TraitCard::new(0, Trait::Climbing),   // 2
                TraitCard::new(1, Trait::Fertile),    // 3
                TraitCard::new(2, Trait::Foraging),   // 4
                TraitCard::new(-2, Trait::Burrowing), // 5
            ],
        );
        let batch = strategy
            .choose(&[], &[], Deadline::standard())
            .expect("enough cards");

        assert_eq!(batch.discard, 1);
        assert_eq!(batch.board_transfer.len(), 1);
        assert_eq!(batch.board_transfer[0].card_index, 5);
        assert_eq!(batch.board_transfer[0].trait_card_indices.as_slice(), &[2]);
        assert_eq!(
            batch.grow_population,
            vec![GrowPopulation {
                species_index: 1,
                card_index: 3
            }]
        );
        assert_eq!(
            batch.grow_body,
            vec![GrowBody {
                species_index: 1,
                card_index: 4
            }]
        );
        assert_eq!(
            batch.replace_trait,
            vec![ReplaceTrait {
                species_index: 1,
                trait_slot: 0,
                card_index: 0
            }]
        );
    }

    #[test]
    fn test_choose_minimal_hand_only_discards_and_transfers() {
        let mut strategy = strategy_with(
            vec![],
            vec![
                TraitCard::new(0, Trait::Ambush),
                TraitCard::new(1, Trait::Horns),
                TraitCard::new(2, Trait::Climbing),
            ],
        );
        let batch = strategy.choose(&[], &[], Deadline::standard()).unwrap();
        assert_eq!(batch.discard, 0);
        assert!(batch.grow_population.is_empty());
        assert!(batch.grow_body.is_empty());
        assert!(batch.replace_trait.is_empty());
    }

    #[test]
    fn test_choose_with_too_few_cards_faults() {
        let mut strategy = strategy_with(vec![], vec![TraitCard::new(0, Trait::Ambush)]);
        assert!(matches!(
            strategy.choose(&[], &[], Deadline::standard()),
            Err(DecisionError::Fault(_))
        ));
    }

    #[test]
    fn test_feed_prefers_fat_storage() {
        let mut strategy = strategy_with(
            vec![
                species(0, 1, 2, &[]),
                Species::with_parts(0, 5, 2, &[Trait::FatTissue], 1),
            ],
            vec![],
        );
        assert_eq!(
            feed(&mut strategy, &[], 3),
            FeedingChoice::FatTissue {
                species_index: 1,
                food_tokens: 3
            }
        );
    }

    #[test]
    fn test_feed_fat_picks_greatest_need() {
        let mut strategy = strategy_with(
            vec![
                Species::with_parts(0, 3, 2, &[Trait::FatTissue], 2),
                Species::with_parts(0, 6, 2, &[Trait::FatTissue], 1),
            ],
            vec![],
        );
        assert_eq!(
            feed(&mut strategy, &[], 10),
            FeedingChoice::FatTissue {
                species_index: 1,
                food_tokens: 5
            }
        );
    }

    #[test]
    fn test_feed_largest_vegetarian() {
        let mut strategy = strategy_with(
            vec![species(0, 1, 2, &[]), species(0, 1, 5, &[])],
            vec![],
        );
        assert_eq!(
            feed(&mut strategy, &[], 5),
            FeedingChoice::Vegetarian { species_index: 1 }
        );
    }

    #[test]
    fn test_feed_carnivore_attacks_largest_target() {
        let mut strategy =
            strategy_with(vec![species(0, 6, 4, &[Trait::Carnivore])], vec![]);
        let opponents = vec![
            vec![species(0, 1, 2, &[])],
            vec![species(0, 1, 3, &[]), species(0, 1, 1, &[])],
        ];
        assert_eq!(
            feed(&mut strategy, &opponents, 5),
            FeedingChoice::Carnivore {
                species_index: 0,
                player_index: 1,
                defender_index: 0
            }
        );
    }

    #[test]
    fn test_feed_declines_when_only_own_boards_attackable() {
        let mut strategy = strategy_with(
            vec![species(0, 6, 4, &[Trait::Carnivore]), species(2, 1, 2, &[])],
            vec![],
        );
        let opponents = vec![vec![species(0, 1, 2, &[Trait::Climbing])]];
        assert_eq!(feed(&mut strategy, &opponents, 5), FeedingChoice::NoFeeding);
    }

    #[test]
    fn test_feed_cannot_feed_without_any_option() {
        let mut strategy = strategy_with(vec![species(2, 1, 2, &[])], vec![]);
        assert_eq!(feed(&mut strategy, &[], 5), FeedingChoice::CannotFeed);
    }
}
