//! Feeding-loop scenarios driven through the public harness entry point.
//!
//! Each test sets up an explicit game state, runs the feeding step, and
//! checks tokens, populations, and the active-ring bookkeeping.

use evolution_engine::{
    Action4, Deadline, Dealer, DecisionError, DecisionMaker, FeedingChoice, Player, PlayerState,
    Species, Trait,
};

/// Replays a fixed list of feeding choices, then declines.
struct Scripted {
    feeds: Vec<FeedingChoice>,
}

impl Scripted {
    fn new(feeds: Vec<FeedingChoice>) -> Box<Self> {
        Box::new(Self { feeds })
    }
}

impl DecisionMaker for Scripted {
    fn start(
        &mut self,
        _watering_hole: u32,
        _state: &PlayerState,
        _deadline: Deadline,
    ) -> Result<(), DecisionError> {
        Ok(())
    }

    fn choose(
        &mut self,
        _before: &[Vec<Species>],
        _after: &[Vec<Species>],
        _deadline: Deadline,
    ) -> Result<Action4, DecisionError> {
        Err(DecisionError::Fault("feeding-only script".to_string()))
    }

    fn feed_next(
        &mut self,
        _state: &PlayerState,
        _opponents: &[Vec<Species>],
        _watering_hole: u32,
        _deadline: Deadline,
    ) -> Result<FeedingChoice, DecisionError> {
        if self.feeds.is_empty() {
            Ok(FeedingChoice::NoFeeding)
        } else {
            Ok(self.feeds.remove(0))
        }
    }
}

fn species(food: u8, body: u8, population: u8, traits: &[Trait]) -> Species {
    Species::with_parts(food, body, population, traits, 0)
}

fn player(id: u64, boards: Vec<Species>, feeds: Vec<FeedingChoice>) -> Player {
    let mut player = Player::new(id, Scripted::new(feeds));
    player.species = boards;
    player
}

#[test]
fn test_hard_shell_blocks_small_attackers() {
    // The only potential meal is behind a hard shell and the attacker's
    // body advantage is below the threshold: nobody can feed and the
    // hole is untouched.
    let players = vec![
        player(1, vec![species(0, 4, 2, &[Trait::Carnivore])], vec![]),
        player(2, vec![species(1, 1, 1, &[Trait::HardShell])], vec![]),
        player(3, vec![], vec![]),
    ];
    let mut dealer = Dealer::with_state(players, 8, vec![]);
    dealer.feeding_step();

    assert_eq!(dealer.watering_hole(), 8);
    assert_eq!(dealer.players()[0].species[0].food, 0);
    assert_eq!(dealer.players()[1].species[0].population, 1);
    assert_eq!(dealer.players().len(), 3);
}

#[test]
fn test_horned_defender_strikes_back() {
    // One token at the hole: the defender loses a population, the horns
    // cost the attacker one, and the surviving attacker takes the token.
    let attack = FeedingChoice::Carnivore {
        species_index: 0,
        player_index: 0,
        defender_index: 0,
    };
    let players = vec![
        player(1, vec![species(0, 6, 3, &[Trait::Carnivore])], vec![attack]),
        player(2, vec![species(2, 1, 2, &[Trait::Horns])], vec![]),
        player(3, vec![species(1, 1, 1, &[])], vec![]),
    ];
    let mut dealer = Dealer::with_state(players, 1, vec![]);
    dealer.feeding_step();

    let attacker = &dealer.players()[0].species[0];
    assert_eq!(attacker.population, 2);
    assert_eq!(attacker.food, 1);
    let defender = &dealer.players()[1].species[0];
    assert_eq!(defender.population, 1);
    assert_eq!(dealer.watering_hole(), 0);
}

#[test]
fn test_horns_killing_the_attacker_denies_the_meal() {
    let attack = FeedingChoice::Carnivore {
        species_index: 0,
        player_index: 0,
        defender_index: 0,
    };
    let players = vec![
        player(1, vec![species(0, 6, 1, &[Trait::Carnivore])], vec![attack]),
        player(2, vec![species(2, 1, 2, &[Trait::Horns])], vec![]),
        player(3, vec![species(1, 1, 1, &[])], vec![]),
    ];
    let mut dealer = Dealer::with_state(players, 5, vec![]);
    dealer.feeding_step();

    // The attacker went extinct to the horns; no feeding, no scavenging.
    assert!(dealer.players()[0].species.is_empty());
    assert_eq!(dealer.players()[1].species[0].population, 1);
    assert_eq!(dealer.watering_hole(), 5);
}

#[test]
fn test_declining_player_still_scavenges() {
    // Player 1 bows out of feeding but owns a scavenger; when player 2's
    // carnivore eats later, the scavenger collects anyway.
    let attack = FeedingChoice::Carnivore {
        species_index: 0,
        player_index: 0,
        defender_index: 0,
    };
    let players = vec![
        player(
            1,
            vec![
                species(0, 1, 2, &[Trait::Scavenger]),
                species(0, 1, 2, &[]),
            ],
            vec![FeedingChoice::NoFeeding],
        ),
        player(
            2,
            vec![species(0, 6, 2, &[Trait::Carnivore])],
            vec![attack, FeedingChoice::NoFeeding],
        ),
        player(3, vec![species(0, 1, 2, &[])], vec![]),
    ];
    let mut dealer = Dealer::with_state(players, 10, vec![]);
    dealer.feeding_step();

    // Scavenger fed despite its owner having left the feeding ring.
    assert_eq!(dealer.players()[0].species[0].food, 1);
    // The declined vegetarian did not feed.
    assert_eq!(dealer.players()[0].species[1].food, 0);
    assert_eq!(dealer.players()[1].species[0].food, 1);
    assert_eq!(dealer.players().len(), 3);
}

#[test]
fn test_fat_storage_is_charged_to_the_hole() {
    let players = vec![
        player(
            1,
            vec![Species::with_parts(2, 5, 2, &[Trait::FatTissue], 1)],
            vec![],
        ),
        player(2, vec![species(1, 1, 1, &[])], vec![]),
        player(3, vec![], vec![]),
    ];
    let mut dealer = Dealer::with_state(players, 3, vec![]);
    dealer.feeding_step();

    // Forced: the fat board is the only option, filled to min(hole, need).
    let board = &dealer.players()[0].species[0];
    assert_eq!(board.fat_food, 4);
    assert_eq!(dealer.watering_hole(), 0);
}

#[test]
fn test_false_cannot_feed_claim_removes_player() {
    // Player 1 claims it cannot feed while a vegetarian is hungry.
    let players = vec![
        player(
            1,
            vec![species(0, 1, 2, &[]), species(0, 1, 2, &[])],
            vec![FeedingChoice::CannotFeed],
        ),
        player(2, vec![species(1, 1, 1, &[])], vec![]),
        player(3, vec![species(1, 1, 1, &[])], vec![]),
    ];
    let mut dealer = Dealer::with_state(players, 10, vec![]);
    dealer.feeding_step();

    let ids: Vec<u64> = dealer.players().iter().map(Player::id).collect();
    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn test_warning_call_neighbor_blocks_all_but_ambush() {
    let attack = FeedingChoice::Carnivore {
        species_index: 0,
        player_index: 0,
        defender_index: 1,
    };
    let guarded = vec![
        species(1, 1, 1, &[Trait::WarningCall]),
        species(0, 1, 2, &[]),
    ];
    // Without ambush the guarded board is not a legal target, so the
    // scripted attack is invalid and the player is removed. Player 3's
    // open board keeps the choice unforced.
    let players = vec![
        player(1, vec![species(0, 6, 2, &[Trait::Carnivore])], vec![attack]),
        player(2, guarded.clone(), vec![]),
        player(3, vec![species(0, 1, 2, &[])], vec![]),
    ];
    let mut dealer = Dealer::with_state(players, 10, vec![]);
    dealer.feeding_step();
    assert!(dealer.players().iter().all(|p| p.id() != 1));

    // With ambush the same attack goes through.
    let players = vec![
        player(
            1,
            vec![species(0, 6, 2, &[Trait::Carnivore, Trait::Ambush])],
            vec![attack, FeedingChoice::NoFeeding],
        ),
        player(2, guarded, vec![]),
        player(3, vec![species(0, 1, 2, &[])], vec![]),
    ];
    let mut dealer = Dealer::with_state(players, 10, vec![]);
    dealer.feeding_step();
    assert!(dealer.players().iter().any(|p| p.id() == 1));
    assert_eq!(dealer.players()[1].species[1].population, 1);
}

#[test]
fn test_cooperation_chain_runs_through_the_dealer() {
    let players = vec![
        player(
            1,
            vec![
                species(0, 1, 2, &[Trait::Cooperation]),
                species(0, 1, 2, &[Trait::Cooperation]),
                species(0, 1, 2, &[]),
            ],
            vec![
                FeedingChoice::Vegetarian { species_index: 0 },
                FeedingChoice::NoFeeding,
            ],
        ),
        player(2, vec![species(1, 1, 1, &[])], vec![]),
        player(3, vec![species(1, 1, 1, &[])], vec![]),
    ];
    let mut dealer = Dealer::with_state(players, 10, vec![]);
    dealer.feeding_step();

    let boards = &dealer.players()[0].species;
    assert_eq!(boards[0].food, 1);
    assert_eq!(boards[1].food, 1);
    assert_eq!(boards[2].food, 1);
    assert_eq!(dealer.watering_hole(), 7);
}

#[test]
fn test_feeding_order_rotates_between_players() {
    // Two hungry boards per player and a hole that drains mid-round:
    // tokens are handed out one bite at a time in ring order, so the
    // first players in the ring end up ahead by at most one token.
    let boards = || vec![species(0, 1, 1, &[]), species(0, 1, 1, &[])];
    let players = vec![
        player(
            1,
            boards(),
            vec![
                FeedingChoice::Vegetarian { species_index: 0 },
                FeedingChoice::Vegetarian { species_index: 1 },
            ],
        ),
        player(
            2,
            boards(),
            vec![
                FeedingChoice::Vegetarian { species_index: 0 },
                FeedingChoice::Vegetarian { species_index: 1 },
            ],
        ),
        player(
            3,
            boards(),
            vec![
                FeedingChoice::Vegetarian { species_index: 0 },
                FeedingChoice::Vegetarian { species_index: 1 },
            ],
        ),
    ];
    let mut dealer = Dealer::with_state(players, 4, vec![]);
    dealer.feeding_step();

    assert_eq!(dealer.watering_hole(), 0);
    let fed: Vec<u8> = dealer
        .players()
        .iter()
        .map(|p| p.species.iter().map(|s| s.food).sum())
        .collect();
    assert_eq!(fed, vec![2, 1, 1]);
}
