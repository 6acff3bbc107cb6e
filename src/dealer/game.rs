//! The dealer: turn structure, the feeding loop, and game termination.
//!
//! The dealer is the authority on every token and card. Players are
//! untrusted: any errored, late, or invalid reply removes the player
//! from the game on the spot, and play continues for the rest.
//!
//! A turn runs deal, choose, apply-actions, automatic traits, the
//! feeding loop, and end-of-turn accounting; afterwards the seating
//! order rotates left by one. The game ends when the deck can no longer
//! cover a full deal or no players remain.
//!
//! Wire shape (a Configuration): `[[Player+, ...], Natural, [TraitCard, ...]]`.

use std::collections::VecDeque;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, warn};

use crate::actions::Action4;
use crate::core::{full_deck, Deadline, GameRng, Species, TraitCard, HORNS_DAMAGE};
use crate::feeding::FeedingChoice;
use crate::player::{DecisionMaker, Player};

use super::config::{ConfigError, MAX_PLAYERS};

/// Population lost by a successfully attacked species.
pub const CARNIVORE_ATTACK_DAMAGE: u8 = 1;
/// Cards paid to the owner of a species that goes extinct.
pub const EXTINCT_SPECIES_PAYOUT: usize = 2;
/// Cards dealt to every player at the start of a turn.
pub const CARDS_PER_TURN: usize = 3;
/// Extra cards dealt per species board (at least one board counts).
pub const CARDS_PER_SPECIES: usize = 1;

/// The game state and the engine driving it.
pub struct Dealer {
    players: Vec<Player>,
    watering_hole: u32,
    deck: Vec<TraitCard>,
    /// Players still feeding this turn, front is next to act. Holds
    /// stable player ids so removals elsewhere cannot skew the ring.
    active: VecDeque<u64>,
}

impl Dealer {
    /// An empty game with no players, tokens, or cards.
    #[must_use]
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
            watering_hole: 0,
            deck: Vec::new(),
            active: VecDeque::new(),
        }
    }

    /// A game with explicit state, players in seating order.
    #[must_use]
    pub fn with_state(players: Vec<Player>, watering_hole: u32, deck: Vec<TraitCard>) -> Self {
        Self {
            players,
            watering_hole,
            deck,
            active: VecDeque::new(),
        }
    }

    /// Seat a new player answered by the given decision maker. Returns
    /// the assigned player id.
    pub fn register(&mut self, external: Box<dyn DecisionMaker>) -> Result<u64, ConfigError> {
        if self.players.len() >= MAX_PLAYERS {
            return Err(ConfigError::TooManyPlayers {
                count: self.players.len() + 1,
            });
        }
        let id = self.players.len() as u64 + 1;
        self.players.push(Player::new(id, external));
        Ok(id)
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn watering_hole(&self) -> u32 {
        self.watering_hole
    }

    #[must_use]
    pub fn deck(&self) -> &[TraitCard] {
        &self.deck
    }

    /// Play a full game with the deterministic sorted deck. Turns repeat
    /// while the deck covers a complete deal; the seating order rotates
    /// left after every turn. Seat limits bind at registration, so any
    /// player list (a deserialized configuration included) is simulated
    /// as given.
    pub fn run_game(&mut self) {
        let mut deck = full_deck();
        deck.sort_unstable();
        self.run_with_deck(deck);
    }

    /// Play a full game with a seed-shuffled deck. The same seed and
    /// players replay the same game.
    pub fn run_game_shuffled(&mut self, seed: u64) {
        let mut deck = full_deck();
        deck.sort_unstable();
        let mut rng = GameRng::new(seed);
        rng.shuffle(&mut deck);
        self.run_with_deck(deck);
    }

    fn run_with_deck(&mut self, deck: Vec<TraitCard>) {
        self.deck = deck;

        while self.cards_needed() <= self.deck.len() {
            self.take_turn();
            if self.players.is_empty() {
                break;
            }
            self.players.rotate_left(1);
        }
        debug!(remaining_players = self.players.len(), "game over");
    }

    /// Cards a full deal would consume for the current players.
    #[must_use]
    pub fn cards_needed(&self) -> usize {
        self.players.iter().map(|p| Self::cards_to_deal(p)).sum()
    }

    /// Cards one player receives at the start of a turn.
    #[must_use]
    pub fn cards_to_deal(player: &Player) -> usize {
        CARDS_PER_TURN + CARDS_PER_SPECIES * player.species.len().max(1)
    }

    /// One complete turn for the current seating order.
    pub fn take_turn(&mut self) {
        debug!(
            players = self.players.len(),
            watering_hole = self.watering_hole,
            deck = self.deck.len(),
            "turn begins"
        );
        self.step_deal();
        let chosen = self.step_choose();
        self.step_actions(chosen);
        self.step_auto_traits();
        self.feeding_step();
        self.step_end_turn();
    }

    /// Deal boards and cards to every player and announce the turn.
    fn step_deal(&mut self) {
        let mut faulted = Vec::new();
        for idx in 0..self.players.len() {
            let n = Self::cards_to_deal(&self.players[idx]);
            let cards = self.deal_cards(n);
            let outcome =
                self.players[idx].begin_turn(self.watering_hole, cards, Deadline::standard());
            if let Err(err) = outcome {
                warn!(player = self.players[idx].id(), %err, "removed at deal");
                faulted.push(idx);
            }
        }
        self.remove_players(faulted);
    }

    /// Ask every player for its action batch and validate it. A player
    /// whose batch is invalid is removed before any batch is applied.
    fn step_choose(&mut self) -> Vec<(u64, Action4)> {
        let boards: Vec<Vec<Species>> =
            self.players.iter().map(|p| p.species.clone()).collect();

        let mut chosen = Vec::new();
        let mut faulted = Vec::new();
        for idx in 0..self.players.len() {
            let before = &boards[..idx];
            let after = &boards[idx + 1..];
            match self.players[idx].choose(before, after, Deadline::standard()) {
                Ok(batch) => match batch.validate(&self.players[idx]) {
                    Ok(()) => chosen.push((self.players[idx].id(), batch)),
                    Err(err) => {
                        warn!(player = self.players[idx].id(), %err, "invalid actions");
                        faulted.push(idx);
                    }
                },
                Err(err) => {
                    warn!(player = self.players[idx].id(), %err, "removed at choose");
                    faulted.push(idx);
                }
            }
        }
        self.remove_players(faulted);
        chosen
    }

    /// Apply every surviving player's batch, crediting discards to the
    /// watering hole.
    fn step_actions(&mut self, chosen: Vec<(u64, Action4)>) {
        for (id, batch) in chosen {
            if let Some(idx) = self.index_of(id) {
                let discard_value = batch.apply(&mut self.players[idx]);
                self.update_watering_hole(i32::from(discard_value));
            }
        }
    }

    /// Run the automatic traits for every player in seating order.
    fn step_auto_traits(&mut self) {
        for idx in 0..self.players.len() {
            let taken = self.players[idx].auto_traits(self.watering_hole);
            self.watering_hole -= taken;
        }
    }

    /// The feeding loop: players act in turn until the hole is dry or
    /// everyone has bowed out. Public so harnesses can drive a feeding
    /// round against an explicit game state.
    pub fn feeding_step(&mut self) {
        self.active = self.players.iter().map(Player::id).collect();
        while self.watering_hole > 0 && !self.active.is_empty() {
            self.feed1();
        }
        self.active.clear();
    }

    /// One feeding decision by the player at the front of the active
    /// ring. A successful feeding rotates the ring; declining or running
    /// out of options drops the player from the ring; a fault or invalid
    /// choice removes the player from the game.
    fn feed1(&mut self) {
        let Some(&current_id) = self.active.front() else {
            return;
        };
        let queue = self.player_queue(current_id);
        let opponents: Vec<Vec<Species>> = queue[1..]
            .iter()
            .filter_map(|&id| self.index_of(id))
            .map(|idx| self.players[idx].species.clone())
            .collect();

        let Some(current_idx) = self.index_of(current_id) else {
            self.active.pop_front();
            return;
        };
        let hole = self.watering_hole;
        let choice =
            self.players[current_idx].feeding_choice(&opponents, hole, Deadline::standard());

        match choice {
            Err(err) => {
                warn!(player = current_id, %err, "removed at feeding");
                self.remove_player(current_idx);
            }
            Ok(choice) => {
                if !choice.validate(&self.players[current_idx], &opponents, hole) {
                    warn!(player = current_id, ?choice, "invalid feeding");
                    self.remove_player(current_idx);
                } else if self.apply_feeding(current_id, &queue, choice) {
                    self.active.pop_front();
                } else {
                    self.active.rotate_left(1);
                }
            }
        }
    }

    /// Apply a validated feeding choice. Returns whether the player is
    /// done feeding for this turn.
    fn apply_feeding(&mut self, current_id: u64, queue: &[u64], choice: FeedingChoice) -> bool {
        match choice {
            FeedingChoice::NoFeeding | FeedingChoice::CannotFeed => true,
            FeedingChoice::Vegetarian { species_index } => {
                self.feed_species(current_id, species_index);
                false
            }
            FeedingChoice::FatTissue {
                species_index,
                food_tokens,
            } => {
                if let Some(idx) = self.index_of(current_id) {
                    self.players[idx].store_fat_tissue(species_index, food_tokens);
                    self.watering_hole -= u32::from(food_tokens);
                }
                false
            }
            FeedingChoice::Carnivore {
                species_index,
                player_index,
                defender_index,
            } => {
                self.carnivore_feeding(current_id, queue, species_index, player_index, defender_index);
                false
            }
        }
    }

    /// Resolve a carnivore attack: the defender loses population, horns
    /// strike back, a surviving attacker feeds and every scavenger in
    /// queue order collects.
    fn carnivore_feeding(
        &mut self,
        current_id: u64,
        queue: &[u64],
        attacker_index: usize,
        player_index: usize,
        defender_index: usize,
    ) {
        // Target slots are the queue after the current player, then the
        // current player itself in the final slot.
        let defender_id = if player_index + 1 < queue.len() {
            queue[player_index + 1]
        } else {
            current_id
        };

        let (_, defender_horns) =
            self.hurt_species(defender_id, defender_index, CARNIVORE_ATTACK_DAMAGE);

        let attacker_died = if defender_horns {
            self.hurt_species(current_id, attacker_index, HORNS_DAMAGE).0
        } else {
            false
        };

        if !attacker_died {
            self.feed_species(current_id, attacker_index);
            self.scavenge(queue);
        }
    }

    /// Feed one species of one player, cooperation included, and charge
    /// the watering hole. A self-attack can have removed the board in the
    /// meantime; a vanished board simply does not feed.
    fn feed_species(&mut self, player_id: u64, species_index: usize) {
        let Some(idx) = self.index_of(player_id) else {
            return;
        };
        if species_index >= self.players[idx].species.len() {
            return;
        }
        let hole = self.watering_hole;
        let taken = self.players[idx].feed_species(species_index, hole);
        self.watering_hole -= taken;
    }

    /// A carnivore ate: every player's scavengers collect, in queue order.
    fn scavenge(&mut self, queue: &[u64]) {
        for &id in queue {
            let Some(idx) = self.index_of(id) else {
                continue;
            };
            let hole = self.watering_hole;
            let taken = self.players[idx].scavenge(hole);
            self.watering_hole -= taken;
        }
    }

    /// Damage one species of one player, paying the extinction payout
    /// when the board dies. Returns `(extinct, has_horns)`.
    fn hurt_species(&mut self, player_id: u64, species_index: usize, damage: u8) -> (bool, bool) {
        let Some(idx) = self.index_of(player_id) else {
            return (false, false);
        };
        if species_index >= self.players[idx].species.len() {
            return (false, false);
        }
        let (extinct, horns) = self.players[idx].hurt_species(species_index, damage);
        if extinct {
            self.species_extinct(idx);
        }
        (extinct, horns)
    }

    /// Pay the owner of a freshly extinct species from the deck.
    fn species_extinct(&mut self, player_idx: usize) {
        let cards = self.deal_cards(EXTINCT_SPECIES_PAYOUT);
        self.players[player_idx].add_cards(cards);
    }

    /// End-of-turn accounting for every player, with extinction payouts.
    fn step_end_turn(&mut self) {
        for idx in 0..self.players.len() {
            let extinct = self.players[idx].end_turn();
            for _ in 0..extinct {
                self.species_extinct(idx);
            }
        }
    }

    /// Remove and return up to `n` cards from the front of the deck.
    pub fn deal_cards(&mut self, n: usize) -> Vec<TraitCard> {
        let n = n.min(self.deck.len());
        self.deck.drain(..n).collect()
    }

    /// Adjust the watering hole, never dropping below zero.
    pub fn update_watering_hole(&mut self, delta: i32) {
        self.watering_hole = self.watering_hole.saturating_add_signed(delta);
    }

    /// Player ids in seating order starting at the given player.
    fn player_queue(&self, current_id: u64) -> Vec<u64> {
        let ids: Vec<u64> = self.players.iter().map(Player::id).collect();
        let start = ids.iter().position(|&id| id == current_id).unwrap_or(0);
        let mut queue = ids[start..].to_vec();
        queue.extend_from_slice(&ids[..start]);
        queue
    }

    fn index_of(&self, player_id: u64) -> Option<usize> {
        self.players.iter().position(|p| p.id() == player_id)
    }

    /// Remove one player from the game and the active ring.
    fn remove_player(&mut self, idx: usize) {
        let id = self.players[idx].id();
        self.players.remove(idx);
        self.active.retain(|&a| a != id);
    }

    /// Remove the players at the given seating indices.
    fn remove_players(&mut self, mut indices: Vec<usize>) {
        indices.sort_unstable_by(|a, b| b.cmp(a));
        indices.dedup();
        for idx in indices {
            self.remove_player(idx);
        }
    }

    /// Final standings: `(player id, score)` from best to worst. Equal
    /// scores keep seating order.
    #[must_use]
    pub fn ranking(&self) -> Vec<(u64, u32)> {
        let mut ranked: Vec<&Player> = self.players.iter().collect();
        ranked.sort_by_key(|p| std::cmp::Reverse(p.score()));
        ranked.into_iter().map(|p| (p.id(), p.score())).collect()
    }
}

impl Default for Dealer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for Dealer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.players, self.watering_hole, &self.deck).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Dealer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (players, watering_hole, deck): (Vec<Player>, u32, Vec<TraitCard>) =
            Deserialize::deserialize(deserializer)?;
        if players.is_empty() {
            return Err(D::Error::custom("a configuration needs players"));
        }
        Ok(Self::with_state(players, watering_hole, deck))
    }
}
