//! # evolution-engine
//!
//! A complete engine for the Evolution card game: deterministic dealer,
//! untrusted player seam, and the full trait-interaction rule set.
//!
//! ## Design Principles
//!
//! 1. **The dealer is the authority**: every token and card move runs
//!    through [`Dealer`]. Players only answer questions.
//!
//! 2. **Players are untrusted**: every [`DecisionMaker`] call carries a
//!    deadline, every reply is validated against the caller's actual
//!    options, and any fault removes the player while play continues.
//!
//! 3. **Forced choices stay silent**: when a player has at most one
//!    legal feeding, the engine resolves it without a decision-maker
//!    call.
//!
//! ## Modules
//!
//! - `core`: traits, cards, species boards, deadlines, RNG
//! - `actions`: the per-turn card action batch and its validation
//! - `feeding`: feeding choices, option enumeration, forced choices
//! - `player`: the dealer-side player, the decision seam, the built-in
//!   strategy
//! - `dealer`: turn structure, the feeding loop, scoring

pub mod actions;
pub mod core;
pub mod dealer;
pub mod feeding;
pub mod player;

// Re-export commonly used types
pub use crate::core::{
    full_deck, Deadline, FeedResult, GameRng, Species, Trait, TraitCard, HARD_SHELL_THRESHOLD,
    HORNS_DAMAGE,
};

pub use crate::actions::{Action4, ActionError, BoardTransfer, GrowBody, GrowPopulation, ReplaceTrait};

pub use crate::feeding::{FeedingChoice, FeedingOptions};

pub use crate::player::{DecisionError, DecisionMaker, Player, PlayerState, SillyStrategy};

pub use crate::dealer::{ConfigError, Dealer, MAX_PLAYERS, MIN_PLAYERS};
