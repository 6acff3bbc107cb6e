//! Leaf value and entity types: traits, cards, species boards, the
//! deck RNG, and call deadlines.

pub mod card;
pub mod deadline;
pub mod rng;
pub mod species;
pub mod traits;

pub use card::{full_deck, TraitCard};
pub use deadline::Deadline;
pub use rng::GameRng;
pub use species::{FeedResult, Species};
pub use traits::{Trait, HARD_SHELL_THRESHOLD, HORNS_DAMAGE};
