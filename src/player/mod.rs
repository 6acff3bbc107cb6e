//! Players: the dealer-side aggregate, the decision-maker seam, and the
//! built-in baseline strategy.

pub mod decision;
pub mod internal;
pub mod silly;

pub use decision::{DecisionError, DecisionMaker, PlayerState};
pub use internal::Player;
pub use silly::SillyStrategy;
