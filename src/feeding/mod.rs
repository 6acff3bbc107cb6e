//! Feeding-step choices, option enumeration, and the forced-choice rule.

pub mod choice;
pub mod options;

pub use choice::FeedingChoice;
pub use options::FeedingOptions;
