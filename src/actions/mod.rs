//! Card-driven turn actions and their batch validation.

pub mod batch;
pub mod parts;

pub use batch::{Action4, ActionError};
pub use parts::{BoardTransfer, GrowBody, GrowPopulation, ReplaceTrait};
