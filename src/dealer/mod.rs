//! The dealer: game setup, turn structure, and final standings.

pub mod config;
pub mod game;

pub use config::{ConfigError, MAX_PLAYERS, MIN_PLAYERS};
pub use game::Dealer;
