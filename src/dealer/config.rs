//! Registration limits and configuration errors.

use thiserror::Error;

/// Seat limits for a game.
pub const MIN_PLAYERS: usize = 3;
pub const MAX_PLAYERS: usize = 8;

/// Why a player could not be seated. The limits bind registration only;
/// the engine simulates whatever player list it is handed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("a game seats at most {MAX_PLAYERS} players, got {count}")]
    TooManyPlayers { count: usize },
}
