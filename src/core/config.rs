//! Match configuration.
//!
//! A match is configured once at creation and travels with the persisted
//! game. Buttons are supplied separately through
//! [`GameBuilder`](crate::game::GameBuilder).

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Smallest supported table.
pub const MIN_PLAYERS: usize = 2;

/// Largest supported table.
pub const MAX_PLAYERS: usize = 8;

/// Configuration for one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of seats.
    pub player_count: usize,

    /// Round wins needed to take the match.
    pub max_wins: u32,

    /// Seed for the match RNG.
    pub seed: u64,

    /// Upper bound on the dice considered when enumerating multi-die
    /// attacks. Subset search is exponential in this number.
    pub max_search_dice: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: 2,
            max_wins: 3,
            seed: 0,
            max_search_dice: 16,
        }
    }
}

impl GameConfig {
    /// Check that the configuration describes a playable match.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(EngineError::Malformed(format!(
                "A game needs between {} and {} players.",
                MIN_PLAYERS, MAX_PLAYERS
            )));
        }
        if self.max_wins == 0 {
            return Err(EngineError::Malformed(
                "The number of wins required must be at least 1.".to_string(),
            ));
        }
        if self.max_search_dice == 0 || self.max_search_dice > 24 {
            return Err(EngineError::Malformed(
                "Attack search limit must be between 1 and 24 dice.".to_string(),
            ));
        }
        Ok(())
    }
}
