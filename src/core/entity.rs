//! Identifiers for dice and games.
//!
//! Dice live in arenas owned by the game. A die never points back at its
//! game or player; everything refers to it through its `DieId`, allocated
//! by the game so that dice created mid-round (by splitting) get fresh ids.
//!
//! ```
//! use dice_duel::core::DieId;
//!
//! let first = DieId::new(0);
//! assert_eq!(first.next(), DieId::new(1));
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a die within one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DieId(pub u32);

impl DieId {
    /// Create a die ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The ID that follows this one in allocation order.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for DieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Die({})", self.0)
    }
}

/// Identifier the persistence layer uses to address a game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(pub u64);

impl GameId {
    /// Create a game ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Game({})", self.0)
    }
}
