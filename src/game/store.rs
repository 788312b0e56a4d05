//! Persistence seam.
//!
//! The engine does not own storage. A caller loads a game, applies one
//! action, and saves the result; [`GameStore`] is the shape of that
//! contract. [`MemoryStore`] keeps bincode snapshots in memory and is what
//! the tests use.

use rustc_hash::FxHashMap;

use super::state::Game;
use crate::core::GameId;
use crate::error::EngineError;

/// Where games are loaded from and saved to.
pub trait GameStore {
    fn load_game(&self, id: GameId) -> Result<Game, EngineError>;
    fn save_game(&mut self, game: &Game) -> Result<(), EngineError>;
}

impl Game {
    /// Encode the complete game state.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EngineError> {
        bincode::serialize(self).map_err(|e| EngineError::internal(format!("failed to encode game: {}", e)))
    }

    /// Decode a game produced by [`Game::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EngineError> {
        bincode::deserialize(bytes).map_err(|e| EngineError::malformed(format!("Corrupt game snapshot: {}", e)))
    }
}

/// In-memory store of encoded snapshots.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    games: FxHashMap<GameId, Vec<u8>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl GameStore for MemoryStore {
    fn load_game(&self, id: GameId) -> Result<Game, EngineError> {
        let bytes = self
            .games
            .get(&id)
            .ok_or_else(|| EngineError::malformed(format!("{} does not exist.", id)))?;
        Game::from_bytes(bytes)
    }

    fn save_game(&mut self, game: &Game) -> Result<(), EngineError> {
        let bytes = game.to_bytes()?;
        self.games.insert(game.id(), bytes);
        Ok(())
    }
}
