use crate::button::Button;
use crate::core::{GameConfig, GameId};
use crate::error::EngineError;

use super::state::Game;

/// Builder for a new match.
///
/// ```
/// use dice_duel::game::{GameBuilder, Phase};
///
/// let game = GameBuilder::new()
///     .button("Bauer", "8 10 z12 20 20")
///     .button("Stark", "4 6 8 12 20")
///     .seed(7)
///     .build()
///     .unwrap();
/// assert_eq!(game.phase(), Phase::AwaitAction);
/// assert_eq!(game.round(), 1);
///
/// let bad = GameBuilder::new().button("Bauer", "8 10").button("Stark", "4 X").build();
/// assert!(bad.is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct GameBuilder {
    id: GameId,
    buttons: Vec<(String, String)>,
    max_wins: Option<u32>,
    seed: Option<u64>,
    max_search_dice: Option<usize>,
}

impl GameBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn id(mut self, id: GameId) -> Self {
        self.id = id;
        self
    }

    /// Seat a player with the named button. Seats are filled in call order.
    #[must_use]
    pub fn button(mut self, name: impl Into<String>, recipe: impl Into<String>) -> Self {
        self.buttons.push((name.into(), recipe.into()));
        self
    }

    #[must_use]
    pub fn max_wins(mut self, wins: u32) -> Self {
        self.max_wins = Some(wins);
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn max_search_dice(mut self, limit: usize) -> Self {
        self.max_search_dice = Some(limit);
        self
    }

    /// Parse the buttons, deal the first round and roll.
    pub fn build(self) -> Result<Game, EngineError> {
        let defaults = GameConfig::default();
        let config = GameConfig {
            player_count: self.buttons.len(),
            max_wins: self.max_wins.unwrap_or(defaults.max_wins),
            seed: self.seed.unwrap_or(defaults.seed),
            max_search_dice: self.max_search_dice.unwrap_or(defaults.max_search_dice),
        };
        config.validate()?;

        let buttons = self
            .buttons
            .iter()
            .map(|(name, recipe)| Button::new(name.as_str(), recipe))
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(empty) = buttons.iter().find(|b| b.starting_dice().next().is_none()) {
            return Err(EngineError::malformed(format!(
                "Button '{}' has no dice in play at the start of a round.",
                empty.name()
            )));
        }

        let mut game = Game::new(self.id, config, buttons)?;
        game.advance()?;
        Ok(game)
    }
}
