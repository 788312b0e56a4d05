use serde::{Deserialize, Serialize};

/// State-machine states of a game.
///
/// ```text
/// START_ROUND -> (REACT_TO_AUXILIARY) -> DETERMINE_INITIATIVE
///   -> (REACT_TO_INITIATIVE) -> START_TURN -> AWAIT_ACTION
///   -> (ATTACK | ADJUST_FIRE) -> END_TURN -> START_TURN | END_ROUND
///   -> (REACT_TO_RESERVE) -> START_ROUND | END_GAME
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    StartRound,
    ReactToAuxiliary,
    DetermineInitiative,
    ReactToInitiative,
    StartTurn,
    AwaitAction,
    Attack,
    AdjustFire,
    EndTurn,
    EndRound,
    ReactToReserve,
    EndGame,
}

impl Phase {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Phase::StartRound => "START_ROUND",
            Phase::ReactToAuxiliary => "REACT_TO_AUXILIARY",
            Phase::DetermineInitiative => "DETERMINE_INITIATIVE",
            Phase::ReactToInitiative => "REACT_TO_INITIATIVE",
            Phase::StartTurn => "START_TURN",
            Phase::AwaitAction => "AWAIT_ACTION",
            Phase::Attack => "ATTACK",
            Phase::AdjustFire => "ADJUST_FIRE",
            Phase::EndTurn => "END_TURN",
            Phase::EndRound => "END_ROUND",
            Phase::ReactToReserve => "REACT_TO_RESERVE",
            Phase::EndGame => "END_GAME",
        }
    }

    /// States in which the game stops and waits for a player.
    #[must_use]
    pub const fn awaits_player(self) -> bool {
        matches!(
            self,
            Phase::ReactToAuxiliary
                | Phase::ReactToInitiative
                | Phase::AwaitAction
                | Phase::AdjustFire
                | Phase::ReactToReserve
        )
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Phase::EndGame)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(Phase::ReactToInitiative.to_string(), "REACT_TO_INITIATIVE");
        assert_eq!(Phase::EndGame.to_string(), "END_GAME");
    }

    #[test]
    fn test_waiting_states() {
        assert!(Phase::AwaitAction.awaits_player());
        assert!(!Phase::StartTurn.awaits_player());
        assert!(!Phase::EndGame.awaits_player());
        assert!(Phase::EndGame.is_terminal());
    }
}
