//! Engine-level error taxonomy.
//!
//! Domain errors live next to the code that produces them
//! ([`RecipeError`] in `button`, [`AttackError`] in `attack`). Everything
//! that crosses the action boundary is folded into [`EngineError`], whose
//! [`ErrorKind`] tells the caller whether to fix the request, refresh its
//! view of the game, or report a bug.

use crate::attack::AttackError;
use crate::button::RecipeError;
use crate::dice::DieError;
use crate::game::Phase;

/// Category of an [`EngineError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A game rule declined the action.
    Validation,
    /// The action is not accepted in the current state.
    IllegalState,
    /// The action was computed against a stale snapshot.
    Conflict,
    /// The request or recipe is structurally invalid.
    Malformed,
    /// Engine invariant violated. Indicates a bug.
    Internal,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::IllegalState => "illegal_state",
            Self::Conflict => "conflict",
            Self::Malformed => "malformed",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error indicates an engine bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Error returned by engine operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Expected rule violation with a user-facing reason.
    #[error("{0}")]
    Validation(String),

    #[error("Cannot {action} while the game is in state {phase}.")]
    IllegalState { action: &'static str, phase: Phase },

    #[error("Game state is out of date (expected timestamp {expected}, got {submitted}); reload and try again.")]
    Conflict { expected: u64, submitted: u64 },

    #[error("Game has moved on to round {expected} (request was for round {submitted}); reload and try again.")]
    StaleRound { expected: u32, submitted: u32 },

    #[error("{0}")]
    Malformed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::IllegalState { .. } => ErrorKind::IllegalState,
            Self::Conflict { .. } | Self::StaleRound { .. } => ErrorKind::Conflict,
            Self::Malformed(_) => ErrorKind::Malformed,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<AttackError> for EngineError {
    fn from(err: AttackError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<DieError> for EngineError {
    fn from(err: DieError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<RecipeError> for EngineError {
    fn from(err: RecipeError) -> Self {
        Self::Malformed(err.to_string())
    }
}
