//! # dice-duel
//!
//! Rules engine for turn-based dice duels. Each player brings a *button*:
//! a named set of dice, some carrying skills that change how they roll,
//! attack, or score. Players take turns capturing each other's dice; the
//! round ends when someone runs out of dice, everyone passes, or a player
//! surrenders, and the higher score takes the round.
//!
//! ## Design
//!
//! 1. **Arena ownership**: the [`Game`] owns every die. A die knows its
//!    owner only as a [`PlayerId`], so there are no back-references.
//!
//! 2. **Closed skill set**: skills are an enum with a static table of
//!    lifecycle hooks. A die carries the skills it has and the hook list
//!    derived from them, nothing more.
//!
//! 3. **Attack family as a sum type**: [`AttackType`] variants share free
//!    rule checks instead of a class hierarchy.
//!
//! 4. **All-or-nothing actions**: [`Game::process`] works on a copy of the
//!    game and commits it only if the whole action succeeded.
//!
//! ## Modules
//!
//! - `core`: ids, players, RNG, configuration, action envelope
//! - `dice`: dice, skills and the hook registry
//! - `button`: recipe parsing
//! - `attack`: attack validation, search and resolution
//! - `game`: the state machine, initiative, scoring and persistence seam
//! - `error`: the engine error taxonomy
//!
//! ## Example
//!
//! ```
//! use dice_duel::{ActionRequest, GameBuilder, Phase};
//!
//! let bad = GameBuilder::new()
//!     .button("Bauer", "8 10 12 20 X")
//!     .button("Stark", "4 6 8 12 20")
//!     .seed(3)
//!     .build();
//! assert!(bad.is_err());
//!
//! let mut game = GameBuilder::new()
//!     .button("Bauer", "8 10 12 20 20")
//!     .button("Stark", "4 6 8 12 20")
//!     .seed(3)
//!     .build()
//!     .unwrap();
//! assert_eq!(game.phase(), Phase::AwaitAction);
//!
//! // Stale fence: rejected, nothing changes.
//! let request = ActionRequest::new(game.active_player(), "submitTurn")
//!     .with("attackType", "Pass")
//!     .with("attackerIdx", Vec::<i64>::new())
//!     .with("defenderIdx", Vec::<i64>::new())
//!     .with("timestamp", game.timestamp() + 5);
//! let before = game.timestamp();
//! assert!(!game.process(&request).ok);
//! assert_eq!(game.timestamp(), before);
//! ```

pub mod attack;
pub mod button;
pub mod core;
pub mod dice;
pub mod error;
pub mod game;

pub use crate::attack::{AttackError, AttackPlan, AttackType, CaptureOutcome, Selection, Verdict};
pub use crate::button::{parse_recipe, Button, DieTemplate, RecipeError};
pub use crate::core::{
    Action, ActionData, ActionRequest, ActionResult, DieId, Fence, GameConfig, GameId, GameRng, GameRngState,
    ParamValue, Params, PlayerId, PlayerMap,
};
pub use crate::dice::{Die, DieError, HookEvent, Sides, Skill};
pub use crate::error::{EngineError, ErrorKind};
pub use crate::game::{Game, GameBuilder, GameStore, LogEntry, LogRecord, MemoryStore, Phase};
