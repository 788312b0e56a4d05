//! The game state machine.
//!
//! - [`Game`]: all dice of all players plus round, turn and win state
//! - [`Phase`]: state-machine states
//! - [`GameBuilder`]: creates a match from buttons
//! - [`GameStore`]: load/save contract, with [`MemoryStore`]
//!
//! Actions enter through [`Game::process`] (or [`Game::apply`] for typed
//! errors) and the machine then advances on its own until it waits for a
//! player again.

mod actions;
mod builder;
pub mod initiative;
mod log;
mod machine;
mod phase;
pub mod scoring;
mod state;
mod store;

pub use builder::GameBuilder;
pub use log::{LogEntry, LogRecord};
pub use phase::Phase;
pub use state::{Game, PendingAttack};
pub use store::{GameStore, MemoryStore};
