//! Core engine types: ids, players, RNG, configuration, action envelope.
//!
//! Nothing in here knows about specific skills or attack rules.

pub mod action;
pub mod config;
pub mod entity;
pub mod player;
pub mod rng;

pub use action::{
    Action, ActionData, ActionRequest, ActionResult, Fence, FireAdjustment, InitiativeReaction, ParamValue,
    Params,
};
pub use config::{GameConfig, MAX_PLAYERS, MIN_PLAYERS};
pub use entity::{DieId, GameId};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
