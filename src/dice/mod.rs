//! Dice, their skills, and the per-die hook registry.

pub mod die;
pub mod hooks;
pub mod sides;
pub mod skill;

pub use die::{parse_single_sides, Die, DieError};
pub use hooks::{handler, DieValues, Handler, HookArgs, HookEvent, HookList};
pub use sides::{Sides, MAD_SIZES, MAX_SIDES, MOOD_SIZES, SIZE_LADDER};
pub use skill::Skill;
