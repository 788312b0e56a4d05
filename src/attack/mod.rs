//! The attack-type family.
//!
//! Every attack is one variant of the closed [`AttackType`] enum. Each
//! variant answers three questions:
//!
//! - [`AttackType::find_attack`]: does at least one legal attack of this
//!   type exist for the player to move?
//! - [`AttackType::validate_attack`]: is this particular attacker/defender
//!   selection legal? Rules are checked in a fixed order and the first
//!   failure is reported, so the reason is deterministic:
//!   1. arity
//!   2. availability and dizziness
//!   3. skill compatibility
//!   4. konstant and maximum disabling (trip attacks)
//!   5. numeric feasibility
//! - [`AttackType::resolve_capture`]: carry out a validated attack.
//!
//! Shared checks live in [`rules`]; subset enumeration in [`search`].

mod error;
mod resolve;
pub mod rules;
pub mod search;
mod validate;

use serde::{Deserialize, Serialize};

use crate::core::{DieId, PlayerId};
use crate::dice::Die;
use crate::error::EngineError;

pub use error::AttackError;
pub use resolve::CaptureOutcome;

/// Attack variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AttackType {
    /// Do nothing this turn. Only legal when no other attack is.
    Pass,
    /// Concede the round.
    Surrender,
    /// One die captures one die showing a value no higher than its own.
    Power,
    /// Several dice whose values sum to the target's value capture it.
    Skill,
    /// One die captures a die showing a value between its own value and
    /// its size.
    Shadow,
    /// One die captures several dice whose values sum to its own.
    Speed,
    /// Like speed; the attacker halves afterwards.
    Berserk,
    /// Both dice reroll; the attacker captures if it rolls at least as high.
    Trip,
}

/// Number of dice a side of an attack takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    None,
    One,
    AtLeastOne,
}

impl AttackType {
    pub const ALL: [AttackType; 8] = [
        AttackType::Pass,
        AttackType::Surrender,
        AttackType::Power,
        AttackType::Skill,
        AttackType::Shadow,
        AttackType::Speed,
        AttackType::Berserk,
        AttackType::Trip,
    ];

    /// Variants that capture dice.
    pub const CAPTURING: [AttackType; 6] = [
        AttackType::Power,
        AttackType::Skill,
        AttackType::Shadow,
        AttackType::Speed,
        AttackType::Berserk,
        AttackType::Trip,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            AttackType::Pass => "Pass",
            AttackType::Surrender => "Surrender",
            AttackType::Power => "Power",
            AttackType::Skill => "Skill",
            AttackType::Shadow => "Shadow",
            AttackType::Speed => "Speed",
            AttackType::Berserk => "Berserk",
            AttackType::Trip => "Trip",
        }
    }

    /// Lower-case name used inside messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            AttackType::Pass => "pass",
            AttackType::Surrender => "surrender",
            AttackType::Power => "power",
            AttackType::Skill => "skill",
            AttackType::Shadow => "shadow",
            AttackType::Speed => "speed",
            AttackType::Berserk => "berserk",
            AttackType::Trip => "trip",
        }
    }

    /// `(attackers, defenders)` the variant takes.
    #[must_use]
    pub const fn arity(self) -> (Arity, Arity) {
        match self {
            AttackType::Pass | AttackType::Surrender => (Arity::None, Arity::None),
            AttackType::Power | AttackType::Shadow | AttackType::Trip => (Arity::One, Arity::One),
            AttackType::Skill => (Arity::AtLeastOne, Arity::One),
            AttackType::Speed | AttackType::Berserk => (Arity::One, Arity::AtLeastOne),
        }
    }

    #[must_use]
    pub const fn captures(self) -> bool {
        !matches!(self, AttackType::Pass | AttackType::Surrender)
    }

    /// Whether fire dice may help this attack.
    #[must_use]
    pub const fn accepts_fire(self) -> bool {
        matches!(self, AttackType::Power | AttackType::Skill)
    }

    /// Check a concrete selection. See the module docs for rule order.
    pub fn validate_attack(self, selection: &Selection<'_>) -> Result<Verdict, AttackError> {
        validate::validate(self, selection)
    }
}

impl std::fmt::Display for AttackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for AttackType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttackType::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| EngineError::malformed(format!("Unknown attack type '{}'.", s)))
    }
}

/// Outcome of a successful validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The attack can go ahead as selected.
    Valid,
    /// Fire dice must be turned down by a total of at least `shortfall`
    /// (exactly `shortfall` for skill attacks) before the attack succeeds.
    NeedsFire { shortfall: i32 },
}

/// The dice one attack attempt works with.
#[derive(Clone, Debug)]
pub struct Selection<'a> {
    pub attackers: Vec<&'a Die>,
    pub defenders: Vec<&'a Die>,
    /// The attacking player's other dice, which may assist.
    pub helpers: Vec<&'a Die>,
}

impl<'a> Selection<'a> {
    /// Build a selection from indices into the attacking and defending
    /// players' active dice. Indices must be in range and distinct.
    pub fn from_indices(
        own: &'a [Die],
        attackers: &[usize],
        targets: &'a [Die],
        defenders: &[usize],
    ) -> Result<Self, EngineError> {
        let pick = |pool: &'a [Die], idx: &[usize], side: &str| -> Result<Vec<&'a Die>, EngineError> {
            let mut seen = Vec::with_capacity(idx.len());
            for &i in idx {
                if i >= pool.len() {
                    return Err(EngineError::malformed(format!("{} die index {} is out of range.", side, i)));
                }
                if seen.contains(&i) {
                    return Err(EngineError::malformed(format!("{} die index {} is repeated.", side, i)));
                }
                seen.push(i);
            }
            Ok(idx.iter().map(|&i| &pool[i]).collect())
        };

        Ok(Self {
            attackers: pick(own, attackers, "Attacking")?,
            defenders: pick(targets, defenders, "Target")?,
            helpers: own
                .iter()
                .enumerate()
                .filter(|(i, _)| !attackers.contains(i))
                .map(|(_, d)| d)
                .collect(),
        })
    }

    #[must_use]
    pub fn attacker_ids(&self) -> Vec<DieId> {
        self.attackers.iter().map(|d| d.id).collect()
    }

    #[must_use]
    pub fn defender_ids(&self) -> Vec<DieId> {
        self.defenders.iter().map(|d| d.id).collect()
    }
}

/// A validated attack, by die id. Survives cloning and persistence of the
/// game, unlike a [`Selection`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackPlan {
    pub attack: AttackType,
    pub attacker_player: PlayerId,
    pub attackers: Vec<DieId>,
    pub defender_player: PlayerId,
    pub defenders: Vec<DieId>,
}
