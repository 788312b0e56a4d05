//! A single live die.
//!
//! A die knows its own size, value, flags and skills. It never refers back
//! to the game that owns it; the owner is a plain [`PlayerId`] and moving a
//! die between collections is the game's job.
//!
//! ## Value sets
//!
//! [`Die::attack_values`], [`Die::defense_values`],
//! [`Die::initiative_values`] and [`Die::assist_values`] return a
//! [`DieValues`] set. Any element may be used for the comparison at hand.
//! An empty initiative set means the die does not count for initiative.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use tracing::trace;

use super::hooks::{handler, DieValues, Handler, HookArgs, HookEvent, HookList};
use super::sides::{grow_size, shrink_size, Sides, MAX_SIDES};
use super::skill::Skill;
use crate::attack::AttackType;
use crate::core::{DieId, GameRng, PlayerId};
use crate::game::Phase;

/// Errors raised by die operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DieError {
    #[error("Invalid die size '{0}'.")]
    InvalidSides(String),

    #[error("Value {value} is outside the range {min}-{max}.")]
    OutOfRange { value: i32, min: i32, max: i32 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Die {
    pub id: DieId,
    /// Current owner. Changes only on capture.
    pub owner: PlayerId,
    sides: Sides,
    value: Option<i32>,
    skills: BTreeSet<Skill>,
    hooks: HookList,
    pub captured: bool,
    /// Reason the die may not attack, empty when it may.
    pub inactive: String,
    /// Set after the die attacks; cleared at its owner's turn end.
    pub has_attacked: bool,
    /// Turned down by focus; may not attack until its owner's turn ends.
    pub dizzy: bool,
    /// The die may not be targeted.
    pub unavailable: bool,
    /// When false, rolling keeps the current value.
    pub does_reroll: bool,
}

impl Die {
    #[must_use]
    pub fn new(id: DieId, owner: PlayerId, sides: Sides) -> Self {
        Self {
            id,
            owner,
            sides,
            value: None,
            skills: BTreeSet::new(),
            hooks: HookList::new(),
            captured: false,
            inactive: String::new(),
            has_attacked: false,
            dizzy: false,
            unavailable: false,
            does_reroll: true,
        }
    }

    /// Create a die carrying `skills`.
    #[must_use]
    pub fn with_skills(id: DieId, owner: PlayerId, sides: Sides, skills: impl IntoIterator<Item = Skill>) -> Self {
        let mut die = Self::new(id, owner, sides);
        for skill in skills {
            die.add_skill(skill);
        }
        die
    }

    /// Create a plain die from a size string such as `"20"`.
    ///
    /// Only a bare decimal size in `1..=99` is accepted.
    pub fn from_sides_str(id: DieId, owner: PlayerId, text: &str) -> Result<Self, DieError> {
        let sides = parse_single_sides(text)?;
        Ok(Self::new(id, owner, Sides::Single(sides)))
    }

    // === Accessors ===

    #[must_use]
    pub fn sides(&self) -> Sides {
        self.sides
    }

    #[must_use]
    pub fn min(&self) -> i32 {
        self.sides.min()
    }

    #[must_use]
    pub fn max(&self) -> i32 {
        self.sides.max()
    }

    /// Current face; `None` before the first roll.
    #[must_use]
    pub fn value(&self) -> Option<i32> {
        self.value
    }

    #[must_use]
    pub fn skills(&self) -> &BTreeSet<Skill> {
        &self.skills
    }

    #[must_use]
    pub fn hooks(&self) -> &HookList {
        &self.hooks
    }

    // === Skills ===

    #[must_use]
    pub fn has_skill(&self, skill: Skill) -> bool {
        self.skills.contains(&skill)
    }

    /// Add a skill and register its hooks. Returns false if already present.
    pub fn add_skill(&mut self, skill: Skill) -> bool {
        if !self.skills.insert(skill) {
            return false;
        }
        self.hooks.register(skill);
        true
    }

    /// Remove a skill and its hooks. Returns false if it was not present.
    pub fn remove_skill(&mut self, skill: Skill) -> bool {
        if !self.skills.remove(&skill) {
            return false;
        }
        self.hooks.unregister(skill);
        true
    }

    /// Run every handler registered for `event`, in skill order.
    pub fn run_hooks(&mut self, event: HookEvent, args: &mut HookArgs<'_>) {
        let skills: SmallVec<[Skill; 4]> = SmallVec::from_slice(self.hooks.skills_for(event));
        for skill in skills {
            // An earlier handler may have removed it.
            if !self.skills.contains(&skill) {
                continue;
            }
            match handler(skill, event) {
                Some(Handler::Mutate(f)) => f(self, args),
                Some(Handler::Inspect(f)) => f(self, args),
                None => {}
            }
        }
    }

    /// Run only the read-only handlers for `event`.
    pub fn query(&self, event: HookEvent, args: &mut HookArgs<'_>) {
        for &skill in self.hooks.skills_for(event) {
            if let Some(Handler::Inspect(f)) = handler(skill, event) {
                f(self, args);
            }
        }
    }

    /// Notify the die of a state-machine transition.
    ///
    /// At the end of its owner's turn a die becomes ready again: attack,
    /// inactivity and dizziness flags are cleared before skill hooks run.
    pub fn run_hooks_at_game_state(&mut self, phase: Phase, player: PlayerId) {
        if phase == Phase::EndTurn && player == self.owner {
            self.has_attacked = false;
            self.inactive.clear();
            self.dizzy = false;
        }
        self.run_hooks(HookEvent::GameState, &mut HookArgs::GameState { phase, player });
    }

    // === Rolling ===

    /// Roll the die.
    ///
    /// `successful_attack` marks a reroll triggered by attacking or
    /// tripping, which is when resizing skills act. A die with
    /// `does_reroll` cleared keeps its value once it has one.
    pub fn roll(&mut self, successful_attack: bool, rng: &mut GameRng) {
        self.run_hooks(
            HookEvent::PreRoll,
            &mut HookArgs::Roll {
                successful_attack,
                rng: &mut *rng,
            },
        );

        if self.does_reroll || self.value.is_none() {
            self.value = Some(self.sides.roll(rng));
        }

        self.run_hooks(
            HookEvent::PostRoll,
            &mut HookArgs::Roll {
                successful_attack,
                rng: &mut *rng,
            },
        );
        trace!(die = %self.id, sides = %self.sides, value = ?self.value, "rolled");
    }

    /// Set the face directly. Fails outside `[min, max]`.
    pub fn set_value(&mut self, value: i32) -> Result<(), DieError> {
        if value < self.min() || value > self.max() {
            return Err(DieError::OutOfRange {
                value,
                min: self.min(),
                max: self.max(),
            });
        }
        self.value = Some(value);
        Ok(())
    }

    pub fn set_to_max(&mut self) {
        self.value = Some(self.max());
    }

    // === Values ===

    fn base_values(&self) -> DieValues {
        self.value.into_iter().collect()
    }

    #[must_use]
    pub fn attack_values(&self, attack: AttackType) -> DieValues {
        let mut values = self.base_values();
        self.query(
            HookEvent::AttackValues,
            &mut HookArgs::Values {
                attack: Some(attack),
                values: &mut values,
            },
        );
        values
    }

    #[must_use]
    pub fn defense_values(&self, attack: AttackType) -> DieValues {
        let mut values = self.base_values();
        self.query(
            HookEvent::DefenseValues,
            &mut HookArgs::Values {
                attack: Some(attack),
                values: &mut values,
            },
        );
        values
    }

    #[must_use]
    pub fn initiative_values(&self) -> DieValues {
        let mut values = self.base_values();
        self.query(
            HookEvent::InitiativeValues,
            &mut HookArgs::Values {
                attack: None,
                values: &mut values,
            },
        );
        values
    }

    /// What this die could add to an attack it is not part of.
    ///
    /// `[0]` means no help. Dice that are themselves attacking never assist.
    #[must_use]
    pub fn assist_values(&self, attack: AttackType, attackers: &[DieId], defenders: &[DieId]) -> DieValues {
        let mut values: DieValues = smallvec![0];
        if attackers.contains(&self.id) {
            return values;
        }
        self.query(
            HookEvent::AssistValues,
            &mut HookArgs::Assist {
                attack,
                attackers,
                defenders,
                values: &mut values,
            },
        );
        values
    }

    // === Attack gates ===

    /// Whether the die may take part in an attack at all.
    #[must_use]
    pub fn valid_attack(&self) -> bool {
        self.inactive.is_empty() && !self.has_attacked
    }

    #[must_use]
    pub fn valid_target(&self) -> bool {
        !self.unavailable
    }

    /// Dispatch capture hooks on an attacking die.
    pub fn capture(&mut self, attack: AttackType, attackers: &[DieId], defenders: &[DieId]) {
        self.run_hooks(
            HookEvent::Capture,
            &mut HookArgs::Capture {
                attack,
                attackers,
                defenders,
            },
        );
    }

    /// Mark the die captured and dispatch its hooks.
    pub fn be_captured(&mut self, attack: AttackType, attackers: &[DieId], defenders: &[DieId]) {
        self.captured = true;
        self.run_hooks(
            HookEvent::BeCaptured,
            &mut HookArgs::Capture {
                attack,
                attackers,
                defenders,
            },
        );
    }

    // === Resizing ===

    /// Split in two. `self` keeps the larger half and the smaller half is
    /// returned as a new die with id `new_id`. Values are clamped into the
    /// new ranges.
    pub fn split(&mut self, new_id: DieId) -> Die {
        let (first, second) = self.sides.split();
        let mut other = self.clone();
        other.id = new_id;
        self.resize(first);
        other.resize(second);
        other
    }

    /// Keep the larger half of a split.
    pub fn halve(&mut self) {
        self.resize(self.sides.split().0);
    }

    /// One step up the size ladder.
    pub fn grow(&mut self) {
        self.resize(self.sides.map(grow_size));
    }

    /// One step down the size ladder.
    pub fn shrink(&mut self) {
        self.resize(self.sides.map(shrink_size));
    }

    /// Take a random size from `sizes` (per component for twin dice).
    pub fn resize_random(&mut self, sizes: &[u32], rng: &mut GameRng) {
        let mut pick = |current: u32| rng.choose(sizes).copied().unwrap_or(current);
        let sides = match self.sides {
            Sides::Single(n) => Sides::Single(pick(n)),
            Sides::Twin(a, b) => {
                let a = pick(a);
                Sides::Twin(a, pick(b))
            }
        };
        self.resize(sides);
    }

    fn resize(&mut self, sides: Sides) {
        self.sides = sides;
        if let Some(v) = self.value {
            self.value = Some(v.clamp(self.min(), self.max()));
        }
    }

    /// Points this die is worth, in tenths: half its size while its
    /// original owner holds it, full size once captured.
    #[must_use]
    pub fn score_value_times_ten(&self) -> i32 {
        let scale = if self.captured { 10 } else { 5 };
        self.max() * scale
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for skill in &self.skills {
            write!(f, "{}", skill.code())?;
        }
        write!(f, "{}", self.sides)?;
        if let Some(v) = self.value {
            write!(f, ":{}", v)?;
        }
        Ok(())
    }
}

/// Parse a bare single-die size, `1..=99`.
pub fn parse_single_sides(text: &str) -> Result<u32, DieError> {
    let invalid = || DieError::InvalidSides(text.to_string());
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let sides: u32 = text.parse().map_err(|_| invalid())?;
    if sides == 0 || sides > MAX_SIDES {
        return Err(invalid());
    }
    Ok(sides)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(sides: u32) -> Die {
        Die::new(DieId::new(0), PlayerId::new(0), Sides::Single(sides))
    }

    #[test]
    fn test_valid_sizes() {
        for n in 1..=99 {
            assert!(parse_single_sides(&n.to_string()).is_ok(), "{} should be valid", n);
        }
        for bad in ["-15", "0", "100", "1023", "thing", "4score", "2.718", "thing8", "", "+5"] {
            assert!(parse_single_sides(bad).is_err(), "{:?} should be invalid", bad);
        }
    }

    #[test]
    fn test_from_sides_str() {
        let die = Die::from_sides_str(DieId::new(3), PlayerId::new(1), "72").unwrap();
        assert_eq!(die.max(), 72);
        assert_eq!(die.min(), 1);
        assert_eq!(die.value(), None);

        for bad in ["himom!", "75.3", "trombones76", "76trombones"] {
            assert!(Die::from_sides_str(DieId::new(0), PlayerId::new(0), bad).is_err());
        }
    }

    #[test]
    fn test_roll_in_bounds() {
        let mut rng = GameRng::new(11);
        let mut die = d(8);
        for _ in 0..200 {
            die.roll(false, &mut rng);
            let v = die.value().unwrap();
            assert!((1..=8).contains(&v));
        }
    }

    #[test]
    fn test_lockout_keeps_value() {
        let mut rng = GameRng::new(1);
        let mut die = d(20);
        die.roll(false, &mut rng);
        let first = die.value();
        die.does_reroll = false;
        for _ in 0..20 {
            die.roll(false, &mut rng);
            assert_eq!(die.value(), first);
        }
    }

    #[test]
    fn test_konstant_locks_after_first_roll() {
        let mut rng = GameRng::new(2);
        let mut die = Die::with_skills(DieId::new(0), PlayerId::new(0), Sides::Single(20), [Skill::Konstant]);
        die.roll(false, &mut rng);
        let first = die.value();
        for _ in 0..10 {
            die.roll(true, &mut rng);
        }
        assert_eq!(die.value(), first);
    }

    #[test]
    fn test_maximum_rolls_max() {
        let mut rng = GameRng::new(3);
        let mut die = Die::with_skills(DieId::new(0), PlayerId::new(0), Sides::Single(12), [Skill::Maximum]);
        die.roll(false, &mut rng);
        assert_eq!(die.value(), Some(12));
    }

    #[test]
    fn test_weak_and_mighty_resize_on_attack_roll() {
        let mut rng = GameRng::new(4);
        let mut weak = Die::with_skills(DieId::new(0), PlayerId::new(0), Sides::Single(12), [Skill::Weak]);
        weak.roll(false, &mut rng);
        assert_eq!(weak.max(), 12);
        weak.roll(true, &mut rng);
        assert_eq!(weak.max(), 10);

        let mut mighty = Die::with_skills(DieId::new(1), PlayerId::new(0), Sides::Single(12), [Skill::Mighty]);
        mighty.roll(true, &mut rng);
        assert_eq!(mighty.max(), 16);
        assert!(mighty.value().unwrap() <= 16);
    }

    #[test]
    fn test_mood_picks_listed_size() {
        let mut rng = GameRng::new(5);
        let mut die = Die::with_skills(DieId::new(0), PlayerId::new(0), Sides::Single(6), [Skill::Mood]);
        for _ in 0..30 {
            die.roll(true, &mut rng);
            assert!(super::super::sides::MOOD_SIZES.contains(&(die.max() as u32)));
        }
    }

    #[test]
    fn test_score_times_ten() {
        let mut die = d(7);
        assert_eq!(die.score_value_times_ten(), 35);
        die.captured = true;
        assert_eq!(die.score_value_times_ten(), 70);
    }

    #[test]
    fn test_default_value_sets() {
        let mut die = d(6);
        die.set_value(4).unwrap();
        assert_eq!(die.initiative_values().as_slice(), &[4]);
        assert_eq!(die.attack_values(AttackType::Power).as_slice(), &[4]);
        assert_eq!(die.defense_values(AttackType::Power).as_slice(), &[4]);
        assert_eq!(die.assist_values(AttackType::Power, &[DieId::new(5)], &[DieId::new(6)]).as_slice(), &[0]);
    }

    #[test]
    fn test_konstant_skill_values() {
        let mut die = Die::with_skills(DieId::new(0), PlayerId::new(0), Sides::Single(6), [Skill::Konstant]);
        die.set_value(3).unwrap();
        assert_eq!(die.attack_values(AttackType::Skill).as_slice(), &[3, -3]);
        assert_eq!(die.attack_values(AttackType::Power).as_slice(), &[3]);
    }

    #[test]
    fn test_stealth_skips_initiative() {
        let mut die = Die::with_skills(DieId::new(0), PlayerId::new(0), Sides::Single(6), [Skill::Stealth]);
        die.set_value(2).unwrap();
        assert!(die.initiative_values().is_empty());
    }

    #[test]
    fn test_fire_assist() {
        let mut fire = Die::with_skills(DieId::new(2), PlayerId::new(0), Sides::Single(6), [Skill::Fire]);
        fire.set_value(4).unwrap();
        let attackers = [DieId::new(0)];
        let defenders = [DieId::new(1)];

        assert_eq!(
            fire.assist_values(AttackType::Power, &attackers, &defenders).as_slice(),
            &[0, 1, 2, 3]
        );
        assert_eq!(fire.assist_values(AttackType::Speed, &attackers, &defenders).as_slice(), &[0]);
        // Never helps its own attack.
        assert_eq!(fire.assist_values(AttackType::Power, &[DieId::new(2)], &defenders).as_slice(), &[0]);
    }

    #[test]
    fn test_attack_gates() {
        let mut die = d(6);
        assert!(die.valid_attack());
        die.inactive = "Reserve".to_string();
        assert!(!die.valid_attack());
        die.inactive.clear();
        die.has_attacked = true;
        assert!(!die.valid_attack());

        assert!(die.valid_target());
        die.unavailable = true;
        assert!(!die.valid_target());
    }

    #[test]
    fn test_be_captured_sets_flag() {
        let mut die = d(6);
        die.be_captured(AttackType::Power, &[DieId::new(9)], &[die.id]);
        assert!(die.captured);
    }

    #[test]
    fn test_skill_add_remove() {
        let mut die = d(6);
        assert!(die.add_skill(Skill::Konstant));
        assert!(!die.add_skill(Skill::Konstant));
        assert!(die.has_skill(Skill::Konstant));
        assert!(!die.hooks().is_empty());

        assert!(die.add_skill(Skill::Trip));
        assert!(!die.remove_skill(Skill::Maximum));
        assert!(die.has_skill(Skill::Trip));

        assert!(die.remove_skill(Skill::Konstant));
        assert!(!die.has_skill(Skill::Konstant));
        assert!(die.hooks().skills_for(HookEvent::PreRoll).is_empty());
    }

    #[test]
    fn test_split() {
        for (sides, first, second) in [(1, 1, 1), (12, 6, 6), (7, 4, 3), (13, 7, 6)] {
            let mut die = d(sides);
            die.set_value(sides as i32).unwrap();
            let other = die.split(DieId::new(1));
            assert_eq!(die.id, DieId::new(0));
            assert_eq!(other.id, DieId::new(1));
            assert_eq!(die.max(), first);
            assert_eq!(other.max(), second);
            assert!(die.value().unwrap() <= die.max());
            assert!(other.value().unwrap() <= other.max());
        }
    }

    #[test]
    fn test_berserk_halves_after_berserk_capture() {
        let mut die = Die::with_skills(DieId::new(0), PlayerId::new(0), Sides::Single(20), [Skill::Berserk]);
        die.capture(AttackType::Power, &[die.id], &[DieId::new(1)]);
        assert_eq!(die.max(), 20);
        die.capture(AttackType::Berserk, &[die.id], &[DieId::new(1)]);
        assert_eq!(die.max(), 10);
        assert!(!die.has_skill(Skill::Berserk));
    }

    #[test]
    fn test_warrior_loses_skill_on_capture() {
        let mut die = Die::with_skills(DieId::new(0), PlayerId::new(0), Sides::Single(6), [Skill::Warrior]);
        die.capture(AttackType::Skill, &[die.id], &[DieId::new(1)]);
        assert!(!die.has_skill(Skill::Warrior));
    }

    #[test]
    fn test_end_turn_clears_owner_only() {
        let mut die = d(6);
        die.has_attacked = true;
        die.dizzy = true;
        die.inactive = "Dizzy".to_string();

        die.run_hooks_at_game_state(Phase::EndTurn, PlayerId::new(1));
        assert!(die.has_attacked);

        die.run_hooks_at_game_state(Phase::StartTurn, PlayerId::new(0));
        assert!(die.has_attacked);

        die.run_hooks_at_game_state(Phase::EndTurn, PlayerId::new(0));
        assert!(!die.has_attacked);
        assert!(!die.dizzy);
        assert!(die.inactive.is_empty());
    }

    #[test]
    fn test_set_value_range() {
        let mut die = Die::new(DieId::new(0), PlayerId::new(0), Sides::Twin(4, 6));
        assert!(die.set_value(1).is_err());
        assert!(die.set_value(10).is_ok());
        assert_eq!(
            die.set_value(11),
            Err(DieError::OutOfRange { value: 11, min: 2, max: 10 })
        );
    }

    #[test]
    fn test_display() {
        let mut die = Die::with_skills(DieId::new(0), PlayerId::new(0), Sides::Single(6), [Skill::Konstant]);
        assert_eq!(die.to_string(), "k6");
        die.set_value(2).unwrap();
        assert_eq!(die.to_string(), "k6:2");
    }
}
