//! Rule checks shared by several attack variants.

use std::collections::BTreeSet;

use crate::dice::sides::{grow_size, shrink_size};
use crate::dice::{Die, DieValues, Skill};

use super::{AttackError, AttackType, Selection};

/// Dizziness and availability of the selected dice, dizziness first.
pub fn check_exclusions(selection: &Selection<'_>) -> Result<(), AttackError> {
    if selection.attackers.iter().any(|d| d.dizzy) {
        return Err(AttackError::Dizzy);
    }
    if selection.attackers.iter().any(|d| !d.valid_attack()) {
        return Err(AttackError::CannotAttack);
    }
    if selection.defenders.iter().any(|d| !d.valid_target()) {
        return Err(AttackError::Unavailable);
    }
    Ok(())
}

/// Compatibility rules for one-attacker variants that need `required` (if
/// any) on the attacker and exclude stealth and warrior dice on both sides.
pub fn check_single_attacker_skills(
    attack: AttackType,
    required: Option<Skill>,
    forbidden: &[Skill],
    selection: &Selection<'_>,
) -> Result<(), AttackError> {
    for att in &selection.attackers {
        for &skill in [Skill::Stealth, Skill::Warrior].iter().chain(forbidden) {
            if att.has_skill(skill) {
                return Err(AttackError::SkillForbids { skill, attack });
            }
        }
        if let Some(skill) = required {
            if !att.has_skill(skill) {
                return Err(AttackError::MissingSkill { skill, attack });
            }
        }
    }
    for def in &selection.defenders {
        if def.has_skill(Skill::Stealth) {
            return Err(AttackError::ImmuneTarget {
                skill: Skill::Stealth,
                attack,
            });
        }
        if def.has_skill(Skill::Warrior) {
            return Err(AttackError::WarriorTarget);
        }
    }
    Ok(())
}

/// Largest value a die can show after an attack-triggered reroll, or
/// `None` when its size is randomized.
#[must_use]
pub fn post_roll_max(die: &Die) -> Option<i32> {
    if die.has_skill(Skill::Mood) || die.has_skill(Skill::Mad) {
        return None;
    }
    let mut sides = die.sides();
    if die.has_skill(Skill::Weak) {
        sides = sides.map(shrink_size);
    }
    if die.has_skill(Skill::Mighty) {
        sides = sides.map(grow_size);
    }
    Some(sides.max())
}

/// Best value the attacker can end up with: its locked value when
/// konstant, its post-roll maximum otherwise.
fn attacker_ceiling(att: &Die) -> Option<i32> {
    if att.has_skill(Skill::Konstant) {
        att.value()
    } else {
        post_roll_max(att)
    }
}

/// Konstant dice keep their values through a reroll, which can make a
/// reroll-style attack impossible to win.
pub fn check_konstant(att: &Die, def: &Die) -> Result<(), AttackError> {
    let att_konstant = att.has_skill(Skill::Konstant);
    let def_konstant = def.has_skill(Skill::Konstant);

    if att_konstant && att.value().is_some_and(|v| v < def.min()) {
        return Err(AttackError::CannotRollHighEnough);
    }
    if def_konstant {
        if let Some(dv) = def.value() {
            // An attacker with a randomized size cannot promise to reach the
            // locked value.
            if attacker_ceiling(att).map_or(true, |ceiling| ceiling < dv) {
                return Err(AttackError::CannotRollHighEnough);
            }
        }
    }
    if att_konstant && def_konstant {
        if let (Some(av), Some(dv)) = (att.value(), def.value()) {
            if av < dv {
                return Err(AttackError::CannotRollHighEnough);
            }
        }
    }
    Ok(())
}

/// A maximum defender always rerolls to its post-roll maximum. Skipped when
/// either side's post-roll maximum is indeterminate.
pub fn check_maximum(att: &Die, def: &Die) -> Result<(), AttackError> {
    let (Some(att_max), Some(def_max)) = (attacker_ceiling(att), post_roll_max(def)) else {
        return Ok(());
    };
    if def.has_skill(Skill::Maximum) && att_max < def_max {
        return Err(AttackError::CannotRollHighEnough);
    }
    Ok(())
}

/// Every sum reachable by picking one value from each set.
#[must_use]
pub fn reachable_sums(sets: &[DieValues]) -> BTreeSet<i32> {
    let mut sums = BTreeSet::from([0]);
    for set in sets {
        sums = sums
            .iter()
            .flat_map(|s| set.iter().map(move |v| s + v))
            .collect();
    }
    sums
}

/// Total a player's helpers could add by turning fire dice down.
#[must_use]
pub fn fire_capacity(attack: AttackType, selection: &Selection<'_>) -> i32 {
    if !attack.accepts_fire() {
        return 0;
    }
    let attackers = selection.attacker_ids();
    let defenders = selection.defender_ids();
    selection
        .helpers
        .iter()
        .map(|d| {
            d.assist_values(attack, &attackers, &defenders)
                .iter()
                .copied()
                .max()
                .unwrap_or(0)
        })
        .sum()
}

/// Whether attackers helped by `total` points of fire turndown beat the
/// defenders. Power attacks need to reach the target value; skill attacks
/// must hit it exactly.
#[must_use]
pub fn fire_fits(attack: AttackType, attackers: &[&Die], defenders: &[&Die], total: i32) -> bool {
    let Some(def) = defenders.first() else {
        return false;
    };
    let targets = def.defense_values(attack);
    match attack {
        AttackType::Power => {
            let best = attackers
                .iter()
                .flat_map(|d| d.attack_values(attack))
                .max();
            match (best, targets.iter().copied().min()) {
                (Some(best), Some(need)) => best + total >= need,
                _ => false,
            }
        }
        AttackType::Skill => {
            let sets: Vec<DieValues> = attackers.iter().map(|d| d.attack_values(attack)).collect();
            let sums = reachable_sums(&sets);
            targets.iter().any(|t| sums.contains(&(t - total)))
        }
        _ => false,
    }
}
