use crate::dice::Skill;

use super::rules::{
    check_exclusions, check_konstant, check_maximum, check_single_attacker_skills, fire_capacity, reachable_sums,
};
use super::{Arity, AttackError, AttackType, Selection, Verdict};

pub(super) fn validate(attack: AttackType, selection: &Selection<'_>) -> Result<Verdict, AttackError> {
    check_arity(attack, selection)?;
    if !attack.captures() {
        return Ok(Verdict::Valid);
    }

    check_exclusions(selection)?;
    check_skills(attack, selection)?;

    if attack == AttackType::Trip {
        let (att, def) = (selection.attackers[0], selection.defenders[0]);
        check_konstant(att, def)?;
        check_maximum(att, def)?;
    }

    check_feasibility(attack, selection)
}

fn check_arity(attack: AttackType, selection: &Selection<'_>) -> Result<(), AttackError> {
    let (att_arity, def_arity) = attack.arity();
    let att = selection.attackers.len();
    let def = selection.defenders.len();

    if att_arity == Arity::None || def_arity == Arity::None {
        if att > 0 || def > 0 {
            return Err(AttackError::DiceSelected(attack));
        }
        return Ok(());
    }

    match att_arity {
        Arity::One if att != 1 => return Err(AttackError::ExactlyOneAttacker(attack)),
        Arity::AtLeastOne if att == 0 => return Err(AttackError::NoAttackers(attack)),
        _ => {}
    }
    match def_arity {
        Arity::One if def != 1 => Err(AttackError::ExactlyOneTarget(attack)),
        Arity::AtLeastOne if def == 0 => Err(AttackError::NoTargets(attack)),
        _ => Ok(()),
    }
}

fn check_skills(attack: AttackType, selection: &Selection<'_>) -> Result<(), AttackError> {
    match attack {
        AttackType::Power => {
            check_single_attacker_skills(attack, None, &[Skill::Konstant, Skill::Shadow], selection)
        }
        AttackType::Shadow => check_single_attacker_skills(attack, Some(Skill::Shadow), &[], selection),
        AttackType::Speed => check_single_attacker_skills(attack, Some(Skill::Speed), &[], selection),
        AttackType::Berserk => check_single_attacker_skills(attack, Some(Skill::Berserk), &[], selection),
        AttackType::Trip => check_single_attacker_skills(attack, Some(Skill::Trip), &[], selection),
        AttackType::Skill => check_skill_attack_skills(selection),
        AttackType::Pass | AttackType::Surrender => Ok(()),
    }
}

fn check_skill_attack_skills(selection: &Selection<'_>) -> Result<(), AttackError> {
    let warriors = selection
        .attackers
        .iter()
        .filter(|d| d.has_skill(Skill::Warrior))
        .count();
    if warriors > 1 {
        return Err(AttackError::TooManyWarriors);
    }
    if warriors == selection.attackers.len() && warriors > 0 {
        return Err(AttackError::WarriorAlone);
    }

    let stealthy = selection
        .attackers
        .iter()
        .chain(&selection.defenders)
        .any(|d| d.has_skill(Skill::Stealth));
    if stealthy && selection.attackers.len() < 2 {
        return Err(AttackError::StealthNeedsCompany);
    }

    if selection.defenders.iter().any(|d| d.has_skill(Skill::Warrior)) {
        return Err(AttackError::WarriorTarget);
    }
    Ok(())
}

fn check_feasibility(attack: AttackType, selection: &Selection<'_>) -> Result<Verdict, AttackError> {
    match attack {
        AttackType::Power => {
            let att = selection.attackers[0];
            let def = selection.defenders[0];
            let best = att.attack_values(attack).iter().copied().max();
            let need = def.defense_values(attack).iter().copied().min();
            let (Some(best), Some(need)) = (best, need) else {
                return Err(AttackError::ValueTooSmall);
            };
            if best >= need {
                return Ok(Verdict::Valid);
            }
            let shortfall = need - best;
            if shortfall <= fire_capacity(attack, selection) {
                return Ok(Verdict::NeedsFire { shortfall });
            }
            Err(AttackError::ValueTooSmall)
        }
        AttackType::Skill => {
            let sets: Vec<_> = selection.attackers.iter().map(|d| d.attack_values(attack)).collect();
            let sums = reachable_sums(&sets);
            let targets = selection.defenders[0].defense_values(attack);

            if targets.iter().any(|t| sums.contains(t)) {
                return Ok(Verdict::Valid);
            }
            let capacity = fire_capacity(attack, selection);
            let shortfall = targets
                .iter()
                .filter_map(|&t| sums.range(..t).next_back().map(|&s| t - s))
                .filter(|&gap| gap <= capacity)
                .min();
            match shortfall {
                Some(shortfall) => Ok(Verdict::NeedsFire { shortfall }),
                None => Err(AttackError::SumMismatch),
            }
        }
        AttackType::Shadow => {
            let att = selection.attackers[0];
            let def = selection.defenders[0];
            let values = att.attack_values(attack);
            let ok = def
                .defense_values(attack)
                .iter()
                .any(|&d| values.iter().any(|&a| a <= d) && d <= att.max());
            if ok {
                Ok(Verdict::Valid)
            } else {
                Err(AttackError::OutsideShadowRange)
            }
        }
        AttackType::Speed | AttackType::Berserk => {
            let sets: Vec<_> = selection.defenders.iter().map(|d| d.defense_values(attack)).collect();
            let sums = reachable_sums(&sets);
            if selection.attackers[0].attack_values(attack).iter().any(|a| sums.contains(a)) {
                Ok(Verdict::Valid)
            } else {
                Err(AttackError::TargetSumMismatch)
            }
        }
        AttackType::Trip => {
            if selection.attackers[0].max() >= selection.defenders[0].min() {
                Ok(Verdict::Valid)
            } else {
                Err(AttackError::TripTooLarge)
            }
        }
        AttackType::Pass | AttackType::Surrender => Ok(Verdict::Valid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DieId, PlayerId};
    use crate::dice::{Die, Sides};

    fn die(id: u32, sides: u32, value: i32, skills: &[Skill]) -> Die {
        let owner = PlayerId::new(if id < 10 { 0 } else { 1 });
        let mut d = Die::with_skills(DieId::new(id), owner, Sides::Single(sides), skills.iter().copied());
        d.set_value(value).unwrap();
        d
    }

    fn sel<'a>(own: &'a [Die], att: &[usize], theirs: &'a [Die], def: &[usize]) -> Selection<'a> {
        Selection::from_indices(own, att, theirs, def).unwrap()
    }

    #[test]
    fn test_power_attack() {
        let own = [die(0, 6, 5, &[])];
        let theirs = [die(10, 6, 3, &[]), die(11, 6, 6, &[])];

        assert_eq!(AttackType::Power.validate_attack(&sel(&own, &[0], &theirs, &[0])), Ok(Verdict::Valid));
        assert_eq!(
            AttackType::Power.validate_attack(&sel(&own, &[0], &theirs, &[1])),
            Err(AttackError::ValueTooSmall)
        );
        assert_eq!(
            AttackType::Power.validate_attack(&sel(&own, &[0], &theirs, &[0, 1])),
            Err(AttackError::ExactlyOneTarget(AttackType::Power))
        );
    }

    #[test]
    fn test_power_with_fire() {
        let own = [die(0, 6, 5, &[]), die(1, 8, 4, &[Skill::Fire])];
        let theirs = [die(10, 8, 7, &[])];

        assert_eq!(
            AttackType::Power.validate_attack(&sel(&own, &[0], &theirs, &[0])),
            Ok(Verdict::NeedsFire { shortfall: 2 })
        );

        let theirs = [die(10, 8, 8, &[])];
        assert_eq!(
            AttackType::Power.validate_attack(&sel(&own, &[0], &theirs, &[0])),
            Ok(Verdict::NeedsFire { shortfall: 3 })
        );

        let weak_fire = [die(0, 6, 5, &[]), die(1, 8, 2, &[Skill::Fire])];
        assert_eq!(
            AttackType::Power.validate_attack(&sel(&weak_fire, &[0], &theirs, &[0])),
            Err(AttackError::ValueTooSmall)
        );
    }

    #[test]
    fn test_skill_attack_sums() {
        let own = [die(0, 6, 2, &[]), die(1, 6, 3, &[]), die(2, 6, 6, &[])];
        let theirs = [die(10, 6, 5, &[])];

        assert_eq!(
            AttackType::Skill.validate_attack(&sel(&own, &[0, 1], &theirs, &[0])),
            Ok(Verdict::Valid)
        );
        assert_eq!(
            AttackType::Skill.validate_attack(&sel(&own, &[0, 2], &theirs, &[0])),
            Err(AttackError::SumMismatch)
        );
    }

    #[test]
    fn test_konstant_skill_subtracts() {
        let own = [die(0, 6, 6, &[]), die(1, 6, 2, &[Skill::Konstant])];
        let theirs = [die(10, 6, 4, &[])];
        assert_eq!(
            AttackType::Skill.validate_attack(&sel(&own, &[0, 1], &theirs, &[0])),
            Ok(Verdict::Valid)
        );
        assert_eq!(
            AttackType::Power.validate_attack(&sel(&own, &[1], &theirs, &[0])),
            Err(AttackError::SkillForbids {
                skill: Skill::Konstant,
                attack: AttackType::Power
            })
        );
    }

    #[test]
    fn test_warrior_rules() {
        let own = [
            die(0, 6, 1, &[Skill::Warrior]),
            die(1, 6, 1, &[Skill::Warrior]),
            die(2, 6, 2, &[]),
        ];
        let theirs = [die(10, 6, 3, &[]), die(11, 6, 6, &[Skill::Warrior])];

        assert_eq!(
            AttackType::Skill.validate_attack(&sel(&own, &[0], &theirs, &[0])),
            Err(AttackError::WarriorAlone)
        );
        assert_eq!(
            AttackType::Skill.validate_attack(&sel(&own, &[0, 1, 2], &theirs, &[0])),
            Err(AttackError::TooManyWarriors)
        );
        assert_eq!(
            AttackType::Power.validate_attack(&sel(&own, &[2], &theirs, &[1])),
            Err(AttackError::WarriorTarget)
        );
    }

    #[test]
    fn test_stealth_rules() {
        let own = [die(0, 6, 4, &[Skill::Stealth]), die(1, 6, 1, &[])];
        let theirs = [die(10, 6, 4, &[Skill::Stealth]), die(11, 6, 5, &[])];

        assert_eq!(
            AttackType::Power.validate_attack(&sel(&own, &[0], &theirs, &[1])),
            Err(AttackError::SkillForbids {
                skill: Skill::Stealth,
                attack: AttackType::Power
            })
        );
        assert_eq!(
            AttackType::Skill.validate_attack(&sel(&own, &[0], &theirs, &[0])),
            Err(AttackError::StealthNeedsCompany)
        );
        assert_eq!(
            AttackType::Skill.validate_attack(&sel(&own, &[0, 1], &theirs, &[1])),
            Ok(Verdict::Valid)
        );
    }

    #[test]
    fn test_shadow_range() {
        let own = [die(0, 10, 4, &[Skill::Shadow])];
        let theirs = [die(10, 12, 7, &[]), die(11, 12, 11, &[]), die(12, 12, 2, &[])];

        assert_eq!(AttackType::Shadow.validate_attack(&sel(&own, &[0], &theirs, &[0])), Ok(Verdict::Valid));
        assert_eq!(
            AttackType::Shadow.validate_attack(&sel(&own, &[0], &theirs, &[1])),
            Err(AttackError::OutsideShadowRange)
        );
        assert_eq!(
            AttackType::Shadow.validate_attack(&sel(&own, &[0], &theirs, &[2])),
            Err(AttackError::OutsideShadowRange)
        );
        assert_eq!(
            AttackType::Power.validate_attack(&sel(&own, &[0], &theirs, &[2])),
            Err(AttackError::SkillForbids {
                skill: Skill::Shadow,
                attack: AttackType::Power
            })
        );
    }

    #[test]
    fn test_speed_and_berserk() {
        let own = [die(0, 12, 9, &[Skill::Speed, Skill::Berserk]), die(1, 6, 6, &[])];
        let theirs = [die(10, 6, 4, &[]), die(11, 6, 5, &[]), die(12, 6, 1, &[])];

        assert_eq!(
            AttackType::Speed.validate_attack(&sel(&own, &[0], &theirs, &[0, 1])),
            Ok(Verdict::Valid)
        );
        assert_eq!(
            AttackType::Berserk.validate_attack(&sel(&own, &[0], &theirs, &[0, 2])),
            Err(AttackError::TargetSumMismatch)
        );
        assert_eq!(
            AttackType::Speed.validate_attack(&sel(&own, &[1], &theirs, &[2])),
            Err(AttackError::MissingSkill {
                skill: Skill::Speed,
                attack: AttackType::Speed
            })
        );
    }

    #[test]
    fn test_trip_rule_order() {
        // Dizzy is reported before the skill problem.
        let mut dizzy = die(0, 6, 3, &[Skill::Stealth]);
        dizzy.dizzy = true;
        let own = [dizzy];
        let theirs = [die(10, 6, 3, &[Skill::Warrior])];
        assert_eq!(
            AttackType::Trip.validate_attack(&sel(&own, &[0], &theirs, &[0])),
            Err(AttackError::Dizzy)
        );

        // Skill compatibility before disabling.
        let own = [die(0, 6, 1, &[Skill::Konstant])];
        let theirs = [die(10, 20, 20, &[Skill::Konstant])];
        assert_eq!(
            AttackType::Trip.validate_attack(&sel(&own, &[0], &theirs, &[0])),
            Err(AttackError::MissingSkill {
                skill: Skill::Trip,
                attack: AttackType::Trip
            })
        );

        let own = [die(0, 6, 1, &[Skill::Konstant, Skill::Trip])];
        assert_eq!(
            AttackType::Trip.validate_attack(&sel(&own, &[0], &theirs, &[0])),
            Err(AttackError::CannotRollHighEnough)
        );

        let own = [die(0, 6, 1, &[Skill::Trip])];
        let theirs = [die(10, 20, 20, &[])];
        assert_eq!(AttackType::Trip.validate_attack(&sel(&own, &[0], &theirs, &[0])), Ok(Verdict::Valid));
    }

    #[test]
    fn test_trip_too_large() {
        let own = [die(0, 1, 1, &[Skill::Trip])];
        let mut twin = Die::new(DieId::new(10), PlayerId::new(1), Sides::Twin(2, 2));
        twin.set_value(3).unwrap();
        let theirs = [twin];
        assert_eq!(
            AttackType::Trip.validate_attack(&sel(&own, &[0], &theirs, &[0])),
            Err(AttackError::TripTooLarge)
        );
    }

    #[test]
    fn test_pass_takes_no_dice() {
        let own = [die(0, 6, 1, &[])];
        let theirs = [die(10, 6, 1, &[])];
        assert_eq!(AttackType::Pass.validate_attack(&sel(&own, &[], &theirs, &[])), Ok(Verdict::Valid));
        assert_eq!(
            AttackType::Pass.validate_attack(&sel(&own, &[0], &theirs, &[])),
            Err(AttackError::DiceSelected(AttackType::Pass))
        );
    }

    #[test]
    fn test_used_die_cannot_attack() {
        let mut used = die(0, 6, 6, &[]);
        used.has_attacked = true;
        let own = [used];
        let theirs = [die(10, 6, 1, &[])];
        assert_eq!(
            AttackType::Power.validate_attack(&sel(&own, &[0], &theirs, &[0])),
            Err(AttackError::CannotAttack)
        );
    }
}
