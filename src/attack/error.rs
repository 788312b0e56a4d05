use crate::dice::Skill;

use super::AttackType;

/// Why an attack was declined. Messages are shown to players verbatim.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AttackError {
    // === Arity ===
    #[error("There must be exactly one attacking die for a {} attack.", .0.label())]
    ExactlyOneAttacker(AttackType),

    #[error("There must be exactly one target die for a {} attack.", .0.label())]
    ExactlyOneTarget(AttackType),

    #[error("There must be at least one attacking die for a {} attack.", .0.label())]
    NoAttackers(AttackType),

    #[error("There must be at least one target die for a {} attack.", .0.label())]
    NoTargets(AttackType),

    #[error("Please deselect all dice before choosing {}.", .0.label())]
    DiceSelected(AttackType),

    // === Availability ===
    #[error("Dice that have already attacked or are inactive cannot attack.")]
    CannotAttack,

    #[error("The target die cannot be attacked right now.")]
    Unavailable,

    #[error("Dizzy dice cannot be used as attacking dice.")]
    Dizzy,

    // === Skill compatibility ===
    #[error("{skill} dice cannot perform {} attacks.", .attack.label())]
    SkillForbids { skill: Skill, attack: AttackType },

    #[error("Dice without {} cannot perform {} attacks.", .skill.name().to_lowercase(), .attack.label())]
    MissingSkill { skill: Skill, attack: AttackType },

    #[error("{skill} dice cannot be the target of {} attacks.", .attack.label())]
    ImmuneTarget { skill: Skill, attack: AttackType },

    #[error("Warrior dice cannot be attacked.")]
    WarriorTarget,

    #[error("Only one Warrior die can be used in a skill attack.")]
    TooManyWarriors,

    #[error("Warrior dice cannot attack alone.")]
    WarriorAlone,

    #[error("Stealth dice can only take part in skill attacks with two or more attacking dice.")]
    StealthNeedsCompany,

    // === Disabling ===
    #[error("The attacking die cannot roll high enough to capture the target die")]
    CannotRollHighEnough,

    // === Feasibility ===
    #[error("Attacking die value must be at least the target die value.")]
    ValueTooSmall,

    #[error("Attacking die values do not sum up to target die value.")]
    SumMismatch,

    #[error("Target die value must be between the attacking die value and its size.")]
    OutsideShadowRange,

    #[error("Target die values do not sum up to attacking die value.")]
    TargetSumMismatch,

    #[error("Target die is too large for a trip attack.")]
    TripTooLarge,

    // === Fire ===
    #[error("Only fire dice that are not part of the attack can be turned down.")]
    NotFireDie,

    #[error("Fire dice can only be turned down within their range.")]
    BadTurndown,

    #[error("Fire dice were not turned down by the right amount.")]
    FireMismatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            AttackError::ExactlyOneAttacker(AttackType::Trip).to_string(),
            "There must be exactly one attacking die for a trip attack."
        );
        assert_eq!(
            AttackError::SkillForbids {
                skill: Skill::Stealth,
                attack: AttackType::Trip
            }
            .to_string(),
            "Stealth dice cannot perform trip attacks."
        );
        assert_eq!(
            AttackError::MissingSkill {
                skill: Skill::Trip,
                attack: AttackType::Trip
            }
            .to_string(),
            "Dice without trip cannot perform trip attacks."
        );
        assert_eq!(
            AttackError::ImmuneTarget {
                skill: Skill::Stealth,
                attack: AttackType::Trip
            }
            .to_string(),
            "Stealth dice cannot be the target of trip attacks."
        );
    }
}
