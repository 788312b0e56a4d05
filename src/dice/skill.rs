//! The closed set of die skills and the hooks each one registers.

use serde::{Deserialize, Serialize};

use super::die::Die;
use super::hooks::{Handler, HookArgs, HookEvent};
use super::sides::{MAD_SIZES, MOOD_SIZES};
use crate::attack::AttackType;

/// A named modifier attached to a die.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Skill {
    Konstant,
    Maximum,
    Weak,
    Mighty,
    Mood,
    Mad,
    Stealth,
    Warrior,
    Trip,
    Shadow,
    Speed,
    Berserk,
    Focus,
    Chance,
    Fire,
    Auxiliary,
    Reserve,
}

impl Skill {
    pub const ALL: [Skill; 17] = [
        Skill::Konstant,
        Skill::Maximum,
        Skill::Weak,
        Skill::Mighty,
        Skill::Mood,
        Skill::Mad,
        Skill::Stealth,
        Skill::Warrior,
        Skill::Trip,
        Skill::Shadow,
        Skill::Speed,
        Skill::Berserk,
        Skill::Focus,
        Skill::Chance,
        Skill::Fire,
        Skill::Auxiliary,
        Skill::Reserve,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Skill::Konstant => "Konstant",
            Skill::Maximum => "Maximum",
            Skill::Weak => "Weak",
            Skill::Mighty => "Mighty",
            Skill::Mood => "Mood",
            Skill::Mad => "Mad",
            Skill::Stealth => "Stealth",
            Skill::Warrior => "Warrior",
            Skill::Trip => "Trip",
            Skill::Shadow => "Shadow",
            Skill::Speed => "Speed",
            Skill::Berserk => "Berserk",
            Skill::Focus => "Focus",
            Skill::Chance => "Chance",
            Skill::Fire => "Fire",
            Skill::Auxiliary => "Auxiliary",
            Skill::Reserve => "Reserve",
        }
    }

    /// Single-character recipe code.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Skill::Konstant => 'k',
            Skill::Maximum => 'M',
            Skill::Weak => 'h',
            Skill::Mighty => 'H',
            Skill::Mood => '?',
            Skill::Mad => '&',
            Skill::Stealth => 'd',
            Skill::Warrior => '`',
            Skill::Trip => 't',
            Skill::Shadow => 's',
            Skill::Speed => 'z',
            Skill::Berserk => 'B',
            Skill::Focus => 'f',
            Skill::Chance => 'c',
            Skill::Fire => 'F',
            Skill::Auxiliary => '+',
            Skill::Reserve => 'r',
        }
    }

    #[must_use]
    pub fn from_code(code: char) -> Option<Skill> {
        Skill::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Events this skill handles, with their handlers.
    #[must_use]
    pub fn hooks(self) -> &'static [(HookEvent, Handler)] {
        match self {
            Skill::Konstant => KONSTANT_HOOKS,
            Skill::Maximum => MAXIMUM_HOOKS,
            Skill::Weak => WEAK_HOOKS,
            Skill::Mighty => MIGHTY_HOOKS,
            Skill::Mood => MOOD_HOOKS,
            Skill::Mad => MAD_HOOKS,
            Skill::Stealth | Skill::Trip => NO_INITIATIVE_HOOKS,
            Skill::Warrior => WARRIOR_HOOKS,
            Skill::Berserk => BERSERK_HOOKS,
            Skill::Fire => FIRE_HOOKS,
            Skill::Shadow
            | Skill::Speed
            | Skill::Focus
            | Skill::Chance
            | Skill::Auxiliary
            | Skill::Reserve => &[],
        }
    }
}

impl std::fmt::Display for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Skill {
    type Err = String;

    /// Accepts either the full name (case-insensitive) or the recipe code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(skill) = Skill::from_code(c) {
                return Ok(skill);
            }
        }
        Skill::ALL
            .into_iter()
            .find(|skill| skill.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown skill '{}'", s))
    }
}

static KONSTANT_HOOKS: &[(HookEvent, Handler)] = &[
    (HookEvent::PreRoll, Handler::Mutate(konstant_pre_roll)),
    (HookEvent::AttackValues, Handler::Inspect(konstant_attack_values)),
];
static MAXIMUM_HOOKS: &[(HookEvent, Handler)] = &[(HookEvent::PostRoll, Handler::Mutate(roll_to_max))];
static WEAK_HOOKS: &[(HookEvent, Handler)] = &[(HookEvent::PreRoll, Handler::Mutate(weak_pre_roll))];
static MIGHTY_HOOKS: &[(HookEvent, Handler)] = &[(HookEvent::PreRoll, Handler::Mutate(mighty_pre_roll))];
static MOOD_HOOKS: &[(HookEvent, Handler)] = &[(HookEvent::PreRoll, Handler::Mutate(mood_pre_roll))];
static MAD_HOOKS: &[(HookEvent, Handler)] = &[(HookEvent::PreRoll, Handler::Mutate(mad_pre_roll))];
static NO_INITIATIVE_HOOKS: &[(HookEvent, Handler)] =
    &[(HookEvent::InitiativeValues, Handler::Inspect(skip_initiative))];
static WARRIOR_HOOKS: &[(HookEvent, Handler)] = &[
    (HookEvent::PostRoll, Handler::Mutate(roll_to_max)),
    (HookEvent::Capture, Handler::Mutate(warrior_capture)),
];
static BERSERK_HOOKS: &[(HookEvent, Handler)] = &[(HookEvent::Capture, Handler::Mutate(berserk_capture))];
static FIRE_HOOKS: &[(HookEvent, Handler)] = &[(HookEvent::AssistValues, Handler::Inspect(fire_assist))];

// Once a konstant die has a value it never rerolls.
fn konstant_pre_roll(die: &mut Die, _args: &mut HookArgs<'_>) {
    if die.value().is_some() {
        die.does_reroll = false;
    }
}

fn konstant_attack_values(die: &Die, args: &mut HookArgs<'_>) {
    if let HookArgs::Values {
        attack: Some(AttackType::Skill),
        values,
    } = args
    {
        if let Some(v) = die.value() {
            if v != 0 && !values.contains(&-v) {
                values.push(-v);
            }
        }
    }
}

fn roll_to_max(die: &mut Die, _args: &mut HookArgs<'_>) {
    die.set_to_max();
}

fn weak_pre_roll(die: &mut Die, args: &mut HookArgs<'_>) {
    if let HookArgs::Roll {
        successful_attack: true,
        ..
    } = args
    {
        die.shrink();
    }
}

fn mighty_pre_roll(die: &mut Die, args: &mut HookArgs<'_>) {
    if let HookArgs::Roll {
        successful_attack: true,
        ..
    } = args
    {
        die.grow();
    }
}

fn mood_pre_roll(die: &mut Die, args: &mut HookArgs<'_>) {
    if let HookArgs::Roll {
        successful_attack: true,
        rng,
    } = args
    {
        die.resize_random(MOOD_SIZES, rng);
    }
}

fn mad_pre_roll(die: &mut Die, args: &mut HookArgs<'_>) {
    if let HookArgs::Roll {
        successful_attack: true,
        rng,
    } = args
    {
        die.resize_random(MAD_SIZES, rng);
    }
}

fn skip_initiative(_die: &Die, args: &mut HookArgs<'_>) {
    if let HookArgs::Values { values, .. } = args {
        values.clear();
    }
}

fn warrior_capture(die: &mut Die, _args: &mut HookArgs<'_>) {
    die.remove_skill(Skill::Warrior);
}

fn berserk_capture(die: &mut Die, args: &mut HookArgs<'_>) {
    if let HookArgs::Capture {
        attack: AttackType::Berserk,
        ..
    } = args
    {
        die.halve();
        die.remove_skill(Skill::Berserk);
    }
}

fn fire_assist(die: &Die, args: &mut HookArgs<'_>) {
    if let HookArgs::Assist {
        attack: AttackType::Power | AttackType::Skill,
        attackers,
        defenders,
        values,
    } = args
    {
        if attackers.contains(&die.id) || defenders.contains(&die.id) {
            return;
        }
        if let Some(v) = die.value() {
            values.clear();
            values.extend(0..=(v - die.min()));
        }
    }
}
