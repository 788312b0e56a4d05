//! Recipe grammar.
//!
//! ```text
//! recipe := token (whitespace token)*
//! token  := skill* size skill*
//! size   := digits | "(" digits "," digits ")"
//! skill  := code | name
//! ```
//!
//! A skill run may be a full skill name (`Konstant20`) or a string of
//! single-character codes (`kz20`, `20?`).

use serde::{Deserialize, Serialize};

use crate::core::{DieId, PlayerId};
use crate::dice::{parse_single_sides, Die, Sides, Skill};

/// Errors from parsing a recipe.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RecipeError {
    #[error("Invalid button recipe: '{0}' has no die size.")]
    NoDigit(String),

    #[error("Invalid button recipe: unknown skill '{skill}' in '{token}'.")]
    UnknownSkill { token: String, skill: String },

    #[error("Invalid button recipe: bad die size in '{0}'.")]
    BadSides(String),

    #[error("Invalid button recipe: bad twin die '{0}'.")]
    BadTwin(String),

    #[error("Invalid button recipe: no dice.")]
    Empty,
}

/// One die position in a button.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DieTemplate {
    pub sides: Sides,
    pub skills: Vec<Skill>,
}

impl DieTemplate {
    #[must_use]
    pub fn has_skill(&self, skill: Skill) -> bool {
        self.skills.contains(&skill)
    }

    /// Create a fresh, unrolled die from this template.
    #[must_use]
    pub fn instantiate(&self, id: DieId, owner: PlayerId) -> Die {
        Die::with_skills(id, owner, self.sides, self.skills.iter().copied())
    }
}

impl std::fmt::Display for DieTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for skill in &self.skills {
            write!(f, "{}", skill.code())?;
        }
        write!(f, "{}", self.sides)
    }
}

impl std::str::FromStr for DieTemplate {
    type Err = RecipeError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        parse_token(token)
    }
}

/// Parse a whole recipe into die templates, in token order.
pub fn parse_recipe(recipe: &str) -> Result<Vec<DieTemplate>, RecipeError> {
    let templates = recipe
        .split_whitespace()
        .map(parse_token)
        .collect::<Result<Vec<_>, _>>()?;
    if templates.is_empty() {
        return Err(RecipeError::Empty);
    }
    Ok(templates)
}

fn parse_token(token: &str) -> Result<DieTemplate, RecipeError> {
    if !token.bytes().any(|b| b.is_ascii_digit()) {
        return Err(RecipeError::NoDigit(token.to_string()));
    }

    let mut sides = None;
    let mut skills = Vec::new();
    let mut rest = token;

    while !rest.is_empty() {
        let next = rest.as_bytes()[0];
        let consumed = if next == b'(' {
            let end = rest
                .find(')')
                .ok_or_else(|| RecipeError::BadTwin(token.to_string()))?;
            set_sides(&mut sides, parse_twin(&rest[1..end], token)?, token)?;
            end + 1
        } else if next.is_ascii_digit() {
            let end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            let n = parse_single_sides(&rest[..end]).map_err(|_| RecipeError::BadSides(token.to_string()))?;
            set_sides(&mut sides, Sides::Single(n), token)?;
            end
        } else {
            let end = rest
                .find(|c: char| c.is_ascii_digit() || c == '(')
                .unwrap_or(rest.len());
            parse_skill_run(&rest[..end], token, &mut skills)?;
            end
        };
        rest = &rest[consumed..];
    }

    let sides = sides.ok_or_else(|| RecipeError::BadSides(token.to_string()))?;
    Ok(DieTemplate { sides, skills })
}

fn set_sides(slot: &mut Option<Sides>, sides: Sides, token: &str) -> Result<(), RecipeError> {
    if slot.is_some() {
        return Err(RecipeError::BadSides(token.to_string()));
    }
    *slot = Some(sides);
    Ok(())
}

fn parse_twin(inner: &str, token: &str) -> Result<Sides, RecipeError> {
    let bad = || RecipeError::BadTwin(token.to_string());
    let (a, b) = inner.split_once(',').ok_or_else(bad)?;
    let a = parse_single_sides(a.trim()).map_err(|_| bad())?;
    let b = parse_single_sides(b.trim()).map_err(|_| bad())?;
    Ok(Sides::Twin(a, b))
}

fn parse_skill_run(run: &str, token: &str, skills: &mut Vec<Skill>) -> Result<(), RecipeError> {
    let mut push = |skill: Skill| {
        if !skills.contains(&skill) {
            skills.push(skill);
        }
    };

    if run.chars().count() > 1 {
        if let Some(skill) = Skill::ALL.into_iter().find(|s| s.name().eq_ignore_ascii_case(run)) {
            push(skill);
            return Ok(());
        }
    }

    for c in run.chars() {
        let skill = Skill::from_code(c).ok_or_else(|| RecipeError::UnknownSkill {
            token: token.to_string(),
            skill: c.to_string(),
        })?;
        push(skill);
    }
    Ok(())
}
