//! Buttons: named, ordered die templates parsed from a recipe.
//!
//! ```
//! use dice_duel::button::Button;
//!
//! let button = Button::new("Avis", "4 4 10 12 z20").unwrap();
//! assert_eq!(button.len(), 5);
//! ```

pub mod recipe;

use serde::{Deserialize, Serialize};

use crate::dice::Skill;

pub use recipe::{parse_recipe, DieTemplate, RecipeError};

/// A parsed button. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    name: String,
    recipe: String,
    templates: Vec<DieTemplate>,
}

impl Button {
    /// Parse `recipe` into a button named `name`.
    pub fn new(name: impl Into<String>, recipe: &str) -> Result<Self, RecipeError> {
        let templates = parse_recipe(recipe)?;
        Ok(Self {
            name: name.into(),
            recipe: recipe.to_string(),
            templates,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn recipe(&self) -> &str {
        &self.recipe
    }

    #[must_use]
    pub fn templates(&self) -> &[DieTemplate] {
        &self.templates
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Templates in play from the first round: everything except
    /// auxiliary and reserve dice.
    pub fn starting_dice(&self) -> impl Iterator<Item = &DieTemplate> {
        self.templates
            .iter()
            .filter(|t| !t.has_skill(Skill::Auxiliary) && !t.has_skill(Skill::Reserve))
    }

    pub fn auxiliary_dice(&self) -> impl Iterator<Item = &DieTemplate> {
        self.templates.iter().filter(|t| t.has_skill(Skill::Auxiliary))
    }

    pub fn reserve_dice(&self) -> impl Iterator<Item = &DieTemplate> {
        self.templates.iter().filter(|t| t.has_skill(Skill::Reserve))
    }
}

impl std::fmt::Display for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.recipe)
    }
}
