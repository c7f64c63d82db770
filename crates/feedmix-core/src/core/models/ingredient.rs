use super::nutrient::{Nutrient, NutrientProfile};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum IngredientError {
    #[error("Ingredient name cannot be empty")]
    EmptyName,
    #[error("Ingredient '{name}' has invalid {nutrient} content: {value} (expected 0-100%)")]
    NutrientOutOfRange {
        name: String,
        nutrient: Nutrient,
        value: f64,
    },
}

/// A candidate feed ingredient. The name is the unique key within a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub profile: NutrientProfile,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, profile: NutrientProfile) -> Self {
        Self {
            name: name.into(),
            profile,
        }
    }

    pub fn validate(&self) -> Result<(), IngredientError> {
        if self.name.trim().is_empty() {
            return Err(IngredientError::EmptyName);
        }
        for nutrient in Nutrient::ALL {
            let value = self.profile.get(nutrient);
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(IngredientError::NutrientOutOfRange {
                    name: self.name.clone(),
                    nutrient,
                    value,
                });
            }
        }
        Ok(())
    }

    /// Ingredients without protein cannot take part in an optimization.
    #[inline]
    pub fn is_candidate(&self) -> bool {
        self.profile.protein > 0.0
    }
}

/// Keeps the ingredients that may be handed to the optimizer, preserving order.
pub fn candidates(ingredients: &[Ingredient]) -> Vec<Ingredient> {
    ingredients
        .iter()
        .filter(|i| i.is_candidate())
        .cloned()
        .collect()
}
