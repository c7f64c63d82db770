use super::config::ConfigError;
use crate::core::models::ingredient::IngredientError;
use crate::core::models::nutrient::Nutrient;
use thiserror::Error;

/// Precondition violations rejected before any optimization work starts.
///
/// Unreachable targets are not an error: the optimizer returns its best bounded attempt and
/// reports whether it converged.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("No ingredients to optimize")]
    NoIngredients,

    #[error("Target total weight must be positive and finite, got {0}")]
    InvalidTargetWeight(f64),

    #[error("Target {nutrient} must be finite, got {value}")]
    InvalidTarget { nutrient: Nutrient, value: f64 },

    #[error("Ingredient '{name}' has non-positive protein ({protein}) and cannot be optimized")]
    NonPositiveProtein { name: String, protein: f64 },

    #[error("Duplicate ingredient '{0}' in optimization request")]
    DuplicateIngredient(String),

    #[error(transparent)]
    Ingredient(#[from] IngredientError),

    #[error("Invalid optimizer configuration: {0}")]
    Config(#[from] ConfigError),
}
