use super::nutrient::{Nutrient, NutrientProfile};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutrientRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NutrientRange {
    pub const fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub const fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

impl fmt::Display for NutrientRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "{}-{}%", min, max),
            (Some(min), None) => write!(f, "{}% or more", min),
            (None, Some(max)) => write!(f, "up to {}%", max),
            (None, None) => write!(f, "any"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advisory {
    pub nutrient: Nutrient,
    pub actual: f64,
    pub recommended: NutrientRange,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {:.2}% is outside the recommended range ({})",
            self.nutrient, self.actual, self.recommended
        )
    }
}

/// Recommended nutrient ranges for a ration. Checking a mix against them never fails; it
/// only produces advisories for display next to the result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guidelines {
    pub protein: NutrientRange,
    pub fat: NutrientRange,
    pub fiber: NutrientRange,
    pub lysine: NutrientRange,
}

impl Guidelines {
    /// Growing pigs, roughly 150 lb up to show day.
    pub const GROWING_PIG: Guidelines = Guidelines {
        protein: NutrientRange::at_least(16.0),
        fat: NutrientRange::between(3.5, 6.5),
        fiber: NutrientRange::between(3.0, 6.0),
        lysine: NutrientRange::between(0.90, 1.0),
    };

    pub fn range(&self, nutrient: Nutrient) -> NutrientRange {
        match nutrient {
            Nutrient::Protein => self.protein,
            Nutrient::Fat => self.fat,
            Nutrient::Fiber => self.fiber,
            Nutrient::Lysine => self.lysine,
        }
    }

    pub fn check(&self, profile: &NutrientProfile) -> Vec<Advisory> {
        Nutrient::ALL
            .into_iter()
            .filter_map(|nutrient| {
                let actual = profile.get(nutrient);
                let recommended = self.range(nutrient);
                (!recommended.contains(actual)).then_some(Advisory {
                    nutrient,
                    actual,
                    recommended,
                })
            })
            .collect()
    }
}

impl Default for Guidelines {
    fn default() -> Self {
        Self::GROWING_PIG
    }
}
