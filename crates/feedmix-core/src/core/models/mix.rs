use super::ingredient::Ingredient;
use super::nutrient::{NutrientProfile, NutrientTargets};
use crate::core::pricing::PriceOracle;
use serde::{Deserialize, Serialize};

/// One line of a finished mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixEntry {
    pub name: String,
    pub mass: f64,    // Mass in pounds, rounded to two decimals
    pub percent: f64, // Share of the total mass, 0-100
}

impl MixEntry {
    /// Builds entries from `(name, mass)` pairs, filling in each entry's share of the total.
    pub fn from_masses<I, S>(masses: I) -> Vec<MixEntry>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut entries: Vec<MixEntry> = masses
            .into_iter()
            .map(|(name, mass)| MixEntry {
                name: name.into(),
                mass,
                percent: 0.0,
            })
            .collect();

        let total: f64 = entries.iter().map(|e| e.mass).sum();
        if total > 0.0 {
            for entry in &mut entries {
                entry.percent = entry.mass / total * 100.0;
            }
        }
        entries
    }
}

/// Aggregate composition of a mix.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MixProfile {
    pub total_weight: f64,
    pub nutrients: NutrientProfile,
    /// Total cost over ingredients with a known price; `None` when no price is known.
    pub total_cost: Option<f64>,
}

impl MixProfile {
    /// Computes the mass-weighted nutrient averages of `(ingredient, mass)` pairs.
    ///
    /// Entries with a non-positive mass are ignored. An empty or weightless mix yields the
    /// all-zero profile.
    pub fn compute<'a, I>(parts: I, prices: Option<&dyn PriceOracle>) -> Self
    where
        I: IntoIterator<Item = (&'a Ingredient, f64)>,
    {
        let mut total_weight = 0.0;
        let mut weighted = NutrientProfile::default();
        let mut total_cost: Option<f64> = None;

        for (ingredient, mass) in parts {
            if mass <= 0.0 {
                continue;
            }
            total_weight += mass;
            weighted = NutrientProfile::weighted_sum([(&weighted, 1.0), (&ingredient.profile, mass)]);

            if let Some(oracle) = prices {
                let price = oracle.price_per_pound(&ingredient.name);
                if price.is_finite() && price > 0.0 {
                    *total_cost.get_or_insert(0.0) += price * mass;
                }
            }
        }

        if total_weight <= 0.0 {
            return Self::default();
        }

        Self {
            total_weight,
            nutrients: weighted.scaled(1.0 / total_weight),
            total_cost,
        }
    }

    /// Signed per-nutrient difference between this mix and the targets.
    pub fn deviation(&self, targets: &NutrientTargets) -> NutrientProfile {
        self.nutrients.difference(&targets.profile)
    }
}
