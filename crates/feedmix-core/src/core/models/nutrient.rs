use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nutrient {
    Protein, // Crude protein
    Fat,     // Crude fat
    Fiber,   // Crude fiber
    Lysine,  // Total lysine
}

impl Nutrient {
    pub const ALL: [Nutrient; 4] = [
        Nutrient::Protein,
        Nutrient::Fat,
        Nutrient::Fiber,
        Nutrient::Lysine,
    ];
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown nutrient name: '{0}'")]
pub struct ParseNutrientError(pub String);

impl FromStr for Nutrient {
    type Err = ParseNutrientError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "protein" | "crude-protein" | "cp" => Ok(Nutrient::Protein),
            "fat" | "crude-fat" => Ok(Nutrient::Fat),
            "fiber" | "fibre" | "crude-fiber" => Ok(Nutrient::Fiber),
            "lysine" | "lys" => Ok(Nutrient::Lysine),
            _ => Err(ParseNutrientError(s.to_string())),
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Nutrient::Protein => "Protein",
                Nutrient::Fat => "Fat",
                Nutrient::Fiber => "Fiber",
                Nutrient::Lysine => "Lysine",
            }
        )
    }
}

/// Nutrient content expressed as percentages of mass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutrientProfile {
    pub protein: f64,
    pub fat: f64,
    pub fiber: f64,
    pub lysine: f64,
}

impl NutrientProfile {
    pub fn new(protein: f64, fat: f64, fiber: f64, lysine: f64) -> Self {
        Self {
            protein,
            fat,
            fiber,
            lysine,
        }
    }

    #[inline]
    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Protein => self.protein,
            Nutrient::Fat => self.fat,
            Nutrient::Fiber => self.fiber,
            Nutrient::Lysine => self.lysine,
        }
    }

    /// Sum of profiles scaled by their weights. With proportions that sum to one this is the
    /// mass-weighted average of the blend.
    pub fn weighted_sum<'a, I>(parts: I) -> Self
    where
        I: IntoIterator<Item = (&'a NutrientProfile, f64)>,
    {
        parts
            .into_iter()
            .fold(Self::default(), |acc, (profile, weight)| Self {
                protein: acc.protein + profile.protein * weight,
                fat: acc.fat + profile.fat * weight,
                fiber: acc.fiber + profile.fiber * weight,
                lysine: acc.lysine + profile.lysine * weight,
            })
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            protein: self.protein * factor,
            fat: self.fat * factor,
            fiber: self.fiber * factor,
            lysine: self.lysine * factor,
        }
    }

    /// Signed difference `self - other`, per nutrient.
    pub fn difference(&self, other: &NutrientProfile) -> Self {
        Self {
            protein: self.protein - other.protein,
            fat: self.fat - other.fat,
            fiber: self.fiber - other.fiber,
            lysine: self.lysine - other.lysine,
        }
    }
}

/// The caller's request: how much feed to make and what it should contain.
///
/// Target percentages are not checked for plausibility; unreachable targets simply produce
/// a best-effort mix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutrientTargets {
    pub total_weight: f64,
    pub profile: NutrientProfile,
}

impl NutrientTargets {
    pub fn new(total_weight: f64, profile: NutrientProfile) -> Self {
        Self {
            total_weight,
            profile,
        }
    }
}

impl Default for NutrientTargets {
    /// Daily ration for one growing pig: 6 lb of feed at 16% protein, 5% fat, 4.5% fiber and
    /// 0.95% lysine.
    fn default() -> Self {
        Self {
            total_weight: 6.0,
            profile: NutrientProfile::new(16.0, 5.0, 4.5, 0.95),
        }
    }
}
