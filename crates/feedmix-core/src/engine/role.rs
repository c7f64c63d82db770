use super::config::{ProportionBounds, SeedBand, SeedBands};
use crate::core::models::nutrient::NutrientProfile;
use std::fmt;

const LYSINE_SUPPLEMENT_MIN_LYSINE: f64 = 10.0;
const CONCENTRATE_MIN_PROTEIN: f64 = 25.0;
const MODERATE_MIN_PROTEIN: f64 = 15.0;
const STAPLE_MAX_PROTEIN: f64 = 10.0;
const STAPLE_MAX_FAT: f64 = 5.0;
const HIGH_FIBER_MIN_FIBER: f64 = 25.0;

/// The part an ingredient plays in a ration, judged only from its measured nutrients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngredientRole {
    LysineSupplement,   // Synthetic or concentrated lysine, a few percent at most
    ProteinConcentrate, // Soybean meal, fish meal and the like
    ModerateProtein,    // Mid-protein feeds such as alfalfa or distillers grains
    EnergyStaple,       // Low-protein, low-fat grains that make up the bulk
    Minor,              // Everything else
}

impl IngredientRole {
    pub fn classify(profile: &NutrientProfile) -> Self {
        if profile.lysine > LYSINE_SUPPLEMENT_MIN_LYSINE {
            IngredientRole::LysineSupplement
        } else if profile.protein > CONCENTRATE_MIN_PROTEIN {
            IngredientRole::ProteinConcentrate
        } else if profile.protein > MODERATE_MIN_PROTEIN {
            IngredientRole::ModerateProtein
        } else if profile.protein < STAPLE_MAX_PROTEIN && profile.fat < STAPLE_MAX_FAT {
            IngredientRole::EnergyStaple
        } else {
            IngredientRole::Minor
        }
    }

    pub fn seed_band(&self, bands: &SeedBands) -> SeedBand {
        match self {
            IngredientRole::LysineSupplement => bands.lysine_supplement,
            IngredientRole::ProteinConcentrate => bands.protein_concentrate,
            IngredientRole::ModerateProtein => bands.moderate_protein,
            IngredientRole::EnergyStaple => bands.energy_staple,
            IngredientRole::Minor => bands.minor,
        }
    }
}

impl fmt::Display for IngredientRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                IngredientRole::LysineSupplement => "Lysine Supplement",
                IngredientRole::ProteinConcentrate => "Protein Concentrate",
                IngredientRole::ModerateProtein => "Moderate Protein",
                IngredientRole::EnergyStaple => "Energy Staple",
                IngredientRole::Minor => "Minor",
            }
        )
    }
}

/// Largest share of the mix an ingredient may take.
///
/// Ceilings follow their own precedence (lysine, then protein, then fiber) and do not map
/// one-to-one onto [`IngredientRole`]: a high-fiber hull gets a tighter cap than a grain.
pub fn ceiling_for(profile: &NutrientProfile, bounds: &ProportionBounds) -> f64 {
    if profile.lysine > LYSINE_SUPPLEMENT_MIN_LYSINE {
        bounds.lysine_supplement_ceiling
    } else if profile.protein > CONCENTRATE_MIN_PROTEIN {
        bounds.protein_concentrate_ceiling
    } else if profile.fiber > HIGH_FIBER_MIN_FIBER {
        bounds.high_fiber_ceiling
    } else {
        bounds.default_ceiling
    }
}
