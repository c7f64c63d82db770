use crate::core::models::nutrient::NutrientProfile;
use crate::engine::config::{OptimizerConfig, PricePenalties};
use crate::engine::proportions::Proportions;
use crate::engine::role::IngredientRole;
use crate::engine::utils::sampling::sample_band;
use rand::Rng;
use tracing::{debug, instrument, trace};

/// Per-ingredient multipliers derived from known prices.
///
/// Returns `None` when fewer than two ingredients have a known (positive) price, in which
/// case there is nothing to compare and seeding ignores prices. Unknown prices get a factor
/// of one.
pub fn price_factors(prices: &[f64], penalties: &PricePenalties) -> Option<Vec<f64>> {
    let known: Vec<f64> = prices.iter().copied().filter(|p| *p > 0.0).collect();
    if known.len() < 2 {
        return None;
    }

    let min_price = known.iter().copied().fold(f64::INFINITY, f64::min);
    let max_price = known.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max_price - min_price;
    let spread = penalties.cheapest_factor - penalties.priciest_factor;

    let factors = prices
        .iter()
        .map(|&price| {
            if price <= 0.0 {
                return 1.0;
            }
            let mut factor = if range > 0.0 {
                penalties.cheapest_factor - (price - min_price) / range * spread
            } else {
                0.5 * (penalties.cheapest_factor + penalties.priciest_factor)
            };
            if price > penalties.expensive_threshold {
                factor *= penalties.expensive_factor;
            } else if price > penalties.premium_threshold {
                factor *= penalties.premium_factor;
            }
            factor
        })
        .collect();

    Some(factors)
}

/// Builds the starting proportions.
///
/// Each ingredient draws a share from the band of its role, so repeated calls with the same
/// inputs start from different points unless the caller fixes the random source. Exactly
/// one draw is made per ingredient, in input order, whether or not prices are used.
#[instrument(level = "debug", skip_all, fields(ingredients = profiles.len(), use_prices = use_price_optimization))]
pub fn run(
    profiles: &[NutrientProfile],
    prices: &[f64],
    use_price_optimization: bool,
    config: &OptimizerConfig,
    rng: &mut impl Rng,
) -> Proportions {
    let mut weights: Vec<f64> = profiles
        .iter()
        .map(|profile| {
            let role = IngredientRole::classify(profile);
            let weight = sample_band(role.seed_band(&config.seed_bands), rng);
            trace!(%role, weight, "Seed drawn.");
            weight
        })
        .collect();

    if use_price_optimization {
        match price_factors(prices, &config.pricing) {
            Some(factors) => {
                for (weight, factor) in weights.iter_mut().zip(factors) {
                    *weight *= factor;
                }
                debug!("Applied price bias to seed proportions.");
            }
            None => {
                debug!("Fewer than two known prices; seeding without price bias.");
            }
        }
    }

    Proportions::from_weights(weights)
}
