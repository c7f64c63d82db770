use crate::core::models::ingredient::Ingredient;
use crate::core::models::mix::{MixEntry, MixProfile};
use crate::core::models::nutrient::{Nutrient, NutrientProfile, NutrientTargets};
use crate::core::pricing::PriceOracle;
use crate::engine::config::OptimizerConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::proportions::{Limits, Proportions};
use crate::engine::tasks;
use rand::{Rng, thread_rng};
use std::collections::{HashMap, HashSet};
use tracing::{info, instrument, warn};

/// Inputs of one optimization call.
#[derive(Debug, Clone, Copy)]
pub struct OptimizationRequest<'a> {
    pub ingredients: &'a [Ingredient],
    pub targets: NutrientTargets,
    pub use_price_optimization: bool,
}

impl<'a> OptimizationRequest<'a> {
    pub fn new(ingredients: &'a [Ingredient], targets: NutrientTargets) -> Self {
        Self {
            ingredients,
            targets,
            use_price_optimization: false,
        }
    }

    pub fn with_price_optimization(mut self, enabled: bool) -> Self {
        self.use_price_optimization = enabled;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    /// One entry per input ingredient, in input order.
    pub entries: Vec<MixEntry>,
    /// Composition of the rounded masses in `entries`.
    pub profile: MixProfile,
    pub targets: NutrientTargets,
    pub iterations: usize,
    /// Whether the stop condition held. A `false` here means the mix is a best effort.
    pub converged: bool,
    /// Normalized starting proportions, before refinement and bound enforcement.
    pub seed: Vec<f64>,
}

impl OptimizationResult {
    pub fn masses(&self) -> HashMap<String, f64> {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), e.mass))
            .collect()
    }

    /// Signed difference between the achieved and the requested nutrient levels.
    pub fn deviation(&self) -> NutrientProfile {
        self.profile.deviation(&self.targets)
    }
}

#[inline]
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[instrument(skip_all, name = "optimization_workflow", fields(ingredients = request.ingredients.len()))]
pub fn run(
    request: &OptimizationRequest,
    prices: &dyn PriceOracle,
    config: &OptimizerConfig,
    reporter: &ProgressReporter,
    rng: &mut impl Rng,
) -> Result<OptimizationResult, EngineError> {
    // === Phase 0: Preconditions and price lookup ===
    validate_request(request, config)?;
    let ingredients = request.ingredients;
    let targets = request.targets;
    let price_list = prefetch_prices(ingredients, prices);
    let price_map: HashMap<String, f64> = ingredients
        .iter()
        .zip(&price_list)
        .map(|(i, &p)| (i.name.clone(), p))
        .collect();

    info!(
        weight = targets.total_weight,
        use_prices = request.use_price_optimization,
        "Starting optimization."
    );

    if let [single] = ingredients {
        info!(ingredient = %single.name, "Single candidate; assigning the full weight.");
        return Ok(single_ingredient_result(single, &targets, &price_map, config));
    }

    let profiles: Vec<NutrientProfile> = ingredients.iter().map(|i| i.profile).collect();

    // === Phase 1: Seeding ===
    reporter.report(Progress::PhaseStart { name: "Seeding" });
    let mut proportions = tasks::seeding::run(
        &profiles,
        &price_list,
        request.use_price_optimization,
        config,
        rng,
    );
    let seed = proportions.values().to_vec();
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Refinement ===
    reporter.report(Progress::PhaseStart { name: "Refinement" });
    let limits = Limits::for_profiles(&profiles, &config.bounds);
    if limits.floor_lowered() {
        warn!(
            floor = limits.get(0).floor,
            "Too many ingredients for the configured floor; lowering it."
        );
    }
    if limits.ceilings_lifted() {
        warn!("Proportion ceilings cannot hold the whole mix; uncapping the loosest class.");
    }
    let outcome = tasks::refinement::run(
        &mut proportions,
        &profiles,
        &limits,
        &targets.profile,
        config,
        reporter,
    );
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Materialization ===
    let result = materialize(
        ingredients,
        &proportions,
        &targets,
        &price_map,
        outcome.iterations,
        outcome.converged,
        seed,
    );

    reporter.report(Progress::Message(format!(
        "Finished after {} iteration(s){}",
        result.iterations,
        if result.converged {
            ""
        } else {
            "; targets not fully reached"
        }
    )));
    info!(
        iterations = result.iterations,
        converged = result.converged,
        protein = result.profile.nutrients.protein,
        lysine = result.profile.nutrients.lysine,
        "Optimization complete."
    );
    Ok(result)
}

/// Optimizes with the default configuration and a thread-local random source, returning
/// ingredient name to assigned mass.
pub fn optimize(
    ingredients: &[Ingredient],
    targets: NutrientTargets,
    use_price_optimization: bool,
    prices: &dyn PriceOracle,
) -> Result<HashMap<String, f64>, EngineError> {
    let request =
        OptimizationRequest::new(ingredients, targets).with_price_optimization(use_price_optimization);
    let result = run(
        &request,
        prices,
        &OptimizerConfig::default(),
        &ProgressReporter::new(),
        &mut thread_rng(),
    )?;
    Ok(result.masses())
}

fn validate_request(
    request: &OptimizationRequest,
    config: &OptimizerConfig,
) -> Result<(), EngineError> {
    config.validate()?;

    if request.ingredients.is_empty() {
        return Err(EngineError::NoIngredients);
    }

    let weight = request.targets.total_weight;
    if !(weight.is_finite() && weight > 0.0) {
        return Err(EngineError::InvalidTargetWeight(weight));
    }
    for nutrient in Nutrient::ALL {
        let value = request.targets.profile.get(nutrient);
        if !value.is_finite() {
            return Err(EngineError::InvalidTarget { nutrient, value });
        }
    }

    let mut seen = HashSet::with_capacity(request.ingredients.len());
    for ingredient in request.ingredients {
        ingredient.validate()?;
        if ingredient.profile.protein <= 0.0 {
            return Err(EngineError::NonPositiveProtein {
                name: ingredient.name.clone(),
                protein: ingredient.profile.protein,
            });
        }
        if !seen.insert(ingredient.name.as_str()) {
            return Err(EngineError::DuplicateIngredient(ingredient.name.clone()));
        }
    }
    Ok(())
}

/// Looks up every ingredient's price once. Negative or non-finite prices count as unknown.
fn prefetch_prices(ingredients: &[Ingredient], oracle: &dyn PriceOracle) -> Vec<f64> {
    ingredients
        .iter()
        .map(|ingredient| {
            let price = oracle.price_per_pound(&ingredient.name);
            if price.is_finite() && price >= 0.0 {
                price
            } else {
                warn!(ingredient = %ingredient.name, price, "Ignoring invalid price.");
                0.0
            }
        })
        .collect()
}

fn single_ingredient_result(
    ingredient: &Ingredient,
    targets: &NutrientTargets,
    prices: &HashMap<String, f64>,
    config: &OptimizerConfig,
) -> OptimizationResult {
    let entries = MixEntry::from_masses([(ingredient.name.clone(), targets.total_weight)]);
    let profile = MixProfile::compute(
        [(ingredient, targets.total_weight)],
        Some(prices as &dyn PriceOracle),
    );
    let errors = profile.nutrients.difference(&targets.profile);

    OptimizationResult {
        entries,
        profile,
        targets: *targets,
        iterations: 0,
        converged: tasks::refinement::is_converged(&errors, config),
        seed: vec![1.0],
    }
}

fn materialize(
    ingredients: &[Ingredient],
    proportions: &Proportions,
    targets: &NutrientTargets,
    prices: &HashMap<String, f64>,
    iterations: usize,
    converged: bool,
    seed: Vec<f64>,
) -> OptimizationResult {
    let masses: Vec<f64> = proportions
        .values()
        .iter()
        .map(|&p| round2(p * targets.total_weight))
        .collect();

    let entries = MixEntry::from_masses(
        ingredients
            .iter()
            .zip(&masses)
            .map(|(i, &mass)| (i.name.clone(), mass)),
    );
    let profile = MixProfile::compute(
        ingredients.iter().zip(masses.iter().copied()),
        Some(prices as &dyn PriceOracle),
    );

    OptimizationResult {
        entries,
        profile,
        targets: *targets,
        iterations,
        converged,
        seed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pricing::NoPrices;
    use crate::engine::config::ConfigError;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::{Arc, Mutex};

    fn corn() -> Ingredient {
        Ingredient::new("Corn", NutrientProfile::new(8.0, 4.0, 2.0, 0.3))
    }
    fn soybean_meal() -> Ingredient {
        Ingredient::new("Soybean Meal", NutrientProfile::new(44.0, 1.0, 7.0, 2.8))
    }
    fn milo() -> Ingredient {
        Ingredient::new("Milo", NutrientProfile::new(9.0, 3.0, 2.5, 0.22))
    }
    fn lysine_hcl() -> Ingredient {
        Ingredient::new("L-Lysine HCl", NutrientProfile::new(95.0, 0.0, 0.0, 78.0))
    }
    fn soy_hulls() -> Ingredient {
        Ingredient::new("Soybean Hulls", NutrientProfile::new(11.0, 2.0, 34.0, 0.7))
    }

    fn pig_targets() -> NutrientTargets {
        NutrientTargets::new(6.0, NutrientProfile::new(16.0, 3.0, 3.0, 1.0))
    }

    fn run_seeded(
        ingredients: &[Ingredient],
        targets: NutrientTargets,
        prices: &dyn PriceOracle,
        use_prices: bool,
        seed: u64,
    ) -> Result<OptimizationResult, EngineError> {
        let request =
            OptimizationRequest::new(ingredients, targets).with_price_optimization(use_prices);
        run(
            &request,
            prices,
            &OptimizerConfig::default(),
            &ProgressReporter::new(),
            &mut StdRng::seed_from_u64(seed),
        )
    }

    fn assert_mix_invariants(result: &OptimizationResult, weight: f64) {
        let n = result.entries.len() as f64;
        let total: f64 = result.entries.iter().map(|e| e.mass).sum();
        assert!(
            (total - weight).abs() <= 0.01 * n,
            "total {} vs weight {}",
            total,
            weight
        );
        for entry in &result.entries {
            assert!(
                entry.mass >= 0.01 * weight - 0.005,
                "{} got {} below floor",
                entry.name,
                entry.mass
            );
        }
    }

    #[test]
    fn masses_sum_to_target_weight_and_respect_floor() {
        let ingredients = [corn(), soybean_meal(), milo(), soy_hulls(), lysine_hcl()];
        for seed in 0..20 {
            let result = run_seeded(&ingredients, pig_targets(), &NoPrices, false, seed).unwrap();
            assert_mix_invariants(&result, 6.0);
            assert!(result.iterations <= 100);
        }
    }

    #[test]
    fn lysine_supplement_never_exceeds_five_percent() {
        let ingredients = [corn(), soybean_meal(), lysine_hcl()];
        let targets = NutrientTargets::new(100.0, NutrientProfile::new(20.0, 3.0, 3.0, 4.0));
        for seed in 0..20 {
            let result = run_seeded(&ingredients, targets, &NoPrices, false, seed).unwrap();
            let lysine = result.masses()["L-Lysine HCl"];
            assert!(lysine <= 5.0 + 0.005, "lysine HCl mass {}", lysine);
        }
    }

    #[test]
    fn single_ingredient_takes_the_whole_weight() {
        let ingredients = [soybean_meal()];
        let targets = NutrientTargets::new(7.25, NutrientProfile::new(16.0, 3.0, 3.0, 1.0));
        let result = run_seeded(&ingredients, targets, &NoPrices, false, 0).unwrap();

        assert_eq!(result.masses()["Soybean Meal"], 7.25);
        assert_eq!(result.iterations, 0);
        assert!(!result.converged);
        assert_eq!(result.entries[0].percent, 100.0);
    }

    #[test]
    fn corn_and_soybean_meal_reach_protein_target() {
        let ingredients = [corn(), soybean_meal()];
        for seed in 0..10 {
            let result = run_seeded(&ingredients, pig_targets(), &NoPrices, false, seed).unwrap();
            let masses = result.masses();
            let corn_share = masses["Corn"] / 6.0;

            assert!(
                (0.70..=0.85).contains(&corn_share),
                "corn share {}",
                corn_share
            );
            assert!((masses["Corn"] + masses["Soybean Meal"] - 6.0).abs() <= 0.02);
            assert!(
                result.deviation().protein.abs() < 0.5,
                "protein {}",
                result.profile.nutrients.protein
            );
        }
    }

    #[test]
    fn feasible_two_ingredient_target_converges() {
        // Both are minor feeds capped at 65%; an even blend hits both targets exactly.
        let ingredients = [
            Ingredient::new("Feed A", NutrientProfile::new(5.0, 5.0, 3.0, 0.2)),
            Ingredient::new("Feed B", NutrientProfile::new(15.0, 2.0, 3.0, 0.8)),
        ];
        let targets = NutrientTargets::new(10.0, NutrientProfile::new(10.0, 3.5, 3.0, 0.5));
        for seed in 0..20 {
            let result = run_seeded(&ingredients, targets, &NoPrices, false, seed).unwrap();
            assert!(result.converged, "seed {} did not converge", seed);
            assert!(result.iterations <= 100);
            let deviation = result.deviation();
            // Rounded masses may shift the profile by a hair.
            assert!(deviation.protein.abs() < 0.1 + 0.01);
            assert!(deviation.lysine.abs() < 0.05);
        }
    }

    #[test]
    fn repeated_unseeded_runs_keep_invariants() {
        let ingredients = [corn(), soybean_meal(), milo(), lysine_hcl()];
        for _ in 0..25 {
            let masses = optimize(&ingredients, pig_targets(), false, &NoPrices).unwrap();
            let total: f64 = masses.values().sum();
            assert!((total - 6.0).abs() <= 0.04);
            assert!(masses.values().all(|&m| m >= 0.06 - 0.005));
            assert!(masses["L-Lysine HCl"] <= 0.30 + 0.005);
        }
    }

    #[test]
    fn expensive_ingredient_gets_a_smaller_seed_on_average() {
        let ingredients = [corn(), soybean_meal()];
        let prices: HashMap<String, f64> =
            HashMap::from([("Corn".to_string(), 0.30), ("Soybean Meal".to_string(), 6.0)]);

        let average_seed = |use_prices: bool| -> f64 {
            (0..50)
                .map(|seed| {
                    run_seeded(&ingredients, pig_targets(), &prices, use_prices, seed)
                        .unwrap()
                        .seed[1]
                })
                .sum::<f64>()
                / 50.0
        };

        let plain = average_seed(false);
        let biased = average_seed(true);
        assert!(biased < plain * 0.2, "biased {} vs plain {}", biased, plain);
    }

    #[test]
    fn total_cost_uses_prefetched_prices() {
        let ingredients = [corn(), soybean_meal()];
        let prices = |name: &str| match name {
            "Corn" => 0.10,
            "Soybean Meal" => 0.25,
            _ => 0.0,
        };
        let result = run_seeded(&ingredients, pig_targets(), &prices, true, 3).unwrap();
        let masses = result.masses();
        let expected = masses["Corn"] * 0.10 + masses["Soybean Meal"] * 0.25;
        let cost = result.profile.total_cost.unwrap();
        assert!((cost - expected).abs() < 1e-9);
    }

    #[test]
    fn invalid_oracle_prices_are_treated_as_unknown() {
        let prices = |name: &str| if name == "Corn" { -1.0 } else { f64::NAN };
        let ingredients = [corn(), soybean_meal()];
        let result = run_seeded(&ingredients, pig_targets(), &prices, true, 1).unwrap();
        assert_eq!(result.profile.total_cost, None);
    }

    #[test]
    fn same_seed_reproduces_the_mix() {
        let ingredients = [corn(), soybean_meal(), milo()];
        let a = run_seeded(&ingredients, pig_targets(), &NoPrices, false, 11).unwrap();
        let b = run_seeded(&ingredients, pig_targets(), &NoPrices, false, 11).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn progress_reports_both_phases() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |p| {
            if let Progress::PhaseStart { name } = p {
                sink.lock().unwrap().push(name);
            }
        }));
        let ingredients = [corn(), soybean_meal()];
        let request = OptimizationRequest::new(&ingredients, pig_targets());

        run(
            &request,
            &NoPrices,
            &OptimizerConfig::default(),
            &reporter,
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();

        assert_eq!(*events.lock().unwrap(), vec!["Seeding", "Refinement"]);
    }

    #[test]
    fn empty_ingredient_list_is_rejected() {
        let result = run_seeded(&[], pig_targets(), &NoPrices, false, 0);
        assert_eq!(result, Err(EngineError::NoIngredients));
    }

    #[test]
    fn non_positive_weight_is_rejected() {
        let targets = NutrientTargets::new(0.0, NutrientProfile::new(16.0, 3.0, 3.0, 1.0));
        let result = run_seeded(&[corn(), milo()], targets, &NoPrices, false, 0);
        assert_eq!(result, Err(EngineError::InvalidTargetWeight(0.0)));
    }

    #[test]
    fn non_finite_target_is_rejected() {
        let targets = NutrientTargets::new(6.0, NutrientProfile::new(16.0, 3.0, 3.0, f64::INFINITY));
        let result = run_seeded(&[corn(), milo()], targets, &NoPrices, false, 0);
        assert!(matches!(
            result,
            Err(EngineError::InvalidTarget {
                nutrient: Nutrient::Lysine,
                ..
            })
        ));
    }

    #[test]
    fn zero_protein_ingredient_is_rejected() {
        let oil = Ingredient::new("Soybean Oil", NutrientProfile::new(0.0, 99.0, 0.0, 0.0));
        let result = run_seeded(&[corn(), oil], pig_targets(), &NoPrices, false, 0);
        assert!(matches!(
            result,
            Err(EngineError::NonPositiveProtein { ref name, .. }) if name == "Soybean Oil"
        ));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = run_seeded(&[corn(), corn()], pig_targets(), &NoPrices, false, 0);
        assert_eq!(result, Err(EngineError::DuplicateIngredient("Corn".into())));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = OptimizerConfig {
            max_iterations: 0,
            ..Default::default()
        };
        let ingredients = [corn(), milo()];
        let request = OptimizationRequest::new(&ingredients, pig_targets());
        let result = run(
            &request,
            &NoPrices,
            &config,
            &ProgressReporter::new(),
            &mut StdRng::seed_from_u64(0),
        );
        assert!(matches!(
            result,
            Err(EngineError::Config(ConfigError::InvalidParameter {
                parameter: "max_iterations",
                ..
            }))
        ));
    }
}
