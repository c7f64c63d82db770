use crate::core::models::nutrient::Nutrient;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

fn invalid(parameter: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        parameter,
        reason: reason.into(),
    }
}

/// Which nutrient errors must be within threshold for refinement to stop early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvergencePolicy {
    /// Stop once protein and lysine are on target. Fat and fiber never gate termination,
    /// so their adjustments are effectively never reached.
    #[default]
    ProteinAndLysine,
    /// Stop only once all four nutrients are on target.
    AllNutrients,
}

/// Absolute error, in percentage points, below which a nutrient counts as on target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutrientThresholds {
    pub protein: f64,
    pub fat: f64,
    pub fiber: f64,
    pub lysine: f64,
}

impl NutrientThresholds {
    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Protein => self.protein,
            Nutrient::Fat => self.fat,
            Nutrient::Fiber => self.fiber,
            Nutrient::Lysine => self.lysine,
        }
    }
}

impl Default for NutrientThresholds {
    fn default() -> Self {
        Self {
            protein: 0.1,
            fat: 0.5,
            fiber: 0.5,
            lysine: 0.05,
        }
    }
}

/// Floor and per-class ceilings applied to every proportion after each adjustment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProportionBounds {
    pub floor: f64,
    pub lysine_supplement_ceiling: f64,
    pub protein_concentrate_ceiling: f64,
    pub high_fiber_ceiling: f64,
    pub default_ceiling: f64,
}

impl Default for ProportionBounds {
    fn default() -> Self {
        Self {
            floor: 0.01,
            lysine_supplement_ceiling: 0.05,
            protein_concentrate_ceiling: 0.25,
            high_fiber_ceiling: 0.30,
            default_ceiling: 0.65,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedBand {
    pub min: f64,
    pub max: f64,
}

impl SeedBand {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Ranges the starting proportion of each ingredient role is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedBands {
    pub lysine_supplement: SeedBand,
    pub protein_concentrate: SeedBand,
    pub moderate_protein: SeedBand,
    pub energy_staple: SeedBand,
    pub minor: SeedBand,
}

impl SeedBands {
    fn all(&self) -> [(&'static str, SeedBand); 5] {
        [
            ("seed_bands.lysine_supplement", self.lysine_supplement),
            ("seed_bands.protein_concentrate", self.protein_concentrate),
            ("seed_bands.moderate_protein", self.moderate_protein),
            ("seed_bands.energy_staple", self.energy_staple),
            ("seed_bands.minor", self.minor),
        ]
    }
}

impl Default for SeedBands {
    fn default() -> Self {
        Self {
            lysine_supplement: SeedBand::new(0.01, 0.03),
            protein_concentrate: SeedBand::new(0.05, 0.10),
            moderate_protein: SeedBand::new(0.15, 0.25),
            energy_staple: SeedBand::new(0.30, 0.50),
            minor: SeedBand::new(0.08, 0.15),
        }
    }
}

/// Price bias applied to seed proportions when price optimization is on.
///
/// Prices are per pound. The cheapest known price maps to `cheapest_factor`, the most
/// expensive to `priciest_factor`, linearly in between. Ingredients above
/// `expensive_threshold` are further scaled by `expensive_factor`, those above
/// `premium_threshold` (up to and including `expensive_threshold`) by `premium_factor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePenalties {
    pub cheapest_factor: f64,
    pub priciest_factor: f64,
    pub premium_threshold: f64,
    pub premium_factor: f64,
    pub expensive_threshold: f64,
    pub expensive_factor: f64,
}

impl Default for PricePenalties {
    fn default() -> Self {
        Self {
            cheapest_factor: 1.5,
            priciest_factor: 0.5,
            premium_threshold: 3.0,
            premium_factor: 0.4,
            expensive_threshold: 5.0,
            expensive_factor: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerConfig {
    pub max_iterations: usize,
    pub step_size: f64,
    pub lysine_step_scale: f64,
    pub thresholds: NutrientThresholds,
    pub convergence: ConvergencePolicy,
    pub bounds: ProportionBounds,
    pub seed_bands: SeedBands,
    pub pricing: PricePenalties,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            step_size: 0.002,
            lysine_step_scale: 0.1,
            thresholds: NutrientThresholds::default(),
            convergence: ConvergencePolicy::default(),
            bounds: ProportionBounds::default(),
            seed_bands: SeedBands::default(),
            pricing: PricePenalties::default(),
        }
    }
}

impl OptimizerConfig {
    pub fn builder() -> OptimizerConfigBuilder {
        OptimizerConfigBuilder::new()
    }

    /// Step applied to proportions when correcting `nutrient`.
    pub fn step_for(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Lysine => self.step_size * self.lysine_step_scale,
            _ => self.step_size,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(invalid("max_iterations", "must be at least 1"));
        }
        if !(self.step_size.is_finite() && self.step_size > 0.0 && self.step_size < 1.0) {
            return Err(invalid("step_size", "must be in (0, 1)"));
        }
        if !(self.lysine_step_scale.is_finite() && self.lysine_step_scale > 0.0) {
            return Err(invalid("lysine_step_scale", "must be positive"));
        }

        for nutrient in Nutrient::ALL {
            let t = self.thresholds.get(nutrient);
            if !(t.is_finite() && t >= 0.0) {
                return Err(invalid("thresholds", format!("{} threshold must be >= 0", nutrient)));
            }
        }

        let b = &self.bounds;
        if !(b.floor.is_finite() && (0.0..1.0).contains(&b.floor)) {
            return Err(invalid("bounds.floor", "must be in [0, 1)"));
        }
        for (name, ceiling) in [
            ("bounds.lysine_supplement_ceiling", b.lysine_supplement_ceiling),
            ("bounds.protein_concentrate_ceiling", b.protein_concentrate_ceiling),
            ("bounds.high_fiber_ceiling", b.high_fiber_ceiling),
            ("bounds.default_ceiling", b.default_ceiling),
        ] {
            if !(ceiling.is_finite() && ceiling > b.floor && ceiling <= 1.0) {
                return Err(invalid(name, "must be above the floor and at most 1"));
            }
        }

        for (name, band) in self.seed_bands.all() {
            if !(band.min.is_finite() && band.max.is_finite())
                || band.min <= 0.0
                || band.min > band.max
                || band.max > 1.0
            {
                return Err(invalid(name, "expected 0 < min <= max <= 1"));
            }
        }

        let p = &self.pricing;
        if !(p.priciest_factor > 0.0 && p.cheapest_factor >= p.priciest_factor) {
            return Err(invalid(
                "pricing",
                "factors must satisfy 0 < priciest_factor <= cheapest_factor",
            ));
        }
        if !(p.premium_factor > 0.0 && p.expensive_factor > 0.0) {
            return Err(invalid("pricing", "penalty factors must be positive"));
        }
        if p.premium_threshold > p.expensive_threshold {
            return Err(invalid(
                "pricing",
                "premium_threshold must not exceed expensive_threshold",
            ));
        }

        Ok(())
    }
}

#[derive(Default)]
pub struct OptimizerConfigBuilder {
    max_iterations: Option<usize>,
    step_size: Option<f64>,
    lysine_step_scale: Option<f64>,
    thresholds: Option<NutrientThresholds>,
    convergence: Option<ConvergencePolicy>,
    bounds: Option<ProportionBounds>,
    seed_bands: Option<SeedBands>,
    pricing: Option<PricePenalties>,
}

impl OptimizerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }
    pub fn step_size(mut self, step: f64) -> Self {
        self.step_size = Some(step);
        self
    }
    pub fn lysine_step_scale(mut self, scale: f64) -> Self {
        self.lysine_step_scale = Some(scale);
        self
    }
    pub fn thresholds(mut self, thresholds: NutrientThresholds) -> Self {
        self.thresholds = Some(thresholds);
        self
    }
    pub fn convergence(mut self, policy: ConvergencePolicy) -> Self {
        self.convergence = Some(policy);
        self
    }
    pub fn bounds(mut self, bounds: ProportionBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }
    pub fn seed_bands(mut self, bands: SeedBands) -> Self {
        self.seed_bands = Some(bands);
        self
    }
    pub fn pricing(mut self, pricing: PricePenalties) -> Self {
        self.pricing = Some(pricing);
        self
    }

    /// Fills unset parameters with their defaults and validates the result.
    pub fn build(self) -> Result<OptimizerConfig, ConfigError> {
        let defaults = OptimizerConfig::default();
        let config = OptimizerConfig {
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            step_size: self.step_size.unwrap_or(defaults.step_size),
            lysine_step_scale: self.lysine_step_scale.unwrap_or(defaults.lysine_step_scale),
            thresholds: self.thresholds.unwrap_or(defaults.thresholds),
            convergence: self.convergence.unwrap_or(defaults.convergence),
            bounds: self.bounds.unwrap_or(defaults.bounds),
            seed_bands: self.seed_bands.unwrap_or(defaults.seed_bands),
            pricing: self.pricing.unwrap_or(defaults.pricing),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(OptimizerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn empty_builder_yields_defaults() {
        let config = OptimizerConfigBuilder::new().build().unwrap();
        assert_eq!(config, OptimizerConfig::default());
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.step_size, 0.002);
        assert_eq!(config.bounds.floor, 0.01);
    }

    #[test]
    fn builder_overrides_selected_fields() {
        let config = OptimizerConfig::builder()
            .max_iterations(250)
            .convergence(ConvergencePolicy::AllNutrients)
            .build()
            .unwrap();
        assert_eq!(config.max_iterations, 250);
        assert_eq!(config.convergence, ConvergencePolicy::AllNutrients);
        assert_eq!(config.step_size, 0.002);
    }

    #[test]
    fn lysine_step_is_scaled() {
        let config = OptimizerConfig::default();
        assert_eq!(config.step_for(Nutrient::Protein), 0.002);
        assert!((config.step_for(Nutrient::Lysine) - 0.0002).abs() < 1e-12);
    }

    #[test]
    fn zero_iteration_budget_is_rejected() {
        let result = OptimizerConfig::builder().max_iterations(0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                parameter: "max_iterations",
                ..
            })
        ));
    }

    #[test]
    fn non_positive_step_is_rejected() {
        assert!(OptimizerConfig::builder().step_size(0.0).build().is_err());
        assert!(OptimizerConfig::builder().step_size(f64::NAN).build().is_err());
    }

    #[test]
    fn ceiling_below_floor_is_rejected() {
        let bounds = ProportionBounds {
            floor: 0.1,
            lysine_supplement_ceiling: 0.05,
            ..Default::default()
        };
        let result = OptimizerConfig::builder().bounds(bounds).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                parameter: "bounds.lysine_supplement_ceiling",
                ..
            })
        ));
    }

    #[test]
    fn inverted_seed_band_is_rejected() {
        let bands = SeedBands {
            minor: SeedBand::new(0.2, 0.1),
            ..Default::default()
        };
        assert!(OptimizerConfig::builder().seed_bands(bands).build().is_err());
    }

    #[test]
    fn inverted_price_thresholds_are_rejected() {
        let pricing = PricePenalties {
            premium_threshold: 6.0,
            ..Default::default()
        };
        assert!(OptimizerConfig::builder().pricing(pricing).build().is_err());
    }
}
