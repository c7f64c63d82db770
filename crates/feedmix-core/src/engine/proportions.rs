use super::config::ProportionBounds;
use super::role::ceiling_for;
use crate::core::models::nutrient::NutrientProfile;
use tracing::trace;

const BISECTION_STEPS: usize = 100;
const MAX_SCALE_DOUBLINGS: usize = 200;
const MIN_WEIGHT: f64 = 1e-12;
const CEILING_TIE_TOLERANCE: f64 = 1e-12;

/// Allowed range for one ingredient's proportion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limit {
    pub floor: f64,
    pub ceiling: f64,
}

/// Per-ingredient limits for one optimization call.
#[derive(Debug, Clone, PartialEq)]
pub struct Limits {
    limits: Vec<Limit>,
    floor_lowered: bool,
    ceilings_lifted: bool,
}

impl Limits {
    /// Derives each ingredient's floor and ceiling from its profile.
    ///
    /// Two adjustments keep the limits satisfiable. If `n * floor > 1` the floor drops to
    /// `1 / n`. If the ceilings sum to less than one, the ingredients holding the loosest
    /// ceiling are uncapped so the tighter caps (lysine supplements, concentrates) still hold.
    pub fn for_profiles(profiles: &[NutrientProfile], bounds: &ProportionBounds) -> Self {
        let n = profiles.len();
        let mut floor = bounds.floor;
        let mut floor_lowered = false;
        if n > 0 && floor * n as f64 > 1.0 {
            floor = 1.0 / n as f64;
            floor_lowered = true;
        }

        let mut limits: Vec<Limit> = profiles
            .iter()
            .map(|p| Limit {
                floor,
                ceiling: ceiling_for(p, bounds).max(floor),
            })
            .collect();

        let ceiling_sum: f64 = limits.iter().map(|l| l.ceiling).sum();
        let mut ceilings_lifted = false;
        if n > 0 && ceiling_sum < 1.0 {
            let loosest = limits
                .iter()
                .map(|l| l.ceiling)
                .fold(f64::NEG_INFINITY, f64::max);
            for limit in limits
                .iter_mut()
                .filter(|l| l.ceiling >= loosest - CEILING_TIE_TOLERANCE)
            {
                limit.ceiling = 1.0;
            }
            ceilings_lifted = true;
        }

        Self {
            limits,
            floor_lowered,
            ceilings_lifted,
        }
    }

    pub fn get(&self, index: usize) -> Limit {
        self.limits[index]
    }

    pub fn as_slice(&self) -> &[Limit] {
        &self.limits
    }

    pub fn floor_lowered(&self) -> bool {
        self.floor_lowered
    }

    pub fn ceilings_lifted(&self) -> bool {
        self.ceilings_lifted
    }
}

/// The working state of one optimization: each ingredient's share of the total mass.
///
/// After [`Proportions::normalize`] or [`Proportions::enforce`] the shares sum to one.
#[derive(Debug, Clone, PartialEq)]
pub struct Proportions {
    values: Vec<f64>,
}

impl Proportions {
    /// Wraps raw non-negative weights and normalizes them to sum to one.
    pub fn from_weights(weights: Vec<f64>) -> Self {
        let mut proportions = Self { values: weights };
        proportions.normalize();
        proportions
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Scales every share so they sum to one. A vector with no positive weight becomes uniform.
    pub fn normalize(&mut self) {
        if self.values.is_empty() {
            return;
        }
        let total: f64 = self.values.iter().filter(|v| **v > 0.0).sum();
        if total <= 0.0 || !total.is_finite() {
            let uniform = 1.0 / self.values.len() as f64;
            self.values.iter_mut().for_each(|v| *v = uniform);
            return;
        }
        for v in &mut self.values {
            *v = v.max(0.0) / total;
        }
    }

    /// Moves `amount` of share from ingredient `from` to ingredient `to`.
    pub fn transfer(&mut self, from: usize, to: usize, amount: f64) {
        self.values[to] += amount;
        self.values[from] -= amount;
    }

    /// Clamps every share into its limit, then rescales so the shares sum to one while
    /// staying inside their limits.
    ///
    /// The rescale finds the factor `s` for which `sum(clamp(s * p_i, floor_i, ceiling_i)) == 1`.
    /// That sum is non-decreasing in `s`, so a bisection over `s` converges.
    pub fn enforce(&mut self, limits: &Limits) {
        debug_assert_eq!(self.values.len(), limits.as_slice().len());
        if self.values.is_empty() {
            return;
        }

        let bounds = limits.as_slice();
        let weights: Vec<f64> = self
            .values
            .iter()
            .zip(bounds)
            .map(|(&v, l)| v.clamp(l.floor, l.ceiling).max(MIN_WEIGHT))
            .collect();

        let filled = |scale: f64| -> f64 {
            weights
                .iter()
                .zip(bounds)
                .map(|(&w, l)| (w * scale).clamp(l.floor, l.ceiling))
                .sum()
        };

        let mut low = 0.0;
        let mut high = 1.0;
        let mut doublings = 0;
        while filled(high) < 1.0 && doublings < MAX_SCALE_DOUBLINGS {
            low = high;
            high *= 2.0;
            doublings += 1;
        }
        for _ in 0..BISECTION_STEPS {
            let mid = 0.5 * (low + high);
            if filled(mid) < 1.0 {
                low = mid;
            } else {
                high = mid;
            }
        }

        for ((value, &w), l) in self.values.iter_mut().zip(&weights).zip(bounds) {
            *value = (w * high).clamp(l.floor, l.ceiling);
        }
        trace!(scale = high, sum = self.sum(), "Bounds enforced.");
    }

    /// Mass-weighted nutrient profile of the blend described by these shares.
    pub fn blend(&self, profiles: &[NutrientProfile]) -> NutrientProfile {
        NutrientProfile::weighted_sum(profiles.iter().zip(self.values.iter().copied()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn corn() -> NutrientProfile {
        NutrientProfile::new(8.0, 4.0, 2.0, 0.3)
    }
    fn soybean_meal() -> NutrientProfile {
        NutrientProfile::new(44.0, 1.0, 7.0, 2.8)
    }
    fn lysine_hcl() -> NutrientProfile {
        NutrientProfile::new(95.0, 0.0, 0.0, 78.0)
    }
    fn milo() -> NutrientProfile {
        NutrientProfile::new(9.0, 3.0, 2.5, 0.22)
    }

    fn assert_within_limits(p: &Proportions, limits: &Limits) {
        assert!((p.sum() - 1.0).abs() < EPS, "sum = {}", p.sum());
        for (v, l) in p.values().iter().zip(limits.as_slice()) {
            assert!(*v >= l.floor - EPS, "{} below floor {}", v, l.floor);
            assert!(*v <= l.ceiling + EPS, "{} above ceiling {}", v, l.ceiling);
        }
    }

    #[test]
    fn from_weights_normalizes() {
        let p = Proportions::from_weights(vec![3.0, 1.0]);
        assert_eq!(p.values(), &[0.75, 0.25]);
    }

    #[test]
    fn normalize_of_zero_weights_is_uniform() {
        let p = Proportions::from_weights(vec![0.0, 0.0, 0.0, 0.0]);
        assert_eq!(p.values(), &[0.25, 0.25, 0.25, 0.25]);
    }

    #[test]
    fn transfer_preserves_sum() {
        let mut p = Proportions::from_weights(vec![0.5, 0.5]);
        p.transfer(0, 1, 0.1);
        assert!((p.values()[0] - 0.4).abs() < EPS);
        assert!((p.values()[1] - 0.6).abs() < EPS);
        assert!((p.sum() - 1.0).abs() < EPS);
    }

    #[test]
    fn limits_follow_profile_ceilings() {
        let limits = Limits::for_profiles(
            &[corn(), milo(), soybean_meal()],
            &ProportionBounds::default(),
        );
        assert_eq!(limits.get(0).ceiling, 0.65);
        assert_eq!(limits.get(2).ceiling, 0.25);
        assert_eq!(limits.get(2).floor, 0.01);
        assert!(!limits.ceilings_lifted());
    }

    #[test]
    fn unsatisfiable_ceilings_lift_only_the_loosest() {
        let limits = Limits::for_profiles(
            &[corn(), soybean_meal(), lysine_hcl()],
            &ProportionBounds::default(),
        );
        assert!(limits.ceilings_lifted());
        assert_eq!(limits.get(0).ceiling, 1.0);
        assert_eq!(limits.get(1).ceiling, 0.25);
        assert_eq!(limits.get(2).ceiling, 0.05);
    }

    #[test]
    fn floor_is_lowered_when_too_many_ingredients() {
        let profiles = vec![corn(); 200];
        let limits = Limits::for_profiles(&profiles, &ProportionBounds::default());
        assert!(limits.floor_lowered());
        assert!((limits.get(0).floor - 0.005).abs() < EPS);
    }

    #[test]
    fn enforce_respects_floor_and_ceiling() {
        let profiles = [corn(), milo(), soybean_meal()];
        let limits = Limits::for_profiles(&profiles, &ProportionBounds::default());
        let mut p = Proportions::from_weights(vec![0.9, 0.0, 0.1]);

        p.enforce(&limits);

        // Corn and soybean meal sit at their ceilings; milo, lifted to the floor, takes the rest.
        assert_within_limits(&p, &limits);
        assert!((p.values()[0] - 0.65).abs() < EPS);
        assert!((p.values()[1] - 0.10).abs() < EPS);
        assert!((p.values()[2] - 0.25).abs() < EPS);
    }

    #[test]
    fn enforce_keeps_lysine_supplement_capped() {
        let profiles = [corn(), soybean_meal(), lysine_hcl()];
        let limits = Limits::for_profiles(&profiles, &ProportionBounds::default());
        let mut p = Proportions::from_weights(vec![0.2, 0.3, 0.5]);

        p.enforce(&limits);

        assert_within_limits(&p, &limits);
        assert!(p.values()[2] <= 0.05 + EPS);
        assert!(p.values()[1] <= 0.25 + EPS);
    }

    #[test]
    fn enforce_leaves_feasible_vector_unchanged() {
        let profiles = [corn(), milo(), soybean_meal()];
        let limits = Limits::for_profiles(&profiles, &ProportionBounds::default());
        let mut p = Proportions::from_weights(vec![0.45, 0.35, 0.20]);

        p.enforce(&limits);

        assert!((p.values()[0] - 0.45).abs() < 1e-9);
        assert!((p.values()[1] - 0.35).abs() < 1e-9);
        assert!((p.values()[2] - 0.20).abs() < 1e-9);
    }

    #[test]
    fn blend_averages_profiles() {
        let p = Proportions::from_weights(vec![0.75, 0.25]);
        let blend = p.blend(&[corn(), soybean_meal()]);
        assert!((blend.protein - 17.0).abs() < EPS);
    }
}
