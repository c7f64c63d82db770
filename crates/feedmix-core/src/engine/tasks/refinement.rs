use crate::core::models::nutrient::{Nutrient, NutrientProfile};
use crate::engine::config::{ConvergencePolicy, OptimizerConfig};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::proportions::{Limits, Proportions};
use tracing::{debug, instrument, trace};

/// Correction order: the first nutrient off by more than its threshold is the one adjusted.
const PRIORITY: [Nutrient; 4] = [
    Nutrient::Protein,
    Nutrient::Lysine,
    Nutrient::Fat,
    Nutrient::Fiber,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinementOutcome {
    /// Adjustment passes performed, at most the configured budget.
    pub iterations: usize,
    /// Whether the stop condition held when refinement ended.
    pub converged: bool,
    /// The nutrient corrected by the most recent effective adjustment.
    pub last_adjusted: Option<Nutrient>,
}

/// Whether `errors` satisfy the stop condition of the configured policy.
pub(crate) fn is_converged(errors: &NutrientProfile, config: &OptimizerConfig) -> bool {
    let gated: &[Nutrient] = match config.convergence {
        ConvergencePolicy::ProteinAndLysine => &[Nutrient::Protein, Nutrient::Lysine],
        ConvergencePolicy::AllNutrients => &Nutrient::ALL,
    };
    gated
        .iter()
        .all(|&n| errors.get(n).abs() < config.thresholds.get(n))
}

fn select_nutrient(errors: &NutrientProfile, config: &OptimizerConfig) -> Option<Nutrient> {
    PRIORITY
        .into_iter()
        .find(|&n| errors.get(n).abs() > config.thresholds.get(n))
}

/// Index of the first ingredient holding the highest and the lowest value of `nutrient`.
fn extremes(profiles: &[NutrientProfile], nutrient: Nutrient) -> Option<(usize, usize)> {
    let first = profiles.first()?.get(nutrient);
    let (mut high, mut low) = (0, 0);
    let (mut highest, mut lowest) = (first, first);

    for (i, profile) in profiles.iter().enumerate().skip(1) {
        let value = profile.get(nutrient);
        if value > highest {
            highest = value;
            high = i;
        }
        if value < lowest {
            lowest = value;
            low = i;
        }
    }
    Some((high, low))
}

/// Shifts `step` of share between the richest and poorest source of `nutrient`.
/// Returns `false` when every ingredient carries the same amount, so no shift can help.
fn adjust(
    proportions: &mut Proportions,
    profiles: &[NutrientProfile],
    nutrient: Nutrient,
    below_target: bool,
    step: f64,
) -> bool {
    let Some((high, low)) = extremes(profiles, nutrient) else {
        return false;
    };
    if high == low {
        return false;
    }
    if below_target {
        proportions.transfer(low, high, step);
    } else {
        proportions.transfer(high, low, step);
    }
    trace!(%nutrient, high, low, below_target, step, "Adjusted proportions.");
    true
}

/// Greedy refinement of the seed toward the target profile.
///
/// Bounds are enforced once on entry, so the result honors them even when the seed already
/// meets the stop condition, and again after every adjustment.
#[instrument(level = "debug", skip_all, fields(ingredients = profiles.len()))]
pub fn run(
    proportions: &mut Proportions,
    profiles: &[NutrientProfile],
    limits: &Limits,
    targets: &NutrientProfile,
    config: &OptimizerConfig,
    reporter: &ProgressReporter,
) -> RefinementOutcome {
    proportions.enforce(limits);
    reporter.report(Progress::TaskStart {
        total_steps: config.max_iterations as u64,
    });

    let mut iterations = 0;
    let mut converged = false;
    let mut last_adjusted = None;

    for iteration in 0..config.max_iterations {
        let errors = proportions.blend(profiles).difference(targets);
        if is_converged(&errors, config) {
            debug!(iteration, "Stop condition met.");
            converged = true;
            break;
        }

        if let Some(nutrient) = select_nutrient(&errors, config) {
            let below_target = errors.get(nutrient) < 0.0;
            if adjust(
                proportions,
                profiles,
                nutrient,
                below_target,
                config.step_for(nutrient),
            ) {
                proportions.enforce(limits);
                last_adjusted = Some(nutrient);
            }
        }
        iterations += 1;
        reporter.report(Progress::TaskIncrement);
    }

    if !converged {
        let errors = proportions.blend(profiles).difference(targets);
        converged = is_converged(&errors, config);
    }

    reporter.report(Progress::TaskFinish);
    debug!(iterations, converged, "Refinement finished.");
    RefinementOutcome {
        iterations,
        converged,
        last_adjusted,
    }
}
