use feedmix::core::models::guidelines::Advisory;
use feedmix::core::models::mix::{MixEntry, MixProfile};
use feedmix::core::models::nutrient::{Nutrient, NutrientTargets};
use std::fmt::Write;

/// Formats mix entries as an aligned table with a total row.
pub fn mix_table(entries: &[MixEntry]) -> String {
    let width = entries
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Ingredient".len());

    let mut out = String::new();
    let _ = writeln!(out, "{:<width$}  {:>10}  {:>7}", "Ingredient", "Mass (lb)", "Share");
    let _ = writeln!(out, "{}", "-".repeat(width + 21));
    for entry in entries {
        let _ = writeln!(
            out,
            "{:<width$}  {:>10.2}  {:>6.1}%",
            entry.name, entry.mass, entry.percent
        );
    }
    let total: f64 = entries.iter().map(|e| e.mass).sum();
    let _ = writeln!(out, "{:<width$}  {:>10.2}", "Total", total);
    out
}

/// Formats the nutrient profile of a mix, next to the targets when given.
pub fn profile_table(profile: &MixProfile, targets: Option<&NutrientTargets>) -> String {
    let mut out = String::new();
    match targets {
        Some(targets) => {
            let _ = writeln!(
                out,
                "{:<10}  {:>8}  {:>8}  {:>8}",
                "Nutrient", "Actual", "Target", "Diff"
            );
            for nutrient in Nutrient::ALL {
                let actual = profile.nutrients.get(nutrient);
                let target = targets.profile.get(nutrient);
                let _ = writeln!(
                    out,
                    "{:<10}  {:>7.2}%  {:>7.2}%  {:>+8.2}",
                    nutrient.to_string(),
                    actual,
                    target,
                    actual - target
                );
            }
        }
        None => {
            let _ = writeln!(out, "{:<10}  {:>8}", "Nutrient", "Actual");
            for nutrient in Nutrient::ALL {
                let _ = writeln!(
                    out,
                    "{:<10}  {:>7.2}%",
                    nutrient.to_string(),
                    profile.nutrients.get(nutrient)
                );
            }
        }
    }

    let _ = writeln!(out, "Total weight: {:.2} lb", profile.total_weight);
    match profile.total_cost {
        Some(cost) => {
            let _ = writeln!(out, "Total cost:   ${:.2}", cost);
        }
        None => {
            let _ = writeln!(out, "Total cost:   unknown (no prices)");
        }
    }
    out
}

pub fn advisories(advisories: &[Advisory]) -> String {
    if advisories.is_empty() {
        return "All nutrients are within the growing-pig guidelines.\n".to_string();
    }
    let mut out = String::from("Guideline advisories:\n");
    for advisory in advisories {
        let _ = writeln!(out, "  ! {}", advisory);
    }
    out
}
