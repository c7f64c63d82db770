use crate::cli::ProfileArgs;
use crate::error::{CliError, Result};
use crate::utils::report;
use feedmix::core::io::catalog::{load_ingredients, load_mix, load_prices};
use feedmix::core::models::guidelines::Guidelines;
use feedmix::core::models::ingredient::Ingredient;
use feedmix::core::models::mix::{MixEntry, MixProfile};
use feedmix::core::pricing::PriceOracle;
use std::collections::HashMap;
use tracing::info;

pub fn run(args: ProfileArgs) -> Result<()> {
    info!("Loading ingredient catalog from {:?}", &args.ingredients);
    let catalog = load_ingredients(&args.ingredients)?;
    info!("Loading mix from {:?}", &args.mix);
    let mix = load_mix(&args.mix)?;
    let prices = match &args.prices {
        Some(path) => Some(load_prices(path)?),
        None => None,
    };

    let parts = resolve_mix(&catalog, &mix)?;
    let profile = MixProfile::compute(
        parts.iter().copied(),
        prices.as_ref().map(|p| p as &dyn PriceOracle),
    );
    let entries = MixEntry::from_masses(mix.iter().map(|(name, mass)| (name.as_str(), *mass)));

    println!("{}", report::mix_table(&entries));
    println!("{}", report::profile_table(&profile, None));
    print!(
        "{}",
        report::advisories(&Guidelines::GROWING_PIG.check(&profile.nutrients))
    );
    Ok(())
}

/// Pairs each mix line with its catalog ingredient.
fn resolve_mix<'a>(
    catalog: &'a [Ingredient],
    mix: &[(String, f64)],
) -> Result<Vec<(&'a Ingredient, f64)>> {
    let by_name: HashMap<&str, &Ingredient> =
        catalog.iter().map(|i| (i.name.as_str(), i)).collect();

    mix.iter()
        .map(|(name, mass)| {
            by_name
                .get(name.as_str())
                .map(|ingredient| (*ingredient, *mass))
                .ok_or_else(|| {
                    CliError::Argument(format!(
                        "Mix ingredient '{}' is not in the ingredient catalog",
                        name
                    ))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use feedmix::core::models::nutrient::NutrientProfile;
    use std::fs;
    use tempfile::tempdir;

    fn catalog() -> Vec<Ingredient> {
        vec![
            Ingredient::new("Corn", NutrientProfile::new(8.0, 4.0, 2.0, 0.3)),
            Ingredient::new("Soybean Meal", NutrientProfile::new(44.0, 1.0, 7.0, 2.8)),
        ]
    }

    #[test]
    fn resolve_mix_pairs_by_name() {
        let catalog = catalog();
        let mix = vec![("Soybean Meal".to_string(), 1.5), ("Corn".to_string(), 4.5)];

        let parts = resolve_mix(&catalog, &mix).unwrap();

        assert_eq!(parts[0].0.name, "Soybean Meal");
        assert_eq!(parts[1].1, 4.5);
    }

    #[test]
    fn resolve_mix_rejects_unknown_ingredient() {
        let catalog = catalog();
        let mix = vec![("Fish Meal".to_string(), 1.0)];

        let result = resolve_mix(&catalog, &mix);
        assert!(matches!(result, Err(CliError::Argument(msg)) if msg.contains("Fish Meal")));
    }

    #[test]
    fn run_reads_catalog_mix_and_prices() {
        let dir = tempdir().unwrap();
        let ingredients = dir.path().join("ingredients.csv");
        let mix = dir.path().join("mix.csv");
        let prices = dir.path().join("prices.csv");
        fs::write(
            &ingredients,
            "name,protein,fat,fiber,lysine\nCorn,8,4,2,0.3\nSoybean Meal,44,1,7,2.8\n",
        )
        .unwrap();
        fs::write(&mix, "name,mass\nCorn,4.68\nSoybean Meal,1.32\n").unwrap();
        fs::write(&prices, "name,price,unit\nCorn,0.12,lb\n").unwrap();

        let cli = Cli::parse_from([
            "feedmix",
            "profile",
            "-i",
            ingredients.to_str().unwrap(),
            "-m",
            mix.to_str().unwrap(),
            "-p",
            prices.to_str().unwrap(),
        ]);
        let Commands::Profile(args) = cli.command else {
            panic!("Expected 'profile' subcommand");
        };

        run(args).unwrap();
    }
}
