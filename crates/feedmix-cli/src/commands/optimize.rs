use crate::cli::OptimizeArgs;
use crate::config::{AppConfig, build_config};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use crate::utils::report;
use feedmix::core::io::catalog::{load_ingredients, load_prices, write_mix};
use feedmix::core::models::guidelines::Guidelines;
use feedmix::core::models::ingredient::candidates;
use feedmix::core::pricing::PriceTable;
use feedmix::engine::progress::ProgressReporter;
use feedmix::workflows::optimize::{OptimizationRequest, OptimizationResult};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs::File;
use tracing::{info, warn};

pub fn run(args: OptimizeArgs) -> Result<()> {
    info!("Merging configuration from defaults, file and CLI arguments...");
    let config = build_config(&args)?;

    let result = optimize(&config)?;

    println!("\n{}", report::mix_table(&result.entries));
    println!(
        "{}",
        report::profile_table(&result.profile, Some(&result.targets))
    );
    if !result.converged {
        println!(
            "Note: targets were not fully reached within {} iteration(s); treat this mix as advisory.\n",
            result.iterations
        );
    }
    print!(
        "{}",
        report::advisories(&Guidelines::GROWING_PIG.check(&result.profile.nutrients))
    );

    if let Some(path) = &config.output_path {
        info!("Writing mix to {:?}", path);
        write_mix(File::create(path)?, &result.entries)?;
        println!("✓ Mix written to: {}", path.display());
    }

    Ok(())
}

fn optimize(config: &AppConfig) -> Result<OptimizationResult> {
    info!("Loading ingredient catalog from {:?}", &config.ingredients_path);
    let catalog = load_ingredients(&config.ingredients_path)?;
    let ingredients = candidates(&catalog);
    let skipped = catalog.len() - ingredients.len();
    if skipped > 0 {
        warn!(skipped, "Skipping ingredient(s) without protein.");
    }

    let prices = match &config.prices_path {
        Some(path) => {
            info!("Loading prices from {:?}", path);
            load_prices(path)?
        }
        None => PriceTable::new(),
    };
    if config.use_price_optimization && prices.is_empty() {
        warn!("Price optimization requested but no prices are loaded; seeding ignores prices.");
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let request = OptimizationRequest::new(&ingredients, config.targets)
        .with_price_optimization(config.use_price_optimization);

    println!(
        "Optimizing a {:.2} lb mix from {} ingredient(s)...",
        config.targets.total_weight,
        ingredients.len()
    );
    let result = feedmix::workflows::optimize::run(
        &request,
        &prices,
        &config.core_config,
        &reporter,
        &mut rng,
    );
    progress_handler.clear();

    let result = result?;
    info!(
        iterations = result.iterations,
        converged = result.converged,
        "Optimization finished."
    );
    Ok(result)
}
