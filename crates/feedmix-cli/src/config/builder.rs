use super::defaults::DefaultsConfig;
use super::file::{
    FileBoundsConfig, FileConfig, FileConvergencePolicy, FileOptimizationConfig,
    FilePricingConfig, FileTargetConfig, FileThresholdsConfig,
};
use super::models::AppConfig;
use crate::cli::OptimizeArgs;
use crate::error::{CliError, Result};
use feedmix::core::models::nutrient::{NutrientProfile, NutrientTargets};
use feedmix::engine::config as core_config;
use std::str::FromStr;
use tracing::debug;

pub fn build_config(args: &OptimizeArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let file_config = apply_cli_args(file_config, args);
    let FileConfig {
        target,
        optimization,
        bounds,
        pricing,
    } = apply_set_values(file_config, &args.set_values)?;

    let target = target.unwrap_or_default();
    let targets = NutrientTargets::new(
        target.weight.unwrap_or(defaults.weight),
        NutrientProfile::new(
            target.protein.unwrap_or(defaults.protein),
            target.fat.unwrap_or(defaults.fat),
            target.fiber.unwrap_or(defaults.fiber),
            target.lysine.unwrap_or(defaults.lysine),
        ),
    );

    let opt = optimization.unwrap_or_default();
    let use_price_optimization = opt
        .price_optimization
        .unwrap_or(defaults.price_optimization);

    let mut builder = core_config::OptimizerConfig::builder()
        .thresholds(opt.thresholds.unwrap_or_default().resolve())
        .bounds(bounds.unwrap_or_default().resolve())
        .pricing(pricing.unwrap_or_default().resolve());
    if let Some(iterations) = opt.max_iterations {
        builder = builder.max_iterations(iterations);
    }
    if let Some(step) = opt.step_size {
        builder = builder.step_size(step);
    }
    if let Some(scale) = opt.lysine_step_scale {
        builder = builder.lysine_step_scale(scale);
    }
    if let Some(policy) = opt.convergence {
        builder = builder.convergence(policy.into());
    }
    let core_config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    debug!(?targets, use_price_optimization, "Configuration resolved.");

    Ok(AppConfig {
        ingredients_path: args.ingredients.clone(),
        prices_path: args.prices.clone(),
        output_path: args.output.clone(),
        targets,
        use_price_optimization,
        seed: opt.seed,
        core_config,
    })
}

fn apply_cli_args(mut config: FileConfig, args: &OptimizeArgs) -> FileConfig {
    let target = config.target.get_or_insert_with(FileTargetConfig::default);
    let overrides = [
        (&mut target.weight, args.weight),
        (&mut target.protein, args.protein),
        (&mut target.fat, args.fat),
        (&mut target.fiber, args.fiber),
        (&mut target.lysine, args.lysine),
    ];
    for (slot, value) in overrides {
        if value.is_some() {
            *slot = value;
        }
    }

    let opt = config
        .optimization
        .get_or_insert_with(FileOptimizationConfig::default);
    if args.max_iterations.is_some() {
        opt.max_iterations = args.max_iterations;
    }
    if args.seed.is_some() {
        opt.seed = args.seed;
    }
    match (
        args.price_optimization.price_optimization,
        args.price_optimization.no_price_optimization,
    ) {
        (true, false) => opt.price_optimization = Some(true),
        (false, true) => opt.price_optimization = Some(false),
        _ => {}
    }
    config
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid value for {}: '{}'", key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            _ if key.starts_with("target.") => {
                let target = config.target.get_or_insert_with(FileTargetConfig::default);
                let slot = match &key["target.".len()..] {
                    "weight" => &mut target.weight,
                    "protein" => &mut target.protein,
                    "fat" => &mut target.fat,
                    "fiber" => &mut target.fiber,
                    "lysine" => &mut target.lysine,
                    _ => return Err(unsupported_key(key)),
                };
                *slot = Some(parse_value(key, value)?);
            }
            "optimization.max-iterations" => {
                config.optimization.get_or_insert_with(Default::default).max_iterations =
                    Some(parse_value(key, value)?)
            }
            "optimization.step-size" => {
                config.optimization.get_or_insert_with(Default::default).step_size =
                    Some(parse_value(key, value)?)
            }
            "optimization.lysine-step-scale" => {
                config.optimization.get_or_insert_with(Default::default).lysine_step_scale =
                    Some(parse_value(key, value)?)
            }
            "optimization.price-optimization" => {
                config.optimization.get_or_insert_with(Default::default).price_optimization =
                    Some(parse_value(key, value)?)
            }
            "optimization.seed" => {
                config.optimization.get_or_insert_with(Default::default).seed =
                    Some(parse_value(key, value)?)
            }
            "optimization.convergence" => {
                let policy = match value.trim() {
                    "protein-and-lysine" => FileConvergencePolicy::ProteinAndLysine,
                    "all-nutrients" => FileConvergencePolicy::AllNutrients,
                    other => {
                        return Err(CliError::Config(format!(
                            "Invalid value for {}: '{}'. Expected 'protein-and-lysine' or 'all-nutrients'.",
                            key, other
                        )));
                    }
                };
                config
                    .optimization
                    .get_or_insert_with(Default::default)
                    .convergence = Some(policy);
            }
            _ if key.starts_with("optimization.thresholds.") => {
                let thresholds = config
                    .optimization
                    .get_or_insert_with(Default::default)
                    .thresholds
                    .get_or_insert_with(FileThresholdsConfig::default);
                let slot = match &key["optimization.thresholds.".len()..] {
                    "protein" => &mut thresholds.protein,
                    "fat" => &mut thresholds.fat,
                    "fiber" => &mut thresholds.fiber,
                    "lysine" => &mut thresholds.lysine,
                    _ => return Err(unsupported_key(key)),
                };
                *slot = Some(parse_value(key, value)?);
            }
            _ if key.starts_with("bounds.") => {
                let bounds = config.bounds.get_or_insert_with(FileBoundsConfig::default);
                let slot = match &key["bounds.".len()..] {
                    "floor" => &mut bounds.floor,
                    "lysine-supplement-ceiling" => &mut bounds.lysine_supplement_ceiling,
                    "protein-concentrate-ceiling" => &mut bounds.protein_concentrate_ceiling,
                    "high-fiber-ceiling" => &mut bounds.high_fiber_ceiling,
                    "default-ceiling" => &mut bounds.default_ceiling,
                    _ => return Err(unsupported_key(key)),
                };
                *slot = Some(parse_value(key, value)?);
            }
            _ if key.starts_with("pricing.") => {
                let pricing = config.pricing.get_or_insert_with(FilePricingConfig::default);
                let slot = match &key["pricing.".len()..] {
                    "cheapest-factor" => &mut pricing.cheapest_factor,
                    "priciest-factor" => &mut pricing.priciest_factor,
                    "premium-threshold" => &mut pricing.premium_threshold,
                    "premium-factor" => &mut pricing.premium_factor,
                    "expensive-threshold" => &mut pricing.expensive_threshold,
                    "expensive-factor" => &mut pricing.expensive_factor,
                    _ => return Err(unsupported_key(key)),
                };
                *slot = Some(parse_value(key, value)?);
            }
            _ => return Err(unsupported_key(key)),
        }
    }
    Ok(config)
}

fn unsupported_key(key: &str) -> CliError {
    CliError::Config(format!(
        "Unsupported configuration key for --set: '{}'",
        key
    ))
}
