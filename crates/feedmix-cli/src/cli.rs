use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Feedmix Developers",
    version,
    about = "feedmix - compose swine feed mixes that land on protein, fat, fiber and lysine targets.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute ingredient masses that meet the nutrient targets.
    Optimize(OptimizeArgs),
    /// Show the nutrient profile and cost of an existing mix.
    Profile(ProfileArgs),
}

/// Arguments for the `optimize` subcommand.
#[derive(Args, Debug)]
pub struct OptimizeArgs {
    // --- Inputs ---
    /// Ingredient catalog CSV with the header `name,protein,fat,fiber,lysine`.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub ingredients: PathBuf,

    /// Price list CSV with the header `name,price,unit`.
    #[arg(short, long, value_name = "PATH")]
    pub prices: Option<PathBuf>,

    /// Configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the resulting mix as CSV to this path.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    // --- Target Overrides ---
    /// Total mass of feed to produce, in pounds.
    #[arg(short = 'w', long, value_name = "LBS")]
    pub weight: Option<f64>,

    /// Target crude protein percentage.
    #[arg(long, value_name = "PCT")]
    pub protein: Option<f64>,

    /// Target crude fat percentage.
    #[arg(long, value_name = "PCT")]
    pub fat: Option<f64>,

    /// Target crude fiber percentage.
    #[arg(long, value_name = "PCT")]
    pub fiber: Option<f64>,

    /// Target lysine percentage.
    #[arg(long, value_name = "PCT")]
    pub lysine: Option<f64>,

    // --- Optimization Overrides ---
    /// Override the refinement iteration budget.
    #[arg(long, value_name = "INT")]
    pub max_iterations: Option<usize>,

    /// Override `optimization.price-optimization` from the config file.
    #[command(flatten)]
    pub price_optimization: PriceOptimization,

    /// Seed for the random source, for reproducible mixes.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S bounds.floor=0.02
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Mutually exclusive flags that switch price-biased seeding on or off.
#[derive(Args, Debug, Clone, Copy)]
#[group(required = false, multiple = false)]
pub struct PriceOptimization {
    /// Favor cheaper ingredients when seeding the mix.
    #[arg(long)]
    pub price_optimization: bool,
    /// Ignore prices when seeding, even if the config file enables it.
    #[arg(long)]
    pub no_price_optimization: bool,
}

/// Arguments for the `profile` subcommand.
#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Ingredient catalog CSV with the header `name,protein,fat,fiber,lysine`.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub ingredients: PathBuf,

    /// Mix CSV with the header `name,mass`.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub mix: PathBuf,

    /// Price list CSV used to report the cost of the mix.
    #[arg(short, long, value_name = "PATH")]
    pub prices: Option<PathBuf>,
}
