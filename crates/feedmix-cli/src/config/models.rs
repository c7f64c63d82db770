use feedmix::core::models::nutrient::NutrientTargets;
use feedmix::engine::config::OptimizerConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub ingredients_path: PathBuf,
    pub prices_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub targets: NutrientTargets,
    pub use_price_optimization: bool,
    pub seed: Option<u64>,
    pub core_config: OptimizerConfig,
}
