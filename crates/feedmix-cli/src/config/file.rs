use crate::error::{CliError, Result};
use feedmix::engine::config as core_config;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileTargetConfig {
    pub weight: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub lysine: Option<f64>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileConvergencePolicy {
    ProteinAndLysine,
    AllNutrients,
}

impl From<FileConvergencePolicy> for core_config::ConvergencePolicy {
    fn from(p: FileConvergencePolicy) -> Self {
        match p {
            FileConvergencePolicy::ProteinAndLysine => Self::ProteinAndLysine,
            FileConvergencePolicy::AllNutrients => Self::AllNutrients,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileThresholdsConfig {
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub lysine: Option<f64>,
}

impl FileThresholdsConfig {
    pub fn resolve(&self) -> core_config::NutrientThresholds {
        let d = core_config::NutrientThresholds::default();
        core_config::NutrientThresholds {
            protein: self.protein.unwrap_or(d.protein),
            fat: self.fat.unwrap_or(d.fat),
            fiber: self.fiber.unwrap_or(d.fiber),
            lysine: self.lysine.unwrap_or(d.lysine),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileOptimizationConfig {
    pub max_iterations: Option<usize>,
    pub step_size: Option<f64>,
    pub lysine_step_scale: Option<f64>,
    pub convergence: Option<FileConvergencePolicy>,
    pub price_optimization: Option<bool>,
    pub seed: Option<u64>,
    pub thresholds: Option<FileThresholdsConfig>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileBoundsConfig {
    pub floor: Option<f64>,
    pub lysine_supplement_ceiling: Option<f64>,
    pub protein_concentrate_ceiling: Option<f64>,
    pub high_fiber_ceiling: Option<f64>,
    pub default_ceiling: Option<f64>,
}

impl FileBoundsConfig {
    pub fn resolve(&self) -> core_config::ProportionBounds {
        let d = core_config::ProportionBounds::default();
        core_config::ProportionBounds {
            floor: self.floor.unwrap_or(d.floor),
            lysine_supplement_ceiling: self
                .lysine_supplement_ceiling
                .unwrap_or(d.lysine_supplement_ceiling),
            protein_concentrate_ceiling: self
                .protein_concentrate_ceiling
                .unwrap_or(d.protein_concentrate_ceiling),
            high_fiber_ceiling: self.high_fiber_ceiling.unwrap_or(d.high_fiber_ceiling),
            default_ceiling: self.default_ceiling.unwrap_or(d.default_ceiling),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FilePricingConfig {
    pub cheapest_factor: Option<f64>,
    pub priciest_factor: Option<f64>,
    pub premium_threshold: Option<f64>,
    pub premium_factor: Option<f64>,
    pub expensive_threshold: Option<f64>,
    pub expensive_factor: Option<f64>,
}

impl FilePricingConfig {
    pub fn resolve(&self) -> core_config::PricePenalties {
        let d = core_config::PricePenalties::default();
        core_config::PricePenalties {
            cheapest_factor: self.cheapest_factor.unwrap_or(d.cheapest_factor),
            priciest_factor: self.priciest_factor.unwrap_or(d.priciest_factor),
            premium_threshold: self.premium_threshold.unwrap_or(d.premium_threshold),
            premium_factor: self.premium_factor.unwrap_or(d.premium_factor),
            expensive_threshold: self.expensive_threshold.unwrap_or(d.expensive_threshold),
            expensive_factor: self.expensive_factor.unwrap_or(d.expensive_factor),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub target: Option<FileTargetConfig>,
    pub optimization: Option<FileOptimizationConfig>,
    pub bounds: Option<FileBoundsConfig>,
    pub pricing: Option<FilePricingConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
