use crate::core::models::ingredient::{Ingredient, IngredientError};
use crate::core::models::mix::MixEntry;
use crate::core::models::nutrient::NutrientProfile;
use crate::core::pricing::{PriceError, PriceTable, PriceUnit, PriceUnitError};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Invalid ingredient in '{path}': {source}")]
    Ingredient {
        path: String,
        source: IngredientError,
    },
    #[error("Duplicate ingredient '{name}' in '{path}'")]
    Duplicate { path: String, name: String },
    #[error("Invalid price in '{path}': {source}")]
    Price { path: String, source: PriceError },
    #[error("Invalid price unit in '{path}': {source}")]
    Unit {
        path: String,
        source: PriceUnitError,
    },
    #[error("Invalid mass {mass} for '{name}' in '{path}'")]
    InvalidMass {
        path: String,
        name: String,
        mass: f64,
    },
    #[error("Failed to write mix: {0}")]
    Write(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct IngredientRecord {
    name: String,
    protein: f64,
    fat: f64,
    fiber: f64,
    lysine: f64,
}

#[derive(Debug, Deserialize)]
struct PriceRecord {
    name: String,
    price: f64,
    #[serde(default)]
    unit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MixRecord {
    name: String,
    mass: f64,
}

fn read_records<T>(path: &Path) -> Result<Vec<T>, CatalogError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| CatalogError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

    reader
        .deserialize::<T>()
        .map(|result| {
            result.map_err(|e| CatalogError::Csv {
                path: path.to_string_lossy().to_string(),
                source: e,
            })
        })
        .collect()
}

/// Loads an ingredient catalog with the header `name,protein,fat,fiber,lysine`.
pub fn load_ingredients(path: &Path) -> Result<Vec<Ingredient>, CatalogError> {
    let records: Vec<IngredientRecord> = read_records(path)?;
    let mut seen = HashSet::new();
    let mut ingredients = Vec::with_capacity(records.len());

    for record in records {
        let ingredient = Ingredient::new(
            record.name,
            NutrientProfile::new(record.protein, record.fat, record.fiber, record.lysine),
        );
        ingredient
            .validate()
            .map_err(|e| CatalogError::Ingredient {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
        if !seen.insert(ingredient.name.clone()) {
            return Err(CatalogError::Duplicate {
                path: path.to_string_lossy().to_string(),
                name: ingredient.name,
            });
        }
        ingredients.push(ingredient);
    }

    Ok(ingredients)
}

/// Loads a price list with the header `name,price,unit`. A missing unit means per pound.
pub fn load_prices(path: &Path) -> Result<PriceTable, CatalogError> {
    let records: Vec<PriceRecord> = read_records(path)?;
    let mut table = PriceTable::new();

    for record in records {
        let unit = match record.unit.as_deref() {
            None | Some("") => PriceUnit::Pound,
            Some(s) => s.parse().map_err(|e| CatalogError::Unit {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?,
        };
        table
            .insert(&record.name, record.price, unit)
            .map_err(|e| CatalogError::Price {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
    }

    Ok(table)
}

/// Loads a saved mix with the header `name,mass`.
pub fn load_mix(path: &Path) -> Result<Vec<(String, f64)>, CatalogError> {
    let records: Vec<MixRecord> = read_records(path)?;
    records
        .into_iter()
        .map(|r| {
            if !r.mass.is_finite() || r.mass < 0.0 {
                Err(CatalogError::InvalidMass {
                    path: path.to_string_lossy().to_string(),
                    name: r.name,
                    mass: r.mass,
                })
            } else {
                Ok((r.name, r.mass))
            }
        })
        .collect()
}

/// Writes mix entries as CSV with the header `name,mass,percent`.
pub fn write_mix<W: Write>(writer: W, entries: &[MixEntry]) -> Result<(), CatalogError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for entry in entries {
        csv_writer.serialize(entry)?;
    }
    csv_writer.flush().map_err(|e| CatalogError::Write(e.into()))?;
    Ok(())
}
