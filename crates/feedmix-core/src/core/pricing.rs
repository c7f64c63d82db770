use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Supplies the price per pound of an ingredient, `0.0` meaning "unknown".
///
/// Oracles are queried once per ingredient before the optimizer starts; the optimizer never
/// calls back into an oracle mid-computation.
pub trait PriceOracle {
    fn price_per_pound(&self, name: &str) -> f64;
}

impl<F> PriceOracle for F
where
    F: Fn(&str) -> f64,
{
    fn price_per_pound(&self, name: &str) -> f64 {
        self(name)
    }
}

impl PriceOracle for HashMap<String, f64> {
    fn price_per_pound(&self, name: &str) -> f64 {
        self.get(name).copied().unwrap_or(0.0)
    }
}

/// An oracle that knows no prices.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrices;

impl PriceOracle for NoPrices {
    fn price_per_pound(&self, _name: &str) -> f64 {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceUnit {
    Pound,  // Single pound
    Bag50,  // Standard 50 lb feed bag
    Bag100, // Large 100 lb feed bag
    Ton,    // Bulk purchase, 2000 lb
}

impl PriceUnit {
    pub fn pounds(&self) -> f64 {
        match self {
            PriceUnit::Pound => 1.0,
            PriceUnit::Bag50 => 50.0,
            PriceUnit::Bag100 => 100.0,
            PriceUnit::Ton => 2000.0,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown price unit: '{0}'. Expected one of 'lb', '50lbs', '100lbs', 'ton'")]
pub struct PriceUnitError(pub String);

impl FromStr for PriceUnit {
    type Err = PriceUnitError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lb" | "1lb" | "lbs" | "pound" => Ok(PriceUnit::Pound),
            "50lbs" | "50lb" => Ok(PriceUnit::Bag50),
            "100lbs" | "100lb" => Ok(PriceUnit::Bag100),
            "ton" => Ok(PriceUnit::Ton),
            _ => Err(PriceUnitError(s.to_string())),
        }
    }
}

impl fmt::Display for PriceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PriceUnit::Pound => "lb",
                PriceUnit::Bag50 => "50lbs",
                PriceUnit::Bag100 => "100lbs",
                PriceUnit::Ton => "ton",
            }
        )
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PriceError {
    #[error("Invalid price {price} for '{name}': prices must be finite and non-negative")]
    InvalidPrice { name: String, price: f64 },
}

/// Price per pound by ingredient name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    prices: HashMap<String, f64>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the price paid per `unit`, stored as a price per pound. A later record for
    /// the same ingredient replaces the earlier one.
    pub fn insert(&mut self, name: &str, price: f64, unit: PriceUnit) -> Result<(), PriceError> {
        if !price.is_finite() || price < 0.0 {
            return Err(PriceError::InvalidPrice {
                name: name.to_string(),
                price,
            });
        }
        self.prices.insert(name.to_string(), price / unit.pounds());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.prices.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl PriceOracle for PriceTable {
    fn price_per_pound(&self, name: &str) -> f64 {
        self.get(name).unwrap_or(0.0)
    }
}
