//! # Core Module
//!
//! Stateless building blocks shared by the engine and the workflows.
//!
//! - **Data Models** ([`models`]) - Ingredients, nutrient profiles, targets, mix entries and
//!   the feeding guidelines used to flag a finished mix
//! - **Pricing** ([`pricing`]) - The price oracle abstraction, purchase units and price tables
//! - **File I/O** ([`io`]) - CSV loaders for ingredient catalogs, price lists and saved mixes

pub mod io;
pub mod models;
pub mod pricing;
