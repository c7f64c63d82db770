//! # Engine Module
//!
//! The optimizer machinery behind [`crate::workflows::optimize`].
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Iteration budget, step sizes, thresholds, bounds, seed
//!   bands and price penalties, assembled through a validating builder
//! - **Roles** ([`role`]) - Classifies an ingredient by its nutrient profile, which decides its
//!   seed band and its ceiling
//! - **Proportions** ([`proportions`]) - The bounded, normalized share vector and its limits
//! - **Progress Monitoring** ([`progress`]) - Phase and task events for front ends
//! - **Error Handling** ([`error`]) - Precondition failures
//!
//! The seeding and refinement phases live in the crate-private `tasks` module.

pub mod config;
pub mod error;
pub mod progress;
pub mod proportions;
pub mod role;
pub(crate) mod tasks;
pub(crate) mod utils;
