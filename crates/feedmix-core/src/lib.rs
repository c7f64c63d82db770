//! # Feedmix Core Library
//!
//! A library for composing swine feed mixes: given a catalog of candidate ingredients and a
//! target nutrient profile, it assigns a mass to every ingredient so that the mix reaches the
//! requested total weight and its mass-weighted nutrient averages land as close as possible to
//! the targets.
//!
//! ## Architectural Philosophy
//!
//! The library is split into three layers, each depending only on the ones below it.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Ingredient`, `NutrientProfile`,
//!   `MixProfile`), feeding guidelines, price units and price tables, and CSV catalog I/O.
//!
//! - **[`engine`]: The Logic Core.** The optimizer machinery: configuration, ingredient role
//!   classification, the bounded proportion vector, and the seeding and refinement tasks.
//!
//! - **[`workflows`]: The Public API.** Validates preconditions, runs the optimizer phases
//!   in order and materializes the final mix.
//!
//! The optimizer is a bounded greedy-adjustment heuristic, not a linear or quadratic
//! programming solver. It always terminates within its iteration budget and returns a
//! feasible, normalized mix, which is advisory when the targets are out of reach.

pub mod core;
pub mod engine;
pub mod workflows;
