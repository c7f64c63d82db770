//! # Workflows Module
//!
//! Top-level entry points of the library. A workflow validates its inputs, drives the engine
//! phases in order and hands back a finished result.
//!
//! - **Optimization Workflow** ([`optimize`]) - Seeds, refines and materializes a feed mix
//!   for a set of candidate ingredients and nutrient targets.

pub mod optimize;
