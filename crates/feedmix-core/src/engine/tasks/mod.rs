//! The two phases of one optimization run.
//!
//! Seeding draws a starting point from role bands, optionally biased by price. Refinement
//! walks that point toward the targets in small, bounded steps.

pub mod refinement;
pub mod seeding;
