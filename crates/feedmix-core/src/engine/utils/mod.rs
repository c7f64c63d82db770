//! Helpers for the engine tasks.

pub mod sampling;
