pub mod guidelines;
pub mod ingredient;
pub mod mix;
pub mod nutrient;
