use crate::engine::config::SeedBand;
use rand::Rng;

/// Draws a proportion uniformly from `band`, bounds included.
#[inline]
pub fn sample_band(band: SeedBand, rng: &mut impl Rng) -> f64 {
    if band.max <= band.min {
        return band.min;
    }
    rng.gen_range(band.min..=band.max)
}
