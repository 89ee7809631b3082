//! Numeric value generators.

use rand::Rng;

/// Decimal places kept for generated floats.
pub const FLOAT_DECIMALS: i32 = 2;

/// Generate a random integer in the given range (inclusive).
///
/// Inverted bounds are swapped.
pub fn generate_int_range<R: Rng>(rng: &mut R, min: i64, max: i64) -> i64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rng.gen_range(lo..=hi)
}

/// Generate a random float in the given range (inclusive), rounded to
/// [`FLOAT_DECIMALS`] places.
///
/// Inverted bounds are swapped. Rounding never moves the value outside the
/// range. Callers must pass finite bounds whose difference is finite.
pub fn generate_float_range<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    let value = rng.gen_range(lo..=hi);
    round_to(value, FLOAT_DECIMALS).clamp(lo, hi)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}
