//! Categorical and boolean value generators.

use rand::seq::SliceRandom;
use rand::Rng;

/// Pick one candidate uniformly at random. `None` for an empty list.
pub fn pick_from_list<'a, R: Rng>(rng: &mut R, values: &'a [String]) -> Option<&'a String> {
    values.choose(rng)
}

/// Generate a boolean that is `true` with the given probability.
///
/// The probability is clamped to `[0, 1]`; NaN counts as 0.5.
pub fn generate_bool<R: Rng>(rng: &mut R, probability_true: f64) -> bool {
    let p = if probability_true.is_nan() {
        0.5
    } else {
        probability_true.clamp(0.0, 1.0)
    };
    rng.gen_bool(p)
}
