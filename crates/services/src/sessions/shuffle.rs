use rand::Rng;
use rand::seq::SliceRandom;

/// Returns `items` in a uniformly random order.
///
/// Consumes and returns the vector so callers treat shuffling as a pure
/// function of the sequence and the RNG state.
#[must_use]
pub fn shuffled<T>(mut items: Vec<T>, rng: &mut impl Rng) -> Vec<T> {
    items.shuffle(rng);
    items
}
