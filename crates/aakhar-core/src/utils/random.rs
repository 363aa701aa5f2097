//! Shuffling helpers shared by decks, recall lists and quiz generation.

use rand::seq::SliceRandom;
use rand::Rng;

/// Return a uniformly shuffled copy of `items` (Fisher-Yates).
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

/// Pick up to `count` distinct elements of `items` uniformly at random.
pub fn sample<T: Clone, R: Rng + ?Sized>(items: &[T], count: usize, rng: &mut R) -> Vec<T> {
    let mut out = shuffled(items, rng);
    out.truncate(count);
    out
}
