//! Pseudo-random replacement.
//!
//! One xorshift64 generator is shared by every set. It starts from a fixed
//! seed, so a trace replayed after [`ReplacementPolicy::reset`] evicts the
//! same ways in the same order.

use super::ReplacementPolicy;

/// Initial generator state; any non-zero value works.
const SEED: u64 = 123_456_789;

/// Random Policy state.
pub struct RandomPolicy {
    ways: usize,
    state: u64,
}

impl RandomPolicy {
    /// Creates a policy for `ways`-way sets. The set count is irrelevant as
    /// no per-set history is kept.
    pub fn new(_sets: usize, ways: usize) -> Self {
        Self { ways, state: SEED }
    }

    /// Advances the generator (xorshift64, shifts 13/7/17).
    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl ReplacementPolicy for RandomPolicy {
    // Hits and fills carry no information for this policy.
    fn update(&mut self, _set: usize, _way: usize) {}

    /// Draws the next way, uniform up to the modulo bias of `ways`.
    fn get_victim(&mut self, _set: usize) -> usize {
        (self.next() % self.ways as u64) as usize
    }

    fn reset(&mut self) {
        self.state = SEED;
    }
}
