//! Least Recently Used (LRU) Replacement Policy.
//!
//! Each set keeps a usage stack of its ways. A use moves the way to the top
//! (MRU); the bottom of the stack is the LRU way and is the victim. Initially
//! the stack is `0, 1, .., ways - 1`, so with no history the last way goes
//! first.
//!
//! # Performance
//!
//! - `update()`: O(W) where W is the associativity
//! - `get_victim()`: O(1)
//! - Space: O(S × W)

use super::ReplacementPolicy;

/// LRU Policy state.
pub struct LruPolicy {
    /// One usage stack per set. Index 0 is MRU, last index is LRU.
    usage: Vec<Vec<usize>>,
    ways: usize,
}

impl LruPolicy {
    /// Creates a new LRU policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            usage: (0..sets).map(|_| (0..ways).collect()).collect(),
            ways,
        }
    }

    /// Ways of `set` from most to least recently used.
    pub fn order(&self, set: usize) -> &[usize] {
        &self.usage[set]
    }
}

impl ReplacementPolicy for LruPolicy {
    fn update(&mut self, set: usize, way: usize) {
        let stack = &mut self.usage[set];
        if let Some(pos) = stack.iter().position(|&x| x == way) {
            stack.remove(pos);
        }
        stack.insert(0, way);
    }

    fn get_victim(&mut self, set: usize) -> usize {
        self.usage[set].last().copied().unwrap_or(0)
    }

    fn reset(&mut self) {
        let ways = self.ways;
        for stack in &mut self.usage {
            stack.clear();
            stack.extend(0..ways);
        }
    }
}
