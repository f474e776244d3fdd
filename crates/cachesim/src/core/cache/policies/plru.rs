//! Pseudo-LRU (PLRU) Replacement Policy.
//!
//! Approximates LRU with one MRU bit per way. A use sets the way's bit; once
//! every bit of a set is set, all but the most recent are cleared. The victim
//! is the lowest way whose bit is clear.
//!
//! The bits of a set live in one `u64`, so at most 64 ways are supported.

use super::ReplacementPolicy;

/// Largest associativity the bit vector can track.
pub const MAX_WAYS: usize = u64::BITS as usize;

/// PLRU Policy state.
pub struct PlruPolicy {
    /// MRU bits, one word per set.
    usage: Vec<u64>,
    /// All-ways mask for the configured associativity.
    full: u64,
}

impl PlruPolicy {
    /// Creates a new PLRU policy instance. `ways` must not exceed
    /// [`MAX_WAYS`]; the cache checks this at construction.
    pub fn new(sets: usize, ways: usize) -> Self {
        let full = if ways >= MAX_WAYS {
            u64::MAX
        } else {
            (1u64 << ways) - 1
        };
        Self {
            usage: vec![0; sets],
            full,
        }
    }
}

impl ReplacementPolicy for PlruPolicy {
    fn update(&mut self, set: usize, way: usize) {
        let mask = 1u64 << way;
        self.usage[set] |= mask;
        if self.usage[set] & self.full == self.full {
            self.usage[set] = mask;
        }
    }

    fn get_victim(&mut self, set: usize) -> usize {
        // At least one bit is always clear after `update`, except for a
        // direct-mapped cache where way 0 is the only choice.
        (!self.usage[set] & self.full).trailing_zeros() as usize % MAX_WAYS
    }

    fn reset(&mut self) {
        self.usage.fill(0);
    }
}
