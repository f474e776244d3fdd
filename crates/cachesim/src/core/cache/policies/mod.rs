//! Replacement policies.
//!
//! A policy only decides which way of a full set to evict. The cache reports
//! hits through `update` and fills through `insert`, asks for a victim once
//! all ways of a set are valid, and calls `reset` together with its own reset.

/// Round-robin replacement.
pub mod fifo;
/// Least-recently-used replacement (the default).
pub mod lru;
/// MRU-bit pseudo-LRU replacement.
pub mod plru;
/// Seeded pseudo-random replacement.
pub mod random;

pub use self::fifo::FifoPolicy;
pub use self::lru::LruPolicy;
pub use self::plru::PlruPolicy;
pub use self::random::RandomPolicy;

/// Victim selection for a set-associative cache.
pub trait ReplacementPolicy: Send {
    /// Records a hit on `way` in `set`.
    fn update(&mut self, set: usize, way: usize);

    /// Records a fill of `way` in `set`. Treated as a use unless the policy
    /// cares about insertion order.
    fn insert(&mut self, set: usize, way: usize) {
        self.update(set, way);
    }

    /// Picks the way of `set` to evict.
    fn get_victim(&mut self, set: usize) -> usize;

    /// Restores the freshly constructed state.
    fn reset(&mut self);
}
