//! Shared fixtures.

use cachesim::config::{ReplacementPolicy, WriteMissPolicy};
use cachesim::{Cache, CacheGeometry, FlatMemory};

/// Small deterministic geometry: 2 sets, 2 ways, 4 words (16-byte lines).
///
/// With these parameters:
///   word = (addr >> 2) & 3
///   set  = (addr >> 4) & 1
///   tag  = addr >> 5
///
/// so 0x00, 0x20, 0x40, 0x60 all map to set 0 with tags 0..=3.
pub fn small_geometry() -> CacheGeometry {
    CacheGeometry::new(1, 1, 2).unwrap()
}

pub const MEMORY_BYTES: usize = 256;

/// Routes library logging through the test harness; `RUST_LOG=debug` shows
/// fills and evictions for a failing test.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn small_cache(policy: ReplacementPolicy) -> Cache<FlatMemory> {
    init_logger();
    Cache::with_policy(
        small_geometry(),
        policy,
        WriteMissPolicy::Allocate,
        FlatMemory::new(MEMORY_BYTES),
    )
    .unwrap()
}

pub fn no_allocate_cache() -> Cache<FlatMemory> {
    init_logger();
    Cache::with_policy(
        small_geometry(),
        ReplacementPolicy::Lru,
        WriteMissPolicy::NoAllocate,
        FlatMemory::new(MEMORY_BYTES),
    )
    .unwrap()
}
