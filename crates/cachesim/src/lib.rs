//! Set-associative cache simulator library.
//!
//! This crate models a single write-back cache sitting between an address
//! source (an instruction-set simulator, a trace file) and a flat,
//! byte-addressable backing memory:
//! 1. **Geometry:** log2 set/way/line dimensions and address decoding into
//!    tag, set index and word offset.
//! 2. **Cache:** per-line tag/valid/dirty storage, the read/write lookup
//!    engine, fill-on-miss and write-back eviction.
//! 3. **Policies:** pluggable replacement policies (LRU, FIFO, PLRU, Random).
//! 4. **Memory:** sized (1/2/4-byte) bounds-checked accessors over a flat store.
//! 5. **Simulation:** configuration loading, trace parsing and statistics.

/// Shared error types.
pub mod common;
/// Simulator configuration (defaults, enums, TOML loading).
pub mod config;
/// Cache core: geometry, line storage, lookup engine and replacement policies.
pub mod core;
/// Trace parsing and replay.
pub mod sim;
/// Hit/miss statistics and reporting.
pub mod stats;
/// Backing memory behind the cache.
pub mod system;

/// Root configuration type; use `Config::default()` or load from TOML.
pub use crate::config::Config;
/// The cache itself; owns its backing memory and statistics.
pub use crate::core::cache::Cache;
/// Validated log2 cache dimensions.
pub use crate::core::cache::geometry::CacheGeometry;
/// Flat little-endian backing memory.
pub use crate::system::memory::FlatMemory;
