//! # Unit Tests
//!
//! Component-level tests for the cache simulator: address decoding, the
//! backing memory, replacement policies, configuration, statistics and the
//! lookup engine.

/// Shared fixtures.
mod common;


/// Sized memory accessors, bounds checks and request counters.
mod memory;



/// Statistics counters and derived rates.
mod stats;
