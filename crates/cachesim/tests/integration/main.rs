//! # Integration Tests
//!
//! End-to-end runs through configuration, trace parsing and replay, plus
//! randomized checks of the cache against a flat shadow memory.


/// Randomized coherence and counter invariants.
mod invariants;
