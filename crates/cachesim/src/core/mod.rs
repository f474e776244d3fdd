//! Cache core.

/// Set-associative cache: geometry, line storage and lookup engine.
pub mod cache;
