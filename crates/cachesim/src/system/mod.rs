//! Backing memory behind the cache.

/// Sized accessors and the flat byte-addressable store.
pub mod memory;

pub use self::memory::{AccessSize, FlatMemory, Memory};
