//! Common types shared across the simulator.

/// Error types for memory, configuration, cache and trace failures.
pub mod error;

pub use self::error::{CacheError, ConfigError, MemoryError, TraceError, TraceErrorKind};
