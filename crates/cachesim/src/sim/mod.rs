//! Simulation drivers.

/// Access trace format, parser and replay.
pub mod trace;

pub use self::trace::{Access, parse_trace};
