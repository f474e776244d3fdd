//! Error handling.
//!
//! Cache misses are not errors. The variants here cover the ways a request
//! can genuinely fail: a bad access width or address against the backing
//! memory, an inconsistent cache configuration, or a malformed trace line.

use thiserror::Error;

/// Failure of a single access against the backing memory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// Access width was not 1, 2 or 4 bytes.
    #[error("invalid memory access size: {size} bytes (expected 1, 2 or 4)")]
    InvalidSize { size: u32 },
    /// Access touched bytes past the end of the backing store.
    #[error("address {addr:#010x} ({size} bytes) out of range for memory of {limit} bytes")]
    OutOfBounds { addr: u32, size: u32, limit: usize },
    /// Memory image does not fit at the requested offset.
    #[error("image of {len} bytes at offset {offset:#010x} exceeds memory of {limit} bytes")]
    ImageTooLarge {
        len: usize,
        offset: usize,
        limit: usize,
    },
}

/// Rejected cache or memory configuration.
///
/// Raised when a cache is constructed, never on an access.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be a non-zero power of two, got {value}")]
    NotPowerOfTwo { field: &'static str, value: u64 },
    #[error(
        "geometry needs {bits} address bits (2 byte + {line_word_bits} word + {set_bits} set), more than 32"
    )]
    GeometryTooWide {
        bits: u32,
        set_bits: u32,
        line_word_bits: u32,
    },
    #[error("{way_bits} way bits exceeds the maximum of {max}")]
    TooManyWayBits { way_bits: u32, max: u32 },
    #[error("cache of {words} words exceeds the maximum of {max} words")]
    CapacityTooLarge { words: u64, max: u64 },
    #[error("{ways} ways exceeds the {max} supported by the {policy} policy")]
    TooManyWays {
        ways: usize,
        max: usize,
        policy: &'static str,
    },
    #[error("memory size must be a non-zero multiple of the {line_bytes}-byte line, got {size_bytes}")]
    MemorySize { size_bytes: usize, line_bytes: usize },
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Failure of a cache operation.
///
/// Only raised when the cache has to talk to the backing memory (fill,
/// write-back or write-through) and that access faults.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("memory fault: {0}")]
    Memory(#[from] MemoryError),
}

/// Malformed line in an access trace.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("trace line {line}: {kind}")]
pub struct TraceError {
    /// 1-based line number.
    pub line: usize,
    pub kind: TraceErrorKind,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraceErrorKind {
    #[error("unknown operation `{0}` (expected `r` or `w`)")]
    UnknownOp(String),
    #[error("expected {expected} operand(s), found {found}")]
    OperandCount { expected: usize, found: usize },
    #[error("invalid number `{0}`")]
    BadNumber(String),
}
