//! Simulator configuration.
//!
//! Configuration is read from TOML. Every field has a default, so an empty
//! file (or `Config::default()`) describes a 256-set, 8-way cache with
//! 16-word (64-byte) lines, LRU replacement and write-allocate, in front of
//! 1 MiB of memory:
//!
//! ```toml
//! [cache]
//! sets = 256
//! ways = 8
//! line_words = 16
//! policy = "LRU"
//! write_miss = "Allocate"
//!
//! [memory]
//! size_bytes = 1048576
//! ```
//!
//! Dimensions are plain counts here; they are validated and converted to the
//! log2 [`CacheGeometry`] when the cache is built.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::ConfigError;
use crate::core::cache::Cache;
use crate::core::cache::geometry::CacheGeometry;
use crate::system::memory::FlatMemory;

/// Root configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub cache: CacheConfig,
    pub memory: MemoryConfig,
}

/// Replacement policy selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ReplacementPolicy {
    #[default]
    #[serde(rename = "LRU", alias = "Lru", alias = "lru")]
    Lru,
    #[serde(rename = "FIFO", alias = "Fifo", alias = "fifo")]
    Fifo,
    #[serde(rename = "PLRU", alias = "Plru", alias = "plru")]
    Plru,
    #[serde(rename = "Random", alias = "random")]
    Random,
}

impl ReplacementPolicy {
    pub fn name(self) -> &'static str {
        match self {
            ReplacementPolicy::Lru => "LRU",
            ReplacementPolicy::Fifo => "FIFO",
            ReplacementPolicy::Plru => "PLRU",
            ReplacementPolicy::Random => "Random",
        }
    }
}

/// What a write miss does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum WriteMissPolicy {
    /// Fill the line as on a read miss, then write into it and mark it dirty.
    #[default]
    #[serde(alias = "allocate")]
    Allocate,
    /// Write the word straight to memory without installing a line.
    #[serde(alias = "no-allocate", alias = "no_allocate")]
    NoAllocate,
}

/// Cache dimensions and policies.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub sets: usize,
    pub ways: usize,
    pub line_words: usize,
    pub policy: ReplacementPolicy,
    pub write_miss: WriteMissPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sets: 256,
            ways: 8,
            line_words: 16,
            policy: ReplacementPolicy::Lru,
            write_miss: WriteMissPolicy::Allocate,
        }
    }
}

impl CacheConfig {
    /// Validates the dimensions and converts them to log2 form.
    pub fn geometry(&self) -> Result<CacheGeometry, ConfigError> {
        CacheGeometry::from_counts(self.sets, self.ways, self.line_words)
    }
}

/// Backing memory size.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemoryConfig {
    pub size_bytes: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size_bytes: 1 << 20,
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Builds a cache over a fresh zeroed memory.
    ///
    /// # Errors
    ///
    /// Any inconsistency in the cache dimensions, the policy's way limit, or
    /// a memory size that is zero or not a whole number of lines.
    pub fn build(&self) -> Result<Cache<FlatMemory>, ConfigError> {
        let geometry = self.cache.geometry()?;
        let line_bytes = geometry.line_bytes();
        let size_bytes = self.memory.size_bytes;
        if size_bytes == 0 || size_bytes % line_bytes != 0 {
            return Err(ConfigError::MemorySize {
                size_bytes,
                line_bytes,
            });
        }
        Cache::with_policy(
            geometry,
            self.cache.policy,
            self.cache.write_miss,
            FlatMemory::new(size_bytes),
        )
    }
}
