//! Cache statistics.
//!
//! Counters are only ever advanced by the cache's hit/miss bookkeeping and
//! only ever cleared by [`Cache::reset`](crate::Cache::reset). Every access
//! is recorded as exactly one hit or one miss, so `accesses == hits + misses`
//! holds at every observation point.

use std::fmt;

use serde::Serialize;

use crate::core::cache::geometry::CacheGeometry;
use crate::system::memory::MemoryStats;

/// Direction of a cache access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

/// Hit/miss counters for one cache instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    read_hits: u64,
    write_hits: u64,
    read_misses: u64,
    write_misses: u64,
    writebacks: u64,
    flushed_words: u64,
    write_throughs: u64,
}

impl CacheStats {
    pub fn accesses(&self) -> u64 {
        self.hits() + self.misses()
    }

    pub fn hits(&self) -> u64 {
        self.read_hits + self.write_hits
    }

    pub fn misses(&self) -> u64 {
        self.read_misses + self.write_misses
    }

    pub fn read_hits(&self) -> u64 {
        self.read_hits
    }

    pub fn write_hits(&self) -> u64 {
        self.write_hits
    }

    pub fn read_misses(&self) -> u64 {
        self.read_misses
    }

    pub fn write_misses(&self) -> u64 {
        self.write_misses
    }

    /// Dirty lines written back to memory, on eviction or flush.
    pub fn writebacks(&self) -> u64 {
        self.writebacks
    }

    /// Words written to memory by write-backs.
    pub fn flushed_words(&self) -> u64 {
        self.flushed_words
    }

    /// Write misses passed straight to memory under no-write-allocate.
    pub fn write_throughs(&self) -> u64 {
        self.write_throughs
    }

    /// `hits / accesses`, or `None` before the first access.
    pub fn hit_rate(&self) -> Option<f64> {
        ratio(self.hits(), self.accesses())
    }

    /// `misses / accesses`, or `None` before the first access.
    pub fn miss_rate(&self) -> Option<f64> {
        ratio(self.misses(), self.accesses())
    }

    pub(crate) fn record_hit(&mut self, kind: AccessKind) {
        match kind {
            AccessKind::Read => self.read_hits += 1,
            AccessKind::Write => self.write_hits += 1,
        }
    }

    pub(crate) fn record_miss(&mut self, kind: AccessKind) {
        match kind {
            AccessKind::Read => self.read_misses += 1,
            AccessKind::Write => self.write_misses += 1,
        }
    }

    pub(crate) fn record_writeback(&mut self, words: usize) {
        self.writebacks += 1;
        self.flushed_words += words as u64;
    }

    pub(crate) fn record_write_through(&mut self) {
        self.write_throughs += 1;
    }
}

fn ratio(part: u64, total: u64) -> Option<f64> {
    (total > 0).then(|| part as f64 / total as f64)
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cache Statistics:")?;
        writeln!(f, "  Total Accesses: {}", self.accesses())?;
        writeln!(
            f,
            "  Hits:   {:>10}  (read {}, write {})",
            self.hits(),
            self.read_hits,
            self.write_hits
        )?;
        writeln!(
            f,
            "  Misses: {:>10}  (read {}, write {})",
            self.misses(),
            self.read_misses,
            self.write_misses
        )?;
        if let (Some(hit), Some(miss)) = (self.hit_rate(), self.miss_rate()) {
            writeln!(f, "  Hit Rate:  {:.2}%", hit * 100.0)?;
            writeln!(f, "  Miss Rate: {:.2}%", miss * 100.0)?;
        }
        writeln!(f, "  Write-backs: {} ({} words)", self.writebacks, self.flushed_words)?;
        write!(f, "  Write-throughs: {}", self.write_throughs)
    }
}

/// Snapshot of a finished run, for printing or JSON export.
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub geometry: GeometryReport,
    pub cache: CacheSummary,
    pub memory: MemoryStats,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct GeometryReport {
    pub sets: usize,
    pub ways: usize,
    pub words_per_line: usize,
    pub capacity_bytes: usize,
}

impl From<&CacheGeometry> for GeometryReport {
    fn from(g: &CacheGeometry) -> Self {
        Self {
            sets: g.sets(),
            ways: g.ways(),
            words_per_line: g.words_per_line(),
            capacity_bytes: g.capacity_bytes(),
        }
    }
}

/// Raw counters plus the derived totals and rates.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct CacheSummary {
    pub accesses: u64,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: Option<f64>,
    pub miss_rate: Option<f64>,
    #[serde(flatten)]
    pub counters: CacheStats,
}

impl From<CacheStats> for CacheSummary {
    fn from(s: CacheStats) -> Self {
        Self {
            accesses: s.accesses(),
            hits: s.hits(),
            misses: s.misses(),
            hit_rate: s.hit_rate(),
            miss_rate: s.miss_rate(),
            counters: s,
        }
    }
}

impl Report {
    pub fn new(geometry: &CacheGeometry, cache: CacheStats, memory: MemoryStats) -> Self {
        Self {
            geometry: geometry.into(),
            cache: cache.into(),
            memory,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = &self.geometry;
        writeln!(
            f,
            "Geometry: {} sets x {} ways x {} words ({} bytes)",
            g.sets, g.ways, g.words_per_line, g.capacity_bytes
        )?;
        writeln!(f, "{}", self.cache.counters)?;
        writeln!(f, "Memory Requests:")?;
        writeln!(f, "  Reads:  {}", self.memory.read_requests)?;
        write!(f, "  Writes: {}", self.memory.write_requests)
    }
}
