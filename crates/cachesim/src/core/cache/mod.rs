//! Set-associative write-back cache.
//!
//! # Policies
//!
//! - **Read miss:** the line is filled from memory (after writing back a
//!   dirty victim) and the read is served from the new line.
//! - **Write hit:** the word is updated in the line and the line becomes dirty.
//!   Memory is only updated when the line is written back.
//! - **Write miss:** configurable, see [`WriteMissPolicy`]. `Allocate` fills
//!   like a read miss then writes; `NoAllocate` writes the word straight to
//!   memory and leaves the cache untouched apart from the miss counter.
//! - **Victim:** the first invalid way of the set, otherwise the way chosen by
//!   the replacement policy (LRU unless configured otherwise).

pub mod geometry;
pub mod line;
pub mod policies;

use self::geometry::{CacheGeometry, DecodedAddr, WORD_BYTES};
use self::line::{CacheLine, CacheStore, LineState};
use self::policies::{FifoPolicy, LruPolicy, PlruPolicy, RandomPolicy, ReplacementPolicy, plru};
use crate::common::{CacheError, ConfigError, MemoryError};
use crate::config::{ReplacementPolicy as PolicyKind, WriteMissPolicy};
use crate::stats::{AccessKind, CacheStats, Report};
use crate::system::memory::{AccessSize, FlatMemory, Memory};

/// A single cache instance in front of a backing memory `M`.
///
/// The cache owns its memory, its line storage and its statistics, so
/// independent instances (one per simulated core, say) never share state.
pub struct Cache<M: Memory> {
    geometry: CacheGeometry,
    store: CacheStore,
    policy: Box<dyn ReplacementPolicy>,
    policy_kind: PolicyKind,
    write_miss: WriteMissPolicy,
    stats: CacheStats,
    memory: M,
    /// Line-sized buffer for fills.
    scratch: Box<[u32]>,
}

impl<M: Memory> Cache<M> {
    /// Creates an empty LRU, write-allocate cache.
    pub fn new(geometry: CacheGeometry, memory: M) -> Self {
        Self::assemble(geometry, PolicyKind::Lru, WriteMissPolicy::Allocate, memory)
    }

    /// Creates an empty cache with the given policies.
    ///
    /// # Errors
    ///
    /// `ConfigError::TooManyWays` if the replacement policy cannot track the
    /// geometry's associativity.
    pub fn with_policy(
        geometry: CacheGeometry,
        policy: PolicyKind,
        write_miss: WriteMissPolicy,
        memory: M,
    ) -> Result<Self, ConfigError> {
        if policy == PolicyKind::Plru && geometry.ways() > plru::MAX_WAYS {
            return Err(ConfigError::TooManyWays {
                ways: geometry.ways(),
                max: plru::MAX_WAYS,
                policy: policy.name(),
            });
        }
        Ok(Self::assemble(geometry, policy, write_miss, memory))
    }

    fn assemble(
        geometry: CacheGeometry,
        policy_kind: PolicyKind,
        write_miss: WriteMissPolicy,
        memory: M,
    ) -> Self {
        let (sets, ways) = (geometry.sets(), geometry.ways());
        let policy: Box<dyn ReplacementPolicy> = match policy_kind {
            PolicyKind::Lru => Box::new(LruPolicy::new(sets, ways)),
            PolicyKind::Fifo => Box::new(FifoPolicy::new(sets, ways)),
            PolicyKind::Plru => Box::new(PlruPolicy::new(sets, ways)),
            PolicyKind::Random => Box::new(RandomPolicy::new(sets, ways)),
        };
        log::info!(
            "cache: {} sets x {} ways x {} words, {} replacement, {:?} on write miss",
            sets,
            ways,
            geometry.words_per_line(),
            policy_kind.name(),
            write_miss
        );
        Self {
            store: CacheStore::new(&geometry),
            scratch: vec![0; geometry.words_per_line()].into_boxed_slice(),
            geometry,
            policy,
            policy_kind,
            write_miss,
            stats: CacheStats::default(),
            memory,
        }
    }

    /// Invalidates every line and zeroes every counter, restoring the state
    /// right after construction. Dirty data is discarded, not written back;
    /// call [`flush`](Self::flush) first to keep it.
    pub fn reset(&mut self) {
        self.store.clear();
        self.policy.reset();
        self.stats = CacheStats::default();
        log::info!("cache reset");
    }

    /// Reads the word containing `addr`.
    ///
    /// The low two address bits are ignored. A miss fills the line first.
    ///
    /// # Errors
    ///
    /// `CacheError::Memory` if the write-back of the victim or the fill
    /// faults. The miss is counted regardless.
    pub fn read(&mut self, addr: u32) -> Result<u32, CacheError> {
        let d = self.geometry.decode(addr);
        let way = match self.lookup(&d, AccessKind::Read) {
            Some(way) => way,
            None => self.fill(addr, &d)?,
        };
        Ok(self.store.line(d.set, way).words[d.word])
    }

    /// Writes `data` to the word containing `addr`.
    ///
    /// # Errors
    ///
    /// `CacheError::Memory` if a fill, write-back or write-through faults.
    pub fn write(&mut self, addr: u32, data: u32) -> Result<(), CacheError> {
        let d = self.geometry.decode(addr);
        let way = match self.lookup(&d, AccessKind::Write) {
            Some(way) => way,
            None => match self.write_miss {
                WriteMissPolicy::Allocate => self.fill(addr, &d)?,
                WriteMissPolicy::NoAllocate => {
                    let word_addr = addr & !(WORD_BYTES - 1);
                    self.memory.write(word_addr, data, AccessSize::Word)?;
                    self.stats.record_write_through();
                    log::debug!("write-through {:#010x} <- {:#010x}", word_addr, data);
                    return Ok(());
                }
            },
        };
        let line = self.store.line_mut(d.set, way);
        line.words[d.word] = data;
        line.dirty = true;
        Ok(())
    }

    /// Writes every dirty line back to memory and invalidates all lines.
    ///
    /// Hit/miss counters are untouched; write-backs are counted.
    pub fn flush(&mut self) -> Result<(), CacheError> {
        let words = self.geometry.words_per_line();
        for set in 0..self.geometry.sets() {
            for line in self.store.set_mut(set) {
                if line.state() == LineState::Dirty {
                    write_back(&self.geometry, set, line, &mut self.memory)?;
                    self.stats.record_writeback(words);
                }
                line.invalidate();
            }
        }
        log::info!(
            "cache flushed, {} words written back so far",
            self.stats.flushed_words()
        );
        Ok(())
    }

    fn lookup(&mut self, d: &DecodedAddr, kind: AccessKind) -> Option<usize> {
        match self.store.find(d.set, d.tag) {
            Some(way) => {
                self.stats.record_hit(kind);
                self.policy.update(d.set, way);
                log::trace!("{:?} hit: set {} way {} tag {:#x}", kind, d.set, way, d.tag);
                Some(way)
            }
            None => {
                self.stats.record_miss(kind);
                log::debug!("{:?} miss: set {} tag {:#x}", kind, d.set, d.tag);
                None
            }
        }
    }

    /// Brings the line holding `addr` into its set and returns its way.
    fn fill(&mut self, addr: u32, d: &DecodedAddr) -> Result<usize, CacheError> {
        let way = match self.store.free_way(d.set) {
            Some(way) => way,
            None => self.policy.get_victim(d.set),
        };

        let victim = self.store.line_mut(d.set, way);
        if victim.state() == LineState::Dirty {
            write_back(&self.geometry, d.set, victim, &mut self.memory)?;
            // Memory now matches the victim; if the fetch below faults the
            // line stays resident as a clean copy.
            victim.dirty = false;
            self.stats.record_writeback(victim.words.len());
            log::debug!(
                "evict dirty set {} way {} ({:#010x})",
                d.set,
                way,
                self.geometry.encode(victim.tag, d.set, 0)
            );
        }

        let base = self.geometry.line_base(addr);
        for (i, word) in self.scratch.iter_mut().enumerate() {
            *word = self
                .memory
                .read(base + i as u32 * WORD_BYTES, AccessSize::Word)?;
        }
        self.store.line_mut(d.set, way).install(d.tag, &self.scratch);
        self.policy.insert(d.set, way);
        log::debug!("fill set {} way {} from {:#010x}", d.set, way, base);
        Ok(way)
    }

    /// Whether the line holding `addr` is resident. Does not count as an
    /// access.
    pub fn contains(&self, addr: u32) -> bool {
        let d = self.geometry.decode(addr);
        self.store.find(d.set, d.tag).is_some()
    }

    /// State of the line that holds `addr`, `Invalid` if not resident.
    pub fn line_state(&self, addr: u32) -> LineState {
        let d = self.geometry.decode(addr);
        self.store
            .find(d.set, d.tag)
            .map_or(LineState::Invalid, |way| self.store.line(d.set, way).state())
    }

    /// Number of valid ways in `set`.
    pub fn valid_lines(&self, set: usize) -> usize {
        self.store.valid_lines(set)
    }

    /// The lines of `set`, in way order.
    pub fn lines(&self, set: usize) -> &[CacheLine] {
        self.store.set(set)
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    pub fn policy(&self) -> PolicyKind {
        self.policy_kind
    }

    pub fn write_miss_policy(&self) -> WriteMissPolicy {
        self.write_miss
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Direct access to the backing memory. Writes made here bypass the
    /// cache and are not seen by resident lines.
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    pub fn into_memory(self) -> M {
        self.memory
    }
}

impl Cache<FlatMemory> {
    /// Snapshot of geometry, cache counters and memory request counters.
    pub fn report(&self) -> Report {
        Report::new(&self.geometry, self.stats, self.memory.stats())
    }
}

fn write_back<M: Memory>(
    geometry: &CacheGeometry,
    set: usize,
    line: &CacheLine,
    memory: &mut M,
) -> Result<(), MemoryError> {
    let base = geometry.encode(line.tag, set, 0);
    for (i, &word) in line.words.iter().enumerate() {
        memory.write(base + i as u32 * WORD_BYTES, word, AccessSize::Word)?;
    }
    Ok(())
}
