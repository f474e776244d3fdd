//! Line storage.
//!
//! Lines are kept in a single flat vector indexed `set * ways + way`, each
//! carrying its own tag, valid and dirty bits and a fixed block of data words.

use super::geometry::CacheGeometry;

/// Observable state of a cache line.
///
/// ```text
///            fill               write hit
/// Invalid ---------> Clean -----------------> Dirty
///    ^                 |                        |
///    +-----------------+------------------------+
///        evict / flush (dirty: write back first) / reset
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineState {
    Invalid,
    Clean,
    Dirty,
}

/// One way of one set.
#[derive(Clone, Debug, Default)]
pub struct CacheLine {
    pub tag: u32,
    pub valid: bool,
    /// Only meaningful while `valid`; cleared together with it.
    pub dirty: bool,
    pub words: Box<[u32]>,
}

impl CacheLine {
    fn new(words_per_line: usize) -> Self {
        Self {
            tag: 0,
            valid: false,
            dirty: false,
            words: vec![0; words_per_line].into_boxed_slice(),
        }
    }

    pub fn state(&self) -> LineState {
        match (self.valid, self.dirty) {
            (false, _) => LineState::Invalid,
            (true, false) => LineState::Clean,
            (true, true) => LineState::Dirty,
        }
    }

    #[inline]
    pub fn matches(&self, tag: u32) -> bool {
        self.valid && self.tag == tag
    }

    /// Installs a freshly fetched block as a clean line.
    pub fn install(&mut self, tag: u32, data: &[u32]) {
        self.tag = tag;
        self.valid = true;
        self.dirty = false;
        self.words.copy_from_slice(data);
    }

    pub fn invalidate(&mut self) {
        self.valid = false;
        self.dirty = false;
    }

    fn clear(&mut self) {
        self.tag = 0;
        self.invalidate();
        self.words.fill(0);
    }
}

/// All lines of the cache.
pub struct CacheStore {
    lines: Vec<CacheLine>,
    ways: usize,
}

impl CacheStore {
    pub fn new(geometry: &CacheGeometry) -> Self {
        let ways = geometry.ways();
        let lines = vec![CacheLine::new(geometry.words_per_line()); geometry.sets() * ways];
        Self { lines, ways }
    }

    /// Lines of `set`, in way order.
    pub fn set(&self, set: usize) -> &[CacheLine] {
        let base = set * self.ways;
        &self.lines[base..base + self.ways]
    }

    pub fn set_mut(&mut self, set: usize) -> &mut [CacheLine] {
        let base = set * self.ways;
        &mut self.lines[base..base + self.ways]
    }

    pub fn line(&self, set: usize, way: usize) -> &CacheLine {
        &self.lines[set * self.ways + way]
    }

    pub fn line_mut(&mut self, set: usize, way: usize) -> &mut CacheLine {
        &mut self.lines[set * self.ways + way]
    }

    /// Way of `set` holding a valid line tagged `tag`.
    pub fn find(&self, set: usize, tag: u32) -> Option<usize> {
        self.set(set).iter().position(|line| line.matches(tag))
    }

    /// First way of `set` with no valid line.
    pub fn free_way(&self, set: usize) -> Option<usize> {
        self.set(set).iter().position(|line| !line.valid)
    }

    pub fn valid_lines(&self, set: usize) -> usize {
        self.set(set).iter().filter(|line| line.valid).count()
    }

    /// Returns every line to its construction state: invalid, tag and
    /// data zeroed.
    pub fn clear(&mut self) {
        self.lines.iter_mut().for_each(CacheLine::clear);
    }
}
