//! Cache geometry and address decoding.
//!
//! A 32-bit byte address is split, from the low end, into a 2-bit byte
//! select (discarded, the cache works on 4-byte words), a word offset within
//! the line, a set index, and the remaining high bits as the tag:
//!
//! ```text
//!  31                                                   0
//! +-----------+--------------+----------------+---------+
//! |    tag    |  set index   |  word offset   |  byte   |
//! +-----------+--------------+----------------+---------+
//!              set_bits       line_word_bits    2
//! ```

use serde::Serialize;

use crate::common::ConfigError;

/// Number of byte-select bits below the word offset.
pub const BYTE_OFFSET_BITS: u32 = 2;

/// Bytes per cache word.
pub const WORD_BYTES: u32 = 1 << BYTE_OFFSET_BITS;

/// Width of the simulated address bus.
pub const ADDRESS_BITS: u32 = 32;

/// Largest supported associativity, as a log2 count.
pub const MAX_WAY_BITS: u32 = 16;

/// Largest total line storage, as a log2 word count (2^26 words, 256 MiB).
pub const MAX_CAPACITY_WORD_BITS: u32 = 26;

/// Cache dimensions, each stored as a log2 count.
///
/// Constructed once per cache and immutable afterwards, so the same
/// geometry drives allocation, decoding and write-back address rebuild.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CacheGeometry {
    set_bits: u32,
    way_bits: u32,
    line_word_bits: u32,
}

/// An address split into its cache-relevant fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedAddr {
    pub tag: u32,
    pub set: usize,
    pub word: usize,
}

impl CacheGeometry {
    /// Creates a geometry from log2 dimensions.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::GeometryTooWide` if the byte, word and set
    /// fields together need more than 32 address bits,
    /// `ConfigError::TooManyWayBits` for more than 2^16 ways, or
    /// `ConfigError::CapacityTooLarge` if the lines would hold more than
    /// 2^[`MAX_CAPACITY_WORD_BITS`] words.
    pub fn new(set_bits: u32, way_bits: u32, line_word_bits: u32) -> Result<Self, ConfigError> {
        let bits = BYTE_OFFSET_BITS + line_word_bits + set_bits;
        if bits > ADDRESS_BITS {
            return Err(ConfigError::GeometryTooWide {
                bits,
                set_bits,
                line_word_bits,
            });
        }
        if way_bits > MAX_WAY_BITS {
            return Err(ConfigError::TooManyWayBits {
                way_bits,
                max: MAX_WAY_BITS,
            });
        }
        let capacity_bits = set_bits + way_bits + line_word_bits;
        if capacity_bits > MAX_CAPACITY_WORD_BITS {
            return Err(ConfigError::CapacityTooLarge {
                words: 1u64 << capacity_bits,
                max: 1u64 << MAX_CAPACITY_WORD_BITS,
            });
        }
        Ok(Self {
            set_bits,
            way_bits,
            line_word_bits,
        })
    }

    /// Creates a geometry from plain counts, each of which must be a
    /// non-zero power of two.
    pub fn from_counts(sets: usize, ways: usize, line_words: usize) -> Result<Self, ConfigError> {
        Self::new(
            log2_exact("sets", sets)?,
            log2_exact("ways", ways)?,
            log2_exact("line_words", line_words)?,
        )
    }

    pub fn set_bits(&self) -> u32 {
        self.set_bits
    }

    pub fn way_bits(&self) -> u32 {
        self.way_bits
    }

    pub fn line_word_bits(&self) -> u32 {
        self.line_word_bits
    }

    #[inline]
    pub fn sets(&self) -> usize {
        1 << self.set_bits
    }

    #[inline]
    pub fn ways(&self) -> usize {
        1 << self.way_bits
    }

    #[inline]
    pub fn words_per_line(&self) -> usize {
        1 << self.line_word_bits
    }

    pub fn line_bytes(&self) -> usize {
        self.words_per_line() * WORD_BYTES as usize
    }

    /// Total data capacity in bytes.
    pub fn capacity_bytes(&self) -> usize {
        self.sets() * self.ways() * self.line_bytes()
    }

    fn tag_shift(&self) -> u32 {
        BYTE_OFFSET_BITS + self.line_word_bits + self.set_bits
    }

    /// Splits `addr` into tag, set index and word offset.
    #[inline]
    pub fn decode(&self, addr: u32) -> DecodedAddr {
        let word = (addr >> BYTE_OFFSET_BITS) & mask(self.line_word_bits);
        let set = (addr >> (BYTE_OFFSET_BITS + self.line_word_bits)) & mask(self.set_bits);
        // A geometry that uses every address bit leaves an empty tag.
        let tag = addr.checked_shr(self.tag_shift()).unwrap_or(0);
        DecodedAddr {
            tag,
            set: set as usize,
            word: word as usize,
        }
    }

    /// Rebuilds the word-aligned address of `word` in the line holding
    /// `tag` in `set`. Inverse of [`decode`](Self::decode) up to the
    /// discarded byte-select bits.
    pub fn encode(&self, tag: u32, set: usize, word: usize) -> u32 {
        let tag_bits = (tag as u64) << self.tag_shift();
        let set_bits = (set as u64 & mask(self.set_bits) as u64)
            << (BYTE_OFFSET_BITS + self.line_word_bits);
        let word_bits = (word as u64 & mask(self.line_word_bits) as u64) << BYTE_OFFSET_BITS;
        (tag_bits | set_bits | word_bits) as u32
    }

    /// Address of the first byte of the line containing `addr`.
    pub fn line_base(&self, addr: u32) -> u32 {
        addr & !mask(BYTE_OFFSET_BITS + self.line_word_bits)
    }
}

#[inline]
fn mask(bits: u32) -> u32 {
    if bits >= u32::BITS {
        u32::MAX
    } else {
        (1 << bits) - 1
    }
}

fn log2_exact(field: &'static str, value: usize) -> Result<u32, ConfigError> {
    if value == 0 || !value.is_power_of_two() {
        return Err(ConfigError::NotPowerOfTwo {
            field,
            value: value as u64,
        });
    }
    Ok(value.trailing_zeros())
}
