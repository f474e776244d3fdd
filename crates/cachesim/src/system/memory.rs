//! Flat byte-addressable memory.
//!
//! The cache talks to its backing store only through the [`Memory`] trait:
//! whole-word reads on a line fill, whole-word writes on a write-back or
//! write-through. [`FlatMemory`] is the little-endian `Vec<u8>` store used by
//! the simulator; every access is bounds-checked and counted.

use serde::Serialize;

use crate::common::MemoryError;

/// Width of a single memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessSize {
    Byte,
    Half,
    Word,
}

impl AccessSize {
    /// Access width in bytes.
    pub fn bytes(self) -> u32 {
        match self {
            AccessSize::Byte => 1,
            AccessSize::Half => 2,
            AccessSize::Word => 4,
        }
    }
}

impl TryFrom<u32> for AccessSize {
    type Error = MemoryError;

    fn try_from(size: u32) -> Result<Self, Self::Error> {
        match size {
            1 => Ok(AccessSize::Byte),
            2 => Ok(AccessSize::Half),
            4 => Ok(AccessSize::Word),
            _ => Err(MemoryError::InvalidSize { size }),
        }
    }
}

/// Sized read/write access to a backing store.
pub trait Memory {
    /// Reads `size` bytes at `addr`, zero-extended to 32 bits.
    fn read(&mut self, addr: u32, size: AccessSize) -> Result<u32, MemoryError>;

    /// Writes the low `size` bytes of `value` at `addr`.
    fn write(&mut self, addr: u32, value: u32, size: AccessSize) -> Result<(), MemoryError>;

    /// Reads with a raw byte count, rejecting anything but 1, 2 or 4.
    fn read_sized(&mut self, addr: u32, size: u32) -> Result<u32, MemoryError> {
        let size = AccessSize::try_from(size)?;
        self.read(addr, size)
    }

    /// Writes with a raw byte count, rejecting anything but 1, 2 or 4.
    fn write_sized(&mut self, addr: u32, value: u32, size: u32) -> Result<(), MemoryError> {
        let size = AccessSize::try_from(size)?;
        self.write(addr, value, size)
    }
}

/// Per-direction request counters of a [`FlatMemory`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    pub read_requests: u64,
    pub write_requests: u64,
}

/// Little-endian flat memory.
pub struct FlatMemory {
    bytes: Vec<u8>,
    stats: MemoryStats,
}

impl FlatMemory {
    /// Creates a zero-filled memory of `size` bytes.
    pub fn new(size: usize) -> Self {
        log::info!("allocated {} bytes of flat memory", size);
        Self {
            bytes: vec![0; size],
            stats: MemoryStats::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Copies a memory image into place at `offset`.
    ///
    /// Loading is not a request and leaves the counters untouched.
    pub fn load(&mut self, data: &[u8], offset: usize) -> Result<(), MemoryError> {
        let end = offset
            .checked_add(data.len())
            .filter(|&end| end <= self.bytes.len())
            .ok_or(MemoryError::ImageTooLarge {
                len: data.len(),
                offset,
                limit: self.bytes.len(),
            })?;
        self.bytes[offset..end].copy_from_slice(data);
        Ok(())
    }

    pub fn stats(&self) -> MemoryStats {
        self.stats
    }

    pub fn reset_counters(&mut self) {
        self.stats = MemoryStats::default();
    }

    fn check_bounds(&self, addr: u32, size: AccessSize) -> Result<usize, MemoryError> {
        let start = addr as usize;
        let len = size.bytes() as usize;
        match start.checked_add(len) {
            Some(end) if end <= self.bytes.len() => Ok(start),
            _ => Err(MemoryError::OutOfBounds {
                addr,
                size: size.bytes(),
                limit: self.bytes.len(),
            }),
        }
    }
}

impl FlatMemory {
    fn fetch(&self, addr: u32, size: AccessSize) -> Result<u32, MemoryError> {
        let i = self.check_bounds(addr, size)?;
        let value = match size {
            AccessSize::Byte => self.bytes[i] as u32,
            AccessSize::Half => u16::from_le_bytes([self.bytes[i], self.bytes[i + 1]]) as u32,
            AccessSize::Word => u32::from_le_bytes([
                self.bytes[i],
                self.bytes[i + 1],
                self.bytes[i + 2],
                self.bytes[i + 3],
            ]),
        };
        Ok(value)
    }

    fn store(&mut self, addr: u32, value: u32, size: AccessSize) -> Result<(), MemoryError> {
        let i = self.check_bounds(addr, size)?;
        match size {
            AccessSize::Byte => self.bytes[i] = value as u8,
            AccessSize::Half => self.bytes[i..i + 2].copy_from_slice(&(value as u16).to_le_bytes()),
            AccessSize::Word => self.bytes[i..i + 4].copy_from_slice(&value.to_le_bytes()),
        }
        Ok(())
    }
}

// Every call counts as a request, including ones that fault.
impl Memory for FlatMemory {
    fn read(&mut self, addr: u32, size: AccessSize) -> Result<u32, MemoryError> {
        self.stats.read_requests += 1;
        self.fetch(addr, size)
    }

    fn write(&mut self, addr: u32, value: u32, size: AccessSize) -> Result<(), MemoryError> {
        self.stats.write_requests += 1;
        self.store(addr, value, size)
    }

    fn read_sized(&mut self, addr: u32, size: u32) -> Result<u32, MemoryError> {
        self.stats.read_requests += 1;
        self.fetch(addr, AccessSize::try_from(size)?)
    }

    fn write_sized(&mut self, addr: u32, value: u32, size: u32) -> Result<(), MemoryError> {
        self.stats.write_requests += 1;
        self.store(addr, value, AccessSize::try_from(size)?)
    }
}
