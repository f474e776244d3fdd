//! Sized memory accessors, bounds checks and request counters.

use cachesim::FlatMemory;
use cachesim::common::MemoryError;
use cachesim::system::memory::{AccessSize, Memory, MemoryStats};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case(1, 0xDEAD_BEEF, 0xEF)]
#[case(2, 0xDEAD_BEEF, 0xBEEF)]
#[case(4, 0xDEAD_BEEF, 0xDEAD_BEEF)]
fn sized_round_trip_truncates(#[case] size: u32, #[case] value: u32, #[case] expected: u32) {
    let mut m = FlatMemory::new(64);
    m.write_sized(0x10, value, size).unwrap();
    assert_eq!(m.read_sized(0x10, size).unwrap(), expected);
}

#[test]
fn unaligned_accesses_are_allowed() {
    let mut m = FlatMemory::new(16);
    m.write(3, 0x1122_3344, AccessSize::Word).unwrap();
    assert_eq!(m.read(3, AccessSize::Word).unwrap(), 0x1122_3344);
    assert_eq!(m.read(4, AccessSize::Half).unwrap(), 0x2233);
}

#[test]
fn narrow_write_leaves_neighbours() {
    let mut m = FlatMemory::new(8);
    m.write(0, 0xAABB_CCDD, AccessSize::Word).unwrap();
    m.write(1, 0x11, AccessSize::Byte).unwrap();
    assert_eq!(m.read(0, AccessSize::Word).unwrap(), 0xAABB_11DD);
}

#[rstest]
#[case(0)]
#[case(3)]
#[case(8)]
fn invalid_size_is_rejected(#[case] size: u32) {
    let mut m = FlatMemory::new(16);
    assert_eq!(m.read_sized(0, size), Err(MemoryError::InvalidSize { size }));
    assert_eq!(
        m.write_sized(0, 0xFF, size),
        Err(MemoryError::InvalidSize { size })
    );
    assert_eq!(m.as_bytes(), &[0u8; 16][..]);
}

#[rstest]
#[case(16, AccessSize::Byte)]
#[case(15, AccessSize::Half)]
#[case(13, AccessSize::Word)]
#[case(u32::MAX, AccessSize::Word)]
fn out_of_bounds_is_a_fault(#[case] addr: u32, #[case] size: AccessSize) {
    let mut m = FlatMemory::new(16);
    let fault = MemoryError::OutOfBounds {
        addr,
        size: size.bytes(),
        limit: 16,
    };
    assert_eq!(m.read(addr, size), Err(fault.clone()));
    assert_eq!(m.write(addr, 0, size), Err(fault));
}

#[test]
fn last_bytes_are_addressable() {
    let mut m = FlatMemory::new(16);
    m.write(12, 0xCAFE_F00D, AccessSize::Word).unwrap();
    assert_eq!(m.read(15, AccessSize::Byte).unwrap(), 0xCA);
}

#[test]
fn requests_are_counted_per_direction() {
    let mut m = FlatMemory::new(16);
    m.write(0, 1, AccessSize::Word).unwrap();
    m.read(0, AccessSize::Byte).unwrap();
    m.read(0, AccessSize::Half).unwrap();
    assert_eq!(
        m.stats(),
        MemoryStats {
            read_requests: 2,
            write_requests: 1,
        }
    );
    m.reset_counters();
    assert_eq!(m.stats(), MemoryStats::default());
}

#[test]
fn load_image() {
    let mut m = FlatMemory::new(8);
    m.load(&[1, 2, 3], 5).unwrap();
    assert_eq!(m.as_bytes(), &[0u8, 0, 0, 0, 0, 1, 2, 3][..]);
    assert_eq!(m.stats(), MemoryStats::default());
    assert_eq!(
        m.load(&[1, 2], 7),
        Err(MemoryError::ImageTooLarge {
            len: 2,
            offset: 7,
            limit: 8,
        })
    );
}

#[test]
fn size_conversion() {
    assert_eq!(AccessSize::try_from(2u32), Ok(AccessSize::Half));
    assert_eq!(AccessSize::Byte.bytes(), 1);
}
