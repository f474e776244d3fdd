//! Randomized coherence and counter invariants.
//!
//! Every run is checked against a plain word array that sees the same
//! writes. Whatever the geometry or policies, a read through the cache must
//! return what the array holds, and after a flush memory must equal it.

use cachesim::config::{ReplacementPolicy, WriteMissPolicy};
use cachesim::sim::Access;
use cachesim::system::memory::{AccessSize, Memory};
use cachesim::{Cache, CacheGeometry, FlatMemory};
use proptest::prelude::*;

const MEMORY_BYTES: usize = 1024;

fn any_policy() -> impl Strategy<Value = ReplacementPolicy> {
    prop_oneof![
        Just(ReplacementPolicy::Lru),
        Just(ReplacementPolicy::Fifo),
        Just(ReplacementPolicy::Plru),
        Just(ReplacementPolicy::Random),
    ]
}

fn any_write_miss() -> impl Strategy<Value = WriteMissPolicy> {
    prop_oneof![
        Just(WriteMissPolicy::Allocate),
        Just(WriteMissPolicy::NoAllocate),
    ]
}

fn any_access() -> impl Strategy<Value = Access> {
    let addr = 0..MEMORY_BYTES as u32;
    prop_oneof![
        addr.clone().prop_map(Access::Read),
        (addr, any::<u32>()).prop_map(|(a, d)| Access::Write(a, d)),
    ]
}

fn build(
    (set_bits, way_bits, line_word_bits): (u32, u32, u32),
    policy: ReplacementPolicy,
    write_miss: WriteMissPolicy,
) -> Cache<FlatMemory> {
    let _ = env_logger::builder().is_test(true).try_init();
    let geometry = CacheGeometry::new(set_bits, way_bits, line_word_bits).unwrap();
    Cache::with_policy(geometry, policy, write_miss, FlatMemory::new(MEMORY_BYTES)).unwrap()
}

proptest! {
    #[test]
    fn cache_is_coherent_with_shadow(
        dims in (0u32..=3, 0u32..=2, 0u32..=3),
        policy in any_policy(),
        write_miss in any_write_miss(),
        trace in prop::collection::vec(any_access(), 1..400),
    ) {
        let mut cache = build(dims, policy, write_miss);
        let mut shadow = vec![0u32; MEMORY_BYTES / 4];

        for access in &trace {
            match *access {
                Access::Read(addr) => {
                    prop_assert_eq!(cache.read(addr).unwrap(), shadow[addr as usize / 4]);
                }
                Access::Write(addr, data) => {
                    cache.write(addr, data).unwrap();
                    shadow[addr as usize / 4] = data;
                }
            }
        }

        cache.flush().unwrap();
        let mut memory = cache.into_memory();
        for (i, &expected) in shadow.iter().enumerate() {
            prop_assert_eq!(memory.read(i as u32 * 4, AccessSize::Word).unwrap(), expected);
        }
    }

    #[test]
    fn counters_stay_consistent(
        dims in (0u32..=3, 0u32..=2, 0u32..=3),
        policy in any_policy(),
        write_miss in any_write_miss(),
        trace in prop::collection::vec(any_access(), 0..200),
    ) {
        let mut cache = build(dims, policy, write_miss);
        cache.run(&trace).unwrap();

        let s = *cache.stats();
        let reads = trace.iter().filter(|a| matches!(a, Access::Read(_))).count() as u64;
        prop_assert_eq!(s.accesses(), trace.len() as u64);
        prop_assert_eq!(s.accesses(), s.hits() + s.misses());
        prop_assert_eq!(s.read_hits() + s.read_misses(), reads);
        prop_assert_eq!(s.flushed_words(), s.writebacks() * cache.geometry().words_per_line() as u64);
        if write_miss == WriteMissPolicy::Allocate {
            prop_assert_eq!(s.write_throughs(), 0);
        } else {
            prop_assert_eq!(s.write_throughs(), s.write_misses());
        }

        let ways = cache.geometry().ways();
        for set in 0..cache.geometry().sets() {
            prop_assert!(cache.valid_lines(set) <= ways);
        }

        let words = cache.geometry().words_per_line() as u64;
        prop_assert_eq!(cache.memory().stats().read_requests, (s.misses() - s.write_throughs()) * words);
    }

    #[test]
    fn resident_lines_have_distinct_tags(
        dims in (0u32..=2, 1u32..=2, 0u32..=2),
        policy in any_policy(),
        trace in prop::collection::vec(any_access(), 0..200),
    ) {
        let mut cache = build(dims, policy, WriteMissPolicy::Allocate);
        cache.run(&trace).unwrap();

        for set in 0..cache.geometry().sets() {
            let mut tags: Vec<u32> = cache
                .lines(set)
                .iter()
                .filter(|l| l.valid)
                .map(|l| l.tag)
                .collect();
            let resident = tags.len();
            tags.sort_unstable();
            tags.dedup();
            prop_assert_eq!(tags.len(), resident);
        }
    }
}
