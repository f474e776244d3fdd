//! Statistics counters and derived rates.

use cachesim::config::ReplacementPolicy;
use cachesim::stats::CacheStats;

use crate::common::small_cache;

#[test]
fn rates_are_undefined_before_first_access() {
    let stats = CacheStats::default();
    assert_eq!(stats.accesses(), 0);
    assert_eq!(stats.hit_rate(), None);
    assert_eq!(stats.miss_rate(), None);
}

#[test]
fn rates_after_mixed_accesses() {
    let mut cache = small_cache(ReplacementPolicy::Lru);
    cache.read(0x00).unwrap(); // miss
    cache.read(0x04).unwrap(); // hit, same line
    cache.write(0x08, 1).unwrap(); // hit
    cache.write(0x10, 2).unwrap(); // miss, set 1

    let s = cache.stats();
    assert_eq!((s.accesses(), s.hits(), s.misses()), (4, 2, 2));
    assert_eq!((s.read_hits(), s.write_hits()), (1, 1));
    assert_eq!((s.read_misses(), s.write_misses()), (1, 1));
    assert_eq!(s.hit_rate(), Some(0.5));
    assert_eq!(s.miss_rate(), Some(0.5));
}

#[test]
fn display_omits_rates_when_empty() {
    let text = CacheStats::default().to_string();
    assert!(text.contains("Total Accesses: 0"));
    assert!(!text.contains("Hit Rate"));
}

#[test]
fn display_includes_rates() {
    let mut cache = small_cache(ReplacementPolicy::Lru);
    cache.read(0).unwrap();
    cache.read(0).unwrap();
    cache.read(0).unwrap();
    cache.read(0x20).unwrap();
    let text = cache.stats().to_string();
    assert!(text.contains("Hit Rate:  50.00%"), "{text}");
    assert!(text.contains("Miss Rate: 50.00%"), "{text}");
}

#[test]
fn report_serializes_derived_fields() {
    let mut cache = small_cache(ReplacementPolicy::Lru);
    cache.read(0).unwrap();
    cache.read(0).unwrap();

    let json: serde_json::Value = serde_json::from_str(&cache.report().to_json().unwrap()).unwrap();
    assert_eq!(json["geometry"]["sets"], 2);
    assert_eq!(json["geometry"]["words_per_line"], 4);
    assert_eq!(json["cache"]["accesses"], 2);
    assert_eq!(json["cache"]["hits"], 1);
    assert_eq!(json["cache"]["read_misses"], 1);
    assert_eq!(json["cache"]["hit_rate"], 0.5);
    assert_eq!(json["memory"]["read_requests"], 4);
    assert_eq!(json["memory"]["write_requests"], 0);
}

#[test]
fn report_display() {
    let cache = small_cache(ReplacementPolicy::Lru);
    let text = cache.report().to_string();
    assert!(text.starts_with("Geometry: 2 sets x 2 ways x 4 words (64 bytes)"));
    assert!(text.contains("Memory Requests:"));
}
