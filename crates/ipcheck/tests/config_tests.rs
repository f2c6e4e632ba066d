//! Tests for loading check configuration from TOML files

#![cfg(feature = "toml")]

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use ipcheck::{
    BogonRegistry, CheckConfig, Classifier, ErrorKind, LiteralPolicy, MalformedRangePolicy,
    StaticResolver, DEFAULT_BOGON_RANGES, EXTENDED_RANGES,
};
use test_support::subscribe;

fn test_data(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/test-data")
        .join(name)
}

#[test]
fn test_read_extended() {
    subscribe();
    let config = CheckConfig::read_config(&test_data("extended.toml")).unwrap();

    assert_eq!(config.bogon_ranges, DEFAULT_BOGON_RANGES);
    assert_eq!(config.extra_ranges, EXTENDED_RANGES);
    assert_eq!(config.literal_policy, LiteralPolicy::AnyFamily);
    assert_eq!(config.malformed_range_policy, MalformedRangePolicy::Abort);
    assert_eq!(config.get_resolve_timeout(), Some(Duration::from_secs(5)));

    let classifier = Classifier::from_config(&config, StaticResolver::new());
    for addr in ["11.0.0.1", "33.3.3.3", "30.1.1.1", "10.0.0.1"] {
        assert!(classifier.check(addr).is_bogon(), "{addr} should be bogon");
    }
    assert!(classifier.check("2001:4860:4860::8888").is_safe());
}

#[test]
fn test_read_ipv6_only() {
    subscribe();
    let config = CheckConfig::read_config(&test_data("ipv6_only.toml")).unwrap();
    assert_eq!(config.malformed_range_policy, MalformedRangePolicy::Skip);
    assert!(config.extra_ranges.is_empty());

    let registry = BogonRegistry::from_config(&config);
    assert_eq!(registry.len(), 5);
    assert_eq!(registry.policy(), MalformedRangePolicy::Skip);

    // matching continues past the malformed entry
    assert!(registry.is_bogon("ff02::1"));
    assert!(registry.is_bogon("fd12:3456::1"));
    assert!(registry.is_bogon("fe80::1"));
    assert!(!registry.is_bogon("10.0.0.1"));
    assert!(!registry.is_bogon("2001:db8::1"));
}

#[test]
fn test_missing_file() {
    let err = CheckConfig::read_config(&test_data("missing.toml")).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Io(_)));
}

#[test]
fn test_bad_policy() {
    let err = CheckConfig::from_toml(r#"literal_policy = "Ipv6Only""#).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::TomlDecode(_)));
}
