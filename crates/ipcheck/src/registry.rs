// Copyright 2026 The ipcheck Authors
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The set of bogon ranges consulted by checks

use std::{
    net::IpAddr,
    str::FromStr,
    sync::{Arc, LazyLock},
};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::{
    config::CheckConfig,
    error::Result,
    range::{self, MalformedRangePolicy, RangeSpec},
};

/// Bogon ranges from the Team Cymru bogon reference,
/// <https://www.team-cymru.com/bogon-reference>
pub const DEFAULT_BOGON_RANGES: &[&str] = &[
    "0.0.0.0/8",
    "10.0.0.0/8",
    "100.64.0.0/10",
    "127.0.0.0/8",
    "169.254.0.0/16",
    "172.16.0.0/12",
    "192.0.0.0/24",
    "192.0.2.0/24",
    "192.168.0.0/16",
    "198.18.0.0/15",
    "198.51.100.0/24",
    "203.0.113.0/24",
    "224.0.0.0/3",
];

/// Additional blocks some deployments treat as bogons. These are not part of the reference list
/// and are never loaded unless configured, see [`CheckConfig::extra_ranges`].
pub const EXTENDED_RANGES: &[&str] = &["11.0.0.0/8", "33.0.0.0/8", "30.0.0.0/8"];

static GLOBAL: LazyLock<Arc<BogonRegistry>> = LazyLock::new(|| Arc::new(BogonRegistry::default()));

/// An ordered list of range specifiers.
///
/// Entries are kept as the text they were added with, in insertion order, duplicates included.
/// They are parsed on every match, so an entry that fails to parse is only noticed at match time,
/// where the registry's [`MalformedRangePolicy`] decides what happens. Access is guarded by a
/// read/write lock, so a registry can be shared between threads and mutated while checks run.
#[derive(Debug)]
pub struct BogonRegistry {
    ranges: RwLock<Vec<String>>,
    policy: MalformedRangePolicy,
}

impl BogonRegistry {
    /// A registry holding `ranges`, matched with [`MalformedRangePolicy::Abort`]
    pub fn new<I, S>(ranges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ranges: RwLock::new(ranges.into_iter().map(Into::into).collect()),
            policy: MalformedRangePolicy::default(),
        }
    }

    /// A registry without any range
    pub fn empty() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// Build a registry from the configured ranges and policy
    pub fn from_config(config: &CheckConfig) -> Self {
        let registry = Self::empty().with_policy(config.malformed_range_policy);
        registry.add_ranges(config.bogon_ranges.iter().chain(&config.extra_ranges).cloned());
        registry
    }

    /// The process-wide registry used by the free functions of this crate, initialized with
    /// [`DEFAULT_BOGON_RANGES`]
    pub fn global() -> &'static Arc<Self> {
        &GLOBAL
    }

    /// Replace the policy applied to malformed entries at match time
    pub fn with_policy(mut self, policy: MalformedRangePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The policy applied to malformed entries at match time
    pub fn policy(&self) -> MalformedRangePolicy {
        self.policy
    }

    /// Append each specifier, in order. Nothing is validated or deduplicated; a malformed entry
    /// is logged and kept.
    pub fn add_ranges<I, S>(&self, ranges: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut guard = self.ranges.write();
        for range in ranges {
            let range = range.into();
            if let Err(e) = RangeSpec::from_str(&range) {
                warn!("appending unparsable bogon range, matching policy {:?}: {e}", self.policy);
            }

            debug!("adding bogon range {range}");
            guard.push(range);
        }
    }

    /// Append each specifier, in order, only if all of them parse. On error nothing is added.
    pub fn try_add_ranges<I, S>(&self, ranges: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ranges = ranges
            .into_iter()
            .map(Into::into)
            .map(|range: String| RangeSpec::from_str(&range).map(|_| range))
            .collect::<Result<Vec<_>>>()?;

        self.add_ranges(ranges);
        Ok(())
    }

    /// Remove the first entry whose text equals `range` exactly. Does nothing if there is none.
    pub fn remove_range(&self, range: &str) {
        let mut guard = self.ranges.write();
        if let Some(idx) = guard.iter().position(|r| r == range) {
            debug!("removing bogon range {range}");
            guard.remove(idx);
        }
    }

    /// Restore [`DEFAULT_BOGON_RANGES`], dropping everything else
    pub fn reset(&self) {
        let mut guard = self.ranges.write();
        guard.clear();
        guard.extend(DEFAULT_BOGON_RANGES.iter().map(|r| (*r).to_owned()));
    }

    /// A snapshot of the current entries
    pub fn ranges(&self) -> Vec<String> {
        self.ranges.read().clone()
    }

    /// True if an entry with exactly this text is present
    pub fn contains(&self, range: &str) -> bool {
        self.ranges.read().iter().any(|r| r == range)
    }

    /// Number of entries, duplicates included
    pub fn len(&self) -> usize {
        self.ranges.read().len()
    }

    /// True if there are no entries
    pub fn is_empty(&self) -> bool {
        self.ranges.read().is_empty()
    }

    /// Returns true if the address literal `addr` falls in any entry
    pub fn is_bogon(&self, addr: &str) -> bool {
        range::is_in_range_with_policy(addr, self.ranges.read().iter(), self.policy)
    }

    /// Returns true if `ip` falls in any entry
    pub fn is_bogon_ip(&self, ip: IpAddr) -> bool {
        range::ip_in_range(ip, self.ranges.read().iter(), self.policy)
    }
}

impl Default for BogonRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BOGON_RANGES.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use test_support::{capture_logs, subscribe};

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults() {
        subscribe();
        let registry = BogonRegistry::default();
        assert_eq!(registry.len(), DEFAULT_BOGON_RANGES.len());

        for bogon in [
            "0.1.2.3",
            "10.0.0.1",
            "100.64.0.1",
            "100.127.255.255",
            "127.0.0.1",
            "169.254.169.254",
            "172.16.0.1",
            "172.31.255.255",
            "192.0.0.8",
            "192.0.2.1",
            "192.168.1.1",
            "198.18.0.1",
            "198.19.255.255",
            "198.51.100.7",
            "203.0.113.9",
            "224.0.0.1",
            "255.255.255.255",
            "::ffff:127.0.0.1",
        ] {
            assert!(registry.is_bogon(bogon), "{bogon} should be bogon");
        }

        for public in ["8.8.8.8", "1.1.1.1", "100.128.0.1", "172.32.0.1", "223.255.255.255"] {
            assert!(!registry.is_bogon(public), "{public} should not be bogon");
        }

        // the reference list holds no IPv6 blocks
        assert!(!registry.is_bogon("::1"));
        assert!(!registry.is_bogon("fe80::1"));
    }

    #[test]
    fn test_add_remove() {
        subscribe();
        let registry = BogonRegistry::default();
        assert!(!registry.is_bogon("30.1.1.1"));

        registry.add_ranges(["30.0.0.0/8"]);
        assert!(registry.is_bogon("30.1.1.1"));
        assert!(registry.contains("30.0.0.0/8"));

        registry.remove_range("30.0.0.0/8");
        assert!(!registry.is_bogon("30.1.1.1"));
        assert!(!registry.contains("30.0.0.0/8"));
    }

    #[test]
    fn test_duplicates_and_order() {
        let registry = BogonRegistry::empty();
        registry.add_ranges(["1.0.0.0/8", "2.0.0.0/8", "1.0.0.0/8"]);
        assert_eq!(registry.ranges(), ["1.0.0.0/8", "2.0.0.0/8", "1.0.0.0/8"]);

        // only the first exact match goes
        registry.remove_range("1.0.0.0/8");
        assert_eq!(registry.ranges(), ["2.0.0.0/8", "1.0.0.0/8"]);
        assert!(registry.is_bogon("1.2.3.4"));
    }

    #[test]
    fn test_remove_is_textual() {
        let registry = BogonRegistry::new(["10.0.0.0/8"]);
        registry.remove_range("10.0.0.0/08");
        registry.remove_range("10.0.0.0/8 ");
        assert_eq!(registry.len(), 1);

        registry.remove_range("absent");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_malformed_entry_policy() {
        let registry = BogonRegistry::new(["not-a-range", "10.0.0.0/8"]);
        assert!(!registry.is_bogon("10.0.0.1"));

        let registry = registry.with_policy(MalformedRangePolicy::Skip);
        assert!(registry.is_bogon("10.0.0.1"));
    }

    #[test]
    fn test_malformed_entry_logged() {
        let registry = BogonRegistry::empty();
        let logs = capture_logs(|| registry.add_ranges(["10.0.0.0/33"]));

        assert!(logs.contains("appending unparsable bogon range"));
        assert!(registry.contains("10.0.0.0/33"));
    }

    #[test]
    fn test_try_add_ranges() {
        let registry = BogonRegistry::empty();
        registry.try_add_ranges(["30.0.0.0/8", "::1"]).unwrap();
        assert_eq!(registry.len(), 2);

        let err = registry
            .try_add_ranges(["33.0.0.0/8", "33.0.0.0/99"])
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidRange { range, .. } if range == "33.0.0.0/99"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_reset() {
        let registry = BogonRegistry::empty();
        assert!(registry.is_empty());
        registry.reset();
        assert_eq!(registry.ranges(), DEFAULT_BOGON_RANGES);
    }

    #[test]
    fn test_is_bogon_ip() {
        let registry = BogonRegistry::default();
        assert!(registry.is_bogon_ip("10.1.1.1".parse().unwrap()));
        assert!(registry.is_bogon_ip("::ffff:10.1.1.1".parse().unwrap()));
        assert!(!registry.is_bogon_ip("9.9.9.9".parse().unwrap()));
    }

    #[test]
    fn test_from_config() {
        let config = CheckConfig {
            extra_ranges: EXTENDED_RANGES.iter().map(|r| (*r).to_owned()).collect(),
            ..CheckConfig::default()
        };
        let registry = BogonRegistry::from_config(&config);
        assert_eq!(
            registry.len(),
            DEFAULT_BOGON_RANGES.len() + EXTENDED_RANGES.len()
        );
        assert!(registry.is_bogon("33.1.1.1"));
        assert!(registry.is_bogon("10.1.1.1"));
    }
}
