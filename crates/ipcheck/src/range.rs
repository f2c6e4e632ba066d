// Copyright 2026 The ipcheck Authors
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Range membership for IPv4 and IPv6 addresses
//!
//! A range specifier is plain text in one of two forms: a bare address, which requires an exact
//! match, or CIDR notation `address/prefix`, which requires the address to fall inside the block.
//! Both sides of every comparison are normalized with [`IpAddr::to_canonical`], so the IPv4-mapped
//! form `::ffff:a.b.c.d` compares as the IPv4 address `a.b.c.d`. Addresses of different families
//! never match each other.

use std::{fmt, net::IpAddr, str::FromStr};

use ipnet::{IpNet, Ipv4Net};
use serde::Deserialize;
use tracing::trace;

use crate::error::Error;

/// How matching treats a range specifier that fails to parse
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
pub enum MalformedRangePolicy {
    /// Stop at the malformed entry and report no match for the whole range set, even if a later
    /// entry would have matched
    #[default]
    Abort,
    /// Ignore the malformed entry and continue with the next one
    Skip,
}

/// A parsed range specifier
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RangeSpec {
    /// Exactly this address
    Addr(IpAddr),
    /// Any address inside this network
    Net(IpNet),
}

impl RangeSpec {
    /// Returns true if `addr` is covered by this specifier
    pub fn contains(&self, addr: IpAddr) -> bool {
        let addr = addr.to_canonical();
        match self {
            Self::Addr(ip) => ip.to_canonical() == addr,
            Self::Net(net) => net.contains(&addr),
        }
    }
}

impl FromStr for RangeSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.contains('/') {
            return IpAddr::from_str(s)
                .map(Self::Addr)
                .map_err(|e| Error::invalid_range(s, e));
        }

        let net = IpNet::from_str(s).map_err(|e| Error::invalid_range(s, e))?;

        // an IPv4-mapped block with at least the 96 bit mapping prefix is an IPv4 block
        if let IpNet::V6(v6) = net {
            if v6.prefix_len() >= 96 {
                if let Some(v4) = v6.network().to_ipv4_mapped() {
                    let v4 = Ipv4Net::new(v4, v6.prefix_len() - 96)
                        .map_err(|e| Error::invalid_range(s, e))?;
                    return Ok(Self::Net(IpNet::V4(v4)));
                }
            }
        }

        Ok(Self::Net(net))
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Addr(ip) => write!(f, "{ip}"),
            Self::Net(net) => write!(f, "{net}"),
        }
    }
}

/// Returns true if `addr` matches any of `ranges`.
///
/// `addr` must be a literal IPv4 or IPv6 address; anything else never matches. Ranges are
/// evaluated in order and the first match wins. A range that fails to parse stops the evaluation
/// and yields `false`, see [`MalformedRangePolicy::Abort`].
///
/// ```
/// use ipcheck::is_in_range;
///
/// assert!(is_in_range("102.1.5.92", ["102.1.5.0/24", "192.168.1.0/24"]));
/// assert!(is_in_range("::ffff:222.1.41.90", ["222.1.41.90"]));
/// assert!(!is_in_range("::5", ["102.1.1.2"]));
/// ```
pub fn is_in_range<I, S>(addr: &str, ranges: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    is_in_range_with_policy(addr, ranges, MalformedRangePolicy::Abort)
}

/// Same as [`is_in_range`] with an explicit policy for malformed range specifiers
pub fn is_in_range_with_policy<I, S>(addr: &str, ranges: I, policy: MalformedRangePolicy) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match IpAddr::from_str(addr) {
        Ok(ip) => ip_in_range(ip, ranges, policy),
        Err(_) => {
            trace!("not an address literal: {addr}");
            false
        }
    }
}

/// Evaluate an already parsed address against `ranges`
pub(crate) fn ip_in_range<I, S>(ip: IpAddr, ranges: I, policy: MalformedRangePolicy) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for range in ranges {
        let range = range.as_ref();
        let spec = match RangeSpec::from_str(range) {
            Ok(spec) => spec,
            Err(e) => match policy {
                MalformedRangePolicy::Abort => {
                    trace!("aborting match of {ip}: {e}");
                    return false;
                }
                MalformedRangePolicy::Skip => {
                    trace!("skipping {e}");
                    continue;
                }
            },
        };

        if spec.contains(ip) {
            trace!("{ip} matched {range}");
            return true;
        }
    }

    false
}
