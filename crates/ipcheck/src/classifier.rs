// Copyright 2026 The ipcheck Authors
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Classification of literal addresses and host names

use std::{
    net::{IpAddr, Ipv4Addr},
    str::FromStr,
    sync::Arc,
    time::{Duration, Instant},
};

use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::{
    config::CheckConfig,
    error::{ErrorKind, Result},
    info::AddressInfo,
    registry::BogonRegistry,
    resolve::Resolve,
};

/// Which address literals [`Classifier::check`] accepts
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
pub enum LiteralPolicy {
    /// Only dotted-decimal IPv4 literals are valid; IPv6 literals are reported invalid
    #[default]
    Ipv4Only,
    /// IPv4 and IPv6 literals are both valid
    AnyFamily,
}

impl LiteralPolicy {
    /// Returns true if `address` is an acceptable literal under this policy
    pub fn is_valid_literal(self, address: &str) -> bool {
        match self {
            Self::Ipv4Only => Ipv4Addr::from_str(address).is_ok(),
            Self::AnyFamily => IpAddr::from_str(address).is_ok(),
        }
    }
}

/// Classifies host identifiers against a bogon registry.
///
/// [`Self::check`] handles literal addresses only. The `deep_check` family first resolves the
/// host through `R` and reports it bogon if any resolved address is. Every call is independent;
/// the only shared state is the registry, which may be mutated between calls.
pub struct Classifier<R> {
    registry: Arc<BogonRegistry>,
    resolver: R,
    literal_policy: LiteralPolicy,
    resolve_timeout: Option<Duration>,
}

impl<R: Resolve> Classifier<R> {
    /// A classifier over `registry` resolving with `resolver`, IPv4-only literals and no default
    /// resolution deadline
    pub fn new(registry: Arc<BogonRegistry>, resolver: R) -> Self {
        Self {
            registry,
            resolver,
            literal_policy: LiteralPolicy::default(),
            resolve_timeout: None,
        }
    }

    /// Build a classifier, and a registry it owns, from `config`
    pub fn from_config(config: &CheckConfig, resolver: R) -> Self {
        Self::new(Arc::new(BogonRegistry::from_config(config)), resolver)
            .with_literal_policy(config.literal_policy)
            .with_resolve_timeout(config.get_resolve_timeout())
    }

    /// Replace the literal policy applied by [`Self::check`]
    pub fn with_literal_policy(mut self, literal_policy: LiteralPolicy) -> Self {
        self.literal_policy = literal_policy;
        self
    }

    /// Deadline applied by [`Self::deep_check`]; `None` leaves resolution unbounded
    pub fn with_resolve_timeout(mut self, resolve_timeout: Option<Duration>) -> Self {
        self.resolve_timeout = resolve_timeout;
        self
    }

    /// The registry consulted by this classifier
    pub fn registry(&self) -> &Arc<BogonRegistry> {
        &self.registry
    }

    /// The resolver used by deep checks
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Classify a literal address without any resolution
    pub fn check(&self, address: &str) -> AddressInfo {
        check_literal(&self.registry, self.literal_policy, address)
    }

    /// Resolve `host` and classify every resolved address, with the configured default deadline
    pub async fn deep_check(&self, host: &str) -> AddressInfo {
        match self.resolve_timeout {
            Some(timeout) => self.deep_check_with_timeout(host, timeout).await,
            None => {
                let resolved = self.resolver.resolve(host).await;
                self.classify_resolved(host, resolved)
            }
        }
    }

    /// Same as [`Self::deep_check`], failing resolution that has not finished by `deadline`
    pub async fn deep_check_with_deadline(&self, host: &str, deadline: Instant) -> AddressInfo {
        let deadline = tokio::time::Instant::from_std(deadline);
        let resolved = match tokio::time::timeout_at(deadline, self.resolver.resolve(host)).await {
            Ok(resolved) => resolved,
            Err(_) => Err(ErrorKind::Timeout.into()),
        };

        self.classify_resolved(host, resolved)
    }

    /// Same as [`Self::deep_check`], failing resolution that takes longer than `timeout`
    pub async fn deep_check_with_timeout(&self, host: &str, timeout: Duration) -> AddressInfo {
        let resolved = match tokio::time::timeout(timeout, self.resolver.resolve(host)).await {
            Ok(resolved) => resolved,
            Err(_) => Err(ErrorKind::Timeout.into()),
        };

        self.classify_resolved(host, resolved)
    }

    /// Same as [`Self::deep_check`], abandoning resolution as soon as `token` is cancelled
    pub async fn deep_check_with_cancellation(
        &self,
        host: &str,
        token: &CancellationToken,
    ) -> AddressInfo {
        let resolved = tokio::select! {
            biased;
            _ = token.cancelled() => Err(ErrorKind::Cancelled.into()),
            resolved = self.resolver.resolve(host) => resolved,
        };

        self.classify_resolved(host, resolved)
    }

    fn classify_resolved(&self, host: &str, resolved: Result<Vec<IpAddr>>) -> AddressInfo {
        let addrs = match resolved {
            Ok(addrs) if !addrs.is_empty() => addrs,
            Ok(_) => {
                debug!("{host} resolved to no addresses");
                return AddressInfo::invalid(host);
            }
            Err(e) => {
                debug!("failed to resolve {host}: {e}");
                return AddressInfo::invalid(host);
            }
        };

        for ip in addrs {
            if self.registry.is_bogon_ip(ip) {
                debug!("{host} resolved to bogon address {ip}");
                return AddressInfo::valid(host, true);
            }
        }

        AddressInfo::valid(host, false)
    }
}

pub(crate) fn check_literal(
    registry: &BogonRegistry,
    policy: LiteralPolicy,
    address: &str,
) -> AddressInfo {
    if !policy.is_valid_literal(address) {
        trace!("rejecting literal {address} under {policy:?}");
        return AddressInfo::invalid(address);
    }

    AddressInfo::valid(address, registry.is_bogon(address))
}
