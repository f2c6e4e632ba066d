// Copyright 2026 The ipcheck Authors
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Host name resolution used by deep checks

use std::{
    collections::HashMap,
    io::{self, BufRead, BufReader},
    net::IpAddr,
    str::FromStr,
    sync::Arc,
};

use async_trait::async_trait;
#[cfg(feature = "resolver")]
use hickory_resolver::{
    config::{ResolverConfig, ResolverOpts},
    TokioAsyncResolver,
};
#[cfg(feature = "resolver")]
use tracing::debug;
use tracing::warn;

use crate::error::{ErrorKind, Result};

/// Maps a host to the literal addresses it stands for.
///
/// Implementations must accept address literals as well as names; a literal resolves to itself.
/// Timeouts and cancellation are applied by the caller by dropping the returned future, so an
/// implementation only needs to be cancel safe.
#[async_trait]
pub trait Resolve: Send + Sync {
    /// Resolve `host`. An empty result is not an error at this level.
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>>;
}

#[async_trait]
impl<R: Resolve + ?Sized> Resolve for Arc<R> {
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>> {
        (**self).resolve(host).await
    }
}

/// An in-memory table of names to addresses.
///
/// Names are matched case-insensitively and a trailing `.` is ignored. Unknown names fail with
/// [`ErrorKind::NotFound`].
#[derive(Clone, Debug, Default)]
pub struct StaticResolver {
    by_name: HashMap<String, Vec<IpAddr>>,
}

impl StaticResolver {
    /// An empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `addr` to the addresses of `name`
    pub fn insert(&mut self, name: &str, addr: IpAddr) {
        self.by_name.entry(normalize(name)).or_default().push(addr);
    }

    /// Builder form of [`Self::insert`] for several addresses at once
    pub fn with_host<I>(mut self, name: &str, addrs: I) -> Self
    where
        I: IntoIterator<Item = IpAddr>,
    {
        for addr in addrs {
            self.insert(name, addr);
        }
        self
    }

    /// parse hosts file content from `src`
    pub fn read_hosts_conf(mut self, src: impl io::Read) -> io::Result<Self> {
        // lines have the form `addr host1 host2 ...`, `#` starts a comment,
        // lines without any host are ignored
        for line in BufReader::new(src).lines() {
            let line = line?;
            let line = match line.split_once('#') {
                Some((content, _)) => content.trim(),
                None => line.trim(),
            };
            if line.is_empty() {
                continue;
            }

            let mut fields = line.split_whitespace();
            let Some(addr) = fields.next() else {
                continue;
            };
            let Ok(addr) = IpAddr::from_str(addr) else {
                warn!("could not parse an IP from hosts line: {line}");
                continue;
            };

            for name in fields {
                self.insert(name, addr);
            }
        }

        Ok(self)
    }
}

#[async_trait]
impl Resolve for StaticResolver {
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>> {
        if let Ok(ip) = IpAddr::from_str(host) {
            return Ok(vec![ip]);
        }

        match self.by_name.get(&normalize(host)) {
            Some(addrs) => Ok(addrs.clone()),
            None => Err(ErrorKind::NotFound(host.to_owned()).into()),
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

/// Resolves through the Hickory DNS Tokio resolver
#[cfg(feature = "resolver")]
#[derive(Clone)]
pub struct SystemResolver {
    resolver: TokioAsyncResolver,
}

#[cfg(feature = "resolver")]
impl SystemResolver {
    /// A resolver configured from the host system, `/etc/resolv.conf` on Unix
    pub fn from_system_conf() -> Result<Self> {
        Ok(Self {
            resolver: TokioAsyncResolver::tokio_from_system_conf()?,
        })
    }

    /// A resolver with explicit configuration
    pub fn new(config: ResolverConfig, options: ResolverOpts) -> Self {
        Self {
            resolver: TokioAsyncResolver::tokio(config, options),
        }
    }
}

#[cfg(feature = "resolver")]
impl Default for SystemResolver {
    /// The system configuration, or the resolver defaults if it cannot be read
    fn default() -> Self {
        Self::from_system_conf().unwrap_or_else(|e| {
            warn!("falling back to default resolver configuration: {e}");
            Self::new(ResolverConfig::default(), ResolverOpts::default())
        })
    }
}

#[cfg(feature = "resolver")]
#[async_trait]
impl Resolve for SystemResolver {
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>> {
        let lookup = self.resolver.lookup_ip(host).await?;
        let addrs = lookup.iter().collect::<Vec<_>>();
        debug!("resolved {host} to {addrs:?}");
        Ok(addrs)
    }
}
