// Copyright 2026 The ipcheck Authors
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

// LIBRARY WARNINGS
#![warn(
    clippy::default_trait_access,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::unimplemented,
    clippy::use_self,
    missing_copy_implementations,
    missing_docs,
    non_snake_case,
    non_upper_case_globals,
    rust_2018_idioms,
    unreachable_pub
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ipcheck decides whether a host identifier is safe to dial.
//!
//! A host is *safe* when it is valid and not *bogon*. A bogon address lies in a reserved, private
//! or otherwise non-routable range, such as loopback, RFC 1918 private space, link-local, shared
//! address space, documentation blocks or multicast. Rejecting bogon targets supplied by
//! untrusted input keeps a client from being pointed at internal infrastructure.
//!
//! There are two kinds of check:
//!
//! * [`check`] takes a literal address and never touches the network.
//! * [`deep_check`] resolves a host name first and reports it bogon if *any* resolved address
//!   is, so a name pointing at `127.0.0.1` is caught as well.
//!
//! The free functions in this module share one process-wide [`BogonRegistry`], initialized with
//! [`DEFAULT_BOGON_RANGES`]. For isolated policies build a [`Classifier`] over a registry of your
//! own.
//!
//! # Usage
//!
//! ```rust
//! assert!(ipcheck::check("8.8.8.8").is_safe());
//! assert!(ipcheck::check("10.0.0.1").is_bogon());
//! assert!(!ipcheck::check("256.256.256.256").is_valid());
//!
//! assert!(ipcheck::is_in_range("::ffff:222.1.41.90", ["222.1.41.0/24"]));
//! ```
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use ipcheck::{BogonRegistry, Classifier, StaticResolver};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let resolver = StaticResolver::new().with_host("intranet.example", ["10.1.2.3".parse().unwrap()]);
//! let classifier = Classifier::new(Arc::new(BogonRegistry::default()), resolver);
//!
//! assert!(classifier.deep_check("intranet.example").await.is_bogon());
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod error;
mod info;
pub mod range;
pub mod registry;
pub mod resolve;

#[cfg(feature = "resolver")]
use std::time::Instant;

pub use self::classifier::{Classifier, LiteralPolicy};
pub use self::config::CheckConfig;
pub use self::error::{Error, ErrorKind, Result};
pub use self::info::AddressInfo;
pub use self::range::{is_in_range, MalformedRangePolicy, RangeSpec};
pub use self::registry::{BogonRegistry, DEFAULT_BOGON_RANGES, EXTENDED_RANGES};
#[cfg(feature = "resolver")]
#[cfg_attr(docsrs, doc(cfg(feature = "resolver")))]
pub use self::resolve::SystemResolver;
pub use self::resolve::{Resolve, StaticResolver};

/// Classify a literal IPv4 address against the global registry
pub fn check(address: &str) -> AddressInfo {
    classifier::check_literal(BogonRegistry::global(), LiteralPolicy::Ipv4Only, address)
}

/// Resolve `host` with the system resolver and classify it against the global registry.
///
/// Resolution is unbounded apart from the resolver's own timeouts; see
/// [`deep_check_with_deadline`].
#[cfg(feature = "resolver")]
#[cfg_attr(docsrs, doc(cfg(feature = "resolver")))]
pub async fn deep_check(host: &str) -> AddressInfo {
    global_classifier().deep_check(host).await
}

/// Same as [`deep_check`], failing resolution that has not finished by `deadline`
#[cfg(feature = "resolver")]
#[cfg_attr(docsrs, doc(cfg(feature = "resolver")))]
pub async fn deep_check_with_deadline(host: &str, deadline: Instant) -> AddressInfo {
    global_classifier()
        .deep_check_with_deadline(host, deadline)
        .await
}

/// A fresh resolver per call, so no connection outlives the runtime that made it
#[cfg(feature = "resolver")]
fn global_classifier() -> Classifier<SystemResolver> {
    Classifier::new(BogonRegistry::global().clone(), SystemResolver::default())
}

/// Append ranges to the global registry, see [`BogonRegistry::add_ranges`]
pub fn add_bogon_ranges<I, S>(ranges: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    BogonRegistry::global().add_ranges(ranges)
}

/// Remove the first exactly matching range from the global registry, see
/// [`BogonRegistry::remove_range`]
pub fn remove_bogon_range(range: &str) {
    BogonRegistry::global().remove_range(range)
}

/// Returns the current version of ipcheck
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
