// Copyright 2026 The ipcheck Authors
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Configuration for registries and classifiers

#[cfg(feature = "toml")]
use std::{fs::File, io::Read, path::Path};
use std::time::Duration;

use serde::Deserialize;

pub use crate::classifier::LiteralPolicy;
#[cfg(feature = "toml")]
use crate::error::Result;
pub use crate::range::MalformedRangePolicy;
use crate::registry::DEFAULT_BOGON_RANGES;

/// Check configuration
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    /// The bogon ranges to load. Defaults to the Team Cymru reference list,
    /// [`DEFAULT_BOGON_RANGES`].
    pub bogon_ranges: Vec<String>,

    /// Ranges appended after `bogon_ranges`. Empty by default; deployments that also treat the
    /// blocks in [`crate::EXTENDED_RANGES`] as bogons list them here.
    pub extra_ranges: Vec<String>,

    /// Which address families `check` accepts as literals. Defaults to IPv4 only.
    pub literal_policy: LiteralPolicy,

    /// What matching does with a range that fails to parse. Defaults to aborting the match.
    pub malformed_range_policy: MalformedRangePolicy,

    /// Deadline, in seconds, applied to deep checks that are not given one by the caller. Unset
    /// means resolution is unbounded.
    pub resolve_timeout: Option<u64>,
}

impl CheckConfig {
    /// read a CheckConfig file from the file specified at path.
    #[cfg(feature = "toml")]
    pub fn read_config(path: &Path) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut toml = String::new();
        file.read_to_string(&mut toml)?;
        Self::from_toml(&toml)
    }

    /// Read a [`CheckConfig`] from the given TOML string.
    #[cfg(feature = "toml")]
    pub fn from_toml(toml: &str) -> Result<Self> {
        Ok(toml::from_str(toml)?)
    }

    /// default deadline for deep checks
    pub fn get_resolve_timeout(&self) -> Option<Duration> {
        self.resolve_timeout.map(Duration::from_secs)
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            bogon_ranges: DEFAULT_BOGON_RANGES.iter().map(|r| (*r).to_owned()).collect(),
            extra_ranges: vec![],
            literal_policy: LiteralPolicy::default(),
            malformed_range_policy: MalformedRangePolicy::default(),
            resolve_timeout: None,
        }
    }
}
