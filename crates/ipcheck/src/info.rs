// Copyright 2026 The ipcheck Authors
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::fmt;

/// The outcome of classifying a single host identifier.
///
/// A fresh record is produced by every check; it holds no reference to the registry or resolver
/// that produced it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddressInfo {
    original_input: String,
    is_valid: bool,
    is_bogon: bool,
}

impl AddressInfo {
    pub(crate) fn invalid(input: &str) -> Self {
        Self {
            original_input: input.to_owned(),
            is_valid: false,
            is_bogon: false,
        }
    }

    pub(crate) fn valid(input: &str, is_bogon: bool) -> Self {
        Self {
            original_input: input.to_owned(),
            is_valid: true,
            is_bogon,
        }
    }

    /// The text supplied by the caller, verbatim
    pub fn original_input(&self) -> &str {
        &self.original_input
    }

    /// True if the input was a well formed address, or for deep checks, resolved to at least one
    /// address
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// True if at least one underlying address falls inside a bogon range
    pub fn is_bogon(&self) -> bool {
        self.is_bogon
    }

    /// The host is valid and not bogon
    pub fn is_safe(&self) -> bool {
        self.is_valid && !self.is_bogon
    }
}

impl fmt::Display for AddressInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = match (self.is_valid, self.is_bogon) {
            (false, _) => "invalid",
            (true, true) => "bogon",
            (true, false) => "safe",
        };
        write!(f, "{}: {verdict}", self.original_input)
    }
}
