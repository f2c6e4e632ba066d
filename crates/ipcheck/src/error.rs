// Copyright 2026 The ipcheck Authors
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Error types for the crate

use std::{fmt, io};

use thiserror::Error;

/// An alias for results returned by functions of this crate
pub type Result<T> = ::std::result::Result<T, Error>;

/// The error kind for errors that get returned in the crate
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A range specifier is neither a bare address nor a CIDR block
    #[error("invalid range specifier '{range}': {reason}")]
    InvalidRange {
        /// The specifier text as supplied
        range: String,
        /// Why it failed to parse
        reason: String,
    },

    /// The name did not map to any address
    #[error("no addresses found for {0}")]
    NotFound(String),

    /// Resolution did not complete before its deadline
    #[error("resolution timed out")]
    Timeout,

    /// Resolution was cancelled by the caller
    #[error("resolution cancelled")]
    Cancelled,

    // foreign
    /// An error got returned from IO
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// An error got returned by the hickory resolver
    #[cfg(feature = "resolver")]
    #[error("resolve error: {0}")]
    Resolve(#[from] hickory_resolver::error::ResolveError),

    /// An error occurred while decoding toml data
    #[cfg(feature = "toml")]
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
}

/// The error type for errors that get returned in the crate
#[derive(Debug)]
pub struct Error {
    kind: Box<ErrorKind>,
}

impl Error {
    /// Get the kind of the error
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub(crate) fn invalid_range(range: &str, reason: impl fmt::Display) -> Self {
        ErrorKind::InvalidRange {
            range: range.to_owned(),
            reason: reason.to_string(),
        }
        .into()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&*self.kind)
    }
}

impl<E> From<E> for Error
where
    E: Into<ErrorKind>,
{
    fn from(error: E) -> Self {
        let kind: ErrorKind = error.into();

        Self {
            kind: Box::new(kind),
        }
    }
}
