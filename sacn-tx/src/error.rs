#![warn(missing_docs)]
//! The errors used within the sacn-tx crate.

// Copyright 2020 sacn Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::{
    dmx_data::PayloadError,
    priority::PriorityError,
    sacn_parse_pack_error::ParsePackError,
    source::IdentityError,
    source_name::SourceNameError,
    universe_id::UniverseError,
};

/// Error
///
/// Every error is local to the call that returned it, none of them leave the sender unusable.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO errors while setting up the socket.
    #[error("std error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The packet could not be encoded, for example because the payload was empty or too long.
    /// Raised before any network activity and before the sequence number is advanced.
    #[error("sacn encoding error: {0}")]
    Encoding(#[from] ParsePackError),

    /// Attempted to select a multicast interface with an address family the socket can't use.
    ///
    /// # Arguments
    /// A string describing the interface and socket family that didn't match.
    #[error("Unsupported address family for multicast interface, msg: {0}")]
    AddressFamily(String),

    /// The transport refused the multicast interface.
    #[error("Failed to set multicast interface")]
    SetMulticastInterface(#[source] std::io::Error),

    /// Failed to resolve the unicast destination.
    #[error("Failed to resolve host {host}")]
    ResolveHost {
        /// The host that was looked up
        host: String,
        /// The resolution failure
        #[source]
        source: std::io::Error,
    },

    /// The unicast destination resolved, but to no address of the socket's family.
    ///
    /// # Arguments
    /// The host that was looked up.
    #[error("Host {0} has no address usable by the socket")]
    NoAddressForHost(String),

    /// Failed to unicast data
    #[error("Failed to unicast data")]
    SendUnicastData(#[source] std::io::Error),

    /// Failed to multicast data
    #[error("Failed to multicast data")]
    SendMulticastData(#[source] std::io::Error),
}

impl From<PayloadError> for Error {
    fn from(value: PayloadError) -> Self {
        Error::Encoding(value.into())
    }
}

impl From<IdentityError> for Error {
    fn from(value: IdentityError) -> Self {
        Error::Encoding(value.into())
    }
}

impl From<UniverseError> for Error {
    fn from(value: UniverseError) -> Self {
        Error::Encoding(value.into())
    }
}

impl From<PriorityError> for Error {
    fn from(value: PriorityError) -> Self {
        Error::Encoding(value.into())
    }
}

impl From<SourceNameError> for Error {
    fn from(value: SourceNameError) -> Self {
        Error::Encoding(value.into())
    }
}
