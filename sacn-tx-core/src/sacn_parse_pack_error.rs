//! The errors within the sACN crate related to parse/pack errors.

// Copyright 2020 sacn Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::{
    dmx_data::PayloadError,
    priority::PriorityError,
    source::IdentityError,
    source_name::SourceNameError,
    universe_id::UniverseError,
};

/// The errors raised while packing a data packet into a buffer, or while checking a packed buffer against the data packet layout.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParsePackError {
    /// When parsing packet invalid data encountered.
    ///
    /// # Arguments
    /// msg: A message providing further details (if any) as to what data was invalid.
    #[error("Error when parsing data into packet, msg: {0}")]
    ParseInvalidData(&'static str),

    /// Attempted to parse a priority value that is outwith the allowed range of [0, 200].
    /// As per ANSI E1.31-2018 Section 6.2.3
    #[error("Attempted to parse a priority value that is outwith the allowed range of [0, 200], msg: {0}")]
    ParseInvalidPriority(#[from] PriorityError),

    /// Attempted to use a universe value that is outwith the allowed range of [1, 63999].
    /// As per ANSI E1.31-2018 Section 9.1.1.
    #[error("Attempted to use a universe value that is outwith the allowed range of [1, 63999], msg: {0}")]
    InvalidUniverse(#[from] UniverseError),

    /// The slot data does not fit into a data packet.
    #[error("Invalid DMX payload, msg: {0}")]
    InvalidPayload(#[from] PayloadError),

    /// The source identity is missing a required field.
    #[error("Invalid source identity, msg: {0}")]
    InvalidIdentity(#[from] IdentityError),

    /// Supplied buffer is not large enough to pack packet into.
    ///
    /// # Arguments
    /// needed: Bytes the packet takes when packed.
    ///
    /// actual: Bytes available in the buffer.
    #[error("Supplied buffer is not large enough to pack packet into, needed {needed} bytes but got {actual}")]
    PackBufferInsufficient {
        /// Bytes the packet takes when packed
        needed: usize,
        /// Bytes available in the buffer
        actual: usize,
    },

    /// Supplied buffer does not contain enough data.
    ///
    /// # Arguments
    /// msg: A message providing further details (if any) as to why there was insufficient data for parsing.
    #[error("Supplied buffer does not contain enough data, msg: {0}")]
    ParseInsufficientData(&'static str),

    /// Received PDU flags are invalid for parsing.
    ///
    /// # Arguments
    /// flags: The flags that were found which are invalid.
    #[error("PDU Flags {0:#b} are invalid for parsing")]
    ParsePduInvalidFlags(u8),

    /// PDU length does not match the data it is supposed to cover.
    ///
    /// # Arguments
    /// len: The length provided in the Pdu which is invalid.
    #[error("PDU Length {0} is invalid")]
    PduInvalidLength(usize),

    /// PDU vector is invalid/unsupported by this library.
    ///
    /// # Arguments
    /// vec: The vector parsed which is invalid / cannot be used.
    #[error("Vector {0:#x} not supported")]
    PduInvalidVector(u32),

    /// Source name in packet was invalid, for example due to not being null terminated.
    #[error("Attempted to parse invalid source name, msg: {0}")]
    SourceName(#[from] SourceNameError),
}
