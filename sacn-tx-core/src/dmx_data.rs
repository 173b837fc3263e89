//! This module contains the slot data carried by a data packet.

use core::ops::Deref;

use crate::e131_definitions::DMX_MAX_SLOTS;

/// The slot values of one universe, without the start code.
///
/// Holds between 1 and [DMX_MAX_SLOTS] bytes. A universe with fewer slots implies nothing about the remaining
/// channels, receivers treat the packet as only carrying the given slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DmxPayload<'a> {
    slots: &'a [u8],
}

impl<'a> DmxPayload<'a> {
    /// Wraps the given slots.
    ///
    /// # Errors
    /// Empty: no slots given.
    ///
    /// TooLong: more than [DMX_MAX_SLOTS] slots given.
    pub const fn new(slots: &'a [u8]) -> Result<Self, PayloadError> {
        if slots.is_empty() {
            return Err(PayloadError::Empty);
        }

        if slots.len() > DMX_MAX_SLOTS {
            return Err(PayloadError::TooLong(slots.len()));
        }

        Ok(Self { slots })
    }

    /// The wrapped slots.
    pub const fn slots(&self) -> &'a [u8] {
        self.slots
    }
}

impl Deref for DmxPayload<'_> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.slots
    }
}

impl<'a> TryFrom<&'a [u8]> for DmxPayload<'a> {
    type Error = PayloadError;

    fn try_from(slots: &'a [u8]) -> Result<Self, Self::Error> {
        Self::new(slots)
    }
}

/// Error for creation of [DmxPayload]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    /// A data packet must carry at least one slot.
    #[error("DMX payload is empty, at least one slot is required")]
    Empty,

    /// Attempted to exceed the capacity of a single universe.
    ///
    /// # Arguments
    /// 0: Number of slots given
    #[error("Too many DMX values. Maximum amount is {}, got {}", DMX_MAX_SLOTS, .0)]
    TooLong(usize),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_payload_bounds() {
        assert_eq!(DmxPayload::new(&[]), Err(PayloadError::Empty));
        assert_eq!(DmxPayload::new(&[0u8; 513]), Err(PayloadError::TooLong(513)));

        assert_eq!(DmxPayload::new(&[1]).unwrap().len(), 1);
        assert_eq!(DmxPayload::new(&[0u8; 512]).unwrap().len(), 512);
    }
}
