//! This module contains all things `SourceName`
//!
//! The source name is a user readable label for a source, carried in a fixed 64 byte field of every data packet.
//! ANSI E1.31-2018 Section 6.2.2 requires the field to be null terminated, so at most 63 bytes of the name fit.

use core::{
    fmt::{self, Display},
    str::FromStr,
};

use heapless::{String, Vec};

use crate::e131_definitions::E131_SOURCE_NAME_FIELD_LENGTH;

/// The name of a source
#[derive(Debug, Clone, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceName {
    inner: String<{ Self::MAX_LEN }>,
}

impl Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl core::ops::Deref for SourceName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.inner.as_str()
    }
}

impl SourceName {
    /// The length of the Source Name field in bytes in an ANSI E1.31-2018 packet as per ANSI E1.31-2018 Section 4, Table 4-1.
    pub const CAPACITY: usize = E131_SOURCE_NAME_FIELD_LENGTH;

    /// The longest name in bytes that still leaves room for the null terminator.
    pub const MAX_LEN: usize = Self::CAPACITY - 1;

    /// Creates a new [SourceName]
    ///
    /// # Errors
    /// SourceNameTooLong: Returned if the name is longer than [Self::MAX_LEN] bytes.
    pub fn new<S: AsRef<str>>(s: S) -> Result<Self, SourceNameError> {
        let value = s.as_ref();

        let inner = String::from_str(value).map_err(|_| SourceNameError::SourceNameTooLong(value.len()))?;
        Ok(Self { inner })
    }

    /// Creates a new [SourceName], cutting the name down to the last character boundary that fits into
    /// [Self::MAX_LEN] bytes.
    pub fn truncated<S: AsRef<str>>(s: S) -> Self {
        let value = s.as_ref();

        let mut end = value.len().min(Self::MAX_LEN);
        while !value.is_char_boundary(end) {
            end -= 1;
        }

        let mut inner = String::new();
        // Cannot fail, `end` is at most the capacity.
        let _ = inner.push_str(&value[..end]);
        Self { inner }
    }

    /// Returns a [str] reference
    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }

    /// Returns the length of the source name in bytes
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if the name is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the bytes this source name is made out of
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }

    /// Writes the name into a source name field, null padded to the full field length.
    ///
    /// `field` must be exactly [Self::CAPACITY] bytes long.
    pub fn write_field(&self, field: &mut [u8]) {
        field.fill(0);
        field[..self.len()].copy_from_slice(self.as_bytes());
    }
}

impl FromStr for SourceName {
    type Err = SourceNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&[u8]> for SourceName {
    type Error = SourceNameError;

    /// Takes the given byte buffer (e.g. a c char array) and parses it into a source name.
    ///
    /// # Arguments
    /// buf: The byte buffer to parse into a str.
    ///
    /// # Errors
    /// MissingNullTermination: Returned if the source name is not null terminated as required by ANSI E1.31-2018 Section 6.2.2
    /// SourceNameTooLong: Returned if the source name is too long
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let first_null_pos = value.iter().position(|&b| b == 0).ok_or(SourceNameError::MissingNullTermination)?;

        let as_vec = Vec::from_slice(&value[..first_null_pos]).map_err(|_| SourceNameError::SourceNameTooLong(first_null_pos))?;
        let inner = String::from_utf8(as_vec)?;

        Ok(Self { inner })
    }
}

impl TryFrom<&str> for SourceName {
    type Error = SourceNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

/// For any source specific errors
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SourceNameError {
    /// A source name that's too long was encountered.
    /// Maximum length should be [`SourceName::MAX_LEN`]
    ///
    /// # Arguments
    /// Length of too long source name
    #[error("Given source name is too long. Maximum is {} but current name is: {}", SourceName::MAX_LEN, .0)]
    SourceNameTooLong(usize),

    /// A source name is invalid utf8
    #[error("Given source name is invalid utf-8 error: {0:?}")]
    Utf8(#[from] core::str::Utf8Error),

    /// Given source name is not not null terminated
    #[error("Given source name is not not null terminated")]
    MissingNullTermination,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_source_name_fits() {
        let name = SourceName::new("Test").unwrap();
        assert_eq!(name.as_str(), "Test");
        assert_eq!(name.len(), 4);
    }

    #[test]
    fn test_source_name_too_long() {
        let long = "x".repeat(64);
        assert_eq!(SourceName::new(&long), Err(SourceNameError::SourceNameTooLong(64)));
        assert!(SourceName::new(&long[..63]).is_ok());
    }

    #[test]
    fn test_source_name_truncated() {
        let long = "y".repeat(100);
        let name = SourceName::truncated(&long);
        assert_eq!(name.len(), SourceName::MAX_LEN);

        // 'é' is two bytes, 32 of them only fit up to a character boundary.
        let accents = "é".repeat(32);
        let name = SourceName::truncated(&accents);
        assert_eq!(name.len(), 62);
        assert_eq!(name.as_str(), "é".repeat(31));
    }

    #[test]
    fn test_source_name_write_field_pads_with_nulls() {
        let name = SourceName::new("Desk").unwrap();
        let mut field = [0xffu8; SourceName::CAPACITY];
        name.write_field(&mut field);

        assert_eq!(&field[..4], b"Desk");
        assert!(field[4..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_source_name_from_field() {
        let mut field = [0u8; SourceName::CAPACITY];
        field[..5].copy_from_slice(b"Stage");
        assert_eq!(SourceName::try_from(&field[..]).unwrap().as_str(), "Stage");

        let unterminated = [b'a'; SourceName::CAPACITY];
        assert_eq!(SourceName::try_from(&unterminated[..]), Err(SourceNameError::MissingNullTermination));
    }
}
