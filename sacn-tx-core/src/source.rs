//! The identity a source transmits under.

use uuid::Uuid;

use crate::source_name::SourceName;

/// The CID and name identifying a source across every universe it sends on.
///
/// Both are carried in every data packet, the CID in the root layer and the name in the framing layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceIdentity {
    cid: Uuid,
    name: SourceName,
}

impl SourceIdentity {
    /// Creates a new identity.
    ///
    /// # Errors
    /// NilCid: Returned if the cid is the nil UUID, which can not identify a component as per ANSI E1.17 / E1.31 Section 5.6.
    pub fn new(cid: Uuid, name: SourceName) -> Result<Self, IdentityError> {
        if cid.is_nil() {
            return Err(IdentityError::NilCid);
        }

        Ok(Self { cid, name })
    }

    /// The component identifier of the source.
    pub const fn cid(&self) -> &Uuid {
        &self.cid
    }

    /// The human readable name of the source.
    pub const fn name(&self) -> &SourceName {
        &self.name
    }
}

/// Error for creation of [SourceIdentity]
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// The nil UUID was given as CID.
    #[error("The nil UUID can not be used as source CID")]
    NilCid,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_identity_rejects_nil_cid() {
        let name = SourceName::new("Source").unwrap();
        assert_eq!(SourceIdentity::new(Uuid::nil(), name), Err(IdentityError::NilCid));
    }

    #[test]
    fn test_identity_keeps_fields() {
        let cid = Uuid::from_bytes([7; 16]);
        let identity = SourceIdentity::new(cid, SourceName::new("Source").unwrap()).unwrap();

        assert_eq!(identity.cid(), &cid);
        assert_eq!(identity.name().as_str(), "Source");
    }
}
