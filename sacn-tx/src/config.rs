//! Configuration of a [crate::sender::Sender].

use std::{
    fmt::{self, Display},
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV6},
};

use uuid::Uuid;

use crate::{
    e131_definitions::ACN_SDT_MULTICAST_PORT,
    priority::Priority,
    source::{IdentityError, SourceIdentity},
    source_name::SourceName,
};

/// The outgoing interface for multicast traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MulticastInterface {
    /// The IPv4 interface owning this address.
    Address(Ipv4Addr),
    /// The IPv6 interface identified by the scope id of a link-local address, e.g. `fe80::1%3`.
    Address6 {
        /// The interface's address.
        addr: Ipv6Addr,
        /// The OS specific interface index the address is scoped to.
        scope_id: u32,
    },
    /// The interface with this OS specific index.
    Index(u32),
}

impl From<SocketAddrV6> for MulticastInterface {
    fn from(addr: SocketAddrV6) -> Self {
        MulticastInterface::Address6 {
            addr: *addr.ip(),
            scope_id: addr.scope_id(),
        }
    }
}

impl Display for MulticastInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MulticastInterface::Address(addr) => write!(f, "{addr}"),
            MulticastInterface::Address6 { addr, scope_id } => write!(f, "{addr}%{scope_id}"),
            MulticastInterface::Index(index) => write!(f, "interface #{index}"),
        }
    }
}

/// Everything needed to construct a sender.
///
/// [SenderConfig::new] fills in the defaults: a random CID, port [ACN_SDT_MULTICAST_PORT], an ephemeral IPv4 local
/// address, priority [Priority::DEFAULT] and the OS chosen multicast interface.
#[derive(Debug, Clone)]
pub struct SenderConfig {
    /// The CID identifying this source, must not be nil.
    pub cid: Uuid,

    /// The name of this source.
    pub source_name: SourceName,

    /// The UDP port packets are sent to, for multicast and unicast alike.
    pub port: u16,

    /// The local address the socket binds to. Its family decides between IPv4 and IPv6 operation.
    pub bind_addr: SocketAddr,

    /// The priority used by sends that don't specify one.
    pub default_priority: Priority,

    /// Outgoing multicast interface, applied when the sender is constructed.
    pub multicast_interface: Option<MulticastInterface>,
}

impl SenderConfig {
    /// Creates a config with the defaults and the given name, cut down to fit the source name field.
    pub fn new(source_name: &str) -> Self {
        Self {
            cid: Uuid::new_v4(),
            source_name: SourceName::truncated(source_name),
            port: ACN_SDT_MULTICAST_PORT,
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            default_priority: Priority::DEFAULT,
            multicast_interface: None,
        }
    }

    /// Sets the CID.
    pub fn with_cid(mut self, cid: Uuid) -> Self {
        self.cid = cid;
        self
    }

    /// Sets the destination port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the local address to bind to.
    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    /// Sets the priority of sends without one.
    pub fn with_default_priority(mut self, priority: Priority) -> Self {
        self.default_priority = priority;
        self
    }

    /// Sets the outgoing multicast interface.
    pub fn with_multicast_interface(mut self, interface: MulticastInterface) -> Self {
        self.multicast_interface = Some(interface);
        self
    }

    /// The identity packets are sent under.
    pub fn identity(&self) -> Result<SourceIdentity, IdentityError> {
        SourceIdentity::new(self.cid, self.source_name.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SenderConfig::new("Console");

        assert_eq!(config.port, 5568);
        assert_eq!(config.default_priority.get(), 100);
        assert_eq!(config.source_name.as_str(), "Console");
        assert!(config.bind_addr.is_ipv4());
        assert!(config.multicast_interface.is_none());
        assert!(!config.cid.is_nil());
    }

    #[test]
    fn test_long_name_is_truncated() {
        let config = SenderConfig::new(&"z".repeat(80));
        assert_eq!(config.source_name.len(), SourceName::MAX_LEN);
    }

    #[test]
    fn test_scoped_ipv6_interface() {
        let addr: SocketAddrV6 = "[fe80::1%3]:0".parse().unwrap();
        let interface = MulticastInterface::from(addr);

        assert_eq!(
            interface,
            MulticastInterface::Address6 {
                addr: "fe80::1".parse().unwrap(),
                scope_id: 3,
            }
        );
        assert_eq!(interface.to_string(), "fe80::1%3");
    }

    #[test]
    fn test_nil_cid_has_no_identity() {
        let config = SenderConfig::new("Console").with_cid(Uuid::nil());
        assert_eq!(config.identity(), Err(IdentityError::NilCid));
    }
}
