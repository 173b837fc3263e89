//! This module contains all things `Universe` according to ANSI E1.31-2018, Section 3.3.
//!
//! A universe is the addressing unit of sACN. Each one maps onto its own multicast group, so that receivers only
//! subscribe to the universes they patch.

use core::{
    fmt::Display,
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr},
    num::NonZeroU16,
    write,
};

/// Universe identifier
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UniverseId(NonZeroU16);

impl Display for UniverseId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for UniverseId {
    type Error = UniverseError;

    fn try_from(raw_universe: u16) -> Result<Self, Self::Error> {
        Self::new(raw_universe)
    }
}

impl From<UniverseId> for u16 {
    fn from(universe: UniverseId) -> Self {
        universe.0.get()
    }
}

impl Default for UniverseId {
    fn default() -> Self {
        Self::MIN
    }
}

impl PartialEq<u16> for UniverseId {
    fn eq(&self, other: &u16) -> bool {
        self.0.get().eq(other)
    }
}

impl UniverseId {
    /// The lowest / minimum universe number that can be used with the E1.31 protocol as specified in section 9.1.1 of ANSI E1.31-2018.
    pub const MIN_RAW: u16 = 1;
    /// See [Self::MIN_RAW]
    pub const MIN: Self = Self(NonZeroU16::MIN);

    /// The maximum universe number that can be used with the E1.31 protocol as specified in section 9.1.1 of ANSI E1.31-2018.
    pub const MAX_RAW: u16 = 63999;
    /// See [Self::MAX_RAW]
    ///
    /// # Safety:
    /// Value is non-zero
    pub const MAX: Self = Self(unsafe { NonZeroU16::new_unchecked(Self::MAX_RAW) });

    /// The two high bytes of every IPv4 multicast address a universe maps to, as per ANSI E1.31-2018 Section 9.3.1.
    pub const IPV4_MULTICAST_PREFIX: [u8; 2] = [239, 255];

    /// The first seven segments of every IPv6 multicast address a universe maps to, as per ANSI E1.31-2018 Section 9.3.2.
    pub const IPV6_MULTICAST_PREFIX: [u16; 7] = [0xFF18, 0, 0, 0, 0, 0, 0x8300];

    /// Checks if the given universe is a valid universe to send on (within allowed range).
    ///
    /// 0 and everything above [Self::MAX_RAW] is reserved, this includes the universe discovery universe 64214.
    ///
    /// # Errors
    /// InvalidValue: Returned if the universe is outside the allowed range of universes.
    pub const fn in_range(raw_universe: u16) -> Result<(), UniverseError> {
        if Self::MIN_RAW <= raw_universe && raw_universe <= Self::MAX_RAW {
            return Ok(());
        }

        Err(UniverseError::InvalidValue(raw_universe))
    }

    /// Create a new universe
    pub const fn new(raw_universe: u16) -> Result<Self, UniverseError> {
        if let Err(e) = Self::in_range(raw_universe) {
            return Err(e);
        }

        match NonZeroU16::new(raw_universe) {
            Some(universe) => Ok(Self(universe)),
            None => Err(UniverseError::InvalidValue(raw_universe)),
        }
    }

    /// Create a new universe from bytes in big endian order, as found on the wire
    pub const fn from_be_bytes(bytes: [u8; 2]) -> Result<Self, UniverseError> {
        Self::new(u16::from_be_bytes(bytes))
    }

    /// Get the inner value
    pub const fn get(&self) -> u16 {
        self.0.get()
    }

    /// The IPv4 multicast group of this universe: `239.255.<high byte>.<low byte>`.
    ///
    /// Conversion done as specified in section 9.3.1 of ANSI E1.31-2018, Table 9-10.
    pub const fn ipv4_multicast_group(&self) -> Ipv4Addr {
        let [high_byte, low_byte] = self.0.get().to_be_bytes();
        let [first, second] = Self::IPV4_MULTICAST_PREFIX;

        Ipv4Addr::new(first, second, high_byte, low_byte)
    }

    /// The IPv6 multicast group of this universe: `FF18::83:00:<universe>`.
    ///
    /// Conversion done as specified in section 9.3.2 of ANSI E1.31-2018, Table 9-12.
    pub const fn ipv6_multicast_group(&self) -> Ipv6Addr {
        let p = Self::IPV6_MULTICAST_PREFIX;
        Ipv6Addr::new(p[0], p[1], p[2], p[3], p[4], p[5], p[6], self.0.get())
    }

    /// Converts the universe into an Ipv4 multicast socket address using the given port.
    ///
    /// Receivers listen on [crate::e131_definitions::ACN_SDT_MULTICAST_PORT] unless configured otherwise.
    pub const fn to_ipv4_multicast_addr(&self, port: u16) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(self.ipv4_multicast_group()), port)
    }

    /// Converts the universe into an Ipv6 multicast socket address using the given port.
    pub const fn to_ipv6_multicast_addr(&self, port: u16) -> SocketAddr {
        SocketAddr::new(IpAddr::V6(self.ipv6_multicast_group()), port)
    }
}

/// Error for creation of [UniverseId]
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UniverseError {
    /// Attempted to use invalid value for universe. Allowed values are the range from [`UniverseId::MIN`] to
    /// [`UniverseId::MAX`] inclusive.
    ///
    /// # Arguments
    /// 0: Value of invalid universe
    #[error("Invalid universe used. Must be in the range [{} - {}], universe: {}", UniverseId::MIN_RAW, UniverseId::MAX_RAW, .0)]
    InvalidValue(u16),
}

#[cfg(test)]
mod test {
    use core::net::SocketAddrV4;

    use super::*;
    use crate::e131_definitions::ACN_SDT_MULTICAST_PORT;

    /// The universe_to tests below check that the conversion from a universe to an IPv6 or IPv4 multicast address is done as
    /// per ANSI E1.31-2018 Section 9.3.1 Table 9-10 (IPv4) and ANSI E1.31-2018 Section 9.3.2 Table 9-11 + Table 9-12.
    #[test]
    fn test_universe_to_ipv4_lowest_byte_normal() {
        let val: u16 = 119;
        let universe = UniverseId::try_from(val).expect("Valid value for universe");

        let address = universe.to_ipv4_multicast_addr(ACN_SDT_MULTICAST_PORT);
        assert!(address.ip().is_multicast());

        assert_eq!(
            address,
            SocketAddr::V4(SocketAddrV4::new(
                Ipv4Addr::new(239, 255, (val / 256) as u8, (val % 256) as u8),
                ACN_SDT_MULTICAST_PORT
            ))
        );
    }

    #[test]
    fn test_universe_to_ip_ipv4_both_bytes_normal() {
        let val: u16 = 300;
        let universe = UniverseId::try_from(val).expect("Valid value for universe");

        assert_eq!(universe.ipv4_multicast_group(), Ipv4Addr::new(239, 255, 1, 44));
    }

    #[test]
    fn test_universe_to_ip_ipv4_limits() {
        assert_eq!(UniverseId::MIN.ipv4_multicast_group(), Ipv4Addr::new(239, 255, 0, 1));
        assert_eq!(UniverseId::MAX.ipv4_multicast_group(), Ipv4Addr::new(239, 255, 249, 255));
        assert!(UniverseId::MAX.ipv4_multicast_group().is_multicast());
    }

    #[test]
    fn test_universe_to_ip_ipv4_custom_port() {
        let universe = UniverseId::new(1).unwrap();
        let address = universe.to_ipv4_multicast_addr(6000);

        assert_eq!(address.port(), 6000);
        assert_eq!(address.ip(), IpAddr::V4(Ipv4Addr::new(239, 255, 0, 1)));
    }

    #[test]
    fn test_universe_to_ip_ipv6() {
        let universe = UniverseId::new(300).unwrap();
        let address = universe.to_ipv6_multicast_addr(ACN_SDT_MULTICAST_PORT);

        assert!(address.ip().is_multicast());
        assert_eq!(address.ip(), IpAddr::V6(Ipv6Addr::new(0xFF18, 0, 0, 0, 0, 0, 0x8300, 300)));
    }

    #[test]
    fn test_multicast_derivation_is_deterministic() {
        let universe = UniverseId::new(4242).unwrap();

        assert_eq!(universe.ipv4_multicast_group(), universe.ipv4_multicast_group());
        assert_eq!(universe.ipv6_multicast_group(), universe.ipv6_multicast_group());
    }

    #[test]
    fn test_multicast_derivation_is_injective() {
        let mut previous = UniverseId::MIN.ipv4_multicast_group();

        // Addresses grow with the universe number, so strictly increasing means no two universes collide.
        for raw in (UniverseId::MIN_RAW + 1)..=UniverseId::MAX_RAW {
            let address = UniverseId::new(raw).unwrap().ipv4_multicast_group();
            assert!(address > previous, "universe {raw} does not map above its predecessor");
            assert_eq!(&address.octets()[..2], &UniverseId::IPV4_MULTICAST_PREFIX[..]);
            previous = address;
        }
    }

    #[test]
    fn test_universe_out_of_range() {
        assert_eq!(UniverseId::new(0), Err(UniverseError::InvalidValue(0)));
        assert_eq!(UniverseId::new(64000), Err(UniverseError::InvalidValue(64000)));
        assert_eq!(UniverseId::new(64214), Err(UniverseError::InvalidValue(64214)));
        assert_eq!(UniverseId::try_from(u16::MAX), Err(UniverseError::InvalidValue(u16::MAX)));
    }

    #[test]
    fn test_universe_from_be_bytes() {
        assert_eq!(UniverseId::from_be_bytes([0x01, 0x2c]).unwrap(), 300);
        assert!(UniverseId::from_be_bytes([0, 0]).is_err());
    }
}
