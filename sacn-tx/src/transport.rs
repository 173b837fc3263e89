//! The UDP transport a sender hands its packets to.
//!
//! [Transport] is the seam between protocol logic and the network: sending a datagram, resolving a host name and
//! selecting the outgoing multicast interface. [UdpTransport] implements it on top of a `socket2` socket.

use std::{
    fmt::{self, Display},
    io,
    net::{Ipv4Addr, SocketAddr, ToSocketAddrs},
};

use socket2::{Domain, Protocol, SockAddr, Socket, Type};

/// IP version of a transport's socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpVersion {
    /// IPv4
    V4,
    /// IPv6
    V6,
}

impl Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpVersion::V4 => f.write_str("IPv4"),
            IpVersion::V6 => f.write_str("IPv6"),
        }
    }
}

impl IpVersion {
    /// Returns true if the address can be reached by a socket of this version.
    pub fn matches(&self, addr: &SocketAddr) -> bool {
        match self {
            IpVersion::V4 => addr.is_ipv4(),
            IpVersion::V6 => addr.is_ipv6(),
        }
    }
}

/// Datagram transport used by [crate::sender::Sender].
///
/// Implementations must be safe to call from several threads at once, sends are fire-and-forget.
#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send + Sync {
    /// The IP version of the underlying socket.
    fn ip_version(&self) -> IpVersion;

    /// Sends one datagram to `addr`.
    fn send_to(&self, buf: &[u8], addr: SocketAddr) -> io::Result<usize>;

    /// Resolves `host` (a name or an IP literal) to socket addresses with the given port.
    fn resolve(&self, host: &str, port: u16) -> io::Result<Vec<SocketAddr>>;

    /// Sends multicast through the IPv4 interface owning `interface`.
    fn set_multicast_if_v4(&self, interface: &Ipv4Addr) -> io::Result<()>;

    /// Sends IPv4 multicast through the interface with the given index.
    ///
    /// [UdpTransport] supports this on Linux, Android, Apple targets and Windows, other targets return
    /// [io::ErrorKind::Unsupported].
    fn set_multicast_if_v4_index(&self, index: u32) -> io::Result<()>;

    /// Sends IPv6 multicast through the interface with the given index.
    fn set_multicast_if_v6(&self, index: u32) -> io::Result<()>;
}

/// A UDP socket, bound once and closed when dropped.
#[derive(Debug)]
pub struct UdpTransport {
    socket: Socket,
    ip_version: IpVersion,
}

impl UdpTransport {
    /// Creates a UDP socket bound to `addr`. An IPv6 address creates an IPv6 only socket.
    pub fn bind(addr: SocketAddr) -> io::Result<Self> {
        let (domain, ip_version) = match addr {
            SocketAddr::V4(_) => (Domain::IPV4, IpVersion::V4),
            SocketAddr::V6(_) => (Domain::IPV6, IpVersion::V6),
        };

        let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
        if ip_version == IpVersion::V6 {
            socket.set_only_v6(true)?;
        }
        socket.bind(&SockAddr::from(addr))?;

        tracing::debug!(local_addr = ?socket.local_addr().ok().and_then(|a| a.as_socket()), "bound sACN socket");

        Ok(Self { socket, ip_version })
    }

    #[cfg(any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "ios",
        target_os = "tvos",
        target_os = "watchos"
    ))]
    fn set_ip_option<V>(&self, name: libc::c_int, value: &V) -> io::Result<()> {
        use std::os::fd::AsRawFd;

        // SAFETY: the descriptor is owned by `self.socket` and open, `value` outlives the call and the length matches.
        let res = unsafe {
            libc::setsockopt(
                self.socket.as_raw_fd(),
                libc::IPPROTO_IP,
                name,
                (value as *const V).cast(),
                std::mem::size_of::<V>() as libc::socklen_t,
            )
        };

        if res == 0 { Ok(()) } else { Err(io::Error::last_os_error()) }
    }

    /// The address the socket is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket
            .local_addr()?
            .as_socket()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "socket is not bound to an IP address"))
    }
}

impl Transport for UdpTransport {
    fn ip_version(&self) -> IpVersion {
        self.ip_version
    }

    fn send_to(&self, buf: &[u8], addr: SocketAddr) -> io::Result<usize> {
        self.socket.send_to(buf, &SockAddr::from(addr))
    }

    fn resolve(&self, host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
        Ok((host, port).to_socket_addrs()?.collect())
    }

    fn set_multicast_if_v4(&self, interface: &Ipv4Addr) -> io::Result<()> {
        self.socket.set_multicast_if_v4(interface)
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    fn set_multicast_if_v4_index(&self, index: u32) -> io::Result<()> {
        let imr_ifindex = libc::c_int::try_from(index).map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;
        let mreqn = libc::ip_mreqn {
            imr_multiaddr: libc::in_addr { s_addr: libc::INADDR_ANY },
            imr_address: libc::in_addr { s_addr: libc::INADDR_ANY },
            imr_ifindex,
        };

        self.set_ip_option(libc::IP_MULTICAST_IF, &mreqn)
    }

    // Darwin takes the bare index through its own option, IP_MULTICAST_IFINDEX in <netinet/in.h>.
    #[cfg(any(target_os = "macos", target_os = "ios", target_os = "tvos", target_os = "watchos"))]
    fn set_multicast_if_v4_index(&self, index: u32) -> io::Result<()> {
        const IP_MULTICAST_IFINDEX: libc::c_int = 66;

        self.set_ip_option(IP_MULTICAST_IFINDEX, &index)
    }

    // Windows reads an address of the form 0.0.0.<index> passed to IP_MULTICAST_IF as an interface index.
    #[cfg(windows)]
    fn set_multicast_if_v4_index(&self, index: u32) -> io::Result<()> {
        if index > 0x00ff_ffff {
            return Err(io::Error::from(io::ErrorKind::InvalidInput));
        }

        self.socket.set_multicast_if_v4(&Ipv4Addr::from(index))
    }

    #[cfg(not(any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "ios",
        target_os = "tvos",
        target_os = "watchos",
        windows
    )))]
    fn set_multicast_if_v4_index(&self, _index: u32) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "selecting an IPv4 multicast interface by index is not supported on this platform",
        ))
    }

    fn set_multicast_if_v6(&self, index: u32) -> io::Result<()> {
        self.socket.set_multicast_if_v6(index)
    }
}

#[cfg(test)]
mod test {
    use std::net::{IpAddr, Ipv6Addr, UdpSocket};

    use super::*;

    #[test]
    fn test_ip_version_matches() {
        let v4: SocketAddr = "127.0.0.1:5568".parse().unwrap();
        let v6: SocketAddr = "[::1]:5568".parse().unwrap();

        assert!(IpVersion::V4.matches(&v4));
        assert!(!IpVersion::V4.matches(&v6));
        assert!(IpVersion::V6.matches(&v6));
    }

    #[test]
    fn test_ip_version_display() {
        assert_eq!(IpVersion::V4.to_string(), "IPv4");
        assert_eq!(IpVersion::V6.to_string(), "IPv6");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_set_multicast_if_v4_index_loopback() {
        let transport = UdpTransport::bind("127.0.0.1:0".parse().unwrap()).unwrap();

        let index = unsafe { libc::if_nametoindex(c"lo".as_ptr()) };
        assert_ne!(index, 0);
        transport.set_multicast_if_v4_index(index).unwrap();
    }

    #[test]
    fn test_udp_transport_sends_datagram() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        let transport = UdpTransport::bind("127.0.0.1:0".parse().unwrap()).unwrap();

        assert_eq!(transport.ip_version(), IpVersion::V4);
        transport.send_to(&[1, 2, 3], receiver.local_addr().unwrap()).unwrap();

        let mut buf = [0u8; 16];
        let (len, from) = receiver.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], &[1, 2, 3]);
        assert_eq!(from, transport.local_addr().unwrap());
    }

    #[test]
    fn test_resolve_ip_literal() {
        let transport = UdpTransport::bind("127.0.0.1:0".parse().unwrap()).unwrap();

        let addrs = transport.resolve("127.0.0.1", 6454).unwrap();
        assert_eq!(addrs, vec![SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 6454)]);

        let addrs = transport.resolve("::1", 6454).unwrap();
        assert_eq!(addrs, vec![SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), 6454)]);
    }

    #[test]
    fn test_set_multicast_if_v4_loopback() {
        let transport = UdpTransport::bind("127.0.0.1:0".parse().unwrap()).unwrap();
        transport.set_multicast_if_v4(&Ipv4Addr::LOCALHOST).unwrap();
    }
}
