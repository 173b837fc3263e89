// Copyright 2020 sacn Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Sending DMX data as sACN data packets.
//!
//! A [Sender] owns the source identity, the per universe sequence numbers and the transport. Every send takes the
//! next sequence number of its universe, packs a data packet and hands it to the transport as a single datagram.
//! There is no background thread, no retry and no timeout: each call either puts one datagram on the wire or
//! returns an error.
//!
//! Sequence numbers advance as soon as the payload is accepted. A send that fails afterwards (resolution or
//! transmission) still consumes its number, so receivers see a gap rather than a repeated sequence number.
//!
//! # Examples
//!
//! ```no_run
//! use sacn_tx::config::SenderConfig;
//! use sacn_tx::sender::Sender;
//! use sacn_tx::universe_id::UniverseId;
//!
//! let sender = Sender::new(SenderConfig::new("Source")).unwrap();
//! let universe = UniverseId::new(1).unwrap();
//!
//! // Multicast to 239.255.0.1:5568 with the default priority.
//! sender.send_multicast(universe, &[0, 0, 255, 255, 128], None).unwrap();
//!
//! // Unicast to a bridge.
//! sender.send_unicast("192.168.0.1", universe, &[0, 0, 255, 255, 128], None).unwrap();
//!
//! sender.close();
//! ```

use std::net::SocketAddr;

use crate::{
    SacnResult,
    config::{MulticastInterface, SenderConfig},
    dmx_data::DmxPayload,
    error::Error,
    packet::AcnRootLayerProtocol,
    priority::Priority,
    sequence::SequenceTable,
    source::SourceIdentity,
    transport::{IpVersion, Transport, UdpTransport},
    universe_id::UniverseId,
};

/// Where a data packet goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination<'a> {
    /// The multicast group of the universe, see [UniverseId::ipv4_multicast_group] and [UniverseId::ipv6_multicast_group].
    Multicast,
    /// A host name or IP literal, resolved by the transport on every send.
    Unicast(&'a str),
}

/// An sACN source.
///
/// All sending methods take `&self`, a sender can be shared between threads (e.g. in an `Arc`). Sends on the same
/// universe never share a sequence number, sends on different universes don't coordinate at all.
#[derive(Debug)]
pub struct Sender<T: Transport = UdpTransport> {
    identity: SourceIdentity,
    port: u16,
    default_priority: Priority,
    sequences: SequenceTable,
    transport: T,
}

impl Sender<UdpTransport> {
    /// Creates a sender with a UDP socket bound to [SenderConfig::bind_addr].
    pub fn new(config: SenderConfig) -> SacnResult<Self> {
        let transport = UdpTransport::bind(config.bind_addr)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Sender<T> {
    /// Creates a sender on top of the given transport.
    ///
    /// # Errors
    /// Encoding: the config carries a nil CID.
    ///
    /// AddressFamily, SetMulticastInterface: the configured multicast interface can't be applied.
    pub fn with_transport(config: SenderConfig, transport: T) -> SacnResult<Self> {
        let sender = Self {
            identity: config.identity()?,
            port: config.port,
            default_priority: config.default_priority,
            sequences: SequenceTable::new(),
            transport,
        };

        if let Some(interface) = config.multicast_interface {
            sender.set_multicast_interface(interface)?;
        }

        Ok(sender)
    }

    /// Sends `slots` on `universe` to its multicast group.
    ///
    /// `priority` falls back to the configured default priority.
    pub fn send_multicast(&self, universe: UniverseId, slots: &[u8], priority: Option<Priority>) -> SacnResult<()> {
        self.send(Destination::Multicast, universe, slots, priority)
    }

    /// Sends `slots` on `universe` to `host`, a host name or IP literal.
    ///
    /// `priority` falls back to the configured default priority.
    pub fn send_unicast(&self, host: &str, universe: UniverseId, slots: &[u8], priority: Option<Priority>) -> SacnResult<()> {
        self.send(Destination::Unicast(host), universe, slots, priority)
    }

    /// Sends `slots` (1 to 512 DMX slots, without start code) on `universe` to `destination`.
    ///
    /// # Errors
    /// Encoding: the payload is empty or longer than 512 slots. Nothing is sent and the sequence number is untouched.
    ///
    /// ResolveHost, NoAddressForHost: the unicast host couldn't be resolved.
    ///
    /// SendMulticastData, SendUnicastData: the transport failed to send.
    pub fn send(&self, destination: Destination<'_>, universe: UniverseId, slots: &[u8], priority: Option<Priority>) -> SacnResult<()> {
        let payload = DmxPayload::new(slots)?;
        let priority = priority.unwrap_or(self.default_priority);

        let sequence_number = self.sequences.next(universe);
        let packet = AcnRootLayerProtocol::data_packet(&self.identity, universe, sequence_number, priority, payload);
        let buf = packet.pack_heapless()?;

        match destination {
            Destination::Multicast => {
                let addr = self.multicast_addr(universe);
                self.transport.send_to(&buf, addr).map_err(Error::SendMulticastData)?;
                tracing::trace!(%universe, sequence_number, %addr, len = buf.len(), "multicast data packet");
            }
            Destination::Unicast(host) => {
                let addr = self.resolve(host)?;
                self.transport.send_to(&buf, addr).map_err(Error::SendUnicastData)?;
                tracing::trace!(%universe, sequence_number, %addr, len = buf.len(), "unicast data packet");
            }
        }

        Ok(())
    }

    /// Selects the interface multicast packets leave through.
    ///
    /// Meant to be called before sending starts. IPv4 sockets accept an IPv4 address or an interface index,
    /// IPv6 sockets a scoped IPv6 address (selecting the interface of its scope id) or an interface index.
    ///
    /// # Errors
    /// AddressFamily: an IPv4 address on an IPv6 socket or an IPv6 address on an IPv4 socket. The socket is left as
    /// it was.
    ///
    /// SetMulticastInterface: the transport rejected the interface.
    pub fn set_multicast_interface(&self, interface: MulticastInterface) -> SacnResult<()> {
        let ip_version = self.transport.ip_version();
        let result = match (ip_version, interface) {
            (IpVersion::V4, MulticastInterface::Address(addr)) => self.transport.set_multicast_if_v4(&addr),
            (IpVersion::V4, MulticastInterface::Index(index)) => self.transport.set_multicast_if_v4_index(index),
            (IpVersion::V6, MulticastInterface::Address6 { scope_id, .. }) => self.transport.set_multicast_if_v6(scope_id),
            (IpVersion::V6, MulticastInterface::Index(index)) => self.transport.set_multicast_if_v6(index),
            (IpVersion::V4, MulticastInterface::Address6 { .. }) | (IpVersion::V6, MulticastInterface::Address(_)) => {
                return Err(Error::AddressFamily(format!(
                    "can't select multicast interface {interface} on an {ip_version} socket"
                )));
            }
        };

        result.map_err(Error::SetMulticastInterface)?;
        tracing::debug!(%interface, "selected multicast interface");
        Ok(())
    }

    /// The sequence number the next packet on `universe` will carry.
    pub fn next_sequence(&self, universe: UniverseId) -> u8 {
        self.sequences.peek(universe)
    }

    /// The identity packets are sent under.
    pub fn identity(&self) -> &SourceIdentity {
        &self.identity
    }

    /// The UDP port packets are sent to.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The transport packets are handed to.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Shuts the sender down, releasing the transport and with it the socket.
    ///
    /// Dropping the sender has the same effect, this makes the point of release explicit.
    pub fn close(self) {
        tracing::debug!(cid = %self.identity.cid(), universes = self.sequences.universe_count(), "closing sACN sender");
        drop(self.transport);
    }

    fn multicast_addr(&self, universe: UniverseId) -> SocketAddr {
        match self.transport.ip_version() {
            IpVersion::V4 => universe.to_ipv4_multicast_addr(self.port),
            IpVersion::V6 => universe.to_ipv6_multicast_addr(self.port),
        }
    }

    fn resolve(&self, host: &str) -> SacnResult<SocketAddr> {
        let ip_version = self.transport.ip_version();
        let addrs = self.transport.resolve(host, self.port).map_err(|source| Error::ResolveHost {
            host: host.to_owned(),
            source,
        })?;

        addrs
            .into_iter()
            .find(|addr| ip_version.matches(addr))
            .ok_or_else(|| Error::NoAddressForHost(host.to_owned()))
    }
}
