// Copyright 2020 sacn Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Sending side of the sACN network protocol.
//!
//! This crate sends DMX512 data as Streaming ACN (sACN) data packets as specified in ANSI E1.31-2018, over IPv4 or IPv6,
//! to the multicast group of a universe or to a unicast host. Packet encoding lives in `sacn-tx-core` and is re-exported
//! here, this crate adds the sender with its per universe sequence numbers and the UDP transport.
//!
//! Universe synchronisation, universe discovery and receiving are not supported.
//!
//! Selecting an IPv4 multicast interface by index works on Linux, Android, Apple targets and Windows. Other targets
//! can select an IPv4 interface by address only.
//!
//! # Examples
//!
//! Creating a sender and sending some data using multicast.
//!
//! ```no_run
//! use sacn_tx::config::SenderConfig;
//! use sacn_tx::priority::Priority;
//! use sacn_tx::sender::Sender;
//! use sacn_tx::universe_id::UniverseId;
//!
//! let sender = Sender::new(SenderConfig::new("Source")).unwrap();
//!
//! let universe = UniverseId::new(1).unwrap(); // Universe the data is to be sent on.
//! let priority = Priority::new(150).unwrap(); // None uses the configured default priority.
//!
//! let data: Vec<u8> = vec![0, 0, 0, 0, 255, 255, 128, 128]; // DMX slots without start code, 1 to 512 of them.
//!
//! sender.send_multicast(universe, &data, Some(priority)).unwrap();
//! ```
//!
//! Creating a sender on IPv6 that sends through a specific interface, and sending some data using unicast.
//!
//! ```no_run
//! use sacn_tx::config::{MulticastInterface, SenderConfig};
//! use sacn_tx::sender::{Destination, Sender};
//! use sacn_tx::universe_id::UniverseId;
//!
//! let config = SenderConfig::new("Source")
//!     .with_bind_addr("[::]:0".parse().unwrap())
//!     .with_multicast_interface(MulticastInterface::Index(2));
//! let sender = Sender::new(config).unwrap();
//!
//! let universe = UniverseId::new(7).unwrap();
//! sender.send(Destination::Unicast("fd00::10"), universe, &[255; 512], None).unwrap();
//! ```

#![warn(missing_docs)]

pub use sacn_tx_core::{dmx_data, e131_definitions, packet, priority, sacn_parse_pack_error, source, source_name, universe_id};

pub mod config;
pub mod error;
pub mod sender;
pub mod sequence;
pub mod transport;

/// Result type of the fallible operations in this crate.
pub type SacnResult<T> = Result<T, error::Error>;
