#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

//! Core types for the sacn-tx crate
//!
//! Everything needed to turn a universe, a source identity, a sequence number, a priority and slot data into the
//! exact bytes of an ANSI E1.31-2018 data packet. Nothing in here performs I/O or allocates.

pub mod dmx_data;
pub mod e131_definitions;
pub mod packet;
pub mod priority;
pub mod sacn_parse_pack_error;
pub mod source;
pub mod source_name;
pub mod universe_id;
