// Copyright 2020 sacn Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Defined parameters and field sizes of an ANSI E1.31-2018 data packet.
//!
//! Only the values needed to build (and verify) data packets live here. Synchronisation and universe discovery
//! packets are not produced by this crate.

/// The length of the pdu flags and length field in bytes.
pub const E131_PDU_LENGTH_FLAGS_LENGTH: usize = 2;

/// The pdu flags expected for an ANSI E1.31-2018 packet as per ANSI E1.31-2018 Section 4 Table 4-1.
/// Stored in the high nibble of the flags and length field.
pub const E131_PDU_FLAGS: u8 = 0x70;

/// Mask of the 12 length bits within a flags and length field.
pub const E131_PDU_LENGTH_MASK: u16 = 0x0fff;

/// The size of the ACN root layer preamble, must be 0x0010 bytes as per ANSI E1.31-2018 Section 5.1.
pub const E131_PREAMBLE_SIZE: u16 = 0x0010;

/// The size of the ACN root layer postamble, must be 0x0 bytes as per ANSI E1.31-2018 Section 5.2.
pub const E131_POSTAMBLE_SIZE: u16 = 0x0;

/// The length in bytes of the preamble size field.
pub const E131_PREAMBLE_SIZE_FIELD_LENGTH: usize = 2;

/// The length in bytes of the postamble size field.
pub const E131_POSTAMBLE_SIZE_FIELD_LENGTH: usize = 2;

/// The E131 ACN packet identifier field value. Must be 0x41 0x53 0x43 0x2d 0x45 0x31 0x2e 0x31 0x37 0x00 0x00 0x00 as per
/// ANSI E1.31-2018 Section 5.3.
pub const E131_ACN_PACKET_IDENTIFIER: [u8; 12] = *b"ASC-E1.17\x00\x00\x00";

/// The length in bytes of the root layer vector field as per ANSI E1.31-2018 Section 4 Table 4-1.
pub const E131_ROOT_LAYER_VECTOR_LENGTH: usize = 4;

/// The E131 CID field length in bytes as per ANSI E1.31-2018 Section 4 Table 4-1.
pub const E131_CID_FIELD_LENGTH: usize = 16;

/// The exclusive end index of the CID field, relative to the start of the root layer PDU.
pub const E131_CID_END_INDEX: usize = E131_PDU_LENGTH_FLAGS_LENGTH + E131_ROOT_LAYER_VECTOR_LENGTH + E131_CID_FIELD_LENGTH;

/// The length in bytes of the E1.31 framing layer vector field as per ANSI E1.31-2018 Section 4 Table 4-1.
pub const E131_FRAMING_LAYER_VECTOR_LENGTH: usize = 4;

/// The length of the Source Name field in bytes in an ANSI E1.31-2018 packet as per ANSI E1.31-2018 Section 4, Table 4-1.
pub const E131_SOURCE_NAME_FIELD_LENGTH: usize = 64;

/// The length in bytes of the priority field within an ANSI E1.31-2018 data packet as defined in ANSI E1.31-2018 Section 4, Table 4-1.
pub const E131_PRIORITY_FIELD_LENGTH: usize = 1;

/// The length of the Synchronisation Address field in bytes in an ANSI E1.31-2018 packet as per ANSI E1.31-2018 Section 4, Table 4-1.
pub const E131_SYNC_ADDR_FIELD_LENGTH: usize = 2;

/// The length in bytes of the sequence number field within an ANSI E1.31-2018 packet as defined in ANSI E1.31-2018 Section 4, Table 4-1.
pub const E131_SEQ_NUM_FIELD_LENGTH: usize = 1;

/// The length in bytes of the options field within an ANSI E1.31-2018 data packet as defined in ANSI E1.31-2018 Section 4, Table 4-1.
pub const E131_OPTIONS_FIELD_LENGTH: usize = 1;

/// The length in bytes of a universe field within an ANSI E1.31-2018 packet as defined in ANSI E1.31-2018 Section 4, Table 4-1.
pub const E131_UNIVERSE_FIELD_LENGTH: usize = 2;

/// The length in bytes of the Vector field within the DMP layer of an ANSI E1.31-2018 data packet as per ANSI E1.31-2018
/// Section 4, Table 4-1.
pub const E131_DATA_PACKET_DMP_LAYER_VECTOR_FIELD_LENGTH: usize = 1;

/// The length in bytes of the "Address Type and Data Type" field within an ANSI E1.31-2018 data packet DMP layer as per
/// ANSI E1.31-2018 Section 4, Table 4-1.
pub const E131_DATA_PACKET_DMP_LAYER_ADDRESS_DATA_FIELD_LENGTH: usize = 1;

/// The length in bytes of the "First Property Address" field within an ANSI E1.31-2018 data packet DMP layer as per
/// ANSI E1.31-2018 Section 4, Table 4-1.
pub const E131_DATA_PACKET_DMP_LAYER_FIRST_PROPERTY_ADDRESS_FIELD_LENGTH: usize = 2;

/// The length in bytes of the "Address Increment" field within an ANSI E1.31-2018 data packet DMP layer as per
/// ANSI E1.31-2018 Section 4, Table 4-1.
pub const E131_DATA_PACKET_DMP_LAYER_ADDRESS_INCREMENT_FIELD_LENGTH: usize = 2;

/// The length in bytes of the "Property value count" field within an ANSI E1.31-2018 data packet DMP layer as per
/// ANSI E1.31-2018 Section 4, Table 4-1.
pub const E131_DATA_PACKET_DMP_LAYER_PROPERTY_VALUE_COUNT_FIELD_LENGTH: usize = 2;

/// The value of the "Address Type and Data Type" field within an ANSI E1.31-2018 data packet DMP layer as per ANSI E1.31-2018
/// Section 4, Table 4-1.
pub const E131_DMP_LAYER_ADDRESS_DATA_FIELD: u8 = 0xa1;

/// The value of the "First Property Address" field within an ANSI E1.31-2018 data packet DMP layer as per ANSI E1.31-2018
/// Section 4, Table 4-1.
pub const E131_DATA_PACKET_DMP_LAYER_FIRST_PROPERTY_FIELD: u16 = 0x0000;

/// The value of the "Address Increment" field within an ANSI E1.31-2018 data packet DMP layer as per ANSI E1.31-2018
/// Section 4, Table 4-1.
pub const E131_DATA_PACKET_DMP_LAYER_ADDRESS_INCREMENT: u16 = 0x0001;

/// The vector field value used to identify the ACN packet as an ANSI E1.31 data packet.
/// This is used at the ACN packet layer not the E1.31 layer.
/// Value as defined in ANSI E1.31-2018 Appendix A: Defined Parameters (Normative).
pub const VECTOR_ROOT_E131_DATA: u32 = 0x0000_0004;

/// The E1.31 packet vector field value used to identify the E1.31 packet as a data packet.
/// Value as defined in ANSI E1.31-2018 Appendix A: Defined Parameters (Normative).
pub const VECTOR_E131_DATA_PACKET: u32 = 0x0000_0002;

/// Used at the DMP layer in E1.31 data packets to identify the packet as a set property message.
/// Value as defined in ANSI E1.31-2018 Appendix A: Defined Parameters (Normative).
pub const VECTOR_DMP_SET_PROPERTY: u8 = 0x02;

/// The port number used for the ACN family of protocols and therefore the sACN protocol.
/// As defined in ANSI E1.31-2018 Appendix A: Defined Parameters (Normative)
pub const ACN_SDT_MULTICAST_PORT: u16 = 5568;

/// The synchronisation universe/address of packets which do not require synchronisation as specified in section 6.2.4.1 of ANSI E1.31-2018.
pub const NO_SYNC_UNIVERSE: u16 = 0;

/// Options field value with preview data, stream terminated and force synchronisation all cleared.
pub const E131_NO_OPTIONS: u8 = 0;

/// The null start code which marks the slots as normal DMX512 level data.
pub const DMX_NULL_START_CODE: u8 = 0x00;

/// The maximum number of DMX slots in a single universe, excluding the start code.
pub const DMX_MAX_SLOTS: usize = 512;

/// The payload capacity for a sacn packet, for DMX data this would translate to 512 frames + a startcode byte.
pub const UNIVERSE_CHANNEL_CAPACITY: usize = DMX_MAX_SLOTS + 1;

/// The initial/starting sequence number used for a universe that has never been sent on.
pub const STARTING_SEQUENCE_NUMBER: u8 = 0;

/// Length of a data packet without any property values, i.e. everything up to and including the property value count field.
pub const E131_DATA_PACKET_HEADER_LENGTH: usize = 125;

/// The maximum size of a data packet, reached with a start code and all 512 slots as per ANSI E1.31-2018 Section 4 Table 4-1.
pub const MAXIMUM_DATA_PACKET_SIZE: usize = E131_DATA_PACKET_HEADER_LENGTH + UNIVERSE_CHANNEL_CAPACITY;
