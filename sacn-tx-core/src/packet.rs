// Copyright 2020 sacn Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Packing of sACN data packets.
//!
//! A data packet is three nested PDUs, each starting with its own flags and length field and vector:
//! the ACN root layer (carrying the CID), the E1.31 framing layer (source name, priority, sequence number, universe)
//! and the DMP layer (start code and slot values). All multi byte fields are in network byte order.
//!
//! Packing is pure, the same inputs always produce the same bytes. [AcnRootLayerProtocol::parse] checks a packed
//! buffer against the layout and hands back the fields, it is used to verify what goes out on the wire.
//!
//! # Examples
//!
//! ```
//! # use uuid::Uuid;
//! # use sacn_tx_core::{dmx_data::DmxPayload, packet::AcnRootLayerProtocol, priority::Priority,
//! #     source::SourceIdentity, source_name::SourceName, universe_id::UniverseId};
//! let identity = SourceIdentity::new(Uuid::new_v4(), SourceName::new("Source_A").unwrap()).unwrap();
//! let slots = [0, 1, 2, 3];
//!
//! let packet = AcnRootLayerProtocol::data_packet(
//!     &identity,
//!     UniverseId::new(1).unwrap(),
//!     154,
//!     Priority::default(),
//!     DmxPayload::new(&slots).unwrap(),
//! );
//!
//! let buf = packet.pack_heapless().unwrap();
//!
//! assert_eq!(AcnRootLayerProtocol::parse(&buf).unwrap(), packet);
//! ```

/// The byteorder crate is used for marshalling data on/off the network in Network Byte Order.
use byteorder::{ByteOrder, NetworkEndian};
/// The uuid crate is used for working with the UUIDs which sACN uses as part of the cid field in the protocol.
use uuid::Uuid;

use crate::{
    dmx_data::DmxPayload,
    e131_definitions::{
        DMX_NULL_START_CODE, E131_ACN_PACKET_IDENTIFIER, E131_CID_END_INDEX, E131_CID_FIELD_LENGTH,
        E131_DATA_PACKET_DMP_LAYER_ADDRESS_DATA_FIELD_LENGTH, E131_DATA_PACKET_DMP_LAYER_ADDRESS_INCREMENT,
        E131_DATA_PACKET_DMP_LAYER_ADDRESS_INCREMENT_FIELD_LENGTH, E131_DATA_PACKET_DMP_LAYER_FIRST_PROPERTY_ADDRESS_FIELD_LENGTH,
        E131_DATA_PACKET_DMP_LAYER_FIRST_PROPERTY_FIELD, E131_DATA_PACKET_DMP_LAYER_PROPERTY_VALUE_COUNT_FIELD_LENGTH,
        E131_DATA_PACKET_DMP_LAYER_VECTOR_FIELD_LENGTH, E131_DMP_LAYER_ADDRESS_DATA_FIELD, E131_FRAMING_LAYER_VECTOR_LENGTH,
        E131_NO_OPTIONS, E131_OPTIONS_FIELD_LENGTH, E131_PDU_FLAGS, E131_PDU_LENGTH_FLAGS_LENGTH, E131_PDU_LENGTH_MASK,
        E131_POSTAMBLE_SIZE, E131_POSTAMBLE_SIZE_FIELD_LENGTH, E131_PREAMBLE_SIZE, E131_PREAMBLE_SIZE_FIELD_LENGTH,
        E131_PRIORITY_FIELD_LENGTH, E131_ROOT_LAYER_VECTOR_LENGTH, E131_SEQ_NUM_FIELD_LENGTH, E131_SOURCE_NAME_FIELD_LENGTH,
        E131_SYNC_ADDR_FIELD_LENGTH, E131_UNIVERSE_FIELD_LENGTH, MAXIMUM_DATA_PACKET_SIZE, NO_SYNC_UNIVERSE,
        VECTOR_DMP_SET_PROPERTY, VECTOR_E131_DATA_PACKET, VECTOR_ROOT_E131_DATA,
    },
    priority::Priority,
    sacn_parse_pack_error::ParsePackError,
    source::SourceIdentity,
    source_name::SourceName,
    universe_id::UniverseId,
};

/// A packed data packet, sized for the largest possible data packet so it never touches the heap.
pub type PackedDataPacket = heapless::Vec<u8, MAXIMUM_DATA_PACKET_SIZE>;

/// Root layer protocol of the Architecture for Control Networks (ACN) protocol.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct AcnRootLayerProtocol<'a> {
    /// The PDU this packet carries.
    pub pdu: E131RootLayer<'a>,
}

// Preamble size, postamble size and ACN packet identifier precede the root layer PDU.
const ROOT_LAYER_PDU_INDEX: usize =
    E131_PREAMBLE_SIZE_FIELD_LENGTH + E131_POSTAMBLE_SIZE_FIELD_LENGTH + E131_ACN_PACKET_IDENTIFIER.len();

impl<'a> AcnRootLayerProtocol<'a> {
    /// Assembles a data packet carrying the given slots with the null start code.
    ///
    /// Synchronisation address and options are always zero, this crate neither synchronises universes nor sends
    /// preview or stream termination packets.
    pub fn data_packet(
        identity: &SourceIdentity,
        universe: UniverseId,
        sequence_number: u8,
        priority: Priority,
        property_values: DmxPayload<'a>,
    ) -> Self {
        AcnRootLayerProtocol {
            pdu: E131RootLayer {
                cid: *identity.cid(),
                data: DataPacketFramingLayer {
                    source_name: identity.name().clone(),
                    priority,
                    sequence_number,
                    universe,
                    data: DataPacketDmpLayer {
                        start_code: DMX_NULL_START_CODE,
                        property_values,
                    },
                },
            },
        }
    }

    /// Parse the packet from the given buffer.
    ///
    /// The buffer must hold exactly one data packet, as received in a single datagram.
    pub fn parse(buf: &'a [u8]) -> Result<AcnRootLayerProtocol<'a>, ParsePackError> {
        if buf.len() < ROOT_LAYER_PDU_INDEX {
            Err(ParsePackError::ParseInsufficientData("Insufficient data for ACN root layer preamble"))?;
        }

        // Preamble Size
        if NetworkEndian::read_u16(&buf[0..2]) != E131_PREAMBLE_SIZE {
            Err(ParsePackError::ParseInvalidData("invalid Preamble Size"))?;
        }

        // Post-amble Size
        if NetworkEndian::read_u16(&buf[2..4]) != E131_POSTAMBLE_SIZE {
            Err(ParsePackError::ParseInvalidData("invalid Post-amble Size"))?;
        }

        // ACN Packet Identifier
        if buf[4..ROOT_LAYER_PDU_INDEX] != E131_ACN_PACKET_IDENTIFIER {
            Err(ParsePackError::ParseInvalidData("invalid ACN packet identifier"))?;
        }

        // PDU block
        Ok(AcnRootLayerProtocol {
            pdu: E131RootLayer::parse(&buf[ROOT_LAYER_PDU_INDEX..])?,
        })
    }

    /// Packs the packet into a stack allocated buffer of exactly [Self::len] bytes.
    pub fn pack_heapless(&self) -> Result<PackedDataPacket, ParsePackError> {
        let mut buf = PackedDataPacket::new();
        buf.resize(self.len(), 0).map_err(|()| ParsePackError::PackBufferInsufficient {
            needed: self.len(),
            actual: MAXIMUM_DATA_PACKET_SIZE,
        })?;

        self.pack(&mut buf)?;
        Ok(buf)
    }

    /// Packs the packet into the given buffer.
    ///
    /// Returns the number of bytes written, which is [Self::len]. Bytes past that are left untouched.
    pub fn pack(&self, buf: &mut [u8]) -> Result<usize, ParsePackError> {
        if buf.len() < self.len() {
            Err(ParsePackError::PackBufferInsufficient {
                needed: self.len(),
                actual: buf.len(),
            })?;
        }

        // Preamble Size
        NetworkEndian::write_u16(&mut buf[0..2], E131_PREAMBLE_SIZE);

        // Post-amble Size
        NetworkEndian::write_u16(&mut buf[2..4], E131_POSTAMBLE_SIZE);

        // ACN Packet Identifier
        buf[4..ROOT_LAYER_PDU_INDEX].copy_from_slice(&E131_ACN_PACKET_IDENTIFIER);

        // PDU block
        self.pdu.pack(&mut buf[ROOT_LAYER_PDU_INDEX..])?;

        Ok(self.len())
    }

    /// The length of the packet when packed.
    pub fn len(&self) -> usize {
        // Preamble Field Size (Bytes)
        E131_PREAMBLE_SIZE_FIELD_LENGTH +
        // Post-amble Field Size (Bytes)
        E131_POSTAMBLE_SIZE_FIELD_LENGTH +
        // ACN Packet Identifier Field Size (Bytes)
        E131_ACN_PACKET_IDENTIFIER.len() +
        // PDU block
        self.pdu.len()
    }

    /// A packet always contains its headers, so it is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Represents the data contained with the PduInfo section that appears at the start of a layer in an sACN packet.
struct PduInfo {
    /// The length in bytes of this layer inclusive of the PduInfo.
    length: usize,
    /// The vector which indicates what the layer is, context dependent.
    vector: u32,
}

/// Takes the given byte buffer and parses the flags, length and vector fields into a PduInfo struct.
///
/// The layer must span the whole buffer, a data packet has exactly one PDU per layer.
///
/// # Errors
/// ParseInsufficientData: If the buffer is shorter than the flags, length and vector fields.
///
/// ParsePduInvalidFlags: If the flags parsed don't match the flags expected for an ANSI E1.31-2018 packet as per ANSI E1.31-2018 Section 4 Table 4-1.
///
/// PduInvalidLength: If the length field does not match the length of the buffer.
fn pdu_info(buf: &[u8], vector_length: usize) -> Result<PduInfo, ParsePackError> {
    if buf.len() < E131_PDU_LENGTH_FLAGS_LENGTH + vector_length {
        Err(ParsePackError::ParseInsufficientData(
            "Insufficient data when parsing pdu_info, no flags or length field",
        ))?;
    }

    // Flags
    let flags = buf[0] & 0xf0; // Flags are stored in the top 4 bits.
    if flags != E131_PDU_FLAGS {
        Err(ParsePackError::ParsePduInvalidFlags(flags))?;
    }

    // Length
    let length = (NetworkEndian::read_u16(&buf[0..E131_PDU_LENGTH_FLAGS_LENGTH]) & E131_PDU_LENGTH_MASK) as usize;
    if length != buf.len() {
        Err(ParsePackError::PduInvalidLength(length))?;
    }

    // Vector
    let vector = NetworkEndian::read_uint(&buf[E131_PDU_LENGTH_FLAGS_LENGTH..], vector_length) as u32;

    Ok(PduInfo { length, vector })
}

/// Writes the flags and length field of a PDU, flags in the high nibble and the length in the low 12 bits.
#[inline]
fn write_flags_and_length(buf: &mut [u8], length: usize) {
    let flags_and_length = (u16::from(E131_PDU_FLAGS) << 8) | (length as u16 & E131_PDU_LENGTH_MASK);
    NetworkEndian::write_u16(&mut buf[0..E131_PDU_LENGTH_FLAGS_LENGTH], flags_and_length);
}

trait Pdu<'a>: Sized {
    fn parse(buf: &'a [u8]) -> Result<Self, ParsePackError>;

    fn pack(&self, buf: &mut [u8]) -> Result<(), ParsePackError>;

    fn len(&self) -> usize;
}

/// Root layer protocol data unit (PDU).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct E131RootLayer<'a> {
    /// Sender UUID.
    pub cid: Uuid,
    /// Data carried by the Root Layer PDU.
    pub data: DataPacketFramingLayer<'a>,
}

impl<'a> Pdu<'a> for E131RootLayer<'a> {
    fn parse(buf: &'a [u8]) -> Result<E131RootLayer<'a>, ParsePackError> {
        // Length and Vector
        let PduInfo { length, vector } = pdu_info(buf, E131_ROOT_LAYER_VECTOR_LENGTH)?;
        if length < E131_CID_END_INDEX {
            Err(ParsePackError::ParseInsufficientData("Buffer too short for the ACN root layer CID"))?;
        }

        if vector != VECTOR_ROOT_E131_DATA {
            Err(ParsePackError::PduInvalidVector(vector))?;
        }

        // CID
        let mut cid = [0; E131_CID_FIELD_LENGTH];
        cid.copy_from_slice(&buf[E131_PDU_LENGTH_FLAGS_LENGTH + E131_ROOT_LAYER_VECTOR_LENGTH..E131_CID_END_INDEX]);

        // Data
        let data = DataPacketFramingLayer::parse(&buf[E131_CID_END_INDEX..length])?;

        Ok(E131RootLayer {
            cid: Uuid::from_bytes(cid),
            data,
        })
    }

    fn pack(&self, buf: &mut [u8]) -> Result<(), ParsePackError> {
        // Flags and Length
        write_flags_and_length(buf, self.len());

        // Vector
        NetworkEndian::write_u32(
            &mut buf[E131_PDU_LENGTH_FLAGS_LENGTH..E131_PDU_LENGTH_FLAGS_LENGTH + E131_ROOT_LAYER_VECTOR_LENGTH],
            VECTOR_ROOT_E131_DATA,
        );

        // CID
        buf[E131_PDU_LENGTH_FLAGS_LENGTH + E131_ROOT_LAYER_VECTOR_LENGTH..E131_CID_END_INDEX].copy_from_slice(self.cid.as_bytes());

        // Data
        self.data.pack(&mut buf[E131_CID_END_INDEX..])
    }

    fn len(&self) -> usize {
        // Length and Flags
        E131_PDU_LENGTH_FLAGS_LENGTH +
        // Vector
        E131_ROOT_LAYER_VECTOR_LENGTH +
        // CID
        E131_CID_FIELD_LENGTH +
        // Data
        self.data.len()
    }
}

/// Framing layer PDU for sACN data packets.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct DataPacketFramingLayer<'a> {
    /// The name of the source.
    pub source_name: SourceName,

    /// Priority of this data packet.
    pub priority: Priority,

    /// The sequence number of this packet.
    pub sequence_number: u8,

    /// The universe DMX data is transmitted for.
    pub universe: UniverseId,

    /// DMP layer containing the DMX data.
    pub data: DataPacketDmpLayer<'a>,
}

// Calculate the indexes of the fields within the buffer based on the size of the fields previous.
// Theses indexes are only valid within the scope of this part of the protocol (DataPacketFramingLayer).
const SOURCE_NAME_INDEX: usize = E131_PDU_LENGTH_FLAGS_LENGTH + E131_FRAMING_LAYER_VECTOR_LENGTH;
const PRIORITY_INDEX: usize = SOURCE_NAME_INDEX + E131_SOURCE_NAME_FIELD_LENGTH;
const SYNC_ADDR_INDEX: usize = PRIORITY_INDEX + E131_PRIORITY_FIELD_LENGTH;
const SEQ_NUM_INDEX: usize = SYNC_ADDR_INDEX + E131_SYNC_ADDR_FIELD_LENGTH;
const OPTIONS_FIELD_INDEX: usize = SEQ_NUM_INDEX + E131_SEQ_NUM_FIELD_LENGTH;
const UNIVERSE_INDEX: usize = OPTIONS_FIELD_INDEX + E131_OPTIONS_FIELD_LENGTH;
const DATA_INDEX: usize = UNIVERSE_INDEX + E131_UNIVERSE_FIELD_LENGTH;

impl<'a> Pdu<'a> for DataPacketFramingLayer<'a> {
    fn parse(buf: &'a [u8]) -> Result<DataPacketFramingLayer<'a>, ParsePackError> {
        // Length and Vector
        let PduInfo { length, vector } = pdu_info(buf, E131_FRAMING_LAYER_VECTOR_LENGTH)?;
        if length < DATA_INDEX {
            Err(ParsePackError::ParseInsufficientData(
                "Buffer contains insufficient data based on data packet framing layer pdu length field",
            ))?;
        }

        if vector != VECTOR_E131_DATA_PACKET {
            Err(ParsePackError::PduInvalidVector(vector))?;
        }

        // Source Name
        let source_name = SourceName::try_from(&buf[SOURCE_NAME_INDEX..PRIORITY_INDEX])?;

        // Priority
        let priority = Priority::try_from(buf[PRIORITY_INDEX])?;

        // Synchronization Address
        if NetworkEndian::read_u16(&buf[SYNC_ADDR_INDEX..SEQ_NUM_INDEX]) != NO_SYNC_UNIVERSE {
            Err(ParsePackError::ParseInvalidData("synchronisation address set, synchronisation is not supported"))?;
        }

        // Sequence Number
        let sequence_number = buf[SEQ_NUM_INDEX];

        // Options
        if buf[OPTIONS_FIELD_INDEX] != E131_NO_OPTIONS {
            Err(ParsePackError::ParseInvalidData("options set, preview and stream termination are not supported"))?;
        }

        // Universe
        let universe = UniverseId::from_be_bytes([buf[UNIVERSE_INDEX], buf[UNIVERSE_INDEX + 1]])?;

        // Data layer.
        let data = DataPacketDmpLayer::parse(&buf[DATA_INDEX..length])?;

        Ok(DataPacketFramingLayer {
            source_name,
            priority,
            sequence_number,
            universe,
            data,
        })
    }

    fn pack(&self, buf: &mut [u8]) -> Result<(), ParsePackError> {
        // Flags and Length
        write_flags_and_length(buf, self.len());

        // Vector
        NetworkEndian::write_u32(&mut buf[E131_PDU_LENGTH_FLAGS_LENGTH..SOURCE_NAME_INDEX], VECTOR_E131_DATA_PACKET);

        // Source Name, padded with 0's up to the required 64 byte length.
        self.source_name.write_field(&mut buf[SOURCE_NAME_INDEX..PRIORITY_INDEX]);

        // Priority
        buf[PRIORITY_INDEX] = self.priority.get();

        // Synchronization Address
        NetworkEndian::write_u16(&mut buf[SYNC_ADDR_INDEX..SEQ_NUM_INDEX], NO_SYNC_UNIVERSE);

        // Sequence Number
        buf[SEQ_NUM_INDEX] = self.sequence_number;

        // Options, all bits cleared including the reserved bits 0-4 as per ANSI E1.31-2018 Section 6.2.6.
        buf[OPTIONS_FIELD_INDEX] = E131_NO_OPTIONS;

        // Universe
        NetworkEndian::write_u16(&mut buf[UNIVERSE_INDEX..DATA_INDEX], self.universe.get());

        // Data
        self.data.pack(&mut buf[DATA_INDEX..])
    }

    fn len(&self) -> usize {
        // Length and Flags
        E131_PDU_LENGTH_FLAGS_LENGTH +
        // Vector
        E131_FRAMING_LAYER_VECTOR_LENGTH +
        // Source Name
        E131_SOURCE_NAME_FIELD_LENGTH +
        // Priority
        E131_PRIORITY_FIELD_LENGTH +
        // Synchronization Address
        E131_SYNC_ADDR_FIELD_LENGTH +
        // Sequence Number
        E131_SEQ_NUM_FIELD_LENGTH +
        // Options
        E131_OPTIONS_FIELD_LENGTH +
        // Universe
        E131_UNIVERSE_FIELD_LENGTH +
        // Data
        self.data.len()
    }
}

/// Device Management Protocol PDU with SET PROPERTY vector.
///
/// Used for sACN data packets.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct DataPacketDmpLayer<'a> {
    /// The start code, the first property value on the wire. 0x00 for normal DMX data.
    pub start_code: u8,

    /// DMX slot values following the start code.
    pub property_values: DmxPayload<'a>,
}

// Calculate the indexes of the fields within the buffer based on the size of the fields previous.
// Theses indexes are only valid within the scope of this part of the protocol (DataPacketDmpLayer).
const VECTOR_FIELD_INDEX: usize = E131_PDU_LENGTH_FLAGS_LENGTH;
const ADDRESS_DATA_FIELD_INDEX: usize = VECTOR_FIELD_INDEX + E131_DATA_PACKET_DMP_LAYER_VECTOR_FIELD_LENGTH;
const FIRST_PROPERTY_FIELD_INDEX: usize = ADDRESS_DATA_FIELD_INDEX + E131_DATA_PACKET_DMP_LAYER_ADDRESS_DATA_FIELD_LENGTH;
const ADDRESS_INCREMENT_FIELD_INDEX: usize = FIRST_PROPERTY_FIELD_INDEX + E131_DATA_PACKET_DMP_LAYER_FIRST_PROPERTY_ADDRESS_FIELD_LENGTH;
const PROPERTY_VALUE_COUNT_FIELD_INDEX: usize = ADDRESS_INCREMENT_FIELD_INDEX + E131_DATA_PACKET_DMP_LAYER_ADDRESS_INCREMENT_FIELD_LENGTH;
const PROPERTY_VALUES_FIELD_INDEX: usize = PROPERTY_VALUE_COUNT_FIELD_INDEX + E131_DATA_PACKET_DMP_LAYER_PROPERTY_VALUE_COUNT_FIELD_LENGTH;
const SLOTS_FIELD_INDEX: usize = PROPERTY_VALUES_FIELD_INDEX + 1;

impl<'a> Pdu<'a> for DataPacketDmpLayer<'a> {
    fn parse(buf: &'a [u8]) -> Result<DataPacketDmpLayer<'a>, ParsePackError> {
        // Length and Vector
        let PduInfo { length, vector } = pdu_info(buf, E131_DATA_PACKET_DMP_LAYER_VECTOR_FIELD_LENGTH)?;
        if length < SLOTS_FIELD_INDEX {
            Err(ParsePackError::ParseInsufficientData(
                "Buffer contains insufficient data based on data packet dmp layer pdu length field",
            ))?;
        }

        if vector != u32::from(VECTOR_DMP_SET_PROPERTY) {
            Err(ParsePackError::PduInvalidVector(vector))?;
        }

        // Address and Data Type
        if buf[ADDRESS_DATA_FIELD_INDEX] != E131_DMP_LAYER_ADDRESS_DATA_FIELD {
            Err(ParsePackError::ParseInvalidData("invalid Address and Data Type"))?;
        }

        // First Property Address
        if NetworkEndian::read_u16(&buf[FIRST_PROPERTY_FIELD_INDEX..ADDRESS_INCREMENT_FIELD_INDEX])
            != E131_DATA_PACKET_DMP_LAYER_FIRST_PROPERTY_FIELD
        {
            Err(ParsePackError::ParseInvalidData("invalid First Property Address"))?;
        }

        // Address Increment
        if NetworkEndian::read_u16(&buf[ADDRESS_INCREMENT_FIELD_INDEX..PROPERTY_VALUE_COUNT_FIELD_INDEX])
            != E131_DATA_PACKET_DMP_LAYER_ADDRESS_INCREMENT
        {
            Err(ParsePackError::ParseInvalidData("invalid Address Increment"))?;
        }

        // Property value count, covers the start code and the slots.
        let property_value_count = NetworkEndian::read_u16(&buf[PROPERTY_VALUE_COUNT_FIELD_INDEX..PROPERTY_VALUES_FIELD_INDEX]);
        if property_value_count as usize + PROPERTY_VALUES_FIELD_INDEX != length {
            Err(ParsePackError::PduInvalidLength(length))?;
        }

        // Property values
        let start_code = buf[PROPERTY_VALUES_FIELD_INDEX];
        let property_values = DmxPayload::new(&buf[SLOTS_FIELD_INDEX..length])?;

        Ok(DataPacketDmpLayer {
            start_code,
            property_values,
        })
    }

    fn pack(&self, buf: &mut [u8]) -> Result<(), ParsePackError> {
        // Flags and Length
        write_flags_and_length(buf, self.len());

        // Vector
        buf[VECTOR_FIELD_INDEX] = VECTOR_DMP_SET_PROPERTY;

        // Address and Data Type
        buf[ADDRESS_DATA_FIELD_INDEX] = E131_DMP_LAYER_ADDRESS_DATA_FIELD;

        // First Property Address
        NetworkEndian::write_u16(
            &mut buf[FIRST_PROPERTY_FIELD_INDEX..ADDRESS_INCREMENT_FIELD_INDEX],
            E131_DATA_PACKET_DMP_LAYER_FIRST_PROPERTY_FIELD,
        );

        // Address Increment
        NetworkEndian::write_u16(
            &mut buf[ADDRESS_INCREMENT_FIELD_INDEX..PROPERTY_VALUE_COUNT_FIELD_INDEX],
            E131_DATA_PACKET_DMP_LAYER_ADDRESS_INCREMENT,
        );

        // Property value count, the start code counts as a property value.
        NetworkEndian::write_u16(
            &mut buf[PROPERTY_VALUE_COUNT_FIELD_INDEX..PROPERTY_VALUES_FIELD_INDEX],
            (self.property_values.len() + 1) as u16,
        );

        // Property values
        buf[PROPERTY_VALUES_FIELD_INDEX] = self.start_code;
        buf[SLOTS_FIELD_INDEX..SLOTS_FIELD_INDEX + self.property_values.len()].copy_from_slice(&self.property_values);

        Ok(())
    }

    fn len(&self) -> usize {
        // Length and Flags
        E131_PDU_LENGTH_FLAGS_LENGTH +
        // Vector
        E131_DATA_PACKET_DMP_LAYER_VECTOR_FIELD_LENGTH +
        // Address and Data Type
        E131_DATA_PACKET_DMP_LAYER_ADDRESS_DATA_FIELD_LENGTH +
        // First Property Address
        E131_DATA_PACKET_DMP_LAYER_FIRST_PROPERTY_ADDRESS_FIELD_LENGTH +
        // Address Increment
        E131_DATA_PACKET_DMP_LAYER_ADDRESS_INCREMENT_FIELD_LENGTH +
        // Property value count
        E131_DATA_PACKET_DMP_LAYER_PROPERTY_VALUE_COUNT_FIELD_LENGTH +
        // Start code
        1 +
        // Slots
        self.property_values.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::e131_definitions::{DMX_MAX_SLOTS, E131_DATA_PACKET_HEADER_LENGTH};

    const TEST_CID: [u8; 16] = [
        0xef, 0x07, 0xc8, 0xdd, 0x00, 0x64, 0x44, 0x01, 0xa3, 0xa2, 0x45, 0x9e, 0xf8, 0xe6, 0x14, 0x3e,
    ];

    fn identity(name: &str) -> SourceIdentity {
        SourceIdentity::new(Uuid::from_bytes(TEST_CID), SourceName::new(name).unwrap()).unwrap()
    }

    fn packet<'a>(universe: u16, sequence_number: u8, priority: u8, slots: &'a [u8]) -> AcnRootLayerProtocol<'a> {
        AcnRootLayerProtocol::data_packet(
            &identity("Test"),
            UniverseId::new(universe).unwrap(),
            sequence_number,
            Priority::new(priority).unwrap(),
            DmxPayload::new(slots).unwrap(),
        )
    }

    #[test]
    fn test_pack_reference_packet() {
        let buf = packet(1, 0, 100, &[255, 0, 128]).pack_heapless().unwrap();
        assert_eq!(buf.len(), 129);

        // Root layer
        assert_eq!(&buf[0..4], &[0x00, 0x10, 0x00, 0x00]);
        assert_eq!(&buf[4..16], b"ASC-E1.17\x00\x00\x00");
        assert_eq!(&buf[16..18], &[0x70, 113]);
        assert_eq!(&buf[18..22], &[0x00, 0x00, 0x00, 0x04]);
        assert_eq!(&buf[22..38], &TEST_CID);

        // Framing layer
        assert_eq!(&buf[38..40], &[0x70, 91]);
        assert_eq!(&buf[40..44], &[0x00, 0x00, 0x00, 0x02]);
        assert_eq!(&buf[44..48], b"Test");
        assert!(buf[48..108].iter().all(|b| *b == 0));
        assert_eq!(buf[108], 100);
        assert_eq!(&buf[109..111], &[0x00, 0x00]);
        assert_eq!(buf[111], 0);
        assert_eq!(buf[112], 0);
        assert_eq!(&buf[113..115], &[0x00, 0x01]);

        // DMP layer
        assert_eq!(&buf[115..117], &[0x70, 14]);
        assert_eq!(buf[117], 0x02);
        assert_eq!(buf[118], 0xa1);
        assert_eq!(&buf[119..121], &[0x00, 0x00]);
        assert_eq!(&buf[121..123], &[0x00, 0x01]);
        assert_eq!(NetworkEndian::read_u16(&buf[123..125]), 4);
        assert_eq!(&buf[125..], &[0x00, 0xff, 0x00, 0x80]);
    }

    #[test]
    fn test_root_layer_pdu_follows_header() {
        let buf = packet(1, 0, 100, &[1]).pack_heapless().unwrap();

        assert_eq!(ROOT_LAYER_PDU_INDEX, 16);
        assert_eq!(buf[ROOT_LAYER_PDU_INDEX] & 0xf0, E131_PDU_FLAGS);
        assert_eq!(
            NetworkEndian::read_u16(&buf[ROOT_LAYER_PDU_INDEX..ROOT_LAYER_PDU_INDEX + 2]) & E131_PDU_LENGTH_MASK,
            (buf.len() - ROOT_LAYER_PDU_INDEX) as u16
        );
    }

    #[test]
    fn test_pack_full_universe_flags_and_length() {
        let slots = [0x5a; DMX_MAX_SLOTS];
        let buf = packet(63999, 255, 200, &slots).pack_heapless().unwrap();

        assert_eq!(buf.len(), MAXIMUM_DATA_PACKET_SIZE);
        assert_eq!(NetworkEndian::read_u16(&buf[16..18]), 0x7000 | (638 - 16));
        assert_eq!(NetworkEndian::read_u16(&buf[38..40]), 0x7000 | (638 - 38));
        assert_eq!(NetworkEndian::read_u16(&buf[115..117]), 0x7000 | (638 - 115));
        assert_eq!(NetworkEndian::read_u16(&buf[123..125]), 513);
        assert_eq!(&buf[113..115], &[0xf9, 0xff]);
    }

    #[test]
    fn test_pack_is_deterministic() {
        let slots = [1, 2, 3, 4, 5];
        let first = packet(7, 42, 150, &slots).pack_heapless().unwrap();
        let second = packet(7, 42, 150, &slots).pack_heapless().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_pack_buffer_too_small() {
        let mut buf = [0u8; E131_DATA_PACKET_HEADER_LENGTH];
        let err = packet(1, 0, 100, &[1]).pack(&mut buf).unwrap_err();

        assert_eq!(
            err,
            ParsePackError::PackBufferInsufficient {
                needed: E131_DATA_PACKET_HEADER_LENGTH + 2,
                actual: E131_DATA_PACKET_HEADER_LENGTH,
            }
        );
    }

    #[test]
    fn test_pack_leaves_trailing_bytes() {
        let mut buf = [0xeeu8; 200];
        let written = packet(1, 0, 100, &[1, 2]).pack(&mut buf).unwrap();

        assert_eq!(written, 128);
        assert!(buf[written..].iter().all(|b| *b == 0xee));
    }

    #[test]
    fn test_parse_recovers_fields() {
        let slots: [u8; 300] = core::array::from_fn(|i| i as u8);
        let buf = packet(4000, 17, 0, &slots).pack_heapless().unwrap();

        let parsed = AcnRootLayerProtocol::parse(&buf).unwrap();
        assert_eq!(parsed.pdu.cid, Uuid::from_bytes(TEST_CID));
        assert_eq!(parsed.pdu.data.source_name.as_str(), "Test");
        assert_eq!(parsed.pdu.data.priority, Priority::MIN);
        assert_eq!(parsed.pdu.data.sequence_number, 17);
        assert_eq!(parsed.pdu.data.universe, 4000);
        assert_eq!(parsed.pdu.data.data.start_code, DMX_NULL_START_CODE);
        assert_eq!(parsed.pdu.data.data.property_values.slots(), &slots[..]);
    }

    #[test]
    fn test_round_trip_name_lengths() {
        let long_name = "n".repeat(SourceName::MAX_LEN);
        for name in ["", "A", long_name.as_str()] {
            let packet = AcnRootLayerProtocol::data_packet(
                &identity(name),
                UniverseId::MIN,
                1,
                Priority::MAX,
                DmxPayload::new(&[9]).unwrap(),
            );
            let buf = packet.pack_heapless().unwrap();

            assert_eq!(AcnRootLayerProtocol::parse(&buf).unwrap(), packet);
        }
    }

    #[test]
    fn test_parse_rejects_invalid_identifier() {
        let mut buf = packet(1, 0, 100, &[1]).pack_heapless().unwrap();
        buf[4] = b'X';

        assert_eq!(
            AcnRootLayerProtocol::parse(&buf),
            Err(ParsePackError::ParseInvalidData("invalid ACN packet identifier"))
        );
    }

    #[test]
    fn test_parse_rejects_invalid_flags() {
        let mut buf = packet(1, 0, 100, &[1]).pack_heapless().unwrap();
        buf[38] = (buf[38] & 0x0f) | 0x40;

        assert_eq!(AcnRootLayerProtocol::parse(&buf), Err(ParsePackError::ParsePduInvalidFlags(0x40)));
    }

    #[test]
    fn test_parse_rejects_truncated_packet() {
        let buf = packet(1, 0, 100, &[1, 2, 3]).pack_heapless().unwrap();

        assert_eq!(
            AcnRootLayerProtocol::parse(&buf[..buf.len() - 1]),
            Err(ParsePackError::PduInvalidLength(buf.len() - 16))
        );
        assert!(AcnRootLayerProtocol::parse(&buf[..10]).is_err());
    }

    #[test]
    fn test_parse_rejects_property_count_mismatch() {
        let mut buf = packet(1, 0, 100, &[1, 2, 3]).pack_heapless().unwrap();
        NetworkEndian::write_u16(&mut buf[123..125], 3);

        assert_eq!(AcnRootLayerProtocol::parse(&buf), Err(ParsePackError::PduInvalidLength(14)));
    }

    #[test]
    fn test_parse_rejects_invalid_universe() {
        let mut buf = packet(1, 0, 100, &[1]).pack_heapless().unwrap();
        NetworkEndian::write_u16(&mut buf[113..115], 0);

        assert!(matches!(AcnRootLayerProtocol::parse(&buf), Err(ParsePackError::InvalidUniverse(_))));
    }
}
