//! Header validation and per-type payload dispatch.

use serde::Serialize;

use crate::format::MIN_HEADER_SIZE;
use crate::header::RawHeader;
use crate::packets::{
    PacketCarDamageData, PacketCarSetupData, PacketCarStatusData, PacketCarTelemetryData,
    PacketEventData, PacketFinalClassificationData, PacketLapData, PacketLobbyInfoData,
    PacketMotionData, PacketMotionExData, PacketParticipantsData, PacketSessionData,
    PacketSessionHistoryData, PacketTyreSetsData, packet_size,
};
use crate::wire::{ByteReader, ByteWriter, OutOfBounds, WireLayout};
use crate::{DecodeError, PacketFormat, PacketHeader, PacketId, RawDatagram};

/// A decoded packet: its header plus the typed payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Packet<T> {
    pub header: PacketHeader,
    pub data: T,
}

impl<T: WireLayout> Packet<T> {
    /// Encode header and payload with the layout of `header.packet_format`.
    ///
    /// The header's packet id is written as-is; keep it consistent with `T`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let format = self.header.packet_format;
        let mut w = ByteWriter::with_capacity(
            self.header.wire_size().saturating_add(T::wire_size(format)),
        );
        self.header.write(&mut w);
        self.data.write(&mut w, format);
        w.into_bytes()
    }
}

/// One accepted packet, tagged by type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "packet_type")]
pub enum PacketRecord {
    Motion(Box<Packet<PacketMotionData>>),
    Session(Box<Packet<PacketSessionData>>),
    LapData(Box<Packet<PacketLapData>>),
    Event(Box<Packet<PacketEventData>>),
    Participants(Box<Packet<PacketParticipantsData>>),
    CarSetups(Box<Packet<PacketCarSetupData>>),
    CarTelemetry(Box<Packet<PacketCarTelemetryData>>),
    CarStatus(Box<Packet<PacketCarStatusData>>),
    FinalClassification(Box<Packet<PacketFinalClassificationData>>),
    LobbyInfo(Box<Packet<PacketLobbyInfoData>>),
    CarDamage(Box<Packet<PacketCarDamageData>>),
    SessionHistory(Box<Packet<PacketSessionHistoryData>>),
    TyreSets(Box<Packet<PacketTyreSetsData>>),
    MotionEx(Box<Packet<PacketMotionExData>>),
}

macro_rules! each_packet {
    ($record:expr, $p:ident => $body:expr) => {
        match $record {
            PacketRecord::Motion($p) => $body,
            PacketRecord::Session($p) => $body,
            PacketRecord::LapData($p) => $body,
            PacketRecord::Event($p) => $body,
            PacketRecord::Participants($p) => $body,
            PacketRecord::CarSetups($p) => $body,
            PacketRecord::CarTelemetry($p) => $body,
            PacketRecord::CarStatus($p) => $body,
            PacketRecord::FinalClassification($p) => $body,
            PacketRecord::LobbyInfo($p) => $body,
            PacketRecord::CarDamage($p) => $body,
            PacketRecord::SessionHistory($p) => $body,
            PacketRecord::TyreSets($p) => $body,
            PacketRecord::MotionEx($p) => $body,
        }
    };
}

impl PacketRecord {
    pub fn header(&self) -> &PacketHeader {
        each_packet!(self, p => &p.header)
    }

    pub fn packet_id(&self) -> PacketId {
        self.header().packet_id
    }

    pub fn packet_format(&self) -> PacketFormat {
        self.header().packet_format
    }

    /// Re-encode the record with its declared format.
    pub fn to_bytes(&self) -> Vec<u8> {
        each_packet!(self, p => p.to_bytes())
    }

    fn read(header: PacketHeader, r: &mut ByteReader<'_>) -> Result<Self, OutOfBounds> {
        fn boxed<T: WireLayout>(
            header: PacketHeader,
            r: &mut ByteReader<'_>,
        ) -> Result<Box<Packet<T>>, OutOfBounds> {
            let data = T::read(r, header.packet_format)?;
            Ok(Box::new(Packet { header, data }))
        }

        let record = match header.packet_id {
            PacketId::Motion => PacketRecord::Motion(boxed(header, r)?),
            PacketId::Session => PacketRecord::Session(boxed(header, r)?),
            PacketId::LapData => PacketRecord::LapData(boxed(header, r)?),
            PacketId::Event => PacketRecord::Event(boxed(header, r)?),
            PacketId::Participants => PacketRecord::Participants(boxed(header, r)?),
            PacketId::CarSetups => PacketRecord::CarSetups(boxed(header, r)?),
            PacketId::CarTelemetry => PacketRecord::CarTelemetry(boxed(header, r)?),
            PacketId::CarStatus => PacketRecord::CarStatus(boxed(header, r)?),
            PacketId::FinalClassification => PacketRecord::FinalClassification(boxed(header, r)?),
            PacketId::LobbyInfo => PacketRecord::LobbyInfo(boxed(header, r)?),
            PacketId::CarDamage => PacketRecord::CarDamage(boxed(header, r)?),
            PacketId::SessionHistory => PacketRecord::SessionHistory(boxed(header, r)?),
            PacketId::TyreSets => PacketRecord::TyreSets(boxed(header, r)?),
            PacketId::MotionEx => PacketRecord::MotionEx(boxed(header, r)?),
        };
        Ok(record)
    }
}

/// Stateless datagram decoder.
///
/// Holds only the set of accepted packet formats, so one instance can be
/// shared freely between tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoder {
    supported: Vec<PacketFormat>,
}

impl Default for Decoder {
    /// Accepts every format with a layout table.
    fn default() -> Self {
        Self::new(PacketFormat::ALL)
    }
}

impl Decoder {
    pub fn new(supported_formats: impl IntoIterator<Item = PacketFormat>) -> Self {
        let mut supported: Vec<PacketFormat> = supported_formats.into_iter().collect();
        supported.sort_unstable();
        supported.dedup();
        Self { supported }
    }

    pub fn supported_formats(&self) -> &[PacketFormat] {
        &self.supported
    }

    pub fn supports(&self, format: PacketFormat) -> bool {
        self.supported.contains(&format)
    }

    /// Decode a received datagram, consuming it.
    pub fn decode(&self, datagram: RawDatagram) -> Result<PacketRecord, DecodeError> {
        self.decode_bytes(&datagram.bytes)
    }

    /// Decode one packet.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::TooShort`] when the buffer cannot hold the header.
    /// - [`DecodeError::UnsupportedVersion`] when the declared format is not
    ///   accepted by this decoder.
    /// - [`DecodeError::UnknownPacketType`] when the packet id is not defined
    ///   for the declared format.
    /// - [`DecodeError::SizeMismatch`] when the length is not exactly header
    ///   plus payload.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<PacketRecord, DecodeError> {
        let actual = bytes.len();
        let too_short = |required| DecodeError::TooShort { actual, required };

        let mut r = ByteReader::new(bytes);
        if actual < MIN_HEADER_SIZE {
            return Err(too_short(MIN_HEADER_SIZE));
        }
        let raw_format = r.u16_le().map_err(|_oob| too_short(MIN_HEADER_SIZE))?;
        let format = PacketFormat::from_raw(raw_format)
            .filter(|f| self.supports(*f))
            .ok_or(DecodeError::UnsupportedVersion { format: raw_format })?;

        let header_size = format.header_size();
        if actual < header_size {
            return Err(too_short(header_size));
        }
        let raw_header =
            RawHeader::read(&mut r, format).map_err(|_oob| too_short(header_size))?;
        let packet_id = PacketId::for_format(raw_header.packet_id, format)?;

        let expected = packet_size(packet_id, format);
        let size_mismatch = || DecodeError::SizeMismatch {
            packet_id: packet_id.as_u8(),
            expected,
            actual,
        };
        if actual != expected {
            return Err(size_mismatch());
        }

        let header = raw_header.resolve(format, packet_id);
        let record = PacketRecord::read(header, &mut r).map_err(|_oob| size_mismatch())?;
        if r.remaining() != 0 {
            return Err(size_mismatch());
        }
        Ok(record)
    }
}
