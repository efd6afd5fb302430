//! The header shared by every packet.

use serde::Serialize;

use crate::wire::{ByteReader, ByteWriter, OutOfBounds};
use crate::{PacketFormat, PacketId};

/// Parsed packet header.
///
/// `game_year` and `overall_frame_identifier` exist on the wire from format
/// 2023 onwards and are `None` for 2022 packets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PacketHeader {
    pub packet_format: PacketFormat,
    pub game_year: Option<u8>,
    pub game_major_version: u8,
    pub game_minor_version: u8,
    pub packet_version: u8,
    pub packet_id: PacketId,
    pub session_uid: u64,
    /// Seconds since the session started.
    pub session_time: f32,
    pub frame_identifier: u32,
    pub overall_frame_identifier: Option<u32>,
    pub player_car_index: u8,
    /// 255 when there is no second player.
    pub secondary_player_car_index: u8,
}

/// Header fields as read from the wire, before the packet id is resolved.
pub(crate) struct RawHeader {
    pub game_year: Option<u8>,
    pub game_major_version: u8,
    pub game_minor_version: u8,
    pub packet_version: u8,
    pub packet_id: u8,
    pub session_uid: u64,
    pub session_time: f32,
    pub frame_identifier: u32,
    pub overall_frame_identifier: Option<u32>,
    pub player_car_index: u8,
    pub secondary_player_car_index: u8,
}

impl RawHeader {
    /// Read the fields following the 2-byte packet format.
    pub(crate) fn read(r: &mut ByteReader<'_>, format: PacketFormat) -> Result<Self, OutOfBounds> {
        let game_year = format.is_2023_or_later().then(|| r.u8()).transpose()?;
        let game_major_version = r.u8()?;
        let game_minor_version = r.u8()?;
        let packet_version = r.u8()?;
        let packet_id = r.u8()?;
        let session_uid = r.u64_le()?;
        let session_time = r.f32_le()?;
        let frame_identifier = r.u32_le()?;
        let overall_frame_identifier = format.is_2023_or_later().then(|| r.u32_le()).transpose()?;
        Ok(Self {
            game_year,
            game_major_version,
            game_minor_version,
            packet_version,
            packet_id,
            session_uid,
            session_time,
            frame_identifier,
            overall_frame_identifier,
            player_car_index: r.u8()?,
            secondary_player_car_index: r.u8()?,
        })
    }

    pub(crate) fn resolve(self, packet_format: PacketFormat, packet_id: PacketId) -> PacketHeader {
        PacketHeader {
            packet_format,
            game_year: self.game_year,
            game_major_version: self.game_major_version,
            game_minor_version: self.game_minor_version,
            packet_version: self.packet_version,
            packet_id,
            session_uid: self.session_uid,
            session_time: self.session_time,
            frame_identifier: self.frame_identifier,
            overall_frame_identifier: self.overall_frame_identifier,
            player_car_index: self.player_car_index,
            secondary_player_car_index: self.secondary_player_car_index,
        }
    }
}

impl PacketHeader {
    /// Minimal header for building packets by hand.
    ///
    /// Version-specific fields are filled in (as zero) only when `format`
    /// carries them.
    pub fn new(packet_format: PacketFormat, packet_id: PacketId) -> Self {
        let is_2023 = packet_format.is_2023_or_later();
        Self {
            packet_format,
            game_year: is_2023.then_some(23),
            game_major_version: 1,
            game_minor_version: 0,
            packet_version: 1,
            packet_id,
            session_uid: 0,
            session_time: 0.0,
            frame_identifier: 0,
            overall_frame_identifier: is_2023.then_some(0),
            player_car_index: 0,
            secondary_player_car_index: 255,
        }
    }

    /// Encoded length, which depends only on the packet format.
    pub fn wire_size(&self) -> usize {
        self.packet_format.header_size()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(self.wire_size());
        self.write(&mut w);
        w.into_bytes()
    }

    pub fn write(&self, w: &mut ByteWriter) {
        let is_2023 = self.packet_format.is_2023_or_later();
        w.u16_le(self.packet_format.as_u16());
        if is_2023 {
            w.u8(self.game_year.unwrap_or_default());
        }
        w.u8(self.game_major_version);
        w.u8(self.game_minor_version);
        w.u8(self.packet_version);
        w.u8(self.packet_id.as_u8());
        w.u64_le(self.session_uid);
        w.f32_le(self.session_time);
        w.u32_le(self.frame_identifier);
        if is_2023 {
            w.u32_le(self.overall_frame_identifier.unwrap_or_default());
        }
        w.u8(self.player_car_index);
        w.u8(self.secondary_player_car_index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn roundtrip(header: &PacketHeader) -> Result<PacketHeader, OutOfBounds> {
        let mut w = ByteWriter::new();
        header.write(&mut w);
        let raw = w.into_bytes();
        assert_eq!(raw.len(), header.wire_size());
        let mut r = ByteReader::at(&raw, 2);
        let parsed = RawHeader::read(&mut r, header.packet_format)?;
        assert_eq!(r.remaining(), 0);
        Ok(parsed.resolve(header.packet_format, header.packet_id))
    }

    #[test]
    fn test_2022_header_layout() -> TestResult {
        let mut header = PacketHeader::new(PacketFormat::Format2022, PacketId::Session);
        header.session_uid = 0x1122_3344_5566_7788;
        header.frame_identifier = 4_242;

        let mut w = ByteWriter::new();
        header.write(&mut w);
        let raw = w.into_bytes();
        assert_eq!(raw.len(), 24);
        // packet id sits at offset 5 in the 2022 layout
        assert_eq!(raw.get(5).copied(), Some(1));
        assert_eq!(raw.get(6..14), Some(0x1122_3344_5566_7788u64.to_le_bytes().as_slice()));

        assert_eq!(roundtrip(&header)?, header);
        Ok(())
    }

    #[test]
    fn test_2023_header_carries_year_and_overall_frame() -> TestResult {
        let mut header = PacketHeader::new(PacketFormat::Format2023, PacketId::MotionEx);
        header.overall_frame_identifier = Some(99);
        header.player_car_index = 19;

        let mut w = ByteWriter::new();
        header.write(&mut w);
        let raw = w.into_bytes();
        assert_eq!(raw.len(), 29);
        assert_eq!(raw.get(2).copied(), Some(23));
        assert_eq!(raw.get(6).copied(), Some(13));

        let parsed = roundtrip(&header)?;
        assert_eq!(parsed.game_year, Some(23));
        assert_eq!(parsed.overall_frame_identifier, Some(99));
        assert_eq!(parsed.player_car_index, 19);
        Ok(())
    }

    #[test]
    fn test_2022_header_has_no_2023_fields() {
        let header = PacketHeader::new(PacketFormat::Format2022, PacketId::Motion);
        assert_eq!(header.game_year, None);
        assert_eq!(header.overall_frame_identifier, None);
    }
}
