//! Packet format (protocol revision) and packet type identifiers.

use core::fmt;

use serde::Serialize;

use crate::DecodeError;

/// Size of the 2022 header, the smallest header of any supported format.
pub const MIN_HEADER_SIZE: usize = 24;

/// Value of the `m_packetFormat` header field.
///
/// Selects the header layout and every payload layout. Serialises as the
/// bare year number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "u16")]
#[repr(u16)]
pub enum PacketFormat {
    /// F1 22. 24-byte header, no `gameYear` / `overallFrameIdentifier`.
    Format2022 = 2022,
    /// F1 23. 29-byte header.
    Format2023 = 2023,
}

impl PacketFormat {
    /// Every format with a layout table, oldest first.
    pub const ALL: [PacketFormat; 2] = [PacketFormat::Format2022, PacketFormat::Format2023];

    pub const fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            2022 => Some(PacketFormat::Format2022),
            2023 => Some(PacketFormat::Format2023),
            _ => None,
        }
    }

    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Header length in bytes for this format.
    pub const fn header_size(self) -> usize {
        match self {
            PacketFormat::Format2022 => 24,
            PacketFormat::Format2023 => 29,
        }
    }

    /// Packet ids the game emits under this format.
    pub fn packet_ids(self) -> &'static [PacketId] {
        const IDS_2022: [PacketId; 12] = [
            PacketId::Motion,
            PacketId::Session,
            PacketId::LapData,
            PacketId::Event,
            PacketId::Participants,
            PacketId::CarSetups,
            PacketId::CarTelemetry,
            PacketId::CarStatus,
            PacketId::FinalClassification,
            PacketId::LobbyInfo,
            PacketId::CarDamage,
            PacketId::SessionHistory,
        ];
        match self {
            PacketFormat::Format2022 => &IDS_2022,
            PacketFormat::Format2023 => &PacketId::ALL,
        }
    }

    /// Whether fields introduced by F1 23 are on the wire.
    pub(crate) const fn is_2023_or_later(self) -> bool {
        matches!(self, PacketFormat::Format2023)
    }
}

impl From<PacketFormat> for u16 {
    fn from(format: PacketFormat) -> Self {
        format.as_u16()
    }
}

impl TryFrom<u16> for PacketFormat {
    type Error = DecodeError;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        PacketFormat::from_raw(raw).ok_or(DecodeError::UnsupportedVersion { format: raw })
    }
}

impl fmt::Display for PacketFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// Value of the `m_packetId` header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum PacketId {
    Motion = 0,
    Session = 1,
    LapData = 2,
    Event = 3,
    Participants = 4,
    CarSetups = 5,
    CarTelemetry = 6,
    CarStatus = 7,
    FinalClassification = 8,
    LobbyInfo = 9,
    CarDamage = 10,
    SessionHistory = 11,
    /// Format 2023 only.
    TyreSets = 12,
    /// Format 2023 only.
    MotionEx = 13,
}

impl PacketId {
    pub const ALL: [PacketId; 14] = [
        PacketId::Motion,
        PacketId::Session,
        PacketId::LapData,
        PacketId::Event,
        PacketId::Participants,
        PacketId::CarSetups,
        PacketId::CarTelemetry,
        PacketId::CarStatus,
        PacketId::FinalClassification,
        PacketId::LobbyInfo,
        PacketId::CarDamage,
        PacketId::SessionHistory,
        PacketId::TyreSets,
        PacketId::MotionEx,
    ];

    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(PacketId::Motion),
            1 => Some(PacketId::Session),
            2 => Some(PacketId::LapData),
            3 => Some(PacketId::Event),
            4 => Some(PacketId::Participants),
            5 => Some(PacketId::CarSetups),
            6 => Some(PacketId::CarTelemetry),
            7 => Some(PacketId::CarStatus),
            8 => Some(PacketId::FinalClassification),
            9 => Some(PacketId::LobbyInfo),
            10 => Some(PacketId::CarDamage),
            11 => Some(PacketId::SessionHistory),
            12 => Some(PacketId::TyreSets),
            13 => Some(PacketId::MotionEx),
            _ => None,
        }
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Resolve a raw id against the packet set of `format`.
    pub fn for_format(raw: u8, format: PacketFormat) -> Result<Self, DecodeError> {
        PacketId::from_raw(raw)
            .filter(|id| id.is_defined_for(format))
            .ok_or(DecodeError::UnknownPacketType {
                packet_id: raw,
                format: format.as_u16(),
            })
    }

    pub fn is_defined_for(self, format: PacketFormat) -> bool {
        format.packet_ids().contains(&self)
    }

    pub const fn name(self) -> &'static str {
        match self {
            PacketId::Motion => "Motion",
            PacketId::Session => "Session",
            PacketId::LapData => "LapData",
            PacketId::Event => "Event",
            PacketId::Participants => "Participants",
            PacketId::CarSetups => "CarSetups",
            PacketId::CarTelemetry => "CarTelemetry",
            PacketId::CarStatus => "CarStatus",
            PacketId::FinalClassification => "FinalClassification",
            PacketId::LobbyInfo => "LobbyInfo",
            PacketId::CarDamage => "CarDamage",
            PacketId::SessionHistory => "SessionHistory",
            PacketId::TyreSets => "TyreSets",
            PacketId::MotionEx => "MotionEx",
        }
    }
}

impl fmt::Display for PacketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_format_round_trips_through_u16() -> TestResult {
        for format in PacketFormat::ALL {
            assert_eq!(PacketFormat::try_from(format.as_u16())?, format);
        }
        Ok(())
    }

    #[test]
    fn test_unknown_format_is_unsupported_version() {
        assert_eq!(
            PacketFormat::try_from(2099u16),
            Err(DecodeError::UnsupportedVersion { format: 2099 })
        );
        assert_eq!(PacketFormat::from_raw(2021), None);
    }

    #[test]
    fn test_header_sizes() {
        assert_eq!(PacketFormat::Format2022.header_size(), MIN_HEADER_SIZE);
        assert_eq!(PacketFormat::Format2023.header_size(), 29);
    }

    #[test]
    fn test_packet_ids_are_dense_and_ordered() {
        for (expected, id) in PacketId::ALL.iter().enumerate() {
            assert_eq!(usize::from(id.as_u8()), expected);
            assert_eq!(PacketId::from_raw(id.as_u8()), Some(*id));
        }
        assert_eq!(PacketId::from_raw(14), None);
        assert_eq!(PacketId::from_raw(255), None);
    }

    #[test]
    fn test_tyre_sets_and_motion_ex_only_in_2023() {
        assert!(!PacketId::TyreSets.is_defined_for(PacketFormat::Format2022));
        assert!(!PacketId::MotionEx.is_defined_for(PacketFormat::Format2022));
        assert!(PacketId::TyreSets.is_defined_for(PacketFormat::Format2023));
        assert_eq!(
            PacketId::for_format(12, PacketFormat::Format2022),
            Err(DecodeError::UnknownPacketType {
                packet_id: 12,
                format: 2022
            })
        );
        assert_eq!(PacketFormat::Format2022.packet_ids().len(), 12);
        assert_eq!(PacketFormat::Format2023.packet_ids().len(), 14);
    }
}
