//! Payload layouts, one module per packet type.
//!
//! Every payload struct implements [`WireLayout`], and the per-packet sizes
//! below are computed from those impls rather than kept as a separate table.
//!
//! | Packet              | 2022 | 2023 |
//! |---------------------|------|------|
//! | Motion              | 1440 | 1320 |
//! | Session             |  608 |  615 |
//! | LapData             |  948 | 1102 |
//! | Event               |   16 |   16 |
//! | Participants        | 1233 | 1277 |
//! | CarSetups           | 1078 | 1078 |
//! | CarTelemetry        | 1323 | 1323 |
//! | CarStatus           | 1034 | 1210 |
//! | FinalClassification |  991 |  991 |
//! | LobbyInfo           | 1167 | 1189 |
//! | CarDamage           |  924 |  924 |
//! | SessionHistory      | 1131 | 1431 |
//! | TyreSets            |    - |  202 |
//! | MotionEx            |    - |  188 |
//!
//! Sizes exclude the header.

pub mod car_damage;
pub mod car_setups;
pub mod car_status;
pub mod car_telemetry;
pub mod event;
pub mod final_classification;
pub mod lap_data;
pub mod lobby_info;
pub mod motion;
pub mod motion_ex;
pub mod participants;
pub mod session;
pub mod session_history;
pub mod tyre_sets;

pub use car_damage::{CarDamageData, PacketCarDamageData};
pub use car_setups::{CarSetupData, PacketCarSetupData};
pub use car_status::{CarStatusData, PacketCarStatusData};
pub use car_telemetry::{CarTelemetryData, PacketCarTelemetryData};
pub use event::{EventDetails, PacketEventData};
pub use final_classification::{FinalClassificationData, PacketFinalClassificationData};
pub use lap_data::{LapData, PacketLapData};
pub use lobby_info::{LobbyInfoData, PacketLobbyInfoData};
pub use motion::{CarMotionData, PacketMotionData, PlayerMotionData};
pub use motion_ex::PacketMotionExData;
pub use participants::{PacketParticipantsData, ParticipantData};
pub use session::{MarshalZone, PacketSessionData, WeatherForecastSample};
pub use session_history::{LapHistoryData, PacketSessionHistoryData, TyreStintHistoryData};
pub use tyre_sets::{PacketTyreSetsData, TyreSetData};

use crate::wire::WireLayout;
use crate::{PacketFormat, PacketId};

/// Cars per per-car array.
pub const MAX_CARS: usize = 22;

/// Exact payload length of `id` under `format`, excluding the header.
///
/// Only meaningful when `id` is defined for `format`
/// (see [`PacketId::is_defined_for`]).
pub fn payload_size(id: PacketId, format: PacketFormat) -> usize {
    match id {
        PacketId::Motion => PacketMotionData::wire_size(format),
        PacketId::Session => PacketSessionData::wire_size(format),
        PacketId::LapData => PacketLapData::wire_size(format),
        PacketId::Event => PacketEventData::wire_size(format),
        PacketId::Participants => PacketParticipantsData::wire_size(format),
        PacketId::CarSetups => PacketCarSetupData::wire_size(format),
        PacketId::CarTelemetry => PacketCarTelemetryData::wire_size(format),
        PacketId::CarStatus => PacketCarStatusData::wire_size(format),
        PacketId::FinalClassification => PacketFinalClassificationData::wire_size(format),
        PacketId::LobbyInfo => PacketLobbyInfoData::wire_size(format),
        PacketId::CarDamage => PacketCarDamageData::wire_size(format),
        PacketId::SessionHistory => PacketSessionHistoryData::wire_size(format),
        PacketId::TyreSets => PacketTyreSetsData::wire_size(format),
        PacketId::MotionEx => PacketMotionExData::wire_size(format),
    }
}

/// Exact datagram length of `id` under `format`, header included.
pub fn packet_size(id: PacketId, format: PacketFormat) -> usize {
    format.header_size().saturating_add(payload_size(id, format))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZES_2022: [usize; 12] = [
        1464, 632, 972, 40, 1257, 1102, 1347, 1058, 1015, 1191, 948, 1155,
    ];
    const SIZES_2023: [usize; 14] = [
        1349, 644, 1131, 45, 1306, 1107, 1352, 1239, 1020, 1218, 953, 1460, 231, 217,
    ];

    #[test]
    fn test_packet_sizes_match_published_totals() {
        for (id, expected) in PacketFormat::Format2022.packet_ids().iter().zip(SIZES_2022) {
            assert_eq!(packet_size(*id, PacketFormat::Format2022), expected, "{id} 2022");
        }
        for (id, expected) in PacketFormat::Format2023.packet_ids().iter().zip(SIZES_2023) {
            assert_eq!(packet_size(*id, PacketFormat::Format2023), expected, "{id} 2023");
        }
    }

    #[test]
    fn test_event_payload_is_format_independent() {
        assert_eq!(payload_size(PacketId::Event, PacketFormat::Format2022), 16);
        assert_eq!(payload_size(PacketId::Event, PacketFormat::Format2023), 16);
    }
}
