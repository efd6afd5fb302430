//! Event packet (id 3): a 4-character code plus a 12-byte detail union.

use serde::Serialize;

use crate::PacketFormat;
use crate::wire::{ByteReader, ByteWriter, OutOfBounds, WireLayout};

const DETAIL_SIZE: usize = 12;

/// Event details keyed by the event code.
///
/// Codes without a payload carry only their code. A code this crate does not
/// know, or one the packet's format does not define (`RDFL` and `OVTK` before
/// 2023), decodes to [`EventDetails::Unknown`]; the detail bytes are consumed
/// either way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "code")]
pub enum EventDetails {
    #[serde(rename = "SSTA")]
    SessionStarted,
    #[serde(rename = "SEND")]
    SessionEnded,
    #[serde(rename = "FTLP")]
    FastestLap { vehicle_idx: u8, lap_time: f32 },
    #[serde(rename = "RTMT")]
    Retirement { vehicle_idx: u8 },
    #[serde(rename = "DRSE")]
    DrsEnabled,
    #[serde(rename = "DRSD")]
    DrsDisabled,
    #[serde(rename = "TMPT")]
    TeamMateInPits { vehicle_idx: u8 },
    #[serde(rename = "CHQF")]
    ChequeredFlag,
    #[serde(rename = "RCWN")]
    RaceWinner { vehicle_idx: u8 },
    #[serde(rename = "PENA")]
    Penalty {
        penalty_type: u8,
        infringement_type: u8,
        vehicle_idx: u8,
        other_vehicle_idx: u8,
        /// Seconds.
        time: u8,
        lap_num: u8,
        places_gained: u8,
    },
    #[serde(rename = "SPTP")]
    SpeedTrap {
        vehicle_idx: u8,
        /// km/h.
        speed: f32,
        is_overall_fastest_in_session: u8,
        is_driver_fastest_in_session: u8,
        fastest_vehicle_idx_in_session: u8,
        fastest_speed_in_session: f32,
    },
    #[serde(rename = "STLG")]
    StartLights { num_lights: u8 },
    #[serde(rename = "LGOT")]
    LightsOut,
    #[serde(rename = "DTSV")]
    DriveThroughServed { vehicle_idx: u8 },
    #[serde(rename = "SGSV")]
    StopGoServed { vehicle_idx: u8 },
    #[serde(rename = "FLBK")]
    Flashback {
        flashback_frame_identifier: u32,
        flashback_session_time: f32,
    },
    #[serde(rename = "BUTN")]
    Buttons { button_status: u32 },
    /// Format 2023.
    #[serde(rename = "RDFL")]
    RedFlag,
    /// Format 2023.
    #[serde(rename = "OVTK")]
    Overtake {
        overtaking_vehicle_idx: u8,
        being_overtaken_vehicle_idx: u8,
    },
    Unknown {
        #[serde(rename = "raw_code")]
        code: [u8; 4],
    },
}

impl EventDetails {
    /// The 4-byte wire code.
    pub fn code(&self) -> [u8; 4] {
        match self {
            EventDetails::SessionStarted => *b"SSTA",
            EventDetails::SessionEnded => *b"SEND",
            EventDetails::FastestLap { .. } => *b"FTLP",
            EventDetails::Retirement { .. } => *b"RTMT",
            EventDetails::DrsEnabled => *b"DRSE",
            EventDetails::DrsDisabled => *b"DRSD",
            EventDetails::TeamMateInPits { .. } => *b"TMPT",
            EventDetails::ChequeredFlag => *b"CHQF",
            EventDetails::RaceWinner { .. } => *b"RCWN",
            EventDetails::Penalty { .. } => *b"PENA",
            EventDetails::SpeedTrap { .. } => *b"SPTP",
            EventDetails::StartLights { .. } => *b"STLG",
            EventDetails::LightsOut => *b"LGOT",
            EventDetails::DriveThroughServed { .. } => *b"DTSV",
            EventDetails::StopGoServed { .. } => *b"SGSV",
            EventDetails::Flashback { .. } => *b"FLBK",
            EventDetails::Buttons { .. } => *b"BUTN",
            EventDetails::RedFlag => *b"RDFL",
            EventDetails::Overtake { .. } => *b"OVTK",
            EventDetails::Unknown { code } => *code,
        }
    }

    /// The code as text, lossy for non-ASCII bytes.
    pub fn code_str(&self) -> String {
        String::from_utf8_lossy(&self.code()).into_owned()
    }

    fn read_detail(
        code: [u8; 4],
        format: PacketFormat,
        d: &mut ByteReader<'_>,
    ) -> Result<Self, OutOfBounds> {
        let since_2023 = format.is_2023_or_later();
        let details = match &code {
            b"SSTA" => EventDetails::SessionStarted,
            b"SEND" => EventDetails::SessionEnded,
            b"FTLP" => EventDetails::FastestLap {
                vehicle_idx: d.u8()?,
                lap_time: d.f32_le()?,
            },
            b"RTMT" => EventDetails::Retirement {
                vehicle_idx: d.u8()?,
            },
            b"DRSE" => EventDetails::DrsEnabled,
            b"DRSD" => EventDetails::DrsDisabled,
            b"TMPT" => EventDetails::TeamMateInPits {
                vehicle_idx: d.u8()?,
            },
            b"CHQF" => EventDetails::ChequeredFlag,
            b"RCWN" => EventDetails::RaceWinner {
                vehicle_idx: d.u8()?,
            },
            b"PENA" => EventDetails::Penalty {
                penalty_type: d.u8()?,
                infringement_type: d.u8()?,
                vehicle_idx: d.u8()?,
                other_vehicle_idx: d.u8()?,
                time: d.u8()?,
                lap_num: d.u8()?,
                places_gained: d.u8()?,
            },
            b"SPTP" => EventDetails::SpeedTrap {
                vehicle_idx: d.u8()?,
                speed: d.f32_le()?,
                is_overall_fastest_in_session: d.u8()?,
                is_driver_fastest_in_session: d.u8()?,
                fastest_vehicle_idx_in_session: d.u8()?,
                fastest_speed_in_session: d.f32_le()?,
            },
            b"STLG" => EventDetails::StartLights {
                num_lights: d.u8()?,
            },
            b"LGOT" => EventDetails::LightsOut,
            b"DTSV" => EventDetails::DriveThroughServed {
                vehicle_idx: d.u8()?,
            },
            b"SGSV" => EventDetails::StopGoServed {
                vehicle_idx: d.u8()?,
            },
            b"FLBK" => EventDetails::Flashback {
                flashback_frame_identifier: d.u32_le()?,
                flashback_session_time: d.f32_le()?,
            },
            b"BUTN" => EventDetails::Buttons {
                button_status: d.u32_le()?,
            },
            b"RDFL" if since_2023 => EventDetails::RedFlag,
            b"OVTK" if since_2023 => EventDetails::Overtake {
                overtaking_vehicle_idx: d.u8()?,
                being_overtaken_vehicle_idx: d.u8()?,
            },
            _ => EventDetails::Unknown { code },
        };
        Ok(details)
    }

    fn write_detail(&self, d: &mut ByteWriter) {
        match *self {
            EventDetails::FastestLap {
                vehicle_idx,
                lap_time,
            } => {
                d.u8(vehicle_idx);
                d.f32_le(lap_time);
            }
            EventDetails::Retirement { vehicle_idx }
            | EventDetails::TeamMateInPits { vehicle_idx }
            | EventDetails::RaceWinner { vehicle_idx }
            | EventDetails::DriveThroughServed { vehicle_idx }
            | EventDetails::StopGoServed { vehicle_idx } => d.u8(vehicle_idx),
            EventDetails::Penalty {
                penalty_type,
                infringement_type,
                vehicle_idx,
                other_vehicle_idx,
                time,
                lap_num,
                places_gained,
            } => d.bytes(&[
                penalty_type,
                infringement_type,
                vehicle_idx,
                other_vehicle_idx,
                time,
                lap_num,
                places_gained,
            ]),
            EventDetails::SpeedTrap {
                vehicle_idx,
                speed,
                is_overall_fastest_in_session,
                is_driver_fastest_in_session,
                fastest_vehicle_idx_in_session,
                fastest_speed_in_session,
            } => {
                d.u8(vehicle_idx);
                d.f32_le(speed);
                d.u8(is_overall_fastest_in_session);
                d.u8(is_driver_fastest_in_session);
                d.u8(fastest_vehicle_idx_in_session);
                d.f32_le(fastest_speed_in_session);
            }
            EventDetails::StartLights { num_lights } => d.u8(num_lights),
            EventDetails::Flashback {
                flashback_frame_identifier,
                flashback_session_time,
            } => {
                d.u32_le(flashback_frame_identifier);
                d.f32_le(flashback_session_time);
            }
            EventDetails::Buttons { button_status } => d.u32_le(button_status),
            EventDetails::Overtake {
                overtaking_vehicle_idx,
                being_overtaken_vehicle_idx,
            } => {
                d.u8(overtaking_vehicle_idx);
                d.u8(being_overtaken_vehicle_idx);
            }
            EventDetails::SessionStarted
            | EventDetails::SessionEnded
            | EventDetails::DrsEnabled
            | EventDetails::DrsDisabled
            | EventDetails::ChequeredFlag
            | EventDetails::LightsOut
            | EventDetails::RedFlag
            | EventDetails::Unknown { .. } => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PacketEventData {
    pub details: EventDetails,
}

impl WireLayout for PacketEventData {
    fn read(r: &mut ByteReader<'_>, format: PacketFormat) -> Result<Self, OutOfBounds> {
        let code = r.u8_array::<4>()?;
        let detail = r.u8_array::<DETAIL_SIZE>()?;
        let details = EventDetails::read_detail(code, format, &mut ByteReader::new(&detail))?;
        Ok(Self { details })
    }

    fn write(&self, w: &mut ByteWriter, _format: PacketFormat) {
        w.bytes(&self.details.code());
        let mut detail = ByteWriter::with_capacity(DETAIL_SIZE);
        self.details.write_detail(&mut detail);
        let mut union = [0u8; DETAIL_SIZE];
        for (dst, src) in union.iter_mut().zip(detail.into_bytes()) {
            *dst = src;
        }
        w.bytes(&union);
    }

    fn wire_size(_format: PacketFormat) -> usize {
        4 + DETAIL_SIZE
    }
}
