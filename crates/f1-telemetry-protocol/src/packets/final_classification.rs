//! Final classification packet (id 8), sent once at the end of a race.

use serde::Serialize;

use super::MAX_CARS;
use crate::PacketFormat;
use crate::wire::{ByteReader, ByteWriter, OutOfBounds, WireLayout};

pub const MAX_TYRE_STINTS: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FinalClassificationData {
    pub position: u8,
    pub num_laps: u8,
    pub grid_position: u8,
    pub points: u8,
    pub num_pit_stops: u8,
    pub result_status: u8,
    pub best_lap_time_ms: u32,
    /// Seconds, without penalties.
    pub total_race_time: f64,
    pub penalties_time: u8,
    pub num_penalties: u8,
    pub num_tyre_stints: u8,
    pub tyre_stints_actual: [u8; MAX_TYRE_STINTS],
    pub tyre_stints_visual: [u8; MAX_TYRE_STINTS],
    pub tyre_stints_end_laps: [u8; MAX_TYRE_STINTS],
}

impl WireLayout for FinalClassificationData {
    fn read(r: &mut ByteReader<'_>, _format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            position: r.u8()?,
            num_laps: r.u8()?,
            grid_position: r.u8()?,
            points: r.u8()?,
            num_pit_stops: r.u8()?,
            result_status: r.u8()?,
            best_lap_time_ms: r.u32_le()?,
            total_race_time: r.f64_le()?,
            penalties_time: r.u8()?,
            num_penalties: r.u8()?,
            num_tyre_stints: r.u8()?,
            tyre_stints_actual: r.u8_array()?,
            tyre_stints_visual: r.u8_array()?,
            tyre_stints_end_laps: r.u8_array()?,
        })
    }

    fn write(&self, w: &mut ByteWriter, _format: PacketFormat) {
        w.u8(self.position);
        w.u8(self.num_laps);
        w.u8(self.grid_position);
        w.u8(self.points);
        w.u8(self.num_pit_stops);
        w.u8(self.result_status);
        w.u32_le(self.best_lap_time_ms);
        w.f64_le(self.total_race_time);
        w.u8(self.penalties_time);
        w.u8(self.num_penalties);
        w.u8(self.num_tyre_stints);
        w.bytes(&self.tyre_stints_actual);
        w.bytes(&self.tyre_stints_visual);
        w.bytes(&self.tyre_stints_end_laps);
    }

    fn wire_size(_format: PacketFormat) -> usize {
        45
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PacketFinalClassificationData {
    pub num_cars: u8,
    pub classification_data: [FinalClassificationData; MAX_CARS],
}

impl WireLayout for PacketFinalClassificationData {
    fn read(r: &mut ByteReader<'_>, format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            num_cars: r.u8()?,
            classification_data: r.layouts(format)?,
        })
    }

    fn write(&self, w: &mut ByteWriter, format: PacketFormat) {
        w.u8(self.num_cars);
        w.layouts(&self.classification_data, format);
    }

    fn wire_size(format: PacketFormat) -> usize {
        1 + MAX_CARS * FinalClassificationData::wire_size(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_total_race_time_is_f64() -> TestResult {
        let mut packet = PacketFinalClassificationData {
            num_cars: 20,
            ..PacketFinalClassificationData::default()
        };
        if let Some(winner) = packet.classification_data.first_mut() {
            winner.position = 1;
            winner.points = 25;
            winner.total_race_time = 5_423.375;
            winner.num_tyre_stints = 2;
            winner.tyre_stints_end_laps = [22, 57, 0, 0, 0, 0, 0, 0];
        }
        let mut w = ByteWriter::new();
        packet.write(&mut w, PacketFormat::Format2022);
        let raw = w.into_bytes();
        assert_eq!(raw.len(), 991);
        assert_eq!(raw.get(11..19), Some(5_423.375f64.to_le_bytes().as_slice()));

        let decoded =
            PacketFinalClassificationData::read(&mut ByteReader::new(&raw), PacketFormat::Format2022)?;
        assert_eq!(decoded, packet);
        Ok(())
    }
}
