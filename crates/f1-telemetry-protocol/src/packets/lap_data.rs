//! Lap data packet (id 2): timing and race state for every car.

use serde::Serialize;

use super::MAX_CARS;
use crate::PacketFormat;
use crate::wire::{ByteReader, ByteWriter, OutOfBounds, WireLayout};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LapData {
    pub last_lap_time_ms: u32,
    pub current_lap_time_ms: u32,
    /// Millisecond part of sector 1; minutes are in `sector1_time_minutes`
    /// from format 2023.
    pub sector1_time_ms: u16,
    pub sector1_time_minutes: Option<u8>,
    pub sector2_time_ms: u16,
    pub sector2_time_minutes: Option<u8>,
    pub delta_to_car_in_front_ms: Option<u16>,
    pub delta_to_race_leader_ms: Option<u16>,
    /// Metres around the current lap; negative before crossing the line.
    pub lap_distance: f32,
    pub total_distance: f32,
    /// Seconds.
    pub safety_car_delta: f32,
    pub car_position: u8,
    pub current_lap_num: u8,
    /// 0 none, 1 pitting, 2 in pit area.
    pub pit_status: u8,
    pub num_pit_stops: u8,
    /// 0 = sector 1.
    pub sector: u8,
    pub current_lap_invalid: u8,
    /// Accumulated time penalties, seconds.
    pub penalties: u8,
    /// Total warnings (`m_warnings` in 2022, `m_totalWarnings` in 2023).
    pub warnings: u8,
    pub corner_cutting_warnings: Option<u8>,
    pub num_unserved_drive_through_pens: u8,
    pub num_unserved_stop_go_pens: u8,
    pub grid_position: u8,
    /// 0 garage, 1 flying lap, 2 in lap, 3 out lap, 4 on track.
    pub driver_status: u8,
    /// 0 invalid, 1 inactive, 2 active, 3 finished, 4 dnf, 5 dsq,
    /// 6 not classified, 7 retired.
    pub result_status: u8,
    pub pit_lane_timer_active: u8,
    pub pit_lane_time_in_lane_ms: u16,
    pub pit_stop_timer_ms: u16,
    pub pit_stop_should_serve_pen: u8,
}

impl WireLayout for LapData {
    fn read(r: &mut ByteReader<'_>, format: PacketFormat) -> Result<Self, OutOfBounds> {
        let is_2023 = format.is_2023_or_later();
        Ok(Self {
            last_lap_time_ms: r.u32_le()?,
            current_lap_time_ms: r.u32_le()?,
            sector1_time_ms: r.u16_le()?,
            sector1_time_minutes: is_2023.then(|| r.u8()).transpose()?,
            sector2_time_ms: r.u16_le()?,
            sector2_time_minutes: is_2023.then(|| r.u8()).transpose()?,
            delta_to_car_in_front_ms: is_2023.then(|| r.u16_le()).transpose()?,
            delta_to_race_leader_ms: is_2023.then(|| r.u16_le()).transpose()?,
            lap_distance: r.f32_le()?,
            total_distance: r.f32_le()?,
            safety_car_delta: r.f32_le()?,
            car_position: r.u8()?,
            current_lap_num: r.u8()?,
            pit_status: r.u8()?,
            num_pit_stops: r.u8()?,
            sector: r.u8()?,
            current_lap_invalid: r.u8()?,
            penalties: r.u8()?,
            warnings: r.u8()?,
            corner_cutting_warnings: is_2023.then(|| r.u8()).transpose()?,
            num_unserved_drive_through_pens: r.u8()?,
            num_unserved_stop_go_pens: r.u8()?,
            grid_position: r.u8()?,
            driver_status: r.u8()?,
            result_status: r.u8()?,
            pit_lane_timer_active: r.u8()?,
            pit_lane_time_in_lane_ms: r.u16_le()?,
            pit_stop_timer_ms: r.u16_le()?,
            pit_stop_should_serve_pen: r.u8()?,
        })
    }

    fn write(&self, w: &mut ByteWriter, format: PacketFormat) {
        let is_2023 = format.is_2023_or_later();
        w.u32_le(self.last_lap_time_ms);
        w.u32_le(self.current_lap_time_ms);
        w.u16_le(self.sector1_time_ms);
        if is_2023 {
            w.u8(self.sector1_time_minutes.unwrap_or_default());
        }
        w.u16_le(self.sector2_time_ms);
        if is_2023 {
            w.u8(self.sector2_time_minutes.unwrap_or_default());
            w.u16_le(self.delta_to_car_in_front_ms.unwrap_or_default());
            w.u16_le(self.delta_to_race_leader_ms.unwrap_or_default());
        }
        w.f32_le(self.lap_distance);
        w.f32_le(self.total_distance);
        w.f32_le(self.safety_car_delta);
        w.u8(self.car_position);
        w.u8(self.current_lap_num);
        w.u8(self.pit_status);
        w.u8(self.num_pit_stops);
        w.u8(self.sector);
        w.u8(self.current_lap_invalid);
        w.u8(self.penalties);
        w.u8(self.warnings);
        if is_2023 {
            w.u8(self.corner_cutting_warnings.unwrap_or_default());
        }
        w.u8(self.num_unserved_drive_through_pens);
        w.u8(self.num_unserved_stop_go_pens);
        w.u8(self.grid_position);
        w.u8(self.driver_status);
        w.u8(self.result_status);
        w.u8(self.pit_lane_timer_active);
        w.u16_le(self.pit_lane_time_in_lane_ms);
        w.u16_le(self.pit_stop_timer_ms);
        w.u8(self.pit_stop_should_serve_pen);
    }

    fn wire_size(format: PacketFormat) -> usize {
        if format.is_2023_or_later() { 50 } else { 43 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PacketLapData {
    pub lap_data: [LapData; MAX_CARS],
    /// 255 when not in time trial.
    pub time_trial_pb_car_idx: u8,
    pub time_trial_rival_car_idx: u8,
}

impl WireLayout for PacketLapData {
    fn read(r: &mut ByteReader<'_>, format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            lap_data: r.layouts(format)?,
            time_trial_pb_car_idx: r.u8()?,
            time_trial_rival_car_idx: r.u8()?,
        })
    }

    fn write(&self, w: &mut ByteWriter, format: PacketFormat) {
        w.layouts(&self.lap_data, format);
        w.u8(self.time_trial_pb_car_idx);
        w.u8(self.time_trial_rival_car_idx);
    }

    fn wire_size(format: PacketFormat) -> usize {
        MAX_CARS * LapData::wire_size(format) + 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn sample(format: PacketFormat) -> LapData {
        let is_2023 = format.is_2023_or_later();
        LapData {
            last_lap_time_ms: 92_345,
            current_lap_time_ms: 31_002,
            sector1_time_ms: 28_411,
            sector1_time_minutes: is_2023.then_some(0),
            sector2_time_ms: 1_250,
            sector2_time_minutes: is_2023.then_some(1),
            delta_to_car_in_front_ms: is_2023.then_some(812),
            delta_to_race_leader_ms: is_2023.then_some(4_390),
            lap_distance: 1_204.5,
            car_position: 4,
            warnings: 2,
            corner_cutting_warnings: is_2023.then_some(1),
            pit_stop_timer_ms: 2_400,
            ..LapData::default()
        }
    }

    #[test]
    fn test_lap_data_round_trips_in_both_formats() -> TestResult {
        for format in PacketFormat::ALL {
            let entry = sample(format);
            let mut w = ByteWriter::new();
            entry.write(&mut w, format);
            let raw = w.into_bytes();
            assert_eq!(raw.len(), LapData::wire_size(format));
            assert_eq!(LapData::read(&mut ByteReader::new(&raw), format)?, entry);
        }
        Ok(())
    }

    #[test]
    fn test_2022_drops_2023_only_fields() -> TestResult {
        let entry = sample(PacketFormat::Format2023);
        let mut w = ByteWriter::new();
        entry.write(&mut w, PacketFormat::Format2022);
        let raw = w.into_bytes();
        assert_eq!(raw.len(), 43);

        let decoded = LapData::read(&mut ByteReader::new(&raw), PacketFormat::Format2022)?;
        assert_eq!(decoded.delta_to_car_in_front_ms, None);
        assert_eq!(decoded.corner_cutting_warnings, None);
        assert_eq!(decoded.warnings, 2);
        Ok(())
    }
}
