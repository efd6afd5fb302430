//! Car status packet (id 7): fuel, ERS, tyres and assists per car.

use serde::Serialize;

use super::MAX_CARS;
use crate::PacketFormat;
use crate::wire::{ByteReader, ByteWriter, OutOfBounds, WireLayout};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CarStatusData {
    /// 0 off, 1 medium, 2 full.
    pub traction_control: u8,
    pub anti_lock_brakes: u8,
    /// 0 lean, 1 standard, 2 rich, 3 max.
    pub fuel_mix: u8,
    pub front_brake_bias: u8,
    pub pit_limiter_status: u8,
    /// kg.
    pub fuel_in_tank: f32,
    pub fuel_capacity: f32,
    /// Value shown on the MFD.
    pub fuel_remaining_laps: f32,
    pub max_rpm: u16,
    pub idle_rpm: u16,
    pub max_gears: u8,
    pub drs_allowed: u8,
    /// Metres until DRS can be used, 0 when unavailable.
    pub drs_activation_distance: u16,
    pub actual_tyre_compound: u8,
    pub visual_tyre_compound: u8,
    pub tyres_age_laps: u8,
    /// -1 invalid/unknown, 0 none, 1 green, 2 blue, 3 yellow.
    pub vehicle_fia_flags: i8,
    /// Format 2023. Watts.
    pub engine_power_ice: Option<f32>,
    /// Format 2023. Watts.
    pub engine_power_mguk: Option<f32>,
    /// Joules.
    pub ers_store_energy: f32,
    pub ers_deploy_mode: u8,
    pub ers_harvested_this_lap_mguk: f32,
    pub ers_harvested_this_lap_mguh: f32,
    pub ers_deployed_this_lap: f32,
    pub network_paused: u8,
}

impl WireLayout for CarStatusData {
    fn read(r: &mut ByteReader<'_>, format: PacketFormat) -> Result<Self, OutOfBounds> {
        let is_2023 = format.is_2023_or_later();
        Ok(Self {
            traction_control: r.u8()?,
            anti_lock_brakes: r.u8()?,
            fuel_mix: r.u8()?,
            front_brake_bias: r.u8()?,
            pit_limiter_status: r.u8()?,
            fuel_in_tank: r.f32_le()?,
            fuel_capacity: r.f32_le()?,
            fuel_remaining_laps: r.f32_le()?,
            max_rpm: r.u16_le()?,
            idle_rpm: r.u16_le()?,
            max_gears: r.u8()?,
            drs_allowed: r.u8()?,
            drs_activation_distance: r.u16_le()?,
            actual_tyre_compound: r.u8()?,
            visual_tyre_compound: r.u8()?,
            tyres_age_laps: r.u8()?,
            vehicle_fia_flags: r.i8()?,
            engine_power_ice: is_2023.then(|| r.f32_le()).transpose()?,
            engine_power_mguk: is_2023.then(|| r.f32_le()).transpose()?,
            ers_store_energy: r.f32_le()?,
            ers_deploy_mode: r.u8()?,
            ers_harvested_this_lap_mguk: r.f32_le()?,
            ers_harvested_this_lap_mguh: r.f32_le()?,
            ers_deployed_this_lap: r.f32_le()?,
            network_paused: r.u8()?,
        })
    }

    fn write(&self, w: &mut ByteWriter, format: PacketFormat) {
        w.u8(self.traction_control);
        w.u8(self.anti_lock_brakes);
        w.u8(self.fuel_mix);
        w.u8(self.front_brake_bias);
        w.u8(self.pit_limiter_status);
        w.f32_le(self.fuel_in_tank);
        w.f32_le(self.fuel_capacity);
        w.f32_le(self.fuel_remaining_laps);
        w.u16_le(self.max_rpm);
        w.u16_le(self.idle_rpm);
        w.u8(self.max_gears);
        w.u8(self.drs_allowed);
        w.u16_le(self.drs_activation_distance);
        w.u8(self.actual_tyre_compound);
        w.u8(self.visual_tyre_compound);
        w.u8(self.tyres_age_laps);
        w.i8(self.vehicle_fia_flags);
        if format.is_2023_or_later() {
            w.f32_le(self.engine_power_ice.unwrap_or_default());
            w.f32_le(self.engine_power_mguk.unwrap_or_default());
        }
        w.f32_le(self.ers_store_energy);
        w.u8(self.ers_deploy_mode);
        w.f32_le(self.ers_harvested_this_lap_mguk);
        w.f32_le(self.ers_harvested_this_lap_mguh);
        w.f32_le(self.ers_deployed_this_lap);
        w.u8(self.network_paused);
    }

    fn wire_size(format: PacketFormat) -> usize {
        if format.is_2023_or_later() { 55 } else { 47 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PacketCarStatusData {
    pub car_status_data: [CarStatusData; MAX_CARS],
}

impl WireLayout for PacketCarStatusData {
    fn read(r: &mut ByteReader<'_>, format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            car_status_data: r.layouts(format)?,
        })
    }

    fn write(&self, w: &mut ByteWriter, format: PacketFormat) {
        w.layouts(&self.car_status_data, format);
    }

    fn wire_size(format: PacketFormat) -> usize {
        MAX_CARS * CarStatusData::wire_size(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_engine_power_sits_between_flags_and_ers_in_2023() -> TestResult {
        let status = CarStatusData {
            vehicle_fia_flags: 3,
            engine_power_ice: Some(560_000.0),
            engine_power_mguk: Some(120_000.0),
            ers_store_energy: 4_000_000.0,
            ..CarStatusData::default()
        };
        let mut w = ByteWriter::new();
        status.write(&mut w, PacketFormat::Format2023);
        let raw = w.into_bytes();
        assert_eq!(raw.len(), 55);
        assert_eq!(raw.get(29..33), Some(560_000.0f32.to_le_bytes().as_slice()));
        assert_eq!(raw.get(37..41), Some(4_000_000.0f32.to_le_bytes().as_slice()));
        assert_eq!(CarStatusData::read(&mut ByteReader::new(&raw), PacketFormat::Format2023)?, status);
        Ok(())
    }

    #[test]
    fn test_2022_status_has_no_engine_power() -> TestResult {
        let raw = [0u8; 47];
        let status = CarStatusData::read(&mut ByteReader::new(&raw), PacketFormat::Format2022)?;
        assert_eq!(status.engine_power_ice, None);
        assert_eq!(status.engine_power_mguk, None);
        Ok(())
    }
}
