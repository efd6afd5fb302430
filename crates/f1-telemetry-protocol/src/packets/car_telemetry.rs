//! Car telemetry packet (id 6): driver inputs, engine and tyre state.
//!
//! Wheel arrays are ordered RL, RR, FL, FR.

use serde::Serialize;

use super::MAX_CARS;
use crate::PacketFormat;
use crate::wire::{ByteReader, ByteWriter, OutOfBounds, WireLayout};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CarTelemetryData {
    /// km/h.
    pub speed: u16,
    /// 0.0 to 1.0.
    pub throttle: f32,
    /// -1.0 (full left) to 1.0 (full right).
    pub steer: f32,
    pub brake: f32,
    /// 0 to 100.
    pub clutch: u8,
    /// -1 reverse, 0 neutral, 1..8 forward.
    pub gear: i8,
    pub engine_rpm: u16,
    pub drs: u8,
    pub rev_lights_percent: u8,
    /// Bit 0 is the leftmost LED.
    pub rev_lights_bit_value: u16,
    /// Celsius.
    pub brakes_temperature: [u16; 4],
    pub tyres_surface_temperature: [u8; 4],
    pub tyres_inner_temperature: [u8; 4],
    pub engine_temperature: u16,
    /// PSI.
    pub tyres_pressure: [f32; 4],
    pub surface_type: [u8; 4],
}

impl WireLayout for CarTelemetryData {
    fn read(r: &mut ByteReader<'_>, _format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            speed: r.u16_le()?,
            throttle: r.f32_le()?,
            steer: r.f32_le()?,
            brake: r.f32_le()?,
            clutch: r.u8()?,
            gear: r.i8()?,
            engine_rpm: r.u16_le()?,
            drs: r.u8()?,
            rev_lights_percent: r.u8()?,
            rev_lights_bit_value: r.u16_le()?,
            brakes_temperature: r.u16_le_array()?,
            tyres_surface_temperature: r.u8_array()?,
            tyres_inner_temperature: r.u8_array()?,
            engine_temperature: r.u16_le()?,
            tyres_pressure: r.f32_le_array()?,
            surface_type: r.u8_array()?,
        })
    }

    fn write(&self, w: &mut ByteWriter, _format: PacketFormat) {
        w.u16_le(self.speed);
        w.f32_le(self.throttle);
        w.f32_le(self.steer);
        w.f32_le(self.brake);
        w.u8(self.clutch);
        w.i8(self.gear);
        w.u16_le(self.engine_rpm);
        w.u8(self.drs);
        w.u8(self.rev_lights_percent);
        w.u16_le(self.rev_lights_bit_value);
        w.u16_le_array(&self.brakes_temperature);
        w.bytes(&self.tyres_surface_temperature);
        w.bytes(&self.tyres_inner_temperature);
        w.u16_le(self.engine_temperature);
        w.f32_le_array(&self.tyres_pressure);
        w.bytes(&self.surface_type);
    }

    fn wire_size(_format: PacketFormat) -> usize {
        60
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PacketCarTelemetryData {
    pub car_telemetry_data: [CarTelemetryData; MAX_CARS],
    /// 255 when the MFD is closed.
    pub mfd_panel_index: u8,
    pub mfd_panel_index_secondary_player: u8,
    /// 0 when no gear is suggested.
    pub suggested_gear: i8,
}

impl WireLayout for PacketCarTelemetryData {
    fn read(r: &mut ByteReader<'_>, format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            car_telemetry_data: r.layouts(format)?,
            mfd_panel_index: r.u8()?,
            mfd_panel_index_secondary_player: r.u8()?,
            suggested_gear: r.i8()?,
        })
    }

    fn write(&self, w: &mut ByteWriter, format: PacketFormat) {
        w.layouts(&self.car_telemetry_data, format);
        w.u8(self.mfd_panel_index);
        w.u8(self.mfd_panel_index_secondary_player);
        w.i8(self.suggested_gear);
    }

    fn wire_size(format: PacketFormat) -> usize {
        MAX_CARS * CarTelemetryData::wire_size(format) + 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_player_entry_lands_at_its_offset() -> TestResult {
        let mut packet = PacketCarTelemetryData {
            suggested_gear: 5,
            ..PacketCarTelemetryData::default()
        };
        if let Some(car) = packet.car_telemetry_data.get_mut(1) {
            car.speed = 312;
            car.gear = 7;
            car.engine_rpm = 11_800;
            car.brakes_temperature = [510, 512, 640, 655];
            car.tyres_pressure = [21.5, 21.5, 23.0, 23.0];
        }
        let mut w = ByteWriter::new();
        packet.write(&mut w, PacketFormat::Format2022);
        let raw = w.into_bytes();
        assert_eq!(raw.len(), 1323);
        // second car starts 60 bytes in
        assert_eq!(raw.get(60..62), Some(312u16.to_le_bytes().as_slice()));

        let decoded = PacketCarTelemetryData::read(&mut ByteReader::new(&raw), PacketFormat::Format2022)?;
        assert_eq!(decoded, packet);
        assert_eq!(decoded.suggested_gear, 5);
        Ok(())
    }
}
