//! Car setups packet (id 5).

use serde::Serialize;

use super::MAX_CARS;
use crate::PacketFormat;
use crate::wire::{ByteReader, ByteWriter, OutOfBounds, WireLayout};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CarSetupData {
    pub front_wing: u8,
    pub rear_wing: u8,
    /// Differential adjustment on throttle, percent.
    pub on_throttle: u8,
    pub off_throttle: u8,
    pub front_camber: f32,
    pub rear_camber: f32,
    pub front_toe: f32,
    pub rear_toe: f32,
    pub front_suspension: u8,
    pub rear_suspension: u8,
    pub front_anti_roll_bar: u8,
    pub rear_anti_roll_bar: u8,
    pub front_suspension_height: u8,
    pub rear_suspension_height: u8,
    /// Percent.
    pub brake_pressure: u8,
    pub brake_bias: u8,
    /// PSI.
    pub rear_left_tyre_pressure: f32,
    pub rear_right_tyre_pressure: f32,
    pub front_left_tyre_pressure: f32,
    pub front_right_tyre_pressure: f32,
    pub ballast: u8,
    /// kg.
    pub fuel_load: f32,
}

impl WireLayout for CarSetupData {
    fn read(r: &mut ByteReader<'_>, _format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            front_wing: r.u8()?,
            rear_wing: r.u8()?,
            on_throttle: r.u8()?,
            off_throttle: r.u8()?,
            front_camber: r.f32_le()?,
            rear_camber: r.f32_le()?,
            front_toe: r.f32_le()?,
            rear_toe: r.f32_le()?,
            front_suspension: r.u8()?,
            rear_suspension: r.u8()?,
            front_anti_roll_bar: r.u8()?,
            rear_anti_roll_bar: r.u8()?,
            front_suspension_height: r.u8()?,
            rear_suspension_height: r.u8()?,
            brake_pressure: r.u8()?,
            brake_bias: r.u8()?,
            rear_left_tyre_pressure: r.f32_le()?,
            rear_right_tyre_pressure: r.f32_le()?,
            front_left_tyre_pressure: r.f32_le()?,
            front_right_tyre_pressure: r.f32_le()?,
            ballast: r.u8()?,
            fuel_load: r.f32_le()?,
        })
    }

    fn write(&self, w: &mut ByteWriter, _format: PacketFormat) {
        w.u8(self.front_wing);
        w.u8(self.rear_wing);
        w.u8(self.on_throttle);
        w.u8(self.off_throttle);
        w.f32_le(self.front_camber);
        w.f32_le(self.rear_camber);
        w.f32_le(self.front_toe);
        w.f32_le(self.rear_toe);
        w.u8(self.front_suspension);
        w.u8(self.rear_suspension);
        w.u8(self.front_anti_roll_bar);
        w.u8(self.rear_anti_roll_bar);
        w.u8(self.front_suspension_height);
        w.u8(self.rear_suspension_height);
        w.u8(self.brake_pressure);
        w.u8(self.brake_bias);
        w.f32_le(self.rear_left_tyre_pressure);
        w.f32_le(self.rear_right_tyre_pressure);
        w.f32_le(self.front_left_tyre_pressure);
        w.f32_le(self.front_right_tyre_pressure);
        w.u8(self.ballast);
        w.f32_le(self.fuel_load);
    }

    fn wire_size(_format: PacketFormat) -> usize {
        49
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PacketCarSetupData {
    pub car_setups: [CarSetupData; MAX_CARS],
}

impl WireLayout for PacketCarSetupData {
    fn read(r: &mut ByteReader<'_>, format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            car_setups: r.layouts(format)?,
        })
    }

    fn write(&self, w: &mut ByteWriter, format: PacketFormat) {
        w.layouts(&self.car_setups, format);
    }

    fn wire_size(format: PacketFormat) -> usize {
        MAX_CARS * CarSetupData::wire_size(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_fuel_load_is_last_field() -> TestResult {
        let setup = CarSetupData {
            front_wing: 30,
            brake_bias: 56,
            front_camber: -3.5,
            fuel_load: 105.0,
            ..CarSetupData::default()
        };
        let mut w = ByteWriter::new();
        setup.write(&mut w, PacketFormat::Format2022);
        let raw = w.into_bytes();
        assert_eq!(raw.len(), 49);
        assert_eq!(raw.get(45..49), Some(105.0f32.to_le_bytes().as_slice()));
        assert_eq!(CarSetupData::read(&mut ByteReader::new(&raw), PacketFormat::Format2022)?, setup);
        Ok(())
    }
}
