//! Car damage packet (id 10).

use serde::Serialize;

use super::MAX_CARS;
use crate::PacketFormat;
use crate::wire::{ByteReader, ByteWriter, OutOfBounds, WireLayout};

/// Damage and wear per car. Percentages unless noted; wheel arrays are
/// ordered RL, RR, FL, FR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CarDamageData {
    pub tyres_wear: [f32; 4],
    pub tyres_damage: [u8; 4],
    pub brakes_damage: [u8; 4],
    pub front_left_wing_damage: u8,
    pub front_right_wing_damage: u8,
    pub rear_wing_damage: u8,
    pub floor_damage: u8,
    pub diffuser_damage: u8,
    pub sidepod_damage: u8,
    /// 0 ok, 1 fault.
    pub drs_fault: u8,
    pub ers_fault: u8,
    pub gear_box_damage: u8,
    pub engine_damage: u8,
    pub engine_mguh_wear: u8,
    pub engine_es_wear: u8,
    pub engine_ce_wear: u8,
    pub engine_ice_wear: u8,
    pub engine_mguk_wear: u8,
    pub engine_tc_wear: u8,
    pub engine_blown: u8,
    pub engine_seized: u8,
}

impl WireLayout for CarDamageData {
    fn read(r: &mut ByteReader<'_>, _format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            tyres_wear: r.f32_le_array()?,
            tyres_damage: r.u8_array()?,
            brakes_damage: r.u8_array()?,
            front_left_wing_damage: r.u8()?,
            front_right_wing_damage: r.u8()?,
            rear_wing_damage: r.u8()?,
            floor_damage: r.u8()?,
            diffuser_damage: r.u8()?,
            sidepod_damage: r.u8()?,
            drs_fault: r.u8()?,
            ers_fault: r.u8()?,
            gear_box_damage: r.u8()?,
            engine_damage: r.u8()?,
            engine_mguh_wear: r.u8()?,
            engine_es_wear: r.u8()?,
            engine_ce_wear: r.u8()?,
            engine_ice_wear: r.u8()?,
            engine_mguk_wear: r.u8()?,
            engine_tc_wear: r.u8()?,
            engine_blown: r.u8()?,
            engine_seized: r.u8()?,
        })
    }

    fn write(&self, w: &mut ByteWriter, _format: PacketFormat) {
        w.f32_le_array(&self.tyres_wear);
        w.bytes(&self.tyres_damage);
        w.bytes(&self.brakes_damage);
        w.bytes(&[
            self.front_left_wing_damage,
            self.front_right_wing_damage,
            self.rear_wing_damage,
            self.floor_damage,
            self.diffuser_damage,
            self.sidepod_damage,
            self.drs_fault,
            self.ers_fault,
            self.gear_box_damage,
            self.engine_damage,
            self.engine_mguh_wear,
            self.engine_es_wear,
            self.engine_ce_wear,
            self.engine_ice_wear,
            self.engine_mguk_wear,
            self.engine_tc_wear,
            self.engine_blown,
            self.engine_seized,
        ]);
    }

    fn wire_size(_format: PacketFormat) -> usize {
        42
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PacketCarDamageData {
    pub car_damage_data: [CarDamageData; MAX_CARS],
}

impl WireLayout for PacketCarDamageData {
    fn read(r: &mut ByteReader<'_>, format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            car_damage_data: r.layouts(format)?,
        })
    }

    fn write(&self, w: &mut ByteWriter, format: PacketFormat) {
        w.layouts(&self.car_damage_data, format);
    }

    fn wire_size(format: PacketFormat) -> usize {
        MAX_CARS * CarDamageData::wire_size(format)
    }
}
