//! Extended motion packet (id 13, format 2023): player car only.

use serde::Serialize;

use crate::PacketFormat;
use crate::wire::{ByteReader, ByteWriter, OutOfBounds, WireLayout};

/// Wheel arrays are ordered RL, RR, FL, FR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PacketMotionExData {
    pub suspension_position: [f32; 4],
    pub suspension_velocity: [f32; 4],
    pub suspension_acceleration: [f32; 4],
    pub wheel_speed: [f32; 4],
    pub wheel_slip_ratio: [f32; 4],
    pub wheel_slip_angle: [f32; 4],
    pub wheel_lat_force: [f32; 4],
    pub wheel_long_force: [f32; 4],
    /// Height of the centre of gravity above ground, metres.
    pub height_of_cog_above_ground: f32,
    pub local_velocity_x: f32,
    pub local_velocity_y: f32,
    pub local_velocity_z: f32,
    pub angular_velocity_x: f32,
    pub angular_velocity_y: f32,
    pub angular_velocity_z: f32,
    pub angular_acceleration_x: f32,
    pub angular_acceleration_y: f32,
    pub angular_acceleration_z: f32,
    /// Radians.
    pub front_wheels_angle: f32,
    pub wheel_vert_force: [f32; 4],
}

impl WireLayout for PacketMotionExData {
    fn read(r: &mut ByteReader<'_>, _format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            suspension_position: r.f32_le_array()?,
            suspension_velocity: r.f32_le_array()?,
            suspension_acceleration: r.f32_le_array()?,
            wheel_speed: r.f32_le_array()?,
            wheel_slip_ratio: r.f32_le_array()?,
            wheel_slip_angle: r.f32_le_array()?,
            wheel_lat_force: r.f32_le_array()?,
            wheel_long_force: r.f32_le_array()?,
            height_of_cog_above_ground: r.f32_le()?,
            local_velocity_x: r.f32_le()?,
            local_velocity_y: r.f32_le()?,
            local_velocity_z: r.f32_le()?,
            angular_velocity_x: r.f32_le()?,
            angular_velocity_y: r.f32_le()?,
            angular_velocity_z: r.f32_le()?,
            angular_acceleration_x: r.f32_le()?,
            angular_acceleration_y: r.f32_le()?,
            angular_acceleration_z: r.f32_le()?,
            front_wheels_angle: r.f32_le()?,
            wheel_vert_force: r.f32_le_array()?,
        })
    }

    fn write(&self, w: &mut ByteWriter, _format: PacketFormat) {
        for wheels in [
            &self.suspension_position,
            &self.suspension_velocity,
            &self.suspension_acceleration,
            &self.wheel_speed,
            &self.wheel_slip_ratio,
            &self.wheel_slip_angle,
            &self.wheel_lat_force,
            &self.wheel_long_force,
        ] {
            w.f32_le_array(wheels);
        }
        w.f32_le_array(&[
            self.height_of_cog_above_ground,
            self.local_velocity_x,
            self.local_velocity_y,
            self.local_velocity_z,
            self.angular_velocity_x,
            self.angular_velocity_y,
            self.angular_velocity_z,
            self.angular_acceleration_x,
            self.angular_acceleration_y,
            self.angular_acceleration_z,
            self.front_wheels_angle,
        ]);
        w.f32_le_array(&self.wheel_vert_force);
    }

    fn wire_size(_format: PacketFormat) -> usize {
        (8 * 4 + 11 + 4) * 4
    }
}
