//! Motion packet (id 0): physics state of every car.

use serde::Serialize;

use super::MAX_CARS;
use crate::PacketFormat;
use crate::wire::{ByteReader, ByteWriter, OutOfBounds, WireLayout};

/// Per-car motion. Direction vectors are normalised and scaled to `i16`
/// (divide by 32767.0 for a unit vector).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CarMotionData {
    pub world_position_x: f32,
    pub world_position_y: f32,
    pub world_position_z: f32,
    pub world_velocity_x: f32,
    pub world_velocity_y: f32,
    pub world_velocity_z: f32,
    pub world_forward_dir_x: i16,
    pub world_forward_dir_y: i16,
    pub world_forward_dir_z: i16,
    pub world_right_dir_x: i16,
    pub world_right_dir_y: i16,
    pub world_right_dir_z: i16,
    pub g_force_lateral: f32,
    pub g_force_longitudinal: f32,
    pub g_force_vertical: f32,
    /// Radians.
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl WireLayout for CarMotionData {
    fn read(r: &mut ByteReader<'_>, _format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            world_position_x: r.f32_le()?,
            world_position_y: r.f32_le()?,
            world_position_z: r.f32_le()?,
            world_velocity_x: r.f32_le()?,
            world_velocity_y: r.f32_le()?,
            world_velocity_z: r.f32_le()?,
            world_forward_dir_x: r.i16_le()?,
            world_forward_dir_y: r.i16_le()?,
            world_forward_dir_z: r.i16_le()?,
            world_right_dir_x: r.i16_le()?,
            world_right_dir_y: r.i16_le()?,
            world_right_dir_z: r.i16_le()?,
            g_force_lateral: r.f32_le()?,
            g_force_longitudinal: r.f32_le()?,
            g_force_vertical: r.f32_le()?,
            yaw: r.f32_le()?,
            pitch: r.f32_le()?,
            roll: r.f32_le()?,
        })
    }

    fn write(&self, w: &mut ByteWriter, _format: PacketFormat) {
        w.f32_le(self.world_position_x);
        w.f32_le(self.world_position_y);
        w.f32_le(self.world_position_z);
        w.f32_le(self.world_velocity_x);
        w.f32_le(self.world_velocity_y);
        w.f32_le(self.world_velocity_z);
        w.i16_le(self.world_forward_dir_x);
        w.i16_le(self.world_forward_dir_y);
        w.i16_le(self.world_forward_dir_z);
        w.i16_le(self.world_right_dir_x);
        w.i16_le(self.world_right_dir_y);
        w.i16_le(self.world_right_dir_z);
        w.f32_le(self.g_force_lateral);
        w.f32_le(self.g_force_longitudinal);
        w.f32_le(self.g_force_vertical);
        w.f32_le(self.yaw);
        w.f32_le(self.pitch);
        w.f32_le(self.roll);
    }

    fn wire_size(_format: PacketFormat) -> usize {
        60
    }
}

/// Extra physics for the player car, appended to the 2022 motion packet.
///
/// Wheel arrays are ordered RL, RR, FL, FR. From 2023 these fields moved to
/// the separate motion-ex packet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlayerMotionData {
    pub suspension_position: [f32; 4],
    pub suspension_velocity: [f32; 4],
    pub suspension_acceleration: [f32; 4],
    pub wheel_speed: [f32; 4],
    pub wheel_slip: [f32; 4],
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
}

impl WireLayout for PlayerMotionData {
    fn read(r: &mut ByteReader<'_>, _format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            suspension_position: r.f32_le_array()?,
            suspension_velocity: r.f32_le_array()?,
            suspension_acceleration: r.f32_le_array()?,
            wheel_speed: r.f32_le_array()?,
            wheel_slip: r.f32_le_array()?,
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
        })
    }

    fn write(&self, w: &mut ByteWriter, _format: PacketFormat) {
        w.f32_le_array(&self.suspension_position);
        w.f32_le_array(&self.suspension_velocity);
        w.f32_le_array(&self.suspension_acceleration);
        w.f32_le_array(&self.wheel_speed);
        w.f32_le_array(&self.wheel_slip);
        w.f32_le(self.local_velocity_x);
        w.f32_le(self.local_velocity_y);
        w.f32_le(self.local_velocity_z);
        w.f32_le(self.angular_velocity_x);
        w.f32_le(self.angular_velocity_y);
        w.f32_le(self.angular_velocity_z);
        w.f32_le(self.angular_acceleration_x);
        w.f32_le(self.angular_acceleration_y);
        w.f32_le(self.angular_acceleration_z);
        w.f32_le(self.front_wheels_angle);
    }

    fn wire_size(_format: PacketFormat) -> usize {
        30 * 4
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PacketMotionData {
    pub car_motion_data: [CarMotionData; MAX_CARS],
    /// Present for format 2022 only.
    pub player: Option<PlayerMotionData>,
}

impl WireLayout for PacketMotionData {
    fn read(r: &mut ByteReader<'_>, format: PacketFormat) -> Result<Self, OutOfBounds> {
        let car_motion_data = r.layouts(format)?;
        let player = if format.is_2023_or_later() {
            None
        } else {
            Some(PlayerMotionData::read(r, format)?)
        };
        Ok(Self {
            car_motion_data,
            player,
        })
    }

    fn write(&self, w: &mut ByteWriter, format: PacketFormat) {
        w.layouts(&self.car_motion_data, format);
        if !format.is_2023_or_later() {
            self.player.unwrap_or_default().write(w, format);
        }
    }

    fn wire_size(format: PacketFormat) -> usize {
        let cars = MAX_CARS * CarMotionData::wire_size(format);
        if format.is_2023_or_later() {
            cars
        } else {
            cars + PlayerMotionData::wire_size(format)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_2022_motion_carries_player_extras() -> TestResult {
        let mut packet = PacketMotionData::default();
        if let Some(car) = packet.car_motion_data.get_mut(3) {
            car.world_position_x = -120.25;
            car.world_forward_dir_z = -32_767;
        }
        packet.player = Some(PlayerMotionData {
            wheel_speed: [80.0, 80.5, 81.0, 81.5],
            front_wheels_angle: 0.125,
            ..PlayerMotionData::default()
        });

        let mut w = ByteWriter::new();
        packet.write(&mut w, PacketFormat::Format2022);
        let raw = w.into_bytes();
        assert_eq!(raw.len(), 1440);

        let decoded = PacketMotionData::read(&mut ByteReader::new(&raw), PacketFormat::Format2022)?;
        assert_eq!(decoded, packet);
        Ok(())
    }

    #[test]
    fn test_2023_motion_has_no_player_block() -> TestResult {
        let raw = vec![0u8; PacketMotionData::wire_size(PacketFormat::Format2023)];
        let decoded = PacketMotionData::read(&mut ByteReader::new(&raw), PacketFormat::Format2023)?;
        assert_eq!(decoded.player, None);
        assert_eq!(raw.len(), 1320);
        Ok(())
    }
}
