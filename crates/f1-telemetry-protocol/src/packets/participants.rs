//! Participants packet (id 4): who is driving each car.

use serde::Serialize;

use super::MAX_CARS;
use crate::PacketFormat;
use crate::wire::{ByteReader, ByteWriter, OutOfBounds, WireLayout};

pub const NAME_LEN: usize = 48;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParticipantData {
    pub ai_controlled: u8,
    /// 255 for network humans.
    pub driver_id: u8,
    pub network_id: u8,
    pub team_id: u8,
    pub my_team: u8,
    pub race_number: u8,
    pub nationality: u8,
    /// Up to 47 UTF-8 bytes; the wire field is NUL-terminated.
    pub name: String,
    /// 0 restricted, 1 public.
    pub your_telemetry: u8,
    /// Format 2023.
    pub show_online_names: Option<u8>,
    /// Format 2023. 1 Steam, 3 PlayStation, 4 Xbox, 6 Origin, 255 unknown.
    pub platform: Option<u8>,
}

impl WireLayout for ParticipantData {
    fn read(r: &mut ByteReader<'_>, format: PacketFormat) -> Result<Self, OutOfBounds> {
        let is_2023 = format.is_2023_or_later();
        Ok(Self {
            ai_controlled: r.u8()?,
            driver_id: r.u8()?,
            network_id: r.u8()?,
            team_id: r.u8()?,
            my_team: r.u8()?,
            race_number: r.u8()?,
            nationality: r.u8()?,
            name: r.fixed_str::<NAME_LEN>()?,
            your_telemetry: r.u8()?,
            show_online_names: is_2023.then(|| r.u8()).transpose()?,
            platform: is_2023.then(|| r.u8()).transpose()?,
        })
    }

    fn write(&self, w: &mut ByteWriter, format: PacketFormat) {
        w.u8(self.ai_controlled);
        w.u8(self.driver_id);
        w.u8(self.network_id);
        w.u8(self.team_id);
        w.u8(self.my_team);
        w.u8(self.race_number);
        w.u8(self.nationality);
        w.fixed_str::<NAME_LEN>(&self.name);
        w.u8(self.your_telemetry);
        if format.is_2023_or_later() {
            w.u8(self.show_online_names.unwrap_or_default());
            w.u8(self.platform.unwrap_or_default());
        }
    }

    fn wire_size(format: PacketFormat) -> usize {
        if format.is_2023_or_later() { 58 } else { 56 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PacketParticipantsData {
    pub num_active_cars: u8,
    pub participants: [ParticipantData; MAX_CARS],
}

impl WireLayout for PacketParticipantsData {
    fn read(r: &mut ByteReader<'_>, format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            num_active_cars: r.u8()?,
            participants: r.layouts(format)?,
        })
    }

    fn write(&self, w: &mut ByteWriter, format: PacketFormat) {
        w.u8(self.num_active_cars);
        w.layouts(&self.participants, format);
    }

    fn wire_size(format: PacketFormat) -> usize {
        1 + MAX_CARS * ParticipantData::wire_size(format)
    }
}
