//! Lobby info packet (id 9): players waiting in a multiplayer lobby.

use serde::Serialize;

use super::MAX_CARS;
use super::participants::NAME_LEN;
use crate::PacketFormat;
use crate::wire::{ByteReader, ByteWriter, OutOfBounds, WireLayout};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LobbyInfoData {
    pub ai_controlled: u8,
    /// 255 when no team is selected.
    pub team_id: u8,
    pub nationality: u8,
    /// Format 2023.
    pub platform: Option<u8>,
    pub name: String,
    pub car_number: u8,
    /// 0 not ready, 1 ready, 2 spectating.
    pub ready_status: u8,
}

impl WireLayout for LobbyInfoData {
    fn read(r: &mut ByteReader<'_>, format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            ai_controlled: r.u8()?,
            team_id: r.u8()?,
            nationality: r.u8()?,
            platform: format.is_2023_or_later().then(|| r.u8()).transpose()?,
            name: r.fixed_str::<NAME_LEN>()?,
            car_number: r.u8()?,
            ready_status: r.u8()?,
        })
    }

    fn write(&self, w: &mut ByteWriter, format: PacketFormat) {
        w.u8(self.ai_controlled);
        w.u8(self.team_id);
        w.u8(self.nationality);
        if format.is_2023_or_later() {
            w.u8(self.platform.unwrap_or_default());
        }
        w.fixed_str::<NAME_LEN>(&self.name);
        w.u8(self.car_number);
        w.u8(self.ready_status);
    }

    fn wire_size(format: PacketFormat) -> usize {
        if format.is_2023_or_later() { 54 } else { 53 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PacketLobbyInfoData {
    pub num_players: u8,
    pub lobby_players: [LobbyInfoData; MAX_CARS],
}

impl WireLayout for PacketLobbyInfoData {
    fn read(r: &mut ByteReader<'_>, format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            num_players: r.u8()?,
            lobby_players: r.layouts(format)?,
        })
    }

    fn write(&self, w: &mut ByteWriter, format: PacketFormat) {
        w.u8(self.num_players);
        w.layouts(&self.lobby_players, format);
    }

    fn wire_size(format: PacketFormat) -> usize {
        1 + MAX_CARS * LobbyInfoData::wire_size(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_platform_precedes_name_in_2023() -> TestResult {
        let player = LobbyInfoData {
            team_id: 255,
            platform: Some(1),
            name: "Player".to_owned(),
            ready_status: 1,
            ..LobbyInfoData::default()
        };
        let mut w = ByteWriter::new();
        player.write(&mut w, PacketFormat::Format2023);
        let raw = w.into_bytes();
        assert_eq!(raw.len(), 54);
        assert_eq!(raw.get(3).copied(), Some(1));
        assert_eq!(raw.get(4..10), Some(b"Player".as_slice()));
        assert_eq!(LobbyInfoData::read(&mut ByteReader::new(&raw), PacketFormat::Format2023)?, player);
        Ok(())
    }
}
