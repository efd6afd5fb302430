//! Session history packet (id 11): lap and stint history for one car.
//!
//! The game cycles through the cars, sending one of these per car.

use serde::Serialize;

use super::final_classification::MAX_TYRE_STINTS;
use crate::PacketFormat;
use crate::wire::{ByteReader, ByteWriter, OutOfBounds, WireLayout};

pub const MAX_LAP_HISTORY: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LapHistoryData {
    pub lap_time_ms: u32,
    /// Millisecond part; the minutes parts exist from format 2023.
    pub sector1_time_ms: u16,
    pub sector1_time_minutes: Option<u8>,
    pub sector2_time_ms: u16,
    pub sector2_time_minutes: Option<u8>,
    pub sector3_time_ms: u16,
    pub sector3_time_minutes: Option<u8>,
    /// Bit 0 lap valid, bits 1..3 sectors 1..3 valid.
    pub lap_valid_bit_flags: u8,
}

impl LapHistoryData {
    pub fn is_lap_valid(&self) -> bool {
        self.lap_valid_bit_flags & 0x01 != 0
    }
}

impl WireLayout for LapHistoryData {
    fn read(r: &mut ByteReader<'_>, format: PacketFormat) -> Result<Self, OutOfBounds> {
        let is_2023 = format.is_2023_or_later();
        Ok(Self {
            lap_time_ms: r.u32_le()?,
            sector1_time_ms: r.u16_le()?,
            sector1_time_minutes: is_2023.then(|| r.u8()).transpose()?,
            sector2_time_ms: r.u16_le()?,
            sector2_time_minutes: is_2023.then(|| r.u8()).transpose()?,
            sector3_time_ms: r.u16_le()?,
            sector3_time_minutes: is_2023.then(|| r.u8()).transpose()?,
            lap_valid_bit_flags: r.u8()?,
        })
    }

    fn write(&self, w: &mut ByteWriter, format: PacketFormat) {
        let is_2023 = format.is_2023_or_later();
        w.u32_le(self.lap_time_ms);
        for (ms, minutes) in [
            (self.sector1_time_ms, self.sector1_time_minutes),
            (self.sector2_time_ms, self.sector2_time_minutes),
            (self.sector3_time_ms, self.sector3_time_minutes),
        ] {
            w.u16_le(ms);
            if is_2023 {
                w.u8(minutes.unwrap_or_default());
            }
        }
        w.u8(self.lap_valid_bit_flags);
    }

    fn wire_size(format: PacketFormat) -> usize {
        if format.is_2023_or_later() { 14 } else { 11 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TyreStintHistoryData {
    /// 255 for the current stint.
    pub end_lap: u8,
    pub tyre_actual_compound: u8,
    pub tyre_visual_compound: u8,
}

impl WireLayout for TyreStintHistoryData {
    fn read(r: &mut ByteReader<'_>, _format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            end_lap: r.u8()?,
            tyre_actual_compound: r.u8()?,
            tyre_visual_compound: r.u8()?,
        })
    }

    fn write(&self, w: &mut ByteWriter, _format: PacketFormat) {
        w.u8(self.end_lap);
        w.u8(self.tyre_actual_compound);
        w.u8(self.tyre_visual_compound);
    }

    fn wire_size(_format: PacketFormat) -> usize {
        3
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PacketSessionHistoryData {
    pub car_idx: u8,
    pub num_laps: u8,
    pub num_tyre_stints: u8,
    pub best_lap_time_lap_num: u8,
    pub best_sector1_lap_num: u8,
    pub best_sector2_lap_num: u8,
    pub best_sector3_lap_num: u8,
    /// Always exactly 100 entries; only the first `num_laps` are filled.
    pub lap_history_data: Vec<LapHistoryData>,
    pub tyre_stints_history_data: [TyreStintHistoryData; MAX_TYRE_STINTS],
}

impl Default for PacketSessionHistoryData {
    fn default() -> Self {
        Self {
            car_idx: 0,
            num_laps: 0,
            num_tyre_stints: 0,
            best_lap_time_lap_num: 0,
            best_sector1_lap_num: 0,
            best_sector2_lap_num: 0,
            best_sector3_lap_num: 0,
            lap_history_data: vec![LapHistoryData::default(); MAX_LAP_HISTORY],
            tyre_stints_history_data: [TyreStintHistoryData::default(); MAX_TYRE_STINTS],
        }
    }
}

impl PacketSessionHistoryData {
    /// Completed laps, skipping the unused tail of the history table.
    pub fn laps(&self) -> impl Iterator<Item = &LapHistoryData> {
        self.lap_history_data.iter().take(usize::from(self.num_laps))
    }
}

impl WireLayout for PacketSessionHistoryData {
    fn read(r: &mut ByteReader<'_>, format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            car_idx: r.u8()?,
            num_laps: r.u8()?,
            num_tyre_stints: r.u8()?,
            best_lap_time_lap_num: r.u8()?,
            best_sector1_lap_num: r.u8()?,
            best_sector2_lap_num: r.u8()?,
            best_sector3_lap_num: r.u8()?,
            lap_history_data: r.layout_vec(MAX_LAP_HISTORY, format)?,
            tyre_stints_history_data: r.layouts(format)?,
        })
    }

    fn write(&self, w: &mut ByteWriter, format: PacketFormat) {
        w.bytes(&[
            self.car_idx,
            self.num_laps,
            self.num_tyre_stints,
            self.best_lap_time_lap_num,
            self.best_sector1_lap_num,
            self.best_sector2_lap_num,
            self.best_sector3_lap_num,
        ]);
        let blank = LapHistoryData::default();
        for i in 0..MAX_LAP_HISTORY {
            self.lap_history_data
                .get(i)
                .unwrap_or(&blank)
                .write(w, format);
        }
        w.layouts(&self.tyre_stints_history_data, format);
    }

    fn wire_size(format: PacketFormat) -> usize {
        7 + MAX_LAP_HISTORY * LapHistoryData::wire_size(format)
            + MAX_TYRE_STINTS * TyreStintHistoryData::wire_size(format)
    }
}
