//! Tyre sets packet (id 12, format 2023): tyre allocation for one car.

use serde::Serialize;

use crate::PacketFormat;
use crate::wire::{ByteReader, ByteWriter, OutOfBounds, WireLayout};

/// 13 dry plus 7 wet sets.
pub const MAX_TYRE_SETS: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TyreSetData {
    pub actual_tyre_compound: u8,
    pub visual_tyre_compound: u8,
    /// Percent.
    pub wear: u8,
    pub available: u8,
    pub recommended_session: u8,
    /// Laps left in this set.
    pub life_span: u8,
    pub usable_life: u8,
    /// Lap time delta to the fitted set, milliseconds.
    pub lap_delta_time: i16,
    pub fitted: u8,
}

impl WireLayout for TyreSetData {
    fn read(r: &mut ByteReader<'_>, _format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            actual_tyre_compound: r.u8()?,
            visual_tyre_compound: r.u8()?,
            wear: r.u8()?,
            available: r.u8()?,
            recommended_session: r.u8()?,
            life_span: r.u8()?,
            usable_life: r.u8()?,
            lap_delta_time: r.i16_le()?,
            fitted: r.u8()?,
        })
    }

    fn write(&self, w: &mut ByteWriter, _format: PacketFormat) {
        w.bytes(&[
            self.actual_tyre_compound,
            self.visual_tyre_compound,
            self.wear,
            self.available,
            self.recommended_session,
            self.life_span,
            self.usable_life,
        ]);
        w.i16_le(self.lap_delta_time);
        w.u8(self.fitted);
    }

    fn wire_size(_format: PacketFormat) -> usize {
        10
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PacketTyreSetsData {
    pub car_idx: u8,
    pub tyre_set_data: [TyreSetData; MAX_TYRE_SETS],
    /// Index into `tyre_set_data` of the fitted set.
    pub fitted_idx: u8,
}

impl PacketTyreSetsData {
    pub fn fitted(&self) -> Option<&TyreSetData> {
        self.tyre_set_data.get(usize::from(self.fitted_idx))
    }
}

impl WireLayout for PacketTyreSetsData {
    fn read(r: &mut ByteReader<'_>, format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            car_idx: r.u8()?,
            tyre_set_data: r.layouts(format)?,
            fitted_idx: r.u8()?,
        })
    }

    fn write(&self, w: &mut ByteWriter, format: PacketFormat) {
        w.u8(self.car_idx);
        w.layouts(&self.tyre_set_data, format);
        w.u8(self.fitted_idx);
    }

    fn wire_size(format: PacketFormat) -> usize {
        2 + MAX_TYRE_SETS * TyreSetData::wire_size(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_fitted_set_lookup() -> TestResult {
        let mut packet = PacketTyreSetsData {
            car_idx: 0,
            fitted_idx: 4,
            ..PacketTyreSetsData::default()
        };
        if let Some(set) = packet.tyre_set_data.get_mut(4) {
            set.visual_tyre_compound = 17;
            set.lap_delta_time = -350;
            set.fitted = 1;
        }
        let mut w = ByteWriter::new();
        packet.write(&mut w, PacketFormat::Format2023);
        let raw = w.into_bytes();
        assert_eq!(raw.len(), 202);

        let decoded = PacketTyreSetsData::read(&mut ByteReader::new(&raw), PacketFormat::Format2023)?;
        assert_eq!(decoded.fitted().map(|s| s.lap_delta_time), Some(-350));
        assert_eq!(decoded, packet);
        Ok(())
    }

    #[test]
    fn test_out_of_range_fitted_index() {
        let packet = PacketTyreSetsData {
            fitted_idx: 255,
            ..PacketTyreSetsData::default()
        };
        assert_eq!(packet.fitted(), None);
    }
}
