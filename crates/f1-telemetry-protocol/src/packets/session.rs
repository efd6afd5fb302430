//! Session packet (id 1): track, weather and rules of the running session.

use serde::Serialize;

use crate::PacketFormat;
use crate::wire::{ByteReader, ByteWriter, OutOfBounds, WireLayout};

pub const MAX_MARSHAL_ZONES: usize = 21;
pub const MAX_WEATHER_FORECAST_SAMPLES: usize = 56;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MarshalZone {
    /// Fraction (0..1) of the way through the lap the zone starts.
    pub zone_start: f32,
    /// -1 invalid/unknown, 0 none, 1 green, 2 blue, 3 yellow, 4 red.
    pub zone_flag: i8,
}

impl WireLayout for MarshalZone {
    fn read(r: &mut ByteReader<'_>, _format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            zone_start: r.f32_le()?,
            zone_flag: r.i8()?,
        })
    }

    fn write(&self, w: &mut ByteWriter, _format: PacketFormat) {
        w.f32_le(self.zone_start);
        w.i8(self.zone_flag);
    }

    fn wire_size(_format: PacketFormat) -> usize {
        5
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WeatherForecastSample {
    pub session_type: u8,
    /// Minutes into the session.
    pub time_offset: u8,
    pub weather: u8,
    pub track_temperature: i8,
    /// 0 up, 1 down, 2 no change.
    pub track_temperature_change: i8,
    pub air_temperature: i8,
    pub air_temperature_change: i8,
    pub rain_percentage: u8,
}

impl WireLayout for WeatherForecastSample {
    fn read(r: &mut ByteReader<'_>, _format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            session_type: r.u8()?,
            time_offset: r.u8()?,
            weather: r.u8()?,
            track_temperature: r.i8()?,
            track_temperature_change: r.i8()?,
            air_temperature: r.i8()?,
            air_temperature_change: r.i8()?,
            rain_percentage: r.u8()?,
        })
    }

    fn write(&self, w: &mut ByteWriter, _format: PacketFormat) {
        w.u8(self.session_type);
        w.u8(self.time_offset);
        w.u8(self.weather);
        w.i8(self.track_temperature);
        w.i8(self.track_temperature_change);
        w.i8(self.air_temperature);
        w.i8(self.air_temperature_change);
        w.u8(self.rain_percentage);
    }

    fn wire_size(_format: PacketFormat) -> usize {
        8
    }
}

/// Units and period counters added in format 2023.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionExtras2023 {
    /// 0 MPH, 1 KPH.
    pub speed_units_lead_player: u8,
    /// 0 Celsius, 1 Fahrenheit.
    pub temperature_units_lead_player: u8,
    pub speed_units_secondary_player: u8,
    pub temperature_units_secondary_player: u8,
    pub num_safety_car_periods: u8,
    pub num_virtual_safety_car_periods: u8,
    pub num_red_flag_periods: u8,
}

impl WireLayout for SessionExtras2023 {
    fn read(r: &mut ByteReader<'_>, _format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            speed_units_lead_player: r.u8()?,
            temperature_units_lead_player: r.u8()?,
            speed_units_secondary_player: r.u8()?,
            temperature_units_secondary_player: r.u8()?,
            num_safety_car_periods: r.u8()?,
            num_virtual_safety_car_periods: r.u8()?,
            num_red_flag_periods: r.u8()?,
        })
    }

    fn write(&self, w: &mut ByteWriter, _format: PacketFormat) {
        w.u8(self.speed_units_lead_player);
        w.u8(self.temperature_units_lead_player);
        w.u8(self.speed_units_secondary_player);
        w.u8(self.temperature_units_secondary_player);
        w.u8(self.num_safety_car_periods);
        w.u8(self.num_virtual_safety_car_periods);
        w.u8(self.num_red_flag_periods);
    }

    fn wire_size(_format: PacketFormat) -> usize {
        7
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PacketSessionData {
    /// 0 clear, 1 light cloud, 2 overcast, 3 light rain, 4 heavy rain, 5 storm.
    pub weather: u8,
    pub track_temperature: i8,
    pub air_temperature: i8,
    pub total_laps: u8,
    /// Metres.
    pub track_length: u16,
    pub session_type: u8,
    /// -1 for unknown.
    pub track_id: i8,
    pub formula: u8,
    /// Seconds.
    pub session_time_left: u16,
    pub session_duration: u16,
    /// km/h.
    pub pit_speed_limit: u8,
    pub game_paused: u8,
    pub is_spectating: u8,
    pub spectator_car_index: u8,
    pub sli_pro_native_support: u8,
    pub num_marshal_zones: u8,
    pub marshal_zones: [MarshalZone; MAX_MARSHAL_ZONES],
    /// 0 none, 1 full, 2 virtual, 3 formation lap.
    pub safety_car_status: u8,
    pub network_game: u8,
    pub num_weather_forecast_samples: u8,
    /// Always exactly 56 entries; only the first
    /// `num_weather_forecast_samples` are meaningful.
    pub weather_forecast_samples: Vec<WeatherForecastSample>,
    pub forecast_accuracy: u8,
    pub ai_difficulty: u8,
    pub season_link_identifier: u32,
    pub weekend_link_identifier: u32,
    pub session_link_identifier: u32,
    pub pit_stop_window_ideal_lap: u8,
    pub pit_stop_window_latest_lap: u8,
    pub pit_stop_rejoin_position: u8,
    pub steering_assist: u8,
    pub braking_assist: u8,
    pub gearbox_assist: u8,
    pub pit_assist: u8,
    pub pit_release_assist: u8,
    pub ers_assist: u8,
    pub drs_assist: u8,
    pub dynamic_racing_line: u8,
    pub dynamic_racing_line_type: u8,
    pub game_mode: u8,
    pub rule_set: u8,
    /// Local time of day, minutes since midnight.
    pub time_of_day: u32,
    pub session_length: u8,
    /// Present from format 2023.
    pub extras_2023: Option<SessionExtras2023>,
}

impl Default for PacketSessionData {
    fn default() -> Self {
        Self {
            weather: 0,
            track_temperature: 0,
            air_temperature: 0,
            total_laps: 0,
            track_length: 0,
            session_type: 0,
            track_id: -1,
            formula: 0,
            session_time_left: 0,
            session_duration: 0,
            pit_speed_limit: 0,
            game_paused: 0,
            is_spectating: 0,
            spectator_car_index: 0,
            sli_pro_native_support: 0,
            num_marshal_zones: 0,
            marshal_zones: [MarshalZone::default(); MAX_MARSHAL_ZONES],
            safety_car_status: 0,
            network_game: 0,
            num_weather_forecast_samples: 0,
            weather_forecast_samples: vec![
                WeatherForecastSample::default();
                MAX_WEATHER_FORECAST_SAMPLES
            ],
            forecast_accuracy: 0,
            ai_difficulty: 0,
            season_link_identifier: 0,
            weekend_link_identifier: 0,
            session_link_identifier: 0,
            pit_stop_window_ideal_lap: 0,
            pit_stop_window_latest_lap: 0,
            pit_stop_rejoin_position: 0,
            steering_assist: 0,
            braking_assist: 0,
            gearbox_assist: 0,
            pit_assist: 0,
            pit_release_assist: 0,
            ers_assist: 0,
            drs_assist: 0,
            dynamic_racing_line: 0,
            dynamic_racing_line_type: 0,
            game_mode: 0,
            rule_set: 0,
            time_of_day: 0,
            session_length: 0,
            extras_2023: None,
        }
    }
}

impl WireLayout for PacketSessionData {
    fn read(r: &mut ByteReader<'_>, format: PacketFormat) -> Result<Self, OutOfBounds> {
        Ok(Self {
            weather: r.u8()?,
            track_temperature: r.i8()?,
            air_temperature: r.i8()?,
            total_laps: r.u8()?,
            track_length: r.u16_le()?,
            session_type: r.u8()?,
            track_id: r.i8()?,
            formula: r.u8()?,
            session_time_left: r.u16_le()?,
            session_duration: r.u16_le()?,
            pit_speed_limit: r.u8()?,
            game_paused: r.u8()?,
            is_spectating: r.u8()?,
            spectator_car_index: r.u8()?,
            sli_pro_native_support: r.u8()?,
            num_marshal_zones: r.u8()?,
            marshal_zones: r.layouts(format)?,
            safety_car_status: r.u8()?,
            network_game: r.u8()?,
            num_weather_forecast_samples: r.u8()?,
            weather_forecast_samples: r.layout_vec(MAX_WEATHER_FORECAST_SAMPLES, format)?,
            forecast_accuracy: r.u8()?,
            ai_difficulty: r.u8()?,
            season_link_identifier: r.u32_le()?,
            weekend_link_identifier: r.u32_le()?,
            session_link_identifier: r.u32_le()?,
            pit_stop_window_ideal_lap: r.u8()?,
            pit_stop_window_latest_lap: r.u8()?,
            pit_stop_rejoin_position: r.u8()?,
            steering_assist: r.u8()?,
            braking_assist: r.u8()?,
            gearbox_assist: r.u8()?,
            pit_assist: r.u8()?,
            pit_release_assist: r.u8()?,
            ers_assist: r.u8()?,
            drs_assist: r.u8()?,
            dynamic_racing_line: r.u8()?,
            dynamic_racing_line_type: r.u8()?,
            game_mode: r.u8()?,
            rule_set: r.u8()?,
            time_of_day: r.u32_le()?,
            session_length: r.u8()?,
            extras_2023: if format.is_2023_or_later() {
                Some(SessionExtras2023::read(r, format)?)
            } else {
                None
            },
        })
    }

    fn write(&self, w: &mut ByteWriter, format: PacketFormat) {
        w.u8(self.weather);
        w.i8(self.track_temperature);
        w.i8(self.air_temperature);
        w.u8(self.total_laps);
        w.u16_le(self.track_length);
        w.u8(self.session_type);
        w.i8(self.track_id);
        w.u8(self.formula);
        w.u16_le(self.session_time_left);
        w.u16_le(self.session_duration);
        w.u8(self.pit_speed_limit);
        w.u8(self.game_paused);
        w.u8(self.is_spectating);
        w.u8(self.spectator_car_index);
        w.u8(self.sli_pro_native_support);
        w.u8(self.num_marshal_zones);
        w.layouts(&self.marshal_zones, format);
        w.u8(self.safety_car_status);
        w.u8(self.network_game);
        w.u8(self.num_weather_forecast_samples);
        // the table is fixed-width on the wire whatever the Vec holds
        let blank = WeatherForecastSample::default();
        for i in 0..MAX_WEATHER_FORECAST_SAMPLES {
            self.weather_forecast_samples
                .get(i)
                .unwrap_or(&blank)
                .write(w, format);
        }
        w.u8(self.forecast_accuracy);
        w.u8(self.ai_difficulty);
        w.u32_le(self.season_link_identifier);
        w.u32_le(self.weekend_link_identifier);
        w.u32_le(self.session_link_identifier);
        w.u8(self.pit_stop_window_ideal_lap);
        w.u8(self.pit_stop_window_latest_lap);
        w.u8(self.pit_stop_rejoin_position);
        w.u8(self.steering_assist);
        w.u8(self.braking_assist);
        w.u8(self.gearbox_assist);
        w.u8(self.pit_assist);
        w.u8(self.pit_release_assist);
        w.u8(self.ers_assist);
        w.u8(self.drs_assist);
        w.u8(self.dynamic_racing_line);
        w.u8(self.dynamic_racing_line_type);
        w.u8(self.game_mode);
        w.u8(self.rule_set);
        w.u32_le(self.time_of_day);
        w.u8(self.session_length);
        if format.is_2023_or_later() {
            self.extras_2023.unwrap_or_default().write(w, format);
        }
    }

    fn wire_size(format: PacketFormat) -> usize {
        let base = 19
            + MAX_MARSHAL_ZONES * MarshalZone::wire_size(format)
            + 3
            + MAX_WEATHER_FORECAST_SAMPLES * WeatherForecastSample::wire_size(format)
            + 2
            + 3 * 4
            + 3
            + 9
            + 2
            + 4
            + 1;
        if format.is_2023_or_later() {
            base + SessionExtras2023::wire_size(format)
        } else {
            base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_session_field_offsets_2022() -> TestResult {
        let session = PacketSessionData {
            track_id: 10,
            track_length: 7_004,
            session_type: 10,
            num_weather_forecast_samples: 2,
            session_length: 7,
            ..PacketSessionData::default()
        };
        let mut w = ByteWriter::new();
        session.write(&mut w, PacketFormat::Format2022);
        let raw = w.into_bytes();
        assert_eq!(raw.len(), 608);
        assert_eq!(raw.get(4..6), Some(7_004u16.to_le_bytes().as_slice()));
        assert_eq!(raw.get(7).copied(), Some(10));
        assert_eq!(raw.get(126).copied(), Some(2));
        assert_eq!(raw.last().copied(), Some(7));
        Ok(())
    }

    #[test]
    fn test_session_2023_round_trip_keeps_extras() -> TestResult {
        let mut session = PacketSessionData {
            weather: 3,
            air_temperature: -2,
            extras_2023: Some(SessionExtras2023 {
                num_red_flag_periods: 1,
                num_safety_car_periods: 2,
                ..SessionExtras2023::default()
            }),
            ..PacketSessionData::default()
        };
        if let Some(sample) = session.weather_forecast_samples.get_mut(55) {
            sample.rain_percentage = 80;
        }
        let mut w = ByteWriter::new();
        session.write(&mut w, PacketFormat::Format2023);
        let raw = w.into_bytes();
        assert_eq!(raw.len(), 615);

        let decoded = PacketSessionData::read(&mut ByteReader::new(&raw), PacketFormat::Format2023)?;
        assert_eq!(decoded, session);
        assert_eq!(decoded.weather_forecast_samples.len(), MAX_WEATHER_FORECAST_SAMPLES);
        Ok(())
    }
}
