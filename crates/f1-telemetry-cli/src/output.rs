//! Output formatting for CLI responses

use anyhow::Error;
use colored::*;
use f1_telemetry_listener::StatsSnapshot;
use f1_telemetry_protocol::lookup::{
    session_type_name, track_name, visual_compound_name, weather_name,
};
use f1_telemetry_protocol::{DecodeError, PacketRecord};
use serde_json::json;

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": format!("{error:#}"),
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format error as JSON: {e}"),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    for cause in error.chain().skip(1) {
        eprintln!("  {} {}", "Caused by:".yellow(), cause);
    }
}

pub fn print_listening(addr: std::net::SocketAddr, formats: &[u16], json: bool) {
    if json {
        return;
    }
    let formats: Vec<String> = formats.iter().map(u16::to_string).collect();
    eprintln!(
        "{} {} (formats {})",
        "Listening on".bold(),
        addr.to_string().green(),
        formats.join(", ")
    );
}

/// One line per accepted packet; JSON lines in `--json` mode.
pub fn print_record(record: &PacketRecord, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string(record)?);
    } else {
        let header = record.header();
        println!(
            "{} {:<20} frame {:>7} t={:>9.3}s  {}",
            header.packet_format.to_string().dimmed(),
            record.packet_id().name().cyan(),
            header.frame_identifier,
            header.session_time,
            describe(record)
        );
    }
    Ok(())
}

pub fn print_rejection(error: &DecodeError, json: bool) -> Result<(), serde_json::Error> {
    if json {
        let line = json!({ "rejected": error, "kind": error.kind().to_string() });
        println!("{}", serde_json::to_string(&line)?);
    } else {
        println!("{} {}", "rejected".yellow(), error);
    }
    Ok(())
}

pub fn print_stats(stats: &StatsSnapshot, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string(&json!({ "stats": stats }))?);
    } else {
        eprintln!("{}", "Pipeline statistics:".bold());
        eprintln!("  received: {}", stats.received);
        eprintln!("  decoded:  {}", stats.decoded);
        eprintln!("  rejected: {}", stats.rejected);
        eprintln!("  dropped:  {}", stats.dropped);
        if stats.rejected > 0 {
            eprintln!(
                "    too_short={} unsupported_version={} unknown_packet_type={} size_mismatch={}",
                stats.too_short,
                stats.unsupported_version,
                stats.unknown_packet_type,
                stats.size_mismatch
            );
        }
    }
    Ok(())
}

/// Short human summary of a record, centred on the player car.
pub fn describe(record: &PacketRecord) -> String {
    let player = usize::from(record.header().player_car_index);
    match record {
        PacketRecord::Motion(p) => match p.data.car_motion_data.get(player) {
            Some(car) => format!(
                "g lat {:.2} lon {:.2} yaw {:.3}",
                car.g_force_lateral, car.g_force_longitudinal, car.yaw
            ),
            None => no_player(player),
        },
        PacketRecord::Session(p) => {
            let s = &p.data;
            format!(
                "{} | {} | {} | air {}°C track {}°C | {} laps",
                track_name(s.track_id),
                session_type_name(s.session_type, p.header.packet_format),
                weather_name(s.weather),
                s.air_temperature,
                s.track_temperature,
                s.total_laps
            )
        }
        PacketRecord::LapData(p) => match p.data.lap_data.get(player) {
            Some(lap) => format!(
                "P{} lap {} | current {} | last {}",
                lap.car_position,
                lap.current_lap_num,
                lap_time(lap.current_lap_time_ms),
                lap_time(lap.last_lap_time_ms)
            ),
            None => no_player(player),
        },
        PacketRecord::Event(p) => p.data.details.code_str(),
        PacketRecord::Participants(p) => {
            let name = p
                .data
                .participants
                .get(player)
                .map_or("?", |driver| driver.name.as_str());
            format!("{} active cars | player {}", p.data.num_active_cars, name)
        }
        PacketRecord::CarSetups(p) => match p.data.car_setups.get(player) {
            Some(setup) => format!(
                "wings {}/{} | bias {}% | fuel {:.1} kg",
                setup.front_wing, setup.rear_wing, setup.brake_bias, setup.fuel_load
            ),
            None => no_player(player),
        },
        PacketRecord::CarTelemetry(p) => match p.data.car_telemetry_data.get(player) {
            Some(car) => format!(
                "{} km/h | gear {} | {} rpm | throttle {:.0}% brake {:.0}%",
                car.speed,
                car.gear,
                car.engine_rpm,
                car.throttle * 100.0,
                car.brake * 100.0
            ),
            None => no_player(player),
        },
        PacketRecord::CarStatus(p) => match p.data.car_status_data.get(player) {
            Some(car) => format!(
                "{} tyres ({} laps) | fuel {:.1} kg ({:+.1} laps)",
                visual_compound_name(car.visual_tyre_compound),
                car.tyres_age_laps,
                car.fuel_in_tank,
                car.fuel_remaining_laps
            ),
            None => no_player(player),
        },
        PacketRecord::FinalClassification(p) => {
            match p.data.classification_data.get(player) {
                Some(result) => format!(
                    "{} cars classified | player P{} ({} pts)",
                    p.data.num_cars, result.position, result.points
                ),
                None => no_player(player),
            }
        }
        PacketRecord::LobbyInfo(p) => format!("{} players in lobby", p.data.num_players),
        PacketRecord::CarDamage(p) => match p.data.car_damage_data.get(player) {
            Some(car) => {
                let [rl, rr, fl, fr] = car.tyres_wear;
                format!("tyre wear RL {rl:.0}% RR {rr:.0}% FL {fl:.0}% FR {fr:.0}%")
            }
            None => no_player(player),
        },
        PacketRecord::SessionHistory(p) => format!(
            "car {} | {} laps | best lap {}",
            p.data.car_idx, p.data.num_laps, p.data.best_lap_time_lap_num
        ),
        PacketRecord::TyreSets(p) => {
            let fitted = p
                .data
                .fitted()
                .map_or("none", |set| visual_compound_name(set.visual_tyre_compound));
            format!("car {} | fitted {}", p.data.car_idx, fitted)
        }
        PacketRecord::MotionEx(p) => format!(
            "front wheels {:.3} rad | cog {:.3} m",
            p.data.front_wheels_angle, p.data.height_of_cog_above_ground
        ),
    }
}

fn no_player(index: usize) -> String {
    format!("no car at player index {index}")
}

/// `m:ss.mmm`, or `--` for an unset time.
pub fn lap_time(ms: u32) -> String {
    if ms == 0 {
        return "--".to_string();
    }
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{minutes}:{seconds:02}.{millis:03}")
}
