//! Display names for the enumerated ids carried in packets.
//!
//! Every lookup is total: ids without a name map to `"Unknown"`.

use crate::PacketFormat;

const UNKNOWN: &str = "Unknown";

/// Maps `m_trackId` to a display name. `-1` and unlisted ids are `"Unknown"`.
pub fn track_name(track_id: i8) -> &'static str {
    const NAMES: &[&str] = &[
        "Melbourne",         // 0
        "Paul Ricard",       // 1
        "Shanghai",          // 2
        "Sakhir (Bahrain)",  // 3
        "Catalunya",         // 4
        "Monaco",            // 5
        "Montreal",          // 6
        "Silverstone",       // 7
        "Hockenheim",        // 8
        "Hungaroring",       // 9
        "Spa",               // 10
        "Monza",             // 11
        "Singapore",         // 12
        "Suzuka",            // 13
        "Abu Dhabi",         // 14
        "Texas",             // 15
        "Brazil",            // 16
        "Austria",           // 17
        "Sochi",             // 18
        "Mexico",            // 19
        "Baku (Azerbaijan)", // 20
        "Sakhir Short",      // 21
        "Silverstone Short", // 22
        "Texas Short",       // 23
        "Suzuka Short",      // 24
        "Hanoi",             // 25
        "Zandvoort",         // 26
        "Imola",             // 27
        "Portimao",          // 28
        "Jeddah",            // 29
        "Miami",             // 30
        "Las Vegas",         // 31
        "Losail",            // 32
    ];
    usize::try_from(track_id)
        .ok()
        .and_then(|idx| NAMES.get(idx).copied())
        .unwrap_or(UNKNOWN)
}

/// Maps `m_sessionType` to a short name. The numbering changed in 2023 when
/// sprint shootout sessions were added.
pub fn session_type_name(session_type: u8, format: PacketFormat) -> &'static str {
    const NAMES_2022: &[&str] = &[
        UNKNOWN, "P1", "P2", "P3", "Short P", "Q1", "Q2", "Q3", "Short Q", "OSQ", "R", "R2", "R3",
        "Time Trial",
    ];
    const NAMES_2023: &[&str] = &[
        UNKNOWN,
        "P1",
        "P2",
        "P3",
        "Short P",
        "Q1",
        "Q2",
        "Q3",
        "Short Q",
        "OSQ",
        "SSQ1",
        "SSQ2",
        "SSQ3",
        "Short SSQ",
        "OSSQ",
        "R",
        "R2",
        "R3",
        "Time Trial",
    ];
    let names = match format {
        PacketFormat::Format2022 => NAMES_2022,
        PacketFormat::Format2023 => NAMES_2023,
    };
    names
        .get(usize::from(session_type))
        .copied()
        .unwrap_or(UNKNOWN)
}

pub fn weather_name(weather: u8) -> &'static str {
    match weather {
        0 => "Clear",
        1 => "Light Cloud",
        2 => "Overcast",
        3 => "Light Rain",
        4 => "Heavy Rain",
        5 => "Storm",
        _ => UNKNOWN,
    }
}

/// Name of an `m_actualTyreCompound` value (the compound fitted).
pub fn actual_compound_name(compound: u8) -> &'static str {
    match compound {
        7 => "Intermediate",
        8 => "Wet",
        9 => "Dry (classic)",
        10 => "Wet (classic)",
        11 => "Super Soft",
        12 => "Soft",
        13 => "Medium",
        14 => "Hard",
        15 => "Wet (F2)",
        16 => "C5",
        17 => "C4",
        18 => "C3",
        19 => "C2",
        20 => "C1",
        21 => "C0",
        _ => UNKNOWN,
    }
}

/// Name of an `m_visualTyreCompound` value (the sidewall colour).
pub fn visual_compound_name(compound: u8) -> &'static str {
    match compound {
        7 => "Intermediate",
        8 => "Wet",
        15 => "Wet (F2)",
        16 => "Soft",
        17 => "Medium",
        18 => "Hard",
        19 => "Super Soft (F2)",
        20 => "Soft (F2)",
        21 => "Medium (F2)",
        22 => "Hard (F2)",
        _ => UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_names() {
        assert_eq!(track_name(0), "Melbourne");
        assert_eq!(track_name(10), "Spa");
        assert_eq!(track_name(29), "Jeddah");
        assert_eq!(track_name(-1), "Unknown");
        assert_eq!(track_name(i8::MAX), "Unknown");
    }

    #[test]
    fn test_session_type_depends_on_format() {
        assert_eq!(session_type_name(10, PacketFormat::Format2022), "R");
        assert_eq!(session_type_name(10, PacketFormat::Format2023), "SSQ1");
        assert_eq!(session_type_name(15, PacketFormat::Format2023), "R");
        assert_eq!(session_type_name(15, PacketFormat::Format2022), "Unknown");
    }

    #[test]
    fn test_compound_names() {
        assert_eq!(actual_compound_name(18), "C3");
        assert_eq!(visual_compound_name(18), "Hard");
        assert_eq!(visual_compound_name(0), "Unknown");
        assert_eq!(weather_name(3), "Light Rain");
        assert_eq!(weather_name(6), "Unknown");
    }
}
