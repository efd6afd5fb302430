//! Exact datagram size of every packet type per format.

use anyhow::Result;
use colored::*;
use f1_telemetry_protocol::{PacketFormat, PacketId, packet_size};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct SizeRow {
    packet_id: u8,
    name: &'static str,
    format: u16,
    size: usize,
}

fn rows() -> Vec<SizeRow> {
    PacketFormat::ALL
        .iter()
        .flat_map(|format| {
            format.packet_ids().iter().map(|id| SizeRow {
                packet_id: id.as_u8(),
                name: id.name(),
                format: format.as_u16(),
                size: packet_size(*id, *format),
            })
        })
        .collect()
}

pub fn execute(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&rows())?);
        return Ok(());
    }

    print!("{:<4} {:<20}", "id".bold(), "packet".bold());
    for format in PacketFormat::ALL {
        print!(" {:>6}", format.to_string().bold());
    }
    println!();
    for id in PacketId::ALL {
        print!("{:<4} {:<20}", id.as_u8(), id.name());
        for format in PacketFormat::ALL {
            if id.is_defined_for(format) {
                print!(" {:>6}", packet_size(id, format));
            } else {
                print!(" {:>6}", "-");
            }
        }
        println!();
    }
    Ok(())
}
