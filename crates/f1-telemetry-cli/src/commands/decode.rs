//! Decode raw datagram files, one packet per file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use f1_telemetry_protocol::{Decoder, PacketFormat};

use crate::error::CliError;
use crate::output;

pub fn execute(files: &[PathBuf], formats: &[u16], json: bool) -> Result<()> {
    let decoder = decoder_for(formats)?;
    for path in files {
        let bytes = std::fs::read(path)
            .map_err(CliError::from)
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        let record = decoder
            .decode_bytes(&bytes)
            .with_context(|| format!("failed to decode '{}'", path.display()))?;
        output::print_record(&record, json)?;
    }
    Ok(())
}

fn decoder_for(formats: &[u16]) -> Result<Decoder, CliError> {
    if formats.is_empty() {
        return Ok(Decoder::default());
    }
    let formats = formats
        .iter()
        .map(|raw| {
            PacketFormat::from_raw(*raw).ok_or_else(|| {
                CliError::InvalidConfiguration(format!("unsupported packet format {raw}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Decoder::new(formats))
}
