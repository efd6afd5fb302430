//! Command implementations for the f1-telemetry CLI

pub mod decode;
pub mod listen;
pub mod sizes;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use f1_telemetry_listener::ListenerConfig;
use f1_telemetry_protocol::PacketId;

use crate::error::CliError;

#[derive(Args, Debug, Default)]
pub struct ListenArgs {
    /// JSON listener configuration file; flags override its values
    #[arg(long, env = "F1_TELEMETRY_CONFIG")]
    pub config: Option<PathBuf>,

    /// IP address to bind [default: 127.0.0.1]
    #[arg(long, env = "F1_TELEMETRY_BIND")]
    pub bind: Option<String>,

    /// UDP port to listen on [default: 20777]
    #[arg(short, long, env = "F1_TELEMETRY_PORT")]
    pub port: Option<u16>,

    /// Accepted packet formats, comma separated [default: 2022,2023]
    #[arg(long = "format", env = "F1_TELEMETRY_FORMATS", value_delimiter = ',')]
    pub formats: Vec<u16>,

    /// Datagrams buffered ahead of the decoder [default: 256]
    #[arg(long, env = "F1_TELEMETRY_QUEUE_CAPACITY")]
    pub queue_capacity: Option<usize>,

    /// Only print these packet ids (0-13), comma separated
    #[arg(long = "packet", value_delimiter = ',')]
    pub packets: Vec<u8>,

    /// Exit after this many accepted packets
    #[arg(short = 'n', long)]
    pub count: Option<u64>,

    /// Also print rejected datagrams
    #[arg(long)]
    pub show_rejected: bool,
}

impl ListenArgs {
    /// Defaults, then the config file, then flags.
    pub fn resolve_config(&self) -> Result<ListenerConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ListenerConfig::default(),
        };
        if let Some(bind) = &self.bind {
            config.bind_address.clone_from(bind);
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if !self.formats.is_empty() {
            config.formats.clone_from(&self.formats);
        }
        if let Some(capacity) = self.queue_capacity {
            config.queue_capacity = capacity;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn packet_filter(&self) -> Result<Vec<PacketId>, CliError> {
        self.packets
            .iter()
            .map(|raw| {
                PacketId::from_raw(*raw).ok_or_else(|| {
                    CliError::InvalidConfiguration(format!("unknown packet id {raw} in --packet"))
                })
            })
            .collect()
    }
}

fn load_config(path: &std::path::Path) -> Result<ListenerConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    let config = serde_json::from_str(&text)
        .map_err(CliError::from)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
    Ok(config)
}
