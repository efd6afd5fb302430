//! Listener configuration.
//!
//! Loading is left to the caller: the struct derives `Deserialize` so it can
//! come from a file, the environment or CLI flags. [`ListenerConfig::validate`]
//! must pass before the listener is started.

use std::net::IpAddr;

use f1_telemetry_protocol::{Decoder, PacketFormat};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Standard EA / Codemasters F1 UDP port.
pub const DEFAULT_PORT: u16 = 20777;
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListenerConfig {
    /// IP address to bind, e.g. `127.0.0.1` or `0.0.0.0`.
    pub bind_address: String,
    pub port: u16,
    /// Accepted `m_packetFormat` values.
    pub formats: Vec<u16>,
    /// Datagrams buffered between the socket and the decoder.
    pub queue_capacity: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_owned(),
            port: DEFAULT_PORT,
            formats: PacketFormat::ALL.iter().map(|f| f.as_u16()).collect(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl ListenerConfig {
    pub fn with_bind_address(mut self, bind_address: impl Into<String>) -> Self {
        self.bind_address = bind_address.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_formats(mut self, formats: impl IntoIterator<Item = u16>) -> Self {
        self.formats = formats.into_iter().collect();
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_ip()?;
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        self.packet_formats()?;
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        Ok(())
    }

    pub fn bind_ip(&self) -> Result<IpAddr, ConfigError> {
        self.bind_address
            .trim()
            .parse()
            .map_err(|err: std::net::AddrParseError| ConfigError::InvalidAddress {
                value: self.bind_address.clone(),
                reason: err.to_string(),
            })
    }

    pub fn packet_formats(&self) -> Result<Vec<PacketFormat>, ConfigError> {
        if self.formats.is_empty() {
            return Err(ConfigError::NoFormats);
        }
        self.formats
            .iter()
            .map(|raw| PacketFormat::from_raw(*raw).ok_or(ConfigError::UnknownFormat(*raw)))
            .collect()
    }

    /// Decoder accepting exactly the configured formats.
    pub fn decoder(&self) -> Result<Decoder, ConfigError> {
        self.packet_formats().map(Decoder::new)
    }
}
