//! Tokio UDP listener and decode pipeline for F1 telemetry.
//!
//! A [`Listener`] owns one bound UDP socket and hands every datagram to a
//! callback. [`Pipeline`] adds a drop-oldest [`BoundedQueue`] and a decode
//! worker, so a slow consumer loses the oldest telemetry instead of stalling
//! the socket.
//!
//! ```no_run
//! use f1_telemetry_listener::{ListenerConfig, Pipeline, PacketRouter};
//! use f1_telemetry_protocol::PacketId;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ListenerConfig::default();
//! let router = PacketRouter::new()
//!     .on(PacketId::Session, |record| println!("{:?}", record.header()));
//! let mut pipeline = Pipeline::spawn(&config, config.decoder()?, router).await?;
//! tokio::signal::ctrl_c().await?;
//! pipeline.stop().await?;
//! # Ok(())
//! # }
//! ```

#![deny(static_mut_refs)]

pub mod config;
pub mod error;
pub mod listener;
pub mod pipeline;
pub mod queue;
pub mod sink;

pub use config::{DEFAULT_BIND_ADDRESS, DEFAULT_PORT, DEFAULT_QUEUE_CAPACITY, ListenerConfig};
pub use error::{BindError, ConfigError, ListenerError, StartError};
pub use listener::{Listener, ListenerHandle, RECV_BUFFER_SIZE};
pub use pipeline::{Pipeline, PipelineHandle, PipelineStats, StatsSnapshot};
pub use queue::{BoundedQueue, Push};
pub use sink::{DecodeOutcome, PacketRouter, PacketSink};
