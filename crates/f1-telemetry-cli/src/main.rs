//! f1-telemetry - EA F1 UDP telemetry listener and decoder
//!
//! Listens for F1 22 / F1 23 telemetry, decodes every datagram and prints
//! one line (or one JSON object) per packet.

#![deny(static_mut_refs)]

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use f1_telemetry_listener::{ConfigError, StartError};
use f1_telemetry_protocol::DecodeError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::ListenArgs;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "f1-telemetry")]
#[command(about = "Listen for and decode EA F1 UDP telemetry")]
#[command(version)]
#[command(long_about = "
f1-telemetry receives the UDP telemetry stream of F1 22 and F1 23 (packet
formats 2022 and 2023), validates and decodes every datagram, and prints one
summary line per packet.

Use --json for one JSON object per line, suitable for piping into other tools.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen on a UDP port and print decoded packets
    Listen(ListenArgs),

    /// Decode raw datagrams saved to files
    Decode {
        /// Files each holding exactly one datagram
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Accepted packet formats, comma separated [default: all]
        #[arg(long = "format", value_delimiter = ',')]
        formats: Vec<u16>,
    },

    /// Print the exact datagram size of every packet type
    Sizes,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "f1_telemetry={log_level},f1_telemetry_listener={log_level},f1_telemetry_protocol={log_level}"
                )
                .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let result = execute_command(&cli).await;

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            std::process::exit(exit_code(&e));
        }
    }
}

async fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Listen(args) => commands::listen::execute(args, cli.json).await,
        Commands::Decode { files, formats } => commands::decode::execute(files, formats, cli.json),
        Commands::Sizes => commands::sizes::execute(cli.json),
    }
}

/// 2 = configuration, 3 = socket bind, 4 = undecodable input, 1 = anything else.
fn exit_code(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<ConfigError>().is_some()
        || matches!(
            error.downcast_ref::<StartError>(),
            Some(StartError::Config(_))
        )
        || matches!(
            error.downcast_ref::<CliError>(),
            Some(CliError::InvalidConfiguration(_))
        )
    {
        return 2;
    }
    if matches!(error.downcast_ref::<StartError>(), Some(StartError::Bind(_))) {
        return 3;
    }
    if error.downcast_ref::<DecodeError>().is_some() {
        return 4;
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    // --- Global flag parsing ---

    #[test]
    fn parse_listen_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["f1-telemetry", "listen"])?;
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
        let Commands::Listen(args) = cli.command else {
            return Err("expected listen".into());
        };
        assert!(args.packets.is_empty());
        assert!(args.count.is_none());
        assert!(!args.show_rejected);
        Ok(())
    }

    #[test]
    fn parse_global_json_flag_after_subcommand() -> TestResult {
        let cli = Cli::try_parse_from(["f1-telemetry", "sizes", "--json"])?;
        assert!(cli.json);
        Ok(())
    }

    #[test]
    fn parse_verbose_levels() -> TestResult {
        let cli = Cli::try_parse_from(["f1-telemetry", "-vv", "sizes"])?;
        assert_eq!(cli.verbose, 2);
        Ok(())
    }

    #[test]
    fn parse_listen_flags() -> TestResult {
        let cli = Cli::try_parse_from([
            "f1-telemetry",
            "listen",
            "--bind",
            "0.0.0.0",
            "--port",
            "20778",
            "--format",
            "2022,2023",
            "--queue-capacity",
            "64",
            "--packet",
            "1,6",
            "-n",
            "10",
            "--show-rejected",
        ])?;
        let Commands::Listen(args) = cli.command else {
            return Err("expected listen".into());
        };
        assert_eq!(args.bind.as_deref(), Some("0.0.0.0"));
        assert_eq!(args.port, Some(20778));
        assert_eq!(args.formats, vec![2022, 2023]);
        assert_eq!(args.queue_capacity, Some(64));
        assert_eq!(args.packets, vec![1, 6]);
        assert_eq!(args.count, Some(10));
        assert!(args.show_rejected);
        Ok(())
    }

    #[test]
    fn parse_rejects_out_of_range_port() {
        let result = Cli::try_parse_from(["f1-telemetry", "listen", "--port", "70000"]);
        assert!(result.is_err());
    }

    #[test]
    fn decode_requires_a_file() {
        let result = Cli::try_parse_from(["f1-telemetry", "decode"]);
        assert!(result.is_err());
    }

    // --- Exit codes ---

    #[test]
    fn exit_codes_follow_error_class() {
        let config = anyhow::Error::from(ConfigError::InvalidPort);
        assert_eq!(exit_code(&config), 2);

        let decode = anyhow::Error::from(DecodeError::UnsupportedVersion { format: 2099 })
            .context("failed to decode 'x.bin'");
        assert_eq!(exit_code(&decode), 4);

        let other = anyhow::anyhow!("boom");
        assert_eq!(exit_code(&other), 1);
    }
}
