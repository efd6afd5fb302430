//! Live listener: print every decoded packet until Ctrl-C.

use anyhow::Result;
use f1_telemetry_listener::Pipeline;
use tracing::{info, warn};

use crate::commands::ListenArgs;
use crate::output;

pub async fn execute(args: &ListenArgs, json: bool) -> Result<()> {
    let config = args.resolve_config()?;
    let filter = args.packet_filter()?;
    let decoder = config.decoder()?;

    let (mut pipeline, outcomes) = Pipeline::spawn_with_queue(&config, decoder).await?;
    info!(addr = %pipeline.local_addr(), formats = ?config.formats, "listening for F1 telemetry");
    output::print_listening(pipeline.local_addr(), &config.formats, json);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut accepted = 0u64;

    loop {
        tokio::select! {
            signal = &mut ctrl_c => {
                if let Err(err) = signal {
                    warn!(error = %err, "failed to wait for Ctrl-C, stopping");
                }
                break;
            }
            outcome = outcomes.recv() => match outcome {
                None => break,
                Some(Ok(record)) => {
                    accepted = accepted.saturating_add(1);
                    if filter.is_empty() || filter.contains(&record.packet_id()) {
                        output::print_record(&record, json)?;
                    }
                    if args.count.is_some_and(|limit| accepted >= limit) {
                        break;
                    }
                }
                Some(Err(err)) => {
                    if args.show_rejected {
                        output::print_rejection(&err, json)?;
                    }
                }
            }
        }
    }

    let stopped = pipeline.stop().await;
    output::print_stats(&pipeline.stats(), json)?;
    stopped?;
    Ok(())
}
