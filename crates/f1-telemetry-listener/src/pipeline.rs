//! Listener → bounded queue → decode worker → sink.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use f1_telemetry_protocol::{DecodeErrorKind, Decoder, RawDatagram};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::listener::{Listener, ListenerHandle};
use crate::queue::{BoundedQueue, Push};
use crate::sink::{DecodeOutcome, PacketSink};
use crate::{ListenerConfig, ListenerError, StartError};

/// Lock-free pipeline counters.
#[derive(Debug, Default)]
pub struct PipelineStats {
    received: AtomicU64,
    dropped: AtomicU64,
    decoded: AtomicU64,
    rejected: AtomicU64,
    rejected_by_kind: [AtomicU64; DecodeErrorKind::ALL.len()],
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    fn record_outcome(&self, outcome: &DecodeOutcome) {
        match outcome {
            Ok(_) => {
                self.decoded.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => {
                self.rejected.fetch_add(1, Ordering::Relaxed);
                if let Some(counter) = self.rejected_by_kind.get(usize::from(err.kind() as u8)) {
                    counter.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        let [too_short, unsupported_version, unknown_packet_type, size_mismatch] =
            self.rejected_by_kind.each_ref().map(load);
        StatsSnapshot {
            received: load(&self.received),
            dropped: load(&self.dropped),
            decoded: load(&self.decoded),
            rejected: load(&self.rejected),
            too_short,
            unsupported_version,
            unknown_packet_type,
            size_mismatch,
        }
    }
}

/// Point-in-time copy of [`PipelineStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Datagrams read from the socket.
    pub received: u64,
    /// Datagrams evicted from the hand-off queue before decoding.
    pub dropped: u64,
    pub decoded: u64,
    pub rejected: u64,
    pub too_short: u64,
    pub unsupported_version: u64,
    pub unknown_packet_type: u64,
    pub size_mismatch: u64,
}

impl StatsSnapshot {
    pub fn rejected_of(&self, kind: DecodeErrorKind) -> u64 {
        match kind {
            DecodeErrorKind::TooShort => self.too_short,
            DecodeErrorKind::UnsupportedVersion => self.unsupported_version,
            DecodeErrorKind::UnknownPacketType => self.unknown_packet_type,
            DecodeErrorKind::SizeMismatch => self.size_mismatch,
        }
    }
}

/// Entry points for running a listener with a decode worker.
#[derive(Debug)]
pub struct Pipeline;

impl Pipeline {
    /// Validate `config`, bind, and start both tasks.
    ///
    /// # Errors
    ///
    /// [`StartError`] when the configuration is invalid or the bind fails.
    pub async fn spawn<S: PacketSink>(
        config: &ListenerConfig,
        decoder: Decoder,
        sink: S,
    ) -> Result<PipelineHandle, StartError> {
        let listener = Listener::from_config(config).await?;
        Ok(Self::spawn_on(listener, config.queue_capacity, decoder, sink))
    }

    /// Like [`spawn`](Self::spawn), delivering outcomes into a queue of the
    /// same capacity as the hand-off queue.
    pub async fn spawn_with_queue(
        config: &ListenerConfig,
        decoder: Decoder,
    ) -> Result<(PipelineHandle, BoundedQueue<DecodeOutcome>), StartError> {
        let output = BoundedQueue::new(config.queue_capacity);
        let handle = Self::spawn(config, decoder, output.clone()).await?;
        Ok((handle, output))
    }

    /// Start on an already bound listener.
    pub fn spawn_on<S: PacketSink>(
        listener: Listener,
        queue_capacity: usize,
        decoder: Decoder,
        sink: S,
    ) -> PipelineHandle {
        let stats = Arc::new(PipelineStats::new());
        let queue: BoundedQueue<RawDatagram> = BoundedQueue::new(queue_capacity);

        let worker = tokio::spawn(decode_worker(
            queue.clone(),
            decoder,
            sink,
            Arc::clone(&stats),
        ));

        let on_datagram = {
            let queue = queue.clone();
            let stats = Arc::clone(&stats);
            move |datagram: RawDatagram| {
                stats.record_received();
                match queue.push(datagram) {
                    Push::Accepted => {}
                    Push::Evicted(stale) => {
                        stats.record_dropped();
                        trace!(source = %stale.source, "decode queue full, dropped oldest datagram");
                    }
                    Push::Closed(_) => {
                        trace!("decode queue closed, datagram discarded");
                    }
                }
            }
        };
        // Whatever ends the receive loop also ends the worker.
        let exit_queue = queue.clone();
        let on_exit = move |result: &Result<(), ListenerError>| {
            if result.is_err() {
                debug!("receive loop failed, closing decode queue");
            }
            exit_queue.close();
        };
        let listener = listener.spawn_then(on_datagram, on_exit);

        info!(
            addr = %listener.local_addr(),
            queue_capacity = queue.capacity(),
            "F1 telemetry pipeline started"
        );

        PipelineHandle {
            listener,
            queue,
            worker: Some(worker),
            stats,
        }
    }
}

async fn decode_worker<S: PacketSink>(
    queue: BoundedQueue<RawDatagram>,
    decoder: Decoder,
    mut sink: S,
    stats: Arc<PipelineStats>,
) {
    while let Some(datagram) = queue.recv().await {
        let source = datagram.source;
        let len = datagram.len();
        let outcome = decoder.decode(datagram);
        stats.record_outcome(&outcome);
        if let Err(err) = &outcome {
            debug!(error = %err, kind = %err.kind(), %source, len, "rejected F1 datagram");
        }
        sink.deliver(outcome);
    }
    sink.finish();
}

/// Control handle for a running pipeline.
#[derive(Debug)]
pub struct PipelineHandle {
    listener: ListenerHandle,
    queue: BoundedQueue<RawDatagram>,
    worker: Option<JoinHandle<()>>,
    stats: Arc<PipelineStats>,
}

impl PipelineHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Number of datagrams waiting for the decode worker.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Whether the pipeline has run down: the decode worker has delivered
    /// everything and called [`PacketSink::finish`].
    ///
    /// Becomes true on its own when the receive loop fails.
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop receiving, decode whatever is still queued, then return.
    ///
    /// The first call returns the listener's terminal result; later calls
    /// return `Ok(())`.
    ///
    /// # Errors
    ///
    /// The [`ListenerError`] that ended the receive loop, or
    /// [`ListenerError::TaskFailed`] if the decode worker panicked.
    pub async fn stop(&mut self) -> Result<(), ListenerError> {
        let listener_result = self.listener.stop().await.unwrap_or(Ok(()));
        self.drain(listener_result).await
    }

    /// Wait until the receive loop ends on its own and the queue is drained.
    ///
    /// Only a socket failure ends the loop without [`stop`](Self::stop), so
    /// this is how a caller learns the pipeline has died.
    ///
    /// # Errors
    ///
    /// As for [`stop`](Self::stop).
    pub async fn wait(&mut self) -> Result<(), ListenerError> {
        let listener_result = self.listener.join().await.unwrap_or(Ok(()));
        self.drain(listener_result).await
    }

    async fn drain(
        &mut self,
        listener_result: Result<(), ListenerError>,
    ) -> Result<(), ListenerError> {
        self.queue.close();

        if let Some(worker) = self.worker.take() {
            if let Err(err) = worker.await {
                warn!(error = %err, "decode worker failed");
                return Err(ListenerError::TaskFailed(err.to_string()));
            }
            let stats = self.stats.snapshot();
            info!(
                received = stats.received,
                decoded = stats.decoded,
                rejected = stats.rejected,
                dropped = stats.dropped,
                "F1 telemetry pipeline stopped"
            );
        }
        listener_result
    }
}

impl Drop for PipelineHandle {
    fn drop(&mut self) {
        // The listener task exits once its shutdown sender is gone; the
        // worker needs the queue closed.
        self.queue.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use f1_telemetry_protocol::DecodeError;

    #[test]
    fn test_outcomes_are_counted_by_kind() {
        let stats = PipelineStats::new();
        stats.record_received();
        stats.record_received();
        stats.record_dropped();
        stats.record_outcome(&Err(DecodeError::TooShort {
            actual: 2,
            required: 24,
        }));
        stats.record_outcome(&Err(DecodeError::SizeMismatch {
            packet_id: 6,
            expected: 1347,
            actual: 1337,
        }));
        stats.record_outcome(&Err(DecodeError::SizeMismatch {
            packet_id: 1,
            expected: 632,
            actual: 633,
        }));

        let snap = stats.snapshot();
        assert_eq!(snap.received, 2);
        assert_eq!(snap.dropped, 1);
        assert_eq!(snap.decoded, 0);
        assert_eq!(snap.rejected, 3);
        assert_eq!(snap.rejected_of(DecodeErrorKind::TooShort), 1);
        assert_eq!(snap.rejected_of(DecodeErrorKind::SizeMismatch), 2);
        assert_eq!(snap.rejected_of(DecodeErrorKind::UnknownPacketType), 0);
    }

    #[test]
    fn test_kind_counters_sum_to_rejected() {
        let stats = PipelineStats::new();
        for format in [2099u16, 2021, 7] {
            stats.record_outcome(&Err(DecodeError::UnsupportedVersion { format }));
        }
        let snap = stats.snapshot();
        let by_kind: u64 = DecodeErrorKind::ALL
            .iter()
            .map(|kind| snap.rejected_of(*kind))
            .sum();
        assert_eq!(by_kind, snap.rejected);
        assert_eq!(snap.unsupported_version, 3);
    }
}
