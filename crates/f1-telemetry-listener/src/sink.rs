//! Destinations for decode outcomes.

use std::collections::HashMap;

use f1_telemetry_protocol::{DecodeError, PacketId, PacketRecord};
use tracing::trace;

use crate::queue::{BoundedQueue, Push};

/// What the decode worker produces for each datagram.
pub type DecodeOutcome = Result<PacketRecord, DecodeError>;

/// Consumer of decode outcomes, driven by the pipeline's decode worker.
///
/// `deliver` runs on the worker task and should not block for long.
pub trait PacketSink: Send + 'static {
    fn deliver(&mut self, outcome: DecodeOutcome);

    /// Called once after the last outcome, when the pipeline stops.
    fn finish(&mut self) {}
}

impl<F> PacketSink for F
where
    F: FnMut(DecodeOutcome) + Send + 'static,
{
    fn deliver(&mut self, outcome: DecodeOutcome) {
        self(outcome);
    }
}

/// Forward outcomes to a consumer-owned queue. The queue is closed when the
/// pipeline stops, so `recv` returns `None` after the last outcome.
impl PacketSink for BoundedQueue<DecodeOutcome> {
    fn deliver(&mut self, outcome: DecodeOutcome) {
        if let Push::Evicted(stale) = self.push(outcome) {
            trace!(accepted = stale.is_ok(), "output queue full, dropped oldest outcome");
        }
    }

    fn finish(&mut self) {
        self.close();
    }
}

type RecordHandler = Box<dyn FnMut(&PacketRecord) + Send>;
type RejectionHandler = Box<dyn FnMut(&DecodeError) + Send>;

/// Dispatches accepted records to handlers registered per packet type.
///
/// Several handlers may be registered for one type; they run in
/// registration order. Records of a type without handlers are ignored.
/// Rejected datagrams go to the optional rejection handler.
#[derive(Default)]
pub struct PacketRouter {
    handlers: HashMap<PacketId, Vec<RecordHandler>>,
    on_rejected: Option<RejectionHandler>,
}

impl std::fmt::Debug for PacketRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut routed: Vec<_> = self.handlers.keys().copied().collect();
        routed.sort_unstable();
        f.debug_struct("PacketRouter")
            .field("routed", &routed)
            .field("has_rejection_handler", &self.on_rejected.is_some())
            .finish()
    }
}

impl PacketRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`register`](Self::register).
    pub fn on(mut self, id: PacketId, handler: impl FnMut(&PacketRecord) + Send + 'static) -> Self {
        self.register(id, handler);
        self
    }

    pub fn register(&mut self, id: PacketId, handler: impl FnMut(&PacketRecord) + Send + 'static) {
        self.handlers.entry(id).or_default().push(Box::new(handler));
    }

    pub fn on_rejected(mut self, handler: impl FnMut(&DecodeError) + Send + 'static) -> Self {
        self.on_rejected = Some(Box::new(handler));
        self
    }

    pub fn is_routed(&self, id: PacketId) -> bool {
        self.handlers.get(&id).is_some_and(|h| !h.is_empty())
    }

    /// Route one outcome; returns how many handlers ran.
    pub fn dispatch(&mut self, outcome: &DecodeOutcome) -> usize {
        match outcome {
            Ok(record) => match self.handlers.get_mut(&record.packet_id()) {
                Some(handlers) => {
                    for handler in handlers.iter_mut() {
                        handler(record);
                    }
                    handlers.len()
                }
                None => 0,
            },
            Err(err) => match self.on_rejected.as_mut() {
                Some(handler) => {
                    handler(err);
                    1
                }
                None => 0,
            },
        }
    }
}

impl PacketSink for PacketRouter {
    fn deliver(&mut self, outcome: DecodeOutcome) {
        self.dispatch(&outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use f1_telemetry_protocol::{Decoder, PacketFormat, PacketHeader, packet_size};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn zeroed(format: PacketFormat, id: PacketId) -> DecodeOutcome {
        let mut raw = PacketHeader::new(format, id).to_bytes();
        raw.resize(packet_size(id, format), 0);
        Decoder::default().decode_bytes(&raw)
    }

    #[test]
    fn test_router_dispatches_by_packet_id() {
        let sessions = Arc::new(AtomicUsize::new(0));
        let telemetry = Arc::new(AtomicUsize::new(0));
        let rejected = Arc::new(AtomicUsize::new(0));

        let mut router = PacketRouter::new()
            .on(PacketId::Session, {
                let sessions = Arc::clone(&sessions);
                move |_| {
                    sessions.fetch_add(1, Ordering::Relaxed);
                }
            })
            .on(PacketId::CarTelemetry, {
                let telemetry = Arc::clone(&telemetry);
                move |record| {
                    assert_eq!(record.packet_id(), PacketId::CarTelemetry);
                    telemetry.fetch_add(1, Ordering::Relaxed);
                }
            })
            .on_rejected({
                let rejected = Arc::clone(&rejected);
                move |_| {
                    rejected.fetch_add(1, Ordering::Relaxed);
                }
            });

        router.deliver(zeroed(PacketFormat::Format2022, PacketId::Session));
        router.deliver(zeroed(PacketFormat::Format2023, PacketId::CarTelemetry));
        router.deliver(zeroed(PacketFormat::Format2023, PacketId::CarTelemetry));
        router.deliver(zeroed(PacketFormat::Format2023, PacketId::Motion));
        router.deliver(Err(DecodeError::UnsupportedVersion { format: 2099 }));

        assert_eq!(sessions.load(Ordering::Relaxed), 1);
        assert_eq!(telemetry.load(Ordering::Relaxed), 2);
        assert_eq!(rejected.load(Ordering::Relaxed), 1);
        assert!(!router.is_routed(PacketId::Motion));
    }

    #[test]
    fn test_handlers_for_same_id_run_in_order() {
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let mut router = PacketRouter::new();
        for tag in ["first", "second"] {
            let order = Arc::clone(&order);
            router.register(PacketId::Event, move |_| order.lock().push(tag));
        }
        let ran = router.dispatch(&zeroed(PacketFormat::Format2022, PacketId::Event));
        assert_eq!(ran, 2);
        assert_eq!(*order.lock(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_queue_sink_closes_on_finish() -> TestResult {
        let queue: BoundedQueue<DecodeOutcome> = BoundedQueue::new(2);
        let mut sink = queue.clone();
        sink.deliver(Err(DecodeError::TooShort {
            actual: 0,
            required: 24,
        }));
        sink.finish();
        assert!(matches!(queue.recv().await, Some(Err(DecodeError::TooShort { .. }))));
        assert!(queue.recv().await.is_none());
        Ok(())
    }
}
