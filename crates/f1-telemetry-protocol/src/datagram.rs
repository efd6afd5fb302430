//! One received UDP datagram.

use std::net::SocketAddr;
use std::time::Instant;

/// Immutable datagram bytes plus where and when they arrived.
///
/// Produced by the listener per successful receive and moved into the
/// decoder; nothing else holds on to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDatagram {
    pub bytes: Box<[u8]>,
    pub source: SocketAddr,
    pub received_at: Instant,
}

impl RawDatagram {
    pub fn new(bytes: impl Into<Box<[u8]>>, source: SocketAddr) -> Self {
        Self {
            bytes: bytes.into(),
            source,
            received_at: Instant::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
