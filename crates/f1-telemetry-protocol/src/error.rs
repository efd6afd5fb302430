//! Per-packet decode errors.
//!
//! Every variant is recoverable: the offending datagram is discarded and the
//! stream continues. None of them carries state from earlier packets.

use core::fmt;

use serde::Serialize;
use thiserror::Error;

/// Why a datagram was rejected by the [`Decoder`](crate::Decoder).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DecodeError {
    /// The buffer cannot hold a packet header.
    #[error("datagram too short: {actual} bytes, header needs {required}")]
    TooShort { actual: usize, required: usize },

    /// The header declares a packet format this decoder does not accept.
    #[error("unsupported packet format {format}")]
    UnsupportedVersion { format: u16 },

    /// The packet id is not defined for the declared format.
    #[error("unknown packet id {packet_id} for packet format {format}")]
    UnknownPacketType { packet_id: u8, format: u16 },

    /// The datagram length differs from the exact size of its layout.
    #[error("packet id {packet_id}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        packet_id: u8,
        expected: usize,
        actual: usize,
    },
}

impl DecodeError {
    /// Field-free classification, handy as a counter key.
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            DecodeError::TooShort { .. } => DecodeErrorKind::TooShort,
            DecodeError::UnsupportedVersion { .. } => DecodeErrorKind::UnsupportedVersion,
            DecodeError::UnknownPacketType { .. } => DecodeErrorKind::UnknownPacketType,
            DecodeError::SizeMismatch { .. } => DecodeErrorKind::SizeMismatch,
        }
    }
}

/// Classification of a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum DecodeErrorKind {
    TooShort = 0,
    UnsupportedVersion = 1,
    UnknownPacketType = 2,
    SizeMismatch = 3,
}

impl DecodeErrorKind {
    /// All kinds, in discriminant order.
    pub const ALL: [DecodeErrorKind; 4] = [
        DecodeErrorKind::TooShort,
        DecodeErrorKind::UnsupportedVersion,
        DecodeErrorKind::UnknownPacketType,
        DecodeErrorKind::SizeMismatch,
    ];
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeErrorKind::TooShort => write!(f, "too_short"),
            DecodeErrorKind::UnsupportedVersion => write!(f, "unsupported_version"),
            DecodeErrorKind::UnknownPacketType => write!(f, "unknown_packet_type"),
            DecodeErrorKind::SizeMismatch => write!(f, "size_mismatch"),
        }
    }
}
