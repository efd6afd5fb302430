//! Wire layouts and decoder for the EA / Codemasters F1 UDP telemetry protocol.
//!
//! This crate is I/O free. It turns one datagram into a typed
//! [`PacketRecord`] or a [`DecodeError`], and can encode records back into
//! the same layout.
//!
//! ## Supported packet formats
//!
//! | Format | Game  | Header | Packet ids |
//! |--------|-------|--------|------------|
//! | 2022   | F1 22 | 24     | 0..=11     |
//! | 2023   | F1 23 | 29     | 0..=13     |
//!
//! ## Decoding
//!
//! ```
//! use f1_telemetry_protocol::{Decoder, DecodeError};
//!
//! let decoder = Decoder::default();
//! let err = decoder.decode_bytes(&[0xE6, 0x07]);
//! assert_eq!(err, Err(DecodeError::TooShort { actual: 2, required: 24 }));
//! ```
//!
//! Lengths are validated against the exact layout size before any payload
//! field is read; a packet is either decoded completely or rejected.

#![deny(static_mut_refs)]

pub mod datagram;
pub mod decoder;
pub mod error;
pub mod format;
pub mod header;
pub mod lookup;
pub mod packets;
pub mod wire;

pub use datagram::RawDatagram;
pub use decoder::{Decoder, Packet, PacketRecord};
pub use error::{DecodeError, DecodeErrorKind};
pub use format::{MIN_HEADER_SIZE, PacketFormat, PacketId};
pub use header::PacketHeader;
pub use packets::{packet_size, payload_size};
pub use wire::WireLayout;
