//! Fuzzes the F1 2022/2023 UDP datagram decoder.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_f1_udp_decode
#![no_main]
use f1_telemetry_protocol::{Decoder, packet_size};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must never panic on arbitrary bytes. Rejections are expected.
    let decoder = Decoder::default();
    if let Ok(record) = decoder.decode_bytes(data) {
        let expected = packet_size(record.packet_id(), record.packet_format());
        assert_eq!(data.len(), expected);
        assert_eq!(record.to_bytes().len(), expected);
    }
});
