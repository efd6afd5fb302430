//! Decode throughput for the highest-rate packet types.

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use f1_telemetry_protocol::{Decoder, PacketFormat, PacketHeader, PacketId, packet_size};
use std::hint::black_box;

fn zeroed_packet(format: PacketFormat, id: PacketId) -> Vec<u8> {
    let mut raw = PacketHeader::new(format, id).to_bytes();
    raw.resize(packet_size(id, format), 0);
    raw
}

fn bench_decode(c: &mut Criterion) {
    let decoder = Decoder::default();
    let mut group = c.benchmark_group("decode");

    for (format, id) in [
        (PacketFormat::Format2022, PacketId::CarTelemetry),
        (PacketFormat::Format2023, PacketId::CarTelemetry),
        (PacketFormat::Format2023, PacketId::Motion),
        (PacketFormat::Format2023, PacketId::LapData),
        (PacketFormat::Format2023, PacketId::SessionHistory),
    ] {
        let raw = zeroed_packet(format, id);
        group.throughput(Throughput::Bytes(u64::try_from(raw.len()).unwrap_or(u64::MAX)));
        group.bench_function(format!("{id}_{format}"), |b| {
            b.iter(|| decoder.decode_bytes(black_box(&raw)))
        });
    }

    group.bench_function("reject_too_short", |b| {
        b.iter(|| decoder.decode_bytes(black_box([0xE7u8, 0x07, 0x17].as_slice())))
    });

    group.finish();
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
