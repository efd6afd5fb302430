//! Property tests: the decoder never panics and rejects malformed input
//! with the right error.

use f1_telemetry_protocol::{
    DecodeError, Decoder, MIN_HEADER_SIZE, PacketFormat, PacketHeader, PacketId, packet_size,
};
use proptest::prelude::*;

fn any_format() -> impl Strategy<Value = PacketFormat> {
    prop::sample::select(PacketFormat::ALL.to_vec())
}

fn any_id_for(format: PacketFormat) -> impl Strategy<Value = PacketId> {
    prop::sample::select(format.packet_ids().to_vec())
}

/// A header for `(format, id)` followed by `len` bytes of filler.
fn framed(format: PacketFormat, id: PacketId, filler: &[u8], len: usize) -> Vec<u8> {
    let mut raw = PacketHeader::new(format, id).to_bytes();
    raw.extend(filler.iter().copied().cycle().take(len.saturating_sub(raw.len())));
    raw.truncate(len);
    raw
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_no_panic_on_arbitrary_bytes(
        data in proptest::collection::vec(any::<u8>(), 0..2048)
    ) {
        let _ = Decoder::default().decode_bytes(&data);
    }

    #[test]
    fn prop_short_buffers_are_too_short(
        data in proptest::collection::vec(any::<u8>(), 0..MIN_HEADER_SIZE)
    ) {
        let result = Decoder::default().decode_bytes(&data);
        prop_assert_eq!(
            result,
            Err(DecodeError::TooShort { actual: data.len(), required: MIN_HEADER_SIZE })
        );
    }

    #[test]
    fn prop_unknown_format_is_unsupported(
        format in any::<u16>().prop_filter("known format", |f| PacketFormat::from_raw(*f).is_none()),
        tail in proptest::collection::vec(any::<u8>(), MIN_HEADER_SIZE..1500)
    ) {
        let mut data = format.to_le_bytes().to_vec();
        data.extend_from_slice(&tail);
        prop_assert_eq!(
            Decoder::default().decode_bytes(&data),
            Err(DecodeError::UnsupportedVersion { format })
        );
    }

    #[test]
    fn prop_wrong_length_is_size_mismatch(
        (format, id) in any_format().prop_flat_map(|f| (Just(f), any_id_for(f))),
        delta in prop_oneof![-64isize..0, 1isize..64],
        filler in proptest::collection::vec(any::<u8>(), 1..64)
    ) {
        let expected = packet_size(id, format);
        let len = expected.saturating_add_signed(delta);
        prop_assume!(len >= format.header_size());
        let data = framed(format, id, &filler, len);
        prop_assert_eq!(
            Decoder::default().decode_bytes(&data),
            Err(DecodeError::SizeMismatch { packet_id: id.as_u8(), expected, actual: len })
        );
    }

    #[test]
    fn prop_exact_length_always_decodes(
        (format, id) in any_format().prop_flat_map(|f| (Just(f), any_id_for(f))),
        filler in proptest::collection::vec(any::<u8>(), 1..256)
    ) {
        let data = framed(format, id, &filler, packet_size(id, format));
        let record = Decoder::default().decode_bytes(&data);
        prop_assert!(record.is_ok(), "{:?}", record.err());
        if let Ok(record) = record {
            prop_assert_eq!(record.packet_id(), id);
        }
    }

    #[test]
    fn prop_decoding_is_idempotent(
        (format, id) in any_format().prop_flat_map(|f| (Just(f), any_id_for(f))),
        filler in proptest::collection::vec(any::<u8>(), 1..256)
    ) {
        // NaN payloads defeat PartialEq, so compare the Debug rendering
        let data = framed(format, id, &filler, packet_size(id, format));
        let decoder = Decoder::default();
        let first = format!("{:?}", decoder.decode_bytes(&data));
        let second = format!("{:?}", decoder.decode_bytes(&data));
        prop_assert_eq!(first, second);
    }
}
