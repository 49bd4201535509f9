//! Property-based invariant tests for the escape-aware key decoder.
//!
//! 1. Input without ESC passes through byte for byte.
//! 2. Every input byte is accounted for: emitted keys, re-expanded to the
//!    bytes they came from, followed by the bytes still pending, equal the
//!    input exactly (nothing lost, nothing duplicated, order kept).
//! 3. Arrow sequences surrounded by plain bytes collapse to one key.
//! 4. The decoder never holds more than a full sequence plus one byte.

use proptest::prelude::*;
use tgfx_core::byte_source::SliceSource;
use tgfx_core::key::Key;
use tgfx_core::key_decoder::{
    DecoderState, ESCAPE, KeyDecoder, QUEUE_CAPACITY, ReadMode,
};

// ── Helpers ─────────────────────────────────────────────────────────────

fn decode_all(decoder: &mut KeyDecoder, input: &[u8]) -> Vec<Key> {
    let mut source = SliceSource::from(input);
    let mut keys = Vec::new();
    while let Some(key) = decoder
        .next_key(&mut source, ReadMode::NonBlocking)
        .expect("in-memory source never fails")
    {
        keys.push(key);
    }
    assert_eq!(source.remaining(), 0);
    keys
}

fn expand(key: Key) -> Vec<u8> {
    match key {
        Key::Char(b) => vec![b],
        Key::Up => vec![ESCAPE, b'[', b'A'],
        Key::Down => vec![ESCAPE, b'[', b'B'],
        Key::Right => vec![ESCAPE, b'[', b'C'],
        Key::Left => vec![ESCAPE, b'[', b'D'],
        Key::Other => panic!("byte decoding never yields Other"),
    }
}

fn pending_bytes(state: DecoderState) -> Vec<u8> {
    match state {
        DecoderState::Normal => Vec::new(),
        DecoderState::SawEscape => vec![ESCAPE],
        DecoderState::SawEscapeBracket => vec![ESCAPE, b'['],
        DecoderState::Draining => panic!("decoder idle while draining"),
    }
}

/// Streams biased toward escape-heavy content.
fn escape_heavy_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            3 => Just(ESCAPE),
            3 => Just(b'['),
            2 => prop::sample::select(vec![b'A', b'B', b'C', b'D']),
            2 => any::<u8>(),
        ],
        0..64,
    )
}

fn plain_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>().prop_filter("no ESC", |b| *b != ESCAPE), 0..32)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Pass-through
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn escape_free_input_passes_through(input in plain_bytes()) {
        let mut decoder = KeyDecoder::new();
        let keys = decode_all(&mut decoder, &input);
        let expected: Vec<Key> = input.iter().copied().map(Key::Char).collect();
        prop_assert_eq!(keys, expected);
        prop_assert_eq!(decoder.state(), DecoderState::Normal);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Byte conservation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn every_byte_is_accounted_for(input in escape_heavy_bytes()) {
        let mut decoder = KeyDecoder::new();
        let keys = decode_all(&mut decoder, &input);

        let mut rebuilt: Vec<u8> = keys.into_iter().flat_map(expand).collect();
        rebuilt.extend(pending_bytes(decoder.state()));
        prop_assert_eq!(rebuilt, input);
    }

    #[test]
    fn arbitrary_bytes_are_accounted_for(input in prop::collection::vec(any::<u8>(), 0..128)) {
        let mut decoder = KeyDecoder::new();
        let keys = decode_all(&mut decoder, &input);

        let mut rebuilt: Vec<u8> = keys.into_iter().flat_map(expand).collect();
        rebuilt.extend(pending_bytes(decoder.state()));
        prop_assert_eq!(rebuilt, input);
    }

    #[test]
    fn chunking_does_not_change_the_result(
        input in escape_heavy_bytes(),
        split in any::<prop::sample::Index>(),
    ) {
        let mut whole = KeyDecoder::new();
        let expected = decode_all(&mut whole, &input);

        let at = if input.is_empty() { 0 } else { split.index(input.len() + 1) };
        let mut chunked = KeyDecoder::new();
        let mut keys = decode_all(&mut chunked, &input[..at]);
        keys.extend(decode_all(&mut chunked, &input[at..]));

        prop_assert_eq!(keys, expected);
        prop_assert_eq!(chunked.state(), whole.state());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Arrow collapse
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn arrows_between_plain_bytes_collapse(
        before in plain_bytes(),
        final_byte in prop::sample::select(vec![b'A', b'B', b'C', b'D']),
        after in plain_bytes(),
    ) {
        let mut input = before.clone();
        input.extend([ESCAPE, b'[', final_byte]);
        input.extend(&after);

        let mut decoder = KeyDecoder::new();
        let keys = decode_all(&mut decoder, &input);

        let arrow = match final_byte {
            b'A' => Key::Up,
            b'B' => Key::Down,
            b'C' => Key::Right,
            _ => Key::Left,
        };
        let mut expected: Vec<Key> = before.iter().copied().map(Key::Char).collect();
        expected.push(arrow);
        expected.extend(after.iter().copied().map(Key::Char));
        prop_assert_eq!(keys, expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Bounded queue
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn pending_never_exceeds_capacity(input in escape_heavy_bytes()) {
        let mut decoder = KeyDecoder::new();
        let mut source = SliceSource::new();
        for byte in input {
            source.push(&[byte]);
            while decoder
                .next_key(&mut source, ReadMode::NonBlocking)
                .expect("in-memory source never fails")
                .is_some()
            {
                prop_assert!(decoder.pending() <= QUEUE_CAPACITY);
            }
            prop_assert!(decoder.pending() <= QUEUE_CAPACITY);
        }
    }
}
