//! Benchmark: framing only (message_extent), decode, and decode+encode over a
//! buffer of back-to-back KNXnet/IP messages.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use knxcodec::{message_extent, Codec};

const TUNNELING_WRITE: [u8; 21] = [
    0x06, 0x10, 0x04, 0x20, 0x00, 0x15, 0x04, 0x01, 0x05, 0x00, 0x11, 0x00, 0xBC, 0xE0, 0x11, 0x05, 0x0A, 0x03, 0x01, 0x00, 0x81,
];
const TUNNELING_ACK: [u8; 10] = [0x06, 0x10, 0x04, 0x21, 0x00, 0x0A, 0x04, 0x01, 0x05, 0x00];
const SEARCH_REQUEST: [u8; 14] = [0x06, 0x10, 0x02, 0x01, 0x00, 0x0E, 0x08, 0x01, 0xC0, 0xA8, 0x01, 0x0A, 0x0E, 0x57];

fn stream(repeat: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(repeat * (TUNNELING_WRITE.len() + TUNNELING_ACK.len() + SEARCH_REQUEST.len()));
    for _ in 0..repeat {
        out.extend_from_slice(&TUNNELING_WRITE);
        out.extend_from_slice(&TUNNELING_ACK);
        out.extend_from_slice(&SEARCH_REQUEST);
    }
    out
}

fn walk(bytes: &[u8]) -> usize {
    let mut offset = 0;
    let mut count = 0;
    while let Ok(n) = message_extent(&bytes[offset..]) {
        offset += n;
        count += 1;
    }
    count
}

fn bench_roundtrip(c: &mut Criterion) {
    let codec = Codec::default();
    let bytes = stream(1000);

    c.bench_function("walk_stream", |b| b.iter(|| walk(black_box(&bytes))));

    c.bench_function("decode_stream", |b| {
        b.iter(|| codec.decode_frame(black_box(&bytes)).messages.len())
    });

    c.bench_function("decode_encode_stream", |b| {
        b.iter(|| {
            let result = codec.decode_frame(black_box(&bytes));
            knxcodec::frame::encode_compliant(&codec, &result).map(|v| v.len()).unwrap_or(0)
        })
    });

    c.bench_function("decode_tunneling_request", |b| {
        b.iter(|| codec.decode_message(black_box(&TUNNELING_WRITE)).is_ok())
    });
}

criterion_group!(benches, bench_roundtrip);
criterion_main!(benches);
