//! Frame decoding benchmark suite.
//!
//! Benchmarks the reader-side frame buffer at different payload sizes and
//! chunkings:
//! - Payload sizes: 64 B, 4 KiB, 128 KiB (one long string chunk)
//! - Chunk sizes: whole stream, 1 KiB socket reads
//!
//! Run with: cargo bench --bench frame_buffer
//! Results saved to: target/criterion/

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use firefox_rdp::protocol::{FrameBuffer, encode_frame};

// ============================================================================
// Benchmark Parameters
// ============================================================================

const PAYLOAD_SIZES: &[usize] = &[64, 4 * 1024, 128 * 1024];
const FRAMES_PER_STREAM: usize = 16;
const SOCKET_READ: usize = 1024;

// ============================================================================
// Helpers
// ============================================================================

/// Builds a stream of `FRAMES_PER_STREAM` substring replies of `size` bytes.
fn build_stream(size: usize) -> Vec<u8> {
    let text = "x".repeat(size);
    let payload = serde_json::json!({ "from": "server1.conn0.longString7", "substring": text })
        .to_string();

    let mut stream = Vec::with_capacity((payload.len() + 8) * FRAMES_PER_STREAM);
    for _ in 0..FRAMES_PER_STREAM {
        stream.extend_from_slice(&encode_frame(&payload));
    }
    stream
}

// ============================================================================
// Benchmark: Decode
// ============================================================================

fn bench_decode_whole(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_whole");

    for &size in PAYLOAD_SIZES {
        let stream = build_stream(size);
        group.throughput(Throughput::Bytes(stream.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &stream, |b, stream| {
            b.iter(|| {
                let mut buffer = FrameBuffer::new();
                buffer.append(black_box(stream));
                let messages = buffer.extract_messages();
                assert_eq!(messages.len(), FRAMES_PER_STREAM);
                messages
            });
        });
    }

    group.finish();
}

fn bench_decode_chunked(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_chunked");

    for &size in PAYLOAD_SIZES {
        let stream = build_stream(size);
        group.throughput(Throughput::Bytes(stream.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &stream, |b, stream| {
            b.iter(|| {
                let mut buffer = FrameBuffer::new();
                let mut count = 0;
                for chunk in stream.chunks(SOCKET_READ) {
                    buffer.append(black_box(chunk));
                    count += buffer.extract_messages().len();
                }
                assert_eq!(count, FRAMES_PER_STREAM);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode_whole, bench_decode_chunked);
criterion_main!(benches);
