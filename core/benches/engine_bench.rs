use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use message_compress::buffer::SegmentedBuffer;
use message_compress::compression::{CompressionAlgorithm, CompressionEngine};

fn payload(size: usize) -> Vec<u8> {
    b"{\"id\":42,\"name\":\"segment\",\"tags\":[\"a\",\"b\"]}"
        .iter()
        .copied()
        .cycle()
        .take(size)
        .collect()
}

fn benchmark_engine(c: &mut Criterion) {
    let engine = CompressionEngine::default();
    let mut group = c.benchmark_group("engine");

    let sizes = vec![("1KB", 1024), ("64KB", 65_536), ("1MB", 1_048_576)];

    for (name, size) in sizes {
        let data = payload(size);
        let input = SegmentedBuffer::chunked(&data, 16 * 1024);
        group.throughput(Throughput::Bytes(size as u64));

        for alg in [CompressionAlgorithm::Deflate, CompressionAlgorithm::Gzip, CompressionAlgorithm::Lz4] {
            group.bench_with_input(BenchmarkId::new(format!("compress/{}", alg), name), &input, |b, input| {
                b.iter(|| {
                    let mut out = SegmentedBuffer::new();
                    black_box(engine.compress(alg, input, &mut out));
                    out
                });
            });

            let mut compressed = SegmentedBuffer::new();
            engine.compress(alg, &input, &mut compressed);

            group.bench_with_input(BenchmarkId::new(format!("decompress/{}", alg), name), &compressed, |b, data| {
                b.iter(|| {
                    let mut out = SegmentedBuffer::new();
                    black_box(engine.decompress(alg, data, &mut out).unwrap());
                    out
                });
            });
        }
    }

    group.finish();
}

fn benchmark_pass_through(c: &mut Criterion) {
    let engine = CompressionEngine::default();
    let input = SegmentedBuffer::chunked(&payload(1_048_576), 1024);

    c.bench_function("identity_1MB_1024_segments", |b| {
        b.iter(|| {
            let mut out = SegmentedBuffer::with_capacity(input.segment_count());
            black_box(engine.compress(CompressionAlgorithm::None, &input, &mut out));
            out
        });
    });
}

criterion_group!(benches, benchmark_engine, benchmark_pass_through);
criterion_main!(benches);
