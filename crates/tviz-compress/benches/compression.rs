use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tviz_compress::{shuffle, Compressor, ZlibCompressor};

fn bench_compression(c: &mut Criterion) {
    // smooth float32 ramp, typical of activation maps
    let data: Vec<u8> = (0..256 * 1024)
        .flat_map(|i| ((i as f32) * 0.001).sin().to_le_bytes())
        .collect();

    let mut group = c.benchmark_group("compression");
    group.throughput(Throughput::Bytes(data.len() as u64));

    let zlib = ZlibCompressor::fastest();
    group.bench_function("zlib-1", |b| b.iter(|| zlib.compress(black_box(&data))));

    group.bench_function("shuffle-4", |b| b.iter(|| shuffle(black_box(&data), 4)));

    group.bench_function("shuffle-4+zlib-1", |b| {
        b.iter(|| {
            let shuffled = shuffle(black_box(&data), 4)?;
            zlib.compress(&shuffled)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_compression);
criterion_main!(benches);
