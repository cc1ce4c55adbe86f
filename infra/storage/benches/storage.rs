use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ggnet_cipher::{EncryptionKey, copy_encrypt};
use ggnet_storage::{
    CasTransform, IdentityTransform, PathTransform, Sanitizer, Store, TransformKind,
};
use std::hint::black_box;
use std::io::{Cursor, Read};
use std::time::Duration;
use tempfile::TempDir;

// ============================================================================
// Benchmark: Key Transform & Path Resolution
// ============================================================================

fn bench_path_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_resolution");

    group.bench_function("cas_transform", |b| {
        b.iter(|| black_box(CasTransform.transform(black_box("photos/2024/holiday.jpg"))));
    });

    group.bench_function("identity_transform", |b| {
        b.iter(|| black_box(IdentityTransform.transform(black_box("photos/2024/holiday.jpg"))));
    });

    let temp = TempDir::new().unwrap();
    for sanitizer in [Sanitizer::Lenient, Sanitizer::Strict] {
        let store = Store::builder()
            .root(temp.path().join("net"))
            .transform_kind(TransformKind::Cas)
            .sanitizer(sanitizer)
            .build()
            .unwrap();

        group.bench_function(BenchmarkId::new("resolve", format!("{sanitizer:?}")), |b| {
            b.iter(|| black_box(store.resolve("peer:3000", "holiday.jpg").unwrap()));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Object I/O
// ============================================================================

fn bench_object_io(c: &mut Criterion) {
    let mut group = c.benchmark_group("object_io");
    group.measurement_time(Duration::from_secs(10));

    let temp = TempDir::new().unwrap();
    let store = Store::builder()
        .root(temp.path().join("net"))
        .transform_kind(TransformKind::Cas)
        .build()
        .unwrap();
    let key = EncryptionKey::derive("bench-ikm", "bench-salt", "storage").unwrap();

    let sizes = [("1KB", 1024), ("64KB", 64 * 1024), ("1MB", 1024 * 1024)];

    for (name, size) in sizes {
        let data: Vec<u8> = (0..size).map(|i| u8::try_from(i % 256).unwrap()).collect();
        group.throughput(Throughput::Bytes(u64::try_from(size).unwrap_or(u64::MAX)));

        group.bench_with_input(BenchmarkId::new("write", name), &data, |b, data| {
            b.iter(|| store.write("bench", name, &mut Cursor::new(data)).unwrap());
        });

        group.bench_function(BenchmarkId::new("read", name), |b| {
            let mut buf = Vec::with_capacity(size);
            b.iter(|| {
                buf.clear();
                let (_, mut file) = store.read("bench", name).unwrap();
                black_box(file.read_to_end(&mut buf).unwrap());
            });
        });

        let mut sealed = Vec::new();
        copy_encrypt(&key, &mut Cursor::new(&data), &mut sealed).unwrap();

        group.bench_with_input(BenchmarkId::new("write_decrypted", name), &sealed, |b, sealed| {
            b.iter(|| {
                store.write_decrypted(&key, "bench", "sealed", &mut Cursor::new(sealed)).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_path_resolution, bench_object_io);
criterion_main!(benches);
