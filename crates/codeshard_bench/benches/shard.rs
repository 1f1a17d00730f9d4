//! Shard build and read benchmarks.

use codeshard_bench::generate_documents;
use codeshard_core::{Shard, ShardBuilder};
use codeshard_storage::{FileIndexFile, InMemoryIndexFile};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use tempfile::TempDir;

/// Benchmark building a shard in memory.
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for count in [10, 100, 1000] {
        let docs = generate_documents(count, 2048);
        group.throughput(Throughput::Bytes((count * 2048) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &docs, |b, docs| {
            b.iter(|| {
                let mut builder = ShardBuilder::default();
                for doc in docs {
                    builder.add(doc.clone()).unwrap();
                }
                black_box(builder.finish(Vec::new()).unwrap());
            });
        });
    }

    group.finish();
}

/// Benchmark building and publishing a shard file.
fn bench_build_to_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_to_file");

    // File operations are slower
    group.sample_size(20);

    let docs = generate_documents(200, 2048);
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bench.shard");
    group.throughput(Throughput::Bytes((200 * 2048) as u64));
    group.bench_function("200_docs", |b| {
        b.iter(|| {
            let mut builder = ShardBuilder::default();
            for doc in &docs {
                builder.add(doc.clone()).unwrap();
            }
            black_box(builder.finish_to_path(&path).unwrap());
        });
    });

    group.finish();
}

/// Benchmark opening a shard and reading documents back.
fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");

    let docs = generate_documents(500, 2048);
    let mut builder = ShardBuilder::default();
    for doc in &docs {
        builder.add(doc.clone()).unwrap();
    }
    let (bytes, _) = builder.finish(Vec::new()).unwrap();
    let file: Arc<dyn codeshard_storage::IndexFile> =
        Arc::new(InMemoryIndexFile::new("bench", bytes.clone()).unwrap());

    group.bench_function("open_memory", |b| {
        b.iter(|| black_box(Shard::open(Arc::clone(&file)).unwrap()));
    });

    let shard = Shard::open(Arc::clone(&file)).unwrap();
    group.throughput(Throughput::Bytes(2048));
    group.bench_function("content_memory", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % docs.len();
            black_box(shard.content(i).unwrap());
        });
    });
    group.bench_function("newlines_memory", |b| {
        let mut buf = Vec::new();
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % docs.len();
            shard.newlines_into(i, &mut buf).unwrap();
            black_box(&buf);
        });
    });

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bench.shard");
    std::fs::write(&path, &bytes).unwrap();
    let shard = Shard::open(Arc::new(FileIndexFile::open(&path).unwrap())).unwrap();
    group.bench_function("document_file", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % docs.len();
            black_box(shard.document(i).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_build_to_file, bench_read);

criterion_main!(benches);
