use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ref_pool::{Pool, PoolEntity, Record};
use serde_json::json;
use std::hint::black_box;

#[derive(Clone)]
struct Item {
    id: u64,
    #[allow(dead_code)]
    title: String,
}

impl PoolEntity for Item {
    type Id = u64;

    fn identifier(&self) -> Option<&u64> {
        Some(&self.id)
    }
}

fn items(count: u64) -> Vec<Item> {
    (0..count)
        .map(|id| Item {
            id,
            title: format!("item {id}"),
        })
        .collect()
}

/// Benchmark: Inserting fresh identifiers into an empty pool
fn bench_add_fresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_fresh");

    for count in [100u64, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count));
        group.bench_with_input(BenchmarkId::new("items", count), count, |b, &count| {
            let batch = items(count);
            b.iter(|| {
                let mut pool = Pool::new();
                for item in batch.iter().cloned() {
                    black_box(pool.add(item).unwrap());
                }
                pool
            });
        });
    }

    group.finish();
}

/// Benchmark: Merging snapshots into an already populated pool
///
/// Every insertion hits an existing identifier, so this measures resolve
/// plus snapshot apply.
fn bench_merge_existing(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_existing");

    for count in [100u64, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count));
        group.bench_with_input(BenchmarkId::new("items", count), count, |b, &count| {
            let batch = items(count);
            let mut pool = Pool::new();
            pool.add_all(batch.iter().cloned()).unwrap();
            b.iter(|| black_box(pool.add_all(batch.iter().cloned()).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark: Schemaless JSON records
fn bench_add_records(c: &mut Criterion) {
    let records: Vec<Record> = (0..1_000)
        .map(|id| Record::from_value(json!({ "id": id, "title": "todo", "done": false })).unwrap())
        .collect();

    c.bench_function("add_records_1000", |b| {
        b.iter(|| {
            let mut pool = Pool::new();
            black_box(pool.add_all(records.iter().cloned()).unwrap());
            pool
        });
    });
}

criterion_group!(benches, bench_add_fresh, bench_merge_existing, bench_add_records);
criterion_main!(benches);
