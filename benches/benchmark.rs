// Snapshot build and cross-brand query benchmarks
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use modelmatch::{EngineConfig, MatchEngine, RawRecord, Snapshot};
use rand::prelude::*;
use std::sync::Arc;

const BRANDS: [&str; 6] = ["Acme", "Zen", "Nord", "Polar", "Kelvin", "Frost"];
const TYPES: [&str; 4] = ["SBS", "TMF", "BMF", "4DR"];
const COLORS: [&str; 5] = ["White", "Silver", "Black", "Beige", "Steel"];
const GRADES: [&str; 5] = ["1", "2", "3", "A+", "B"];

/// `items` catalog entries with `per_item` observations each
fn generate_records(items: usize, per_item: usize, rng: &mut StdRng) -> Vec<RawRecord> {
    let mut records = Vec::with_capacity(items * per_item);
    for i in 0..items {
        let brand = *BRANDS.choose(rng).unwrap_or(&BRANDS[0]);
        let product_type = *TYPES.choose(rng).unwrap_or(&TYPES[0]);
        let base_capacity = rng.random_range(150.0..900.0);
        for period in 0..per_item {
            let mut record = RawRecord::new(format!("{}-{}", brand, i));
            record.brand = Some(brand.to_string());
            record.product_type = Some(product_type.to_string());
            record.capacity = Some(base_capacity + rng.random_range(-5.0..5.0));
            record.color = COLORS.choose(rng).map(|c| c.to_string());
            record.energy_grade = GRADES.choose(rng).map(|g| g.to_string());
            record.voltage = Some(if rng.random_bool(0.8) { "220V" } else { "110V" }.to_string());
            record.wifi = Some(if rng.random_bool(0.5) { "Y" } else { "N" }.to_string());
            record.period = Some(format!("2024-{:02}", period % 12 + 1));
            records.push(record);
        }
    }
    records
}

fn benchmark_snapshot_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_build");
    group.sample_size(20);

    for items in [1_000, 10_000].iter() {
        let mut rng = StdRng::seed_from_u64(42);
        let records = generate_records(*items, 4, &mut rng);
        group.bench_with_input(BenchmarkId::new("build", items), &records, |b, records| {
            b.iter(|| {
                let snapshot = Snapshot::build(black_box(records)).unwrap();
                black_box(snapshot);
            });
        });
    }

    group.finish();
}

fn benchmark_recommend(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend");

    for items in [1_000, 10_000].iter() {
        let mut rng = StdRng::seed_from_u64(7);
        let records = generate_records(*items, 2, &mut rng);
        let engine = MatchEngine::new(EngineConfig::default()).unwrap();
        let snapshot = engine.load(&records).unwrap();
        let ids: Vec<String> = snapshot
            .profiles()
            .iter()
            .map(|p| p.model_id.clone())
            .collect();

        group.bench_with_input(BenchmarkId::new("top5", items), &ids, |b, ids| {
            let mut i = 0;
            b.iter(|| {
                let result = engine.recommend(black_box(&ids[i % ids.len()]), 5).unwrap();
                i += 1;
                black_box(result);
            });
        });
    }

    group.finish();
}

fn benchmark_concurrent_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_reads");

    let mut rng = StdRng::seed_from_u64(11);
    let records = generate_records(5_000, 2, &mut rng);
    let engine = Arc::new(MatchEngine::new(EngineConfig::default()).unwrap());
    let snapshot = engine.load(&records).unwrap();
    let query = snapshot.profiles()[0].model_id.clone();

    group.bench_function("recommend_10_threads", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..10)
                .map(|_| {
                    let engine = engine.clone();
                    let query = query.clone();
                    std::thread::spawn(move || engine.recommend(&query, 5))
                })
                .collect();
            for handle in handles {
                black_box(handle.join().unwrap().unwrap());
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_snapshot_build,
    benchmark_recommend,
    benchmark_concurrent_reads
);
criterion_main!(benches);
