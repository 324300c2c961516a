//! Bulk insert throughput per strategy.

use std::time::{Duration, Instant};

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use bulkops::bulk::StrategyKind;
use bulkops::model::create_entities;
use bulkops::testutil::setup_file_database;

const ENTITY_COUNTS: &[usize] = &[10_000, 100_000];
const BATCH_SIZE: usize = 1000;

fn bench_bulk_persist(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let (_dir, db) = rt.block_on(setup_file_database());

    for &n in ENTITY_COUNTS {
        let entities = create_entities(n);

        let mut group = c.benchmark_group(format!("bulk_persist/rows_{}", n));
        group.sample_size(10);
        group.measurement_time(Duration::from_secs(20));
        group.throughput(Throughput::Elements(n as u64));

        for kind in StrategyKind::ALL {
            let ops = kind.build(db.clone(), BATCH_SIZE);
            group.bench_with_input(BenchmarkId::new(ops.name(), n), &n, |b, _| {
                // only the persist call is timed; count and cleanup run outside
                b.iter_custom(|iters| {
                    rt.block_on(async {
                        let mut total = Duration::ZERO;
                        for _ in 0..iters {
                            let start = Instant::now();
                            ops.bulk_persist(&entities).await.unwrap();
                            total += start.elapsed();
                            assert_eq!(db.count().await.unwrap(), n as i64);
                            db.clear().await.unwrap();
                        }
                        total
                    })
                })
            });
        }
        group.finish();
    }

    rt.block_on(db.close());
}

criterion_group!(benches, bench_bulk_persist);
criterion_main!(benches);
