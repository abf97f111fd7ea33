//! Parse and lookup benchmarks for the cluster index.
//!
//! Run with:
//! ```
//! cargo bench --bench index_lookup
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::time::Duration;

#[path = "../src/test_support.rs"]
mod test_support;

use otu_index::diagnostics::RecordingDiagnostics;
use otu_index::{ClusterIndex, IdTranslation, IndexSettings, QueryIds};
use test_support::generate_clusters;

const CUTOFFS: &[&str] = &["0.01", "0.02", "0.03", "0.04", "0.05", "0.10", "0.15", "0.20"];

fn build_index(translation: &IdTranslation) -> ClusterIndex {
    ClusterIndex::with_diagnostics(
        IndexSettings::with_precision(100).expect("valid precision"),
        translation.clone(),
        RecordingDiagnostics::new(),
    )
}

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(3));

    for element_count in [1_000usize, 10_000] {
        let generated = generate_clusters(element_count, element_count / 10, CUTOFFS, 0.4, 42);
        let translation: IdTranslation = generated.translation.iter().cloned().collect();
        let query: QueryIds = (0..5).map(|i| format!("g{:04}", i)).collect();

        group.throughput(Throughput::Elements(element_count as u64));
        group.bench_with_input(
            BenchmarkId::new("with_query", element_count),
            &generated.content,
            |b, content| {
                b.iter(|| {
                    let mut index = build_index(&translation);
                    index
                        .read_reader(content.as_bytes(), Some(&query))
                        .expect("read generated clusters");
                    black_box(index.len())
                })
            },
        );
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let generated = generate_clusters(10_000, 1_000, CUTOFFS, 0.4, 7);
    let translation: IdTranslation = generated.translation.iter().cloned().collect();
    let query: QueryIds = (0..50).map(|i| format!("g{:04}", i)).collect();
    let mut index = build_index(&translation);
    index
        .read_reader(generated.content.as_bytes(), Some(&query))
        .expect("read generated clusters");

    let mut group = c.benchmark_group("lookup");
    group.bench_function("clusters_for_element", |b| {
        b.iter(|| {
            for i in 0..50 {
                let gid = format!("g{:04}", i);
                let found = index.clusters_for_element(black_box(0.05), &gid);
                black_box(found.map(|found| found.len()).unwrap_or_default());
            }
        })
    });
    group.bench_function("sorted_thresholds", |b| {
        b.iter(|| black_box(index.sorted_thresholds(true).map(|keys| keys.len())))
    });
    group.finish();
}

criterion_group!(benches, bench_read, bench_lookup);
criterion_main!(benches);
