// benches/generation_bench.rs
//! Sampling and write throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use eventgen::generation::EventSampler;
use eventgen::recording::MemorySink;
use eventgen::{EventGenerator, GeneratorConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

fn bench_sampling(c: &mut Criterion) {
    let sampler = EventSampler::new().unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let mut event_id = 0i64;

    c.bench_function("sample_event", |b| {
        b.iter(|| {
            event_id += 1;
            black_box(sampler.sample(event_id, &mut rng))
        })
    });
}

fn bench_generation(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let mut group = c.benchmark_group("generate");

    for n_events in [10_000u64, 100_000] {
        group.throughput(Throughput::Elements(n_events));

        let path = dir.path().join(format!("bench_{}.parquet", n_events));
        let generator = EventGenerator::new(GeneratorConfig::for_output(n_events, &path)).unwrap();

        group.bench_with_input(BenchmarkId::new("memory", n_events), &n_events, |b, _| {
            let mut rng = StdRng::seed_from_u64(2);
            b.iter(|| generator.write_events(MemorySink::new(), &mut rng).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("parquet", n_events), &n_events, |b, _| {
            let mut rng = StdRng::seed_from_u64(3);
            b.iter(|| generator.run_with_rng(&mut rng).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sampling, bench_generation);
criterion_main!(benches);
