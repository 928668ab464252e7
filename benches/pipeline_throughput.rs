use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use meff_analysis::{analyze, bin_means, build_bins, AnalysisConfig};
use meff_core::{synthetic_ensemble, SyntheticSpec};

fn bench_pipeline(c: &mut Criterion) {
    let spec = SyntheticSpec {
        time_slices: 64,
        configurations: 200,
        ..SyntheticSpec::default()
    };
    let dataset = synthetic_ensemble(&spec, 4242).expect("ensemble");
    let config = AnalysisConfig::default().with_plateau(8, 16);
    c.bench_function("pipeline_throughput", |b| {
        b.iter(|| {
            let _ = analyze(black_box(&dataset), &config).expect("analyze");
        });
    });
}

fn bench_resampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("jackknife_bins");
    for configurations in [50usize, 200, 800] {
        let values: Vec<f64> = (0..configurations)
            .map(|idx| 1.0 + (idx as f64 * 0.37).sin() * 0.01)
            .collect();
        group.bench_with_input(
            BenchmarkId::new("linear", configurations),
            &values,
            |b, values| b.iter(|| bin_means(black_box(values)).expect("bins")),
        );
        group.bench_with_input(
            BenchmarkId::new("explicit", configurations),
            &values,
            |b, values| b.iter(|| build_bins(black_box(values)).expect("bins")),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_resampling);
criterion_main!(benches);
