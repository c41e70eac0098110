use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use linfa::benchmarks::config;
use linfa::prelude::*;
use linfa_qsvm::{KernelMethod, MultiplierEncoding, QSvm, QuboProblem, SimulatedAnnealing};
use ndarray::{Array1, Array2};
use ndarray_rand::{
    rand::distributions::Uniform, rand::rngs::SmallRng, rand::SeedableRng, RandomExt,
};

fn to_binary(value: f64) -> bool {
    value >= 0.5
}

fn get_dataset(
    rng: &mut SmallRng,
    size: usize,
    nfeatures: usize,
) -> DatasetBase<Array2<f64>, Array1<bool>> {
    let features = Array2::random_using((size, nfeatures), Uniform::from(-1. ..1.), rng);
    let targets = Array1::random_using(size, Uniform::from(0. ..1.), rng).mapv(to_binary);
    Dataset::new(features, targets)
}

fn qubo_construction_bench(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);

    let sample_counts = &[16, 64, 256];
    let encoding = MultiplierEncoding::new(2, 2).unwrap();
    let kernel = KernelMethod::Gaussian(0.5);

    let mut group = c.benchmark_group("qubo_construction");
    config::set_default_benchmark_configs(&mut group);

    for nsamples in sample_counts.iter() {
        let records = Array2::random_using((*nsamples, 4), Uniform::from(-1. ..1.), &mut rng);
        let signs = Array1::random_using(*nsamples, Uniform::from(0. ..1.), &mut rng)
            .mapv(|value| if value >= 0.5 { 1.0 } else { -1.0 });
        let gram = kernel.gram(&records);

        group.bench_with_input(
            BenchmarkId::from_parameter(nsamples),
            &(gram, signs),
            |b, (gram, signs)| {
                b.iter(|| QuboProblem::from_dual(gram.view(), signs.view(), &encoding, 0.5))
            },
        );
    }

    group.finish();
}

fn training_bench(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);

    let sample_counts = &[8, 16, 32];

    let mut group = c.benchmark_group("qsvm_training");
    config::set_default_benchmark_configs(&mut group);

    for nsamples in sample_counts.iter() {
        let dataset = get_dataset(&mut rng, *nsamples, 4);
        let params = QSvm::params()
            .gaussian_kernel(0.5)
            .oracle(SimulatedAnnealing::default().reads(10).sweeps(100).seed(42));

        group.bench_with_input(BenchmarkId::from_parameter(nsamples), &dataset, |b, d| {
            b.iter(|| params.fit(d))
        });
    }

    group.finish();
}

#[cfg(not(target_os = "windows"))]
criterion_group! {
    name = benches;
    config = config::get_default_profiling_configs();
    targets = qubo_construction_bench, training_bench
}
#[cfg(target_os = "windows")]
criterion_group!(benches, qubo_construction_bench, training_bench);

criterion_main!(benches);
