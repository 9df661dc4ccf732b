use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kmethods::{Kernel, QpSolver, RBFKernel, SMOSolver};

/// Deterministic two-cluster problem of the given size
fn make_problem(n: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut samples = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
        let jitter = 0.1 * ((i / 2) as f64);
        samples.push(vec![sign * (2.0 + jitter), sign * (1.5 - 0.05 * jitter)]);
        labels.push(sign);
    }
    (samples, labels)
}

fn bench_smo_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("smo_solve");
    let kernel = RBFKernel::new();

    for &n in &[20usize, 50, 100] {
        let (samples, labels) = make_problem(n);
        let gram = kernel.gram(&samples);
        let solver = SMOSolver::default();

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| solver.solve(&gram, &labels, 1.0).unwrap());
        });
    }
    group.finish();
}

fn bench_gram_computation(c: &mut Criterion) {
    let kernel = RBFKernel::new();
    let (samples, _) = make_problem(100);

    c.bench_function("gram_100", |b| {
        b.iter(|| kernel.gram(&samples));
    });
}

criterion_group!(benches, bench_smo_solve, bench_gram_computation);
criterion_main!(benches);
