use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::RngCore as _;

use msp::arith::gf2n::{Elem, Field, GF128, GF256};
use msp::arith::matrices::Matrix;

fn random_elem(field: &'static Field) -> Elem {
    let mut bytes = vec![0u8; field.size()];
    rand::thread_rng().fill_bytes(&mut bytes);
    field.elem(&bytes)
}

fn elem_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("gf2n");

    for (name, field) in [("gf128", &GF128), ("gf256", &GF256)] {
        group.bench_function(format!("{name}/mul"), |b| {
            b.iter_batched(
                || (random_elem(field), random_elem(field)),
                |(x, y)| x.mul(&y),
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("{name}/invert"), |b| {
            b.iter_batched(|| random_elem(field), |x| x.invert(), BatchSize::SmallInput)
        });
    }
    group.finish();
}

fn recovery_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("recovery");

    for (name, field) in [("gf128", &GF128), ("gf256", &GF256)] {
        let indexes: Vec<usize> = (1..=8).collect();
        let matrix = Matrix::vandermonde(field, &indexes, 8);
        group.bench_function(format!("{name}/8x8"), |b| b.iter(|| matrix.recovery()));
    }
    group.finish();
}

criterion_group!(benches, elem_benchmark, recovery_benchmark);
criterion_main!(benches);
