//! Benchmarks for item-memory operations.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use itemmem::{
    BindingEncoder, EncoderConfig, HypervectorGenerator, Primitives, Representation,
};

const DIMENSIONS: usize = 10_000;

fn benchmark_vector_generation(c: &mut Criterion) {
    let entropy = HypervectorGenerator::new(DIMENSIONS, Representation::Binary).unwrap();
    c.bench_function("generate_entropy", |b| b.iter(|| black_box(entropy.generate())));

    let seeded = HypervectorGenerator::with_seed(DIMENSIONS, Representation::Bipolar, 42).unwrap();
    c.bench_function("generate_seeded", |b| b.iter(|| black_box(seeded.generate())));
}

fn benchmark_bind(c: &mut Criterion) {
    for mode in [Representation::Binary, Representation::Bipolar] {
        let gen = HypervectorGenerator::with_seed(DIMENSIONS, mode, 7).unwrap();
        let item = gen.generate();
        let continuous = gen.generate();

        c.bench_function(&format!("bind_{}", mode), |b| {
            b.iter(|| Primitives::bind(black_box(&item), black_box(&continuous), mode))
        });
    }
}

fn benchmark_encode_cycle(c: &mut Criterion) {
    let mut encoder =
        BindingEncoder::new(EncoderConfig::new(DIMENSIONS, Representation::Binary)).unwrap();

    c.bench_function("encode_cycle", |b| b.iter(|| black_box(encoder.encode_cycle())));
}

criterion_group!(
    benches,
    benchmark_vector_generation,
    benchmark_bind,
    benchmark_encode_cycle,
);

criterion_main!(benches);
