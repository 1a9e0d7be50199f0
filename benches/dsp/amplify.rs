//! Benchmarks for gain staging.

use std::hint::black_box;

use brainwave::dsp::amplify::{apply_gain, db_to_gain};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_amplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/amplify");

    for &size in BLOCK_SIZES {
        let signal: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();
        let mut buffer = signal.clone();
        let gain = db_to_gain(-20.0);

        group.bench_with_input(BenchmarkId::new("apply_gain", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&signal);
                apply_gain(black_box(&mut buffer), black_box(gain));
            })
        });
    }

    group.bench_function("db_to_gain", |b| {
        b.iter(|| db_to_gain(black_box(-12.5)))
    });

    group.finish();
}
