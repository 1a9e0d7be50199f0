//! Benchmarks for equal-power panning.

use std::hint::black_box;

use brainwave::dsp::pan::pan_mono;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_pan(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/pan");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.01).sin()).collect();
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        // Hard left: the binaural case
        group.bench_with_input(BenchmarkId::new("hard_left", size), &size, |b, _| {
            b.iter(|| {
                pan_mono(black_box(&input), black_box(-1.0), &mut left, &mut right);
            })
        });

        group.bench_with_input(BenchmarkId::new("center", size), &size, |b, _| {
            b.iter(|| {
                pan_mono(black_box(&input), black_box(0.0), &mut left, &mut right);
            })
        });
    }

    group.finish();
}
