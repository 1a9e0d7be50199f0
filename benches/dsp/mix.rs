//! Benchmarks for summing and downmixing.

use std::hint::black_box;

use brainwave::dsp::mix;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BLOCK_SIZES {
        let signal_a: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();
        let signal_b: Vec<f32> = (0..size).map(|i| (i as f32 * 0.15).cos()).collect();
        let mut output = vec![0.0f32; size];

        // Bus input summing
        group.bench_with_input(BenchmarkId::new("sum_into", size), &size, |b, _| {
            b.iter(|| {
                output.fill(0.0);
                mix::sum_into(black_box(&mut output), black_box(&signal_a));
                mix::sum_into(black_box(&mut output), black_box(&signal_b));
            })
        });

        // Stereo to mono (panner input, mono devices)
        group.bench_with_input(BenchmarkId::new("downmix", size), &size, |b, _| {
            b.iter(|| {
                mix::downmix(
                    black_box(&signal_a),
                    black_box(&signal_b),
                    black_box(&mut output),
                );
            })
        });
    }

    group.finish();
}
