//! Benchmarks for rendering a binaural session graph.

use std::hint::black_box;

use brainwave::io::OfflineOutput;
use brainwave::{BinauralGenerator, ControllerConfig, GraphBackend, SessionParameters};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

type OfflineGenerator = BinauralGenerator<GraphBackend<OfflineOutput>>;

fn playing(test_tone: bool) -> Option<OfflineGenerator> {
    let mut generator = BinauralGenerator::with_config(
        GraphBackend::new(OfflineOutput::new(48_000.0)),
        SessionParameters::default(),
        ControllerConfig { test_tone },
    );
    generator.start().ok()?;
    Some(generator)
}

pub fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/session");

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        // Two ears: osc → pan → channel, x2
        if let Some(generator) = playing(false) {
            let graph = generator.backend().graph().clone();
            group.bench_with_input(BenchmarkId::new("binaural", size), &size, |b, _| {
                b.iter(|| {
                    if let Ok(mut graph) = graph.lock() {
                        graph.render(black_box(&mut left), black_box(&mut right), 48_000.0);
                    }
                })
            });
        }

        // Same plus the test tone summed at the destination
        if let Some(generator) = playing(true) {
            let graph = generator.backend().graph().clone();
            group.bench_with_input(BenchmarkId::new("with_test_tone", size), &size, |b, _| {
                b.iter(|| {
                    if let Ok(mut graph) = graph.lock() {
                        graph.render(black_box(&mut left), black_box(&mut right), 48_000.0);
                    }
                })
            });
        }
    }

    // Retune while playing, as a slider drag does
    if let Some(mut generator) = playing(false) {
        let mut beat = 4.0f32;
        group.bench_function("retune", |b| {
            b.iter(|| {
                beat = if beat >= 8.0 { 4.0 } else { beat + 0.1 };
                generator.set_beat(black_box(beat));
            })
        });
    }

    group.finish();
}
