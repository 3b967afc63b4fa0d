//! Benchmarks for signal mixing operations.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use motion_fx::dsp::mix;

use crate::BLOCK_SIZES;

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BLOCK_SIZES {
        // Generate test signals
        let signal_a: Vec<f32> = (0..size)
            .map(|i| (i as f32 * 0.1).sin())
            .collect();
        let signal_b: Vec<f32> = (0..size)
            .map(|i| (i as f32 * 0.15).cos())
            .collect();

        // Dry/wet mixing (common for effects)
        let dry = signal_a.clone();
        let mut wet = signal_b.clone();
        group.bench_with_input(BenchmarkId::new("dry_wet", size), &size, |b, _| {
            b.iter(|| {
                wet.copy_from_slice(&signal_b);
                mix::apply_dry_wet(black_box(&dry), black_box(&mut wet), black_box(0.3));
            })
        });

        // Ramped gain transfer (delay fill)
        let mut output = vec![0.0f32; size];
        group.bench_with_input(BenchmarkId::new("copy_with_ramp", size), &size, |b, _| {
            b.iter(|| {
                mix::copy_with_ramp(
                    black_box(&mut output),
                    black_box(&signal_a),
                    black_box(0.2),
                    black_box(0.8),
                    0,
                    size,
                );
            })
        });
    }

    group.finish();
}
