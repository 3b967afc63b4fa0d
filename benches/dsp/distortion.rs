//! Benchmarks for the waveshaping curves.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use motion_fx::dsp::distortion::{shape_buffer, Algorithm};

use crate::BLOCK_SIZES;

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| ((i as f32 / size as f32) * std::f32::consts::TAU).sin())
            .collect();

        for algorithm in Algorithm::ALL {
            let mut buffer = input.clone();
            let name = format!("{:?}", algorithm).to_lowercase();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    shape_buffer(black_box(&mut buffer), algorithm, 60.0, 0.7, 1.0);
                })
            });
        }
    }

    group.finish();
}
