//! Benchmarks for the bilinear biquad.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use motion_fx::dsp::filter::{Biquad, BiquadCoefficients, FilterType};

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        for (name, filter_type) in [
            ("lowpass", FilterType::LowPass),
            ("highpass", FilterType::HighPass),
            ("bandpass", FilterType::BandPass),
        ] {
            let coeffs = BiquadCoefficients::design(filter_type, 1_000.0, 0.707, 48_000.0);
            let mut filter = Biquad::new();
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer), black_box(&coeffs));
                })
            });
        }

        // Coefficient design is done every block
        group.bench_with_input(BenchmarkId::new("design", size), &size, |b, _| {
            b.iter(|| {
                BiquadCoefficients::design(
                    black_box(FilterType::LowPass),
                    black_box(2_500.0),
                    black_box(0.707),
                    black_box(48_000.0),
                )
            })
        });
    }

    group.finish();
}
