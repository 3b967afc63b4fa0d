//! Benchmarks for the complete effects chain.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use motion_fx::{AudioBlock, EffectsChain, ParamId, ParameterStore};

use crate::BLOCK_SIZES;

fn prepared_chain(settings: &[(ParamId, f32)], size: usize) -> EffectsChain {
    let store = Arc::new(ParameterStore::new());
    for &(id, value) in settings {
        store.set(id, value);
    }
    let mut chain = EffectsChain::new(store);
    chain.prepare(48_000.0, size, 2).expect("valid stream spec");
    chain
}

pub fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/chain");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size * 2)
            .map(|i| 0.5 * ((i % size) as f32 * 0.05).sin())
            .collect();
        let mut buffer = input.clone();

        // === DEFAULT: stock settings, stereo ===
        let mut chain = prepared_chain(&[], size);
        group.bench_with_input(BenchmarkId::new("stereo_default", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                chain.process(black_box(&mut AudioBlock::new(&mut buffer, 2, size)));
            })
        });

        // === HEAVY: erf shaper, resonant band-pass, long feedback ===
        let mut chain = prepared_chain(
            &[
                (ParamId::EqType, 2.0),
                (ParamId::EqQ, 8.0),
                (ParamId::Drive, 90.0),
                (ParamId::Anger, 0.9),
                (ParamId::DistortionType, 2.0),
                (ParamId::DelayFeedback, 0.9),
                (ParamId::DelayTimeMs, 1_500.0),
            ],
            size,
        );
        group.bench_with_input(BenchmarkId::new("stereo_heavy", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                chain.process(black_box(&mut AudioBlock::new(&mut buffer, 2, size)));
            })
        });
    }

    group.finish();
}
