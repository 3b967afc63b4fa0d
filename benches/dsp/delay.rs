//! Benchmarks for the delay ring transfers.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use motion_fx::dsp::delay::{read_position, DelayLine};

use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");
    let len = 96_000 + 512;

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();
        let mut output = vec![0.0f32; size];
        let mut ring = DelayLine::with_len(len).expect("delay ring allocation");

        // Fill, read back and feed back, wrapping around the ring end
        let mut write = len - size / 2;
        group.bench_with_input(BenchmarkId::new("block_cycle", size), &size, |b, _| {
            b.iter(|| {
                let read = read_position(write, 24_000, len);
                output.copy_from_slice(&input);
                ring.write_ramped(write, black_box(&input), 0.5, 0.6);
                ring.read_add(read, black_box(&mut output));
                ring.add_ramped(write, &output, 0.5, 0.6);
                write = (write + size) % len;
            })
        });
    }

    group.finish();
}
