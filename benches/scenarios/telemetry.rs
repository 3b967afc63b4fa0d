//! Benchmarks for telemetry decoding and the mapping tick.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use motion_fx::{
    mapping::{MappableParam, MappingRuntime, MappingTable},
    telemetry::{self, Axis, LinkStatus, TelemetryDecoder},
    ParameterStore,
};

pub fn bench_telemetry(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/telemetry");

    for &readings in &[10usize, 100, 1_000] {
        let stream: Vec<u8> = (0..readings)
            .flat_map(|i| {
                let axis = if i % 2 == 0 { 'G' } else { 'B' };
                let sign = if i % 3 == 0 { '-' } else { '+' };
                format!("{}{}{:03}\r", axis, sign, i % 100).into_bytes()
            })
            .collect();

        let mut decoder = TelemetryDecoder::new();
        group.bench_with_input(BenchmarkId::new("decode", readings), &readings, |b, _| {
            b.iter(|| decoder.decode(black_box(&stream)).count())
        });

        // Decode into the channel, then one control tick
        let (mut sender, receiver) = telemetry::channel(1024);
        let status = LinkStatus::new();
        status.set_connected(true);
        let table = Arc::new(MappingTable::new());
        table.assign(Axis::X, MappableParam::EqCutoff);
        table.assign(Axis::Y, MappableParam::Drive);
        let mut runtime = MappingRuntime::new(receiver, table, Arc::new(ParameterStore::new()), status, 50);

        group.bench_with_input(BenchmarkId::new("decode_and_tick", readings), &readings, |b, _| {
            b.iter(|| {
                for message in decoder.decode(&stream) {
                    sender.push(message);
                }
                black_box(runtime.tick());
                runtime.source_mut().clear();
            })
        });
    }

    group.finish();
}
