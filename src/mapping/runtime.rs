//! Control-rate mapping of telemetry onto parameters.
//!
//! Every tick drains a batch of the newest readings, averages their signed
//! magnitudes and moves the parameter mapped to the batch's last axis:
//!
//! ```text
//!   normalized = mean / 100                               (linear)
//!              = sign(mean) · ln(1 + 20·|mean|/100) / ln 21  (frequency)
//!
//!   value      = mid + (max - mid) · normalized,  mid = (min + max) / 2
//! ```
//!
//! A reading of ±100 sweeps a linear parameter to its bounds. Anything beyond
//! is clamped to `[min, max]`.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use flume::{RecvTimeoutError, Sender};

use super::table::{MappableParam, MappingTable};
use crate::params::{ParamScale, ParamSpec, ParameterStore};
use crate::telemetry::{Axis, LinkStatus, MessageSource};

/// Full-scale telemetry magnitude.
pub const FULL_SCALE: f32 = 100.0;

/// Log curve steepness for frequency parameters.
const LOG_CURVE: f32 = 20.0;

/// Normalize a mean reading for a parameter's scale. ±`FULL_SCALE` maps to ±1.
pub fn normalize(mean: f32, scale: ParamScale) -> f32 {
    match scale {
        ParamScale::Linear => mean / FULL_SCALE,
        ParamScale::Frequency => {
            let curved = (1.0 + LOG_CURVE * mean.abs() / FULL_SCALE).ln() / (1.0 + LOG_CURVE).ln();
            curved.copysign(mean)
        }
    }
}

/// Parameter value for a mean reading, always inside `[min, max]`.
pub fn target_value(spec: &ParamSpec, mean: f32) -> f32 {
    let mid = spec.midpoint();
    spec.clamp(mid + (spec.max - mid) * normalize(mean, spec.scale))
}

/// What a tick wrote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappingUpdate {
    pub axis: Axis,
    pub param: MappableParam,
    pub mean: f32,
    pub value: f32,
    /// Number of readings averaged.
    pub batch: usize,
}

pub struct MappingRuntime<S> {
    source: S,
    table: Arc<MappingTable>,
    store: Arc<ParameterStore>,
    status: LinkStatus,
    batch_size: usize,
}

impl<S: MessageSource> MappingRuntime<S> {
    pub fn new(
        source: S,
        table: Arc<MappingTable>,
        store: Arc<ParameterStore>,
        status: LinkStatus,
        batch_size: usize,
    ) -> Self {
        Self {
            source,
            table,
            store,
            status,
            batch_size: batch_size.max(1),
        }
    }

    pub fn table(&self) -> &Arc<MappingTable> {
        &self.table
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Run one control step. Does nothing while the link is down. Readings
    /// are consumed even when their axis is unmapped.
    pub fn tick(&mut self) -> Option<MappingUpdate> {
        if !self.status.is_connected() {
            return None;
        }

        let mut sum = 0.0f64;
        let mut count = 0usize;
        let mut last_axis = None;
        while count < self.batch_size {
            let Some(message) = self.source.pop_latest() else {
                break;
            };
            sum += message.signed_value();
            count += 1;
            last_axis = Some(message.axis);
        }

        let axis = last_axis?;
        let mean = (sum / count as f64) as f32;
        let param = self.table.get(axis)?;

        let id = param.param_id();
        let value = self.store.set(id, target_value(&id.spec(), mean));
        log::debug!("{:?} axis: mean {:.2} over {} -> {:?} = {:.3}", axis, mean, count, id, value);

        Some(MappingUpdate {
            axis,
            param,
            mean,
            value,
            batch: count,
        })
    }
}

/// Drives a [`MappingRuntime`] at a fixed interval on its own thread.
pub struct ControlTimer<S> {
    stop_tx: Option<Sender<()>>,
    handle: Option<thread::JoinHandle<MappingRuntime<S>>>,
}

impl<S> ControlTimer<S>
where
    S: MessageSource + Send + 'static,
{
    pub fn spawn(mut runtime: MappingRuntime<S>, interval: Duration) -> std::io::Result<Self> {
        let (stop_tx, stop_rx) = flume::bounded::<()>(1);

        let handle = thread::Builder::new()
            .name("mapping-timer".to_string())
            .spawn(move || {
                log::info!("mapping timer started ({:?} interval)", interval);
                let mut next = Instant::now() + interval;
                loop {
                    match stop_rx.recv_deadline(next) {
                        Err(RecvTimeoutError::Timeout) => {
                            runtime.tick();
                            next += interval;
                            let now = Instant::now();
                            if next < now {
                                // fell behind; don't burst to catch up
                                next = now + interval;
                            }
                        }
                        _ => break,
                    }
                }
                log::info!("mapping timer stopped");
                runtime
            })?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Stop ticking and hand the runtime back.
    pub fn stop(&mut self) -> Option<MappingRuntime<S>> {
        drop(self.stop_tx.take());
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(runtime) => Some(runtime),
            Err(_) => {
                log::error!("mapping timer thread panicked");
                None
            }
        }
    }
}

impl<S> Drop for ControlTimer<S> {
    fn drop(&mut self) {
        drop(self.stop_tx.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamId;
    use crate::telemetry::{Message, Sign};
    use std::collections::VecDeque;

    /// Newest-first source over a fixed list (last element = newest).
    #[derive(Default)]
    struct Stack(VecDeque<Message>);

    impl MessageSource for Stack {
        fn pop_latest(&mut self) -> Option<Message> {
            self.0.pop_back()
        }
    }

    fn x(value: i64) -> Message {
        reading(Axis::X, value)
    }

    fn reading(axis: Axis, value: i64) -> Message {
        let sign = if value < 0 { Sign::Negative } else { Sign::Positive };
        Message::new(axis, sign, value.unsigned_abs() as u32)
    }

    fn runtime(messages: Vec<Message>) -> (MappingRuntime<Stack>, Arc<ParameterStore>, LinkStatus) {
        let table = Arc::new(MappingTable::new());
        let store = Arc::new(ParameterStore::new());
        let status = LinkStatus::new();
        status.set_connected(true);
        let runtime = MappingRuntime::new(
            Stack(messages.into()),
            table,
            store.clone(),
            status.clone(),
            50,
        );
        (runtime, store, status)
    }

    #[test]
    fn test_linear_midpoint_and_extremes() {
        let spec = ParamId::Drive.spec();
        assert_eq!(target_value(&spec, 0.0), 50.0);
        assert_eq!(target_value(&spec, 100.0), 100.0);
        assert_eq!(target_value(&spec, -100.0), 0.0);
        assert_eq!(target_value(&spec, 50.0), 75.0);
    }

    #[test]
    fn test_frequency_curve_is_logarithmic() {
        assert_eq!(normalize(0.0, ParamScale::Frequency), 0.0);
        assert!((normalize(100.0, ParamScale::Frequency) - 1.0).abs() < 1e-6);
        assert!((normalize(-100.0, ParamScale::Frequency) + 1.0).abs() < 1e-6);
        // small readings move faster than linear
        assert!(normalize(10.0, ParamScale::Frequency) > 0.1);
    }

    #[test]
    fn test_target_clamped_to_range() {
        let spec = ParamId::EqCutoff.spec();
        assert_eq!(target_value(&spec, 1_000.0), 20_000.0);
        assert_eq!(target_value(&spec, -1_000.0), 20.0);

        let spec = ParamId::Mix.spec();
        assert_eq!(target_value(&spec, 250.0), 1.0);
        assert_eq!(target_value(&spec, -250.0), 0.0);
    }

    #[test]
    fn test_tick_writes_mean_of_batch() {
        let (mut runtime, store, _status) = runtime(vec![x(20), x(-40), x(80)]);
        runtime.table().assign(Axis::X, MappableParam::Drive);

        let update = runtime.tick().unwrap();

        // mean = (20 - 40 + 80) / 3 = 20 -> 50 + 50 × 0.2
        assert_eq!(update.batch, 3);
        assert!((update.mean - 20.0).abs() < 1e-5);
        assert!((store.get(ParamId::Drive) - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_target_axis_is_last_drained() {
        // newest is Y, oldest is X: X is drained last
        let (mut runtime, store, _status) = runtime(vec![x(100), reading(Axis::Y, 100)]);
        runtime.table().assign(Axis::X, MappableParam::Mix);
        runtime.table().assign(Axis::Y, MappableParam::Anger);

        let update = runtime.tick().unwrap();

        assert_eq!(update.axis, Axis::X);
        assert_eq!(store.get(ParamId::Mix), 1.0);
        assert_eq!(store.get(ParamId::Anger), ParamId::Anger.spec().default);
    }

    #[test]
    fn test_batch_is_bounded_and_newest_first() {
        let mut messages: Vec<Message> = (0..60).map(|_| x(-100)).collect();
        messages.extend((0..50).map(|_| x(100)));
        let (mut runtime, store, _status) = runtime(messages);
        runtime.table().assign(Axis::X, MappableParam::Mix);

        let update = runtime.tick().unwrap();

        assert_eq!(update.batch, 50);
        assert_eq!(store.get(ParamId::Mix), 1.0);
        assert_eq!(runtime.source_mut().0.len(), 60);
    }

    #[test]
    fn test_idle_when_disconnected() {
        let (mut runtime, store, status) = runtime(vec![x(100)]);
        runtime.table().assign(Axis::X, MappableParam::Drive);
        status.set_connected(false);

        assert!(runtime.tick().is_none());
        assert_eq!(store.get(ParamId::Drive), 0.0);
        assert_eq!(runtime.source_mut().0.len(), 1);
    }

    #[test]
    fn test_unmapped_axis_consumes_without_writing() {
        let (mut runtime, store, _status) = runtime(vec![x(100)]);

        assert!(runtime.tick().is_none());
        assert!(runtime.source_mut().0.is_empty());
        for id in ParamId::ALL {
            assert_eq!(store.get(id), id.spec().default);
        }
    }

    #[test]
    fn test_empty_source_is_noop() {
        let (mut runtime, _store, _status) = runtime(vec![]);
        runtime.table().assign(Axis::X, MappableParam::Drive);
        assert!(runtime.tick().is_none());
    }

    #[test]
    fn test_timer_ticks_and_returns_runtime() {
        let (runtime, store, _status) = runtime(vec![x(100)]);
        runtime.table().assign(Axis::X, MappableParam::DelayFeedback);

        let mut timer = ControlTimer::spawn(runtime, Duration::from_millis(5)).unwrap();
        let deadline = Instant::now() + Duration::from_secs(2);
        while store.get(ParamId::DelayFeedback) != 1.0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(2));
        }

        let runtime = timer.stop().unwrap();
        assert_eq!(store.get(ParamId::DelayFeedback), 1.0);
        assert_eq!(runtime.table().get(Axis::X), Some(MappableParam::DelayFeedback));
    }
}
