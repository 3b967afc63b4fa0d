//! MotionFx - wires the audio stream, the link reader and the mapping timer

use std::f32::consts::TAU;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use flume::Sender;

use motion_fx::{
    mapping::{ControlTimer, MappingRuntime, MappingTable},
    telemetry::{self, Axis, ChannelSource, LinkReader, LinkStatus},
    AudioBlock, EffectsChain, EngineConfig, ParameterStore, MAX_BLOCK_SIZE,
};

/// Where telemetry bytes come from.
pub enum TelemetryInput {
    Stdin,
    File(PathBuf),
}

pub struct MotionFx {
    config: EngineConfig,
    input: TelemetryInput,
}

impl MotionFx {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            input: TelemetryInput::Stdin,
        }
    }

    pub fn telemetry(mut self, input: TelemetryInput) -> Self {
        self.input = input;
        self
    }

    /// Run until `seconds` have passed, or forever when `None`.
    pub fn run_for(self, seconds: Option<f64>) -> EyreResult<()> {
        let store = Arc::new(ParameterStore::new());
        let table = Arc::new(MappingTable::new());
        self.config.apply_parameters(&store);
        self.config.apply_mappings(&table);

        // Set up audio
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let stream_config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = stream_config.sample_rate().0 as f32;
        let channels = stream_config.channels() as usize;

        let mut chain = EffectsChain::new(store.clone());
        chain
            .prepare(sample_rate, MAX_BLOCK_SIZE, channels)
            .wrap_err("failed to prepare effects chain")?;

        println!("=== motionfx ===");
        println!("Sample rate: {} Hz", sample_rate);
        println!("Channels: {}", channels);
        println!("X axis -> {:?}", table.get(Axis::X));
        println!("Y axis -> {:?}", table.get(Axis::Y));
        println!();

        // Telemetry: forwarder -> link reader -> channel -> mapping timer
        let (bytes_tx, source) = ChannelSource::bounded(64);
        spawn_forwarder(self.input, bytes_tx)?;

        let (sender, receiver) = telemetry::channel(self.config.channel_capacity);
        let status = LinkStatus::new();
        let mut reader = LinkReader::spawn("sensor", source, sender, status.clone(), self.config.link_options())
            .wrap_err("failed to start link reader")?;

        let runtime = MappingRuntime::new(receiver, table.clone(), store.clone(), status, self.config.batch_size);
        let mut timer =
            ControlTimer::spawn(runtime, self.config.control_interval()).wrap_err("failed to start mapping timer")?;

        // Audio: test tone through the chain, planar scratch for the block view
        let mut planar = vec![0.0f32; MAX_BLOCK_SIZE * channels];
        let mut tone = TestTone::new(110.0, sample_rate);

        let stream = device.build_output_stream(
            &stream_config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let buffer = &mut planar[..frames * channels];

                    for i in 0..frames {
                        let s = tone.next_sample();
                        for ch in 0..channels {
                            buffer[ch * frames + i] = s;
                        }
                    }

                    chain.process(&mut AudioBlock::new(buffer, channels, frames));

                    // Interleave into the device buffer
                    let out_off = frames_written * channels;
                    for i in 0..frames {
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = buffer[ch * frames + i];
                        }
                    }

                    frames_written += frames;
                }
            },
            |err| log::error!("audio stream error: {}", err),
            None,
        )?;

        stream.play()?;
        println!("Playing... Press Ctrl+C to stop");

        let started = Instant::now();
        let mut last_report = Instant::now();
        loop {
            if let Some(limit) = seconds {
                if started.elapsed().as_secs_f64() >= limit {
                    break;
                }
            }
            if last_report.elapsed() >= Duration::from_secs(1) {
                report(&store, &table, reader.status());
                last_report = Instant::now();
            }
            thread::sleep(Duration::from_millis(100));
        }

        drop(stream);
        timer.stop();
        reader.stop(self.config.link_options().shutdown_timeout);
        Ok(())
    }
}

fn report(store: &ParameterStore, table: &MappingTable, status: &LinkStatus) {
    for axis in Axis::ALL {
        if let Some(param) = table.get(axis) {
            let id = param.param_id();
            log::info!(
                "{:?} -> {} = {:.2}{}",
                axis,
                id.spec().name,
                store.get(id),
                if status.is_connected() { "" } else { " (link down)" }
            );
        }
    }
}

/// Copy raw telemetry bytes into the link's channel. Ends (and so
/// disconnects the link) at end of input.
fn spawn_forwarder(input: TelemetryInput, tx: Sender<Vec<u8>>) -> EyreResult<()> {
    let mut reader: Box<dyn Read + Send> = match input {
        TelemetryInput::Stdin => Box::new(std::io::stdin()),
        TelemetryInput::File(path) => Box::new(
            File::open(&path).wrap_err_with(|| format!("failed to open telemetry input {:?}", path))?,
        ),
    };

    thread::Builder::new()
        .name("telemetry-forwarder".to_string())
        .spawn(move || {
            let mut buf = [0u8; 256];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) => {
                        log::info!("telemetry input closed");
                        break;
                    }
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                    Err(e) => {
                        log::error!("telemetry input error: {}", e);
                        break;
                    }
                }
            }
        })
        .wrap_err("failed to spawn telemetry forwarder")?;

    Ok(())
}

/// Band-limited-enough sawtooth from a handful of harmonics; gives the
/// filters and the shaper something to chew on.
struct TestTone {
    phase: f32,
    increment: f32,
}

impl TestTone {
    const HARMONICS: usize = 8;

    fn new(freq: f32, sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            increment: freq / sample_rate,
        }
    }

    fn next_sample(&mut self) -> f32 {
        let mut s = 0.0;
        for k in 1..=Self::HARMONICS {
            s += (TAU * self.phase * k as f32).sin() / k as f32;
        }
        self.phase = (self.phase + self.increment).fract();
        0.25 * s
    }
}
