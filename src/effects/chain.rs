use std::sync::Arc;

use crate::{
    block::AudioBlock,
    effects::{
        delay::Delay,
        distortion::Distortion,
        equalizer::Equalizer,
        stage::{EffectStage, ProcessSpec},
    },
    error::PrepareError,
    params::ParameterStore,
};

/// The fixed EQ → distortion → delay pipeline.
///
/// The chain owns every stage and is moved into the audio callback; the only
/// thing it shares with other threads is the [`ParameterStore`], which it
/// reads once per host block. Frequency parameters are clamped below Nyquist
/// here, before they reach a stage.
pub struct EffectsChain {
    store: Arc<ParameterStore>,
    equalizer: Equalizer,
    distortion: Distortion,
    delay: Delay,
    spec: Option<ProcessSpec>,
}

impl EffectsChain {
    pub fn new(store: Arc<ParameterStore>) -> Self {
        Self {
            store,
            equalizer: Equalizer::new(),
            distortion: Distortion::new(),
            delay: Delay::new(),
            spec: None,
        }
    }

    pub fn store(&self) -> &Arc<ParameterStore> {
        &self.store
    }

    pub fn spec(&self) -> Option<&ProcessSpec> {
        self.spec.as_ref()
    }

    pub fn is_prepared(&self) -> bool {
        self.spec.is_some()
    }

    /// Size every stage for the stream. Must run before the first `process`
    /// and whenever the sample rate, block size or channel count changes.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize, channels: usize) -> Result<(), PrepareError> {
        self.spec = None;
        let spec = ProcessSpec::new(sample_rate, max_block_size, channels)?;

        self.apply_parameters(&spec);
        self.equalizer.prepare(&spec)?;
        self.distortion.prepare(&spec)?;
        self.delay.prepare(&spec)?;

        log::debug!(
            "effects chain prepared: {} Hz, {} frames, {} channels, delay ring {} samples",
            spec.sample_rate,
            spec.max_block_size,
            spec.channels,
            self.delay.ring_len()
        );
        self.spec = Some(spec);
        Ok(())
    }

    /// Process one host block in place. Blocks longer than the prepared
    /// maximum are split into chunks. Unprepared chains pass audio through.
    pub fn process(&mut self, block: &mut AudioBlock) {
        let Some(spec) = self.spec else {
            return;
        };

        self.apply_parameters(&spec);

        let frames = block.frames();
        let mut start = 0;
        while start < frames {
            let len = (frames - start).min(spec.max_block_size);
            let mut chunk = block.slice_frames(start, len);

            self.equalizer.process(&mut chunk);
            self.distortion.process(&mut chunk);
            self.delay.process(&mut chunk);

            start += len;
        }
    }

    /// Clear filter memory and the delay ring, keeping allocations.
    pub fn reset(&mut self) {
        self.equalizer.reset();
        self.distortion.reset();
        self.delay.reset();
    }

    /// Drop all stream state. The chain passes audio through until prepared again.
    pub fn release(&mut self) {
        self.equalizer = Equalizer::new();
        self.distortion = Distortion::new();
        self.delay = Delay::new();
        self.spec = None;
    }

    fn apply_parameters(&mut self, spec: &ProcessSpec) {
        let mut eq = self.store.equalizer();
        eq.cutoff_hz = spec.clamp_cutoff(eq.cutoff_hz);

        let mut distortion = self.store.distortion();
        distortion.hpf_cutoff_hz = spec.clamp_cutoff(distortion.hpf_cutoff_hz);
        distortion.lpf_cutoff_hz = spec.clamp_cutoff(distortion.lpf_cutoff_hz);

        self.equalizer.configure(eq);
        self.distortion.configure(distortion);
        self.delay.configure(self.store.delay());
    }
}
