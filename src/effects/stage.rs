use crate::{block::AudioBlock, error::PrepareError, MAX_BLOCK_SIZE};

/// Stream properties handed to every stage before processing starts.
///
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - max_block_size: Largest number of frames a stage will see per call
/// - channels: Number of channels the stage keeps state for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSpec {
    pub sample_rate: f32,
    pub max_block_size: usize,
    pub channels: usize,
}

impl ProcessSpec {
    pub fn new(sample_rate: f32, max_block_size: usize, channels: usize) -> Result<Self, PrepareError> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(PrepareError::InvalidSampleRate(sample_rate));
        }
        if max_block_size == 0 || max_block_size > MAX_BLOCK_SIZE {
            return Err(PrepareError::InvalidBlockSize {
                got: max_block_size,
                max: MAX_BLOCK_SIZE,
            });
        }
        if channels == 0 {
            return Err(PrepareError::NoChannels);
        }

        Ok(Self {
            sample_rate,
            max_block_size,
            channels,
        })
    }

    pub fn nyquist(&self) -> f32 {
        self.sample_rate / 2.0
    }

    /// Clamp a filter frequency to at least 1 Hz and at most `0.49·fs`.
    /// The upper bound wins when the stream is too slow for both.
    pub fn clamp_cutoff(&self, hz: f32) -> f32 {
        hz.max(1.0).min(self.sample_rate * 0.49)
    }
}

/// Core trait for the processing stages of the effects chain.
///
/// `prepare` runs off the audio thread and may allocate; `configure` and
/// `process` run on the audio thread and must not.
pub trait EffectStage: Send {
    type Params: Copy;

    /// Store the parameters used by subsequent `process` calls.
    fn configure(&mut self, params: Self::Params);

    /// Size per-channel state for the stream. Clears any previous state.
    fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), PrepareError>;

    /// Process one block in place. Blocks may carry at most
    /// `spec.max_block_size` frames; channels beyond `spec.channels` pass
    /// through untouched.
    fn process(&mut self, block: &mut AudioBlock);

    /// Clear filter memory and buffers without reallocating.
    fn reset(&mut self);
}
