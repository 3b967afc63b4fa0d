use crate::{
    block::AudioBlock,
    dsp::delay::{delay_samples, read_position, DelayLine},
    effects::stage::{EffectStage, ProcessSpec},
    error::PrepareError,
    params::DelayParameters,
    MAX_DELAY_SECONDS,
};

/*
Feedback Delay
==============

Every channel owns a ring of a little over two seconds. All rings share one
write head, which advances by the block length after every channel has been
processed. The read head is derived from it each block:

    read = (write - delay_samples + len) mod len

Per channel and block:

  1. fill       ring[write..] = input × feedback (ramped)
  2. read back  output = input + ring[read..]
  3. feed back  ring[write..] += (output - input) × feedback (ramped)

Step 3 only returns the repeats to the ring; the dry input was already
recorded by step 1. An impulse therefore comes back at `feedback`, then
`feedback²`, and so on.

Both gains ramp from the previous block's feedback to the current one so an
automated feedback control doesn't click. Delay time changes are applied at
block boundaries without interpolation.

              ┌──────────────── × g ◄────────────┐
              │                                   │
  input ──┬──►(+)──► [ ring ] ──► read ──►(+)──┬──► output
          │                               ▲    │
          └───────────────────────────────┘    │
                                         (output - input)
*/

pub struct Delay {
    params: DelayParameters,
    rings: Vec<DelayLine>,
    scratch: Vec<f32>,
    write_position: usize,
    previous_feedback: f32,
    ring_len: usize,
    max_block_size: usize,
    sample_rate: f32,
}

impl Delay {
    pub fn new() -> Self {
        Self {
            params: DelayParameters::default(),
            rings: Vec::new(),
            scratch: Vec::new(),
            write_position: 0,
            previous_feedback: DelayParameters::default().feedback,
            ring_len: 0,
            max_block_size: 0,
            sample_rate: 0.0,
        }
    }

    pub fn params(&self) -> &DelayParameters {
        &self.params
    }

    /// Ring length in samples per channel; 0 before `prepare`.
    pub fn ring_len(&self) -> usize {
        self.ring_len
    }

    pub fn write_position(&self) -> usize {
        self.write_position
    }

    /// Ring length for a stream: the maximum delay plus one block of headroom,
    /// so the read window never overlaps the block being written.
    pub fn ring_len_for(sample_rate: f32, max_block_size: usize) -> usize {
        (MAX_DELAY_SECONDS * sample_rate).ceil() as usize + max_block_size
    }
}

impl Default for Delay {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectStage for Delay {
    type Params = DelayParameters;

    fn configure(&mut self, params: DelayParameters) {
        self.params = DelayParameters {
            feedback: params.feedback.clamp(0.0, 1.0),
            delay_ms: params.delay_ms.clamp(0.0, MAX_DELAY_SECONDS * 1000.0),
        };
    }

    fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), PrepareError> {
        let ring_len = Self::ring_len_for(spec.sample_rate, spec.max_block_size);

        let mut rings = Vec::with_capacity(spec.channels);
        for _ in 0..spec.channels {
            let ring = DelayLine::with_len(ring_len).map_err(|source| PrepareError::RingAllocation {
                samples: ring_len,
                source,
            })?;
            rings.push(ring);
        }

        self.rings = rings;
        self.scratch = vec![0.0; spec.max_block_size];
        self.ring_len = ring_len;
        self.max_block_size = spec.max_block_size;
        self.sample_rate = spec.sample_rate;
        self.write_position = 0;
        self.previous_feedback = self.params.feedback;
        Ok(())
    }

    fn process(&mut self, block: &mut AudioBlock) {
        if self.rings.is_empty() {
            return;
        }

        let frames = block.frames().min(self.max_block_size);
        let channels = block.channels().min(self.rings.len());
        let start_gain = self.previous_feedback;
        let end_gain = self.params.feedback;

        // Keep the read window clear of the block being written.
        let delay = delay_samples(self.params.delay_ms, self.sample_rate).min(self.ring_len - self.max_block_size);
        let read = read_position(self.write_position, delay, self.ring_len);

        for ch in 0..channels {
            let samples = &mut block.channel_mut(ch)[..frames];
            let input = &mut self.scratch[..frames];
            let ring = &mut self.rings[ch];

            input.copy_from_slice(samples);
            ring.write_ramped(self.write_position, input, start_gain, end_gain);
            ring.read_add(read, samples);

            for (repeat, &out) in input.iter_mut().zip(samples.iter()) {
                *repeat = out - *repeat;
            }
            ring.add_ramped(self.write_position, input, start_gain, end_gain);
        }

        self.previous_feedback = end_gain;
        self.write_position = (self.write_position + frames) % self.ring_len;
    }

    fn reset(&mut self) {
        for ring in &mut self.rings {
            ring.reset();
        }
        self.scratch.fill(0.0);
        self.write_position = 0;
        self.previous_feedback = self.params.feedback;
    }
}
