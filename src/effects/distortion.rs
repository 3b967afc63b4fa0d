use crate::{
    block::AudioBlock,
    dsp::{
        distortion::shape_buffer,
        filter::{Biquad, BiquadCoefficients},
        gain::db_to_gain,
        mix::apply_dry_wet,
    },
    effects::stage::{EffectStage, ProcessSpec},
    error::PrepareError,
    params::DistortionParameters,
};

/*
Distortion Stage
================

Per channel, in this order:

  1. snapshot the dry signal
  2. band-limit the wet signal: high-pass at `hpf_cutoff_hz`, then low-pass
     at `lpf_cutoff_hz`
  3. drive:      × (drive/10 + 1)
  4. waveshape:  one of the four curves, bent by `anger`
  5. autogain:   × db_to_gain(-drive/5) · (1 - 0.7·anger)
  6. volume:     × db_to_gain(output_gain_db)
  7. mix:        wet·mix + dry·(1 - mix)
*/

/// Q of the band-limiting filters in front of the shaper.
pub const BAND_LIMIT_Q: f32 = 5.0;

pub struct Distortion {
    params: DistortionParameters,
    hpf: Vec<Biquad>,
    lpf: Vec<Biquad>,
    dry_buffer: Vec<f32>, // channels × max_block_size, allocated in prepare
    max_block_size: usize,
    sample_rate: f32,
}

impl Distortion {
    pub fn new() -> Self {
        Self {
            params: DistortionParameters::default(),
            hpf: Vec::new(),
            lpf: Vec::new(),
            dry_buffer: Vec::new(),
            max_block_size: 0,
            sample_rate: 0.0,
        }
    }

    pub fn params(&self) -> &DistortionParameters {
        &self.params
    }
}

impl Default for Distortion {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectStage for Distortion {
    type Params = DistortionParameters;

    fn configure(&mut self, params: DistortionParameters) {
        self.params = params;
    }

    fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), PrepareError> {
        self.sample_rate = spec.sample_rate;
        self.max_block_size = spec.max_block_size;
        self.hpf = vec![Biquad::new(); spec.channels];
        self.lpf = vec![Biquad::new(); spec.channels];
        self.dry_buffer = vec![0.0; spec.channels * spec.max_block_size];
        Ok(())
    }

    fn process(&mut self, block: &mut AudioBlock) {
        if self.hpf.is_empty() {
            return;
        }

        let p = self.params;
        let hpf_coeffs = BiquadCoefficients::highpass(p.hpf_cutoff_hz, BAND_LIMIT_Q, self.sample_rate);
        let lpf_coeffs = BiquadCoefficients::lowpass(p.lpf_cutoff_hz, BAND_LIMIT_Q, self.sample_rate);
        let output_gain = db_to_gain(p.output_gain_db);

        let frames = block.frames().min(self.max_block_size);
        let channels = block.channels().min(self.hpf.len());

        for ch in 0..channels {
            let samples = &mut block.channel_mut(ch)[..frames];
            let dry = &mut self.dry_buffer[ch * self.max_block_size..][..frames];
            dry.copy_from_slice(samples);

            self.hpf[ch].render(samples, &hpf_coeffs);
            self.lpf[ch].render(samples, &lpf_coeffs);
            shape_buffer(samples, p.algorithm, p.drive, p.anger, output_gain);
            apply_dry_wet(dry, samples, p.mix);
        }
    }

    fn reset(&mut self) {
        for filter in self.hpf.iter_mut().chain(self.lpf.iter_mut()) {
            filter.reset();
        }
        self.dry_buffer.fill(0.0);
    }
}
