use crate::{
    block::AudioBlock,
    dsp::{
        filter::{Biquad, BiquadCoefficients},
        gain::db_to_gain,
    },
    effects::stage::{EffectStage, ProcessSpec},
    error::PrepareError,
    params::EqualizerParameters,
};

/*
Equalizer
=========

One selectable biquad (low-pass, high-pass or band-pass) with an input gain.

Cutoff (Hz): where the filter takes effect. Must already be below Nyquist
when it reaches this stage; the chain clamps it.

Q: emphasis at the cutoff. 0.707 is the flat Butterworth response; higher
values add a resonant peak, lower values roll off earlier.

Coefficients are recomputed every block from the current parameters. The
only state that persists between blocks is each channel's filter memory.
*/

pub struct Equalizer {
    params: EqualizerParameters,
    filters: Vec<Biquad>,
    sample_rate: f32,
}

impl Equalizer {
    pub fn new() -> Self {
        Self {
            params: EqualizerParameters::default(),
            filters: Vec::new(),
            sample_rate: 0.0,
        }
    }

    pub fn params(&self) -> &EqualizerParameters {
        &self.params
    }

    /// Coefficients for the current parameters at the prepared sample rate.
    pub fn coefficients(&self) -> BiquadCoefficients {
        BiquadCoefficients::design(
            self.params.filter_type,
            self.params.cutoff_hz,
            self.params.q,
            self.sample_rate,
        )
    }
}

impl Default for Equalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectStage for Equalizer {
    type Params = EqualizerParameters;

    fn configure(&mut self, params: EqualizerParameters) {
        let defaults = EqualizerParameters::default();
        self.params = EqualizerParameters {
            cutoff_hz: if params.cutoff_hz > 0.0 { params.cutoff_hz } else { defaults.cutoff_hz },
            q: if params.q > 0.0 { params.q } else { defaults.q },
            gain_db: if params.gain_db.is_finite() { params.gain_db } else { 0.0 },
            filter_type: params.filter_type,
        };
    }

    fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), PrepareError> {
        self.sample_rate = spec.sample_rate;
        self.filters = vec![Biquad::new(); spec.channels];
        Ok(())
    }

    fn process(&mut self, block: &mut AudioBlock) {
        if self.filters.is_empty() {
            return;
        }

        let coeffs = self.coefficients();
        let gain = db_to_gain(self.params.gain_db);
        let channels = block.channels().min(self.filters.len());

        for (ch, filter) in self.filters.iter_mut().enumerate().take(channels) {
            let samples = block.channel_mut(ch);
            if gain != 1.0 {
                for sample in samples.iter_mut() {
                    *sample *= gain;
                }
            }
            filter.render(samples, &coeffs);
        }
    }

    fn reset(&mut self) {
        for filter in &mut self.filters {
            filter.reset();
        }
    }
}
