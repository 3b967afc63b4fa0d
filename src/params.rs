//! Lock-free parameter store shared between the control threads and the
//! audio callback.
//!
//! Each value is one `f32` stored as its bit pattern in an `AtomicU32`, so a
//! reader on the audio thread always sees a whole value and never waits.
//! Parameter groups (equalizer, distortion, delay) are assembled from
//! individual scalar loads; no multi-field struct is ever shared.

use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::distortion::Algorithm;
use crate::dsp::filter::FilterType;

/// How a parameter's range is perceived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamScale {
    Linear,
    /// Frequency-like: telemetry maps onto it logarithmically.
    Frequency,
}

/// Static description of a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
    pub scale: ParamScale,
}

impl ParamSpec {
    const fn linear(name: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self {
            name,
            min,
            max,
            default,
            scale: ParamScale::Linear,
        }
    }

    const fn frequency(name: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self {
            name,
            min,
            max,
            default,
            scale: ParamScale::Frequency,
        }
    }

    pub fn midpoint(&self) -> f32 {
        (self.min + self.max) / 2.0
    }

    /// Clamp into `[min, max]`. NaN falls back to the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamId {
    EqCutoff,
    EqQ,
    EqGainDb,
    EqType,
    Drive,
    Mix,
    Anger,
    OutputGainDb,
    HpfCutoff,
    LpfCutoff,
    DistortionType,
    DelayFeedback,
    DelayTimeMs,
}

impl ParamId {
    pub const COUNT: usize = 13;

    pub const ALL: [ParamId; Self::COUNT] = [
        ParamId::EqCutoff,
        ParamId::EqQ,
        ParamId::EqGainDb,
        ParamId::EqType,
        ParamId::Drive,
        ParamId::Mix,
        ParamId::Anger,
        ParamId::OutputGainDb,
        ParamId::HpfCutoff,
        ParamId::LpfCutoff,
        ParamId::DistortionType,
        ParamId::DelayFeedback,
        ParamId::DelayTimeMs,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> ParamSpec {
        match self {
            ParamId::EqCutoff => ParamSpec::frequency("EQ Cutoff", 20.0, 20_000.0, 500.0),
            ParamId::EqQ => ParamSpec::linear("Q", 0.01, 10.0, std::f32::consts::FRAC_1_SQRT_2),
            ParamId::EqGainDb => ParamSpec::linear("EQ Gain", -24.0, 24.0, 0.0),
            ParamId::EqType => ParamSpec::linear("Filter Type", 0.0, 2.0, 0.0),
            ParamId::Drive => ParamSpec::linear("Drive", 0.0, 100.0, 0.0),
            ParamId::Mix => ParamSpec::linear("Mix", 0.0, 1.0, 1.0),
            ParamId::Anger => ParamSpec::linear("Anger", 0.0, 1.0, 0.5),
            ParamId::OutputGainDb => ParamSpec::linear("Volume", -20.0, 20.0, 0.0),
            ParamId::HpfCutoff => ParamSpec::frequency("HPF Frequency", 20.0, 10_000.0, 20.0),
            ParamId::LpfCutoff => ParamSpec::frequency("LPF Frequency", 200.0, 20_000.0, 20_000.0),
            ParamId::DistortionType => ParamSpec::linear("Distortion Type", 0.0, 3.0, 0.0),
            ParamId::DelayFeedback => ParamSpec::linear("Feedback", 0.0, 1.0, 0.5),
            ParamId::DelayTimeMs => ParamSpec::linear("Delay Time", 0.0, 2000.0, 500.0),
        }
    }
}

/// Snapshot of the equalizer controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqualizerParameters {
    pub cutoff_hz: f32,
    pub q: f32,
    pub gain_db: f32,
    pub filter_type: FilterType,
}

impl Default for EqualizerParameters {
    fn default() -> Self {
        Self {
            cutoff_hz: ParamId::EqCutoff.spec().default,
            q: ParamId::EqQ.spec().default,
            gain_db: 0.0,
            filter_type: FilterType::LowPass,
        }
    }
}

/// Snapshot of the distortion controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistortionParameters {
    pub drive: f32,
    pub mix: f32,
    pub anger: f32,
    pub output_gain_db: f32,
    pub hpf_cutoff_hz: f32,
    pub lpf_cutoff_hz: f32,
    pub algorithm: Algorithm,
}

impl Default for DistortionParameters {
    fn default() -> Self {
        Self {
            drive: 0.0,
            mix: 1.0,
            anger: 0.5,
            output_gain_db: 0.0,
            hpf_cutoff_hz: 20.0,
            lpf_cutoff_hz: 20_000.0,
            algorithm: Algorithm::InverseAbs,
        }
    }
}

/// Snapshot of the delay controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayParameters {
    pub feedback: f32,
    pub delay_ms: f32,
}

impl Default for DelayParameters {
    fn default() -> Self {
        Self {
            feedback: 0.5,
            delay_ms: 500.0,
        }
    }
}

pub struct ParameterStore {
    values: [AtomicU32; ParamId::COUNT],
}

impl ParameterStore {
    pub fn new() -> Self {
        Self {
            values: ParamId::ALL.map(|id| AtomicU32::new(id.spec().default.to_bits())),
        }
    }

    #[inline]
    pub fn get(&self, id: ParamId) -> f32 {
        f32::from_bits(self.values[id.index()].load(Ordering::Relaxed))
    }

    /// Store `value` clamped into the parameter's range; returns what was stored.
    pub fn set(&self, id: ParamId, value: f32) -> f32 {
        let clamped = id.spec().clamp(value);
        self.values[id.index()].store(clamped.to_bits(), Ordering::Relaxed);
        clamped
    }

    #[inline]
    fn choice(&self, id: ParamId) -> usize {
        self.get(id).round().max(0.0) as usize
    }

    pub fn equalizer(&self) -> EqualizerParameters {
        EqualizerParameters {
            cutoff_hz: self.get(ParamId::EqCutoff),
            q: self.get(ParamId::EqQ),
            gain_db: self.get(ParamId::EqGainDb),
            filter_type: FilterType::from_index(self.choice(ParamId::EqType)),
        }
    }

    pub fn distortion(&self) -> DistortionParameters {
        DistortionParameters {
            drive: self.get(ParamId::Drive),
            mix: self.get(ParamId::Mix),
            anger: self.get(ParamId::Anger),
            output_gain_db: self.get(ParamId::OutputGainDb),
            hpf_cutoff_hz: self.get(ParamId::HpfCutoff),
            lpf_cutoff_hz: self.get(ParamId::LpfCutoff),
            algorithm: Algorithm::from_index(self.choice(ParamId::DistortionType)),
        }
    }

    pub fn delay(&self) -> DelayParameters {
        DelayParameters {
            feedback: self.get(ParamId::DelayFeedback),
            delay_ms: self.get(ParamId::DelayTimeMs),
        }
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}
