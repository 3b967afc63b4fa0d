use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
| type      | passes          | rejects          | slope           |
| --------- | --------------- | ---------------- | --------------- |
| low-pass  | below cutoff    | above cutoff     | 12 dB/oct       |
| high-pass | above cutoff    | below cutoff     | 12 dB/oct       |
| band-pass | around cutoff   | both sides       | 6 dB/oct / side |

All three are second-order sections (biquads) designed with the bilinear
transform. With n = 1 / tan(π·fc/fs):

    c = 1 / (1 + n/Q + n²)

    low-pass   b = [c,      2c,      c     ]
    high-pass  b = [c·n²,  -2c·n²,   c·n²  ]
    band-pass  b = [c·n/Q,  0,      -c·n/Q ]

    a = [1, 2c·(1 - n²), c·(1 - n/Q + n²)]

At the cutoff the low/high-pass magnitude equals Q, so Q = 1/√2 gives the
classic -3 dB corner. The band-pass peak is unity at the centre frequency.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
}

impl FilterType {
    /// Map a choice index (0 = low-pass, 1 = high-pass, 2 = band-pass).
    /// Out-of-range indices fall back to the nearest valid type.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => FilterType::LowPass,
            1 => FilterType::HighPass,
            _ => FilterType::BandPass,
        }
    }

    pub fn index(self) -> usize {
        match self {
            FilterType::LowPass => 0,
            FilterType::HighPass => 1,
            FilterType::BandPass => 2,
        }
    }
}

/// Normalized biquad coefficients (a0 == 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl BiquadCoefficients {
    pub fn design(filter_type: FilterType, cutoff_hz: f32, q: f32, sample_rate: f32) -> Self {
        // tan() diverges at Nyquist and n/Q diverges at Q = 0
        let cutoff_hz = cutoff_hz.max(1.0e-3).min(sample_rate * 0.4999);
        let q = q.max(1.0e-3);

        let n = 1.0 / (PI * cutoff_hz / sample_rate).tan();
        let n2 = n * n;
        let c = 1.0 / (1.0 + n / q + n2);

        let a1 = 2.0 * c * (1.0 - n2);
        let a2 = c * (1.0 - n / q + n2);

        let (b0, b1, b2) = match filter_type {
            FilterType::LowPass => (c, 2.0 * c, c),
            FilterType::HighPass => (c * n2, -2.0 * c * n2, c * n2),
            FilterType::BandPass => (c * n / q, 0.0, -c * n / q),
        };

        Self { b0, b1, b2, a1, a2 }
    }

    pub fn lowpass(cutoff_hz: f32, q: f32, sample_rate: f32) -> Self {
        Self::design(FilterType::LowPass, cutoff_hz, q, sample_rate)
    }

    pub fn highpass(cutoff_hz: f32, q: f32, sample_rate: f32) -> Self {
        Self::design(FilterType::HighPass, cutoff_hz, q, sample_rate)
    }

    pub fn bandpass(cutoff_hz: f32, q: f32, sample_rate: f32) -> Self {
        Self::design(FilterType::BandPass, cutoff_hz, q, sample_rate)
    }

    /// Magnitude response |H(e^jω)| at `freq_hz`.
    pub fn magnitude_at(&self, freq_hz: f32, sample_rate: f32) -> f32 {
        let w = 2.0 * PI * freq_hz / sample_rate;
        let (c1, s1) = (w.cos(), w.sin());
        let (c2, s2) = ((2.0 * w).cos(), (2.0 * w).sin());

        let num_re = self.b0 + self.b1 * c1 + self.b2 * c2;
        let num_im = -(self.b1 * s1 + self.b2 * s2);
        let den_re = 1.0 + self.a1 * c1 + self.a2 * c2;
        let den_im = -(self.a1 * s1 + self.a2 * s2);

        ((num_re * num_re + num_im * num_im) / (den_re * den_re + den_im * den_im)).sqrt()
    }
}

/// Per-channel biquad memory (transposed direct form II).
#[derive(Debug, Clone, Copy, Default)]
pub struct Biquad {
    s1: f32,
    s2: f32,
}

impl Biquad {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32, coeffs: &BiquadCoefficients) -> f32 {
        let out = coeffs.b0 * sample + self.s1;
        self.s1 = coeffs.b1 * sample - coeffs.a1 * out + self.s2;
        self.s2 = coeffs.b2 * sample - coeffs.a2 * out;
        out
    }

    pub fn render(&mut self, buffer: &mut [f32], coeffs: &BiquadCoefficients) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, coeffs);
        }
    }

    pub fn reset(&mut self) {
        self.s1 = 0.0;
        self.s2 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_1_SQRT_2;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn sine(freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f32 / SAMPLE_RATE).sin())
            .collect()
    }

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len() / 2;
        buffer[skip..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn test_lowpass_passes_dc() {
        let coeffs = BiquadCoefficients::lowpass(500.0, FRAC_1_SQRT_2, SAMPLE_RATE);
        let mut filter = Biquad::new();
        let mut buffer = vec![1.0; 2048];

        filter.render(&mut buffer, &coeffs);

        assert!((buffer[2047] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_highpass_blocks_dc() {
        let coeffs = BiquadCoefficients::highpass(500.0, FRAC_1_SQRT_2, SAMPLE_RATE);
        let mut filter = Biquad::new();
        let mut buffer = vec![1.0; 2048];

        filter.render(&mut buffer, &coeffs);

        assert!(buffer[2047].abs() < 1e-3);
    }

    #[test]
    fn test_lowpass_minus_3db_at_cutoff() {
        let cutoff = 1_000.0;
        let coeffs = BiquadCoefficients::lowpass(cutoff, FRAC_1_SQRT_2, SAMPLE_RATE);
        let mut filter = Biquad::new();
        let mut buffer = sine(cutoff, 9600);

        filter.render(&mut buffer, &coeffs);

        let peak = peak_after_transient(&buffer);
        assert!(
            (peak - FRAC_1_SQRT_2).abs() < 0.01,
            "expected -3 dB at cutoff, got peak {}",
            peak
        );
    }

    #[test]
    fn test_highpass_minus_3db_at_cutoff() {
        let cutoff = 2_000.0;
        let coeffs = BiquadCoefficients::highpass(cutoff, FRAC_1_SQRT_2, SAMPLE_RATE);
        let mut filter = Biquad::new();
        let mut buffer = sine(cutoff, 9600);

        filter.render(&mut buffer, &coeffs);

        let peak = peak_after_transient(&buffer);
        assert!(
            (peak - FRAC_1_SQRT_2).abs() < 0.01,
            "expected -3 dB at cutoff, got peak {}",
            peak
        );
    }

    #[test]
    fn test_magnitude_matches_q_at_cutoff() {
        for q in [0.5, FRAC_1_SQRT_2, 2.0, 5.0] {
            let lp = BiquadCoefficients::lowpass(3_000.0, q, SAMPLE_RATE);
            let hp = BiquadCoefficients::highpass(3_000.0, q, SAMPLE_RATE);
            assert!((lp.magnitude_at(3_000.0, SAMPLE_RATE) - q).abs() < 1e-3 * q.max(1.0));
            assert!((hp.magnitude_at(3_000.0, SAMPLE_RATE) - q).abs() < 1e-3 * q.max(1.0));
        }
    }

    #[test]
    fn test_bandpass_unity_at_centre() {
        let coeffs = BiquadCoefficients::bandpass(1_000.0, 2.0, SAMPLE_RATE);

        assert!((coeffs.magnitude_at(1_000.0, SAMPLE_RATE) - 1.0).abs() < 1e-3);
        assert!(coeffs.magnitude_at(200.0, SAMPLE_RATE) < 0.2);
        assert!(coeffs.magnitude_at(5_000.0, SAMPLE_RATE) < 0.2);
    }

    #[test]
    fn test_lowpass_filters_high_freq() {
        let coeffs = BiquadCoefficients::lowpass(500.0, FRAC_1_SQRT_2, SAMPLE_RATE);
        let mut filter = Biquad::new();
        let mut buffer = sine(5_000.0, 2048);

        filter.render(&mut buffer, &coeffs);

        // A decade above cutoff: ~40 dB down
        let peak = peak_after_transient(&buffer);
        assert!(peak < 0.02, "Expected high freq attenuation, got peak: {}", peak);
    }

    #[test]
    fn test_design_is_deterministic() {
        let a = BiquadCoefficients::design(FilterType::BandPass, 1234.5, 3.3, 44_100.0);
        let b = BiquadCoefficients::design(FilterType::BandPass, 1234.5, 3.3, 44_100.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_cutoff_at_nyquist_stays_finite() {
        let coeffs = BiquadCoefficients::lowpass(SAMPLE_RATE, 0.0, SAMPLE_RATE);
        let mut filter = Biquad::new();
        let mut buffer = sine(440.0, 512);

        filter.render(&mut buffer, &coeffs);

        assert!(buffer.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_state_carries_across_blocks() {
        let coeffs = BiquadCoefficients::lowpass(800.0, FRAC_1_SQRT_2, SAMPLE_RATE);
        let input = sine(300.0, 512);

        let mut whole = input.clone();
        Biquad::new().render(&mut whole, &coeffs);

        let mut split = input;
        let mut filter = Biquad::new();
        let (head, tail) = split.split_at_mut(200);
        filter.render(head, &coeffs);
        filter.render(tail, &coeffs);

        assert_eq!(whole, split);
    }

    #[test]
    fn test_reset_clears_memory() {
        let coeffs = BiquadCoefficients::lowpass(800.0, FRAC_1_SQRT_2, SAMPLE_RATE);
        let mut filter = Biquad::new();
        let mut buffer = vec![1.0; 64];
        filter.render(&mut buffer, &coeffs);

        filter.reset();

        assert_eq!(filter.next_sample(0.0, &coeffs), 0.0);
    }

    #[test]
    fn test_filter_type_index_round_trip() {
        for t in [FilterType::LowPass, FilterType::HighPass, FilterType::BandPass] {
            assert_eq!(FilterType::from_index(t.index()), t);
        }
        assert_eq!(FilterType::from_index(7), FilterType::BandPass);
    }
}
