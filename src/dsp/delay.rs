//! Circular buffer for block-based feedback delay.
//!
//! The ring never owns a write head: callers pass the position for every
//! transfer, so several channel rings can share one head kept by the stage.
//! Every transfer that would run past the end of the ring is split in two
//! (tail, then head).

use std::collections::TryReserveError;

use crate::dsp::mix::{add_with_ramp, copy_with_ramp};

pub struct DelayLine {
    buffer: Vec<f32>,
}

impl DelayLine {
    /// Allocate a zeroed ring of `len` samples, reporting allocation failure
    /// instead of aborting.
    pub fn with_len(len: usize) -> Result<Self, TryReserveError> {
        let mut buffer = Vec::new();
        buffer.try_reserve_exact(len)?;
        buffer.resize(len, 0.0);
        Ok(Self { buffer })
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Length of the first (pre-wrap) segment of a `count`-sample transfer at `position`.
    #[inline]
    fn first_segment(&self, position: usize, count: usize) -> usize {
        count.min(self.buffer.len() - position)
    }

    /// Overwrite the ring at `position` with `src`, gain-ramped from `start` to `end`.
    pub fn write_ramped(&mut self, position: usize, src: &[f32], start: f32, end: f32) {
        let total = src.len();
        let first = self.first_segment(position, total);

        copy_with_ramp(&mut self.buffer[position..position + first], &src[..first], start, end, 0, total);
        if first < total {
            let rest = total - first;
            copy_with_ramp(&mut self.buffer[..rest], &src[first..], start, end, first, total);
        }
    }

    /// Add `src` into the ring at `position`, gain-ramped from `start` to `end`.
    pub fn add_ramped(&mut self, position: usize, src: &[f32], start: f32, end: f32) {
        let total = src.len();
        let first = self.first_segment(position, total);

        add_with_ramp(&mut self.buffer[position..position + first], &src[..first], start, end, 0, total);
        if first < total {
            let rest = total - first;
            add_with_ramp(&mut self.buffer[..rest], &src[first..], start, end, first, total);
        }
    }

    /// Add `dst.len()` samples of ring content starting at `position` into `dst`.
    pub fn read_add(&self, position: usize, dst: &mut [f32]) {
        let total = dst.len();
        let first = self.first_segment(position, total);

        for (d, &s) in dst[..first].iter_mut().zip(&self.buffer[position..position + first]) {
            *d += s;
        }
        if first < total {
            for (d, &s) in dst[first..].iter_mut().zip(&self.buffer[..total - first]) {
                *d += s;
            }
        }
    }

    /// Sample stored at `position` (wrapped).
    pub fn at(&self, position: usize) -> f32 {
        self.buffer[position % self.buffer.len()]
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
    }
}

/// Delay time in whole samples, rounded to the nearest sample.
#[inline]
pub fn delay_samples(delay_ms: f32, sample_rate: f32) -> usize {
    (delay_ms.max(0.0) * sample_rate / 1000.0).round() as usize
}

/// Read head for a given write head and delay, wrapped into `[0, len)`.
#[inline]
pub fn read_position(write_position: usize, delay: usize, len: usize) -> usize {
    (write_position + len - delay % len) % len
}
