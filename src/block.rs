//! Borrowed channel-major audio buffers.
//!
//! A block is `channels` runs of `frames` samples laid out back to back, each
//! run starting `stride` samples after the previous one. Stages mutate the
//! block in place: whatever they write replaces the input.

pub struct AudioBlock<'a> {
    data: &'a mut [f32],
    channels: usize,
    frames: usize,
    stride: usize,
}

impl<'a> AudioBlock<'a> {
    /// Tightly packed block (`stride == frames`).
    pub fn new(data: &'a mut [f32], channels: usize, frames: usize) -> Self {
        Self::with_stride(data, channels, frames, frames)
    }

    /// Block whose channels start `stride` samples apart.
    ///
    /// Panics if `data` cannot hold `channels` runs of `frames` samples.
    pub fn with_stride(data: &'a mut [f32], channels: usize, frames: usize, stride: usize) -> Self {
        assert!(frames <= stride, "frames ({frames}) exceed stride ({stride})");
        if channels > 0 {
            let needed = (channels - 1) * stride + frames;
            assert!(
                data.len() >= needed,
                "buffer holds {} samples, block needs {}",
                data.len(),
                needed
            );
        }

        Self {
            data,
            channels,
            frames,
            stride,
        }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn channel(&self, channel: usize) -> &[f32] {
        let start = channel * self.stride;
        &self.data[start..start + self.frames]
    }

    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        let start = channel * self.stride;
        &mut self.data[start..start + self.frames]
    }

    /// View of `len` frames starting at frame `start`, sharing this block's stride.
    pub fn slice_frames(&mut self, start: usize, len: usize) -> AudioBlock<'_> {
        assert!(start + len <= self.frames);
        AudioBlock {
            data: &mut self.data[start..],
            channels: self.channels,
            frames: len,
            stride: self.stride,
        }
    }
}
