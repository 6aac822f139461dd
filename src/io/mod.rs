// Purpose - external interfaces, format conversions

pub mod converter;
pub mod midi;

/// Non-interleaved multi-channel output buffer.
///
/// Sized once up front; nothing here allocates after construction.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    pub fn new(num_channels: usize, num_samples: usize) -> Self {
        Self {
            channels: vec![vec![0.0; num_samples]; num_channels],
        }
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn num_samples(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.channels[index]
    }

    /// Zero `len` samples from `start` on every channel, clamped to the buffer.
    pub fn clear_region(&mut self, start: usize, len: usize) {
        for channel in &mut self.channels {
            let start = start.min(channel.len());
            let end = start.saturating_add(len).min(channel.len());
            channel[start..end].fill(0.0);
        }
    }

    pub fn clear(&mut self) {
        for channel in &mut self.channels {
            channel.fill(0.0);
        }
    }

    /// Add `value` at `index` on every channel. Out-of-range writes are
    /// ignored.
    #[inline]
    pub fn add_to_all(&mut self, index: usize, value: f32) {
        for channel in &mut self.channels {
            if let Some(sample) = channel.get_mut(index) {
                *sample += value;
            }
        }
    }

    /// Copy the first `frames` samples into an interleaved device buffer.
    ///
    /// `out` is filled frame by frame until either side runs out; extra device
    /// channels receive silence, extra buffer channels are skipped.
    pub fn write_interleaved(&self, out: &mut [f32], device_channels: usize, frames: usize) {
        if device_channels == 0 {
            return;
        }
        let frames = frames.min(self.num_samples());
        for (frame, chunk) in out.chunks_mut(device_channels).take(frames).enumerate() {
            for (ch, slot) in chunk.iter_mut().enumerate() {
                *slot = self.channels.get(ch).map_or(0.0, |c| c[frame]);
            }
        }
    }

    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flat_map(|c| c.iter())
            .fold(0.0f32, |acc, s| acc.max(s.abs()))
    }
}
