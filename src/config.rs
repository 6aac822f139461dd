#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{
        envelope::{DEFAULT_TAIL_OFF_FACTOR, DEFAULT_TAIL_OFF_THRESHOLD},
        oscillator::Interpolation,
        wavetable::{HarmonicSeries, DEFAULT_TABLE_SIZE},
    },
    error::{Result, SynthError},
    synth::allocator::VoiceStealing,
};

/// Peak voice amplitude per unit of (normalised 0..1) velocity.
pub const DEFAULT_LEVEL_PER_VELOCITY: f32 = 0.025;

pub const DEFAULT_VOICES: usize = 4;

/// Everything needed to build a [`PolySynth`](crate::synth::poly::PolySynth).
///
/// The voice count and table are fixed once the synth is built.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub voices: usize,
    pub table_size: usize,
    pub harmonics: HarmonicSeries,
    pub interpolation: Interpolation,
    pub stealing: VoiceStealing,
    pub level_per_velocity: f32,
    pub tail_off_factor: f32,
    pub tail_off_threshold: f32,
}

impl SynthConfig {
    pub fn with_voices(mut self, voices: usize) -> Self {
        self.voices = voices;
        self
    }

    pub fn with_table_size(mut self, table_size: usize) -> Self {
        self.table_size = table_size;
        self
    }

    pub fn with_harmonics(mut self, harmonics: HarmonicSeries) -> Self {
        self.harmonics = harmonics;
        self
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_stealing(mut self, stealing: VoiceStealing) -> Self {
        self.stealing = stealing;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.voices == 0 {
            return Err(SynthError::InvalidConfig("at least one voice is required"));
        }
        if self.table_size < 2 {
            return Err(SynthError::InvalidTableSize(self.table_size));
        }
        self.harmonics.validate()?;
        if !self.level_per_velocity.is_finite() || self.level_per_velocity < 0.0 {
            return Err(SynthError::InvalidConfig(
                "level per velocity must be finite and non-negative",
            ));
        }
        if !(self.tail_off_factor > 0.0 && self.tail_off_factor < 1.0) {
            return Err(SynthError::InvalidConfig(
                "tail-off factor must be between 0 and 1",
            ));
        }
        if !(self.tail_off_threshold > 0.0 && self.tail_off_threshold < 1.0) {
            return Err(SynthError::InvalidConfig(
                "tail-off threshold must be between 0 and 1",
            ));
        }
        Ok(())
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            voices: DEFAULT_VOICES,
            table_size: DEFAULT_TABLE_SIZE,
            harmonics: HarmonicSeries::default(),
            interpolation: Interpolation::default(),
            stealing: VoiceStealing::default(),
            level_per_velocity: DEFAULT_LEVEL_PER_VELOCITY,
            tail_off_factor: DEFAULT_TAIL_OFF_FACTOR,
            tail_off_threshold: DEFAULT_TAIL_OFF_THRESHOLD,
        }
    }
}
