//! Errors raised while configuring the synth.
//!
//! Nothing in here is produced from inside the per-sample loop. Everything that
//! can fail (table construction, sample-rate validation, capability checks) is
//! checked before rendering starts, and the render path degrades to dropped
//! notes instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    #[error("sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f32),

    #[error("frequency must be non-negative and finite, got {0}")]
    InvalidFrequency(f32),

    #[error("wavetable size must be at least 2, got {0}")]
    InvalidTableSize(usize),

    #[error("invalid harmonic series: {0}")]
    InvalidHarmonics(&'static str),

    #[error("invalid synth configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("voice cannot play this sound")]
    UnplayableSound,
}

pub type Result<T> = std::result::Result<T, SynthError>;

/// Shared sample-rate precondition.
pub(crate) fn check_sample_rate(sample_rate: f32) -> Result<f32> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(sample_rate)
    } else {
        Err(SynthError::InvalidSampleRate(sample_rate))
    }
}
