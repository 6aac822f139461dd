#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, SynthError};

/*
Wavetable Generation
====================

A wavetable is one cycle of a waveform, sampled once and stored. Playing a note
means reading that cycle over and over at whatever rate gives the right pitch.
The expensive part (summing sines) happens once, up front. The realtime part is
just table lookups.

Vocabulary
----------

  table_size  Number of distinct points in one cycle. The buffer actually holds
              table_size + 1 samples (see "guard sample" below).

  harmonic    An integer multiple of the fundamental. Harmonic 1 is the
              fundamental itself, harmonic 2 is an octave up, harmonic 3 an
              octave and a fifth, and so on.

  weight      How loud each harmonic is relative to the others.


Additive Synthesis
------------------

The default series sums harmonics 1 through 8 with weight 1/n:

    sample[i] = Σ  sin(2π · n · i / (table_size - 1)) / n      n = 1..=8

That is the first eight terms of a sawtooth's Fourier series, so the result is
a bright, buzzy, band-limited ramp:

     1.5 ┤╲
         │ ╲╲
     0.0 ┤   ╲╲        ╱
         │     ╲╲    ╱╱
    -1.5 ┤       ╲╲╱╱
         └──────────────→ i

The divisor is (table_size - 1), not table_size: the cycle closes one step
early, which is why we need at least two points.


The Guard Sample
----------------

Readers look at two neighbours, table[i] and table[i + 1]. When i is the last
point of the cycle, i + 1 would run off the end, so we store one extra sample
and make it a copy of the first:

    index:  0    1    2   ...  N-1    N
           [a]  [b]  [c]  ...  [y]   [a]   ← guard == samples[0]

No bounds check or modulo in the hot loop.

Angles are accumulated in f64 and stored as f32. With 2^24 points an f32 angle
would lose several bits of precision by the end of the table.
*/

/// Default table resolution: 2^24 points per cycle.
pub const DEFAULT_TABLE_SIZE: usize = 1 << 24;

/// One partial of the table: a harmonic number and its amplitude.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Harmonic {
    pub number: u32,
    pub weight: f32,
}

/// The set of partials summed into a wavetable.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicSeries {
    harmonics: Vec<Harmonic>,
}

impl HarmonicSeries {
    pub fn new(harmonics: Vec<Harmonic>) -> Result<Self> {
        let series = Self { harmonics };
        series.validate()?;
        Ok(series)
    }

    /// Harmonics `1..=count`, each weighted `1/n`.
    pub fn sawtooth(count: u32) -> Self {
        let harmonics = (1..=count)
            .map(|number| Harmonic {
                number,
                weight: 1.0 / number as f32,
            })
            .collect();
        Self { harmonics }
    }

    pub fn harmonics(&self) -> &[Harmonic] {
        &self.harmonics
    }

    pub fn validate(&self) -> Result<()> {
        if self.harmonics.is_empty() {
            return Err(SynthError::InvalidHarmonics("series is empty"));
        }
        for h in &self.harmonics {
            if h.number == 0 {
                return Err(SynthError::InvalidHarmonics("harmonic numbers start at 1"));
            }
            if !h.weight.is_finite() {
                return Err(SynthError::InvalidHarmonics("weights must be finite"));
            }
        }
        Ok(())
    }
}

impl Default for HarmonicSeries {
    fn default() -> Self {
        Self::sawtooth(8)
    }
}

/// An immutable single-cycle waveform with a trailing guard sample.
///
/// Built once and shared read-only (behind an `Arc`) by every oscillator.
#[derive(Debug, Clone, PartialEq)]
pub struct Wavetable {
    samples: Vec<f32>,
}

impl Wavetable {
    /// Build a table of `table_size` points from the default eight-harmonic
    /// series.
    pub fn new(table_size: usize) -> Result<Self> {
        Self::from_harmonics(table_size, &HarmonicSeries::default())
    }

    pub fn from_harmonics(table_size: usize, series: &HarmonicSeries) -> Result<Self> {
        if table_size < 2 {
            return Err(SynthError::InvalidTableSize(table_size));
        }
        series.validate()?;

        let mut samples = vec![0.0f32; table_size + 1];
        let cycle = std::f64::consts::TAU / (table_size - 1) as f64;

        for h in series.harmonics() {
            let angle_delta = cycle * h.number as f64;
            let weight = h.weight as f64;
            for (i, sample) in samples[..table_size].iter_mut().enumerate() {
                *sample += ((angle_delta * i as f64).sin() * weight) as f32;
            }
        }

        samples[table_size] = samples[0];

        Ok(Self { samples })
    }

    /// Number of points in one cycle (excludes the guard sample).
    #[inline]
    pub fn table_size(&self) -> usize {
        self.samples.len() - 1
    }

    /// All `table_size + 1` samples, guard included.
    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }
}
