use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::wavetable::Wavetable,
    error::{check_sample_rate, Result, SynthError},
};

/*
Wavetable Oscillator
====================

The oscillator walks through a shared wavetable at a rate that produces the
requested pitch. All it owns is a phase position and a step size; the table
itself is borrowed through an Arc and never written.

Vocabulary
----------

  current_index  Phase, measured in table points. Always in [0, table_size).

  table_delta    How many table points we advance per output sample.

      table_delta = frequency * table_size / sample_rate

  Example: a 4096-point table at 44.1kHz playing 441 Hz advances 40.96 points
  per sample, so one cycle takes exactly 100 samples.


Reading Between Points
----------------------

current_index is fractional. We look at the two surrounding points:

    table:  ... [v0]──────────[v1] ...
                 i0     ↑     i0+1
                   current_index

Two strategies are available:

  Linear   v0 + frac * (v1 - v0). True linear interpolation.

  Forward  v1 outright, whatever the fraction. This is what you get when the
           interpolation weight is pinned to 1.0. Kept so older renders can be
           reproduced bit-for-bit; it sounds very slightly brighter/aliased on
           small tables and is inaudible on the default 2^24-point table.


Wrapping
--------

After each read we step forward and wrap with a single subtraction. That only
works while table_delta < table_size, so set_frequency() folds larger steps
back into range: stepping table_size + x points lands on the same phase as
stepping x.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Blend the two neighbouring points by the fractional phase.
    #[default]
    Linear,
    /// Always return the next point (fraction weight fixed at 1.0).
    Forward,
}

#[derive(Debug, Clone)]
pub struct WavetableOscillator {
    table: Arc<Wavetable>,
    current_index: f32,
    table_delta: f32,
    interpolation: Interpolation,
}

impl WavetableOscillator {
    pub fn new(table: Arc<Wavetable>) -> Self {
        Self {
            table,
            current_index: 0.0,
            table_delta: 0.0,
            interpolation: Interpolation::default(),
        }
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Start from an arbitrary phase (in table points).
    pub fn with_phase(mut self, phase: f32) -> Self {
        let size = self.table.table_size() as f32;
        let phase = phase.rem_euclid(size);
        // rem_euclid rounds tiny negative phases up to exactly `size`.
        self.current_index = if phase >= size { 0.0 } else { phase };
        self
    }

    pub fn set_frequency(&mut self, frequency: f32, sample_rate: f32) -> Result<()> {
        let sample_rate = check_sample_rate(sample_rate)?;
        if !frequency.is_finite() || frequency < 0.0 {
            return Err(SynthError::InvalidFrequency(frequency));
        }

        let size = self.table.table_size() as f32;
        let mut delta = frequency * (size / sample_rate);
        if delta >= size {
            delta %= size;
        }
        self.table_delta = delta;
        Ok(())
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let table = self.table.samples();
        let size = self.table.table_size();

        let index0 = (self.current_index as usize).min(size - 1);
        let value0 = table[index0];
        let value1 = table[index0 + 1];

        let sample = match self.interpolation {
            Interpolation::Linear => {
                let frac = self.current_index - index0 as f32;
                value0 + frac * (value1 - value0)
            }
            Interpolation::Forward => value1,
        };

        self.current_index += self.table_delta;
        if self.current_index >= size as f32 {
            self.current_index -= size as f32;
        }

        sample
    }

    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }

    pub fn current_index(&self) -> f32 {
        self.current_index
    }

    pub fn table_delta(&self) -> f32 {
        self.table_delta
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn table(&self) -> &Arc<Wavetable> {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::wavetable::{Harmonic, HarmonicSeries};

    const TABLE_SIZE: usize = 4096;

    fn table() -> Arc<Wavetable> {
        Arc::new(Wavetable::new(TABLE_SIZE).unwrap())
    }

    /// Four points of a single sine, distinct neighbours everywhere.
    fn small_table() -> Arc<Wavetable> {
        let series = HarmonicSeries::new(vec![Harmonic {
            number: 1,
            weight: 1.0,
        }])
        .unwrap();
        Arc::new(Wavetable::from_harmonics(4, &series).unwrap())
    }

    #[test]
    fn delta_follows_frequency() {
        let mut osc = WavetableOscillator::new(table());
        osc.set_frequency(441.0, 44_100.0).unwrap();
        assert!((osc.table_delta() - 40.96).abs() < 1e-4);
    }

    #[test]
    fn phase_wraps_once_per_period() {
        // table_delta = table_size / 100
        let mut osc = WavetableOscillator::new(table());
        osc.set_frequency(441.0, 44_100.0).unwrap();

        for _ in 0..100 {
            osc.next_sample();
        }

        let size = TABLE_SIZE as f32;
        let idx = osc.current_index();
        let distance = idx.min(size - idx);
        assert!(distance < 1e-2, "phase drifted to {idx}");
    }

    #[test]
    fn phase_stays_in_range() {
        let mut osc = WavetableOscillator::new(table());
        osc.set_frequency(7_919.0, 44_100.0).unwrap();
        for _ in 0..10_000 {
            osc.next_sample();
            let idx = osc.current_index();
            assert!((0.0..TABLE_SIZE as f32).contains(&idx), "index {idx}");
        }
    }

    #[test]
    fn start_phase_is_folded_into_range() {
        let size = TABLE_SIZE as f32;
        let osc = WavetableOscillator::new(table()).with_phase(-1e-10);
        assert_eq!(osc.current_index(), 0.0);

        let osc = WavetableOscillator::new(table()).with_phase(size + 3.0);
        assert!((osc.current_index() - 3.0).abs() < 1e-3);

        let osc = WavetableOscillator::new(table()).with_phase(-3.0);
        assert!((osc.current_index() - (size - 3.0)).abs() < 1e-3);
    }

    #[test]
    fn oversize_delta_is_folded() {
        // Above the sample rate the step exceeds a whole table rotation.
        let mut osc = WavetableOscillator::new(table());
        osc.set_frequency(1.5 * 44_100.0, 44_100.0).unwrap();
        assert!((osc.table_delta() - TABLE_SIZE as f32 * 0.5).abs() < 1e-2);

        for _ in 0..1_000 {
            let s = osc.next_sample();
            assert!(s.is_finite());
            assert!(osc.current_index() < TABLE_SIZE as f32);
        }
    }

    #[test]
    fn rejects_bad_sample_rate() {
        let mut osc = WavetableOscillator::new(table());
        assert_eq!(
            osc.set_frequency(440.0, 0.0),
            Err(SynthError::InvalidSampleRate(0.0))
        );
        assert!(osc.set_frequency(440.0, -1.0).is_err());
        assert!(osc.set_frequency(f32::NAN, 44_100.0).is_err());
        assert!(osc.set_frequency(-10.0, 44_100.0).is_err());
        // Failed calls leave the oscillator untouched.
        assert_eq!(osc.table_delta(), 0.0);
    }

    #[test]
    fn forward_mode_ignores_fraction() {
        let table = small_table();
        let samples = table.samples().to_vec();

        let mut osc = WavetableOscillator::new(table)
            .with_interpolation(Interpolation::Forward)
            .with_phase(0.25);
        // Reference behaviour: the next point outright, not a blend.
        assert_eq!(osc.next_sample(), samples[1]);
    }

    #[test]
    fn linear_mode_blends_neighbours() {
        let table = small_table();
        let samples = table.samples().to_vec();

        let mut osc = WavetableOscillator::new(table)
            .with_interpolation(Interpolation::Linear)
            .with_phase(0.25);
        let expected = samples[0] + 0.25 * (samples[1] - samples[0]);
        let actual = osc.next_sample();
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
        assert_ne!(actual, samples[1]);
    }

    #[test]
    fn modes_agree_on_integer_phase_for_linear() {
        let table = small_table();
        let samples = table.samples().to_vec();

        let mut linear = WavetableOscillator::new(table.clone()).with_phase(2.0);
        let mut forward = WavetableOscillator::new(table)
            .with_interpolation(Interpolation::Forward)
            .with_phase(2.0);

        // At an integer phase linear reads the point itself, forward the next.
        assert_eq!(linear.next_sample(), samples[2]);
        assert_eq!(forward.next_sample(), samples[3]);
    }

    #[test]
    fn guard_sample_is_read_at_last_point() {
        let table = small_table();
        let samples = table.samples().to_vec();

        let mut osc = WavetableOscillator::new(table)
            .with_interpolation(Interpolation::Forward)
            .with_phase(3.5);
        assert_eq!(osc.next_sample(), samples[4]);
        assert_eq!(samples[4], samples[0]);
    }

    #[test]
    fn render_fills_buffer() {
        let mut osc = WavetableOscillator::new(table());
        osc.set_frequency(440.0, 48_000.0).unwrap();
        let mut buffer = vec![0.0f32; 256];
        osc.render(&mut buffer);
        assert!(buffer.iter().any(|s| s.abs() > 0.1));
    }
}
