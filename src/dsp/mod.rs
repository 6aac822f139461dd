//! Low-level DSP primitives used by the synth voices.
//!
//! These components are allocation-free once built and realtime-safe, making
//! them safe to embed directly inside voice structs. The wavetable is the one
//! exception: it is built once up front and then only ever read.

/// Exponential release envelope.
pub mod envelope;
/// Phase-accumulating wavetable reader.
pub mod oscillator;
/// Additive single-cycle table generation.
pub mod wavetable;

pub use envelope::TailOff;
pub use oscillator::{Interpolation, WavetableOscillator};
pub use wavetable::{Harmonic, HarmonicSeries, Wavetable};
