//! Real-world scenario benchmarks.
//!
//! These benchmarks model what the audio callback actually does: single voices
//! and the whole engine with MIDI arriving mid-block.

mod engine;
mod voices;

pub use engine::bench_engine;
pub use voices::bench_voices;
