pub mod config;
pub mod dsp;
pub mod error;
pub mod io;
pub mod synth; // Voice management and polyphony

pub use config::SynthConfig;
pub use error::{Result, SynthError};
pub use io::{converter::midi_note_to_freq, midi::MidiEvent, AudioBuffer};
pub use synth::{AllocationStats, MidiBlock, PolySynth, SynthMessage, TimedMessage};

pub const MAX_BLOCK_SIZE: usize = 2048;
