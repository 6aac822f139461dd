// Purpose: Voice management, polyphony, MIDI handling
// This layer sits above the DSP primitives and manages multiple voices

pub mod allocator;
pub mod message;
pub mod poly;
pub mod sound;
pub mod voice;

pub use allocator::VoiceStealing;
pub use message::{MessageReceiver, MidiBlock, SynthMessage, TimedMessage};
pub use poly::{AllocationStats, PolySynth};
pub use sound::Sound;
pub use voice::{Voice, VoiceState};
