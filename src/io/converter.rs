use crate::{io::midi::MidiEvent, synth::message::SynthMessage};

pub const CC_SUSTAIN: u8 = 64;
pub const CC_ALL_SOUND_OFF: u8 = 120;
pub const CC_ALL_NOTES_OFF: u8 = 123;

/// Translate a raw MIDI event into a synth message.
///
/// `channel_filter` of `None` listens on every channel (omni).
pub fn midi_to_synth(midi: MidiEvent, channel_filter: Option<u8>) -> Option<SynthMessage> {
    if channel_filter.is_some_and(|c| c != midi.channel()) {
        return None;
    }

    match midi {
        MidiEvent::NoteOn { key, velocity, .. } => Some(SynthMessage::NoteOn {
            note: key,
            velocity,
        }),
        MidiEvent::NoteOff { key, velocity, .. } => Some(SynthMessage::NoteOff {
            note: key,
            velocity,
        }),
        MidiEvent::ControlChange {
            controller, value, ..
        } => match controller {
            CC_SUSTAIN => Some(SynthMessage::Sustain { down: value >= 64 }),
            CC_ALL_SOUND_OFF => Some(SynthMessage::AllSoundOff),
            CC_ALL_NOTES_OFF => Some(SynthMessage::AllNotesOff),
            _ => None,
        },
        // The oscillators have no pitch modulation input.
        MidiEvent::PitchBend { .. } | MidiEvent::ProgramChange { .. } => None,
    }
}

/// Convert MIDI note number to frequency in Hz.
/// A4 = 440 Hz = MIDI note 69
#[inline]
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}
