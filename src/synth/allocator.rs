//! Picking a voice for an incoming note.
//!
//! Allocation is a pure function of the voice pool, so the same sequence of
//! events always lands on the same voices.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::synth::{
    sound::Sound,
    voice::{Voice, VoiceState},
};

/// What to do with a note-on when every voice is busy.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceStealing {
    /// Take the oldest releasing voice; if none is releasing, the oldest voice.
    #[default]
    Released,
    /// Take the oldest voice regardless of state.
    Oldest,
    /// Drop the new note.
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allocation {
    Free(usize),
    Steal(usize),
}

impl Allocation {
    pub fn index(self) -> usize {
        match self {
            Allocation::Free(idx) | Allocation::Steal(idx) => idx,
        }
    }
}

pub fn allocate(voices: &[Voice], sound: &Sound, stealing: VoiceStealing) -> Option<Allocation> {
    // First pass: first idle voice able to play the sound
    if let Some(idx) = voices
        .iter()
        .position(|v| v.is_idle() && v.can_play_sound(sound))
    {
        return Some(Allocation::Free(idx));
    }

    // Ties on age go to the lowest index (min_by_key keeps the first minimum).
    let oldest = |releasing_only: bool| {
        voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.can_play_sound(sound))
            .filter(|(_, v)| !releasing_only || v.state() == VoiceState::Releasing)
            .min_by_key(|(_, v)| v.age())
            .map(|(idx, _)| Allocation::Steal(idx))
    };

    match stealing {
        VoiceStealing::Released => oldest(true).or_else(|| oldest(false)),
        VoiceStealing::Oldest => oldest(false),
        VoiceStealing::Disabled => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SynthConfig, dsp::wavetable::Wavetable};

    fn setup(n: usize) -> (Vec<Voice>, Sound) {
        let config = SynthConfig::default();
        let voices = (0..n).map(|_| Voice::from_config(&config)).collect();
        (voices, Sound::wavetable(Wavetable::new(256).unwrap()))
    }

    #[test]
    fn prefers_first_idle_voice() {
        let (mut voices, sound) = setup(4);
        assert_eq!(
            allocate(&voices, &sound, VoiceStealing::Disabled),
            Some(Allocation::Free(0))
        );

        voices[0].start_note(60, 1.0, &sound, 48_000.0, 0).unwrap();
        assert_eq!(
            allocate(&voices, &sound, VoiceStealing::Disabled),
            Some(Allocation::Free(1))
        );
    }

    #[test]
    fn steals_oldest_when_full() {
        let (mut voices, sound) = setup(3);
        voices[0].start_note(60, 1.0, &sound, 48_000.0, 30).unwrap();
        voices[1].start_note(62, 1.0, &sound, 48_000.0, 10).unwrap();
        voices[2].start_note(64, 1.0, &sound, 48_000.0, 20).unwrap();

        assert_eq!(
            allocate(&voices, &sound, VoiceStealing::Oldest),
            Some(Allocation::Steal(1))
        );
        assert_eq!(
            allocate(&voices, &sound, VoiceStealing::Released),
            Some(Allocation::Steal(1))
        );
        assert_eq!(allocate(&voices, &sound, VoiceStealing::Disabled), None);
    }

    #[test]
    fn released_policy_prefers_releasing_voices() {
        let (mut voices, sound) = setup(3);
        voices[0].start_note(60, 1.0, &sound, 48_000.0, 0).unwrap();
        voices[1].start_note(62, 1.0, &sound, 48_000.0, 10).unwrap();
        voices[2].start_note(64, 1.0, &sound, 48_000.0, 20).unwrap();
        voices[2].stop_note(true);

        assert_eq!(
            allocate(&voices, &sound, VoiceStealing::Released),
            Some(Allocation::Steal(2))
        );
        assert_eq!(
            allocate(&voices, &sound, VoiceStealing::Oldest),
            Some(Allocation::Steal(0))
        );
    }

    #[test]
    fn equal_ages_break_ties_by_index() {
        let (mut voices, sound) = setup(2);
        voices[0].start_note(60, 1.0, &sound, 48_000.0, 5).unwrap();
        voices[1].start_note(62, 1.0, &sound, 48_000.0, 5).unwrap();
        assert_eq!(
            allocate(&voices, &sound, VoiceStealing::Oldest),
            Some(Allocation::Steal(0))
        );
    }
}
