use std::sync::Arc;

use crate::dsp::wavetable::Wavetable;

/// A sound definition voices can be asked to play.
///
/// Voices decide whether they can render a sound by matching on the variant,
/// so adding a kind here forces every capability check to be revisited.
#[derive(Debug, Clone)]
pub enum Sound {
    /// Harmonic wavetable shared by every voice.
    Wavetable(Arc<Wavetable>),
}

impl Sound {
    pub fn wavetable(table: Wavetable) -> Self {
        Sound::Wavetable(Arc::new(table))
    }

    /// Whether this sound should respond to the given key.
    pub fn applies_to_note(&self, _note: u8) -> bool {
        match self {
            Sound::Wavetable(_) => true,
        }
    }

    /// Whether this sound should respond to the given MIDI channel.
    pub fn applies_to_channel(&self, _channel: u8) -> bool {
        match self {
            Sound::Wavetable(_) => true,
        }
    }

    pub fn table(&self) -> Option<&Arc<Wavetable>> {
        match self {
            Sound::Wavetable(table) => Some(table),
        }
    }
}
