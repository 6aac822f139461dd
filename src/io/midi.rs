#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Channel voice messages the synth understands.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    /// 14-bit bend centred on zero: -8192..=8191.
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

impl MidiEvent {
    /// Decode one short MIDI message as delivered by a device driver.
    ///
    /// System messages, running status, truncated messages and data bytes
    /// with the high bit set yield `None`.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        if status < 0x80 {
            return None;
        }
        let channel = status & 0x0F;
        let data1 = data.first().copied().filter(|b| *b < 0x80);
        let data2 = data.get(1).copied().filter(|b| *b < 0x80);

        match status & 0xF0 {
            0x80 => Some(MidiEvent::NoteOff {
                channel,
                key: data1?,
                velocity: data2?,
            }),
            0x90 => Some(MidiEvent::NoteOn {
                channel,
                key: data1?,
                velocity: data2?,
            }),
            0xB0 => Some(MidiEvent::ControlChange {
                channel,
                controller: data1?,
                value: data2?,
            }),
            0xC0 => Some(MidiEvent::ProgramChange {
                channel,
                program: data1?,
            }),
            0xE0 => {
                let raw = (data2? as i16) << 7 | data1? as i16;
                Some(MidiEvent::PitchBend {
                    channel,
                    value: raw - 8192,
                })
            }
            _ => None,
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::ControlChange { channel, .. }
            | MidiEvent::PitchBend { channel, .. }
            | MidiEvent::ProgramChange { channel, .. } => channel,
        }
    }
}
