#[cfg(feature = "rtrb")]
use rtrb::Consumer;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::io::{converter::midi_to_synth, midi::MidiEvent};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SynthMessage {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8, velocity: u8 },
    Sustain { down: bool },
    /// Release every voice with tail-off.
    AllNotesOff,
    /// Silence every voice immediately.
    AllSoundOff,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

/// A message stamped with its sample offset inside the current block.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TimedMessage {
    pub offset: usize,
    pub message: SynthMessage,
}

/// Fixed-capacity, offset-ordered list of the messages for one block.
///
/// The capacity is reserved up front; pushing past it drops the message and
/// bumps [`MidiBlock::dropped`] instead of allocating on the audio thread.
#[derive(Debug, Clone)]
pub struct MidiBlock {
    events: Vec<TimedMessage>,
    dropped: usize,
}

impl MidiBlock {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
            dropped: 0,
        }
    }

    /// Insert keeping offsets ascending; equal offsets keep arrival order.
    /// Returns false if the block is full.
    pub fn push(&mut self, offset: usize, message: SynthMessage) -> bool {
        if self.events.len() == self.events.capacity() {
            self.dropped += 1;
            return false;
        }
        let at = self.events.partition_point(|e| e.offset <= offset);
        self.events.insert(at, TimedMessage { offset, message });
        true
    }

    /// Push a raw MIDI event, listening on all channels. Events the synth has
    /// no message for are skipped and do not count as dropped.
    pub fn push_midi(&mut self, offset: usize, event: MidiEvent) -> bool {
        match midi_to_synth(event, None) {
            Some(message) => self.push(offset, message),
            None => true,
        }
    }

    /// Move everything waiting in `rx` into the block at offset 0.
    pub fn drain_from<R: MessageReceiver>(&mut self, rx: &mut R) {
        while let Some(message) = rx.pop() {
            self.push(0, message);
        }
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn as_slice(&self) -> &[TimedMessage] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.events.capacity()
    }

    /// Messages lost to a full block since construction.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}
