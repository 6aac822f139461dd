use log::{info, warn};

use crate::{
    config::SynthConfig,
    dsp::wavetable::Wavetable,
    error::{check_sample_rate, Result},
    io::AudioBuffer,
    synth::{
        allocator::{allocate, Allocation, VoiceStealing},
        message::{SynthMessage, TimedMessage},
        sound::Sound,
        voice::Voice,
    },
    MAX_BLOCK_SIZE,
};

/*
Polyphonic Engine
=================

The engine owns a fixed pool of voices and one shared sound. The host calls
render_block() once per audio callback with the messages that arrived for that
block, each stamped with a sample offset.

Event Interleaving
------------------

Messages are applied at the sample they belong to. The block is cut at every
message offset and the voices are rendered piecewise:

    offset:   0        96            300                 511
              ├────────┼─────────────┼────────────────────┤
    events:            NoteOn(60)    NoteOff(60)
    render:   [ 0..96 ][  96..300   ][     300..512       ]

So a note that starts at offset 96 is silent for the first 96 samples and the
output is identical to splitting the block in two host callbacks.

Mixing
------

Every voice adds into the output; nothing overwrites. The block region is
cleared first, then each voice accumulates. Idle voices are still visited and
render nothing. There is no limiter: four voices at full velocity stay well
inside [-1, 1] with the default level of 0.025, and anything louder is the
host's business to clamp.

Voice Allocation
----------------

  note-on   first idle voice, else steal per VoiceStealing, else drop
  note-off  the voice playing that key; held instead if the sustain pedal is down
  sustain   pedal up releases every voice it was holding

A repeated note-on for a key that is already sounding releases the old voice
first so one key never owns two sustaining voices.

Steals and dropped notes happen on the audio thread, so they are only counted
here (see AllocationStats). The host reads the counters and logs them.
*/

/// Running totals of allocation outcomes since construction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AllocationStats {
    /// Note-ons that restarted a busy voice.
    pub stolen: u64,
    /// Note-ons that found no voice and were ignored.
    pub dropped: u64,
}

pub struct PolySynth {
    voices: Vec<Voice>,
    sound: Sound,
    stealing: VoiceStealing,
    sample_rate: Option<f32>,
    frame_counter: u64,
    sustain_pedal: bool,
    stats: AllocationStats,
}

impl PolySynth {
    pub fn new(config: SynthConfig) -> Result<Self> {
        config.validate()?;

        let table = Wavetable::from_harmonics(config.table_size, &config.harmonics)?;
        info!(
            target: "synth",
            "built {}-point wavetable ({} harmonics, peak {:.3})",
            table.table_size(),
            config.harmonics.harmonics().len(),
            table.peak()
        );

        let voices = (0..config.voices)
            .map(|_| Voice::from_config(&config))
            .collect();

        Ok(Self {
            voices,
            sound: Sound::wavetable(table),
            stealing: config.stealing,
            sample_rate: None,
            frame_counter: 0,
            sustain_pedal: false,
            stats: AllocationStats::default(),
        })
    }

    /// Configure for playback. Must succeed before render_block produces
    /// sound.
    pub fn prepare_to_play(
        &mut self,
        expected_block_size: usize,
        sample_rate: f32,
    ) -> Result<()> {
        let sample_rate = check_sample_rate(sample_rate)?;
        if expected_block_size > MAX_BLOCK_SIZE {
            warn!(
                target: "synth",
                "expected block size {expected_block_size} exceeds MAX_BLOCK_SIZE ({MAX_BLOCK_SIZE}); hosts should split blocks"
            );
        }
        info!(
            target: "synth",
            "prepared: {sample_rate} Hz, {expected_block_size}-sample blocks, {} voices",
            self.voices.len()
        );
        self.sample_rate = Some(sample_rate);
        Ok(())
    }

    /// Stop everything immediately. The wavetable stays loaded.
    pub fn release_resources(&mut self) {
        self.all_notes_off(false);
        self.sustain_pedal = false;
    }

    /// Render `num_samples` samples from `start_sample` into `out`, applying
    /// `events` (sorted by offset, relative to `start_sample`) as it goes.
    pub fn render_block(
        &mut self,
        out: &mut AudioBuffer,
        start_sample: usize,
        num_samples: usize,
        events: &[TimedMessage],
    ) {
        let start_sample = start_sample.min(out.num_samples());
        let num_samples = num_samples.min(out.num_samples() - start_sample);
        out.clear_region(start_sample, num_samples);

        if self.sample_rate.is_none() {
            // Not prepared: stay silent and drop events.
            return;
        }

        let mut position = 0;
        for event in events {
            let offset = event.offset.clamp(position, num_samples);
            if offset > position {
                self.render_voices(out, start_sample + position, offset - position);
                position = offset;
            }
            self.handle_message(event.message);
        }

        if position < num_samples {
            self.render_voices(out, start_sample + position, num_samples - position);
        }
    }

    fn render_voices(&mut self, out: &mut AudioBuffer, start_sample: usize, num_samples: usize) {
        for voice in &mut self.voices {
            voice.render_next_block(out, start_sample, num_samples);
        }
        // Advanced per segment so note ages are sample-accurate.
        self.frame_counter += num_samples as u64;
    }

    pub fn handle_message(&mut self, message: SynthMessage) {
        match message {
            SynthMessage::NoteOn { note, velocity } => {
                if velocity == 0 {
                    self.note_off(note, true);
                } else {
                    self.note_on(note, velocity as f32 / 127.0);
                }
            }
            SynthMessage::NoteOff { note, .. } => self.note_off(note, true),
            SynthMessage::Sustain { down } => self.set_sustain_pedal(down),
            SynthMessage::AllNotesOff => self.all_notes_off(true),
            SynthMessage::AllSoundOff => self.all_notes_off(false),
        }
    }

    /// Start `note` at `velocity` (0.0..=1.0) on a free or stolen voice.
    /// Dropped silently if the engine is unprepared or no voice is available.
    pub fn note_on(&mut self, note: u8, velocity: f32) {
        let Some(sample_rate) = self.sample_rate else {
            return;
        };
        if !self.sound.applies_to_note(note) {
            return;
        }

        // One voice per key: release a previous instance of this note.
        for voice in &mut self.voices {
            if voice.is_playing_note(note) && (voice.is_key_down() || voice.is_sustain_held()) {
                voice.stop_note(true);
            }
        }

        let Some(allocation) = allocate(&self.voices, &self.sound, self.stealing) else {
            self.stats.dropped += 1;
            return;
        };
        if let Allocation::Steal(_) = allocation {
            self.stats.stolen += 1;
        }

        let voice = &mut self.voices[allocation.index()];
        if voice
            .start_note(note, velocity, &self.sound, sample_rate, self.frame_counter)
            .is_err()
        {
            self.stats.dropped += 1;
        }
    }

    /// Release every voice currently holding `note` down.
    pub fn note_off(&mut self, note: u8, allow_tail_off: bool) {
        let sustain = self.sustain_pedal;
        for voice in &mut self.voices {
            if voice.is_playing_note(note) && voice.is_key_down() {
                if sustain {
                    voice.hold_for_sustain();
                } else {
                    voice.stop_note(allow_tail_off);
                }
            }
        }
    }

    pub fn all_notes_off(&mut self, allow_tail_off: bool) {
        for voice in &mut self.voices {
            if voice.is_active() {
                voice.stop_note(allow_tail_off);
            }
        }
    }

    pub fn set_sustain_pedal(&mut self, down: bool) {
        self.sustain_pedal = down;
        if !down {
            for voice in &mut self.voices {
                if voice.is_sustain_held() {
                    voice.stop_note(true);
                }
            }
        }
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    pub fn sample_rate(&self) -> Option<f32> {
        self.sample_rate
    }

    pub fn sound(&self) -> &Sound {
        &self.sound
    }

    pub fn is_sustain_pedal_down(&self) -> bool {
        self.sustain_pedal
    }

    /// Samples rendered since construction.
    pub fn frames_rendered(&self) -> u64 {
        self.frame_counter
    }

    pub fn allocation_stats(&self) -> AllocationStats {
        self.stats
    }
}
