use crate::{
    config::SynthConfig,
    dsp::{
        envelope::TailOff,
        oscillator::{Interpolation, WavetableOscillator},
    },
    error::{Result, SynthError},
    io::{converter::midi_note_to_freq, AudioBuffer},
    synth::sound::Sound,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,       // Available for allocation, renders nothing
    Sustaining, // Note held, full level
    Releasing,  // Note released, tail-off fading out
}

/// One slot of polyphony. The slot lives for the life of the synth; the
/// oscillator inside it is replaced on every note start.
#[derive(Debug, Clone)]
pub struct Voice {
    note: Option<u8>,
    level: f32,
    state: VoiceState,
    age: u64,
    key_down: bool,
    sustain_held: bool,
    tail_off: TailOff,
    osc: Option<WavetableOscillator>,
    interpolation: Interpolation,
    level_per_velocity: f32,
}

impl Voice {
    pub fn new(interpolation: Interpolation, level_per_velocity: f32, tail_off: TailOff) -> Self {
        Self {
            note: None,
            level: 0.0,
            state: VoiceState::Idle,
            age: 0,
            key_down: false,
            sustain_held: false,
            tail_off,
            osc: None,
            interpolation,
            level_per_velocity,
        }
    }

    pub fn from_config(config: &SynthConfig) -> Self {
        Self::new(
            config.interpolation,
            config.level_per_velocity,
            TailOff::new(config.tail_off_factor, config.tail_off_threshold),
        )
    }

    pub fn can_play_sound(&self, sound: &Sound) -> bool {
        match sound {
            Sound::Wavetable(_) => true,
        }
    }

    /// Start `note` at `velocity` (0.0..=1.0), replacing whatever was playing.
    ///
    /// On error the voice is left exactly as it was.
    pub fn start_note(
        &mut self,
        note: u8,
        velocity: f32,
        sound: &Sound,
        sample_rate: f32,
        age: u64,
    ) -> Result<()> {
        if !self.can_play_sound(sound) {
            return Err(SynthError::UnplayableSound);
        }
        let Sound::Wavetable(table) = sound;

        let mut osc =
            WavetableOscillator::new(table.clone()).with_interpolation(self.interpolation);
        osc.set_frequency(midi_note_to_freq(note), sample_rate)?;

        self.osc = Some(osc);
        self.note = Some(note);
        self.level = velocity.clamp(0.0, 1.0) * self.level_per_velocity;
        self.tail_off.reset();
        self.state = VoiceState::Sustaining;
        self.age = age;
        self.key_down = true;
        self.sustain_held = false;
        Ok(())
    }

    /// Release the note. With tail-off the voice fades out over the next few
    /// hundred samples; without it the voice goes silent immediately.
    pub fn stop_note(&mut self, allow_tail_off: bool) {
        self.key_down = false;
        self.sustain_held = false;

        if allow_tail_off {
            if self.state == VoiceState::Sustaining {
                self.tail_off.trigger();
                self.state = VoiceState::Releasing;
            }
        } else {
            self.clear_note();
        }
    }

    /// Add this voice's output for `num_samples` samples from `start_sample`
    /// into every channel of `out`. Idle voices add nothing.
    pub fn render_next_block(
        &mut self,
        out: &mut AudioBuffer,
        start_sample: usize,
        num_samples: usize,
    ) {
        let Some(osc) = self.osc.as_mut() else {
            return;
        };
        let end = start_sample + num_samples;

        match self.state {
            VoiceState::Idle => {}
            VoiceState::Sustaining => {
                for index in start_sample..end {
                    out.add_to_all(index, osc.next_sample() * self.level);
                }
            }
            VoiceState::Releasing => {
                let mut finished = false;
                for index in start_sample..end {
                    let sample = osc.next_sample() * self.level * self.tail_off.gain();
                    out.add_to_all(index, sample);

                    if self.tail_off.advance() {
                        finished = true;
                        break;
                    }
                }
                if finished {
                    self.clear_note();
                }
            }
        }
    }

    fn clear_note(&mut self) {
        self.state = VoiceState::Idle;
        self.note = None;
        self.osc = None;
        self.key_down = false;
        self.sustain_held = false;
        self.tail_off.reset();
    }

    pub fn is_idle(&self) -> bool {
        self.state == VoiceState::Idle
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, VoiceState::Sustaining | VoiceState::Releasing)
    }

    pub fn is_playing_note(&self, note: u8) -> bool {
        self.is_active() && self.note == Some(note)
    }

    pub fn note(&self) -> Option<u8> {
        self.note
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    /// Peak amplitude derived from velocity.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Current tail-off multiplier; 0.0 unless releasing.
    pub fn tail_off(&self) -> f32 {
        self.tail_off.gain()
    }

    /// Amplitude the next sample will be scaled by.
    pub fn gain(&self) -> f32 {
        match self.state {
            VoiceState::Idle => 0.0,
            VoiceState::Sustaining => self.level,
            VoiceState::Releasing => self.level * self.tail_off.gain(),
        }
    }

    pub fn is_key_down(&self) -> bool {
        self.key_down
    }

    pub fn is_sustain_held(&self) -> bool {
        self.sustain_held
    }

    /// Key released while the sustain pedal is down: keep sounding until the
    /// pedal comes up.
    pub(crate) fn hold_for_sustain(&mut self) {
        self.key_down = false;
        self.sustain_held = true;
    }

    pub fn oscillator(&self) -> Option<&WavetableOscillator> {
        self.osc.as_ref()
    }
}
