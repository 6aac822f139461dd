/*
Tail-Off Envelope
=================

The voices in this synth have no attack or decay stage: a note starts at full
level and holds there until the key is released. What happens after release is
the tail-off, a short exponential fade that avoids the click you would get from
cutting the signal dead.

Vocabulary
----------

  gain       The multiplier applied to the voice output. 0.0 means "not
             releasing" (the voice is either holding or idle), anything above
             is the current fade level.

  factor     Per-sample decay multiplier, 0.99 by default.

  threshold  Gain at or below which the fade is considered silent, 0.005 by
             default. Reaching it ends the note.


The Shape: Exponential Decay
----------------------------

  gain
    1.0 ┤●
        │ ╲
        │  ╲
        │   ╲__
        │      ╲___
  0.005 ┤          ╲_____●  → note ends, voice goes idle
    0.0 └──────────────────────→ samples
        0               528

Each sample: gain *= factor. After n samples gain = factor^n, so the number of
samples until silence is

    n = ceil( ln(threshold) / ln(factor) )

With the defaults that is ceil(-5.298 / -0.01005) = 528 samples, about 12ms at
44.1kHz.

Release is one-shot: triggering while already releasing does nothing, so a
second note-off never restarts the fade from the top.
*/

pub const DEFAULT_TAIL_OFF_FACTOR: f32 = 0.99;
pub const DEFAULT_TAIL_OFF_THRESHOLD: f32 = 0.005;

#[derive(Debug, Clone, Copy)]
pub struct TailOff {
    factor: f32,
    threshold: f32,
    gain: f32,
}

impl TailOff {
    pub fn new(factor: f32, threshold: f32) -> Self {
        Self {
            factor,
            threshold,
            gain: 0.0,
        }
    }

    /// Begin the fade at full gain. No-op if already fading.
    pub fn trigger(&mut self) {
        if self.gain == 0.0 {
            self.gain = 1.0;
        }
    }

    /// Advance one sample. Returns true once the fade has reached silence.
    #[inline]
    pub fn advance(&mut self) -> bool {
        self.gain *= self.factor;
        if self.gain <= self.threshold {
            self.gain = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.gain = 0.0;
    }

    pub fn is_releasing(&self) -> bool {
        self.gain > 0.0
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Samples a full fade lasts from gain 1.0.
    pub fn samples_to_silence(&self) -> usize {
        (self.threshold.ln() / self.factor.ln()).ceil() as usize
    }
}

impl Default for TailOff {
    fn default() -> Self {
        Self::new(DEFAULT_TAIL_OFF_FACTOR, DEFAULT_TAIL_OFF_THRESHOLD)
    }
}
