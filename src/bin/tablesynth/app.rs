//! Player - owns the output stream and feeds the synth from the main thread

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{info, warn};
use rtrb::{Producer, RingBuffer};

use tablesynth::{
    AudioBuffer, MidiBlock, PolySynth, SynthConfig, SynthMessage, TimedMessage, MAX_BLOCK_SIZE,
};

/// Messages that can queue up between two audio callbacks.
const QUEUE_CAPACITY: usize = 256;

/// Time left for the last tail-off before the stream is dropped.
const TAIL: Duration = Duration::from_millis(500);

/// Main application builder
pub struct Player {
    config: SynthConfig,
    bpm: f64,
    chords: Vec<Vec<u8>>,
}

impl Player {
    pub fn new(config: SynthConfig) -> Self {
        Self {
            config,
            bpm: 120.0,
            chords: Vec::new(),
        }
    }

    /// Set the tempo in beats per minute (one chord per beat)
    pub fn bpm(mut self, bpm: f64) -> Self {
        self.bpm = bpm;
        self
    }

    /// Append a chord to the progression
    pub fn chord(mut self, notes: &[u8]) -> Self {
        self.chords.push(notes.to_vec());
        self
    }

    /// Build the synth, open the default output and play the progression once.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let mut synth = PolySynth::new(self.config).wrap_err("failed to build synth")?;
        synth
            .prepare_to_play(MAX_BLOCK_SIZE, sample_rate)
            .wrap_err("device reported an unusable sample rate")?;

        info!("output: {sample_rate} Hz, {channels} channels");

        let (mut tx, mut rx) = RingBuffer::<SynthMessage>::new(QUEUE_CAPACITY);
        let mut events = MidiBlock::with_capacity(QUEUE_CAPACITY);
        let mut render_buf = AudioBuffer::new(channels, MAX_BLOCK_SIZE);

        // Published from the callback with plain atomic stores, logged here.
        let stolen = Arc::new(AtomicU64::new(0));
        let dropped = Arc::new(AtomicU64::new(0));
        let (stolen_out, dropped_out) = (Arc::clone(&stolen), Arc::clone(&dropped));

        // The synth moves into the callback: it is the only place it is touched.
        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                events.clear();
                events.drain_from(&mut rx);

                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

                    // Queued messages apply at the top of the first chunk.
                    let block_events: &[TimedMessage] = if frames_written == 0 {
                        events.as_slice()
                    } else {
                        &[]
                    };
                    synth.render_block(&mut render_buf, 0, frames, block_events);

                    let out = &mut data[frames_written * channels..];
                    render_buf.write_interleaved(out, channels, frames);
                    for sample in &mut out[..frames * channels] {
                        *sample = sample.clamp(-1.0, 1.0);
                    }

                    frames_written += frames;
                }

                let stats = synth.allocation_stats();
                stolen_out.store(stats.stolen, Ordering::Relaxed);
                dropped_out.store(stats.dropped, Ordering::Relaxed);
            },
            |err| warn!("audio stream error: {err}"),
            None,
        )?;

        stream.play()?;

        let beat = Duration::from_secs_f64(60.0 / self.bpm);
        for chord in &self.chords {
            for &note in chord {
                send(&mut tx, SynthMessage::NoteOn { note, velocity: 100 });
            }
            thread::sleep(beat);
            for &note in chord {
                send(&mut tx, SynthMessage::NoteOff { note, velocity: 0 });
            }
        }

        send(&mut tx, SynthMessage::AllNotesOff);
        thread::sleep(TAIL);

        info!(
            "voices stolen: {}, notes dropped: {}",
            stolen.load(Ordering::Relaxed),
            dropped.load(Ordering::Relaxed)
        );
        Ok(())
    }
}

fn send(tx: &mut Producer<SynthMessage>, message: SynthMessage) {
    if tx.push(message).is_err() {
        warn!("message queue full, dropped {message:?}");
    }
}
