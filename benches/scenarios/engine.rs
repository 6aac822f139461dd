//! Benchmarks for the full polyphonic engine.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tablesynth::{AudioBuffer, MidiBlock, PolySynth, SynthConfig, SynthMessage};

use crate::{BLOCK_SIZES, TABLE_SIZE};

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");
    let config = SynthConfig::default().with_table_size(TABLE_SIZE);

    for &size in BLOCK_SIZES {
        let mut out = AudioBuffer::new(2, size);

        // === FULL CHORD ===
        // All four voices sustaining, no events
        let mut synth = PolySynth::new(config.clone()).unwrap();
        synth.prepare_to_play(size, 48_000.0).unwrap();
        for note in [48, 55, 60, 64] {
            synth.note_on(note, 0.8);
        }
        group.bench_with_input(BenchmarkId::new("four_voices", size), &size, |b, _| {
            b.iter(|| {
                synth.render_block(black_box(&mut out), 0, size, &[]);
            })
        });

        // === BUSY BLOCK ===
        // Note on/off pairs mid-block: exercises splitting and stealing
        let mut synth = PolySynth::new(config.clone()).unwrap();
        synth.prepare_to_play(size, 48_000.0).unwrap();
        let mut events = MidiBlock::with_capacity(16);
        for (i, note) in [60u8, 62, 64, 65, 67, 69].into_iter().enumerate() {
            let offset = i * size / 8;
            events.push(offset, SynthMessage::NoteOn { note, velocity: 100 });
            events.push(offset + size / 16, SynthMessage::NoteOff { note, velocity: 0 });
        }
        group.bench_with_input(BenchmarkId::new("event_heavy", size), &size, |b, _| {
            b.iter(|| {
                synth.render_block(black_box(&mut out), 0, size, events.as_slice());
            })
        });
    }

    group.finish();
}
