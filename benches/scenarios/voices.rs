//! Benchmarks for a single voice in each state.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tablesynth::{
    dsp::Wavetable,
    synth::{Sound, Voice},
    AudioBuffer, SynthConfig,
};

use crate::{BLOCK_SIZES, TABLE_SIZE};

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let config = SynthConfig::default();
    let sound = Sound::wavetable(Wavetable::new(TABLE_SIZE).unwrap());

    for &size in BLOCK_SIZES {
        let mut out = AudioBuffer::new(2, size);

        // Sustaining voice, stereo
        let mut voice = Voice::from_config(&config);
        voice.start_note(57, 1.0, &sound, 48_000.0, 0).unwrap();
        group.bench_with_input(BenchmarkId::new("sustaining", size), &size, |b, _| {
            b.iter(|| {
                voice.render_next_block(black_box(&mut out), 0, size);
            })
        });

        // Idle voice: the cost of visiting an unused slot
        let mut idle = Voice::from_config(&config);
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| {
                idle.render_next_block(black_box(&mut out), 0, size);
            })
        });
    }

    group.finish();
}
