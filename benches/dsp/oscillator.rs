//! Benchmarks for wavetable reading.

use std::{hint::black_box, sync::Arc};

use criterion::{BenchmarkId, Criterion};
use tablesynth::dsp::{Interpolation, Wavetable, WavetableOscillator};

use crate::{BLOCK_SIZES, TABLE_SIZE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let table = Arc::new(Wavetable::new(TABLE_SIZE).unwrap());

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Linear - one multiply-add per sample on top of the lookup
        let mut osc = WavetableOscillator::new(table.clone());
        osc.set_frequency(440.0, 48_000.0).unwrap();
        group.bench_with_input(BenchmarkId::new("linear", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer));
            })
        });

        // Forward - lookup only
        let mut osc =
            WavetableOscillator::new(table.clone()).with_interpolation(Interpolation::Forward);
        osc.set_frequency(440.0, 48_000.0).unwrap();
        group.bench_with_input(BenchmarkId::new("forward", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
