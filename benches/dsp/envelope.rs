//! Benchmarks for the tail-off envelope.

use std::hint::black_box;

use criterion::Criterion;
use tablesynth::dsp::TailOff;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    // One full fade, start to silence
    group.bench_function("tail_off_full_fade", |b| {
        b.iter(|| {
            let mut env = TailOff::default();
            env.trigger();
            while !black_box(env.advance()) {}
        })
    });

    group.finish();
}
