//! Benchmarks for the segmented ADSR envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use dynfilter::{EnvelopeGenerator, SegmentCurve, SynthParams};

use crate::BLOCK_SIZES;

fn envelope(params: &SynthParams, curve: SegmentCurve) -> EnvelopeGenerator {
    let mut env = EnvelopeGenerator::new(params);
    env.init_adsr(0.0, 0.5, 1.0, 0.5, 0.7, 0.5, 0.0, curve)
        .expect("valid envelope");
    env
}

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let params = SynthParams::default();

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, curve) in [
            ("attack_linear", SegmentCurve::Linear),
            ("attack_exponential", SegmentCurve::Exponential),
            ("attack_logarithmic", SegmentCurve::Logarithmic),
        ] {
            let mut env = envelope(&params, curve);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for sample in buffer.iter_mut() {
                        *sample = env.generate();
                    }
                    black_box(&buffer);
                })
            });
        }

        // Sustain phase (holding steady)
        let mut env = EnvelopeGenerator::new(&params);
        env.init_adsr(0.0, 0.0, 1.0, 0.0, 0.7, 0.5, 0.0, SegmentCurve::Linear)
            .expect("valid envelope");
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = env.generate();
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
