//! Benchmarks for the envelope filter: cached table lookups against
//! recomputing exact coefficients every sample.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use dynfilter::{
    dsp::dynfilter::exact_lowpass, Biquad, DynFilterLp, EnvelopeGenerator, SegmentCurve,
    SynthParams,
};

use crate::BLOCK_SIZES;

// Slow sweep 200 Hz → 8 kHz over 2 s, then hold at 1.5 kHz.
const SWEEP: (f32, f32, f32, f32, f32, f32, f32) = (200.0, 2.0, 8_000.0, 0.5, 1_500.0, 1.0, 100.0);

fn dyn_filter(params: &SynthParams) -> DynFilterLp {
    let table = params.init_table().expect("valid table");
    let mut filter = DynFilterLp::new(params, table).expect("matching table");
    let (st, ar, al, dr, sl, rr, rl) = SWEEP;
    filter
        .init_filter(st, ar, al, dr, sl, rr, rl, SegmentCurve::Linear, 1.0)
        .expect("valid envelope");
    filter
}

/// Same envelope and biquad, but taps recomputed with `tan` on every sample.
struct ExactSweep {
    env: EnvelopeGenerator,
    filter: Biquad,
    sample_rate: f64,
}

impl ExactSweep {
    fn new(params: &SynthParams) -> Self {
        let mut env = EnvelopeGenerator::new(params);
        let (st, ar, al, dr, sl, rr, rl) = SWEEP;
        env.init_adsr(st, ar, al, dr, sl, rr, rl, SegmentCurve::Linear)
            .expect("valid envelope");
        Self {
            env,
            filter: Biquad::new(),
            sample_rate: params.sample_rate as f64,
        }
    }

    fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            let cutoff = self.env.generate() as f64;
            self.filter
                .set_coefficients(exact_lowpass(cutoff, self.sample_rate, 1.0));
            *sample = self.filter.sample(*sample);
        }
    }
}

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let params = SynthParams::default();

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let mut filter = dyn_filter(&params);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("cached_sweep", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.process(black_box(&mut buffer));
            })
        });

        let mut exact = ExactSweep::new(&params);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("exact_sweep", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                exact.process(black_box(&mut buffer));
            })
        });

        // Biquad alone, taps fixed
        let mut core = Biquad::new();
        core.set_coefficients(exact_lowpass(1_000.0, params.sample_rate as f64, 1.0));
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("biquad_core", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                core.process(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
