//! Oscillator → envelope filter chains, as a voice would run them.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use dynfilter::graph::{
    extensions::NodeExt,
    filter::DynFilterNode,
    node::{GraphNode, RenderCtx},
    oscillator::OscNode,
};
use dynfilter::{DynFilterLp, SegmentCurve, SynthParams};

use crate::BLOCK_SIZES;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let params = SynthParams::default();
    let table = params.init_table().expect("valid table");
    let ctx = RenderCtx::from_freq(params.sample_rate, 110.0, 100.0); // A2, typical bass note

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === PLUCK ===
        // fast exponential sweep down, the cache works hardest here
        let mut filter = DynFilterLp::new(&params, table.clone()).expect("matching table");
        filter
            .init_filter(6_000.0, 0.0, 6_000.0, 0.3, 300.0, 0.2, 100.0, SegmentCurve::Exponential, 1.0)
            .expect("valid envelope");
        let mut pluck =
            OscNode::sine(table.clone(), params.sample_rate).through(DynFilterNode::new(filter));
        pluck.note_on(&ctx);

        group.bench_with_input(BenchmarkId::new("pluck", size), &size, |b, _| {
            b.iter(|| {
                pluck.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });

        // === PAD ===
        // slow linear swell, mostly cache hits
        let mut filter = DynFilterLp::new(&params, table.clone()).expect("matching table");
        filter
            .init_filter(200.0, 3.0, 4_000.0, 2.0, 2_000.0, 3.0, 200.0, SegmentCurve::Linear, 1.0)
            .expect("valid envelope");
        let mut pad =
            OscNode::sine(table.clone(), params.sample_rate).through(DynFilterNode::new(filter));
        pad.note_on(&ctx);

        group.bench_with_input(BenchmarkId::new("pad", size), &size, |b, _| {
            b.iter(|| {
                pad.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
