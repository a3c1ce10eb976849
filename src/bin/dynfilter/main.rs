//! dynfilter - offline envelope filter sweep
//!
//! Run with: cargo run -- [linear|exponential|logarithmic]
//!
//! Renders a band-limited sawtooth (sine partials from the shared table)
//! through the envelope low-pass and prints, per block, the envelope cutoff,
//! the spectral centroid of the output and how often the taps were derived.

mod spectrum;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use dynfilter::{dsp::oscillator::SineOsc, DynFilterLp, SegmentCurve, SynthParams, MAX_BLOCK_SIZE};
use spectrum::SpectrumAnalyzer;

const FUNDAMENTAL: f32 = 110.0;
const PARTIALS: usize = 24;
const BLOCKS: usize = 48;
const RELEASE_AT_BLOCK: usize = 32;

fn parse_curve(arg: Option<String>) -> EyreResult<SegmentCurve> {
    match arg.as_deref() {
        None | Some("linear") => Ok(SegmentCurve::Linear),
        Some("exponential") => Ok(SegmentCurve::Exponential),
        Some("logarithmic") => Ok(SegmentCurve::Logarithmic),
        Some(other) => Err(eyre!(
            "unknown curve '{other}', expected linear, exponential or logarithmic"
        )),
    }
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let curve = parse_curve(std::env::args().nth(1))?;
    let params = SynthParams::default();
    let table = params
        .init_table()
        .wrap_err("failed to build the shared sine table")?;

    // Band-limited sawtooth: partial n at amplitude 1/n.
    let mut partials: Vec<(SineOsc, f32)> = (1..=PARTIALS)
        .map(|n| {
            let mut osc = SineOsc::new(table.clone(), params.sample_rate);
            osc.set_frequency(FUNDAMENTAL * n as f32);
            (osc, 0.5 / n as f32)
        })
        .collect();

    let mut filter = DynFilterLp::new(&params, table)?;
    filter
        .init_filter(150.0, 0.4, 6_000.0, 0.6, 1_200.0, 0.5, 150.0, curve, 1.0)
        .wrap_err("invalid filter envelope")?;

    tracing::info!(?curve, sample_rate = params.sample_rate, "rendering sweep");

    let mut analyzer = SpectrumAnalyzer::new(MAX_BLOCK_SIZE, params.sample_rate);
    let mut block = vec![0.0f32; MAX_BLOCK_SIZE];

    println!("{:>5} {:>10} {:>12} {:>8} {:>10}", "block", "cutoff", "centroid", "rms", "recomputes");
    for index in 0..BLOCKS {
        if index == RELEASE_AT_BLOCK {
            filter.release();
            tracing::info!(block = index, "note off");
        }

        for sample in block.iter_mut() {
            *sample = partials
                .iter_mut()
                .map(|(osc, amp)| osc.next_sample() * *amp)
                .sum();
        }

        let cutoff = filter.envelope().level();
        filter.process(&mut block);
        let (centroid, rms) = analyzer.analyze(&block);

        println!(
            "{:>5} {:>8.0}Hz {:>10.0}Hz {:>8.4} {:>10}",
            index,
            cutoff,
            centroid,
            rms,
            filter.recompute_count()
        );
    }

    let rendered = (BLOCKS * MAX_BLOCK_SIZE) as u64;
    tracing::info!(
        recomputes = filter.recompute_count(),
        samples = rendered,
        "done"
    );
    Ok(())
}
