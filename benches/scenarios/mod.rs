//! Benchmarks for complete voice chains.

mod voices;

pub use voices::bench_voices;
