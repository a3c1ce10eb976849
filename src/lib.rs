pub mod config;
pub mod dsp;
pub mod error;
pub mod graph; // Block-rendering nodes over the dsp primitives

pub use config::SynthParams;
pub use dsp::{
    biquad::{Biquad, Coefficients},
    dynfilter::{CoefficientCache, DynFilterLp},
    envelope::{EnvDef, EnvelopeGenerator, EnvelopeState, SegmentCurve},
    wavetable::WaveTable,
};
pub use error::ConfigError;

pub const MAX_BLOCK_SIZE: usize = 2048;
