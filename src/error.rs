//! Configuration errors.
//!
//! Nothing on the per-sample path returns an error. These are raised when a
//! table, envelope or filter is set up with values it cannot run with.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("sample rate must be finite and positive, got {0}")]
    InvalidSampleRate(f32),

    #[error("table length must be a power of two >= 8, got {0}")]
    InvalidTableLength(usize),

    #[error("{segment} rate must be finite and >= 0, got {rate}")]
    NegativeRate { segment: &'static str, rate: f32 },

    #[error("{segment} level must be finite")]
    NonFiniteLevel { segment: &'static str },

    #[error("wave table has {actual} entries, parameters expect {expected}")]
    TableLengthMismatch { expected: usize, actual: usize },

    #[error("filters use different wave tables")]
    TableMismatch,
}
