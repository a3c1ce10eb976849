use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{dsp::wavetable::WaveTable, error::ConfigError};

/*
Synthesis Parameters
====================

Two numbers describe the environment every generator runs in:

  sample_rate    Samples per second (e.g. 44100). Converts seconds into
                 sample counts and Hz into phase-per-sample.

  table_length   Entries in the shared sine table. Must be a power of two so
                 index wrapping is a mask, and >= 8 so a quarter of it (the
                 cosine offset) is a whole number of entries.

Derived constants
-----------------

  frq_ti      = (table_length / 2) / sample_rate

      Multiplying a frequency in Hz by frq_ti gives the table index for the
      angle PI * f / sample_rate. Only indices below a quarter of the table
      (angles in [0, PI/2)) are meaningful for the dynamic filter.

  cos_offset  = table_length / 4

      Reading the sine table a quarter cycle ahead gives the cosine.

The shared table is built once from these parameters with `init_table()` and
handed to every consumer as an `Arc<WaveTable>`. Dropping the last handle is
the teardown.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    pub sample_rate: f32,
    pub table_length: usize,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            sample_rate: 44_100.0,
            table_length: 16_384,
        }
    }
}

impl SynthParams {
    pub fn new(sample_rate: f32, table_length: usize) -> Result<Self, ConfigError> {
        let params = Self {
            sample_rate,
            table_length,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }
        if self.table_length < 8 || !self.table_length.is_power_of_two() {
            return Err(ConfigError::InvalidTableLength(self.table_length));
        }
        Ok(())
    }

    /// Scale factor from a frequency in Hz to a sine-table index over `[0, PI)`.
    #[inline]
    pub fn frq_ti(&self) -> f64 {
        (self.table_length as f64 / 2.0) / self.sample_rate as f64
    }

    #[inline]
    pub fn cos_offset(&self) -> usize {
        self.table_length / 4
    }

    /// Number of whole samples covering `seconds`. Negative durations count as zero.
    #[inline]
    pub fn samples_for(&self, seconds: f32) -> u32 {
        (seconds.max(0.0) as f64 * self.sample_rate as f64).round() as u32
    }

    /// Build the shared sine table for these parameters.
    pub fn init_table(&self) -> Result<Arc<WaveTable>, ConfigError> {
        self.validate()?;
        let table = WaveTable::new(self.table_length)?;
        tracing::debug!(
            sample_rate = self.sample_rate,
            table_length = self.table_length,
            "built shared sine table"
        );
        Ok(Arc::new(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        let params = SynthParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.cos_offset(), 4096);
    }

    #[test]
    fn rejects_bad_table_lengths() {
        assert_eq!(
            SynthParams::new(44_100.0, 0),
            Err(ConfigError::InvalidTableLength(0))
        );
        assert_eq!(
            SynthParams::new(44_100.0, 1000),
            Err(ConfigError::InvalidTableLength(1000))
        );
        assert_eq!(
            SynthParams::new(44_100.0, 4),
            Err(ConfigError::InvalidTableLength(4))
        );
    }

    #[test]
    fn rejects_bad_sample_rates() {
        assert!(SynthParams::new(0.0, 1024).is_err());
        assert!(SynthParams::new(-48_000.0, 1024).is_err());
        assert!(SynthParams::new(f32::NAN, 1024).is_err());
    }

    #[test]
    fn frq_ti_maps_nyquist_to_cos_offset() {
        let params = SynthParams::new(48_000.0, 4096).unwrap();
        let index = 24_000.0 * params.frq_ti();
        assert_eq!(params.cos_offset(), 1024);
        assert!((index - params.cos_offset() as f64).abs() < 1e-9);
    }

    #[test]
    fn samples_for_rounds_and_clamps() {
        let params = SynthParams::new(1_000.0, 1024).unwrap();
        assert_eq!(params.samples_for(0.1), 100);
        assert_eq!(params.samples_for(0.0), 0);
        assert_eq!(params.samples_for(-1.0), 0);
    }
}
