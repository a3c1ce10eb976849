use std::sync::Arc;

use crate::dsp::wavetable::WaveTable;

/*
Table Sine Oscillator
=====================

Reads the shared sine table with a phase accumulator measured in table
entries:

    increment = frequency * table_length / sample_rate
    out       = table[floor(phase)]
    phase     = (phase + increment) mod table_length

Truncating lookup, no interpolation. It is the same table the dynamic filter
reads its sine and cosine from.
*/

#[derive(Debug, Clone)]
pub struct SineOsc {
    table: Arc<WaveTable>,
    sample_rate: f32,
    phase: f64,
    increment: f64,
}

impl SineOsc {
    pub fn new(table: Arc<WaveTable>, sample_rate: f32) -> Self {
        Self {
            table,
            sample_rate,
            phase: 0.0,
            increment: 0.0,
        }
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.increment = frequency as f64 * self.table.len() as f64 / self.sample_rate as f64;
    }

    /// Start the cycle at `initial_phase` in [0, 1).
    pub fn reset(&mut self, initial_phase: f32) {
        let len = self.table.len() as f64;
        self.phase = (initial_phase as f64 * len).rem_euclid(len);
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let len = self.table.len() as f64;
        // Masked read: rem_euclid can round up to exactly `len`.
        let out = self.table.sin(self.phase as usize);
        self.phase = (self.phase + self.increment).rem_euclid(len);
        out
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }
}
