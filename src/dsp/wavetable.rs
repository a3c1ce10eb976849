use std::f64::consts::TAU;

use crate::error::ConfigError;

/*
Shared Sine Table
=================

One cycle of a sine wave sampled at `len` evenly spaced points over [0, 2PI):

    table[i] = sin(2PI * i / len)

The table is built once and never written again, so any number of voices on
any number of threads can read it without locking. Consumers hold an
`Arc<WaveTable>`.

Cosine From Sine
----------------

    cos(x) = sin(x + PI/2)

A quarter cycle is `len / 4` entries, so the cosine of entry `i` is the sine
at entry `i + len/4`. `cos()` wraps with a mask so every index in [0, len)
works; the dynamic filter only ever uses i < len/4 where no wrap happens.

    index:   0        len/4      len/2     3len/4      len
    sine:    0 ──────→  1 ──────→  0 ──────→ -1 ──────→ 0
                        ↑
                    cos_offset
*/

#[derive(Debug)]
pub struct WaveTable {
    samples: Box<[f32]>,
    mask: usize,
    cos_offset: usize,
}

impl WaveTable {
    pub fn new(len: usize) -> Result<Self, ConfigError> {
        if len < 8 || !len.is_power_of_two() {
            return Err(ConfigError::InvalidTableLength(len));
        }

        let step = TAU / len as f64;
        let samples: Box<[f32]> = (0..len).map(|i| (step * i as f64).sin() as f32).collect();

        Ok(Self {
            samples,
            mask: len - 1,
            cos_offset: len / 4,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Quarter table length: the cosine phase offset.
    #[inline]
    pub fn cos_offset(&self) -> usize {
        self.cos_offset
    }

    /// Table entry at `index`. Caller guarantees `index < len()`.
    #[inline]
    pub fn lookup(&self, index: usize) -> f32 {
        self.samples[index]
    }

    #[inline]
    pub fn sin(&self, index: usize) -> f32 {
        self.samples[index & self.mask]
    }

    #[inline]
    pub fn cos(&self, index: usize) -> f32 {
        self.samples[(index + self.cos_offset) & self.mask]
    }
}
