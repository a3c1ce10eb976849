//! Spectral summary of rendered blocks
//!
//! FFT with a Hann window; reports the spectral centroid so a filter sweep
//! shows up as a number moving up and down.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

pub struct SpectrumAnalyzer {
    /// Hann window coefficients
    window: Vec<f32>,
    /// FFT processor
    fft: Arc<dyn Fft<f32>>,
    /// Scratch buffer for FFT computation
    scratch: Vec<Complex<f32>>,
    /// Hz per FFT bin
    bin_width: f32,
}

impl SpectrumAnalyzer {
    /// # Arguments
    /// * `buffer_len` - FFT size (should match the block length)
    /// * `sample_rate` - Audio sample rate in Hz
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(buffer_len);

        // Hann window - reduces spectral leakage
        let window: Vec<f32> = (0..buffer_len)
            .map(|i| {
                if buffer_len > 1 {
                    let denom = (buffer_len - 1) as f32;
                    0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos())
                } else {
                    1.0
                }
            })
            .collect();

        Self {
            window,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            bin_width: sample_rate / buffer_len.max(1) as f32,
        }
    }

    /// Magnitude-weighted mean frequency of `block` in Hz, and its RMS level.
    pub fn analyze(&mut self, block: &[f32]) -> (f32, f32) {
        for (slot, (&x, &w)) in self
            .scratch
            .iter_mut()
            .zip(block.iter().zip(self.window.iter()))
        {
            *slot = Complex::new(x * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let half = self.scratch.len() / 2;
        let (weighted, total) = self.scratch[1..half]
            .iter()
            .enumerate()
            .fold((0.0f32, 0.0f32), |(weighted, total), (i, bin)| {
                let mag = bin.norm();
                (weighted + mag * (i + 1) as f32 * self.bin_width, total + mag)
            });

        let rms = (block.iter().map(|x| x * x).sum::<f32>() / block.len().max(1) as f32).sqrt();
        let centroid = if total > 0.0 { weighted / total } else { 0.0 };
        (centroid, rms)
    }
}
