use std::f64::consts::{PI, SQRT_2};
use std::sync::Arc;

use crate::{
    config::SynthParams,
    dsp::{
        biquad::{Biquad, Coefficients},
        envelope::{EnvDef, EnvelopeGenerator, SegmentCurve},
        wavetable::WaveTable,
    },
    error::ConfigError,
};

/*
Envelope-Swept Low-Pass Filter
==============================

Subtractive patches sweep a low-pass cutoff with an envelope, which normally
means recomputing biquad coefficients (and a tangent) on every sample. This
filter avoids both costs:

1. The envelope level is read as a cutoff frequency in Hz.
2. The cutoff is quantised to a sine-table index:

       index = floor(cutoff * frq_ti),   frq_ti = (table_length / 2) / sample_rate

   so index i stands for the angle theta = PI * cutoff / sample_rate.
3. The bilinear-transform low-pass needs c = 1 / tan(theta) = cos/sin. Both
   come from the shared table: sin at `index`, cos a quarter table later.
4. Coefficients are derived only when the index differs from the last one.
   Plateaus (sustain, the flat tail of a ramp) cost nothing extra.

Butterworth low-pass from the cotangent term (damping fixed at sqrt 2):

    c2    = c * c
    cs2   = sqrt2 * c
    oned  = 1 / (c2 + cs2 + 1)

    in0 = g * oned      in1 = 2g * oned      in2 = g * oned
    out1 = 2 * (1 - c2) * oned
    out2 = (c2 - cs2 + 1) * oned

Valid Range
-----------

Indices must satisfy 0 <= index < table_length / 4 (0 Hz up to Nyquist). Out
of range, or a non-finite level, bypasses the filter for that one sample: the
input comes back unchanged and the history is left alone.

Index 0 is 0 Hz, where sin = 0 and c would be infinite. The limit of the
formulas there is a filter that passes nothing, so index 0 maps to all-zero
taps.
*/

/// Butterworth low-pass taps from `c = cot(theta)`, with `gain` folded into the
/// feed-forward side.
#[inline]
pub fn lowpass_from_cot(c: f64, gain: f64) -> Coefficients {
    let c2 = c * c;
    let c_sqrt2 = SQRT_2 * c;
    let oned = 1.0 / (c2 + c_sqrt2 + 1.0);
    let feed = gain * oned;

    Coefficients {
        in0: feed,
        in1: feed + feed,
        in2: feed,
        out1: (2.0 * (1.0 - c2)) * oned,
        out2: (c2 - c_sqrt2 + 1.0) * oned,
    }
}

/// Low-pass taps for table `index`, using table lookups in place of `cot`.
/// Caller guarantees `index < table.cos_offset()`.
#[inline]
pub fn table_lowpass(table: &WaveTable, index: usize, gain: f64) -> Coefficients {
    if index == 0 {
        return Coefficients::default();
    }

    let sin = table.lookup(index) as f64;
    let cos = table.lookup(index + table.cos_offset()) as f64;
    lowpass_from_cot(cos / sin, gain)
}

/// Low-pass taps computed with a real tangent. Reference for the table version.
pub fn exact_lowpass(cutoff_hz: f64, sample_rate: f64, gain: f64) -> Coefficients {
    let c = 1.0 / (PI * cutoff_hz / sample_rate).tan();
    lowpass_from_cot(c, gain)
}

/// Last table index seen plus the taps derived for it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoefficientCache {
    pub last_index: Option<usize>,
    pub coeffs: Coefficients,
}

impl CoefficientCache {
    /// The cache after seeing `index`: unchanged when `index` repeats,
    /// otherwise freshly derived taps.
    #[must_use]
    #[inline]
    pub fn update(self, index: usize, gain: f64, table: &WaveTable) -> Self {
        if self.last_index == Some(index) {
            return self;
        }

        Self {
            last_index: Some(index),
            coeffs: table_lowpass(table, index, gain),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DynFilterLp {
    filter: Biquad,
    env: EnvelopeGenerator,
    table: Arc<WaveTable>,

    frq_ti: f64,       // Hz → table index over [0, PI)
    cos_offset: usize, // quarter table: upper bound of valid indices
    cache: CoefficientCache,
    recomputes: u64,
}

impl DynFilterLp {
    pub fn new(params: &SynthParams, table: Arc<WaveTable>) -> Result<Self, ConfigError> {
        params.validate()?;
        if table.len() != params.table_length {
            return Err(ConfigError::TableLengthMismatch {
                expected: params.table_length,
                actual: table.len(),
            });
        }

        Ok(Self {
            filter: Biquad::new(),
            env: EnvelopeGenerator::new(params),
            frq_ti: params.frq_ti(),
            cos_offset: params.cos_offset(),
            table,
            cache: CoefficientCache::default(),
            recomputes: 0,
        })
    }

    /// Configure the cutoff envelope and filter gain, then restart.
    ///
    /// Every level is a cutoff frequency in Hz; every rate is a segment
    /// duration in seconds.
    #[allow(clippy::too_many_arguments)]
    pub fn init_filter(
        &mut self,
        start: f32,
        atk_rate: f32,
        atk_level: f32,
        dec_rate: f32,
        sus_level: f32,
        rel_rate: f32,
        rel_level: f32,
        curve: SegmentCurve,
        gain: f64,
    ) -> Result<(), ConfigError> {
        self.env.init_adsr(
            start, atk_rate, atk_level, dec_rate, sus_level, rel_rate, rel_level, curve,
        )?;
        self.filter.init(gain);
        self.cache = CoefficientCache::default();
        self.reset(0.0);

        tracing::debug!(
            start,
            atk_level,
            sus_level,
            rel_level,
            ?curve,
            gain,
            "initialised dynamic low-pass"
        );
        Ok(())
    }

    /// Table index for a cutoff in Hz, or `None` when it is out of range.
    #[inline]
    pub fn table_index(&self, cutoff_hz: f32) -> Option<usize> {
        let index = (cutoff_hz as f64 * self.frq_ti).floor();
        // Written so NaN falls through to None.
        if index >= 0.0 && index < self.cos_offset as f64 {
            Some(index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn sample(&mut self, input: f32) -> f32 {
        let cutoff = self.env.generate();
        let Some(index) = self.table_index(cutoff) else {
            return input;
        };

        let next = self.cache.update(index, self.filter.gain(), &self.table);
        if next.last_index != self.cache.last_index {
            self.filter.set_coefficients(next.coeffs);
            self.recomputes += 1;
        }
        self.cache = next;

        self.filter.sample(input)
    }

    pub fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.sample(*sample);
        }
    }

    pub fn release(&mut self) {
        self.env.release();
    }

    /// Restart the envelope at `initial_phase` seconds and clear the filter
    /// history. A negative phase leaves everything running as it is.
    pub fn reset(&mut self, initial_phase: f32) {
        if initial_phase < 0.0 {
            return;
        }
        self.env.reset(initial_phase);
        self.filter.reset(initial_phase);
    }

    /// Deep copy of filter and envelope from `other`. Both filters must read
    /// the same shared table.
    pub fn copy_from(&mut self, other: &Self) -> Result<(), ConfigError> {
        if !Arc::ptr_eq(&self.table, &other.table) {
            return Err(ConfigError::TableMismatch);
        }
        self.clone_from(other);
        Ok(())
    }

    pub fn get_env_def(&self) -> EnvDef {
        self.env.get_env_def()
    }

    pub fn set_env_def(&mut self, def: &EnvDef) -> Result<(), ConfigError> {
        self.env.set_env_def(def)
    }

    pub fn is_finished(&self) -> bool {
        self.env.is_finished()
    }

    pub fn envelope(&self) -> &EnvelopeGenerator {
        &self.env
    }

    pub fn coefficients(&self) -> &Coefficients {
        self.filter.coefficients()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.cache.last_index
    }

    /// How many times taps have been derived since construction.
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    pub fn gain(&self) -> f64 {
        self.filter.gain()
    }

    pub fn set_start(&mut self, val: f32) {
        self.env.set_start(val);
    }

    pub fn set_atk_rt(&mut self, val: f32) {
        self.env.set_atk_rt(val);
    }

    pub fn set_atk_lvl(&mut self, val: f32) {
        self.env.set_atk_lvl(val);
    }

    pub fn set_dec_rt(&mut self, val: f32) {
        self.env.set_dec_rt(val);
    }

    pub fn set_sus_lvl(&mut self, val: f32) {
        self.env.set_sus_lvl(val);
    }

    pub fn set_rel_rt(&mut self, val: f32) {
        self.env.set_rel_rt(val);
    }

    pub fn set_rel_lvl(&mut self, val: f32) {
        self.env.set_rel_lvl(val);
    }

    pub fn set_type(&mut self, curve: SegmentCurve) {
        self.env.set_type(curve);
    }

    pub fn start(&self) -> f32 {
        self.env.start()
    }

    pub fn atk_rt(&self) -> f32 {
        self.env.atk_rt()
    }

    pub fn atk_lvl(&self) -> f32 {
        self.env.atk_lvl()
    }

    pub fn dec_rt(&self) -> f32 {
        self.env.dec_rt()
    }

    pub fn sus_lvl(&self) -> f32 {
        self.env.sus_lvl()
    }

    pub fn rel_rt(&self) -> f32 {
        self.env.rel_rt()
    }

    pub fn rel_lvl(&self) -> f32 {
        self.env.rel_lvl()
    }

    pub fn curve(&self) -> SegmentCurve {
        self.env.curve()
    }
}
