#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{config::SynthParams, error::ConfigError};

/*
Segmented ADSR Envelope
=======================

A four-segment ramp generator producing one control value per sample. The
dynamic filter reads it as a cutoff frequency in Hz, but nothing here cares
what the levels mean.

Vocabulary
----------

  level       The envelope's current output value. Not clamped: levels may be
              amplitudes, frequencies, anything.

  segment     One ramp of the envelope: attack, decay, sustain (a hold) or
              release. Each ramping segment has a rate, a target level and a
              curve.

  rate        Segment duration in seconds. Converted to a whole number of
              steps with `round(rate * sample_rate)`. Zero steps means the
              segment jumps straight to its target.

  position    Steps taken so far in the current segment, 0..=steps.


The Shape
---------

  Level
  atk ┐     ╱╲
      │    ╱  ╲___________
  sus │   ╱               ╲
      │  ╱                 ╲
  st  └─╱                   ╲── rel
       Attack Decay  Sustain  Release  Done


The State Machine
-----------------

    Idle ──init/reset──→ Attack ──→ Decay ──→ Sustain
                           │          │          │
                           └──release─┴──release─┘
                                      ↓
                                   Release ──→ Done

Sustain never ends on its own; only `release()` leaves it. Release captures
whatever level is current at that instant as its origin, so releasing in the
middle of the attack does not click.


Curves
------

All curves start at `from`, end exactly at `to`, and move monotonically in
between. The final step always snaps to `to`.

  Linear       level += (to - level) / remaining_steps

  Exponential  Geometric approach: the remaining distance shrinks by a fixed
               ratio every step (fast start, slow finish). The ratio is chosen
               so the distance would fall to CURVE_FLOOR of the span at the
               last step; the curve is rescaled so it lands on `to` exactly.

  Logarithmic  Mirror image of Exponential: slow start, accelerating into the
               target.


Timing
------

`generate()` returns the level at the current position and then advances one
step. After `reset(0.0)` the first sample is the start level, and sample N of
an N-step attack is the attack level.
*/

/// Fraction of the span left when a curved segment reaches its last step.
const CURVE_FLOOR: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,    // Not initialised yet, output 0
    Attack,  // start → attack level
    Decay,   // attack level → sustain level
    Sustain, // holding until release()
    Release, // current level → release level
    Done,    // holding release level forever
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentCurve {
    #[default]
    Linear,
    Exponential,
    Logarithmic,
}

/// Complete envelope definition, as stored in instrument templates.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvDef {
    pub start: f32,
    pub atk_rate: f32,
    pub atk_level: f32,
    pub dec_rate: f32,
    pub sus_level: f32,
    pub rel_rate: f32,
    pub rel_level: f32,
    pub curve: SegmentCurve,
}

impl Default for EnvDef {
    fn default() -> Self {
        Self {
            start: 0.0,
            atk_rate: 0.0,
            atk_level: 1.0,
            dec_rate: 0.0,
            sus_level: 1.0,
            rel_rate: 0.0,
            rel_level: 0.0,
            curve: SegmentCurve::Linear,
        }
    }
}

impl EnvDef {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (segment, rate) in [
            ("attack", self.atk_rate),
            ("decay", self.dec_rate),
            ("release", self.rel_rate),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(ConfigError::NegativeRate { segment, rate });
            }
        }

        for (segment, level) in [
            ("start", self.start),
            ("attack", self.atk_level),
            ("sustain", self.sus_level),
            ("release", self.rel_level),
        ] {
            if !level.is_finite() {
                return Err(ConfigError::NonFiniteLevel { segment });
            }
        }

        Ok(())
    }
}

/// One ramp, captured when its segment begins. Later parameter edits do not
/// touch a ramp that is already running.
#[derive(Debug, Clone, Copy)]
struct Ramp {
    from: f32,
    to: f32,
    steps: u32,
    pos: u32,
    curve: SegmentCurve,
    ratio: f64, // per-step decay of the remaining distance (curved only)
    decay: f64, // ratio^pos
}

impl Ramp {
    fn new(from: f32, to: f32, steps: u32, curve: SegmentCurve) -> Self {
        let ratio = if steps > 0 {
            CURVE_FLOOR.powf(1.0 / steps as f64)
        } else {
            0.0
        };

        Self {
            from,
            to,
            steps,
            pos: 0,
            curve,
            ratio,
            decay: 1.0,
        }
    }

    fn idle() -> Self {
        Self::new(0.0, 0.0, 0, SegmentCurve::Linear)
    }

    #[inline]
    fn is_complete(&self) -> bool {
        self.pos >= self.steps
    }

    /// Take one step away from `level` and return the new level.
    #[inline]
    fn step(&mut self, level: f32) -> f32 {
        if self.is_complete() {
            return self.to;
        }

        let remaining = self.steps - self.pos;
        self.pos += 1;
        if remaining == 1 {
            return self.to;
        }

        match self.curve {
            SegmentCurve::Linear => level + (self.to - level) / remaining as f32,
            SegmentCurve::Exponential => {
                self.decay *= self.ratio;
                let left = (self.decay - CURVE_FLOOR) / (1.0 - CURVE_FLOOR);
                self.interpolate(left)
            }
            SegmentCurve::Logarithmic => {
                self.decay *= self.ratio;
                let left = 1.0 - (CURVE_FLOOR / self.decay - CURVE_FLOOR) / (1.0 - CURVE_FLOOR);
                self.interpolate(left)
            }
        }
    }

    /// Level with `left` (1 → 0) of the span still to travel.
    #[inline]
    fn interpolate(&self, left: f64) -> f32 {
        let left = left.clamp(0.0, 1.0);
        (self.to as f64 + (self.from as f64 - self.to as f64) * left) as f32
    }
}

#[derive(Debug, Clone)]
pub struct EnvelopeGenerator {
    params: SynthParams,

    // Segment parameters (edited by the host, read when a segment begins)
    def: EnvDef,

    // Runtime state (changes every sample)
    state: EnvelopeState,
    level: f32,
    ramp: Ramp,
}

impl EnvelopeGenerator {
    pub fn new(params: &SynthParams) -> Self {
        Self {
            params: *params,
            def: EnvDef::default(),
            state: EnvelopeState::Idle,
            level: 0.0,
            ramp: Ramp::idle(),
        }
    }

    /// Configure all four segments and restart at the attack.
    #[allow(clippy::too_many_arguments)]
    pub fn init_adsr(
        &mut self,
        start: f32,
        atk_rate: f32,
        atk_level: f32,
        dec_rate: f32,
        sus_level: f32,
        rel_rate: f32,
        rel_level: f32,
        curve: SegmentCurve,
    ) -> Result<(), ConfigError> {
        self.set_env_def(&EnvDef {
            start,
            atk_rate,
            atk_level,
            dec_rate,
            sus_level,
            rel_rate,
            rel_level,
            curve,
        })?;
        self.reset(0.0);
        Ok(())
    }

    /// Output the current level, then advance one sample. Call exactly once per sample.
    #[inline]
    pub fn generate(&mut self) -> f32 {
        let out = self.level;
        self.advance();
        out
    }

    #[inline]
    fn advance(&mut self) {
        match self.state {
            EnvelopeState::Idle | EnvelopeState::Sustain | EnvelopeState::Done => {}
            EnvelopeState::Attack | EnvelopeState::Decay | EnvelopeState::Release => {
                self.level = self.ramp.step(self.level);
                if self.ramp.is_complete() {
                    self.level = self.ramp.to;
                    self.enter(self.next_state());
                }
            }
        }
    }

    fn next_state(&self) -> EnvelopeState {
        match self.state {
            EnvelopeState::Attack => EnvelopeState::Decay,
            EnvelopeState::Decay => EnvelopeState::Sustain,
            EnvelopeState::Release => EnvelopeState::Done,
            other => other,
        }
    }

    /// Begin `state` from the current level. Zero-length segments resolve
    /// immediately and fall through to the following segment.
    fn enter(&mut self, mut state: EnvelopeState) {
        loop {
            self.state = state;
            let (rate, target) = match state {
                EnvelopeState::Attack => (self.def.atk_rate, self.def.atk_level),
                EnvelopeState::Decay => (self.def.dec_rate, self.def.sus_level),
                EnvelopeState::Release => (self.def.rel_rate, self.def.rel_level),
                EnvelopeState::Idle | EnvelopeState::Sustain | EnvelopeState::Done => {
                    self.ramp = Ramp::new(self.level, self.level, 0, self.def.curve);
                    return;
                }
            };

            let steps = self.steps_for(rate);
            self.ramp = Ramp::new(self.level, target, steps, self.def.curve);
            if steps > 0 {
                return;
            }

            self.level = target;
            state = self.next_state();
        }
    }

    #[inline]
    fn steps_for(&self, rate: f32) -> u32 {
        self.params.samples_for(rate)
    }

    /// Start the release segment from whatever level is current.
    pub fn release(&mut self) {
        if matches!(
            self.state,
            EnvelopeState::Attack | EnvelopeState::Decay | EnvelopeState::Sustain
        ) {
            self.enter(EnvelopeState::Release);
        }
    }

    /// Restart at the attack from the start level.
    ///
    /// `initial_phase` is a time offset in seconds: the envelope is run
    /// forward that far before the next `generate()`, which lets a stolen
    /// voice pick up mid-envelope. A negative phase leaves the running state
    /// untouched.
    pub fn reset(&mut self, initial_phase: f32) {
        if initial_phase < 0.0 {
            return;
        }

        self.level = self.def.start;
        self.enter(EnvelopeState::Attack);

        let skip = self.steps_for(initial_phase);
        for _ in 0..skip {
            if matches!(self.state, EnvelopeState::Sustain | EnvelopeState::Done) {
                break;
            }
            self.advance();
        }
    }

    /// Deep copy of parameters and running state from `other`.
    pub fn copy_from(&mut self, other: &Self) {
        self.clone_from(other);
    }

    pub fn get_env_def(&self) -> EnvDef {
        self.def
    }

    /// Replace every segment parameter at once. A running segment keeps its
    /// captured ramp; new values apply from the next segment on.
    pub fn set_env_def(&mut self, def: &EnvDef) -> Result<(), ConfigError> {
        if let Err(err) = def.validate() {
            tracing::warn!(%err, "rejected envelope definition");
            return Err(err);
        }
        self.def = *def;
        Ok(())
    }

    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// The value the next `generate()` will return.
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn position(&self) -> u32 {
        self.ramp.pos
    }

    pub fn steps(&self) -> u32 {
        self.ramp.steps
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, EnvelopeState::Done)
    }

    pub fn set_start(&mut self, val: f32) {
        self.def.start = val;
    }

    pub fn set_atk_rt(&mut self, val: f32) {
        self.def.atk_rate = val.max(0.0);
    }

    pub fn set_atk_lvl(&mut self, val: f32) {
        self.def.atk_level = val;
    }

    pub fn set_dec_rt(&mut self, val: f32) {
        self.def.dec_rate = val.max(0.0);
    }

    pub fn set_sus_lvl(&mut self, val: f32) {
        self.def.sus_level = val;
    }

    pub fn set_rel_rt(&mut self, val: f32) {
        self.def.rel_rate = val.max(0.0);
    }

    pub fn set_rel_lvl(&mut self, val: f32) {
        self.def.rel_level = val;
    }

    pub fn set_type(&mut self, curve: SegmentCurve) {
        self.def.curve = curve;
    }

    pub fn start(&self) -> f32 {
        self.def.start
    }

    pub fn atk_rt(&self) -> f32 {
        self.def.atk_rate
    }

    pub fn atk_lvl(&self) -> f32 {
        self.def.atk_level
    }

    pub fn dec_rt(&self) -> f32 {
        self.def.dec_rate
    }

    pub fn sus_lvl(&self) -> f32 {
        self.def.sus_level
    }

    pub fn rel_rt(&self) -> f32 {
        self.def.rel_rate
    }

    pub fn rel_lvl(&self) -> f32 {
        self.def.rel_level
    }

    pub fn curve(&self) -> SegmentCurve {
        self.def.curve
    }
}
