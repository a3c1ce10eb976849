//! Low-level DSP primitives used by the graph nodes.
//!
//! Everything here is allocation-free on the per-sample path and safe to
//! embed directly inside voice structs. Tables and parameters are set up
//! once; `sample()` / `generate()` never fail.

/// Second-order IIR core (five taps, two-sample history).
pub mod biquad;
/// Envelope-swept low-pass with cached, table-driven coefficients.
pub mod dynfilter;
/// Segmented ADSR envelope generator.
pub mod envelope;
/// Sine oscillator reading the shared table.
pub mod oscillator;
/// Shared one-cycle sine table.
pub mod wavetable;

pub use envelope::EnvelopeState;
