/*
Biquad Core
===========

A second-order IIR filter in Direct Form I:

    y[n] = in0*x[n] + in1*x[n-1] + in2*x[n-2] - out1*y[n-1] - out2*y[n-2]

The five taps are supplied from outside: this type only runs the difference
equation and keeps the two-sample history. Deriving coefficients (and
applying the gain) is the caller's job, see `dsp::dynfilter`.

History and taps are kept in f64. Low cutoffs put the poles close to the unit
circle, where f32 feedback loses precision quickly.
*/

/// The five taps of the biquad transfer function.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coefficients {
    pub in0: f64,
    pub in1: f64,
    pub in2: f64,
    pub out1: f64,
    pub out2: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Biquad {
    coeffs: Coefficients,
    gain: f64,

    x1: f64, // Input at t-1
    x2: f64, // Input at t-2
    y1: f64, // Output at t-1
    y2: f64, // Output at t-2
}

impl Biquad {
    pub fn new() -> Self {
        Self {
            gain: 1.0,
            ..Default::default()
        }
    }

    /// Set the gain that coefficient derivation should fold into the taps.
    pub fn init(&mut self, gain: f64) {
        self.gain = gain;
    }

    #[inline]
    pub fn gain(&self) -> f64 {
        self.gain
    }

    #[inline]
    pub fn coefficients(&self) -> &Coefficients {
        &self.coeffs
    }

    #[inline]
    pub fn set_coefficients(&mut self, coeffs: Coefficients) {
        self.coeffs = coeffs;
    }

    #[inline]
    pub fn sample(&mut self, input: f32) -> f32 {
        let x0 = input as f64;
        let c = &self.coeffs;
        let y0 = c.in0 * x0 + c.in1 * self.x1 + c.in2 * self.x2 - c.out1 * self.y1 - c.out2 * self.y2;

        self.x2 = self.x1;
        self.x1 = x0;
        self.y2 = self.y1;
        self.y1 = y0;

        y0 as f32
    }

    pub fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.sample(*sample);
        }
    }

    /// Clear the history. The phase argument exists for parity with other
    /// generators and has no meaning for a filter.
    pub fn reset(&mut self, _initial_phase: f32) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    /// Copy coefficients, history and gain from `other`.
    pub fn copy_from(&mut self, other: &Self) {
        self.clone_from(other);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Coefficients {
        Coefficients {
            in0: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn unset_coefficients_output_silence() {
        let mut filter = Biquad::new();
        assert_eq!(filter.sample(0.8), 0.0);
        assert_eq!(filter.gain(), 1.0);
    }

    #[test]
    fn identity_taps_pass_input() {
        let mut filter = Biquad::new();
        filter.set_coefficients(identity());

        let mut buffer = vec![0.25, -0.5, 1.0, 0.0];
        let expected = buffer.clone();
        filter.process(&mut buffer);
        assert_eq!(buffer, expected);
    }

    #[test]
    fn difference_equation_uses_history() {
        let mut filter = Biquad::new();
        filter.set_coefficients(Coefficients {
            in0: 0.5,
            in1: 0.25,
            in2: 0.125,
            out1: -0.5,
            out2: 0.25,
        });

        // Impulse response, worked by hand.
        let y0 = filter.sample(1.0);
        let y1 = filter.sample(0.0);
        let y2 = filter.sample(0.0);
        let y3 = filter.sample(0.0);

        assert_eq!(y0, 0.5);
        assert_eq!(y1, 0.25 + 0.5 * 0.5);
        assert_eq!(y2, 0.125 + 0.5 * 0.5 - 0.25 * 0.5);
        assert_eq!(y3, 0.5 * 0.25 - 0.25 * 0.5);
    }

    #[test]
    fn reset_clears_history_but_keeps_taps() {
        let mut filter = Biquad::new();
        filter.set_coefficients(Coefficients {
            in0: 0.5,
            in1: 0.5,
            ..Default::default()
        });
        filter.sample(1.0);
        filter.reset(0.0);

        assert_eq!(filter.sample(0.0), 0.0);
        assert_eq!(filter.coefficients().in0, 0.5);
    }

    #[test]
    fn copy_continues_identically() {
        let mut source = Biquad::new();
        source.init(0.5);
        source.set_coefficients(Coefficients {
            in0: 0.2,
            in1: 0.4,
            in2: 0.2,
            out1: -0.3,
            out2: 0.1,
        });
        for n in 0..10 {
            source.sample((n as f32 * 0.7).sin());
        }

        let mut copy = Biquad::new();
        copy.copy_from(&source);
        assert_eq!(copy.gain(), 0.5);

        for n in 0..64 {
            let input = (n as f32 * 0.3).cos();
            assert_eq!(source.sample(input), copy.sample(input));
        }
    }
}
