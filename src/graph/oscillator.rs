use std::sync::Arc;

use crate::dsp::{oscillator::SineOsc, wavetable::WaveTable};
use crate::graph::node::{GraphNode, RenderCtx};

/*
Table Sine Oscillator Node
==========================

Wraps `SineOsc` for block rendering. By default the pitch follows the render
context (the voice's note); `fixed()` pins it to a frequency of its own.

  let tone = OscNode::sine(table.clone(), params.sample_rate);
  let voice = tone.through(DynFilterNode::new(filter));
*/

pub struct OscNode {
    osc: SineOsc,
    /// Fixed frequency (Hz). If Some, ignores ctx.frequency.
    base_frequency: Option<f32>,
}

impl OscNode {
    pub fn sine(table: Arc<WaveTable>, sample_rate: f32) -> Self {
        Self {
            osc: SineOsc::new(table, sample_rate),
            base_frequency: None,
        }
    }

    pub fn fixed(table: Arc<WaveTable>, sample_rate: f32, frequency: f32) -> Self {
        Self {
            osc: SineOsc::new(table, sample_rate),
            base_frequency: Some(frequency),
        }
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.osc
            .set_frequency(self.base_frequency.unwrap_or(ctx.frequency));
        self.osc.render(out);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.osc.reset(0.0);
    }
}
