#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    dsp::dynfilter::DynFilterLp,
    graph::node::{GraphNode, RenderCtx},
};

/*
Envelope Filter Nodes
=====================

`DynFilterNode` runs a `DynFilterLp` over a block in place. Note events map
onto the filter's envelope:

  note_on   → reset(0.0)   restart the cutoff envelope, clear history
  note_off  → release()    start the release segment from the current cutoff

The node stays active until the release segment finishes.

`SharedDynFilterNode` is the same filter driven from another thread. The
control side holds a `FilterHandle` and pushes messages into a lock-free
ring buffer; the audio side drains the queue at the start of every block, so
a release lands on a block boundary and nothing ever locks.

  let (node, mut handle) = SharedDynFilterNode::new(filter);
  // audio thread owns `node`, control thread owns `handle`
  handle.release();
*/

pub struct DynFilterNode {
    filter: DynFilterLp,
}

impl DynFilterNode {
    pub fn new(filter: DynFilterLp) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &DynFilterLp {
        &self.filter
    }
}

impl GraphNode for DynFilterNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        self.filter.process(out);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.filter.reset(0.0);
    }

    fn note_off(&mut self, _ctx: &RenderCtx) {
        self.filter.release();
    }

    fn is_active(&self) -> bool {
        !self.filter.is_finished()
    }
}

#[cfg(feature = "rtrb")]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterMessage {
    Release,
    Reset { initial_phase: f32 },
}

#[cfg(feature = "rtrb")]
pub struct FilterHandle {
    tx: Producer<FilterMessage>,
}

#[cfg(feature = "rtrb")]
impl FilterHandle {
    /// Queue a release. Returns false if the queue is full.
    pub fn release(&mut self) -> bool {
        self.tx.push(FilterMessage::Release).is_ok()
    }

    /// Queue a restart. Returns false if the queue is full.
    pub fn reset(&mut self, initial_phase: f32) -> bool {
        self.tx.push(FilterMessage::Reset { initial_phase }).is_ok()
    }
}

#[cfg(feature = "rtrb")]
const FILTER_QUEUE_SIZE: usize = 64;

#[cfg(feature = "rtrb")]
pub struct SharedDynFilterNode {
    filter: DynFilterLp,
    rx: Consumer<FilterMessage>,
}

#[cfg(feature = "rtrb")]
impl SharedDynFilterNode {
    pub fn new(filter: DynFilterLp) -> (Self, FilterHandle) {
        let (tx, rx) = RingBuffer::<FilterMessage>::new(FILTER_QUEUE_SIZE);
        (Self { filter, rx }, FilterHandle { tx })
    }

    pub fn filter(&self) -> &DynFilterLp {
        &self.filter
    }

    fn drain(&mut self) {
        while let Ok(msg) = self.rx.pop() {
            match msg {
                FilterMessage::Release => self.filter.release(),
                FilterMessage::Reset { initial_phase } => self.filter.reset(initial_phase),
            }
        }
    }
}

#[cfg(feature = "rtrb")]
impl GraphNode for SharedDynFilterNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        self.drain();
        self.filter.process(out);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.filter.reset(0.0);
    }

    fn note_off(&mut self, _ctx: &RenderCtx) {
        self.filter.release();
    }

    fn is_active(&self) -> bool {
        !self.filter.is_finished()
    }
}
