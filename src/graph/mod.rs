//! Composable building blocks for constructing audio-processing graphs.
//!
//! Graph nodes wrap the low-level DSP primitives with what voice management
//! needs: note events and block-based rendering.

/// Fluent combinators (`.through()`).
pub mod extensions;
/// Envelope-swept filter nodes, local and thread-shared.
pub mod filter;
/// Core traits shared by all graph nodes.
pub mod node;
/// Sine oscillator over the shared table.
pub mod oscillator;
/// Serial chaining of two nodes (source → effect).
pub mod through;

pub use extensions::NodeExt;
pub use node::{GraphNode, RenderCtx};
