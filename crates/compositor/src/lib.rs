//! `ph-compositor` — CPU layer compositing for the Photon Studio editor engine.
//!
//! This crate flattens an ordered, visible layer stack into a single
//! RGBA raster at a configurable supersampling scale.
//!
//! The pipeline per layer (bottom to top):
//! 1. **Image layers** — position/size/scale/rotation placement with
//!    bilinear sampling ([`transform::draw_image`]), source-over blended
//!    with layer opacity
//! 2. **Text layers** — fontdue glyph coverage rasterization
//!    ([`text::draw_text`])
//! 3. **Adjustment layers** — the compiled filter transforms the
//!    accumulation buffer at that point in the stack, so the effect is
//!    clipped to the layers beneath ([`filter_pass::apply_filter`])
//!
//! [`worker::flatten_async`] moves the pixel pass onto a background
//! thread and returns a pollable [`RenderHandle`].

pub mod blend;
pub mod blur;
pub mod compositor;
pub mod filter_pass;
pub mod text;
pub mod transform;
pub mod worker;

mod error;

// Re-export primary API
pub use compositor::{Compositor, SourceMap};
pub use error::CompositorError;
pub use text::FontStore;
pub use worker::{flatten_async, RenderHandle};
