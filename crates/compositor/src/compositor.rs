//! Main compositor — flattens the visible layer stack into one raster.
//!
//! The [`Compositor`] walks the ordered layer list bottom to top. Image
//! and text layers rasterize and blend onto the accumulation buffer;
//! adjustment layers transform the accumulation buffer itself, so their
//! effect is scoped to exactly the layers beneath them in the stack.

use std::collections::HashMap;

use ph_common::{CanvasSize, Layer, LayerContent, PixelBuffer, SourceId};
use ph_effects::FilterCache;
use tracing::debug;

use crate::error::CompositorError;
use crate::filter_pass::apply_filter;
use crate::text::{draw_text, FontStore};
use crate::transform::draw_image;

/// Allocation ceiling for the output raster (pixels after supersampling).
const MAX_OUTPUT_PIXELS: u64 = 1 << 28;

/// Map from source handles to their pixel data, owned by the host.
pub type SourceMap = HashMap<SourceId, PixelBuffer>;

/// CPU compositor targeting a fixed canvas size.
///
/// The compositor owns no pixel data; it receives layers, sources, fonts,
/// and the filter cache from the caller.
#[derive(Copy, Clone, Debug)]
pub struct Compositor {
    canvas: CanvasSize,
}

impl Compositor {
    pub fn new(canvas: CanvasSize) -> Self {
        Self { canvas }
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Flatten the layer stack into a single RGBA raster at `scale`x
    /// supersampling.
    ///
    /// Layers are processed in array order (bottom to top). Hidden and
    /// fully transparent layers are skipped. Adjustment filters come from
    /// `cache`, which recompiles only when a layer's parameters changed.
    pub fn flatten(
        &self,
        layers: &[Layer],
        sources: &SourceMap,
        fonts: &FontStore,
        cache: &mut FilterCache,
        scale: u32,
    ) -> Result<PixelBuffer, CompositorError> {
        if scale == 0 {
            return Err(CompositorError::InvalidScale(scale));
        }
        let out_pixels = self.canvas.pixel_count() * scale as u64 * scale as u64;
        if out_pixels > MAX_OUTPUT_PIXELS {
            return Err(CompositorError::CanvasTooLarge {
                width: self.canvas.width,
                height: self.canvas.height,
                scale,
            });
        }
        let out = self.canvas.scaled(scale);

        debug!(
            layer_count = layers.len(),
            output = %out,
            scale,
            "Starting flatten"
        );

        let mut acc = PixelBuffer::new(out.width, out.height);
        let scale_f = scale as f32;

        for (idx, layer) in layers.iter().enumerate() {
            if !layer.visible {
                debug!(layer_idx = idx, layer_id = %layer.id, "Skipping hidden layer");
                continue;
            }
            if layer.opacity() <= 0.0 {
                debug!(layer_idx = idx, layer_id = %layer.id, "Skipping fully transparent layer");
                continue;
            }

            debug!(
                layer_idx = idx,
                layer_id = %layer.id,
                kind = layer.kind_name(),
                opacity = layer.opacity(),
                "Processing layer"
            );

            match &layer.content {
                LayerContent::Image(image) => {
                    let src = sources
                        .get(&image.src)
                        .ok_or_else(|| CompositorError::MissingSource(image.src.0.clone()))?;
                    draw_image(&mut acc, src, image, layer.opacity(), scale_f);
                }
                LayerContent::Text(text) => {
                    // A missing font skips the layer; the flatten proceeds.
                    draw_text(&mut acc, text, layer.opacity(), scale_f, fonts);
                }
                LayerContent::Adjustment(adj) => {
                    let filter = cache.get_or_compile(&layer.id, &adj.adjustment);
                    apply_filter(&mut acc, &filter, layer.opacity(), scale_f);
                }
            }
        }

        debug!("Flatten complete");
        Ok(acc)
    }
}
