//! Text layer rasterization via fontdue glyph coverage.

use std::collections::HashMap;

use ph_common::{PixelBuffer, TextLayer};
use tracing::{debug, warn};

use crate::blend::src_over;
use crate::error::CompositorError;

/// Registered fonts keyed by family name. The host supplies raw font
/// bytes (the engine owns no file-format logic); the first registered
/// family becomes the default for layers without an explicit family.
#[derive(Default)]
pub struct FontStore {
    fonts: HashMap<String, fontdue::Font>,
    default_family: Option<String>,
}

impl FontStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and register a font under a family name.
    pub fn register(&mut self, family: &str, bytes: &[u8]) -> Result<(), CompositorError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default()).map_err(
            |reason| CompositorError::FontLoad {
                family: family.to_string(),
                reason: reason.to_string(),
            },
        )?;
        debug!(family, "Registered font");
        if self.default_family.is_none() {
            self.default_family = Some(family.to_string());
        }
        self.fonts.insert(family.to_string(), font);
        Ok(())
    }

    /// Resolve a family name, falling back to the default family.
    pub fn resolve(&self, family: Option<&str>) -> Option<&fontdue::Font> {
        family
            .and_then(|f| self.fonts.get(f))
            .or_else(|| {
                self.default_family
                    .as_deref()
                    .and_then(|f| self.fonts.get(f))
            })
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

/// Rasterize a text layer onto the accumulation buffer.
///
/// Returns false (logged) when no usable font is registered; the caller
/// continues with the remaining layers rather than failing the flatten.
pub fn draw_text(
    acc: &mut PixelBuffer,
    layer: &TextLayer,
    opacity: f32,
    scale: f32,
    fonts: &FontStore,
) -> bool {
    let Some(font) = fonts.resolve(layer.font_family.as_deref()) else {
        warn!(
            family = layer.font_family.as_deref().unwrap_or("<default>"),
            "No font registered for text layer, skipping"
        );
        return false;
    };

    let px_size = layer.font_size * scale;
    if px_size <= 0.0 || !px_size.is_finite() {
        warn!(font_size = layer.font_size, "Degenerate font size, skipping");
        return false;
    }

    let line_height = font
        .horizontal_line_metrics(px_size)
        .map(|m| m.new_line_size)
        .unwrap_or(px_size * 1.2);
    let ascent = font
        .horizontal_line_metrics(px_size)
        .map(|m| m.ascent)
        .unwrap_or(px_size);

    let color = [
        (layer.color[0].clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
        (layer.color[1].clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
        (layer.color[2].clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
    ];
    let color_alpha = layer.color[3].clamp(0.0, 1.0);

    debug!(
        text_len = layer.text.len(),
        px_size,
        position = ?layer.position,
        "Drawing text layer"
    );

    let origin_x = layer.position[0] * scale;
    let mut baseline = layer.position[1] * scale + ascent;

    for line in layer.text.split('\n') {
        let mut pen_x = origin_x;
        for ch in line.chars() {
            let (metrics, coverage) = font.rasterize(ch, px_size);

            let glyph_left = pen_x + metrics.xmin as f32;
            let glyph_top = baseline - metrics.height as f32 - metrics.ymin as f32;

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let cov = coverage[gy * metrics.width + gx];
                    if cov == 0 {
                        continue;
                    }
                    let dx = glyph_left + gx as f32;
                    let dy = glyph_top + gy as f32;
                    if dx < 0.0 || dy < 0.0 {
                        continue;
                    }
                    let (dx, dy) = (dx as u32, dy as u32);
                    if dx >= acc.width() || dy >= acc.height() {
                        continue;
                    }
                    let alpha = (cov as f32 / 255.0) * color_alpha;
                    let src = [color[0], color[1], color[2], (alpha * 255.0 + 0.5) as u8];
                    let blended = src_over(acc.pixel(dx, dy), src, opacity);
                    acc.set_pixel(dx, dy, blended);
                }
            }

            pen_x += metrics.advance_width;
        }
        baseline += line_height;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_resolves_nothing() {
        let fonts = FontStore::new();
        assert!(fonts.is_empty());
        assert!(fonts.resolve(None).is_none());
        assert!(fonts.resolve(Some("Inter")).is_none());
    }

    #[test]
    fn register_rejects_garbage_bytes() {
        let mut fonts = FontStore::new();
        let err = fonts.register("Broken", &[0u8; 16]).unwrap_err();
        assert!(matches!(err, CompositorError::FontLoad { .. }));
        assert!(fonts.is_empty());
    }

    #[test]
    fn draw_without_font_is_skipped() {
        let fonts = FontStore::new();
        let mut acc = PixelBuffer::new(8, 8);
        let layer = TextLayer::new("Hi");
        assert!(!draw_text(&mut acc, &layer, 1.0, 1.0, &fonts));
        assert!(acc.data().iter().all(|&b| b == 0));
    }
}
