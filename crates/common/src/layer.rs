//! Layer model — one addressable visual element in the composite.
//!
//! A document is an ordered stack of [`Layer`]s; array order is paint order
//! (last = topmost). The content payload is a tagged union so per-kind code
//! matches exhaustively instead of dispatching on strings.

use serde::{Deserialize, Serialize};

use crate::adjustment::Adjustment;
use crate::types::{LayerId, SourceId};

/// A raster layer referencing an external pixel source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageLayer {
    /// Handle into the host's pixel source map.
    pub src: SourceId,
    /// Position of the layer's top-left corner in canvas units.
    pub position: [f32; 2],
    /// Display width in canvas units. `None` = natural source width.
    pub width: Option<f32>,
    /// Display height in canvas units. `None` = natural source height.
    pub height: Option<f32>,
    /// Rotation about the layer center in degrees.
    pub rotation: f32,
    /// Uniform scale factor on top of width/height. 1.0 = unscaled.
    pub scale: f32,
}

impl ImageLayer {
    pub fn new(src: SourceId) -> Self {
        Self {
            src,
            position: [0.0, 0.0],
            width: None,
            height: None,
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

/// A single-run text layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextLayer {
    pub text: String,
    /// Position of the text block's top-left corner in canvas units.
    pub position: [f32; 2],
    /// RGBA fill color, each component in 0..=1.
    pub color: [f32; 4],
    /// Font size in canvas units.
    pub font_size: f32,
    /// Font family name resolved by the host's font store.
    pub font_family: Option<String>,
}

impl TextLayer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            position: [0.0, 0.0],
            color: [0.0, 0.0, 0.0, 1.0],
            font_size: 32.0,
            font_family: None,
        }
    }
}

/// A non-destructive color-transform layer. Its effect is scoped to the
/// layers beneath it in the stack, never the whole canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentLayer {
    pub adjustment: Adjustment,
}

/// Content payload per layer kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LayerContent {
    Image(ImageLayer),
    Text(TextLayer),
    Adjustment(AdjustmentLayer),
}

impl LayerContent {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Image(_) => "image",
            Self::Text(_) => "text",
            Self::Adjustment(_) => "adjustment",
        }
    }
}

/// One layer in the document stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Stable unique identifier.
    pub id: LayerId,
    /// Display name.
    pub name: String,
    /// Hidden layers are skipped entirely by the compositor.
    pub visible: bool,
    /// Layer opacity, always held in 0..=1.
    opacity: f32,
    pub content: LayerContent,
}

impl Layer {
    pub fn new(id: LayerId, name: impl Into<String>, content: LayerContent) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
            opacity: 1.0,
            content,
        }
    }

    pub fn image(id: LayerId, name: impl Into<String>, image: ImageLayer) -> Self {
        Self::new(id, name, LayerContent::Image(image))
    }

    pub fn text(id: LayerId, name: impl Into<String>, text: TextLayer) -> Self {
        Self::new(id, name, LayerContent::Text(text))
    }

    pub fn adjustment(id: LayerId, name: impl Into<String>, adjustment: Adjustment) -> Self {
        Self::new(
            id,
            name,
            LayerContent::Adjustment(AdjustmentLayer { adjustment }),
        )
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Set opacity, clamped into 0..=1. Non-finite input becomes 1.0.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
    }

    pub fn kind_name(&self) -> &'static str {
        self.content.kind_name()
    }

    /// The layer's position in canvas units, if its kind has one.
    /// Adjustment layers occupy the whole stack beneath them and have none.
    pub fn position(&self) -> Option<[f32; 2]> {
        match &self.content {
            LayerContent::Image(img) => Some(img.position),
            LayerContent::Text(txt) => Some(txt.position),
            LayerContent::Adjustment(_) => None,
        }
    }

    /// Update the layer's position, if its kind has one. Returns false
    /// for adjustment layers.
    pub fn set_position(&mut self, position: [f32; 2]) -> bool {
        match &mut self.content {
            LayerContent::Image(img) => {
                img.position = position;
                true
            }
            LayerContent::Text(txt) => {
                txt.position = position;
                true
            }
            LayerContent::Adjustment(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjustment::Adjustment;

    #[test]
    fn new_layer_defaults() {
        let layer = Layer::image(
            LayerId::new("l1"),
            "Background",
            ImageLayer::new(SourceId::new("src_1")),
        );
        assert!(layer.visible);
        assert_eq!(layer.opacity(), 1.0);
        assert_eq!(layer.kind_name(), "image");
        assert_eq!(layer.position(), Some([0.0, 0.0]));
    }

    #[test]
    fn opacity_is_clamped() {
        let mut layer = Layer::text(LayerId::new("t1"), "Headline", TextLayer::new("Hi"));
        layer.set_opacity(1.5);
        assert_eq!(layer.opacity(), 1.0);
        layer.set_opacity(-0.5);
        assert_eq!(layer.opacity(), 0.0);
        layer.set_opacity(f32::NAN);
        assert_eq!(layer.opacity(), 1.0);
        layer.set_opacity(0.42);
        assert!((layer.opacity() - 0.42).abs() < f32::EPSILON);
    }

    #[test]
    fn adjustment_layer_has_no_position() {
        let mut layer = Layer::adjustment(
            LayerId::new("a1"),
            "Brightness",
            Adjustment::Brightness(120.0),
        );
        assert_eq!(layer.position(), None);
        assert!(!layer.set_position([5.0, 5.0]));
        assert_eq!(layer.kind_name(), "adjustment");
    }

    #[test]
    fn set_position_moves_image_and_text() {
        let mut img = Layer::image(
            LayerId::new("i"),
            "img",
            ImageLayer::new(SourceId::new("s")),
        );
        assert!(img.set_position([10.0, 20.0]));
        assert_eq!(img.position(), Some([10.0, 20.0]));

        let mut txt = Layer::text(LayerId::new("t"), "txt", TextLayer::new("x"));
        assert!(txt.set_position([3.0, 4.0]));
        assert_eq!(txt.position(), Some([3.0, 4.0]));
    }

    #[test]
    fn serde_roundtrip() {
        let layer = Layer::adjustment(LayerId::new("a1"), "Hue", Adjustment::Hue(90.0));
        let json = serde_json::to_string(&layer).unwrap();
        let back: Layer = serde_json::from_str(&json).unwrap();
        assert_eq!(layer, back);
    }
}
