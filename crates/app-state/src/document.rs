//! Central document state container.
//!
//! `Document` holds the complete editable state: the ordered layer stack,
//! selection, canvas size, and view transform. All UI reads from this
//! state, and all modifications go through controlled mutation methods.

use ph_common::{CanvasSize, Layer, LayerContent, LayerId};
use serde::{Deserialize, Serialize};

/// Smallest zoom factor the view transform accepts.
pub const MIN_ZOOM: f32 = 0.01;
/// Largest zoom factor the view transform accepts.
pub const MAX_ZOOM: f32 = 64.0;

/// Partial layer update. Every field is optional; only supplied fields are
/// merged into the target layer. Fields that do not apply to the target's
/// kind are logged and ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerPatch {
    pub name: Option<String>,
    pub visible: Option<bool>,
    pub opacity: Option<f32>,
    pub position: Option<[f32; 2]>,
    // Image fields
    pub src: Option<ph_common::SourceId>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation: Option<f32>,
    pub scale: Option<f32>,
    // Text fields
    pub text: Option<String>,
    pub color: Option<[f32; 4]>,
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
    // Adjustment fields
    pub adjustment: Option<ph_common::Adjustment>,
}

impl LayerPatch {
    /// Convenience patch that only moves a layer.
    pub fn position(position: [f32; 2]) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }
}

/// The single source of truth for everything the editor can undo.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    /// Ordered layer stack. Array order is paint order, last = topmost.
    layers: Vec<Layer>,
    /// Currently selected layer, if any. Always references an existing
    /// layer or is `None`.
    selected_layer_id: Option<LayerId>,
    /// Composition dimensions.
    pub canvas_size: CanvasSize,
    /// View zoom factor, always in `[MIN_ZOOM, MAX_ZOOM]`.
    zoom: f32,
    /// View pan offset in screen units.
    pan: [f32; 2],
    /// Whether the document has uncommitted-to-disk changes.
    is_dirty: bool,
}

impl Document {
    pub fn new(canvas_size: CanvasSize) -> Self {
        Self {
            layers: Vec::new(),
            selected_layer_id: None,
            canvas_size,
            zoom: 1.0,
            pan: [0.0, 0.0],
            is_dirty: false,
        }
    }

    // --- Layer stack ---

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn find_layer(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| &l.id == id)
    }

    pub fn find_layer_mut(&mut self, id: &LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| &l.id == id)
    }

    /// Append a layer to the top of the stack and select it.
    ///
    /// Returns false (and leaves the stack untouched) if a layer with the
    /// same id already exists.
    pub fn add_layer(&mut self, layer: Layer) -> bool {
        if self.find_layer(&layer.id).is_some() {
            tracing::warn!(layer_id = %layer.id, "Duplicate layer id, ignoring add");
            return false;
        }
        tracing::debug!(layer_id = %layer.id, kind = layer.kind_name(), "Adding layer");
        self.selected_layer_id = Some(layer.id.clone());
        self.layers.push(layer);
        self.mark_dirty();
        true
    }

    /// Remove a layer by id. Clears the selection if it pointed at the
    /// removed layer. Returns the removed layer, or `None` (logged) if
    /// the id is unknown.
    pub fn remove_layer(&mut self, id: &LayerId) -> Option<Layer> {
        let Some(pos) = self.layers.iter().position(|l| &l.id == id) else {
            tracing::warn!(layer_id = %id, "Remove for unknown layer id, ignoring");
            return None;
        };
        let layer = self.layers.remove(pos);
        if self.selected_layer_id.as_ref() == Some(id) {
            self.selected_layer_id = None;
        }
        tracing::debug!(layer_id = %id, "Removed layer");
        self.mark_dirty();
        Some(layer)
    }

    /// Merge a partial update into the matching layer. Returns false
    /// (logged) if the id is unknown; the document is untouched then.
    pub fn apply_patch(&mut self, id: &LayerId, patch: &LayerPatch) -> bool {
        let Some(layer) = self.layers.iter_mut().find(|l| &l.id == id) else {
            tracing::warn!(layer_id = %id, "Update for unknown layer id, ignoring");
            return false;
        };

        if let Some(name) = &patch.name {
            layer.name = name.clone();
        }
        if let Some(visible) = patch.visible {
            layer.visible = visible;
        }
        if let Some(opacity) = patch.opacity {
            layer.set_opacity(opacity);
        }
        if let Some(position) = patch.position {
            if !layer.set_position(position) {
                tracing::debug!(layer_id = %id, "Position patch on adjustment layer, ignored");
            }
        }

        match &mut layer.content {
            LayerContent::Image(img) => {
                if let Some(src) = &patch.src {
                    img.src = src.clone();
                }
                if let Some(width) = patch.width {
                    img.width = Some(width);
                }
                if let Some(height) = patch.height {
                    img.height = Some(height);
                }
                if let Some(rotation) = patch.rotation {
                    img.rotation = rotation;
                }
                if let Some(scale) = patch.scale {
                    img.scale = scale;
                }
                if patch.text.is_some() || patch.adjustment.is_some() {
                    tracing::debug!(layer_id = %id, "Non-image fields in patch for image layer, ignored");
                }
            }
            LayerContent::Text(txt) => {
                if let Some(text) = &patch.text {
                    txt.text = text.clone();
                }
                if let Some(color) = patch.color {
                    txt.color = color;
                }
                if let Some(font_size) = patch.font_size {
                    txt.font_size = font_size;
                }
                if let Some(font_family) = &patch.font_family {
                    txt.font_family = Some(font_family.clone());
                }
                if patch.src.is_some() || patch.adjustment.is_some() {
                    tracing::debug!(layer_id = %id, "Non-text fields in patch for text layer, ignored");
                }
            }
            LayerContent::Adjustment(adj) => {
                if let Some(adjustment) = &patch.adjustment {
                    adj.adjustment = adjustment.clone();
                }
                if patch.src.is_some() || patch.text.is_some() {
                    tracing::debug!(layer_id = %id, "Non-adjustment fields in patch for adjustment layer, ignored");
                }
            }
        }

        tracing::debug!(layer_id = %id, "Layer updated");
        self.mark_dirty();
        true
    }

    // --- Selection ---

    pub fn selected_layer_id(&self) -> Option<&LayerId> {
        self.selected_layer_id.as_ref()
    }

    /// Change the selection. `None` clears it; a target id must reference
    /// an existing layer or the call is a logged no-op.
    pub fn select_layer(&mut self, id: Option<LayerId>) -> bool {
        match id {
            None => {
                self.selected_layer_id = None;
                true
            }
            Some(id) => {
                if self.find_layer(&id).is_none() {
                    tracing::warn!(layer_id = %id, "Select for unknown layer id, ignoring");
                    return false;
                }
                self.selected_layer_id = Some(id);
                true
            }
        }
    }

    // --- View transform ---

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom factor, clamped into `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = if zoom.is_finite() {
            zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            1.0
        };
    }

    pub fn pan(&self) -> [f32; 2] {
        self.pan
    }

    pub fn set_pan(&mut self, pan: [f32; 2]) {
        self.pan = pan;
    }

    // --- Dirty tracking ---

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn mark_dirty(&mut self) {
        self.is_dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.is_dirty = false;
    }

    /// Internal: bulk-replace state during snapshot restore.
    pub(crate) fn replace_state(
        &mut self,
        layers: Vec<Layer>,
        selected_layer_id: Option<LayerId>,
        canvas_size: CanvasSize,
        zoom: f32,
        pan: [f32; 2],
    ) {
        self.layers = layers;
        self.selected_layer_id = selected_layer_id;
        self.canvas_size = canvas_size;
        self.zoom = zoom;
        self.pan = pan;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ph_common::{Adjustment, ImageLayer, SourceId, TextLayer};

    fn image_layer(id: &str) -> Layer {
        Layer::image(
            LayerId::new(id),
            format!("Image {id}"),
            ImageLayer::new(SourceId::new("src_1")),
        )
    }

    #[test]
    fn new_document_defaults() {
        let doc = Document::new(CanvasSize::SQUARE_1080);
        assert!(doc.layers().is_empty());
        assert!(doc.selected_layer_id().is_none());
        assert_eq!(doc.zoom(), 1.0);
        assert_eq!(doc.pan(), [0.0, 0.0]);
        assert!(!doc.is_dirty());
    }

    #[test]
    fn add_layer_appends_and_selects() {
        let mut doc = Document::new(CanvasSize::SQUARE_1080);
        assert!(doc.add_layer(image_layer("a")));
        assert!(doc.add_layer(image_layer("b")));
        assert_eq!(doc.layer_count(), 2);
        assert_eq!(doc.layers()[1].id, LayerId::new("b"));
        assert_eq!(doc.selected_layer_id(), Some(&LayerId::new("b")));
        assert!(doc.is_dirty());
    }

    #[test]
    fn add_duplicate_id_is_rejected() {
        let mut doc = Document::new(CanvasSize::SQUARE_1080);
        assert!(doc.add_layer(image_layer("a")));
        assert!(!doc.add_layer(image_layer("a")));
        assert_eq!(doc.layer_count(), 1);
    }

    #[test]
    fn remove_layer_clears_matching_selection() {
        let mut doc = Document::new(CanvasSize::SQUARE_1080);
        doc.add_layer(image_layer("a"));
        doc.add_layer(image_layer("b"));

        // "b" is selected; removing "a" keeps the selection.
        assert!(doc.remove_layer(&LayerId::new("a")).is_some());
        assert_eq!(doc.selected_layer_id(), Some(&LayerId::new("b")));

        assert!(doc.remove_layer(&LayerId::new("b")).is_some());
        assert!(doc.selected_layer_id().is_none());
    }

    #[test]
    fn remove_unknown_layer_is_noop() {
        let mut doc = Document::new(CanvasSize::SQUARE_1080);
        doc.add_layer(image_layer("a"));
        assert!(doc.remove_layer(&LayerId::new("zz")).is_none());
        assert_eq!(doc.layer_count(), 1);
    }

    #[test]
    fn patch_merges_common_fields() {
        let mut doc = Document::new(CanvasSize::SQUARE_1080);
        doc.add_layer(image_layer("a"));

        let patch = LayerPatch {
            name: Some("Renamed".to_string()),
            opacity: Some(1.5),
            position: Some([10.0, 5.0]),
            ..LayerPatch::default()
        };
        assert!(doc.apply_patch(&LayerId::new("a"), &patch));

        let layer = doc.find_layer(&LayerId::new("a")).unwrap();
        assert_eq!(layer.name, "Renamed");
        assert_eq!(layer.opacity(), 1.0); // clamped
        assert_eq!(layer.position(), Some([10.0, 5.0]));
    }

    #[test]
    fn patch_unknown_id_is_noop() {
        let mut doc = Document::new(CanvasSize::SQUARE_1080);
        doc.add_layer(image_layer("a"));
        assert!(!doc.apply_patch(&LayerId::new("zz"), &LayerPatch::position([1.0, 1.0])));
    }

    #[test]
    fn patch_ignores_mismatched_kind_fields() {
        let mut doc = Document::new(CanvasSize::SQUARE_1080);
        doc.add_layer(Layer::text(
            LayerId::new("t"),
            "Caption",
            TextLayer::new("hello"),
        ));

        let patch = LayerPatch {
            src: Some(SourceId::new("other")),
            text: Some("world".to_string()),
            ..LayerPatch::default()
        };
        assert!(doc.apply_patch(&LayerId::new("t"), &patch));

        let layer = doc.find_layer(&LayerId::new("t")).unwrap();
        match &layer.content {
            ph_common::LayerContent::Text(txt) => assert_eq!(txt.text, "world"),
            _ => panic!("expected text layer"),
        }
    }

    #[test]
    fn patch_replaces_adjustment_payload() {
        let mut doc = Document::new(CanvasSize::SQUARE_1080);
        doc.add_layer(Layer::adjustment(
            LayerId::new("adj"),
            "Brightness",
            Adjustment::Brightness(100.0),
        ));

        let patch = LayerPatch {
            adjustment: Some(Adjustment::Brightness(150.0)),
            ..LayerPatch::default()
        };
        assert!(doc.apply_patch(&LayerId::new("adj"), &patch));
        match &doc.find_layer(&LayerId::new("adj")).unwrap().content {
            ph_common::LayerContent::Adjustment(adj) => {
                assert_eq!(adj.adjustment, Adjustment::Brightness(150.0));
            }
            _ => panic!("expected adjustment layer"),
        }
    }

    #[test]
    fn select_validates_target() {
        let mut doc = Document::new(CanvasSize::SQUARE_1080);
        doc.add_layer(image_layer("a"));
        assert!(!doc.select_layer(Some(LayerId::new("zz"))));
        assert_eq!(doc.selected_layer_id(), Some(&LayerId::new("a")));
        assert!(doc.select_layer(None));
        assert!(doc.selected_layer_id().is_none());
    }

    #[test]
    fn zoom_is_clamped() {
        let mut doc = Document::new(CanvasSize::SQUARE_1080);
        doc.set_zoom(0.0);
        assert_eq!(doc.zoom(), MIN_ZOOM);
        doc.set_zoom(1000.0);
        assert_eq!(doc.zoom(), MAX_ZOOM);
        doc.set_zoom(f32::NAN);
        assert_eq!(doc.zoom(), 1.0);
        doc.set_zoom(2.0);
        assert_eq!(doc.zoom(), 2.0);
    }
}
