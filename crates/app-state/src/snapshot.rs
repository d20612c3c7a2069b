//! Serializable document snapshot for undo/redo.
//!
//! `DocumentSnapshot` is an immutable full copy of the document at one
//! committed point. Pixel sources are referenced by handle only, so
//! snapshots stay cheap even for large rasters.

use ph_common::{CanvasSize, Layer, LayerId};
use serde::{Deserialize, Serialize};

use crate::document::Document;

/// A complete snapshot of the document state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub layers: Vec<Layer>,
    pub selected_layer_id: Option<LayerId>,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub zoom: f32,
    pub pan: [f32; 2],
}

impl DocumentSnapshot {
    /// Capture a snapshot from the current document.
    pub fn capture(doc: &Document) -> Self {
        Self {
            layers: doc.layers().to_vec(),
            selected_layer_id: doc.selected_layer_id().cloned(),
            canvas_width: doc.canvas_size.width,
            canvas_height: doc.canvas_size.height,
            zoom: doc.zoom(),
            pan: doc.pan(),
        }
    }

    /// Restore this snapshot into the given document.
    ///
    /// Overwrites layers, selection, canvas size, and view transform.
    /// The dirty flag is left alone; it is managed by the store.
    pub fn restore(&self, doc: &mut Document) {
        doc.replace_state(
            self.layers.clone(),
            self.selected_layer_id.clone(),
            CanvasSize::new(self.canvas_width, self.canvas_height),
            self.zoom,
            self.pan,
        );
        tracing::debug!(layers = self.layers.len(), "Snapshot restored");
    }

    /// Rough memory footprint estimate in bytes (for history budgeting).
    pub fn estimated_size(&self) -> usize {
        let mut size = std::mem::size_of::<Self>();
        for layer in &self.layers {
            size += std::mem::size_of::<Layer>();
            size += layer.id.0.len() + layer.name.len();
            if let ph_common::LayerContent::Text(txt) = &layer.content {
                size += txt.text.len();
            }
        }
        if let Some(id) = &self.selected_layer_id {
            size += id.0.len();
        }
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ph_common::{Adjustment, ImageLayer, SourceId, TextLayer};

    fn make_document() -> Document {
        let mut doc = Document::new(CanvasSize::SQUARE_1080);
        doc.add_layer(Layer::image(
            LayerId::new("bg"),
            "Background",
            ImageLayer::new(SourceId::new("src_1")),
        ));
        doc.add_layer(Layer::text(
            LayerId::new("caption"),
            "Caption",
            TextLayer::new("Summer sale"),
        ));
        doc.add_layer(Layer::adjustment(
            LayerId::new("grade"),
            "Warm grade",
            Adjustment::Sepia(30.0),
        ));
        doc.set_zoom(2.0);
        doc.set_pan([40.0, -10.0]);
        doc
    }

    #[test]
    fn capture_and_restore_roundtrip() {
        let doc = make_document();
        let snapshot = DocumentSnapshot::capture(&doc);

        assert_eq!(snapshot.layers.len(), 3);
        assert_eq!(snapshot.selected_layer_id, Some(LayerId::new("grade")));
        assert_eq!(snapshot.canvas_width, 1080);
        assert_eq!(snapshot.zoom, 2.0);

        let mut target = Document::new(CanvasSize::new(10, 10));
        snapshot.restore(&mut target);

        assert_eq!(target.layer_count(), 3);
        assert_eq!(target.selected_layer_id(), Some(&LayerId::new("grade")));
        assert_eq!(target.canvas_size, CanvasSize::SQUARE_1080);
        assert_eq!(target.zoom(), 2.0);
        assert_eq!(target.pan(), [40.0, -10.0]);
    }

    #[test]
    fn restore_leaves_dirty_flag_alone() {
        let doc = make_document();
        let snapshot = DocumentSnapshot::capture(&doc);

        let mut target = Document::new(CanvasSize::new(10, 10));
        target.mark_dirty();
        snapshot.restore(&mut target);
        assert!(target.is_dirty());
    }

    #[test]
    fn snapshot_serde_roundtrip() {
        let snapshot = DocumentSnapshot::capture(&make_document());
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: DocumentSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, back);
    }

    #[test]
    fn estimated_size_grows_with_layers() {
        let empty = DocumentSnapshot::capture(&Document::new(CanvasSize::SQUARE_1080));
        let full = DocumentSnapshot::capture(&make_document());
        assert!(full.estimated_size() > empty.estimated_size());
    }
}
