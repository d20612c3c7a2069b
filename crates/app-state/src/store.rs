//! Committing layer store — document mutations plus history bookkeeping.
//!
//! `DocumentStore` is the write path for everything undoable: each
//! mutating operation applies to the [`Document`] and commits exactly one
//! snapshot. Interactive state (live drags, selection, view transform)
//! goes through without commits; commit timing is the caller's contract.

use ph_common::{Layer, LayerId};

use crate::document::{Document, LayerPatch};
use crate::history::DocumentHistory;
use crate::snapshot::DocumentSnapshot;

/// Document plus its linear undo/redo history.
pub struct DocumentStore {
    document: Document,
    history: DocumentHistory,
}

impl DocumentStore {
    pub fn new(document: Document) -> Self {
        let history = DocumentHistory::new(DocumentSnapshot::capture(&document));
        Self { document, history }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &DocumentHistory {
        &self.history
    }

    fn commit(&mut self, label: &str) {
        self.history
            .commit(label, DocumentSnapshot::capture(&self.document));
    }

    /// Append a layer, select it, and commit one snapshot.
    ///
    /// A duplicate id is a logged no-op with no commit.
    pub fn add_layer(&mut self, layer: Layer) -> bool {
        let label = format!("Add {} layer", layer.kind_name());
        if !self.document.add_layer(layer) {
            return false;
        }
        self.commit(&label);
        true
    }

    /// Merge a partial update into a layer and commit one snapshot.
    ///
    /// An unknown id is a logged no-op with no commit.
    pub fn update_layer(&mut self, id: &LayerId, patch: &LayerPatch) -> bool {
        if !self.document.apply_patch(id, patch) {
            return false;
        }
        self.commit("Edit layer");
        true
    }

    /// Remove a layer (clearing a matching selection) and commit one
    /// snapshot. An unknown id is a logged no-op with no commit.
    pub fn remove_layer(&mut self, id: &LayerId) -> bool {
        if self.document.remove_layer(id).is_none() {
            return false;
        }
        self.commit("Remove layer");
        true
    }

    /// Change the selection. Interactive state: never commits.
    pub fn select_layer(&mut self, id: Option<LayerId>) -> bool {
        self.document.select_layer(id)
    }

    /// Update the view zoom. Interactive state: never commits.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.document.set_zoom(zoom);
    }

    /// Update the view pan. Interactive state: never commits.
    pub fn set_pan(&mut self, pan: [f32; 2]) {
        self.document.set_pan(pan);
    }

    /// Step back one committed edit. Returns false at the history start.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        snapshot.restore(&mut self.document);
        true
    }

    /// Step forward one undone edit. Returns false at the history end.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        snapshot.restore(&mut self.document);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ph_common::{Adjustment, CanvasSize, ImageLayer, SourceId};

    fn store() -> DocumentStore {
        DocumentStore::new(Document::new(CanvasSize::SQUARE_1080))
    }

    fn image_layer(id: &str) -> Layer {
        Layer::image(
            LayerId::new(id),
            format!("Image {id}"),
            ImageLayer::new(SourceId::new("src_1")),
        )
    }

    #[test]
    fn add_layer_commits_and_selects() {
        let mut s = store();
        assert!(s.add_layer(image_layer("a")));
        assert_eq!(s.history().undo_depth(), 1);
        assert_eq!(s.document().selected_layer_id(), Some(&LayerId::new("a")));
        assert_eq!(s.history().undo_label(), Some("Add image layer"));
    }

    #[test]
    fn duplicate_add_does_not_commit() {
        let mut s = store();
        s.add_layer(image_layer("a"));
        assert!(!s.add_layer(image_layer("a")));
        assert_eq!(s.history().undo_depth(), 1);
    }

    #[test]
    fn update_then_undo_then_redo() {
        let mut s = store();
        s.add_layer(image_layer("a"));
        assert_eq!(s.history().undo_depth(), 1);

        assert!(s.update_layer(&LayerId::new("a"), &LayerPatch::position([10.0, 0.0])));
        assert_eq!(s.history().undo_depth(), 2);
        assert_eq!(
            s.document().find_layer(&LayerId::new("a")).unwrap().position(),
            Some([10.0, 0.0])
        );

        assert!(s.undo());
        assert_eq!(
            s.document().find_layer(&LayerId::new("a")).unwrap().position(),
            Some([0.0, 0.0])
        );

        assert!(s.redo());
        assert_eq!(
            s.document().find_layer(&LayerId::new("a")).unwrap().position(),
            Some([10.0, 0.0])
        );
    }

    #[test]
    fn update_unknown_id_does_not_commit() {
        let mut s = store();
        s.add_layer(image_layer("a"));
        assert!(!s.update_layer(&LayerId::new("zz"), &LayerPatch::position([1.0, 1.0])));
        assert_eq!(s.history().undo_depth(), 1);
    }

    #[test]
    fn remove_layer_commits_and_clears_selection() {
        let mut s = store();
        s.add_layer(image_layer("a"));
        assert!(s.remove_layer(&LayerId::new("a")));
        assert_eq!(s.history().undo_depth(), 2);
        assert!(s.document().selected_layer_id().is_none());
        assert_eq!(s.document().layer_count(), 0);

        // Undo restores the layer and its selection.
        assert!(s.undo());
        assert_eq!(s.document().layer_count(), 1);
        assert_eq!(s.document().selected_layer_id(), Some(&LayerId::new("a")));
    }

    #[test]
    fn undo_redo_identity_for_full_prefix() {
        let mut s = store();
        s.add_layer(image_layer("a"));
        s.update_layer(&LayerId::new("a"), &LayerPatch::position([5.0, 5.0]));
        s.add_layer(Layer::adjustment(
            LayerId::new("adj"),
            "Contrast",
            Adjustment::Contrast(130.0),
        ));
        let reference = DocumentSnapshot::capture(s.document());

        for _ in 0..3 {
            assert!(s.undo());
        }
        assert!(!s.undo()); // boundary no-op, never an error
        assert_eq!(s.document().layer_count(), 0);

        for _ in 0..3 {
            assert!(s.redo());
        }
        assert!(!s.redo());
        assert_eq!(DocumentSnapshot::capture(s.document()), reference);
    }

    #[test]
    fn commit_after_undo_discards_redo_branch() {
        let mut s = store();
        s.add_layer(image_layer("a"));
        s.update_layer(&LayerId::new("a"), &LayerPatch::position([10.0, 0.0]));
        s.undo();

        // New commit while not at the tail: redo branch gone.
        s.update_layer(&LayerId::new("a"), &LayerPatch::position([0.0, 20.0]));
        assert!(!s.history().can_redo());
        assert!(!s.redo());
        assert_eq!(
            s.document().find_layer(&LayerId::new("a")).unwrap().position(),
            Some([0.0, 20.0])
        );
    }

    #[test]
    fn selection_and_view_changes_do_not_commit() {
        let mut s = store();
        s.add_layer(image_layer("a"));
        let depth = s.history().undo_depth();

        s.select_layer(None);
        s.set_zoom(3.0);
        s.set_pan([12.0, 8.0]);
        assert_eq!(s.history().undo_depth(), depth);
    }
}
