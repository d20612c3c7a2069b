//! Editor orchestration: interaction state machine and capture lock.
//!
//! `Editor` owns the committing store, the pixel source map, fonts, the
//! filter cache, and per-layer mask regions. Interaction is a single
//! state machine:
//!
//! ```text
//! Idle ──pointer-down──▶ DraggingLayer ──pointer-up (one commit)──▶ Idle
//! Idle ──handle-down──▶ DraggingMask ──pointer-up──▶ Idle
//! Idle ──export──▶ Capturing ──result/cancel──▶ Idle
//! ```
//!
//! While `Capturing`, every mutation is rejected: an in-flight capture is
//! a mutual-exclusion lock over the document. The capture path
//! neutralizes zoom/pan/selection and restores the prior view state on
//! every exit path, including failures.

use std::collections::HashMap;
use std::sync::Arc;

use ph_app_state::{Document, DocumentHistory, DocumentStore, LayerPatch};
use ph_common::{
    Adjustment, CanvasSize, EditRequest, EditService, ImageLayer, Layer, LayerContent, LayerId,
    PixelBuffer, SourceId, TextLayer,
};
use ph_compositor::transform::display_size;
use ph_compositor::{flatten_async, Compositor, FontStore, RenderHandle, SourceMap};
use ph_effects::FilterCache;
use tracing::{debug, warn};

use crate::drag::LayerDragSession;
use crate::error::EditorError;
use crate::mask_tool::{MaskDragSession, MaskHandle, MaskRegion};
use crate::viewport::screen_to_canvas;

/// View state saved while a capture holds the document.
struct CaptureState {
    saved_zoom: f32,
    saved_pan: [f32; 2],
    saved_selection: Option<LayerId>,
    /// Present for asynchronous exports; `None` during a sync capture.
    handle: Option<RenderHandle>,
}

/// Editor-level interaction state.
enum Interaction {
    Idle,
    DraggingLayer(LayerDragSession),
    DraggingMask {
        layer_id: LayerId,
        layer_position: [f32; 2],
        session: MaskDragSession,
    },
    Capturing(CaptureState),
}

/// The interactive editing facade over the document engine.
pub struct Editor {
    store: DocumentStore,
    sources: Arc<SourceMap>,
    fonts: Arc<FontStore>,
    cache: FilterCache,
    masks: HashMap<LayerId, MaskRegion>,
    interaction: Interaction,
    next_layer: u64,
    next_source: u64,
}

impl Editor {
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            store: DocumentStore::new(Document::new(canvas)),
            sources: Arc::new(SourceMap::new()),
            fonts: Arc::new(FontStore::new()),
            cache: FilterCache::new(),
            masks: HashMap::new(),
            interaction: Interaction::Idle,
            next_layer: 0,
            next_source: 0,
        }
    }

    pub fn document(&self) -> &Document {
        self.store.document()
    }

    pub fn history(&self) -> &DocumentHistory {
        self.store.history()
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.interaction, Interaction::Capturing(_))
    }

    pub fn is_dragging(&self) -> bool {
        matches!(
            self.interaction,
            Interaction::DraggingLayer(_) | Interaction::DraggingMask { .. }
        )
    }

    /// Reject mutations while a capture holds the lock.
    fn ensure_unlocked(&self) -> Result<(), EditorError> {
        if self.is_capturing() {
            warn!("Edit rejected: capture in progress");
            return Err(EditorError::CaptureInProgress);
        }
        Ok(())
    }

    /// Interactions that start a new session need a fully idle editor.
    fn ensure_idle(&self) -> Result<(), EditorError> {
        self.ensure_unlocked()?;
        if self.is_dragging() {
            return Err(EditorError::DragInProgress);
        }
        Ok(())
    }

    fn next_layer_id(&mut self) -> LayerId {
        self.next_layer += 1;
        LayerId::new(format!("layer_{}", self.next_layer))
    }

    fn next_source_id(&mut self) -> SourceId {
        self.next_source += 1;
        SourceId::new(format!("src_{}", self.next_source))
    }

    // -----------------------------------------------------------------
    // Fonts and sources
    // -----------------------------------------------------------------

    /// Register a font for text layers. The host supplies raw bytes from
    /// its own picker; the engine owns no file-format logic.
    pub fn register_font(&mut self, family: &str, bytes: &[u8]) -> Result<(), EditorError> {
        self.ensure_unlocked()?;
        let Some(fonts) = Arc::get_mut(&mut self.fonts) else {
            // A detached render worker still holds the font store.
            warn!("Font registration rejected: render in flight");
            return Err(EditorError::CaptureInProgress);
        };
        fonts.register(family, bytes).map_err(EditorError::from)
    }

    /// Pixels for a registered source handle.
    pub fn source(&self, id: &SourceId) -> Option<&PixelBuffer> {
        self.sources.get(id)
    }

    // -----------------------------------------------------------------
    // Layer lifecycle
    // -----------------------------------------------------------------

    /// Import pixels as a new image layer at the origin. Registers the
    /// source, appends the layer, selects it, and commits one snapshot.
    pub fn import_image(
        &mut self,
        name: &str,
        pixels: PixelBuffer,
    ) -> Result<LayerId, EditorError> {
        self.ensure_unlocked()?;
        let source_id = self.next_source_id();
        Arc::make_mut(&mut self.sources).insert(source_id.clone(), pixels);

        let layer_id = self.next_layer_id();
        let layer = Layer::image(layer_id.clone(), name, ImageLayer::new(source_id));
        self.store.add_layer(layer);
        Ok(layer_id)
    }

    /// Import raw RGBA8 bytes (validated) as a new image layer.
    pub fn import_image_bytes(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
        bytes: Vec<u8>,
    ) -> Result<LayerId, EditorError> {
        let pixels = PixelBuffer::from_rgba8(width, height, bytes)?;
        self.import_image(name, pixels)
    }

    /// Add a text layer, select it, and commit one snapshot.
    pub fn add_text_layer(&mut self, name: &str, text: TextLayer) -> Result<LayerId, EditorError> {
        self.ensure_unlocked()?;
        let layer_id = self.next_layer_id();
        self.store
            .add_layer(Layer::text(layer_id.clone(), name, text));
        Ok(layer_id)
    }

    /// Add an adjustment layer, select it, and commit one snapshot.
    pub fn add_adjustment_layer(
        &mut self,
        name: &str,
        adjustment: Adjustment,
    ) -> Result<LayerId, EditorError> {
        self.ensure_unlocked()?;
        let layer_id = self.next_layer_id();
        self.store
            .add_layer(Layer::adjustment(layer_id.clone(), name, adjustment));
        Ok(layer_id)
    }

    /// Merge a partial update and commit one snapshot. Returns false for
    /// an unknown id (logged, no commit).
    pub fn update_layer(&mut self, id: &LayerId, patch: &LayerPatch) -> Result<bool, EditorError> {
        self.ensure_unlocked()?;
        Ok(self.store.update_layer(id, patch))
    }

    /// Remove a layer and commit one snapshot. The layer's pixel source
    /// stays registered so undo can bring the layer back.
    pub fn remove_layer(&mut self, id: &LayerId) -> Result<bool, EditorError> {
        self.ensure_unlocked()?;
        if !self.store.remove_layer(id) {
            return Ok(false);
        }
        self.cache.invalidate(id);
        self.masks.remove(id);
        Ok(true)
    }

    pub fn select_layer(&mut self, id: Option<LayerId>) -> Result<bool, EditorError> {
        self.ensure_unlocked()?;
        Ok(self.store.select_layer(id))
    }

    pub fn undo(&mut self) -> Result<bool, EditorError> {
        self.ensure_unlocked()?;
        Ok(self.store.undo())
    }

    pub fn redo(&mut self) -> Result<bool, EditorError> {
        self.ensure_unlocked()?;
        Ok(self.store.redo())
    }

    pub fn set_zoom(&mut self, zoom: f32) -> Result<(), EditorError> {
        self.ensure_unlocked()?;
        self.store.set_zoom(zoom);
        Ok(())
    }

    pub fn set_pan(&mut self, pan: [f32; 2]) -> Result<(), EditorError> {
        self.ensure_unlocked()?;
        self.store.set_pan(pan);
        Ok(())
    }

    // -----------------------------------------------------------------
    // Drag sessions
    // -----------------------------------------------------------------

    /// Start dragging a layer from a screen-space press point.
    pub fn begin_layer_drag(
        &mut self,
        id: &LayerId,
        screen: [f32; 2],
    ) -> Result<(), EditorError> {
        self.ensure_idle()?;
        let layer = self
            .store
            .document()
            .find_layer(id)
            .ok_or_else(|| EditorError::LayerNotFound(id.0.clone()))?;
        let position = layer
            .position()
            .ok_or_else(|| EditorError::NotDraggable(id.0.clone()))?;

        debug!(layer_id = %id, ?screen, "Begin layer drag");
        self.interaction =
            Interaction::DraggingLayer(LayerDragSession::begin(id.clone(), screen, position));
        Ok(())
    }

    /// Start dragging a mask region body or corner handle.
    pub fn begin_mask_drag(
        &mut self,
        id: &LayerId,
        handle: MaskHandle,
        screen: [f32; 2],
    ) -> Result<(), EditorError> {
        self.ensure_idle()?;
        let layer = self
            .store
            .document()
            .find_layer(id)
            .ok_or_else(|| EditorError::LayerNotFound(id.0.clone()))?;
        let LayerContent::Image(image) = &layer.content else {
            return Err(EditorError::NotAnImageLayer(id.0.clone()));
        };
        let src = self
            .sources
            .get(&image.src)
            .ok_or_else(|| EditorError::MissingSource(image.src.0.clone()))?;

        let (parent_w, parent_h) = display_size(image, src);
        let layer_position = image.position;
        let region = self
            .masks
            .get(id)
            .copied()
            .unwrap_or_else(|| MaskRegion::centered_in(parent_w, parent_h));

        let doc = self.store.document();
        let canvas = screen_to_canvas(screen, doc.zoom(), doc.pan());
        let local = [canvas[0] - layer_position[0], canvas[1] - layer_position[1]];

        debug!(layer_id = %id, ?handle, ?local, "Begin mask drag");
        self.interaction = Interaction::DraggingMask {
            layer_id: id.clone(),
            layer_position,
            session: MaskDragSession::begin(handle, local, region, parent_w, parent_h),
        };
        Ok(())
    }

    /// Feed a pointer move into the active drag session. A move with no
    /// active session is a logged no-op; it never touches the document.
    pub fn update_drag(&mut self, screen: [f32; 2]) {
        let zoom = self.store.document().zoom();
        let pan = self.store.document().pan();
        match &mut self.interaction {
            Interaction::DraggingLayer(session) => session.update(screen, zoom),
            Interaction::DraggingMask {
                layer_position,
                session,
                ..
            } => {
                let canvas = screen_to_canvas(screen, zoom, pan);
                session.update([
                    canvas[0] - layer_position[0],
                    canvas[1] - layer_position[1],
                ]);
            }
            _ => debug!("Pointer move with no active drag, ignoring"),
        }
    }

    /// Release the active drag. A moved layer drag issues exactly one
    /// `update_layer` commit; a mask drag stores the pending region
    /// (interactive tool state, no history commit).
    pub fn end_drag(&mut self) {
        match std::mem::replace(&mut self.interaction, Interaction::Idle) {
            Interaction::DraggingLayer(session) => {
                if session.has_moved() {
                    let patch = LayerPatch::position(session.pending_position());
                    self.store.update_layer(session.layer_id(), &patch);
                } else {
                    debug!(layer_id = %session.layer_id(), "Drag released without movement, no commit");
                }
            }
            Interaction::DraggingMask {
                layer_id, session, ..
            } => {
                let region = session.pending();
                debug!(layer_id = %layer_id, ?region, "Mask drag committed to tool state");
                self.masks.insert(layer_id, region);
            }
            Interaction::Capturing(state) => {
                // Pointer-up can race a capture; the lock stays held.
                self.interaction = Interaction::Capturing(state);
            }
            Interaction::Idle => debug!("Pointer up with no active drag, ignoring"),
        }
    }

    /// Abandon the active drag with no commit (window blur, Escape).
    pub fn cancel_drag(&mut self) {
        if self.is_dragging() {
            debug!("Drag cancelled");
            self.interaction = Interaction::Idle;
        }
    }

    /// A layer's live position: the pending drag position while that
    /// layer is being dragged, its committed position otherwise.
    pub fn layer_display_position(&self, id: &LayerId) -> Option<[f32; 2]> {
        if let Interaction::DraggingLayer(session) = &self.interaction {
            if session.layer_id() == id {
                return Some(session.pending_position());
            }
        }
        self.store.document().find_layer(id).and_then(|l| l.position())
    }

    /// The stored mask region for a layer, if one was ever placed.
    pub fn mask_region(&self, id: &LayerId) -> Option<MaskRegion> {
        self.masks.get(id).copied()
    }

    // -----------------------------------------------------------------
    // Capture / export
    // -----------------------------------------------------------------

    /// Save the current view state, neutralize it, and take the lock.
    fn begin_capture(&mut self, handle: Option<RenderHandle>) {
        let doc = self.store.document();
        let state = CaptureState {
            saved_zoom: doc.zoom(),
            saved_pan: doc.pan(),
            saved_selection: doc.selected_layer_id().cloned(),
            handle,
        };
        self.store.set_zoom(1.0);
        self.store.set_pan([0.0, 0.0]);
        self.store.select_layer(None);
        self.interaction = Interaction::Capturing(state);
        debug!("Capture started, view neutralized");
    }

    /// Restore the saved view state and release the lock.
    fn finish_capture(&mut self) {
        if let Interaction::Capturing(state) =
            std::mem::replace(&mut self.interaction, Interaction::Idle)
        {
            self.store.set_zoom(state.saved_zoom);
            self.store.set_pan(state.saved_pan);
            self.store.select_layer(state.saved_selection);
            debug!("Capture finished, view restored");
        }
    }

    /// Flatten the document synchronously at `scale`x supersampling.
    ///
    /// Zoom, pan, and selection are neutralized for the capture and
    /// restored on every exit path, success or failure.
    pub fn flatten_image(&mut self, scale: u32) -> Result<PixelBuffer, EditorError> {
        self.ensure_idle()?;
        self.begin_capture(None);

        let compositor = Compositor::new(self.store.document().canvas_size);
        let result = compositor.flatten(
            self.store.document().layers(),
            &self.sources,
            &self.fonts,
            &mut self.cache,
            scale,
        );

        self.finish_capture();
        result.map_err(EditorError::from)
    }

    /// Start a background export. The document is locked against edits
    /// until [`Editor::poll_export`] consumes the result or
    /// [`Editor::cancel_export`] abandons it.
    pub fn begin_export(&mut self, scale: u32) -> Result<(), EditorError> {
        self.ensure_idle()?;
        self.begin_capture(None);

        let compositor = Compositor::new(self.store.document().canvas_size);
        let handle = flatten_async(
            compositor,
            self.store.document().layers().to_vec(),
            Arc::clone(&self.sources),
            Arc::clone(&self.fonts),
            scale,
        );
        if let Interaction::Capturing(state) = &mut self.interaction {
            state.handle = Some(handle);
        }
        Ok(())
    }

    /// Poll a background export. `None` while rendering or when no export
    /// is in flight. On completion the view state is restored and the
    /// lock released, for errors as well as successes.
    pub fn poll_export(&mut self) -> Option<Result<PixelBuffer, EditorError>> {
        let Interaction::Capturing(state) = &self.interaction else {
            return None;
        };
        let handle = state.handle.as_ref()?;
        let result = handle.try_result()?;
        self.finish_capture();
        Some(result.map_err(EditorError::from))
    }

    /// Abandon an in-flight capture, restoring the view state. The
    /// worker's eventual result is discarded.
    pub fn cancel_export(&mut self) -> bool {
        if self.is_capturing() {
            self.finish_capture();
            true
        } else {
            false
        }
    }

    // -----------------------------------------------------------------
    // External AI edit
    // -----------------------------------------------------------------

    /// Send an image layer's pixels (scoped by its mask region, if any)
    /// to the external edit collaborator, and commit the returned bitmap
    /// as the layer's new source. One history commit on success.
    pub fn apply_external_edit(
        &mut self,
        id: &LayerId,
        service: &dyn EditService,
        instruction: &str,
        constraint: &str,
    ) -> Result<(), EditorError> {
        self.ensure_unlocked()?;
        let layer = self
            .store
            .document()
            .find_layer(id)
            .ok_or_else(|| EditorError::LayerNotFound(id.0.clone()))?;
        let LayerContent::Image(image) = &layer.content else {
            return Err(EditorError::NotAnImageLayer(id.0.clone()));
        };
        let src = self
            .sources
            .get(&image.src)
            .ok_or_else(|| EditorError::MissingSource(image.src.0.clone()))?;

        let (parent_w, parent_h) = display_size(image, src);
        let mask = self
            .masks
            .get(id)
            .map(|region| region.rasterize((parent_w, parent_h), src.width(), src.height()));

        debug!(layer_id = %id, has_mask = mask.is_some(), "Dispatching external edit");
        let edited = service.edit(EditRequest {
            target: src,
            mask: mask.as_ref(),
            reference: None,
            instruction,
            constraint,
        })?;

        let source_id = self.next_source_id();
        Arc::make_mut(&mut self.sources).insert(source_id.clone(), edited);
        let patch = LayerPatch {
            src: Some(source_id),
            ..LayerPatch::default()
        };
        self.store.update_layer(id, &patch);
        Ok(())
    }
}
