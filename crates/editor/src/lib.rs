//! `ph-editor` — Interactive editing layer for the Photon Studio editor engine.
//!
//! This crate wires the document engine to host input without owning any
//! GUI toolkit. It provides:
//!
//! - **`Editor`**: the orchestration facade — layer lifecycle, drag
//!   sessions, mask regions, export capture, and the external AI-edit
//!   hand-off. Interaction is a small state machine (`Idle`,
//!   `DraggingLayer`, `DraggingMask`, `Capturing`); an in-flight capture
//!   locks the document against every mutation.
//! - **`viewport`**: exact-inverse screen/canvas mapping under zoom and pan.
//! - **`LayerDragSession`**: pure begin/update/end drag math; intermediate
//!   pointer moves never commit history.
//! - **`MaskRegion` / `MaskDragSession`**: a resizable rectangle clamped
//!   inside its parent image layer, exported as the mask boundary for
//!   external edit requests.

pub mod drag;
pub mod editor;
pub mod mask_tool;
pub mod viewport;

mod error;

// Re-export primary API
pub use drag::LayerDragSession;
pub use editor::Editor;
pub use error::EditorError;
pub use mask_tool::{MaskDragSession, MaskHandle, MaskRegion, MIN_MASK_SIZE};
