//! `ph-app-state` — Document state management for the Photon Studio editor engine.
//!
//! This crate provides:
//!
//! - **`Document`**: Central state container holding the ordered layer stack,
//!   selection, canvas size, and view transform.
//! - **`DocumentStore`**: The committing write path — every undoable mutation
//!   applies to the document and records exactly one history snapshot.
//! - **`DocumentHistory`**: Flat linear snapshot list with a cursor; commits
//!   after an undo discard the redo branch.
//! - **`DocumentSnapshot`**: Serializable full-state copy used for undo/redo.
//! - **`LayerPatch`**: Partial layer update merged with exhaustive per-kind
//!   matching.
//!
//! # Architecture
//!
//! ```text
//! DocumentStore
//! ├── Document                      (layers, selection, canvas, zoom/pan)
//! └── DocumentHistory
//!     ├── entries: Vec<HistoryEntry>  (snapshots, index 0 = pristine state)
//!     └── current: usize              (cursor, always a valid index)
//! ```

pub mod document;
pub mod history;
pub mod snapshot;
pub mod store;

// Re-export primary types at crate root for convenience.
pub use document::{Document, LayerPatch, MAX_ZOOM, MIN_ZOOM};
pub use history::{DocumentHistory, HistoryEntry, DEFAULT_MAX_ENTRIES};
pub use snapshot::DocumentSnapshot;
pub use store::DocumentStore;
