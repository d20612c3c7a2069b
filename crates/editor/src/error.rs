//! Editor error types.

use thiserror::Error;

/// Errors from the interactive editing layer.
#[derive(Debug, Error)]
pub enum EditorError {
    /// A capture is in flight; the engine state is locked against edits.
    #[error("Capture in progress, edit rejected")]
    CaptureInProgress,

    /// A drag session is already active.
    #[error("Drag already in progress")]
    DragInProgress,

    /// The referenced layer does not exist.
    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    /// The layer kind has no position to drag.
    #[error("Layer is not draggable: {0}")]
    NotDraggable(String),

    /// The operation requires an image layer.
    #[error("Layer is not an image layer: {0}")]
    NotAnImageLayer(String),

    /// An image layer references a pixel source that is not registered.
    #[error("Missing pixel source: {0}")]
    MissingSource(String),

    /// Flatten/export failure from the compositor.
    #[error("Compositor error: {0}")]
    Compositor(#[from] ph_compositor::CompositorError),

    /// The external AI edit collaborator failed.
    #[error("Edit service error: {0}")]
    EditService(#[from] ph_common::EditServiceError),

    /// Imported bytes did not form a valid pixel buffer.
    #[error("Pixel error: {0}")]
    Pixel(#[from] ph_common::PixelError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compositor_error_converts() {
        let err: EditorError = ph_compositor::CompositorError::MissingSource("s".into()).into();
        assert!(matches!(err, EditorError::Compositor(_)));
    }

    #[test]
    fn capture_lock_message() {
        assert!(EditorError::CaptureInProgress
            .to_string()
            .contains("Capture in progress"));
    }
}
