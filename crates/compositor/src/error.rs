//! Compositor error types.

use thiserror::Error;

/// Errors that can occur while flattening the layer stack.
#[derive(Debug, Error)]
pub enum CompositorError {
    /// An image layer references a pixel source missing from the source map.
    #[error("Missing pixel source: {0}")]
    MissingSource(String),

    /// A font file could not be parsed.
    #[error("Failed to load font '{family}': {reason}")]
    FontLoad { family: String, reason: String },

    /// The supersampling factor must be at least 1.
    #[error("Invalid supersampling factor: {0}")]
    InvalidScale(u32),

    /// The requested output raster exceeds the allocation ceiling.
    #[error("Output too large: {width}x{height} at {scale}x supersampling")]
    CanvasTooLarge { width: u32, height: u32, scale: u32 },

    /// The background render worker disappeared without reporting a result.
    #[error("Render worker disconnected")]
    WorkerGone,
}
