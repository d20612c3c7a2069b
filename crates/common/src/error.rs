//! Shared error types (thiserror-based).

use thiserror::Error;

/// Errors from raw pixel buffer construction and access.
#[derive(Error, Debug)]
pub enum PixelError {
    /// Width or height is zero.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The supplied byte buffer does not match `width * height * 4`.
    #[error("Buffer size mismatch: need {needed} bytes, got {got}")]
    BufferSizeMismatch { needed: usize, got: usize },
}

/// Errors reported by the external AI edit/generation collaborator.
///
/// The engine treats the collaborator as opaque: any failure is surfaced
/// to the caller as a recoverable error, never a crash.
#[derive(Error, Debug)]
pub enum EditServiceError {
    #[error("Edit service unavailable: {0}")]
    Unavailable(String),

    #[error("Edit request rejected: {0}")]
    Rejected(String),

    #[error("Edit service returned unusable pixels: {0}")]
    InvalidOutput(#[from] PixelError),
}
