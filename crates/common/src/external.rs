//! Contracts for external collaborators.
//!
//! The engine is a pure in-memory layer graph plus a renderer; AI edit and
//! generation services are opaque functions behind [`EditService`]. The
//! editor only ever consumes their bitmap result.

use crate::error::EditServiceError;
use crate::pixels::PixelBuffer;

/// One edit/generation request handed to the external collaborator.
pub struct EditRequest<'a> {
    /// Pixels the edit applies to.
    pub target: &'a PixelBuffer,
    /// Optional mask scoping the edit (white = editable region).
    pub mask: Option<&'a PixelBuffer>,
    /// Optional style/content reference image.
    pub reference: Option<&'a PixelBuffer>,
    /// Free-form edit instruction.
    pub instruction: &'a str,
    /// Brand/format constraints appended to every request.
    pub constraint: &'a str,
}

/// External AI edit/generation collaborator.
///
/// Implementations may call out to any provider; the engine treats the
/// call as synchronous from its point of view and maps every failure to
/// [`EditServiceError`].
pub trait EditService {
    fn edit(&self, request: EditRequest<'_>) -> Result<PixelBuffer, EditServiceError>;
}
