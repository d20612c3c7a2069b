//! `ph-common` — Shared types, traits, and errors for the Photon Studio editor engine.
//!
//! This crate is the foundation that all other engine crates depend on.
//! It defines the core abstractions:
//!
//! - **Types**: `LayerId`, `SourceId`, `CanvasSize` (newtypes for safety)
//! - **Layers**: `Layer`, `LayerContent`, `ImageLayer`, `TextLayer`, `AdjustmentLayer`
//! - **Adjustments**: `Adjustment` and its typed payloads (`LevelsParams`,
//!   `CurvesParams`, `HslParams`)
//! - **Pixels**: `PixelBuffer` (owned RGBA8 raster)
//! - **External contracts**: `EditService` (AI edit collaborator)
//! - **Errors**: `PixelError`, `EditServiceError` (thiserror-based)

pub mod adjustment;
pub mod error;
pub mod external;
pub mod layer;
pub mod pixels;
pub mod types;

// Re-export commonly used items at crate root
pub use adjustment::{
    sanitize, sanitize_angle, AdjustChannel, Adjustment, CurvesParams, HslParams, LevelsParams,
};
pub use error::{EditServiceError, PixelError};
pub use external::{EditRequest, EditService};
pub use layer::{AdjustmentLayer, ImageLayer, Layer, LayerContent, TextLayer};
pub use pixels::PixelBuffer;
pub use types::{CanvasSize, LayerId, SourceId};
