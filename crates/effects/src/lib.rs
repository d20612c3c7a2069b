//! `ph-effects` — Adjustment-layer filter compiler for the Photon Studio editor engine.
//!
//! This crate turns the structured parameters of an adjustment layer into
//! render-ready transfer functions consumable by the compositor:
//!
//! - **Color matrices** for the elementary adjustments: brightness,
//!   contrast, saturation, hue, sepia, grayscale, and the combined HSL
//!   pipeline (hue-rotate, then saturation scale, then lightness slope)
//! - **Transfer tables** (256-entry per-channel LUTs) for levels and
//!   curves; curves use monotone cubic (Fritsch–Carlson) interpolation
//! - **Blur primitives** carrying a sanitized radius for the compositor's
//!   spatial pass
//!
//! Compilation is total: parameters are clamped into their valid ranges
//! first, so `compile` never fails and NaN/Infinity never reaches a table.
//! [`FilterCache`] memoizes compiled filters per layer id, recompiling only
//! when that layer's parameter hash changes.

pub mod cache;
pub mod compiled;
pub mod compiler;
pub mod curves;
pub mod hsl;
pub mod levels;
pub mod matrix;

// Re-export primary types at crate root.
pub use cache::FilterCache;
pub use compiled::{ChannelLut, CompiledFilter};
pub use compiler::compile;
pub use curves::compile_curves;
pub use hsl::compile_hsl;
pub use levels::compile_levels;
pub use matrix::ColorMatrix;
