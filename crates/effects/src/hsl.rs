//! HSL compiler: hue rotation, saturation scale, then lightness slope.

use ph_common::HslParams;

use crate::matrix::ColorMatrix;

/// Compose the HSL pipeline into a single color matrix.
///
/// Order is fixed: hue-rotate first, then the saturation multiplier, then
/// the lightness slope (`v' = v * lightness`) on the resulting channels.
pub fn compile_hsl(params: &HslParams) -> ColorMatrix {
    let p = params.sanitized();
    ColorMatrix::hue_rotate(p.hue)
        .then(&ColorMatrix::saturate(p.saturation))
        .then(&ColorMatrix::scale_rgb(p.lightness))
}
