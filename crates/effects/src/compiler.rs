//! Adjustment-to-filter compilation.
//!
//! Every [`Adjustment`] variant compiles to exactly one [`CompiledFilter`].
//! Parameters are sanitized before compilation, so out-of-range or
//! non-finite values can never corrupt a matrix or transfer table.

use ph_common::Adjustment;

use crate::compiled::CompiledFilter;
use crate::curves::compile_curves;
use crate::hsl::compile_hsl;
use crate::levels::compile_levels;
use crate::matrix::ColorMatrix;

/// Compile one adjustment into a render-ready filter descriptor.
pub fn compile(adjustment: &Adjustment) -> CompiledFilter {
    match adjustment.sanitized() {
        Adjustment::Brightness(percent) => {
            CompiledFilter::Matrix(ColorMatrix::scale_rgb(percent / 100.0))
        }
        Adjustment::Contrast(percent) => {
            CompiledFilter::Matrix(ColorMatrix::contrast(percent / 100.0))
        }
        Adjustment::Saturation(percent) => {
            CompiledFilter::Matrix(ColorMatrix::saturate(percent / 100.0))
        }
        Adjustment::Hue(degrees) => CompiledFilter::Matrix(ColorMatrix::hue_rotate(degrees)),
        Adjustment::Blur(radius) => CompiledFilter::Blur { radius },
        Adjustment::Sepia(percent) => CompiledFilter::Matrix(ColorMatrix::sepia(percent / 100.0)),
        Adjustment::Grayscale(percent) => {
            CompiledFilter::Matrix(ColorMatrix::grayscale(percent / 100.0))
        }
        Adjustment::Levels(params) => CompiledFilter::Lut(compile_levels(&params)),
        Adjustment::Curves(params) => CompiledFilter::Lut(compile_curves(&params)),
        Adjustment::Hsl(params) => CompiledFilter::Matrix(compile_hsl(&params)),
    }
}
