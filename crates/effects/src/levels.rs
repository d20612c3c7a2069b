//! Levels compiler: input window, midtone gamma, output window.

use ph_common::LevelsParams;

use crate::compiled::ChannelLut;

/// Build the 256-entry transfer table for a levels adjustment.
///
/// Per entry: clamp the input into `[input_shadow, input_highlight]`,
/// normalize to 0..1, shape with `v^(1/midtone)`, rescale into
/// `[output_shadow, output_highlight]`, and normalize back to 0..1.
/// Parameters are sanitized first, so the input window is never
/// degenerate and gamma is always positive.
pub fn compile_levels(params: &LevelsParams) -> ChannelLut {
    let p = params.sanitized();
    let in_range = p.input_highlight - p.input_shadow;
    let out_lo = p.output_shadow / 255.0;
    let out_hi = p.output_highlight / 255.0;
    let gamma = 1.0 / p.midtone;

    let mut table = [0.0f32; 256];
    for (v, slot) in table.iter_mut().enumerate() {
        let vf = (v as f32).clamp(p.input_shadow, p.input_highlight);
        let norm = (vf - p.input_shadow) / in_range;
        let shaped = norm.powf(gamma);
        *slot = (out_lo + shaped * (out_hi - out_lo)).clamp(0.0, 1.0);
    }

    ChannelLut::from_table(&table, p.channel)
}
