//! Application of compiled filters to an accumulation buffer.
//!
//! Adjustment layers never rasterize pixels of their own; their compiled
//! filter transforms whatever has accumulated beneath them in the stack.
//! Layer opacity mixes the filtered result with the unfiltered original.

use ph_common::PixelBuffer;
use ph_effects::CompiledFilter;
use tracing::debug;

use crate::blend::lerp_pixel;
use crate::blur::gaussian_blur;

/// Apply a compiled filter to the buffer in place.
///
/// `scale` is the supersampling factor; spatial filters (blur) scale their
/// radius by it so export output matches the preview at any quality.
pub fn apply_filter(buf: &mut PixelBuffer, filter: &CompiledFilter, opacity: f32, scale: f32) {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return;
    }

    match filter {
        CompiledFilter::Matrix(matrix) => {
            debug!(opacity, "Applying color matrix");
            for px in buf.data_mut().chunks_exact_mut(4) {
                // Fully transparent pixels carry no color to transform.
                if px[3] == 0 {
                    continue;
                }
                let rgb = [
                    px[0] as f32 / 255.0,
                    px[1] as f32 / 255.0,
                    px[2] as f32 / 255.0,
                ];
                let out = matrix.apply(rgb);
                for c in 0..3 {
                    let filtered = (out[c].clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
                    px[c] = mix_channel(px[c], filtered, opacity);
                }
            }
        }
        CompiledFilter::Lut(lut) => {
            debug!(opacity, "Applying transfer table");
            for px in buf.data_mut().chunks_exact_mut(4) {
                if px[3] == 0 {
                    continue;
                }
                let out = lut.apply([px[0], px[1], px[2]]);
                for c in 0..3 {
                    let filtered = (out[c].clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
                    px[c] = mix_channel(px[c], filtered, opacity);
                }
            }
        }
        CompiledFilter::Blur { radius } => {
            let scaled = radius * scale;
            debug!(radius = scaled, opacity, "Applying blur");
            if opacity >= 1.0 {
                gaussian_blur(buf, scaled);
            } else {
                let original = buf.clone();
                gaussian_blur(buf, scaled);
                for (i, px) in buf.data_mut().chunks_exact_mut(4).enumerate() {
                    let x = (i as u32) % original.width();
                    let y = (i as u32) / original.width();
                    let mixed = lerp_pixel(
                        original.pixel(x, y),
                        [px[0], px[1], px[2], px[3]],
                        opacity,
                    );
                    px.copy_from_slice(&mixed);
                }
            }
        }
    }
}

#[inline]
fn mix_channel(original: u8, filtered: u8, opacity: f32) -> u8 {
    if opacity >= 1.0 {
        filtered
    } else {
        (original as f32 + (filtered as f32 - original as f32) * opacity + 0.5) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ph_common::Adjustment;
    use ph_effects::compile;

    fn solid(rgba: [u8; 4]) -> PixelBuffer {
        let mut buf = PixelBuffer::new(2, 2);
        buf.fill(rgba);
        buf
    }

    #[test]
    fn full_grayscale_equalizes_channels() {
        let mut buf = solid([200, 50, 100, 255]);
        let filter = compile(&Adjustment::Grayscale(100.0));
        apply_filter(&mut buf, &filter, 1.0, 1.0);
        let px = buf.pixel(0, 0);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn zero_opacity_leaves_buffer_untouched() {
        let mut buf = solid([200, 50, 100, 255]);
        let before = buf.clone();
        let filter = compile(&Adjustment::Grayscale(100.0));
        apply_filter(&mut buf, &filter, 0.0, 1.0);
        assert_eq!(buf, before);
    }

    #[test]
    fn half_opacity_mixes_with_original() {
        let mut full = solid([200, 50, 100, 255]);
        let mut half = solid([200, 50, 100, 255]);
        let filter = compile(&Adjustment::Brightness(0.0)); // to black
        apply_filter(&mut full, &filter, 1.0, 1.0);
        apply_filter(&mut half, &filter, 0.5, 1.0);

        assert_eq!(full.pixel(0, 0)[0], 0);
        let mixed = half.pixel(0, 0)[0];
        assert!(mixed >= 99 && mixed <= 101, "got {mixed}");
    }

    #[test]
    fn transparent_pixels_are_skipped() {
        let mut buf = PixelBuffer::new(2, 1);
        buf.set_pixel(0, 0, [100, 100, 100, 255]);
        // (1,0) stays fully transparent.
        let filter = compile(&Adjustment::Brightness(200.0));
        apply_filter(&mut buf, &filter, 1.0, 1.0);
        assert_eq!(buf.pixel(1, 0), [0, 0, 0, 0]);
        assert_eq!(buf.pixel(0, 0)[0], 200);
    }

    #[test]
    fn levels_lut_applies_through_pass() {
        let mut buf = solid([50, 128, 200, 255]);
        let filter = compile(&Adjustment::Levels(ph_common::LevelsParams {
            input_shadow: 50.0,
            input_highlight: 200.0,
            ..ph_common::LevelsParams::default()
        }));
        apply_filter(&mut buf, &filter, 1.0, 1.0);
        let px = buf.pixel(0, 0);
        assert_eq!(px[0], 0); // at the shadow input
        assert_eq!(px[2], 255); // at the highlight input
    }

    #[test]
    fn blur_filter_scales_radius_with_supersampling() {
        let mut a = PixelBuffer::new(9, 9);
        a.set_pixel(4, 4, [255, 255, 255, 255]);
        let mut b = a.clone();

        let filter = compile(&Adjustment::Blur(1.0));
        apply_filter(&mut a, &filter, 1.0, 1.0);
        apply_filter(&mut b, &filter, 1.0, 3.0);

        // The 3x-supersampled pass spreads energy further from the center.
        assert!(b.pixel(1, 4)[3] >= a.pixel(1, 4)[3]);
        assert!(a.pixel(4, 4)[3] > b.pixel(4, 4)[3]);
    }
}
