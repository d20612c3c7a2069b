//! Separable gaussian blur (two-pass, alpha-weighted).

use ph_common::PixelBuffer;
use tracing::debug;

/// Apply a gaussian blur in place. `radius` is in output pixels; the
/// standard deviation is `radius / 2`, kernel support is three sigma.
///
/// Color accumulation is alpha-weighted (premultiplied internally) so
/// transparent neighborhoods do not darken edges.
pub fn gaussian_blur(buf: &mut PixelBuffer, radius: f32) {
    if radius <= 0.0 {
        return;
    }

    let sigma = (radius * 0.5).max(0.1);
    let half = (sigma * 3.0).ceil() as i32;
    let mut weights = Vec::with_capacity((2 * half + 1) as usize);
    let denom = 2.0 * sigma * sigma;
    for i in -half..=half {
        weights.push((-(i * i) as f32 / denom).exp());
    }
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }

    debug!(radius, sigma, taps = weights.len(), "Gaussian blur");

    let horizontal = blur_pass(buf, &weights, half, true);
    let vertical = blur_pass(&horizontal, &weights, half, false);
    *buf = vertical;
}

fn blur_pass(src: &PixelBuffer, weights: &[f32], half: i32, horizontal: bool) -> PixelBuffer {
    let width = src.width();
    let height = src.height();
    let mut out = PixelBuffer::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let mut acc_a = 0.0f32;
            let mut acc = [0.0f32; 3];
            for (k, &w) in weights.iter().enumerate() {
                let offset = k as i32 - half;
                // Edge clamp.
                let (sx, sy) = if horizontal {
                    (
                        (x as i32 + offset).clamp(0, width as i32 - 1) as u32,
                        y,
                    )
                } else {
                    (
                        x,
                        (y as i32 + offset).clamp(0, height as i32 - 1) as u32,
                    )
                };
                let px = src.pixel(sx, sy);
                let a = px[3] as f32 / 255.0;
                acc_a += w * a;
                for c in 0..3 {
                    acc[c] += w * a * px[c] as f32;
                }
            }

            let rgba = if acc_a > 0.0 {
                [
                    (acc[0] / acc_a + 0.5).clamp(0.0, 255.0) as u8,
                    (acc[1] / acc_a + 0.5).clamp(0.0, 255.0) as u8,
                    (acc[2] / acc_a + 0.5).clamp(0.0, 255.0) as u8,
                    (acc_a * 255.0 + 0.5).clamp(0.0, 255.0) as u8,
                ]
            } else {
                [0, 0, 0, 0]
            };
            out.set_pixel(x, y, rgba);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_radius_is_untouched() {
        let mut buf = PixelBuffer::new(3, 3);
        buf.set_pixel(1, 1, [255, 255, 255, 255]);
        let before = buf.clone();
        gaussian_blur(&mut buf, 0.0);
        assert_eq!(buf, before);
    }

    #[test]
    fn blur_spreads_a_point() {
        let mut buf = PixelBuffer::new(5, 5);
        buf.set_pixel(2, 2, [255, 255, 255, 255]);
        gaussian_blur(&mut buf, 2.0);

        // Center keeps the most energy, neighbors picked some up.
        assert!(buf.pixel(2, 2)[3] > 0);
        assert!(buf.pixel(1, 2)[3] > 0);
        assert!(buf.pixel(2, 1)[3] > 0);
        assert!(buf.pixel(2, 2)[3] > buf.pixel(0, 0)[3]);
    }

    #[test]
    fn blur_preserves_uniform_regions() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.fill([90, 120, 150, 255]);
        gaussian_blur(&mut buf, 3.0);
        for y in 0..4 {
            for x in 0..4 {
                let px = buf.pixel(x, y);
                assert!((px[0] as i32 - 90).abs() <= 1);
                assert!((px[1] as i32 - 120).abs() <= 1);
                assert!((px[2] as i32 - 150).abs() <= 1);
                assert_eq!(px[3], 255);
            }
        }
    }

    #[test]
    fn blurred_color_is_not_darkened_by_transparent_neighbors() {
        // A red pixel surrounded by transparency keeps its hue.
        let mut buf = PixelBuffer::new(5, 5);
        buf.set_pixel(2, 2, [255, 0, 0, 255]);
        gaussian_blur(&mut buf, 1.0);
        let px = buf.pixel(2, 2);
        assert_eq!(px[0], 255);
        assert_eq!(px[1], 0);
    }
}
