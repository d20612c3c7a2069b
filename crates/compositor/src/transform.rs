//! Image layer placement: position, size, uniform scale, and rotation.
//!
//! Rasterization walks the destination bounding box and inverse-maps each
//! output pixel into the source, sampling bilinearly. Out-of-bounds source
//! positions contribute nothing (transparent), matching the contract the
//! preview surface applies.

use ph_common::{ImageLayer, PixelBuffer};
use tracing::debug;

use crate::blend::src_over;

/// Bilinear sample with edge clamp. Returns straight-alpha RGBA in 0..=255.
#[inline]
pub fn sample_bilinear(src: &PixelBuffer, x: f32, y: f32) -> [f32; 4] {
    let max_x = (src.width() - 1) as f32;
    let max_y = (src.height() - 1) as f32;
    let xc = x.clamp(0.0, max_x);
    let yc = y.clamp(0.0, max_y);

    let x0 = xc.floor() as u32;
    let y0 = yc.floor() as u32;
    let x1 = (x0 + 1).min(src.width() - 1);
    let y1 = (y0 + 1).min(src.height() - 1);
    let fx = xc - x0 as f32;
    let fy = yc - y0 as f32;

    let p00 = src.pixel(x0, y0);
    let p10 = src.pixel(x1, y0);
    let p01 = src.pixel(x0, y1);
    let p11 = src.pixel(x1, y1);

    let mut out = [0.0f32; 4];
    for c in 0..4 {
        let top = p00[c] as f32 + (p10[c] as f32 - p00[c] as f32) * fx;
        let bot = p01[c] as f32 + (p11[c] as f32 - p01[c] as f32) * fx;
        out[c] = top + (bot - top) * fy;
    }
    out
}

/// The display size of an image layer in canvas units: explicit width and
/// height when set, the source's natural size otherwise, times the
/// uniform scale factor.
pub fn display_size(image: &ImageLayer, src: &PixelBuffer) -> (f32, f32) {
    let w = image.width.unwrap_or(src.width() as f32) * image.scale;
    let h = image.height.unwrap_or(src.height() as f32) * image.scale;
    (w, h)
}

/// Draw a transformed image layer onto the accumulation buffer.
///
/// `scale` is the supersampling factor mapping canvas units to output
/// pixels.
pub fn draw_image(
    acc: &mut PixelBuffer,
    src: &PixelBuffer,
    image: &ImageLayer,
    opacity: f32,
    scale: f32,
) {
    let (w, h) = display_size(image, src);
    if w <= 0.0 || h <= 0.0 || !w.is_finite() || !h.is_finite() {
        debug!(layer_w = w, layer_h = h, "Degenerate image layer size, skipping");
        return;
    }

    let cx = image.position[0] + w * 0.5;
    let cy = image.position[1] + h * 0.5;
    let rad = image.rotation.to_radians();
    let (sin, cos) = rad.sin_cos();

    // Destination bounding box: rotated rect corners, supersampled and
    // clamped to the output.
    let half_w = w * 0.5;
    let half_h = h * 0.5;
    let ext_x = half_w * cos.abs() + half_h * sin.abs();
    let ext_y = half_w * sin.abs() + half_h * cos.abs();
    let min_x = (((cx - ext_x) * scale).floor().max(0.0)) as u32;
    let min_y = (((cy - ext_y) * scale).floor().max(0.0)) as u32;
    let max_x = (((cx + ext_x) * scale).ceil() as i64).clamp(0, acc.width() as i64) as u32;
    let max_y = (((cy + ext_y) * scale).ceil() as i64).clamp(0, acc.height() as i64) as u32;

    debug!(
        position = ?image.position,
        layer_w = w,
        layer_h = h,
        rotation = image.rotation,
        bbox = ?(min_x, min_y, max_x, max_y),
        "Drawing image layer"
    );

    let src_w = src.width() as f32;
    let src_h = src.height() as f32;

    for dy in min_y..max_y {
        for dx in min_x..max_x {
            // Output pixel center in canvas units.
            let px = (dx as f32 + 0.5) / scale;
            let py = (dy as f32 + 0.5) / scale;

            // Inverse-rotate into the layer's local space.
            let rx = px - cx;
            let ry = py - cy;
            let lx = rx * cos + ry * sin + half_w;
            let ly = -rx * sin + ry * cos + half_h;
            if lx < 0.0 || lx >= w || ly < 0.0 || ly >= h {
                continue;
            }

            let u = lx / w * src_w - 0.5;
            let v = ly / h * src_h - 0.5;
            let s = sample_bilinear(src, u, v);
            let src_px = [
                (s[0] + 0.5) as u8,
                (s[1] + 0.5) as u8,
                (s[2] + 0.5) as u8,
                (s[3] + 0.5) as u8,
            ];
            let blended = src_over(acc.pixel(dx, dy), src_px, opacity);
            acc.set_pixel(dx, dy, blended);
        }
    }
}
