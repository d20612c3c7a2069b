//! Curves compiler: monotone cubic interpolation of sparse control points.
//!
//! Control points are interpolated with the Fritsch–Carlson monotone cubic
//! scheme, so the compiled table never overshoots and preserves the
//! monotonicity of the input points. Two points at (0,0) and (255,255)
//! produce the exact identity table.

use ph_common::CurvesParams;

use crate::compiled::ChannelLut;

/// Build the 256-entry transfer table for a curves adjustment.
///
/// Points are sanitized, sorted by input value, and deduplicated. Fewer
/// than two usable points compile to the identity table (logged). Inputs
/// outside the first/last control point clamp to the endpoint outputs.
pub fn compile_curves(params: &CurvesParams) -> ChannelLut {
    let p = params.sanitized();
    let mut pts = p.points.clone();
    pts.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap_or(std::cmp::Ordering::Equal));
    pts.dedup_by(|a, b| (a[0] - b[0]).abs() < 1e-6);

    if pts.len() < 2 {
        tracing::warn!(
            points = pts.len(),
            "Curves with fewer than two control points, compiling identity"
        );
        return ChannelLut::identity();
    }

    let tangents = monotone_tangents(&pts);

    let n = pts.len();
    let mut table = [0.0f32; 256];
    for (v, slot) in table.iter_mut().enumerate() {
        let x = v as f32;
        let y = if x <= pts[0][0] {
            pts[0][1]
        } else if x >= pts[n - 1][0] {
            pts[n - 1][1]
        } else {
            // Find the segment containing x and evaluate the Hermite cubic.
            let seg = pts.windows(2).position(|w| x <= w[1][0]).unwrap_or(n - 2);
            hermite(&pts[seg], &pts[seg + 1], tangents[seg], tangents[seg + 1], x)
        };
        *slot = (y / 255.0).clamp(0.0, 1.0);
    }

    ChannelLut::from_table(&table, p.channel)
}

/// Fritsch–Carlson tangents: secant averages limited so each segment stays
/// monotone.
fn monotone_tangents(pts: &[[f32; 2]]) -> Vec<f32> {
    let n = pts.len();
    let mut secants = Vec::with_capacity(n - 1);
    for w in pts.windows(2) {
        let dx = w[1][0] - w[0][0];
        secants.push((w[1][1] - w[0][1]) / dx);
    }

    let mut m = vec![0.0f32; n];
    m[0] = secants[0];
    m[n - 1] = secants[n - 2];
    for i in 1..n - 1 {
        if secants[i - 1] * secants[i] <= 0.0 {
            m[i] = 0.0;
        } else {
            m[i] = 0.5 * (secants[i - 1] + secants[i]);
        }
    }

    for i in 0..n - 1 {
        if secants[i] == 0.0 {
            m[i] = 0.0;
            m[i + 1] = 0.0;
            continue;
        }
        let a = m[i] / secants[i];
        let b = m[i + 1] / secants[i];
        let h = (a * a + b * b).sqrt();
        if h > 3.0 {
            let t = 3.0 / h;
            m[i] = t * a * secants[i];
            m[i + 1] = t * b * secants[i];
        }
    }

    m
}

/// Cubic Hermite evaluation on one segment.
fn hermite(p0: &[f32; 2], p1: &[f32; 2], m0: f32, m1: f32, x: f32) -> f32 {
    let dx = p1[0] - p0[0];
    let t = (x - p0[0]) / dx;
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    h00 * p0[1] + h10 * dx * m0 + h01 * p1[1] + h11 * dx * m1
}
