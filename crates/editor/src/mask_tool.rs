//! Mask region tool: a resizable rectangle clipped to its parent layer.
//!
//! The region lives in the parent image layer's local coordinate space,
//! `[0, width] x [0, height]` in canvas units. Every edit normalizes,
//! clamps fully inside the parent, and enforces a minimum size; a resize
//! that would invert the rectangle clamps at the minimum instead of
//! flipping sign. The resulting rectangle scopes external AI edit
//! requests; the tool itself never touches pixels beyond rasterizing the
//! mask bitmap handed to the collaborator.

use ph_common::PixelBuffer;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Minimum mask edge length in canvas units.
pub const MIN_MASK_SIZE: f32 = 20.0;

/// Which part of the region a drag grabbed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaskHandle {
    /// Drag the body: x and y translate together.
    Body,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Rectangular mask region in the parent layer's local space.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaskRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl MaskRegion {
    /// Build a region, normalizing inverted coordinates.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
        .normalized()
    }

    /// Default region for a parent: centered, half the parent's extent.
    pub fn centered_in(parent_w: f32, parent_h: f32) -> Self {
        let width = (parent_w * 0.5).max(MIN_MASK_SIZE);
        let height = (parent_h * 0.5).max(MIN_MASK_SIZE);
        Self {
            x: (parent_w - width) * 0.5,
            y: (parent_h - height) * 0.5,
            width,
            height,
        }
        .clamped_to(parent_w, parent_h)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, point: [f32; 2]) -> bool {
        point[0] >= self.x
            && point[0] < self.right()
            && point[1] >= self.y
            && point[1] < self.bottom()
    }

    /// Swap inverted coordinates so width/height are non-negative.
    pub fn normalized(mut self) -> Self {
        if self.width < 0.0 {
            self.x += self.width;
            self.width = -self.width;
        }
        if self.height < 0.0 {
            self.y += self.height;
            self.height = -self.height;
        }
        self
    }

    /// Force the region fully inside `[0, parent_w] x [0, parent_h]` and
    /// at least the minimum size (capped at the parent's own extent).
    pub fn clamped_to(mut self, parent_w: f32, parent_h: f32) -> Self {
        self = self.normalized();
        let min_w = MIN_MASK_SIZE.min(parent_w);
        let min_h = MIN_MASK_SIZE.min(parent_h);
        self.width = self.width.clamp(min_w, parent_w);
        self.height = self.height.clamp(min_h, parent_h);
        self.x = self.x.clamp(0.0, parent_w - self.width);
        self.y = self.y.clamp(0.0, parent_h - self.height);
        self
    }

    /// Rasterize the region into a mask bitmap at the parent source's
    /// pixel resolution: white inside, black outside. `layer_size` is the
    /// parent's local extent the region coordinates are expressed in.
    pub fn rasterize(&self, layer_size: (f32, f32), out_w: u32, out_h: u32) -> PixelBuffer {
        let sx = out_w as f32 / layer_size.0.max(f32::EPSILON);
        let sy = out_h as f32 / layer_size.1.max(f32::EPSILON);
        let x0 = (self.x * sx).round().max(0.0) as u32;
        let y0 = (self.y * sy).round().max(0.0) as u32;
        let x1 = ((self.right() * sx).round() as i64).clamp(0, out_w as i64) as u32;
        let y1 = ((self.bottom() * sy).round() as i64).clamp(0, out_h as i64) as u32;

        let mut mask = PixelBuffer::new(out_w, out_h);
        mask.fill([0, 0, 0, 255]);
        for y in y0..y1 {
            for x in x0..x1 {
                mask.set_pixel(x, y, [255, 255, 255, 255]);
            }
        }
        mask
    }
}

/// Live (uncommitted) state of one mask drag.
#[derive(Clone, Debug)]
pub struct MaskDragSession {
    handle: MaskHandle,
    origin_pointer: [f32; 2],
    origin_region: MaskRegion,
    pending: MaskRegion,
    parent: (f32, f32),
}

impl MaskDragSession {
    /// Record the press. The origin region is normalized and clamped to
    /// the parent up front, so resize anchors are always consistent.
    pub fn begin(
        handle: MaskHandle,
        pointer: [f32; 2],
        region: MaskRegion,
        parent_w: f32,
        parent_h: f32,
    ) -> Self {
        let origin_region = region.clamped_to(parent_w, parent_h);
        Self {
            handle,
            origin_pointer: pointer,
            origin_region,
            pending: origin_region,
            parent: (parent_w, parent_h),
        }
    }

    /// Recompute the pending region for a pointer move in layer-local
    /// coordinates.
    pub fn update(&mut self, pointer: [f32; 2]) {
        let (parent_w, parent_h) = self.parent;
        self.pending = match self.handle {
            MaskHandle::Body => MaskRegion {
                x: self.origin_region.x + (pointer[0] - self.origin_pointer[0]),
                y: self.origin_region.y + (pointer[1] - self.origin_pointer[1]),
                ..self.origin_region
            }
            .clamped_to(parent_w, parent_h),
            handle => resize(&self.origin_region, handle, pointer, parent_w, parent_h),
        };
        debug!(pending = ?self.pending, "Mask drag update");
    }

    pub fn pending(&self) -> MaskRegion {
        self.pending
    }

    pub fn handle(&self) -> MaskHandle {
        self.handle
    }
}

/// Resize from a corner handle, keeping the opposite corner fixed. The
/// pointer is clamped so the rectangle can neither invert nor leave the
/// parent.
fn resize(
    origin: &MaskRegion,
    handle: MaskHandle,
    pointer: [f32; 2],
    parent_w: f32,
    parent_h: f32,
) -> MaskRegion {
    let min_w = MIN_MASK_SIZE.min(parent_w);
    let min_h = MIN_MASK_SIZE.min(parent_h);
    let right = origin.right();
    let bottom = origin.bottom();

    let region = match handle {
        MaskHandle::TopLeft => {
            let nx = pointer[0].clamp(0.0, (right - min_w).max(0.0));
            let ny = pointer[1].clamp(0.0, (bottom - min_h).max(0.0));
            MaskRegion {
                x: nx,
                y: ny,
                width: right - nx,
                height: bottom - ny,
            }
        }
        MaskHandle::TopRight => {
            let nr = pointer[0].clamp((origin.x + min_w).min(parent_w), parent_w);
            let ny = pointer[1].clamp(0.0, (bottom - min_h).max(0.0));
            MaskRegion {
                x: origin.x,
                y: ny,
                width: nr - origin.x,
                height: bottom - ny,
            }
        }
        MaskHandle::BottomLeft => {
            let nx = pointer[0].clamp(0.0, (right - min_w).max(0.0));
            let nb = pointer[1].clamp((origin.y + min_h).min(parent_h), parent_h);
            MaskRegion {
                x: nx,
                y: origin.y,
                width: right - nx,
                height: nb - origin.y,
            }
        }
        MaskHandle::BottomRight => {
            let nr = pointer[0].clamp((origin.x + min_w).min(parent_w), parent_w);
            let nb = pointer[1].clamp((origin.y + min_h).min(parent_h), parent_h);
            MaskRegion {
                x: origin.x,
                y: origin.y,
                width: nr - origin.x,
                height: nb - origin.y,
            }
        }
        MaskHandle::Body => unreachable!("body drags do not resize"),
    };

    region.clamped_to(parent_w, parent_h)
}
