//! Adjustment-layer parameter payloads.
//!
//! Every adjustment kind is a variant of [`Adjustment`] carrying its own
//! typed payload, so adding a kind is a compile-time-checked change and
//! compilation code matches exhaustively. Scalar units follow the editor's
//! slider conventions: percentages where 100 is neutral, degrees for hue,
//! pixels for blur.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Valid range for the percentage-style scalars (brightness, contrast,
/// saturation). 100 is neutral.
pub const PERCENT_RANGE: (f32, f32) = (0.0, 200.0);
/// Valid range for the amount-style scalars (sepia, grayscale). 0 is neutral.
pub const AMOUNT_RANGE: (f32, f32) = (0.0, 100.0);
/// Valid blur radius range in pixels.
pub const BLUR_RANGE: (f32, f32) = (0.0, 20.0);
/// Valid range for level endpoints (8-bit input/output values).
pub const LEVEL_RANGE: (f32, f32) = (0.0, 255.0);
/// Valid midtone (gamma) range for levels.
pub const MIDTONE_RANGE: (f32, f32) = (0.01, 9.99);
/// Upper cap for HSL saturation/lightness slopes.
pub const HSL_SLOPE_MAX: f32 = 10.0;

/// Clamp a value into `[min, max]`, substituting `neutral` for
/// non-finite input so NaN/Infinity can never reach a transfer table.
#[inline]
pub fn sanitize(value: f32, min: f32, max: f32, neutral: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        neutral
    }
}

/// Wrap an angle into `[0, 360)` degrees. Non-finite input becomes 0.
#[inline]
pub fn sanitize_angle(value: f32) -> f32 {
    if value.is_finite() {
        value.rem_euclid(360.0)
    } else {
        0.0
    }
}

/// Which channels a levels or curves table applies to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdjustChannel {
    #[default]
    Rgb,
    Red,
    Green,
    Blue,
}

impl AdjustChannel {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Rgb => "RGB",
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Blue => "Blue",
        }
    }
}

/// Levels adjustment parameters (input window, gamma, output window).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelsParams {
    pub input_shadow: f32,
    pub input_highlight: f32,
    /// Midtone gamma. 1.0 is neutral.
    pub midtone: f32,
    pub output_shadow: f32,
    pub output_highlight: f32,
    pub channel: AdjustChannel,
}

impl Default for LevelsParams {
    fn default() -> Self {
        Self {
            input_shadow: 0.0,
            input_highlight: 255.0,
            midtone: 1.0,
            output_shadow: 0.0,
            output_highlight: 255.0,
            channel: AdjustChannel::Rgb,
        }
    }
}

impl LevelsParams {
    /// Clamp all fields into their valid ranges and keep the input window
    /// non-degenerate (`input_shadow < input_highlight`).
    pub fn sanitized(&self) -> Self {
        let input_shadow = sanitize(self.input_shadow, LEVEL_RANGE.0, LEVEL_RANGE.1, 0.0);
        let mut input_highlight =
            sanitize(self.input_highlight, LEVEL_RANGE.0, LEVEL_RANGE.1, 255.0);
        if input_highlight <= input_shadow {
            input_highlight = (input_shadow + 1.0).min(LEVEL_RANGE.1);
        }
        Self {
            input_shadow,
            input_highlight,
            midtone: sanitize(self.midtone, MIDTONE_RANGE.0, MIDTONE_RANGE.1, 1.0),
            output_shadow: sanitize(self.output_shadow, LEVEL_RANGE.0, LEVEL_RANGE.1, 0.0),
            output_highlight: sanitize(self.output_highlight, LEVEL_RANGE.0, LEVEL_RANGE.1, 255.0),
            channel: self.channel,
        }
    }
}

/// Curves adjustment parameters: sparse control points over the 0..255
/// domain, interpolated into a full transfer table at compile time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CurvesParams {
    /// Control points as `[input, output]`, both in 0..=255.
    pub points: Vec<[f32; 2]>,
    pub channel: AdjustChannel,
}

impl CurvesParams {
    /// Identity curve: straight line from (0,0) to (255,255).
    pub fn identity(channel: AdjustChannel) -> Self {
        Self {
            points: vec![[0.0, 0.0], [255.0, 255.0]],
            channel,
        }
    }

    /// Clamp every control point into the 0..=255 domain, dropping
    /// non-finite points entirely.
    pub fn sanitized(&self) -> Self {
        let points = self
            .points
            .iter()
            .filter(|p| p[0].is_finite() && p[1].is_finite())
            .map(|p| {
                [
                    p[0].clamp(LEVEL_RANGE.0, LEVEL_RANGE.1),
                    p[1].clamp(LEVEL_RANGE.0, LEVEL_RANGE.1),
                ]
            })
            .collect();
        Self {
            points,
            channel: self.channel,
        }
    }
}

/// Combined hue / saturation / lightness adjustment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HslParams {
    /// Hue rotation in degrees, `[0, 360)`.
    pub hue: f32,
    /// Saturation multiplier. 1.0 is neutral.
    pub saturation: f32,
    /// Lightness slope applied after hue and saturation. 1.0 is neutral.
    pub lightness: f32,
}

impl Default for HslParams {
    fn default() -> Self {
        Self {
            hue: 0.0,
            saturation: 1.0,
            lightness: 1.0,
        }
    }
}

impl HslParams {
    pub fn sanitized(&self) -> Self {
        Self {
            hue: sanitize_angle(self.hue),
            saturation: sanitize(self.saturation, 0.0, HSL_SLOPE_MAX, 1.0),
            lightness: sanitize(self.lightness, 0.0, HSL_SLOPE_MAX, 1.0),
        }
    }
}

/// One adjustment with its typed payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Adjustment {
    /// Brightness percentage, 100 neutral.
    Brightness(f32),
    /// Contrast percentage, 100 neutral.
    Contrast(f32),
    /// Saturation percentage, 100 neutral.
    Saturation(f32),
    /// Hue rotation in degrees.
    Hue(f32),
    /// Gaussian blur radius in pixels.
    Blur(f32),
    /// Sepia amount percentage, 0 neutral.
    Sepia(f32),
    /// Grayscale amount percentage, 0 neutral.
    Grayscale(f32),
    Levels(LevelsParams),
    Curves(CurvesParams),
    Hsl(HslParams),
}

impl Adjustment {
    /// Short machine name for logging and history labels.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Brightness(_) => "brightness",
            Self::Contrast(_) => "contrast",
            Self::Saturation(_) => "saturation",
            Self::Hue(_) => "hue",
            Self::Blur(_) => "blur",
            Self::Sepia(_) => "sepia",
            Self::Grayscale(_) => "grayscale",
            Self::Levels(_) => "levels",
            Self::Curves(_) => "curves",
            Self::Hsl(_) => "hsl",
        }
    }

    /// Return a copy with every parameter forced into its valid range.
    /// Non-finite values become the kind's neutral default.
    pub fn sanitized(&self) -> Self {
        match self {
            Self::Brightness(v) => {
                Self::Brightness(sanitize(*v, PERCENT_RANGE.0, PERCENT_RANGE.1, 100.0))
            }
            Self::Contrast(v) => {
                Self::Contrast(sanitize(*v, PERCENT_RANGE.0, PERCENT_RANGE.1, 100.0))
            }
            Self::Saturation(v) => {
                Self::Saturation(sanitize(*v, PERCENT_RANGE.0, PERCENT_RANGE.1, 100.0))
            }
            Self::Hue(v) => Self::Hue(sanitize_angle(*v)),
            Self::Blur(v) => Self::Blur(sanitize(*v, BLUR_RANGE.0, BLUR_RANGE.1, 0.0)),
            Self::Sepia(v) => Self::Sepia(sanitize(*v, AMOUNT_RANGE.0, AMOUNT_RANGE.1, 0.0)),
            Self::Grayscale(v) => {
                Self::Grayscale(sanitize(*v, AMOUNT_RANGE.0, AMOUNT_RANGE.1, 0.0))
            }
            Self::Levels(p) => Self::Levels(p.sanitized()),
            Self::Curves(p) => Self::Curves(p.sanitized()),
            Self::Hsl(p) => Self::Hsl(p.sanitized()),
        }
    }

    /// Stable hash over the adjustment kind and its parameters, used to
    /// key the compiled-filter cache. Equal parameters hash equal; any
    /// parameter change produces a new hash (modulo hash collisions).
    pub fn params_hash(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.kind_name().hash(&mut hasher);
        match self {
            Self::Brightness(v)
            | Self::Contrast(v)
            | Self::Saturation(v)
            | Self::Hue(v)
            | Self::Blur(v)
            | Self::Sepia(v)
            | Self::Grayscale(v) => v.to_bits().hash(&mut hasher),
            Self::Levels(p) => {
                p.input_shadow.to_bits().hash(&mut hasher);
                p.input_highlight.to_bits().hash(&mut hasher);
                p.midtone.to_bits().hash(&mut hasher);
                p.output_shadow.to_bits().hash(&mut hasher);
                p.output_highlight.to_bits().hash(&mut hasher);
                p.channel.hash(&mut hasher);
            }
            Self::Curves(p) => {
                for pt in &p.points {
                    pt[0].to_bits().hash(&mut hasher);
                    pt[1].to_bits().hash(&mut hasher);
                }
                p.channel.hash(&mut hasher);
            }
            Self::Hsl(p) => {
                p.hue.to_bits().hash(&mut hasher);
                p.saturation.to_bits().hash(&mut hasher);
                p.lightness.to_bits().hash(&mut hasher);
            }
        }
        hasher.finish()
    }
}
