use crate::error::{GlyphTraceError, GlyphTraceResult};

pub use kurbo::{Affine, BezPath, Point, Vec2};

/// Straight-alpha RGBA color, 8 bits per channel.
///
/// The fill pipeline scales `a` by the fill phase at emit time; `r`/`g`/`b`
/// are never premultiplied.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    /// Default residue track color: black at ~20% opacity.
    pub const RESIDUE_DEFAULT: Self = Self::new(0, 0, 0, 50);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Unpack from a `0xRRGGBBAA` word.
    pub const fn from_rgba_u32(v: u32) -> Self {
        Self {
            r: (v >> 24) as u8,
            g: (v >> 16) as u8,
            b: (v >> 8) as u8,
            a: v as u8,
        }
    }

    /// Scale the declared alpha by `factor` in [0,1], truncating toward zero
    /// so `factor == 1.0` reproduces the declared alpha exactly.
    pub fn scale_alpha(self, factor: f64) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        Self {
            a: (factor * f64::from(self.a)) as u8,
            ..self
        }
    }
}

/// Logical coordinate space the path data is authored in (the SVG viewBox
/// size). Distinct from device pixel space.
///
/// Deserialization goes through [`Viewport::new`], so a serialized zero,
/// negative or non-finite size is rejected instead of reaching the scale
/// matrix division.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawViewport")]
pub struct Viewport {
    width: f64,
    height: f64,
}

#[derive(serde::Deserialize)]
struct RawViewport {
    width: f64,
    height: f64,
}

impl TryFrom<RawViewport> for Viewport {
    type Error = GlyphTraceError;

    fn try_from(raw: RawViewport) -> GlyphTraceResult<Self> {
        Self::new(raw.width, raw.height)
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> GlyphTraceResult<Self> {
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return Err(GlyphTraceError::configuration(
                "viewport width and height must be finite and > 0",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn width(self) -> f64 {
        self.width
    }

    pub fn height(self) -> f64 {
        self.height
    }

    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Largest device size with this viewport's aspect ratio that fits within
    /// `max_width` x `max_height`. Host adapters use this to answer layout
    /// measurement queries.
    pub fn fit_within(self, max_width: u32, max_height: u32) -> DeviceSize {
        if max_width == 0 || max_height == 0 {
            return DeviceSize {
                width: 0,
                height: 0,
            };
        }
        let (w, h) = (f64::from(max_width), f64::from(max_height));
        if w * self.height > self.width * h {
            DeviceSize {
                width: (h * self.width / self.height) as u32,
                height: max_height,
            }
        } else {
            DeviceSize {
                width: max_width,
                height: (w * self.height / self.width) as u32,
            }
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 512.0,
            height: 512.0,
        }
    }
}

/// Device pixel dimensions of the drawing surface.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
pub struct DeviceSize {
    pub width: u32,
    pub height: u32,
}

impl DeviceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
