#![forbid(unsafe_code)]

pub mod animator;
pub mod core;
pub mod ease;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod measure;
pub mod timeline;

pub use animator::{Clock, MonotonicClock, ObserverId, State, TraceAnimator};
pub use crate::core::{Affine, BezPath, DeviceSize, Point, Rgba8, Vec2, Viewport};
pub use ease::Ease;
pub use error::{GlyphTraceError, GlyphTraceResult};
pub use frame::{DashPattern, DrawOp, Frame, draw_ops};
pub use geometry::{Glyph, GlyphSet, GlyphSpec, build_glyph_set, parse_path, viewport_scale};
pub use measure::{contour_lengths, measure_length};
pub use timeline::Timeline;
