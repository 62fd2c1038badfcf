use std::sync::Arc;

use crate::{
    core::{BezPath, Rgba8},
    geometry::GlyphSet,
    timeline::Timeline,
};

/// Alternating on/off interval lengths for a partial stroke, starting with an
/// "on" interval and with zero dash offset.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DashPattern {
    pub intervals: Vec<f64>,
}

impl DashPattern {
    pub fn new(intervals: Vec<f64>) -> Self {
        Self { intervals }
    }
}

/// One backend-agnostic drawing instruction. Ops within a frame are already
/// in paint order; later ops layer on top of earlier ones.
#[derive(Clone, Debug, serde::Serialize)]
pub enum DrawOp {
    Stroke {
        path: Arc<BezPath>,
        color: Rgba8,
        width: f64,
        dash: DashPattern,
    },
    Fill {
        path: Arc<BezPath>,
        color: Rgba8,
    },
}

/// Everything a host needs to paint one animation frame and keep the loop
/// going.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Frame {
    pub elapsed_ms: u64,
    pub ops: Vec<DrawOp>,
    /// True while the animation is still in progress; the host should request
    /// another frame callback.
    pub schedule_next: bool,
}

/// Emit the draw ops for one frame at `elapsed_ms`.
///
/// Pure: identical inputs produce identical output, so a frame can be
/// replayed or snapshotted. Per glyph, in index order: the residue stroke
/// (solid up to the traced distance, gap to the end), then the trace stroke
/// (invisible lead-in, marker of `marker_length` at the tracing front, gap to
/// the end). Once `elapsed_ms` passes the fill start, one fill per glyph
/// follows with the declared alpha scaled by the global fill phase.
pub fn draw_ops(glyphs: &GlyphSet, timeline: &Timeline, elapsed_ms: u64) -> Vec<DrawOp> {
    let n = glyphs.len();
    let fill_active = timeline.fill_active(elapsed_ms);
    let mut ops = Vec::with_capacity(if fill_active { 3 * n } else { 2 * n });

    for (i, glyph) in glyphs.iter().enumerate() {
        let distance = timeline.traced_distance(elapsed_ms, i, n, glyph.length);

        ops.push(DrawOp::Stroke {
            path: Arc::clone(&glyph.path),
            color: glyph.trace_residue_color,
            width: timeline.stroke_width,
            dash: DashPattern::new(vec![distance, glyph.length]),
        });

        // No marker before tracing begins.
        let marker = if distance > 0.0 {
            timeline.marker_length
        } else {
            0.0
        };
        ops.push(DrawOp::Stroke {
            path: Arc::clone(&glyph.path),
            color: glyph.trace_color,
            width: timeline.stroke_width,
            dash: DashPattern::new(vec![0.0, distance, marker, glyph.length]),
        });
    }

    if fill_active {
        let phase = timeline.fill_raw_phase(elapsed_ms);
        for glyph in glyphs.iter() {
            ops.push(DrawOp::Fill {
                path: Arc::clone(&glyph.path),
                color: glyph.fill_color.scale_alpha(phase),
            });
        }
    }

    ops
}
