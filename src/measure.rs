use kurbo::{BezPath, CubicBez, Line, ParamCurveArclen, PathEl, Point, QuadBez};

/// Relative error bound handed to kurbo's adaptive arc length evaluation.
const ARCLEN_ACCURACY: f64 = 1e-4;

/// Arc length of every contour (sub-path) in `path`, in element order.
///
/// A contour starts at each `MoveTo`, or after a `ClosePath` when drawable
/// segments follow without an intervening `MoveTo` (they resume from the
/// subpath's initial point). A `ClosePath` contributes the line back to that
/// initial point. A contour that never draws anything (a lone `MoveTo`)
/// reports 0.
pub fn contour_lengths(path: &BezPath) -> Vec<f64> {
    let mut lengths = Vec::new();
    let mut start = Point::ZERO;
    let mut cur = Point::ZERO;
    let mut acc = 0.0;
    let mut open = false;
    let mut closed = false;

    for el in path.elements() {
        if closed && !matches!(el, PathEl::MoveTo(_) | PathEl::ClosePath) {
            lengths.push(acc);
            acc = 0.0;
            closed = false;
        }
        match el {
            PathEl::MoveTo(p) => {
                if open {
                    lengths.push(acc);
                }
                acc = 0.0;
                start = *p;
                cur = *p;
                open = true;
                closed = false;
            }
            PathEl::LineTo(p) => {
                acc += Line::new(cur, *p).arclen(ARCLEN_ACCURACY);
                cur = *p;
                open = true;
            }
            PathEl::QuadTo(c, p) => {
                acc += QuadBez::new(cur, *c, *p).arclen(ARCLEN_ACCURACY);
                cur = *p;
                open = true;
            }
            PathEl::CurveTo(c1, c2, p) => {
                acc += CubicBez::new(cur, *c1, *c2, *p).arclen(ARCLEN_ACCURACY);
                cur = *p;
                open = true;
            }
            PathEl::ClosePath => {
                acc += Line::new(cur, start).arclen(ARCLEN_ACCURACY);
                cur = start;
                closed = true;
            }
        }
    }
    if open {
        lengths.push(acc);
    }
    lengths
}

/// Length of the longest single contour in `path`.
///
/// Deliberately the maximum, not the sum: dash-pattern phase for a glyph is
/// driven against its longest contour, so shorter contours finish tracing
/// early and hold at full opacity while the longest one is still animating.
/// Empty or degenerate paths report 0.
pub fn measure_length(path: &BezPath) -> f64 {
    contour_lengths(path).into_iter().fold(0.0, f64::max)
}
