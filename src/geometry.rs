use std::sync::Arc;

use crate::{
    core::{Affine, BezPath, DeviceSize, Rgba8, Viewport},
    error::{GlyphTraceError, GlyphTraceResult},
    measure,
};

/// One glyph as submitted by the caller: an SVG path-data string plus its
/// three animation colors.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GlyphSpec {
    pub path_d: String,
    pub trace_color: Rgba8,
    pub trace_residue_color: Rgba8,
    pub fill_color: Rgba8,
}

/// One glyph after a rebuild: device-space geometry, its longest-contour
/// length, and the colors frozen alongside it.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Glyph {
    pub path: Arc<BezPath>,
    pub length: f64,
    pub trace_color: Rgba8,
    pub trace_residue_color: Rgba8,
    pub fill_color: Rgba8,
}

/// Immutable snapshot of all glyph geometry for one viewport/device pairing.
///
/// Rebuilds produce a whole new set which the animator swaps in atomically;
/// a frame emitted mid-rebuild never observes a half-built mixture.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct GlyphSet {
    glyphs: Vec<Glyph>,
}

impl GlyphSet {
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Glyph> {
        self.glyphs.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.iter()
    }
}

/// Parse one SVG path-data string into a kurbo path.
///
/// Local (pre-scale) coordinates; callers apply [`viewport_scale`] afterwards.
pub fn parse_path(d: &str) -> GlyphTraceResult<BezPath> {
    let d = d.trim();
    if d.is_empty() {
        return Err(GlyphTraceError::parse("glyph path data is empty"));
    }
    BezPath::from_svg(d).map_err(|e| GlyphTraceError::parse(format!("invalid path data: {e}")))
}

/// Anisotropic scale from viewport logical units to device pixels.
///
/// The pivot is the viewport's own center, not the device center; a point at
/// the viewport center maps to itself.
pub fn viewport_scale(viewport: Viewport, device: DeviceSize) -> Affine {
    let sx = f64::from(device.width) / viewport.width();
    let sy = f64::from(device.height) / viewport.height();
    let pivot = viewport.center().to_vec2();
    Affine::translate(pivot) * Affine::scale_non_uniform(sx, sy) * Affine::translate(-pivot)
}

/// Build the full glyph snapshot for one configuration.
///
/// Color tables are validated against the glyph count before any geometry
/// work happens. A glyph whose path data fails to parse degrades to an empty
/// path (length 0, draws nothing) and the rest of the batch is unaffected.
#[tracing::instrument(skip_all, fields(glyph_count = strings.len()))]
pub fn build_glyph_set(
    strings: &[String],
    trace_colors: &[Rgba8],
    trace_residue_colors: &[Rgba8],
    fill_colors: &[Rgba8],
    viewport: Viewport,
    device: DeviceSize,
) -> GlyphTraceResult<GlyphSet> {
    check_table(strings.len(), trace_colors.len(), "trace")?;
    check_table(strings.len(), trace_residue_colors.len(), "trace residue")?;
    check_table(strings.len(), fill_colors.len(), "fill")?;

    let scale = viewport_scale(viewport, device);
    let mut glyphs = Vec::with_capacity(strings.len());
    for (i, d) in strings.iter().enumerate() {
        let mut path = match parse_path(d) {
            Ok(p) => p,
            Err(err) => {
                tracing::warn!(glyph = i, %err, "substituting empty path for unparsable glyph");
                BezPath::new()
            }
        };
        path.apply_affine(scale);
        let length = measure::measure_length(&path);
        glyphs.push(Glyph {
            path: Arc::new(path),
            length,
            trace_color: trace_colors[i],
            trace_residue_color: trace_residue_colors[i],
            fill_color: fill_colors[i],
        });
    }
    Ok(GlyphSet { glyphs })
}

fn check_table(glyph_count: usize, table_len: usize, name: &str) -> GlyphTraceResult<()> {
    if table_len != glyph_count {
        return Err(GlyphTraceError::dimension_mismatch(format!(
            "expected {glyph_count} {name} colors to match the glyph count, got {table_len}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn colors(n: usize) -> Vec<Rgba8> {
        vec![Rgba8::BLACK; n]
    }

    #[test]
    fn parse_rejects_garbage_and_empty_input() {
        assert!(matches!(
            parse_path("not a path"),
            Err(GlyphTraceError::Parse(_))
        ));
        assert!(matches!(parse_path("   "), Err(GlyphTraceError::Parse(_))));
        assert!(parse_path("M0,0 L10,0").is_ok());
    }

    #[test]
    fn scale_pivots_on_viewport_center() {
        let vp = Viewport::new(100.0, 100.0).unwrap();
        let scale = viewport_scale(vp, DeviceSize::new(200, 200));
        // The viewport's own center is the fixed point, not the device center.
        assert_eq!(scale * Point::new(50.0, 50.0), Point::new(50.0, 50.0));
        assert_eq!(scale * Point::new(100.0, 100.0), Point::new(150.0, 150.0));
        assert_eq!(scale * Point::new(0.0, 0.0), Point::new(-50.0, -50.0));
    }

    #[test]
    fn scale_is_anisotropic() {
        let vp = Viewport::new(100.0, 50.0).unwrap();
        let scale = viewport_scale(vp, DeviceSize::new(200, 200));
        let p = scale * Point::new(100.0, 50.0);
        // x doubles about x=50, y quadruples about y=25.
        assert_eq!(p, Point::new(150.0, 125.0));
    }

    #[test]
    fn rebuild_rejects_mismatched_color_tables() {
        let strings = vec!["M0,0 L10,0".to_string(), "M0,0 L0,10".to_string()];
        let err = build_glyph_set(
            &strings,
            &colors(2),
            &colors(1),
            &colors(2),
            Viewport::default(),
            DeviceSize::new(512, 512),
        )
        .unwrap_err();
        assert!(matches!(err, GlyphTraceError::DimensionMismatch(_)));
        assert!(err.to_string().contains("trace residue"));
    }

    #[test]
    fn unparsable_glyph_degrades_without_touching_siblings() {
        let strings = vec![
            "M0,0 L100,0".to_string(),
            "definitely not svg".to_string(),
            "M0,0 L0,100".to_string(),
        ];
        let set = build_glyph_set(
            &strings,
            &colors(3),
            &colors(3),
            &colors(3),
            Viewport::new(512.0, 512.0).unwrap(),
            DeviceSize::new(512, 512),
        )
        .unwrap();
        assert_eq!(set.len(), 3);
        assert!((set.get(0).unwrap().length - 100.0).abs() < 1e-6);
        assert_eq!(set.get(1).unwrap().length, 0.0);
        assert!(set.get(1).unwrap().path.elements().is_empty());
        assert!((set.get(2).unwrap().length - 100.0).abs() < 1e-6);
    }

    #[test]
    fn rebuild_scales_lengths_into_device_space() {
        let strings = vec!["M0,0 L100,0".to_string()];
        let set = build_glyph_set(
            &strings,
            &colors(1),
            &colors(1),
            &colors(1),
            Viewport::new(100.0, 100.0).unwrap(),
            DeviceSize::new(300, 300),
        )
        .unwrap();
        assert!((set.get(0).unwrap().length - 300.0).abs() < 1e-6);
    }
}
