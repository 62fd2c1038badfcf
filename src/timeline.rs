use crate::ease::Ease;

/// Fallback marker length in density-independent units.
pub const DEFAULT_MARKER_DIP: f64 = 16.0;

/// Animation timing and stroke configuration. All durations are milliseconds.
///
/// Changing a timeline while an animation is running has an unspecified
/// visual result (frames are recomputed from elapsed time each tick); it is
/// never a memory-safety or data-corruption issue.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    /// Window within which every glyph is scheduled to finish tracing.
    pub trace_time_ms: u64,
    /// Time one glyph spends tracing from 0 to its full length.
    pub trace_time_per_glyph_ms: u64,
    /// Elapsed time at which the global color fill begins.
    pub fill_start_ms: u64,
    /// Time the fill takes to ramp from transparent to each glyph's declared
    /// alpha.
    pub fill_time_ms: u64,
    /// Device-space length of the leading marker drawn at the tracing front.
    pub marker_length: f64,
    /// Device-space stroke width for both trace and residue strokes.
    pub stroke_width: f64,
    /// Interpolation curve applied to each glyph's raw trace phase.
    pub ease: Ease,
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            trace_time_ms: 2000,
            trace_time_per_glyph_ms: 1000,
            fill_start_ms: 1200,
            fill_time_ms: 1000,
            marker_length: DEFAULT_MARKER_DIP,
            stroke_width: 1.0,
            ease: Ease::OutQuad,
        }
    }
}

impl Timeline {
    /// Marker length for a host with the given display density (device pixels
    /// per density-independent unit).
    pub fn marker_length_for_density(density: f64) -> f64 {
        DEFAULT_MARKER_DIP * density
    }

    /// Raw (pre-ease) trace phase in [0,1] for glyph `index` of `glyph_count`.
    ///
    /// Glyph 0 starts at t=0 and later glyphs are staggered by
    /// `(trace_time - trace_time_per_glyph) * index / glyph_count`, so all
    /// glyphs finish inside the `trace_time` window. When the per-glyph time
    /// meets or exceeds the window the stagger collapses and every glyph
    /// starts simultaneously.
    pub fn trace_raw_phase(&self, elapsed_ms: u64, index: usize, glyph_count: usize) -> f64 {
        if glyph_count == 0 {
            return 0.0;
        }
        let spread =
            (self.trace_time_ms as f64 - self.trace_time_per_glyph_ms as f64).max(0.0);
        let offset = spread * index as f64 / glyph_count as f64;
        let local = elapsed_ms as f64 - offset;
        if self.trace_time_per_glyph_ms == 0 {
            // Zero-duration trace degenerates to a step, not a NaN.
            return if local >= 0.0 { 1.0 } else { 0.0 };
        }
        (local / self.trace_time_per_glyph_ms as f64).clamp(0.0, 1.0)
    }

    /// Eased distance along glyph `index`'s longest contour that has been
    /// traced at `elapsed_ms`.
    pub fn traced_distance(
        &self,
        elapsed_ms: u64,
        index: usize,
        glyph_count: usize,
        total_length: f64,
    ) -> f64 {
        self.ease
            .apply(self.trace_raw_phase(elapsed_ms, index, glyph_count))
            * total_length
    }

    /// Raw fill phase in [0,1], global across all glyphs (not staggered).
    pub fn fill_raw_phase(&self, elapsed_ms: u64) -> f64 {
        let local = elapsed_ms as f64 - self.fill_start_ms as f64;
        if self.fill_time_ms == 0 {
            return if local >= 0.0 { 1.0 } else { 0.0 };
        }
        (local / self.fill_time_ms as f64).clamp(0.0, 1.0)
    }

    /// True once fill draw ops are part of the frame.
    pub fn fill_active(&self, elapsed_ms: u64) -> bool {
        elapsed_ms > self.fill_start_ms
    }

    /// Elapsed time at which the animation stops requesting frames.
    pub fn end_ms(&self) -> u64 {
        self.fill_start_ms.saturating_add(self.fill_time_ms)
    }

    /// An elapsed time safely past every phase, used to show the finished
    /// frame without animating.
    pub fn finished_elapsed_ms(&self) -> u64 {
        self.trace_time_ms.max(self.end_ms()).saturating_add(1)
    }
}
