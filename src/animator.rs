use std::sync::Arc;
use std::time::Instant;

use crate::{
    core::{DeviceSize, Rgba8, Viewport},
    error::{GlyphTraceError, GlyphTraceResult},
    frame::{Frame, draw_ops},
    geometry::{GlyphSet, GlyphSpec, build_glyph_set},
    timeline::Timeline,
};

/// Lifecycle of one animation run. Transitions move forward only, except for
/// an explicit [`TraceAnimator::reset`] back to `NotStarted` or an explicit
/// [`TraceAnimator::set_to_finished_frame`] jump to `Finished`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum State {
    /// The animation has been reset or has not started yet.
    NotStarted,
    /// Glyph strokes are being traced.
    TraceStarted,
    /// Tracing is complete (or still finishing) and the color fill has begun.
    FillStarted,
    /// The animation has finished; no further frames are requested.
    Finished,
}

/// Source of monotonically increasing elapsed milliseconds.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Default clock reporting milliseconds since its own construction.
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Handle returned by [`TraceAnimator::on_state_change`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type StateObserver = Box<dyn FnMut(State)>;

/// The animation engine: owns configuration, the immutable glyph snapshot,
/// the start timestamp and the four-state lifecycle.
///
/// Single-threaded and frame-driven. The host calls [`tick`](Self::tick) from
/// its frame callback; the returned [`Frame`] says whether to schedule the
/// next one. Configuration setters must only run between ticks; changing
/// configuration while `state != NotStarted` has an unspecified visual (not
/// memory-safety) result.
pub struct TraceAnimator {
    glyph_strings: Vec<String>,
    trace_colors: Vec<Rgba8>,
    trace_residue_colors: Vec<Rgba8>,
    fill_colors: Vec<Rgba8>,
    viewport: Viewport,
    device: DeviceSize,
    timeline: Timeline,
    glyphs: Option<Arc<GlyphSet>>,
    dirty: bool,
    // Signed so a finished-frame jump can pre-date the clock's origin.
    start_at_ms: Option<i64>,
    state: State,
    clock: Box<dyn Clock>,
    observers: Vec<(ObserverId, StateObserver)>,
    next_observer_id: u64,
}

impl TraceAnimator {
    pub fn new() -> Self {
        Self::with_clock(Box::new(MonotonicClock::new()))
    }

    /// Construct with an injected clock (hosts with their own frame clock,
    /// tests with a manual one).
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            glyph_strings: Vec::new(),
            trace_colors: Vec::new(),
            trace_residue_colors: Vec::new(),
            fill_colors: Vec::new(),
            viewport: Viewport::default(),
            device: DeviceSize::default(),
            timeline: Timeline::default(),
            glyphs: None,
            dirty: true,
            start_at_ms: None,
            state: State::NotStarted,
            clock,
            observers: Vec::new(),
            next_observer_id: 0,
        }
    }

    /// Set the SVG path-data strings, one per glyph. Color tables must be
    /// (re)supplied to match before the next rebuild.
    pub fn set_glyph_strings(&mut self, strings: Vec<String>) {
        self.glyph_strings = strings;
        self.dirty = true;
    }

    /// Set glyphs and all three color tables in one call; lengths match by
    /// construction.
    pub fn set_glyph_specs(&mut self, specs: Vec<GlyphSpec>) {
        self.glyph_strings = specs.iter().map(|s| s.path_d.clone()).collect();
        self.trace_colors = specs.iter().map(|s| s.trace_color).collect();
        self.trace_residue_colors = specs.iter().map(|s| s.trace_residue_color).collect();
        self.fill_colors = specs.into_iter().map(|s| s.fill_color).collect();
        self.dirty = true;
    }

    pub fn set_trace_colors(&mut self, colors: Vec<Rgba8>) {
        self.trace_colors = colors;
        self.dirty = true;
    }

    pub fn set_trace_residue_colors(&mut self, colors: Vec<Rgba8>) {
        self.trace_residue_colors = colors;
        self.dirty = true;
    }

    pub fn set_fill_colors(&mut self, colors: Vec<Rgba8>) {
        self.fill_colors = colors;
        self.dirty = true;
    }

    /// Apply one trace color to every glyph. Glyph strings must already be
    /// set so the table length is known.
    pub fn set_trace_color(&mut self, color: Rgba8) -> GlyphTraceResult<()> {
        let colors = self.uniform_table(color, "trace")?;
        self.set_trace_colors(colors);
        Ok(())
    }

    /// Apply one residue color to every glyph. Glyph strings must already be
    /// set.
    pub fn set_trace_residue_color(&mut self, color: Rgba8) -> GlyphTraceResult<()> {
        let colors = self.uniform_table(color, "trace residue")?;
        self.set_trace_residue_colors(colors);
        Ok(())
    }

    /// Apply one fill color to every glyph. Glyph strings must already be
    /// set.
    pub fn set_fill_color(&mut self, color: Rgba8) -> GlyphTraceResult<()> {
        let colors = self.uniform_table(color, "fill")?;
        self.set_fill_colors(colors);
        Ok(())
    }

    fn uniform_table(&self, color: Rgba8, name: &str) -> GlyphTraceResult<Vec<Rgba8>> {
        if self.glyph_strings.is_empty() {
            return Err(GlyphTraceError::configuration(format!(
                "set glyph strings before assigning a uniform {name} color"
            )));
        }
        Ok(vec![color; self.glyph_strings.len()])
    }

    /// Logical (viewBox) size the path data is authored in.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) -> GlyphTraceResult<()> {
        self.viewport = Viewport::new(width, height)?;
        self.dirty = true;
        Ok(())
    }

    /// Device pixel size of the drawing surface.
    pub fn set_device_size(&mut self, width: u32, height: u32) {
        self.device = DeviceSize::new(width, height);
        self.dirty = true;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_timeline(&mut self, timeline: Timeline) {
        self.timeline = timeline;
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Rebuild the glyph snapshot from the current strings, colors, viewport
    /// and device size.
    ///
    /// Transactional: on a dimension mismatch the previous snapshot is left
    /// untouched. A glyph with unparsable path data degrades to an empty path
    /// and the rest of the batch still builds.
    #[tracing::instrument(skip(self))]
    pub fn rebuild_glyphs(&mut self) -> GlyphTraceResult<()> {
        let set = build_glyph_set(
            &self.glyph_strings,
            &self.trace_colors,
            &self.trace_residue_colors,
            &self.fill_colors,
            self.viewport,
            self.device,
        )?;
        self.glyphs = Some(Arc::new(set));
        self.dirty = false;
        Ok(())
    }

    /// Start (or restart) the animation from the current clock time.
    ///
    /// Rebuilds geometry first if anything changed since the last rebuild.
    /// A `start` while another run is in flight simply re-anchors the start
    /// timestamp and supersedes it.
    #[tracing::instrument(skip(self))]
    pub fn start(&mut self) -> GlyphTraceResult<()> {
        self.ensure_glyphs()?;
        self.start_at_ms = Some(self.clock.now_ms() as i64);
        self.change_state(State::TraceStarted);
        Ok(())
    }

    /// Return to `NotStarted`; no further frames are requested and ticks are
    /// no-ops until the next `start`.
    pub fn reset(&mut self) {
        self.start_at_ms = None;
        self.change_state(State::NotStarted);
    }

    /// Jump straight to the finished frame without animating: elapsed time is
    /// anchored past every phase and intermediate states are skipped.
    pub fn set_to_finished_frame(&mut self) -> GlyphTraceResult<()> {
        self.ensure_glyphs()?;
        let now = self.clock.now_ms() as i64;
        self.start_at_ms = Some(now - self.timeline.finished_elapsed_ms() as i64);
        self.change_state(State::Finished);
        Ok(())
    }

    /// Subscribe to state changes. Observers are only invoked when the state
    /// actually changes, never redundantly.
    pub fn on_state_change(&mut self, observer: impl FnMut(State) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a previously registered observer. Returns false if the id is
    /// unknown.
    pub fn remove_state_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    /// Compute one frame for the current clock time and advance the state
    /// machine across any thresholds it crossed.
    ///
    /// Returns `None` while `NotStarted` or before any geometry has been
    /// built (idle no-op, per the drawing contract). The returned frame's
    /// `schedule_next` tells the host whether to request another callback.
    pub fn tick(&mut self) -> Option<Frame> {
        if self.state == State::NotStarted {
            return None;
        }
        let glyphs = self.glyphs.clone()?;
        let start = self.start_at_ms?;

        let now = self.clock.now_ms() as i64;
        let elapsed_ms = (now - start).max(0) as u64;

        let ops = draw_ops(&glyphs, &self.timeline, elapsed_ms);

        if self.timeline.fill_active(elapsed_ms) && self.state < State::FillStarted {
            self.change_state(State::FillStarted);
        }

        let schedule_next = elapsed_ms < self.timeline.end_ms();
        if !schedule_next {
            self.change_state(State::Finished);
        }

        Some(Frame {
            elapsed_ms,
            ops,
            schedule_next,
        })
    }

    fn ensure_glyphs(&mut self) -> GlyphTraceResult<()> {
        if self.dirty || self.glyphs.is_none() {
            self.rebuild_glyphs()?;
        }
        Ok(())
    }

    fn change_state(&mut self, state: State) {
        if self.state == state {
            return;
        }
        self.state = state;
        for (_, observer) in &mut self.observers {
            observer(state);
        }
    }
}

impl Default for TraceAnimator {
    fn default() -> Self {
        Self::new()
    }
}
