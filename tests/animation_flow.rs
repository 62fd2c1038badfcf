use std::cell::Cell;
use std::rc::Rc;

use glyphtrace::{Clock, DrawOp, GlyphSpec, Rgba8, State, TraceAnimator};

#[derive(Clone)]
struct ManualClock(Rc<Cell<u64>>);

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

fn demo_specs() -> Vec<GlyphSpec> {
    // Three strokes of a stylized glyph: a long diagonal, a curve with two
    // contours (stem and dot), and a short closing stroke.
    vec![
        GlyphSpec {
            path_d: "M20,20 L200,200".to_string(),
            trace_color: Rgba8::BLACK,
            trace_residue_color: Rgba8::RESIDUE_DEFAULT,
            fill_color: Rgba8::new(220, 60, 40, 255),
        },
        GlyphSpec {
            path_d: "M100,40 Q140,80 100,120 M100,10 L100,12".to_string(),
            trace_color: Rgba8::opaque(40, 40, 200),
            trace_residue_color: Rgba8::RESIDUE_DEFAULT,
            fill_color: Rgba8::new(40, 40, 200, 180),
        },
        GlyphSpec {
            path_d: "M30,180 L90,180 L60,150 Z".to_string(),
            trace_color: Rgba8::BLACK,
            trace_residue_color: Rgba8::RESIDUE_DEFAULT,
            fill_color: Rgba8::new(20, 160, 90, 255),
        },
    ]
}

fn animator_at(now: Rc<Cell<u64>>) -> TraceAnimator {
    let mut anim = TraceAnimator::with_clock(Box::new(ManualClock(now)));
    anim.set_glyph_specs(demo_specs());
    anim.set_viewport_size(220.0, 220.0).unwrap();
    anim.set_device_size(440, 440);
    anim
}

#[test]
fn full_run_emits_strokes_then_fills_and_stops() {
    let now = Rc::new(Cell::new(50_000));
    let mut anim = animator_at(Rc::clone(&now));

    let states = Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = Rc::clone(&states);
    anim.on_state_change(move |s| sink.borrow_mut().push(s));

    anim.start().unwrap();

    // Drive the cooperative loop the way a host frame callback would, one
    // tick per 100ms, until the animator stops asking for frames.
    let mut frames = Vec::new();
    loop {
        let frame = anim.tick().expect("animation is running");
        let more = frame.schedule_next;
        frames.push(frame);
        if !more {
            break;
        }
        now.set(now.get() + 100);
    }

    assert_eq!(
        *states.borrow(),
        vec![State::TraceStarted, State::FillStarted, State::Finished]
    );

    // Strokes only before the fill starts, strokes plus fills after.
    let first = &frames[0];
    assert_eq!(first.elapsed_ms, 0);
    assert_eq!(first.ops.len(), 6);
    assert!(first.ops.iter().all(|op| matches!(op, DrawOp::Stroke { .. })));

    let last = frames.last().unwrap();
    assert_eq!(last.ops.len(), 9);
    let fills: Vec<_> = last
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Fill { color, .. } => Some(*color),
            _ => None,
        })
        .collect();
    assert_eq!(fills.len(), 3);
    // At the end every fill sits at its declared alpha.
    assert_eq!(fills[0].a, 255);
    assert_eq!(fills[1].a, 180);
    assert_eq!(fills[2].a, 255);

    // Traced distance never moves backwards across the run (glyph 0's
    // residue dash "on" interval is its traced distance).
    let mut prev = 0.0;
    for frame in &frames {
        let DrawOp::Stroke { dash, .. } = &frame.ops[0] else {
            panic!("expected residue stroke first");
        };
        assert!(dash.intervals[0] >= prev);
        prev = dash.intervals[0];
    }
}

#[test]
fn malformed_glyph_degrades_while_siblings_animate() {
    // Route the rebuild's degradation warning through a real subscriber so
    // it shows up in captured test output.
    tracing_subscriber::fmt().with_test_writer().try_init().ok();

    let now = Rc::new(Cell::new(0));
    let mut anim = TraceAnimator::with_clock(Box::new(ManualClock(Rc::clone(&now))));
    let mut specs = demo_specs();
    specs[1].path_d = "this is not path data".to_string();
    anim.set_glyph_specs(specs);
    anim.set_viewport_size(220.0, 220.0).unwrap();
    anim.set_device_size(220, 220);

    anim.start().unwrap();
    now.set(5_000);
    let frame = anim.tick().unwrap();

    // The bad glyph contributes zero-length dashes and nothing else changes.
    let DrawOp::Stroke { dash, .. } = &frame.ops[2] else {
        panic!("expected residue stroke for glyph 1");
    };
    assert_eq!(dash.intervals, vec![0.0, 0.0]);

    let DrawOp::Stroke { dash, .. } = &frame.ops[0] else {
        panic!("expected residue stroke for glyph 0");
    };
    assert!(dash.intervals[0] > 0.0);
}
