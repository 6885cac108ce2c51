//! End-to-end pipeline scenarios: device-stop observation, user shutdown,
//! and target adjustment through the presentation loop.

use std::{collections::VecDeque, time::Duration};

use prism::prelude::*;

/// Headless UI: counts displays, replays a scripted event sequence.
struct ScriptedUi {
    events: VecDeque<InputEvent>,
    displayed: Vec<String>,
    statuses: usize,
}

impl ScriptedUi {
    fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            displayed: Vec::new(),
            statuses: 0,
        }
    }

    fn silent() -> Self {
        Self::new([])
    }
}

impl DisplaySink for ScriptedUi {
    fn display(&mut self, name: &str, _frame: &Frame) -> Result<(), PresentError> {
        self.displayed.push(name.to_string());
        Ok(())
    }

    fn status(&mut self, _line: &str) {
        self.statuses += 1;
    }
}

impl InputPoll for ScriptedUi {
    fn poll(&mut self) -> InputEvent {
        self.events.pop_front().unwrap_or(InputEvent::None)
    }
}

fn start_pipeline(source: VirtualSource) -> Pipeline {
    Pipeline::start(
        Box::new(source),
        JpegCodec::new().expect("jpeg codec"),
        CompressionTarget::default(),
        PipelineTunables::default(),
    )
}

#[test]
fn device_stop_is_observed_and_workers_join() {
    // A budgeted source plays 100 frames and then reports device-stopped;
    // the presentation loop must notice within one tick and join both
    // workers without deadlock.
    let source = VirtualSource::new(Resolution::new(32, 24).unwrap()).with_budget(100);
    let mut pipeline = start_pipeline(source);
    let mut ui = ScriptedUi::silent();

    let outcome = PresentLoop::new()
        .tick(Duration::from_millis(1))
        .run(&mut pipeline, &mut ui)
        .expect("present loop");
    assert_eq!(outcome, PresentOutcome::DeviceStopped);
    assert!(!pipeline.device_running());
    assert!(pipeline.fault().is_none());
    // Joined workers mean shutdown is now a no-op.
    pipeline.shutdown();
}

#[test]
fn escape_event_shuts_the_pipeline_down() {
    let source = VirtualSource::new(Resolution::new(32, 24).unwrap());
    let mut pipeline = start_pipeline(source);
    // A few idle ticks, then the quit request.
    let mut ui = ScriptedUi::new([
        InputEvent::None,
        InputEvent::None,
        InputEvent::None,
        InputEvent::Shutdown,
    ]);

    let outcome = PresentLoop::new()
        .tick(Duration::from_millis(1))
        .run(&mut pipeline, &mut ui)
        .expect("present loop");
    assert_eq!(outcome, PresentOutcome::UserQuit);
    // The source never stopped on its own.
    assert!(pipeline.device_running());
}

#[test]
fn raise_and_lower_events_move_the_target() {
    let source = VirtualSource::new(Resolution::new(16, 16).unwrap());
    let mut pipeline = start_pipeline(source);
    pipeline.target().set(0.5);
    let mut ui = ScriptedUi::new([
        InputEvent::RaiseTarget,
        InputEvent::RaiseTarget,
        InputEvent::LowerTarget,
        InputEvent::Shutdown,
    ]);

    PresentLoop::new()
        .tick(Duration::from_millis(1))
        .run(&mut pipeline, &mut ui)
        .expect("present loop");
    assert!((pipeline.target().get() - 0.55).abs() < 1e-6);
}

#[test]
fn presentation_displays_both_streams() {
    let source = VirtualSource::new(Resolution::new(32, 24).unwrap());
    let mut pipeline = start_pipeline(source);

    // Wait until the encode worker has published at least one preview so a
    // single tick shows both slots.
    let deadline = std::time::Instant::now() + Duration::from_secs(10);
    while pipeline.exchange().snapshot_encoded().is_none() {
        assert!(std::time::Instant::now() < deadline, "no preview published");
        std::thread::sleep(Duration::from_millis(1));
    }

    let mut ui = ScriptedUi::new([InputEvent::Shutdown]);
    PresentLoop::new()
        .tick(Duration::from_millis(1))
        .run(&mut pipeline, &mut ui)
        .expect("present loop");
    assert!(ui.displayed.iter().any(|n| n == "camera"));
    assert!(ui.displayed.iter().any(|n| n == "encoded"));
    assert!(ui.statuses > 0);
}

#[test]
fn overlay_hook_runs_on_the_raw_copy_only() {
    let source = VirtualSource::new(Resolution::new(16, 16).unwrap());
    let mut pipeline = start_pipeline(source);
    let mut ui = ScriptedUi::new([InputEvent::Shutdown]);

    PresentLoop::new()
        .tick(Duration::from_millis(1))
        .overlay(|frame| prism::vision::draw_cross_normalized(frame, (0.5, 0.5), 8))
        .run(&mut pipeline, &mut ui)
        .expect("present loop");

    // The overlay mutated a presentation-side copy; the published raw frame
    // (when still present) must be untouched pattern data, never pure red.
    if let Some(raw) = pipeline.exchange().snapshot_raw() {
        let stride = raw.stride();
        let center = 8 * stride + 8 * 3;
        assert_ne!(&raw.data()[center..center + 3], &[255, 0, 0]);
    }
}

#[test]
fn encoded_preview_tracks_the_source_geometry() {
    let source = VirtualSource::new(Resolution::new(48, 32).unwrap());
    let mut pipeline = start_pipeline(source);

    let deadline = std::time::Instant::now() + Duration::from_secs(10);
    let encoded = loop {
        if let Some(encoded) = pipeline.exchange().snapshot_encoded() {
            break encoded;
        }
        assert!(std::time::Instant::now() < deadline, "no preview published");
        std::thread::sleep(Duration::from_millis(1));
    };
    assert_eq!(encoded.preview.width(), 48);
    assert_eq!(encoded.preview.height(), 32);
    assert!(encoded.quality >= 5 && encoded.quality <= 100);
    assert!(encoded.compressed_len > 0);
    pipeline.shutdown();
}
