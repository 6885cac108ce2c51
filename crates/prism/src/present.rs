//! Single-threaded presentation tick: show both streams, map input events
//! onto the target, shut down cleanly.

use std::{
    thread,
    time::{Duration, Instant},
};

use tracing::{info, warn};

use prism_core::prelude::Frame;

use crate::pipeline::Pipeline;

/// Errors surfaced by the presentation loop.
#[derive(Debug, thiserror::Error)]
pub enum PresentError {
    /// The display sink failed irrecoverably.
    #[error("display sink failed: {0}")]
    Display(String),
    /// The encode worker faulted (codec failure); fatal per the error
    /// taxonomy — the pipeline was already cancelled and joined.
    #[error("encode worker faulted: {0}")]
    Encoder(String),
}

/// One discrete input event, polled once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Nothing pressed this tick.
    None,
    /// Raise the compression target one step.
    RaiseTarget,
    /// Lower the compression target one step.
    LowerTarget,
    /// Request an orderly shutdown (conventionally Escape).
    Shutdown,
}

/// Where frames go. `display` is called once per non-empty slot per tick.
pub trait DisplaySink {
    /// Push a named frame to the display surface.
    fn display(&mut self, name: &str, frame: &Frame) -> Result<(), PresentError>;

    /// Optional one-line status (fps, quality, target). Default: ignored.
    fn status(&mut self, _line: &str) {}
}

/// Non-blocking input poll, one event per tick.
pub trait InputPoll {
    /// Poll the next input event.
    fn poll(&mut self) -> InputEvent;
}

/// Why the presentation loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentOutcome {
    /// The user asked to quit; workers were joined.
    UserQuit,
    /// The frame source stopped; workers were joined. Callers usually map
    /// this to a failure exit status.
    DeviceStopped,
}

/// The presentation loop configuration.
///
/// # Example
/// ```rust,ignore
/// use prism::prelude::*;
///
/// let outcome = PresentLoop::new()
///     .overlay(|frame| {
///         if let Some(center) = prism::vision::centroid_normalized(frame, 200, 255) {
///             prism::vision::draw_cross_normalized(frame, center, 30);
///         }
///     })
///     .run(&mut pipeline, &mut ui)?;
/// # Ok::<(), prism::present::PresentError>(())
/// ```
pub struct PresentLoop {
    tick: Duration,
    overlay: Option<Box<dyn FnMut(&mut Frame)>>,
}

impl PresentLoop {
    /// Default loop: 5 ms tick, no overlay.
    pub fn new() -> Self {
        Self {
            tick: Duration::from_millis(5),
            overlay: None,
        }
    }

    /// Override the tick interval.
    pub fn tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Install a hook run on the raw frame copy before it is displayed
    /// (e.g. a centroid cross).
    pub fn overlay(mut self, hook: impl FnMut(&mut Frame) + 'static) -> Self {
        self.overlay = Some(Box::new(hook));
        self
    }

    /// Run until the user quits, the device stops, or a worker faults.
    ///
    /// Every return path joins both workers first, so no thread outlives
    /// this call.
    pub fn run<U>(mut self, pipeline: &mut Pipeline, ui: &mut U) -> Result<PresentOutcome, PresentError>
    where
        U: DisplaySink + InputPoll,
    {
        let metrics = pipeline.metrics();
        loop {
            let started = Instant::now();

            if let Some(fault) = pipeline.fault() {
                pipeline.shutdown();
                return Err(PresentError::Encoder(fault));
            }
            if !pipeline.device_running() {
                warn!("device stopped; shutting down");
                pipeline.shutdown();
                return Ok(PresentOutcome::DeviceStopped);
            }

            if let Some(mut frame) = pipeline.exchange().snapshot_raw() {
                if let Some(hook) = self.overlay.as_mut() {
                    hook(&mut frame);
                }
                if let Err(err) = ui.display("camera", &frame) {
                    pipeline.shutdown();
                    return Err(err);
                }
            }
            if let Some(encoded) = pipeline.exchange().snapshot_encoded() {
                if let Err(err) = ui.display("encoded", &encoded.preview) {
                    pipeline.shutdown();
                    return Err(err);
                }
                let fps = metrics.present.fps().unwrap_or(0.0);
                ui.status(&format!(
                    "fps {:.1} | q {} | psnr {:.3} | target {:.2}",
                    fps,
                    encoded.quality,
                    encoded.psnr,
                    pipeline.target().get()
                ));
            }

            match ui.poll() {
                InputEvent::None => {}
                InputEvent::RaiseTarget => pipeline.target().raise(),
                InputEvent::LowerTarget => pipeline.target().lower(),
                InputEvent::Shutdown => {
                    info!("shutdown requested");
                    pipeline.shutdown();
                    return Ok(PresentOutcome::UserQuit);
                }
            }

            let elapsed = started.elapsed();
            metrics.present.record(elapsed);
            if let Some(rest) = self.tick.checked_sub(elapsed) {
                thread::sleep(rest);
            }
        }
    }
}

impl Default for PresentLoop {
    fn default() -> Self {
        Self::new()
    }
}
