//! Capture and encode worker threads behind one handle.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Instant,
};

use tracing::{debug, error, info, warn};

use prism_capture::FrameSource;
use prism_codec::{JpegCodec, search_by_quality};
use prism_core::prelude::*;

use crate::{
    exchange::FrameExchange, target::CompressionTarget, tunables::PipelineTunables,
};

/// Timing metrics for every pipeline stage.
#[derive(Clone, Default)]
pub struct PipelineMetrics {
    /// Capture stage timing (one sample per device read).
    pub capture: StageMetrics,
    /// Encode stage timing (one sample per completed search).
    pub encode: StageMetrics,
    /// Presentation tick timing.
    pub present: StageMetrics,
}

/// Running capture + encode workers.
///
/// Shutdown is cooperative: [`shutdown`] cancels the shared token and joins
/// both threads, so no worker outlives the exchange it writes into. `Drop`
/// performs the same teardown as a best effort if the caller forgot.
///
/// [`shutdown`]: Pipeline::shutdown
///
/// # Example
/// ```rust
/// use prism::prelude::*;
///
/// let codec = JpegCodec::new()?;
/// let source = VirtualSource::new(Resolution::new(16, 16).unwrap()).with_budget(5);
/// let mut pipeline = Pipeline::start(
///     Box::new(source),
///     codec,
///     CompressionTarget::default(),
///     PipelineTunables::default(),
/// );
/// pipeline.shutdown();
/// # Ok::<(), prism::codec::CodecError>(())
/// ```
pub struct Pipeline {
    exchange: FrameExchange,
    target: CompressionTarget,
    cancel: CancelToken,
    device_running: Arc<AtomicBool>,
    fault: Latest<String>,
    metrics: PipelineMetrics,
    capture: Option<thread::JoinHandle<()>>,
    encode: Option<thread::JoinHandle<()>>,
}

impl Pipeline {
    /// Spawn the capture producer and the encode worker.
    pub fn start(
        source: Box<dyn FrameSource>,
        codec: JpegCodec,
        target: CompressionTarget,
        tunables: PipelineTunables,
    ) -> Self {
        let tunables = tunables.sanitized();
        let exchange = FrameExchange::new();
        let cancel = CancelToken::new();
        let device_running = Arc::new(AtomicBool::new(true));
        let fault = Latest::new();
        let metrics = PipelineMetrics::default();
        metrics.capture.set_window_size(tunables.metrics_window);
        metrics.encode.set_window_size(tunables.metrics_window);
        metrics.present.set_window_size(tunables.metrics_window);

        let capture = {
            let exchange = exchange.clone();
            let cancel = cancel.clone();
            let device_running = Arc::clone(&device_running);
            let stage = metrics.capture.clone();
            thread::spawn(move || {
                capture_loop(source, exchange, cancel, device_running, stage);
            })
        };

        let encode = {
            let exchange = exchange.clone();
            let cancel = cancel.clone();
            let target = target.clone();
            let fault = fault.clone();
            let stage = metrics.encode.clone();
            thread::spawn(move || {
                encode_loop(codec, exchange, target, cancel, fault, tunables, stage);
            })
        };

        Self {
            exchange,
            target,
            cancel,
            device_running,
            fault,
            metrics,
            capture: Some(capture),
            encode: Some(encode),
        }
    }

    /// The shared frame exchange.
    pub fn exchange(&self) -> &FrameExchange {
        &self.exchange
    }

    /// The live-tunable compression target.
    pub fn target(&self) -> &CompressionTarget {
        &self.target
    }

    /// Timing metrics for all stages.
    pub fn metrics(&self) -> PipelineMetrics {
        self.metrics.clone()
    }

    /// Whether the frame source is still yielding frames.
    pub fn device_running(&self) -> bool {
        self.device_running.load(Ordering::Acquire)
    }

    /// Fatal worker fault, if one occurred.
    pub fn fault(&self) -> Option<String> {
        self.fault.snapshot()
    }

    /// Request cancellation without blocking.
    pub fn request_shutdown(&self) {
        self.cancel.cancel();
    }

    /// Cancel and join both workers. Idempotent.
    pub fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.capture.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.encode.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        // If the consumer forgot to shut down, do it here so no worker
        // outlives the exchange.
        if self.capture.is_some() || self.encode.is_some() {
            self.shutdown();
        }
    }
}

fn capture_loop(
    mut source: Box<dyn FrameSource>,
    exchange: FrameExchange,
    cancel: CancelToken,
    device_running: Arc<AtomicBool>,
    stage: StageMetrics,
) {
    info!(format = %source.format().code, "capture producer started");
    loop {
        if cancel.is_cancelled() {
            break;
        }
        let started = Instant::now();
        match source.next_frame() {
            Some(frame) => {
                stage.record(started.elapsed());
                exchange.publish_raw(frame);
            }
            None => {
                warn!("frame source stopped");
                device_running.store(false, Ordering::Release);
                break;
            }
        }
    }
    info!("capture producer exited");
}

fn encode_loop(
    codec: JpegCodec,
    exchange: FrameExchange,
    target: CompressionTarget,
    cancel: CancelToken,
    fault: Latest<String>,
    tunables: PipelineTunables,
    stage: StageMetrics,
) {
    debug!("encode worker started");
    loop {
        if cancel.is_cancelled() {
            break;
        }
        let Some(frame) = exchange.snapshot_raw() else {
            // Nothing captured yet; don't spin.
            thread::sleep(tunables.empty_poll);
            continue;
        };
        let started = Instant::now();
        match search_by_quality(&codec, &frame, target.psnr_floor()) {
            Ok(result) => {
                stage.record(started.elapsed());
                exchange.publish_encoded(result.into());
            }
            Err(err) => {
                error!(error = %err, "codec search failed; stopping pipeline");
                fault.publish(err.to_string());
                cancel.cancel();
                break;
            }
        }
        if !tunables.encode_min_interval.is_zero() {
            if let Some(rest) = tunables.encode_min_interval.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }
    }
    debug!("encode worker exited");
}
