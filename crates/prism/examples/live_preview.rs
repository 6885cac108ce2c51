//! Live preview over a synthetic source: two windows (raw + encoded),
//! Up/Down adjust the compression target, Escape quits.
//!
//! Run with:
//!   cargo run -p prism --example live_preview --features preview-window

use std::time::Duration;

use prism::prelude::*;
use prism::vision;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let codec = JpegCodec::new()?;
    let source = VirtualSource::new(
        Resolution::new(640, 360).ok_or("bad resolution")?,
    )
    .with_interval(Duration::from_millis(33));
    let target = CompressionTarget::new(0.35);

    let mut pipeline = Pipeline::start(
        Box::new(source),
        codec,
        target,
        PipelineTunables::default().encode_min_interval(Duration::from_millis(10)),
    );
    let mut ui = PreviewUi::new();

    let outcome = PresentLoop::new()
        .tick(Duration::from_millis(5))
        .overlay(|frame| {
            if let Some(center) = vision::centroid_normalized(frame, 200, 255) {
                vision::draw_cross_normalized(frame, center, 30);
            }
        })
        .run(&mut pipeline, &mut ui)?;

    let metrics = pipeline.metrics();
    println!(
        "capture avg_ms={:.2?} encode avg_ms={:.2?} encoded_passes={}",
        metrics.capture.avg_millis(),
        metrics.encode.avg_millis(),
        metrics.encode.total_samples()
    );

    if outcome == PresentOutcome::DeviceStopped {
        eprintln!("frame source stopped");
        std::process::exit(1);
    }
    Ok(())
}
