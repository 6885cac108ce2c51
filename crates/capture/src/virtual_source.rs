//! Synthetic frame source that emits a moving test pattern.

use std::{thread, time::Duration};

use prism_core::prelude::*;

use crate::FrameSource;

/// Patterned synthetic source.
///
/// Emits a diagonal gradient that drifts one pixel per frame, so consecutive
/// frames differ and lossy encodes produce realistic sizes. An optional
/// frame budget makes the source report device-stopped after a fixed number
/// of frames; an optional interval simulates a blocking device read.
///
/// # Example
/// ```rust
/// use prism_capture::prelude::*;
///
/// let mut source = VirtualSource::new(Resolution::new(8, 8).unwrap()).with_budget(2);
/// assert!(source.next_frame().is_some());
/// assert!(source.next_frame().is_some());
/// assert!(source.next_frame().is_none());
/// ```
pub struct VirtualSource {
    format: MediaFormat,
    counter: u64,
    budget: Option<u64>,
    interval: Option<Duration>,
}

impl VirtualSource {
    /// Create an unbounded, unpaced source at the given resolution.
    pub fn new(resolution: Resolution) -> Self {
        Self {
            format: MediaFormat::rgb24(resolution),
            counter: 0,
            budget: None,
            interval: None,
        }
    }

    /// Stop (yield `None`) after `frames` frames.
    pub fn with_budget(mut self, frames: u64) -> Self {
        self.budget = Some(frames);
        self
    }

    /// Sleep `interval` inside each read, like a device bounded by its
    /// hardware frame rate.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    fn pattern(&self, timestamp: u64) -> Frame {
        let resolution = self.format.resolution;
        let width = resolution.width.get() as usize;
        let height = resolution.height.get() as usize;
        let shift = timestamp as usize;
        let mut data = Vec::with_capacity(width * height * RGB24_BYTES_PER_PIXEL);
        for y in 0..height {
            for x in 0..width {
                data.push(((x + y + shift) % 256) as u8);
                data.push(((x * 2 + shift) % 256) as u8);
                data.push(((y * 2 + shift * 3) % 256) as u8);
            }
        }
        Frame::rgb24(resolution, timestamp, data)
    }
}

impl FrameSource for VirtualSource {
    fn format(&self) -> MediaFormat {
        self.format
    }

    fn next_frame(&mut self) -> Option<Frame> {
        if let Some(budget) = self.budget {
            if self.counter >= budget {
                return None;
            }
        }
        if let Some(interval) = self.interval {
            thread::sleep(interval);
        }
        let timestamp = self.counter;
        self.counter += 1;
        Some(self.pattern(timestamp))
    }
}
