//! Shared frame hand-off between the capture, encode, and presentation loops.

use prism_codec::QualityResult;
use prism_core::prelude::*;

/// Result of one encode-worker pass, published for the presentation loop.
///
/// Overwritten on the next pass; "latest value wins".
#[derive(Debug, Clone)]
pub struct EncodedPreview {
    /// Decoded preview at the selected quality step.
    pub preview: Frame,
    /// Selected quality step.
    pub quality: u8,
    /// Scaled PSNR measured at the selected step.
    pub psnr: f64,
    /// Compressed length at the selected step.
    pub compressed_len: usize,
}

impl From<QualityResult> for EncodedPreview {
    fn from(result: QualityResult) -> Self {
        Self {
            preview: result.preview,
            quality: result.quality,
            psnr: result.psnr,
            compressed_len: result.compressed_len,
        }
    }
}

/// Two independent latest-value slots: the newest raw frame and the newest
/// encoded preview.
///
/// Each slot has its own lock; publishes and snapshots copy under that lock,
/// so readers never observe a torn value. There is no backpressure — a slow
/// reader simply sees the newest frame at its next poll, and a snapshot
/// before the first publish yields `None`.
///
/// # Example
/// ```rust
/// use prism::exchange::FrameExchange;
/// use prism_core::prelude::{Frame, Resolution};
///
/// let exchange = FrameExchange::new();
/// assert!(exchange.snapshot_raw().is_none());
/// let frame = Frame::rgb24_filled(Resolution::new(2, 2).unwrap(), 0, 9);
/// exchange.publish_raw(frame.clone());
/// assert_eq!(exchange.snapshot_raw(), Some(frame));
/// ```
#[derive(Clone, Default)]
pub struct FrameExchange {
    raw: Latest<Frame>,
    encoded: Latest<EncodedPreview>,
}

impl FrameExchange {
    /// Create an exchange with both slots empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the newest raw frame.
    pub fn publish_raw(&self, frame: Frame) {
        self.raw.publish(frame);
    }

    /// Snapshot the newest raw frame, if any was published.
    pub fn snapshot_raw(&self) -> Option<Frame> {
        self.raw.snapshot()
    }

    /// Publish the newest encoded preview.
    pub fn publish_encoded(&self, preview: EncodedPreview) {
        self.encoded.publish(preview);
    }

    /// Snapshot the newest encoded preview, if any was published.
    pub fn snapshot_encoded(&self) -> Option<EncodedPreview> {
        self.encoded.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_returns_pixel_identical_frame() {
        let exchange = FrameExchange::new();
        let res = Resolution::new(5, 4).unwrap();
        let frame = Frame::rgb24(res, 3, (0u8..60).collect());
        exchange.publish_raw(frame.clone());
        let seen = exchange.snapshot_raw().unwrap();
        assert_eq!(seen, frame);
        // No intervening publish: still identical.
        assert_eq!(exchange.snapshot_raw().unwrap(), frame);
    }

    #[test]
    fn slots_are_independent() {
        let exchange = FrameExchange::new();
        let frame = Frame::rgb24_filled(Resolution::new(2, 2).unwrap(), 0, 1);
        exchange.publish_raw(frame.clone());
        assert!(exchange.snapshot_encoded().is_none());

        exchange.publish_encoded(EncodedPreview {
            preview: frame,
            quality: 80,
            psnr: 0.4,
            compressed_len: 123,
        });
        assert!(exchange.snapshot_raw().is_some());
        assert_eq!(exchange.snapshot_encoded().unwrap().quality, 80);
    }
}
