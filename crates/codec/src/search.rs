use std::ops::ControlFlow;

use smallvec::SmallVec;
use tracing::trace;

use prism_core::prelude::*;

use crate::{CodecError, JpegCodec, PsnrConvention, psnr};

/// Highest quality step attempted first.
pub const QUALITY_MAX: u8 = 100;
/// Lowest quality step; its attempt is the best-effort fallback.
pub const QUALITY_MIN: u8 = 5;
/// Coarse step between attempts.
pub const QUALITY_STEP: u8 = 5;

/// The descending quality walk: 100, 95, ..., 5 (20 attempts).
///
/// # Example
/// ```rust
/// use prism_codec::quality_steps;
///
/// let steps: Vec<u8> = quality_steps().collect();
/// assert_eq!(steps.first(), Some(&100));
/// assert_eq!(steps.last(), Some(&5));
/// assert_eq!(steps.len(), 20);
/// ```
pub fn quality_steps() -> impl Iterator<Item = u8> {
    (QUALITY_MIN..=QUALITY_MAX)
        .rev()
        .step_by(QUALITY_STEP as usize)
}

/// One attempt of a search, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchStep {
    /// Quality step attempted.
    pub quality: u8,
    /// Scaled PSNR measured at this step (`None` for size-only walks).
    pub psnr: Option<f64>,
    /// Compressed payload length at this step.
    pub bytes: usize,
}

/// Per-search step log; the walk is bounded at 20 attempts so this never
/// spills to the heap.
pub type StepLog = SmallVec<[SearchStep; 20]>;

/// Outcome of [`search_by_quality`].
#[derive(Debug, Clone)]
pub struct QualityResult {
    /// Decoded preview at the selected quality step.
    pub preview: Frame,
    /// Selected quality step.
    pub quality: u8,
    /// Scaled PSNR (raw dB / 100) measured at the selected step.
    pub psnr: f64,
    /// Compressed length at the selected step.
    pub compressed_len: usize,
    /// Every attempted step, highest quality first.
    pub steps: StepLog,
}

/// Outcome of [`search_by_size`].
#[derive(Debug, Clone)]
pub struct SizeResult {
    /// The compressed byte stream at the selected step.
    pub payload: Vec<u8>,
    /// Selected quality step.
    pub quality: u8,
    /// Every attempted step, highest quality first.
    pub steps: StepLog,
}

impl SizeResult {
    /// Length of the selected payload.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty (never the case for a successful search).
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Shared descent: walk the quality steps, stop when the predicate breaks,
/// otherwise fall back to the last attempt (quality 5).
fn descend<R>(
    mut attempt: impl FnMut(u8) -> Result<ControlFlow<R, R>, CodecError>,
) -> Result<R, CodecError> {
    let mut best_effort = None;
    for quality in quality_steps() {
        match attempt(quality)? {
            ControlFlow::Break(result) => return Ok(result),
            ControlFlow::Continue(result) => best_effort = Some(result),
        }
    }
    best_effort.ok_or_else(|| CodecError::Encode("quality walk made no attempts".into()))
}

/// Find the first quality step whose fidelity degrades to the given floor.
///
/// At each step the frame is encoded, decoded back, and measured with
/// [`psnr`] under the legacy convention; the measured value is divided by
/// 100 before comparison, so `floor` lives in roughly `0.0..=1.0`. The walk
/// stops at the first step where the scaled PSNR is `<= floor`.
///
/// Two preserved quirks of the behavior this reimplements: identical frames
/// measure 0.0 (not infinity), and because the walk runs from highest
/// fidelity downward it usually halts at quality 100 unless the floor is
/// set unrealistically high.
///
/// Returns the decoded preview at the stopping step, or the quality-5
/// attempt if the floor is never crossed.
pub fn search_by_quality(
    codec: &JpegCodec,
    frame: &Frame,
    floor: f64,
) -> Result<QualityResult, CodecError> {
    let mut steps = StepLog::new();
    let (preview, quality, scaled, compressed_len) = descend(|quality| {
        let bytes = codec.encode(frame, quality)?;
        let preview = codec.decode(&bytes, frame.meta().timestamp)?;
        let scaled = psnr(frame, &preview, PsnrConvention::Legacy)? / 100.0;
        trace!(quality, psnr = scaled, bytes = bytes.len(), "quality walk step");
        steps.push(SearchStep {
            quality,
            psnr: Some(scaled),
            bytes: bytes.len(),
        });
        let attempt = (preview, quality, scaled, bytes.len());
        Ok(if scaled <= floor {
            ControlFlow::Break(attempt)
        } else {
            ControlFlow::Continue(attempt)
        })
    })?;
    Ok(QualityResult {
        preview,
        quality,
        psnr: scaled,
        compressed_len,
        steps,
    })
}

/// Find the highest quality step whose compressed length fits `byte_limit`.
///
/// Same walk as [`search_by_quality`] with a size stop predicate; this
/// variant is monotonic — a larger limit never selects a lower quality
/// step. If even quality 5 does not fit, its stream is returned as the
/// best-effort answer.
pub fn search_by_size(
    codec: &JpegCodec,
    frame: &Frame,
    byte_limit: usize,
) -> Result<SizeResult, CodecError> {
    let mut steps = StepLog::new();
    let (payload, quality) = descend(|quality| {
        let bytes = codec.encode(frame, quality)?;
        trace!(
            quality,
            bytes = bytes.len(),
            limit = byte_limit,
            "size walk step"
        );
        steps.push(SearchStep {
            quality,
            psnr: None,
            bytes: bytes.len(),
        });
        let fits = bytes.len() <= byte_limit;
        let attempt = (bytes, quality);
        Ok(if fits {
            ControlFlow::Break(attempt)
        } else {
            ControlFlow::Continue(attempt)
        })
    })?;
    Ok(SizeResult {
        payload,
        quality,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textured_frame(width: u32, height: u32) -> Frame {
        let res = Resolution::new(width, height).unwrap();
        let mut data = Vec::with_capacity(res.pixels() * RGB24_BYTES_PER_PIXEL);
        for y in 0..height {
            for x in 0..width {
                data.push((x * 7 + y * 3) as u8);
                data.push((x * 2 ^ y * 11) as u8);
                data.push((x + y * 13) as u8);
            }
        }
        Frame::rgb24(res, 0, data)
    }

    #[test]
    fn generous_floor_halts_at_the_first_step() {
        let codec = JpegCodec::new().unwrap();
        let frame = textured_frame(32, 24);
        // Scaled PSNR is well below 1.0 for any lossy encode, so the walk
        // degrades to the floor immediately.
        let result = search_by_quality(&codec, &frame, 1.0).unwrap();
        assert_eq!(result.quality, QUALITY_MAX);
        assert_eq!(result.steps.len(), 1);
        assert!(result.psnr <= 1.0);
        assert_eq!(result.preview.width(), 32);
    }

    #[test]
    fn uncrossable_floor_falls_back_to_minimum_quality() {
        let codec = JpegCodec::new().unwrap();
        let frame = textured_frame(32, 24);
        let result = search_by_quality(&codec, &frame, -1.0).unwrap();
        assert_eq!(result.quality, QUALITY_MIN);
        assert_eq!(result.steps.len(), 20);
        // Steps run from highest quality to lowest.
        assert_eq!(result.steps.first().unwrap().quality, QUALITY_MAX);
        assert_eq!(result.steps.last().unwrap().quality, QUALITY_MIN);
    }

    #[test]
    fn size_search_fits_reachable_limits() {
        let codec = JpegCodec::new().unwrap();
        let frame = textured_frame(48, 48);
        let mid = codec.encode(&frame, 50).unwrap().len();
        let result = search_by_size(&codec, &frame, mid).unwrap();
        assert!(result.len() <= mid);
        assert!(result.quality >= 50);
    }

    #[test]
    fn size_search_is_monotonic_in_the_limit() {
        let codec = JpegCodec::new().unwrap();
        let frame = textured_frame(48, 48);
        let uncompressed = frame.byte_len();
        let mut previous_quality = 0u8;
        for limit in [
            uncompressed / 32,
            uncompressed / 8,
            uncompressed / 2,
            uncompressed,
        ] {
            let result = search_by_size(&codec, &frame, limit).unwrap();
            assert!(result.quality >= previous_quality);
            previous_quality = result.quality;
        }
    }

    #[test]
    fn unreachable_limit_returns_minimum_quality_stream() {
        let codec = JpegCodec::new().unwrap();
        let frame = textured_frame(32, 32);
        let result = search_by_size(&codec, &frame, 1).unwrap();
        assert_eq!(result.quality, QUALITY_MIN);
        assert_eq!(result.steps.len(), 20);
        let floor_len = codec.encode(&frame, QUALITY_MIN).unwrap().len();
        assert_eq!(result.len(), floor_len);
    }

    #[test]
    fn quality_100_fidelity_tops_every_lower_step() {
        let codec = JpegCodec::new().unwrap();
        let frame = textured_frame(32, 32);
        let top = codec.decode(&codec.encode(&frame, 100).unwrap(), 0).unwrap();
        let top_db = psnr(&frame, &top, PsnrConvention::Conventional).unwrap();
        for quality in quality_steps().skip(1) {
            let decoded = codec
                .decode(&codec.encode(&frame, quality).unwrap(), 0)
                .unwrap();
            let db = psnr(&frame, &decoded, PsnrConvention::Conventional).unwrap();
            assert!(
                top_db >= db,
                "quality 100 ({top_db} dB) below quality {quality} ({db} dB)"
            );
        }
    }
}
