#![doc = include_str!("../README.md")]

use std::io::Cursor;

use jpeg_decoder::PixelFormat;
use prism_core::prelude::*;

#[cfg(feature = "image")]
pub mod image_io;
mod psnr;
mod search;

pub use psnr::{PsnrConvention, psnr};
pub use search::{
    QUALITY_MAX, QUALITY_MIN, QUALITY_STEP, QualityResult, SearchStep, SizeResult, StepLog,
    quality_steps, search_by_quality, search_by_size,
};

/// Errors emitted by the codec and the search engine.
///
/// # Example
/// ```rust
/// use prism_codec::CodecError;
/// use prism_core::prelude::FourCc;
///
/// let err = CodecError::FormatMismatch {
///     expected: FourCc::new(*b"RG24"),
///     actual: FourCc::new(*b"MJPG"),
/// };
/// assert!(matches!(err, CodecError::FormatMismatch { .. }));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// JPEG support is broken in this build; fatal, never retried.
    #[error("jpeg codec unavailable: {0}")]
    Unavailable(String),
    /// Encoder-side failure detail.
    #[error("jpeg encode failed: {0}")]
    Encode(String),
    /// Decoder-side failure detail.
    #[error("jpeg decode failed: {0}")]
    Decode(String),
    /// Input did not match the expected FourCc.
    #[error("format mismatch: expected {expected}, got {actual}")]
    FormatMismatch {
        /// Expected input FourCc.
        expected: FourCc,
        /// Actual FourCc encountered.
        actual: FourCc,
    },
    /// The two frames being compared differ in geometry.
    #[error("resolution mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    ResolutionMismatch {
        a_width: u32,
        a_height: u32,
        b_width: u32,
        b_height: u32,
    },
}

/// JPEG encode/decode over RGB24 frames.
///
/// The constructor probes the codec with a tiny frame once; an unavailable
/// encoder is fatal at startup, matching the precondition the pipeline
/// assumes everywhere else.
///
/// # Example
/// ```rust
/// use prism_codec::JpegCodec;
/// use prism_core::prelude::{Frame, Resolution};
///
/// let codec = JpegCodec::new()?;
/// let frame = Frame::rgb24_filled(Resolution::new(8, 8).unwrap(), 0, 128);
/// let bytes = codec.encode(&frame, 80)?;
/// let decoded = codec.decode(&bytes, frame.meta().timestamp)?;
/// assert_eq!(decoded.width(), 8);
/// # Ok::<(), prism_codec::CodecError>(())
/// ```
pub struct JpegCodec {
    _probed: (),
}

impl JpegCodec {
    /// Probe the JPEG path once and return a ready codec.
    pub fn new() -> Result<Self, CodecError> {
        let probe = Frame::rgb24_filled(
            Resolution::new(1, 1).ok_or_else(|| {
                CodecError::Unavailable("probe resolution rejected".into())
            })?,
            0,
            0,
        );
        let codec = Self { _probed: () };
        let bytes = codec
            .encode(&probe, QUALITY_MAX)
            .map_err(|e| CodecError::Unavailable(e.to_string()))?;
        codec
            .decode(&bytes, 0)
            .map_err(|e| CodecError::Unavailable(e.to_string()))?;
        Ok(codec)
    }

    /// Encode a frame at the given quality step (clamped to 1..=100).
    pub fn encode(&self, frame: &Frame, quality: u8) -> Result<Vec<u8>, CodecError> {
        let expected = FourCc::new(*b"RG24");
        let actual = frame.meta().format.code;
        if actual != expected {
            return Err(CodecError::FormatMismatch { expected, actual });
        }
        let width = frame.width();
        let height = frame.height();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width, height);
        comp.set_quality(quality.clamp(1, 100) as f32);
        let mut dest = comp
            .start_compress(Vec::new())
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        for y in 0..height {
            let row = frame.row(y);
            dest.write_scanlines(&row[..width * RGB24_BYTES_PER_PIXEL])
                .map_err(|e| CodecError::Encode(e.to_string()))?;
        }
        dest.finish().map_err(|e| CodecError::Encode(e.to_string()))
    }

    /// Decode a JPEG byte stream into an RGB24 frame stamped with `timestamp`.
    pub fn decode(&self, bytes: &[u8], timestamp: u64) -> Result<Frame, CodecError> {
        let mut decoder = jpeg_decoder::Decoder::new(Cursor::new(bytes));
        let pixels = decoder
            .decode()
            .map_err(|e| CodecError::Decode(e.to_string()))?;
        let info = decoder
            .info()
            .ok_or_else(|| CodecError::Decode("missing jpeg header info".into()))?;
        if info.pixel_format != PixelFormat::RGB24 {
            return Err(CodecError::Decode(format!(
                "unsupported jpeg pixel format {:?}",
                info.pixel_format
            )));
        }
        let resolution = Resolution::new(info.width as u32, info.height as u32)
            .ok_or_else(|| CodecError::Decode("zero-sized jpeg".into()))?;
        Ok(Frame::rgb24(resolution, timestamp, pixels))
    }
}

pub mod prelude {
    pub use crate::{
        CodecError, JpegCodec, PsnrConvention, QualityResult, SearchStep, SizeResult, psnr,
        quality_steps, search_by_quality, search_by_size,
    };
    pub use prism_core::prelude::*;
}
