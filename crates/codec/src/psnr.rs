use prism_core::prelude::*;

use crate::CodecError;

/// How to report PSNR when the two frames are (numerically) identical.
///
/// The original implementation returns 0.0 for identical images, which
/// inverts conventional PSNR semantics (identical images ought to score
/// maximal fidelity). Both behaviors are kept behind a named option rather
/// than silently fixing the quirk; the quality search uses [`Legacy`].
///
/// [`Legacy`]: PsnrConvention::Legacy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PsnrConvention {
    /// Identical frames score 0.0.
    Legacy,
    /// Identical frames score `f64::INFINITY`.
    Conventional,
}

/// Peak signal-to-noise ratio between two RGB24 frames, in dB.
///
/// `10 * log10(255^2 / MSE)`, with MSE the mean squared per-channel pixel
/// difference (channels x pixel count as the denominator). The degenerate
/// near-zero-error case is resolved by `convention`.
///
/// # Example
/// ```rust
/// use prism_codec::{PsnrConvention, psnr};
/// use prism_core::prelude::{Frame, Resolution};
///
/// let res = Resolution::new(4, 4).unwrap();
/// let a = Frame::rgb24_filled(res, 0, 10);
/// let b = Frame::rgb24_filled(res, 0, 12);
/// let db = psnr(&a, &b, PsnrConvention::Conventional)?;
/// assert!(db > 40.0);
/// # Ok::<(), prism_codec::CodecError>(())
/// ```
pub fn psnr(a: &Frame, b: &Frame, convention: PsnrConvention) -> Result<f64, CodecError> {
    let fa = a.meta().format;
    let fb = b.meta().format;
    if fa.code != fb.code {
        return Err(CodecError::FormatMismatch {
            expected: fa.code,
            actual: fb.code,
        });
    }
    if fa.resolution != fb.resolution {
        return Err(CodecError::ResolutionMismatch {
            a_width: fa.resolution.width.get(),
            a_height: fa.resolution.height.get(),
            b_width: fb.resolution.width.get(),
            b_height: fb.resolution.height.get(),
        });
    }

    let width = a.width();
    let height = a.height();
    let row_bytes = width * RGB24_BYTES_PER_PIXEL;
    let mut sse = 0.0f64;
    for y in 0..height {
        let ra = &a.row(y)[..row_bytes];
        let rb = &b.row(y)[..row_bytes];
        for (&pa, &pb) in ra.iter().zip(rb) {
            let diff = pa as f64 - pb as f64;
            sse += diff * diff;
        }
    }

    if sse <= 1e-10 {
        return Ok(match convention {
            PsnrConvention::Legacy => 0.0,
            PsnrConvention::Conventional => f64::INFINITY,
        });
    }
    let mse = sse / (RGB24_BYTES_PER_PIXEL * width * height) as f64;
    Ok(10.0 * ((255.0 * 255.0) / mse).log10())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(value: u8) -> Frame {
        Frame::rgb24_filled(Resolution::new(8, 8).unwrap(), 0, value)
    }

    #[test]
    fn identical_frames_follow_the_selected_convention() {
        let frame = filled(200);
        assert_eq!(psnr(&frame, &frame, PsnrConvention::Legacy).unwrap(), 0.0);
        assert!(
            psnr(&frame, &frame, PsnrConvention::Conventional)
                .unwrap()
                .is_infinite()
        );
    }

    #[test]
    fn uniform_offset_matches_closed_form() {
        // Every channel differs by exactly 5, so MSE == 25 and
        // PSNR == 10 * log10(255^2 / 25).
        let a = filled(100);
        let b = filled(105);
        let expected = 10.0 * ((255.0f64 * 255.0) / 25.0).log10();
        let measured = psnr(&a, &b, PsnrConvention::Legacy).unwrap();
        assert!((measured - expected).abs() < 1e-9);
    }

    #[test]
    fn larger_error_means_lower_psnr() {
        let base = filled(100);
        let near = filled(102);
        let far = filled(140);
        let near_db = psnr(&base, &near, PsnrConvention::Legacy).unwrap();
        let far_db = psnr(&base, &far, PsnrConvention::Legacy).unwrap();
        assert!(near_db > far_db);
    }

    #[test]
    fn mismatched_geometry_is_an_error() {
        let a = filled(1);
        let b = Frame::rgb24_filled(Resolution::new(4, 4).unwrap(), 0, 1);
        assert!(matches!(
            psnr(&a, &b, PsnrConvention::Legacy),
            Err(CodecError::ResolutionMismatch { .. })
        ));
    }
}
