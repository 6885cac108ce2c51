//! Small image-analysis helpers: luma, threshold centroid, cross overlay.
//!
//! These are the tracking utilities the presentation loop can hook in front
//! of the raw preview.

use prism_core::prelude::*;

const CROSS_THICKNESS: usize = 3;
const CROSS_COLOR: [u8; 3] = [255, 0, 0];

/// Per-pixel luma (BT.601 integer approximation).
pub fn luma(frame: &Frame) -> Vec<u8> {
    let width = frame.width();
    let height = frame.height();
    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        let row = frame.row(y);
        for x in 0..width {
            let i = x * RGB24_BYTES_PER_PIXEL;
            let r = row[i] as u32;
            let g = row[i + 1] as u32;
            let b = row[i + 2] as u32;
            out.push(((299 * r + 587 * g + 114 * b) / 1000) as u8);
        }
    }
    out
}

/// Normalized centroid of the pixels whose luma falls in `[lo, hi]`.
///
/// Zeroth/first image moments over the threshold mask, divided by the frame
/// dimensions, so both coordinates land in `0.0..=1.0`. `None` when no pixel
/// matches.
///
/// # Example
/// ```rust
/// use prism::vision::centroid_normalized;
/// use prism_core::prelude::{Frame, Resolution};
///
/// // One bright pixel at the center of a dark frame.
/// let res = Resolution::new(9, 9).unwrap();
/// let mut frame = Frame::rgb24_filled(res, 0, 0);
/// let stride = frame.stride();
/// frame.data_mut()[4 * stride + 4 * 3..4 * stride + 4 * 3 + 3].fill(255);
///
/// let (cx, cy) = centroid_normalized(&frame, 200, 255).unwrap();
/// assert!((cx - 4.0 / 9.0).abs() < 1e-6);
/// assert!((cy - 4.0 / 9.0).abs() < 1e-6);
/// ```
pub fn centroid_normalized(frame: &Frame, lo: u8, hi: u8) -> Option<(f32, f32)> {
    let width = frame.width();
    let height = frame.height();
    let luma = luma(frame);
    let mut count = 0u64;
    let mut sum_x = 0u64;
    let mut sum_y = 0u64;
    for y in 0..height {
        for x in 0..width {
            let v = luma[y * width + x];
            if v >= lo && v <= hi {
                count += 1;
                sum_x += x as u64;
                sum_y += y as u64;
            }
        }
    }
    if count == 0 {
        return None;
    }
    Some((
        (sum_x as f32 / count as f32) / width as f32,
        (sum_y as f32 / count as f32) / height as f32,
    ))
}

/// Draw a red cross at a normalized center point.
///
/// The center is clamped into `0.0..=1.0` and the size into
/// `1..=min(width, height)` before drawing, so out-of-range inputs mark the
/// nearest edge instead of being dropped.
pub fn draw_cross_normalized(frame: &mut Frame, center: (f32, f32), size: u32) {
    let width = frame.width();
    let height = frame.height();
    let cx = (center.0.clamp(0.0, 1.0) * width as f32) as usize;
    let cy = (center.1.clamp(0.0, 1.0) * height as f32) as usize;
    let size = (size as usize).clamp(1, width.min(height));
    let half = size / 2;

    // Horizontal arm.
    for y in cy.saturating_sub(CROSS_THICKNESS / 2)..=(cy + CROSS_THICKNESS / 2) {
        for x in cx.saturating_sub(half)..=(cx + half) {
            put_pixel(frame, x, y);
        }
    }
    // Vertical arm.
    for y in cy.saturating_sub(half)..=(cy + half) {
        for x in cx.saturating_sub(CROSS_THICKNESS / 2)..=(cx + CROSS_THICKNESS / 2) {
            put_pixel(frame, x, y);
        }
    }
}

fn put_pixel(frame: &mut Frame, x: usize, y: usize) {
    let width = frame.width();
    let height = frame.height();
    if x >= width || y >= height {
        return;
    }
    let stride = frame.stride();
    let i = y * stride + x * RGB24_BYTES_PER_PIXEL;
    frame.data_mut()[i..i + RGB24_BYTES_PER_PIXEL].copy_from_slice(&CROSS_COLOR);
}
