//! Conversions between image files and RGB24 frames (feature `image`).

use std::path::Path;

use prism_core::prelude::*;

use crate::CodecError;

/// Load an image file (JPG, PNG, ...) into an RGB24 frame.
///
/// # Example
/// ```rust,ignore
/// use prism_codec::image_io::load_frame;
///
/// let frame = load_frame("scene.png", 0)?;
/// println!("{}x{}", frame.width(), frame.height());
/// # Ok::<(), prism_codec::CodecError>(())
/// ```
pub fn load_frame(path: impl AsRef<Path>, timestamp: u64) -> Result<Frame, CodecError> {
    let img = image::open(path.as_ref()).map_err(|e| CodecError::Decode(e.to_string()))?;
    frame_from_image(&img, timestamp)
}

/// Convert a decoded image into an RGB24 frame.
pub fn frame_from_image(img: &image::DynamicImage, timestamp: u64) -> Result<Frame, CodecError> {
    let rgb = img.to_rgb8();
    let resolution = Resolution::new(rgb.width(), rgb.height())
        .ok_or_else(|| CodecError::Decode("zero-sized image".into()))?;
    Ok(Frame::rgb24(resolution, timestamp, rgb.into_raw()))
}

/// Convert a frame back into an `image` buffer, e.g. to write it to disk.
pub fn frame_to_image(frame: &Frame) -> Result<image::RgbImage, CodecError> {
    image::RgbImage::from_raw(
        frame.width() as u32,
        frame.height() as u32,
        frame.data().to_vec(),
    )
    .ok_or_else(|| CodecError::Encode("frame payload shorter than its geometry".into()))
}
