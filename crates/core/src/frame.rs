use crate::format::{MediaFormat, Resolution};

/// Bytes per pixel of the packed RGB24 working format.
pub const RGB24_BYTES_PER_PIXEL: usize = 3;

/// Metadata associated with a frame.
///
/// # Example
/// ```rust
/// use prism_core::prelude::{FrameMeta, MediaFormat, Resolution};
///
/// let fmt = MediaFormat::rgb24(Resolution::new(640, 480).unwrap());
/// let meta = FrameMeta::new(fmt, 123);
/// assert_eq!(meta.timestamp, 123);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMeta {
    /// Format describing layout and resolution.
    pub format: MediaFormat,
    /// Timestamp in ticks (caller-defined; synthetic sources use a counter).
    pub timestamp: u64,
}

impl FrameMeta {
    /// Create metadata with the given format and timestamp.
    pub fn new(format: MediaFormat, timestamp: u64) -> Self {
        Self { format, timestamp }
    }
}

/// Owned RGB24 pixel buffer.
///
/// Frames are immutable once published into a mailbox slot; stages copy them
/// across the boundary rather than sharing, so `Clone` is the hand-off
/// primitive.
///
/// # Example
/// ```rust
/// use prism_core::prelude::{Frame, Resolution};
///
/// let res = Resolution::new(4, 2).unwrap();
/// let frame = Frame::rgb24(res, 0, vec![0; 4 * 2 * 3]);
/// assert_eq!(frame.stride(), 12);
/// assert_eq!(frame.row(1).len(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    meta: FrameMeta,
    stride: usize,
    data: Vec<u8>,
}

impl Frame {
    /// Build a packed RGB24 frame; `data` is resized (zero-filled or
    /// truncated) to exactly `width * 3 * height` bytes.
    pub fn rgb24(resolution: Resolution, timestamp: u64, mut data: Vec<u8>) -> Self {
        let stride = resolution.width.get() as usize * RGB24_BYTES_PER_PIXEL;
        data.resize(stride * resolution.height.get() as usize, 0);
        Self {
            meta: FrameMeta::new(MediaFormat::rgb24(resolution), timestamp),
            stride,
            data,
        }
    }

    /// A uniformly filled RGB24 frame.
    pub fn rgb24_filled(resolution: Resolution, timestamp: u64, value: u8) -> Self {
        let stride = resolution.width.get() as usize * RGB24_BYTES_PER_PIXEL;
        let data = vec![value; stride * resolution.height.get() as usize];
        Self::rgb24(resolution, timestamp, data)
    }

    /// Metadata describing this frame.
    pub fn meta(&self) -> &FrameMeta {
        &self.meta
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.meta.format.resolution.width.get() as usize
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.meta.format.resolution.height.get() as usize
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Raw pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable pixel bytes, for in-place overlays.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// One row of pixels. Rows past the frame height yield an empty slice.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        let end = start + self.stride;
        self.data.get(start..end).unwrap_or(&[])
    }

    /// Uncompressed payload size in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb24_normalizes_payload_length() {
        let res = Resolution::new(3, 2).unwrap();
        let short = Frame::rgb24(res, 0, vec![7; 4]);
        assert_eq!(short.byte_len(), 3 * 2 * 3);
        assert_eq!(&short.data()[..4], &[7, 7, 7, 7]);
        assert_eq!(short.data()[4], 0);

        let long = Frame::rgb24(res, 0, vec![1; 100]);
        assert_eq!(long.byte_len(), 3 * 2 * 3);
    }

    #[test]
    fn rows_are_stride_sized() {
        let res = Resolution::new(2, 2).unwrap();
        let frame = Frame::rgb24_filled(res, 9, 5);
        assert_eq!(frame.row(0), &[5; 6]);
        assert_eq!(frame.row(1), &[5; 6]);
        assert!(frame.row(2).is_empty());
        assert_eq!(frame.meta().timestamp, 9);
    }
}
