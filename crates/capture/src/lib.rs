#![doc = include_str!("../README.md")]

use prism_core::prelude::*;

pub mod virtual_source;

/// Trait implemented by frame producers feeding the pipeline.
///
/// A source is owned by exactly one capture thread, hence `&mut self`.
/// `next_frame` may block (a real device blocks at its hardware frame rate);
/// returning `None` is terminal and means the device stopped — the capture
/// producer exits and flags the stop, it never polls the source again.
///
/// # Example
/// ```rust
/// use prism_capture::FrameSource;
/// use prism_core::prelude::*;
///
/// struct OneShot(Option<Frame>);
///
/// impl FrameSource for OneShot {
///     fn format(&self) -> MediaFormat {
///         MediaFormat::rgb24(Resolution::new(2, 2).unwrap())
///     }
///     fn next_frame(&mut self) -> Option<Frame> {
///         self.0.take()
///     }
/// }
///
/// let res = Resolution::new(2, 2).unwrap();
/// let mut source = OneShot(Some(Frame::rgb24_filled(res, 0, 1)));
/// assert!(source.next_frame().is_some());
/// assert!(source.next_frame().is_none());
/// ```
pub trait FrameSource: Send {
    /// Format of the frames this source yields.
    fn format(&self) -> MediaFormat;

    /// Pull the next frame; `None` means the device stopped.
    fn next_frame(&mut self) -> Option<Frame>;
}

pub mod prelude {
    pub use crate::{FrameSource, virtual_source::VirtualSource};
    pub use prism_core::prelude::*;
}
