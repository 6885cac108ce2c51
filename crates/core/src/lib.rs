#![doc = include_str!("../README.md")]

pub mod cancel;
pub mod format;
pub mod frame;
pub mod mailbox;
pub mod metrics;

pub mod prelude {
    pub use crate::{
        cancel::CancelToken,
        format::{FourCc, MediaFormat, Resolution},
        frame::{Frame, FrameMeta, RGB24_BYTES_PER_PIXEL},
        mailbox::Latest,
        metrics::StageMetrics,
    };
}
