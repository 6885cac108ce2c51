#![doc = include_str!("../README.md")]

pub mod exchange;
#[cfg(feature = "image")]
pub mod file_source;
pub mod pipeline;
pub mod present;
#[cfg(feature = "preview-window")]
pub mod preview;
pub mod target;
pub mod tunables;
pub mod vision;

pub use prism_capture as capture;
pub use prism_codec as codec;
pub use prism_core as core;

pub mod prelude {
    pub use crate::exchange::{EncodedPreview, FrameExchange};
    #[cfg(feature = "image")]
    pub use crate::file_source::FileSource;
    pub use crate::pipeline::{Pipeline, PipelineMetrics};
    pub use crate::present::{
        DisplaySink, InputEvent, InputPoll, PresentError, PresentLoop, PresentOutcome,
    };
    #[cfg(feature = "preview-window")]
    pub use crate::preview::PreviewUi;
    pub use crate::target::{CompressionTarget, TARGET_MAX, TARGET_MIN, TARGET_STEP};
    pub use crate::tunables::PipelineTunables;
    pub use prism_capture::prelude::*;
    pub use prism_codec::prelude::*;
    #[allow(unused_imports)]
    pub use prism_core::prelude::*;
}
