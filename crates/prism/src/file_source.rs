//! Still-image replay source (feature `image`).

use std::{path::PathBuf, thread, time::Duration};

use tracing::warn;

use prism_capture::FrameSource;
use prism_codec::image_io;
use prism_core::prelude::*;

/// Replays image files as frames, looping or one-shot.
///
/// Unreadable files are skipped with a warning; when the playlist is
/// exhausted (one-shot mode) or nothing could be decoded, the source reports
/// device-stopped.
///
/// # Example
/// ```rust,ignore
/// use prism::prelude::*;
///
/// let source = FileSource::new(vec!["scene.png".into()], 30).looping(true);
/// let mut pipeline = Pipeline::start(
///     Box::new(source),
///     JpegCodec::new()?,
///     CompressionTarget::default(),
///     PipelineTunables::default(),
/// );
/// # Ok::<(), prism::codec::CodecError>(())
/// ```
pub struct FileSource {
    paths: Vec<PathBuf>,
    fps: u32,
    loop_forever: bool,
    cursor: usize,
    counter: u64,
    format: MediaFormat,
}

impl FileSource {
    /// Create a source over a playlist, paced at `fps` frames per second.
    pub fn new(paths: Vec<PathBuf>, fps: u32) -> Self {
        // Probe the first readable image for the advertised format; fall back
        // to 1x1 if nothing decodes (the source then stops immediately).
        let format = paths
            .iter()
            .find_map(|p| image_io::load_frame(p, 0).ok())
            .map(|f| f.meta().format)
            .unwrap_or_else(|| {
                MediaFormat::rgb24(Resolution {
                    width: std::num::NonZeroU32::MIN,
                    height: std::num::NonZeroU32::MIN,
                })
            });
        Self {
            paths,
            fps: fps.max(1),
            loop_forever: false,
            cursor: 0,
            counter: 0,
            format,
        }
    }

    /// Restart the playlist when exhausted instead of stopping.
    pub fn looping(mut self, loop_forever: bool) -> Self {
        self.loop_forever = loop_forever;
        self
    }
}

impl FrameSource for FileSource {
    fn format(&self) -> MediaFormat {
        self.format
    }

    fn next_frame(&mut self) -> Option<Frame> {
        let mut misses = 0usize;
        loop {
            // A full pass of unreadable files counts as a stopped device even
            // in looping mode.
            if self.paths.is_empty() || misses >= self.paths.len() {
                return None;
            }
            if self.cursor >= self.paths.len() {
                if !self.loop_forever {
                    return None;
                }
                self.cursor = 0;
            }
            let path = self.paths[self.cursor].clone();
            self.cursor += 1;
            match image_io::load_frame(&path, self.counter) {
                Ok(frame) => {
                    self.counter += 1;
                    thread::sleep(Duration::from_millis(1_000 / self.fps as u64));
                    return Some(frame);
                }
                Err(err) => {
                    misses += 1;
                    warn!(path = %path.display(), error = %err, "skipping unreadable image");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_playlist_stops_immediately() {
        let mut source = FileSource::new(Vec::new(), 30).looping(true);
        assert!(source.next_frame().is_none());
    }

    #[test]
    fn unreadable_files_exhaust_into_stop() {
        let mut source = FileSource::new(vec!["/no/such/image.png".into()], 30);
        assert!(source.next_frame().is_none());
    }

    #[test]
    fn looping_over_unreadable_files_still_stops() {
        let mut source =
            FileSource::new(vec!["/no/a.png".into(), "/no/b.png".into()], 30).looping(true);
        assert!(source.next_frame().is_none());
    }
}
