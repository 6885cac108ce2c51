//! Caller-owned pipeline tunables.

use std::time::Duration;

/// Tunables for the worker loops, passed into [`Pipeline::start`].
///
/// Plain values owned by the caller — there is deliberately no process-wide
/// configuration state.
///
/// [`Pipeline::start`]: crate::pipeline::Pipeline::start
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use prism::tunables::PipelineTunables;
///
/// let tunables = PipelineTunables::default()
///     .encode_min_interval(Duration::from_millis(10))
///     .metrics_window(60);
/// assert_eq!(tunables.metrics_window, 60);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineTunables {
    /// Minimum duration of one encode iteration. Zero (the default) keeps the
    /// worker unthrottled; a non-zero value bounds CPU use at the cost of
    /// preview latency, never correctness.
    pub encode_min_interval: Duration,
    /// Sleep applied when the encode worker finds the raw slot empty, so it
    /// does not spin before the first capture.
    pub empty_poll: Duration,
    /// Rolling window (samples) for stage metrics.
    pub metrics_window: usize,
}

impl Default for PipelineTunables {
    fn default() -> Self {
        Self {
            encode_min_interval: Duration::ZERO,
            empty_poll: Duration::from_millis(1),
            metrics_window: 120,
        }
    }
}

impl PipelineTunables {
    /// Override the minimum encode iteration duration.
    pub fn encode_min_interval(mut self, interval: Duration) -> Self {
        self.encode_min_interval = interval;
        self
    }

    /// Override the empty-slot poll sleep.
    pub fn empty_poll(mut self, poll: Duration) -> Self {
        self.empty_poll = poll;
        self
    }

    /// Override the metrics window size.
    pub fn metrics_window(mut self, window: usize) -> Self {
        self.metrics_window = window;
        self
    }

    pub(crate) fn sanitized(self) -> Self {
        Self {
            metrics_window: self.metrics_window.max(1),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_floors_the_metrics_window() {
        let tunables = PipelineTunables::default().metrics_window(0).sanitized();
        assert_eq!(tunables.metrics_window, 1);
    }
}
