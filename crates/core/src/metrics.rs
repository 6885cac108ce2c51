use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use parking_lot::Mutex;

const DEFAULT_WINDOW: usize = 120;

/// Rolling timing metrics for a pipeline stage.
///
/// # Example
/// ```rust
/// use prism_core::prelude::StageMetrics;
///
/// let metrics = StageMetrics::default();
/// metrics.record(std::time::Duration::from_millis(5));
/// assert!(metrics.total_samples() >= 1);
/// ```
#[derive(Default, Clone)]
pub struct StageMetrics {
    inner: Arc<StageState>,
}

#[derive(Default)]
struct StageState {
    count: AtomicU64,
    last_nanos: AtomicU64,
    window: Mutex<WindowState>,
}

struct WindowState {
    samples: VecDeque<(Instant, u64)>,
    max: usize,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            samples: VecDeque::new(),
            max: DEFAULT_WINDOW,
        }
    }
}

impl StageMetrics {
    /// Record a single duration sample.
    pub fn record(&self, dur: Duration) {
        let nanos = dur.as_nanos().min(u64::MAX as u128) as u64;
        self.inner.count.fetch_add(1, Ordering::Relaxed);
        self.inner.last_nanos.store(nanos, Ordering::Relaxed);
        let mut win = self.inner.window.lock();
        if win.max == 0 {
            win.max = DEFAULT_WINDOW;
        }
        win.samples.push_back((Instant::now(), nanos));
        while win.samples.len() > win.max {
            win.samples.pop_front();
        }
    }

    /// Change the window size used for rolling averages/fps. Minimum of 1.
    pub fn set_window_size(&self, window: usize) {
        let window = window.max(1);
        let mut win = self.inner.window.lock();
        win.max = window;
        while win.samples.len() > win.max {
            win.samples.pop_front();
        }
    }

    /// Samples within the current window.
    pub fn samples(&self) -> u64 {
        self.inner.window.lock().samples.len() as u64
    }

    /// Total samples recorded over the lifetime.
    pub fn total_samples(&self) -> u64 {
        self.inner.count.load(Ordering::Relaxed)
    }

    /// Rolling average of samples in milliseconds.
    pub fn avg_millis(&self) -> Option<f64> {
        let win = self.inner.window.lock();
        let count = win.samples.len();
        if count == 0 {
            return None;
        }
        let total: u128 = win.samples.iter().map(|(_, n)| *n as u128).sum();
        Some(total as f64 / 1_000_000.0 / count as f64)
    }

    /// Most recent sample in milliseconds.
    pub fn last_millis(&self) -> Option<f64> {
        let last = self.inner.last_nanos.load(Ordering::Relaxed);
        if last == 0 {
            None
        } else {
            Some(last as f64 / 1_000_000.0)
        }
    }

    /// Rolling samples-per-second based on sample timestamps.
    pub fn fps(&self) -> Option<f64> {
        let win = self.inner.window.lock();
        if win.samples.len() < 2 {
            return None;
        }
        let first = win.samples.front()?.0;
        let last = win.samples.back()?.0;
        let span = last.saturating_duration_since(first).as_secs_f64();
        if span > 0.0 {
            Some(win.samples.len() as f64 / span)
        } else {
            None
        }
    }
}
