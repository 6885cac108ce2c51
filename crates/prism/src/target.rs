//! Live-tunable compression target shared between the presentation loop and
//! the encode worker.

use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};

/// Lower bound of the target ratio.
pub const TARGET_MIN: f32 = 0.0;
/// Upper bound of the target ratio.
pub const TARGET_MAX: f32 = 1.0;
/// Step applied per raise/lower event.
pub const TARGET_STEP: f32 = 0.05;

/// Compression target as a ratio in `[0.0, 1.0]`, coarse step 0.05.
///
/// Single writer (the presentation loop), multiple relaxed readers (the
/// encode worker picks the value up on its *next* search); the value is a
/// word-sized atomic, so a stale read is benign and never corrupts state.
///
/// The encode worker interprets the ratio as a scaled-PSNR floor
/// ([`psnr_floor`]); size-driven callers convert it to a byte limit relative
/// to the uncompressed frame size ([`byte_limit`]).
///
/// [`psnr_floor`]: CompressionTarget::psnr_floor
/// [`byte_limit`]: CompressionTarget::byte_limit
///
/// # Example
/// ```rust
/// use prism::target::{CompressionTarget, TARGET_MAX};
///
/// let target = CompressionTarget::new(0.95);
/// target.raise();
/// target.raise();
/// assert_eq!(target.get(), TARGET_MAX);
/// ```
#[derive(Clone, Debug)]
pub struct CompressionTarget {
    bits: Arc<AtomicU32>,
}

impl CompressionTarget {
    /// Create a target at `initial`, clamped into range.
    pub fn new(initial: f32) -> Self {
        let target = Self {
            bits: Arc::new(AtomicU32::new(0)),
        };
        target.set(initial);
        target
    }

    /// Current ratio.
    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Overwrite the ratio, clamped into `[0.0, 1.0]`.
    pub fn set(&self, value: f32) {
        let clamped = value.clamp(TARGET_MIN, TARGET_MAX);
        self.bits.store(clamped.to_bits(), Ordering::Relaxed);
    }

    /// Raise by one step; saturates at the maximum.
    pub fn raise(&self) {
        self.set(self.get() + TARGET_STEP);
    }

    /// Lower by one step; saturates at the minimum.
    pub fn lower(&self) {
        self.set(self.get() - TARGET_STEP);
    }

    /// The ratio read as a scaled-PSNR floor for the quality search.
    pub fn psnr_floor(&self) -> f64 {
        self.get() as f64
    }

    /// The ratio converted to a byte limit against an uncompressed size.
    pub fn byte_limit(&self, uncompressed_len: usize) -> usize {
        (self.get() as f64 * uncompressed_len as f64).round() as usize
    }
}

impl Default for CompressionTarget {
    fn default() -> Self {
        Self::new(0.35)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_saturates_at_the_maximum() {
        let target = CompressionTarget::new(0.9);
        for _ in 0..50 {
            target.raise();
        }
        assert_eq!(target.get(), TARGET_MAX);
    }

    #[test]
    fn lower_saturates_at_the_minimum() {
        let target = CompressionTarget::new(0.1);
        for _ in 0..50 {
            target.lower();
        }
        assert_eq!(target.get(), TARGET_MIN);
    }

    #[test]
    fn constructor_clamps() {
        assert_eq!(CompressionTarget::new(7.0).get(), TARGET_MAX);
        assert_eq!(CompressionTarget::new(-7.0).get(), TARGET_MIN);
    }

    #[test]
    fn byte_limit_scales_the_uncompressed_size() {
        let target = CompressionTarget::new(0.5);
        assert_eq!(target.byte_limit(1000), 500);
        assert_eq!(target.byte_limit(0), 0);
    }

    #[test]
    fn clones_share_the_value() {
        let target = CompressionTarget::new(0.2);
        let worker_view = target.clone();
        target.raise();
        assert!((worker_view.get() - 0.25).abs() < 1e-6);
    }
}
