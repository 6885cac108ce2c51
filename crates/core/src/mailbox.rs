use std::sync::Arc;

use parking_lot::RwLock;

/// Latest-value mailbox slot: "newest wins", no queuing, no backpressure.
///
/// `publish` overwrites the slot while holding the lock for the whole copy;
/// `snapshot` clones the current contents out under the same lock, so readers
/// always observe a fully-formed value. A snapshot before the first publish
/// yields `None`. Writers never wait for readers; intermediate values are
/// silently dropped when a reader polls slower than the writer publishes.
///
/// # Example
/// ```rust
/// use prism_core::prelude::Latest;
///
/// let slot = Latest::new();
/// assert!(slot.snapshot().is_none());
/// slot.publish(42u8);
/// assert_eq!(slot.snapshot(), Some(42));
/// ```
pub struct Latest<T> {
    slot: Arc<RwLock<Option<T>>>,
}

impl<T: Clone> Latest<T> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self {
            slot: Arc::new(RwLock::new(None)),
        }
    }

    /// Overwrite the slot with the newest value.
    pub fn publish(&self, value: T) {
        *self.slot.write() = Some(value);
    }

    /// Copy out the current contents, if any.
    pub fn snapshot(&self) -> Option<T> {
        self.slot.read().as_ref().cloned()
    }

    /// Whether nothing has been published yet (or the slot was cleared).
    pub fn is_empty(&self) -> bool {
        self.slot.read().is_none()
    }
}

impl<T: Clone> Default for Latest<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Latest<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_identical_to_published_value() {
        let slot = Latest::new();
        let value = vec![1u8, 2, 3, 4];
        slot.publish(value.clone());
        assert_eq!(slot.snapshot(), Some(value.clone()));
        // No intervening publish: repeated snapshots stay identical.
        assert_eq!(slot.snapshot(), Some(value));
    }

    #[test]
    fn empty_before_first_publish() {
        let slot: Latest<u32> = Latest::new();
        assert!(slot.is_empty());
        assert_eq!(slot.snapshot(), None);
    }

    #[test]
    fn newest_value_wins() {
        let slot = Latest::new();
        for i in 0..10u32 {
            slot.publish(i);
        }
        assert_eq!(slot.snapshot(), Some(9));
    }

    #[test]
    fn handles_share_one_slot() {
        let a = Latest::new();
        let b = a.clone();
        a.publish("frame");
        assert_eq!(b.snapshot(), Some("frame"));
    }
}
