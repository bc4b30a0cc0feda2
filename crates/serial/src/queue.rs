//! Bounded byte FIFO with an explicit overflow policy.
//!
//! The legacy images dropped bytes silently on a full queue. Here the policy
//! is chosen at construction and every drop is counted, so a bench operator
//! chasing missing response characters can read the evidence out of
//! [`ByteQueue::dropped`] instead of guessing.

/// What to do with a byte pushed into a full queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OverflowPolicy {
    /// Discard the incoming byte; queued bytes keep their place.
    #[default]
    DropNewest,
    /// Evict the oldest queued byte to admit the incoming one.
    DropOldest,
}

/// Fixed-capacity byte FIFO.
pub struct ByteQueue<const N: usize> {
    fifo: heapless::Deque<u8, N>,
    policy: OverflowPolicy,
    dropped: u32,
}

impl<const N: usize> ByteQueue<N> {
    /// Empty queue with the given overflow policy.
    #[must_use]
    pub fn new(policy: OverflowPolicy) -> Self {
        Self {
            fifo: heapless::Deque::new(),
            policy,
            dropped: 0,
        }
    }

    /// Append a byte, applying the overflow policy when full.
    pub fn push(&mut self, byte: u8) {
        if let Err(rejected) = self.fifo.push_back(byte) {
            self.dropped = self.dropped.saturating_add(1);
            if self.policy == OverflowPolicy::DropOldest {
                self.fifo.pop_front();
                // Readmission cannot fail: a slot was just freed.
                self.fifo.push_back(rejected).ok();
            }
        }
    }

    /// Remove and return the oldest byte.
    pub fn pop(&mut self) -> Option<u8> {
        self.fifo.pop_front()
    }

    /// Queued byte count.
    pub fn len(&self) -> usize {
        self.fifo.len()
    }

    /// `true` when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.fifo.is_empty()
    }

    /// Bytes lost to overflow since construction.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::{ByteQueue, OverflowPolicy};

    #[test]
    fn fifo_order() {
        let mut q: ByteQueue<4> = ByteQueue::new(OverflowPolicy::DropNewest);
        for b in [1, 2, 3] {
            q.push(b);
        }
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.pop(), Some(3));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn drop_newest_keeps_queued_bytes() {
        let mut q: ByteQueue<2> = ByteQueue::new(OverflowPolicy::DropNewest);
        q.push(b'a');
        q.push(b'b');
        q.push(b'c');
        assert_eq!(q.dropped(), 1);
        assert_eq!(q.pop(), Some(b'a'));
        assert_eq!(q.pop(), Some(b'b'));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn drop_oldest_admits_incoming_byte() {
        let mut q: ByteQueue<2> = ByteQueue::new(OverflowPolicy::DropOldest);
        q.push(b'a');
        q.push(b'b');
        q.push(b'c');
        assert_eq!(q.dropped(), 1);
        assert_eq!(q.pop(), Some(b'b'));
        assert_eq!(q.pop(), Some(b'c'));
    }

    #[test]
    fn drop_counter_saturates_rather_than_wraps() {
        let mut q: ByteQueue<1> = ByteQueue::new(OverflowPolicy::DropNewest);
        q.push(0);
        q.dropped = u32::MAX;
        q.push(1);
        assert_eq!(q.dropped(), u32::MAX);
    }
}
