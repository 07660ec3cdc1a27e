//! Fixed-capacity circular byte queue for the serial path.
//!
//! Two instances exist: host→device (bytes received on the CDC OUT
//! endpoint) and device→host (bytes waiting for the CDC IN endpoint).
//! Access is single-producer/single-consumer through `&mut`, so there is
//! no internal locking.
//!
//! Overflow policy is drop-newest: inserting into a full buffer leaves the
//! contents untouched, returns [`Error::BufferOverflow`] and bumps the
//! [`dropped`](RingBuffer::dropped) counter.

use crate::error::{Error, Result};

/// Circular FIFO of `N` bytes with separate read/write cursors.
pub struct RingBuffer<const N: usize> {
    storage: [u8; N],
    /// Next byte to read.
    head: usize,
    /// Next free slot to write.
    tail: usize,
    count: usize,
    dropped: u32,
}

impl<const N: usize> RingBuffer<N> {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            storage: [0; N],
            head: 0,
            tail: 0,
            count: 0,
            dropped: 0,
        }
    }

    /// Append one byte at the tail.
    pub fn insert(&mut self, byte: u8) -> Result<()> {
        if self.is_full() {
            self.dropped = self.dropped.saturating_add(1);
            return Err(Error::BufferOverflow);
        }

        self.storage[self.tail] = byte;
        self.tail = Self::advance(self.tail);
        self.count += 1;
        Ok(())
    }

    /// Append all of `data`, or nothing if it does not fit.
    ///
    /// On overflow every byte of `data` is counted as dropped.
    pub fn try_extend(&mut self, data: &[u8]) -> Result<()> {
        if data.len() > self.free() {
            let lost = u32::try_from(data.len()).unwrap_or(u32::MAX);
            self.dropped = self.dropped.saturating_add(lost);
            return Err(Error::BufferOverflow);
        }

        for &byte in data {
            self.storage[self.tail] = byte;
            self.tail = Self::advance(self.tail);
        }
        self.count += data.len();
        Ok(())
    }

    /// Take the oldest byte, or `None` when the buffer is empty.
    pub fn remove(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }

        let byte = self.storage[self.head];
        self.head = Self::advance(self.head);
        self.count -= 1;
        Some(byte)
    }

    /// Number of unread bytes.
    pub fn count(&self) -> usize {
        self.count
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Free slots left before the buffer is full.
    pub fn free(&self) -> usize {
        N - self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == N
    }

    /// Bytes rejected because the buffer was full (saturating).
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Discard all unread bytes. The dropped counter is kept.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }

    fn advance(index: usize) -> usize {
        (index + 1) % N
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_empty() {
        let rb: RingBuffer<8> = RingBuffer::new();
        assert!(rb.is_empty());
        assert!(!rb.is_full());
        assert_eq!(rb.count(), 0);
        assert_eq!(rb.capacity(), 8);
        assert_eq!(rb.dropped(), 0);
    }

    #[test]
    fn remove_from_empty_returns_none() {
        let mut rb: RingBuffer<4> = RingBuffer::new();
        assert_eq!(rb.remove(), None);
        assert_eq!(rb.count(), 0);
    }

    #[test]
    fn fifo_order_preserved() {
        let mut rb: RingBuffer<8> = RingBuffer::new();
        for b in [1u8, 2, 3, 4] {
            rb.insert(b).unwrap();
        }
        assert_eq!(rb.count(), 4);
        assert_eq!(rb.remove(), Some(1));
        assert_eq!(rb.remove(), Some(2));
        rb.insert(5).unwrap();
        assert_eq!(rb.remove(), Some(3));
        assert_eq!(rb.remove(), Some(4));
        assert_eq!(rb.remove(), Some(5));
        assert!(rb.is_empty());
    }

    #[test]
    fn count_tracks_inserts_minus_removes_across_wrap() {
        let mut rb: RingBuffer<5> = RingBuffer::new();
        let mut next = 0u8;
        let mut expected = 0u8;

        // Interleave so head and tail wrap several times.
        for round in 0..20 {
            let inserts = 1 + round % 4;
            for _ in 0..inserts {
                if !rb.is_full() {
                    rb.insert(next).unwrap();
                    next = next.wrapping_add(1);
                }
            }
            let before = rb.count();
            for _ in 0..2 {
                if let Some(b) = rb.remove() {
                    assert_eq!(b, expected);
                    expected = expected.wrapping_add(1);
                }
            }
            assert_eq!(rb.count(), before.saturating_sub(2));
        }
        assert_eq!(rb.dropped(), 0);
    }

    #[test]
    fn fill_to_capacity_then_drain_returns_inserted_sequence() {
        let mut rb: RingBuffer<128> = RingBuffer::new();
        // Offset the cursors first so the fill crosses the wrap point.
        for _ in 0..77 {
            rb.insert(0xEE).unwrap();
            rb.remove();
        }

        for i in 0..128u8 {
            rb.insert(i.wrapping_mul(3)).unwrap();
        }
        assert!(rb.is_full());

        for i in 0..128u8 {
            assert_eq!(rb.remove(), Some(i.wrapping_mul(3)));
        }
        assert!(rb.is_empty());
    }

    #[test]
    fn insert_into_full_buffer_drops_newest() {
        let mut rb: RingBuffer<128> = RingBuffer::new();
        for i in 0..128u8 {
            rb.insert(i).unwrap();
        }

        // 129th insert
        assert_eq!(rb.insert(0xFF), Err(Error::BufferOverflow));
        assert_eq!(rb.count(), 128);
        assert_eq!(rb.dropped(), 1);

        // Contents are untouched: oldest byte is still first.
        assert_eq!(rb.remove(), Some(0));
        for i in 1..128u8 {
            assert_eq!(rb.remove(), Some(i));
        }
        assert_eq!(rb.remove(), None);
    }

    #[test]
    fn try_extend_is_all_or_nothing() {
        let mut rb: RingBuffer<4> = RingBuffer::new();
        rb.insert(9).unwrap();
        assert_eq!(rb.free(), 3);

        assert_eq!(rb.try_extend(&[1, 2, 3, 4]), Err(Error::BufferOverflow));
        assert_eq!(rb.count(), 1);
        assert_eq!(rb.dropped(), 4);

        rb.try_extend(&[1, 2, 3]).unwrap();
        assert!(rb.is_full());

        let mut out = heapless::Vec::<u8, 4>::new();
        while let Some(b) = rb.remove() {
            out.push(b).unwrap();
        }
        assert_eq!(out.as_slice(), &[9, 1, 2, 3]);
    }

    #[test]
    fn clear_resets_occupancy_but_keeps_drop_count() {
        let mut rb: RingBuffer<2> = RingBuffer::new();
        rb.insert(1).unwrap();
        rb.insert(2).unwrap();
        assert!(rb.insert(3).is_err());

        rb.clear();
        assert!(rb.is_empty());
        assert_eq!(rb.dropped(), 1);
        rb.insert(4).unwrap();
        assert_eq!(rb.remove(), Some(4));
    }
}
