//! Double-buffered edge-interval log.
//!
//! While the decoder works through one byte's worth of captured intervals,
//! the edge-capture path must already be filling the other buffer for the
//! next byte. `EdgeLog` models that hand-off as a tiny single-producer /
//! single-consumer ring of capacity two: the `active` index says which
//! buffer the producer is writing, and the consumer always reads the other
//! one. Flipping `active` is the one thing that has to be visible to both
//! sides in order, so it goes through an atomic rather than a plain field.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::timing::MAX_EDGE;

pub(crate) struct EdgeLog {
    buf: [[u8; MAX_EDGE]; 2],
    len: [u8; 2],
    active: AtomicU8,
}

impl EdgeLog {
    pub(crate) const fn new() -> Self {
        EdgeLog {
            buf: [[0; MAX_EDGE]; 2],
            len: [0, 0],
            active: AtomicU8::new(0),
        }
    }

    pub(crate) fn reset(&mut self) {
        self.len = [0, 0];
        self.active.store(0, Ordering::Release);
    }

    fn active_idx(&self) -> usize {
        self.active.load(Ordering::Acquire) as usize
    }

    /// Append one interval to the buffer currently being written.
    ///
    /// Returns `false` (without writing) if the buffer is already full; the
    /// caller treats that as a byte-synchronization loss.
    pub(crate) fn push(&mut self, interval: u8) -> bool {
        let idx = self.active_idx();
        let len = self.len[idx] as usize;
        if len >= MAX_EDGE {
            return false;
        }
        self.buf[idx][len] = interval;
        self.len[idx] = (len + 1) as u8;
        true
    }

    /// Close out the buffer currently being written and hand it to the
    /// consumer, flipping which buffer the producer uses next.
    pub(crate) fn commit_and_swap(&mut self) {
        let idx = self.active_idx();
        self.len[1 - idx] = 0;
        self.active.fetch_xor(1, Ordering::AcqRel);
    }

    /// The buffer *not* currently being written: the oldest committed one,
    /// ready for the decoder.
    pub(crate) fn committed(&self) -> &[u8] {
        let idx = self.active_idx();
        let other = 1 - idx;
        &self.buf[other][..self.len[other] as usize]
    }
}
