//! Off-target test helpers, enabled by the `std` feature.
//!
//! None of this belongs in the `no_std` engine proper; it exists so unit
//! and integration tests can assert on the upward event stream without
//! hand-rolling a capturing sink in every test module.

use std::vec::Vec;

use crate::hal::FrameSink;

/// One call recorded by [`VecSink`], in delivery order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Start,
    Byte(u8),
    LostSync,
    Rssi(u8),
    End,
}

/// A [`FrameSink`] that records every call for later inspection.
#[derive(Default)]
pub struct VecSink {
    pub events: Vec<Event>,
}

impl VecSink {
    pub fn new() -> Self {
        VecSink { events: Vec::new() }
    }

    /// Just the decoded data bytes, in order, ignoring frame boundaries.
    pub fn bytes(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Byte(b) => Some(*b),
                _ => None,
            })
            .collect()
    }
}

impl FrameSink for VecSink {
    fn frame_start(&mut self) {
        self.events.push(Event::Start);
    }

    fn frame_byte(&mut self, byte: u8) {
        self.events.push(Event::Byte(byte));
    }

    fn frame_lost_sync(&mut self) {
        self.events.push(Event::LostSync);
    }

    fn frame_rssi(&mut self, rssi: u8) {
        self.events.push(Event::Rssi(rssi));
    }

    fn frame_end(&mut self) {
        self.events.push(Event::End);
    }
}
