//! Shared synthetic-channel helpers for the integration tests.
//!
//! `encode` drives a bare `TxEngine` to produce the edge trace a real
//! transmitter would put on the wire; `decode_trace` feeds that trace (with
//! optional jitter) into a bare `RxEngine`, the same way a capture-pin
//! interrupt would. Encoder and decoder are deliberately two independent
//! engines: a radio can't receive its own transmission, so a single
//! `FrameEngine` never plays both roles at once.

use rf_frame_link::testing::VecSink;
use rf_frame_link::timing::ONE_BIT;
use rf_frame_link::{BitOrder, Level, MessageSource, MsbFirst, RadioControl, RxEngine, TxEngine, TxState};

/// Serves one message body, one byte at a time, to a `TxEngine`.
pub struct BodySource {
    body: Vec<u8>,
    pos: usize,
}

impl BodySource {
    pub fn new(body: &[u8]) -> Self {
        BodySource { body: body.to_vec(), pos: 0 }
    }
}

impl MessageSource for BodySource {
    type Message = ();

    fn poll_outbound(&mut self) -> nb::Result<(), core::convert::Infallible> {
        Err(nb::Error::WouldBlock)
    }

    fn next_byte(&mut self, _msg: &mut ()) -> Option<u8> {
        let byte = self.body.get(self.pos).copied();
        if byte.is_some() {
            self.pos += 1;
        }
        byte
    }

    fn message_sent(&mut self, _msg: ()) {}
}

/// Drive a throwaway `TxEngine` over `body` and record every line
/// transition as `(level, cumulative_tick)`, ticks measured from the very
/// first bit-clock tick. Stops once TX reaches `Done`.
pub fn encode(body: &[u8]) -> Vec<(Level, u16)> {
    let mut tx = TxEngine::<MsbFirst, ()>::new();
    tx.set_message(());
    tx.enable();
    let mut source = BodySource::new(body);

    let mut trace = Vec::new();
    let mut time: i64 = 0;
    let mut last_level = Level::High;

    for _ in 0..5000 {
        let level = tx.on_bit_tick(&mut source);
        time += ONE_BIT as i64;
        if level != last_level {
            trace.push((level, time as u16));
            last_level = level;
        }
        if tx.state() == TxState::Done {
            break;
        }
    }
    trace
}

/// Feed `trace` into a fresh `RxEngine`, decoding byte boundaries as they're
/// committed. `edge_jitter` nudges every timestamp by `+edge_jitter` ticks
/// on even-numbered edges and `-edge_jitter` on odd ones.
pub fn decode_trace<B: BitOrder>(trace: &[(Level, u16)], edge_jitter: i32) -> (RxEngine<B>, VecSink) {
    let mut rx = RxEngine::<B>::new();
    rx.enable();
    let mut sink = VecSink::new();

    for (i, &(level, time)) in trace.iter().enumerate() {
        let jitter = if edge_jitter == 0 {
            0
        } else if i % 2 == 0 {
            edge_jitter
        } else {
            -edge_jitter
        };
        let observed = (time as i64 + jitter as i64).clamp(0, u16::MAX as i64) as u16;
        rx.on_edge(level, observed, 0, &mut sink);
        if rx.byte_ready() {
            rx.decode_pending_byte(&mut sink);
        }
    }
    (rx, sink)
}

/// Build the raw bit-level edge trace for `bytes` sent back-to-back with no
/// frame-level preamble, sync word, or training -- just start/data/stop
/// framing straight from an idle-mark line. Used for boundary scenarios
/// that start mid-protocol (e.g. a sync word with no preceding preamble).
pub fn manual_trace(bytes: &[u8]) -> Vec<(Level, u16)> {
    manual_trace_with_stops(&bytes.iter().map(|&b| (b, 1)).collect::<Vec<_>>())
}

/// Like [`manual_trace`], but each byte carries its own stop-bit width in
/// bit periods (normally 1) so tests can construct extended or overlong
/// stop bits.
pub fn manual_trace_with_stops(bytes_and_stop_widths: &[(u8, u8)]) -> Vec<(Level, u16)> {
    let mut levels = vec![true]; // idle mark
    for &(byte, stop_width) in bytes_and_stop_widths {
        levels.push(false); // start bit
        for i in (0..8).rev() {
            levels.push((byte >> i) & 1 == 1);
        }
        for _ in 0..stop_width {
            levels.push(true);
        }
    }

    let mut trace = Vec::new();
    let mut elapsed: i64 = 0;
    for pair in levels.windows(2) {
        elapsed += ONE_BIT as i64;
        if pair[0] != pair[1] {
            let level = if pair[1] { Level::High } else { Level::Low };
            trace.push((level, elapsed as u16));
        }
    }
    trace
}

/// A [`MessageSource`] whose message handle *is* the body, popped byte by
/// byte; records every message released through [`MessageSource::message_sent`].
#[derive(Default)]
pub struct VecMessageSource {
    pub sent: Vec<Vec<u8>>,
}

impl MessageSource for VecMessageSource {
    type Message = Vec<u8>;

    fn poll_outbound(&mut self) -> nb::Result<Vec<u8>, core::convert::Infallible> {
        Err(nb::Error::WouldBlock)
    }

    fn next_byte(&mut self, msg: &mut Vec<u8>) -> Option<u8> {
        if msg.is_empty() {
            None
        } else {
            Some(msg.remove(0))
        }
    }

    fn message_sent(&mut self, msg: Vec<u8>) {
        self.sent.push(msg);
    }
}

/// Radio mode a [`MockRadio`] was last switched to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RadioMode {
    Idle,
    Rx,
    Tx,
}

/// A [`RadioControl`] that just records mode changes and hands back a fixed
/// RSSI reading.
pub struct MockRadio {
    pub rssi: u8,
    pub mode: RadioMode,
    pub history: Vec<RadioMode>,
}

impl MockRadio {
    pub fn new(rssi: u8) -> Self {
        MockRadio { rssi, mode: RadioMode::Idle, history: Vec::new() }
    }
}

impl RadioControl for MockRadio {
    fn enter_rx(&mut self) {
        self.mode = RadioMode::Rx;
        self.history.push(RadioMode::Rx);
    }

    fn enter_tx(&mut self) {
        self.mode = RadioMode::Tx;
        self.history.push(RadioMode::Tx);
    }

    fn enter_idle(&mut self) {
        self.mode = RadioMode::Idle;
        self.history.push(RadioMode::Idle);
    }

    fn read_rssi(&mut self) -> u8 {
        self.rssi
    }
}
