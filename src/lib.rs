//! Software UART / frame-layer engine for an unbuffered sub-GHz radio link.
//!
//! This crate reconstructs byte- and frame-level structure from raw line
//! edges on a half-duplex radio data pin: edge capture and byte
//! synchronization run at interrupt priority, bit decoding runs deferred in
//! bulk over a committed byte, and a cooperative [`FrameEngine::work`] call
//! arbitrates RX/TX and reports frame boundaries upward. None of it touches
//! a register or a SPI bus directly. [`RadioControl`], [`FrameSink`] and
//! [`MessageSource`] are the seams a caller wires a real radio driver and
//! message layer into.
//!
//! Two wire variants share every state table and timing constant, and
//! differ only in bit order and end-of-frame sentinel, selected through the
//! [`BitOrder`] marker type: [`MsbFirst`] for the radio frame layer,
//! [`LsbFirst`] for the TTL-UART bridge variant.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod bitorder;
mod hal;
mod quality;
mod rx;
#[cfg(feature = "std")]
pub mod testing;
pub mod timing;
mod trace;
mod tx;

pub use bitorder::{BitOrder, LsbFirst, MsbFirst};
pub use hal::{FrameSink, Level, MessageSource, RadioControl};
pub use quality::FrameQuality;
pub use rx::{RxEngine, RxState};
pub use tx::{TxEngine, TxState};

/// Per-build timing configuration, supplied at construction instead of a
/// compile-time `F_CPU` conditional.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineConfig {
    /// Shift applied to raw timer ticks to produce 500 kHz sample ticks (2
    /// at 16 MHz, 1 at 8 MHz).
    pub clock_shift: u8,
}

impl EngineConfig {
    /// Build a config from an explicit sample-clock shift.
    pub const fn new(clock_shift: u8) -> Self {
        EngineConfig { clock_shift }
    }

    /// Derive the sample-clock shift from a CPU frequency, in Hz, driving
    /// the capture timer.
    pub const fn for_cpu_freq(hz: u32) -> Self {
        if hz == 16_000_000 {
            EngineConfig { clock_shift: 2 }
        } else {
            EngineConfig { clock_shift: 1 }
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::for_cpu_freq(8_000_000)
    }
}

/// Owns RX and TX synchronization state and arbitrates between them.
///
/// `B` selects the wire variant; `M` is the opaque outbound-message handle
/// type used by the caller's [`MessageSource`]. A single value is meant to
/// live for the lifetime of the radio link, driven by interrupt-context
/// entry points ([`Self::on_edge`], [`Self::on_timer_overflow`],
/// [`Self::on_bit_tick`], [`Self::decode_pending_byte`]) and a cooperative
/// [`Self::work`] call from the main loop.
pub struct FrameEngine<B: BitOrder, M> {
    config: EngineConfig,
    rx: RxEngine<B>,
    tx: TxEngine<B, M>,
    rx_wanted: bool,
}

impl<B: BitOrder, M> FrameEngine<B, M> {
    /// A freshly constructed engine with both RX and TX disarmed.
    pub const fn new(config: EngineConfig) -> Self {
        FrameEngine {
            config,
            rx: RxEngine::new(),
            tx: TxEngine::new(),
            rx_wanted: false,
        }
    }

    /// Mark RX as wanted; [`Self::work`] arms it (and switches the radio
    /// into receive mode) at the next opportunity, once TX is idle.
    pub fn rx_enable(&mut self) {
        self.rx_wanted = true;
    }

    /// Mark RX as not wanted and disarm it immediately.
    pub fn rx_disable(&mut self) {
        self.rx_wanted = false;
        self.rx.disable();
    }

    /// Queue a message for transmission. [`Self::work`] starts the TX
    /// sequence once RX is idle.
    pub fn tx_enable(&mut self, msg: M) {
        self.tx.set_message(msg);
    }

    /// Abort any in-progress transmission and disarm TX.
    pub fn tx_disable(&mut self) {
        self.tx.disable();
    }

    /// Current RX synchronization state.
    pub fn rx_state(&self) -> RxState {
        self.rx.state()
    }

    /// Current TX sequencing state.
    pub fn tx_state(&self) -> TxState {
        self.tx.state()
    }

    /// Edge-capture entry point: called from the capture-pin interrupt with
    /// the observed level and the free-running sample-counter snapshot.
    pub fn on_edge(&mut self, level: Level, time: u16, sink: &mut impl FrameSink) {
        self.rx.on_edge(level, time, self.config.clock_shift, sink);
    }

    /// Timer-overflow entry point: called from the low-priority
    /// timer-overflow interrupt.
    pub fn on_timer_overflow(&mut self, sink: &mut impl FrameSink) {
        self.rx.on_timer_overflow(sink);
    }

    /// TX bit-clock entry point: called once per bit period while TX is
    /// armed. Returns the line level to drive.
    pub fn on_bit_tick(&mut self, source: &mut impl MessageSource<Message = M>) -> Level {
        self.tx.on_bit_tick(source)
    }

    /// Deferred-decode entry point: called from non-interrupt (or
    /// re-enabled-interrupt) context once [`RxEngine::byte_ready`] is
    /// observed set.
    pub fn decode_pending_byte(&mut self, sink: &mut impl FrameSink) {
        self.rx.decode_pending_byte(sink);
    }

    /// A deferred decode is waiting to be picked up by
    /// [`Self::decode_pending_byte`].
    pub fn byte_ready(&self) -> bool {
        self.rx.byte_ready()
    }

    /// Cooperative foreground routine; call repeatedly from the main loop.
    ///
    /// Finishes a completed RX frame (RSSI + `frame_end`, then re-arms),
    /// re-arms RX when it's wanted and idle, pulls the next outbound
    /// message when none is held, starts a TX sequence when one is ready
    /// and RX is idle, and finishes a completed TX sequence. RX and TX mode
    /// changes on the radio all happen here, under a critical section, so
    /// they're never interleaved with the edge-capture or bit-clock paths.
    pub fn work(
        &mut self,
        radio: &mut impl RadioControl,
        source: &mut impl MessageSource<Message = M>,
        sink: &mut impl FrameSink,
    ) {
        critical_section::with(|_| {
            if self.rx.state() == RxState::Done {
                let rssi = radio.read_rssi();
                sink.frame_rssi(rssi);
                sink.frame_end();
                crate::trace::trace_event!("frame end, rssi {=u8}", rssi);
                self.rx.enable();
            } else if self.rx.state() == RxState::Off
                && self.rx_wanted
                && self.tx.state() == TxState::Off
            {
                radio.enter_rx();
                self.rx.enable();
            }

            if !self.tx.has_message() {
                if let Ok(msg) = source.poll_outbound() {
                    self.tx.set_message(msg);
                }
            }

            if self.tx.has_message() && self.tx.state() == TxState::Off {
                self.rx.disable();
                radio.enter_tx();
                self.tx.enable();
            } else if self.tx.state() == TxState::Done {
                if let Some(msg) = self.tx.take_message() {
                    source.message_sent(msg);
                }
                self.tx.disable();
                radio.enter_idle();
                if self.rx_wanted {
                    radio.enter_rx();
                    self.rx.enable();
                }
            }
        });
    }

    /// Build a quality snapshot from an RSSI reading and the engine's
    /// current preamble-acquisition count.
    pub fn quality(&self, rssi: u8) -> FrameQuality {
        FrameQuality {
            rssi,
            preamble_len: self.rx.preamble(),
        }
    }
}
