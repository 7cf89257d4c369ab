//! RX byte/frame synchronization state machine and the edge-capture entry
//! point that drives it.

use core::marker::PhantomData;

use crate::bitorder::BitOrder;
use crate::hal::{FrameSink, Level};
use crate::rx::buffer::EdgeLog;
use crate::rx::decode::decode_byte;
use crate::timing::{
    INTERVAL_OVERFLOW, MAX_PREAMBLE, MIN_BIT, MAX_BIT, NINE_BITS_MIN, STOP_BITS_MAX, TEN_BITS_MAX,
    TEN_BITS_MIN,
};

/// States of the RX synchronization / frame-gathering machine.
///
/// `Frame0` and `Frame` gather bytes and run clock recovery the same way;
/// `Frame0` just marks that byte sync was only just acquired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxState {
    /// RX is disabled.
    Off,
    /// Waiting to observe a rising edge before trusting interval math.
    Idle,
    /// Line is high; watching for a SYNC0-length low interval.
    High,
    /// Line is low; watching for the next rising edge.
    Low,
    /// Saw a SYNC0-shaped low interval; confirming SYNC1.
    Sync1,
    /// Sync word accepted; waiting for the stop bit to get byte sync.
    Stop,
    /// Just got byte sync, about to gather the first frame byte.
    Frame0,
    /// Gathering edges for the current frame byte.
    Frame,
    /// Frame has ended; waiting for the coordinator to read RSSI, emit
    /// `frame_end`, and re-arm.
    Done,
}

/// RX synchronization/frame state, parameterized by the bit order of the
/// build ([`crate::bitorder::MsbFirst`] or [`crate::bitorder::LsbFirst`]).
pub struct RxEngine<B> {
    state: RxState,
    time0: u16,
    last_time: u16,
    last_seen_time: u16,
    overflow: u8,
    level: Level,
    last_level: Level,
    preamble: u8,
    n_byte: u8,
    last_byte: u8,
    log: EdgeLog,
    byte_ready: bool,
    _bit_order: PhantomData<B>,
}

impl<B: BitOrder> RxEngine<B> {
    /// A freshly constructed, disabled engine.
    pub const fn new() -> Self {
        RxEngine {
            state: RxState::Off,
            time0: 0,
            last_time: 0,
            last_seen_time: 0,
            overflow: 0,
            level: Level::Low,
            last_level: Level::Low,
            preamble: 0,
            n_byte: 0,
            last_byte: 0,
            log: EdgeLog::new(),
            byte_ready: false,
            _bit_order: PhantomData,
        }
    }

    /// Current synchronization state.
    pub fn state(&self) -> RxState {
        self.state
    }

    /// Number of consecutive bit-length intervals seen, saturating.
    pub fn preamble(&self) -> u8 {
        self.preamble
    }

    /// Arm RX: reset all synchronization state and start hunting for a
    /// rising edge. Also used by the coordinator to re-arm after a frame
    /// ends.
    pub fn enable(&mut self) {
        self.time0 = 0;
        self.last_time = 0;
        self.last_seen_time = 0;
        self.overflow = 0;
        self.level = Level::Low;
        self.last_level = Level::Low;
        self.preamble = 0;
        self.n_byte = 0;
        self.last_byte = 0;
        self.log.reset();
        self.byte_ready = false;
        self.state = RxState::Idle;
    }

    /// Disarm RX.
    pub fn disable(&mut self) {
        self.state = RxState::Off;
    }

    /// A deferred decode is pending: a byte boundary was committed and
    /// hasn't been picked up yet.
    pub fn byte_ready(&self) -> bool {
        self.byte_ready
    }

    /// Run the deferred decoder over the committed buffer, deliver the byte
    /// upstream, and track it as `last_byte` for end-of-frame detection.
    pub fn decode_pending_byte(&mut self, sink: &mut impl FrameSink) {
        if !self.byte_ready {
            return;
        }
        self.byte_ready = false;

        let byte = decode_byte::<B>(self.log.committed());
        self.last_byte = byte;
        sink.frame_byte(byte);
    }

    /// Edge-capture entry point: a rising or falling edge was observed at
    /// sample-clock value `time`, landing the line at `level`.
    ///
    /// `clock_shift` converts raw timer ticks to 500 kHz sample ticks (2 at
    /// 16 MHz, 1 otherwise).
    pub fn on_edge(&mut self, level: Level, time: u16, clock_shift: u8, sink: &mut impl FrameSink) {
        if self.state == RxState::Off {
            return;
        }
        if level == self.last_level {
            return;
        }

        self.level = level;
        let interval = self.compute_interval(time, clock_shift);
        self.overflow = 0;
        self.dispatch(interval, time, sink);

        self.last_level = level;
        self.last_time = time;
        self.last_seen_time = time;
    }

    /// Timer-overflow entry point. Two overflows without an intervening
    /// edge force a saturated interval through the state machine, so a
    /// mid-byte wait that never sees another edge still times out.
    pub fn on_timer_overflow(&mut self, sink: &mut impl FrameSink) {
        if self.state == RxState::Off {
            return;
        }
        self.overflow = self.overflow.saturating_add(1);
        if self.overflow > 1 {
            let time = self.last_seen_time;
            self.dispatch(INTERVAL_OVERFLOW, time, sink);
            self.last_level = self.level;
            self.last_time = time;
        }
    }

    /// Run one interval through the transition table, then re-synchronize
    /// the `time0` clock-recovery anchor unless the result stays in the
    /// middle of gathering a byte (`Frame`): a byte's interior edges are all
    /// measured cumulatively from its start bit, which is what lets the
    /// decoder later do time-weighted sampling across the whole byte.
    fn dispatch(&mut self, interval: u8, time: u16, sink: &mut impl FrameSink) {
        self.process_interval(interval, sink);
        if self.state != RxState::Frame {
            self.time0 = time;
        }
    }

    fn compute_interval(&self, time: u16, clock_shift: u8) -> u8 {
        if self.overflow > 0 && (self.overflow > 1 || time > self.time0) {
            return INTERVAL_OVERFLOW;
        }
        let raw = time.wrapping_sub(self.time0) >> clock_shift;
        raw.min(INTERVAL_OVERFLOW as u16) as u8
    }

    fn update_preamble(&mut self, interval: u8) {
        if (MIN_BIT..=MAX_BIT).contains(&interval) {
            self.preamble = self.preamble.saturating_add(1).min(MAX_PREAMBLE);
        } else {
            self.preamble = 0;
        }
    }

    fn process_interval(&mut self, interval: u8, sink: &mut impl FrameSink) {
        let level = self.level;
        let next = match self.state {
            RxState::Off => RxState::Off,

            RxState::Idle => {
                if level.is_high() {
                    RxState::High
                } else {
                    RxState::Idle
                }
            }

            RxState::High => {
                if !level.is_high() {
                    self.update_preamble(interval);
                    if interval >= NINE_BITS_MIN {
                        RxState::Sync1
                    } else {
                        RxState::Low
                    }
                } else {
                    RxState::High
                }
            }

            RxState::Low => {
                if level.is_high() {
                    self.update_preamble(interval);
                    RxState::High
                } else {
                    RxState::Low
                }
            }

            RxState::Sync1 => {
                if level.is_high() {
                    self.update_preamble(interval);
                    if interval >= NINE_BITS_MIN && interval <= TEN_BITS_MAX {
                        RxState::Stop
                    } else {
                        RxState::High
                    }
                } else {
                    RxState::Sync1
                }
            }

            RxState::Stop => {
                if !level.is_high() {
                    sink.frame_start();
                    crate::trace::trace_event!("rx frame start");
                    RxState::Frame0
                } else {
                    RxState::Stop
                }
            }

            RxState::Frame0 | RxState::Frame => self.frame_edge(interval, sink),

            RxState::Done => RxState::Done,
        };
        self.state = next;
    }

    /// `Frame0`/`Frame` transition: gather one more interval, and decide
    /// whether it closes out a byte, ends the frame, or is just another
    /// edge within the current byte.
    ///
    /// Reaching `Done` only marks the frame as finished; reading RSSI and
    /// emitting `frame_end` is the coordinator's job (so it can happen from
    /// non-interrupt context), which is also when RX gets re-armed.
    fn frame_edge(&mut self, interval: u8, sink: &mut impl FrameSink) -> RxState {
        if !self.log.push(interval) {
            // Buffer overflow: lost byte sync, one of the four termination
            // paths.
            sink.frame_lost_sync();
            crate::trace::trace_event!("rx lost sync: edge buffer overflow");
            return RxState::Done;
        }

        if interval > TEN_BITS_MIN {
            if interval < STOP_BITS_MAX && !self.level.is_high() {
                // Falling edge of plausible length: stop bit, byte complete.
                self.n_byte = self.n_byte.saturating_add(1);
                self.log.commit_and_swap();
                self.byte_ready = true;
                RxState::Frame0
            } else if interval < STOP_BITS_MAX {
                // Rising edge where a falling one was expected: lost sync.
                sink.frame_lost_sync();
                crate::trace::trace_event!("rx lost sync: unexpected edge polarity");
                RxState::Done
            } else {
                // Mark held far longer than a stop bit: clean end of frame.
                RxState::Done
            }
        } else if self.last_byte == B::END_OF_FRAME {
            RxState::Done
        } else {
            RxState::Frame
        }
    }
}

impl<B: BitOrder> Default for RxEngine<B> {
    fn default() -> Self {
        Self::new()
    }
}
