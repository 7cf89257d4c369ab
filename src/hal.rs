//! Traits that decouple the frame engine from the radio chip and from
//! whatever sits above it in the stack.
//!
//! None of these traits touch hardware registers directly; that's the
//! explicit job of a radio driver the caller wires in. The engine only ever
//! asks for mode changes and RSSI, and only ever hands finished bytes
//! upward; it never owns a SPI bus or a GPIO pin.

/// Line level as observed by the edge-capture path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Space: logic low.
    Low,
    /// Mark: logic high.
    High,
}

impl Level {
    /// `true` for [`Level::High`].
    pub fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

    pub(crate) fn from_high(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Radio mode control, implemented by the chip driver.
///
/// The engine calls through this trait only at RX/TX arbitration points; it
/// never polls the radio's own state machine.
pub trait RadioControl {
    /// Switch the radio to receive mode.
    fn enter_rx(&mut self);

    /// Switch the radio to transmit mode.
    fn enter_tx(&mut self);

    /// Switch the radio to idle (neither transmitting nor receiving).
    fn enter_idle(&mut self);

    /// Sample the received-signal-strength indicator.
    ///
    /// Only meaningful right after a frame has finished arriving.
    fn read_rssi(&mut self) -> u8;
}

/// Upward byte sink, implemented by the message layer.
///
/// Calls arrive in capture order, bracketed by exactly one
/// [`FrameSink::frame_start`] and one [`FrameSink::frame_end`] per frame.
pub trait FrameSink {
    /// A new frame has begun (byte synchronization was acquired).
    fn frame_start(&mut self);

    /// One decoded data byte, in the order it was received.
    fn frame_byte(&mut self, byte: u8);

    /// Byte synchronization was lost mid-frame; RX has returned to preamble
    /// search. Reported in place of a data byte, never in place of
    /// [`FrameSink::frame_end`]: a lost-sync frame still ends normally.
    fn frame_lost_sync(&mut self);

    /// The RSSI sampled at the end of the frame. Always called exactly once,
    /// immediately before [`FrameSink::frame_end`].
    fn frame_rssi(&mut self, rssi: u8);

    /// The frame has ended, by any of the four termination paths.
    fn frame_end(&mut self);
}

/// Outbound message source, implemented by the message layer.
///
/// `Message` is an opaque handle; the engine never inspects it beyond
/// plumbing it between [`MessageSource::poll_outbound`] and
/// [`MessageSource::message_sent`].
pub trait MessageSource {
    /// The handle type used to identify one outbound message.
    type Message;

    /// Non-blocking poll for the next message to send.
    ///
    /// Returns [`nb::Error::WouldBlock`] when nothing is queued yet.
    fn poll_outbound(&mut self) -> nb::Result<Self::Message, core::convert::Infallible>;

    /// The next byte of `msg`'s body, or `None` once the body is exhausted.
    fn next_byte(&mut self, msg: &mut Self::Message) -> Option<u8>;

    /// Release a message that has finished transmitting.
    fn message_sent(&mut self, msg: Self::Message);
}
