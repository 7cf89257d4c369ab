//! TX frame sequencing state machine and the bit-clock entry point that
//! drives it.

use core::marker::PhantomData;

use crate::bitorder::BitOrder;
use crate::hal::{Level, MessageSource};
use crate::timing::{
    SYNC0, SYNC1, TRAIN_BYTE, TX_PREAMBLE_LEN, TX_START_BIT, TX_STOP_BIT, TX_TRAIN_LEN,
};

/// States of the TX frame-sequencing machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxState {
    /// TX is disabled.
    Off,
    /// Waiting for an outbound message.
    Idle,
    /// Emitting the `0xAA` preamble bytes.
    Preamble,
    /// Emitting the `0xFF 0x00` sync word.
    Sync,
    /// Emitting the message body, one byte per tick-group.
    Msg,
    /// Emitting the `0xAA` training bytes after the message body.
    Train,
    /// Frame sent; waiting for the coordinator to notice, release the
    /// message, and disarm.
    Done,
}

/// TX frame-sequencing state, parameterized by the bit order of the build
/// and the outbound message handle type.
pub struct TxEngine<B, M> {
    state: TxState,
    count: u8,
    byte: u8,
    bit: u8,
    msg: Option<M>,
    _bit_order: PhantomData<B>,
}

impl<B: BitOrder, M> TxEngine<B, M> {
    /// A freshly constructed, disabled engine.
    pub const fn new() -> Self {
        TxEngine {
            state: TxState::Off,
            count: 0,
            byte: 0,
            bit: 0,
            msg: None,
            _bit_order: PhantomData,
        }
    }

    /// Current sequencing state.
    pub fn state(&self) -> TxState {
        self.state
    }

    /// A message is queued, waiting for TX to be armed.
    pub fn has_message(&self) -> bool {
        self.msg.is_some()
    }

    /// Queue a message for transmission. Only meaningful while `state() ==
    /// TxState::Off`.
    pub fn set_message(&mut self, msg: M) {
        self.msg = Some(msg);
    }

    /// Take the just-finished message so the coordinator can release it
    /// upstream. Leaves no message queued.
    pub fn take_message(&mut self) -> Option<M> {
        self.msg.take()
    }

    /// Arm TX: a message must already be queued via [`Self::set_message`].
    /// `bit = 1` means the very first tick emits one throwaway mark level
    /// (consistent with idle-line being a mark) and immediately cascades
    /// into `Idle`'s transition, which starts the real frame.
    pub fn enable(&mut self) {
        self.state = TxState::Idle;
        self.count = 0;
        self.byte = 0;
        self.bit = 1;
    }

    /// Disarm TX and drop any residual sequencing state. Does not touch a
    /// queued message; take it first with [`Self::take_message`].
    pub fn disable(&mut self) {
        self.state = TxState::Off;
        self.count = 0;
        self.byte = 0;
        self.bit = 0;
    }

    /// Bit-clock entry point: fires once per bit period. Returns the line
    /// level to drive for this tick.
    ///
    /// `Off` and `Done` just hold the line at idle mark without touching the
    /// byte/bit counters.
    pub fn on_bit_tick(&mut self, source: &mut impl MessageSource<Message = M>) -> Level {
        if matches!(self.state, TxState::Off | TxState::Done) {
            return Level::High;
        }

        let level = if self.bit == TX_START_BIT {
            Level::Low
        } else if self.bit == TX_STOP_BIT {
            Level::High
        } else {
            let (high, rest) = B::shift_out(self.byte);
            self.byte = rest;
            Level::from_high(high)
        };

        self.bit -= 1;
        if self.bit == 0 {
            let next = match self.state {
                TxState::Idle => self.tx_idle(source),
                TxState::Preamble => self.tx_preamble(source),
                TxState::Sync => self.tx_sync(source),
                TxState::Msg => self.tx_msg(source),
                TxState::Train => self.tx_train(),
                TxState::Off | TxState::Done => self.state,
            };
            if next != self.state {
                crate::trace::trace_event!("tx {} -> {}", self.state, next);
            }
            self.state = next;
        }
        level
    }

    fn set_byte(&mut self, byte: u8) {
        self.byte = byte;
        self.bit = TX_START_BIT;
        self.count += 1;
    }

    fn tx_idle(&mut self, source: &mut impl MessageSource<Message = M>) -> TxState {
        self.count = 0;
        if self.msg.is_none() {
            TxState::Done
        } else {
            self.tx_preamble(source)
        }
    }

    fn tx_preamble(&mut self, source: &mut impl MessageSource<Message = M>) -> TxState {
        if self.count < TX_PREAMBLE_LEN {
            self.set_byte(TRAIN_BYTE);
            TxState::Preamble
        } else {
            self.count = 0;
            self.tx_sync(source)
        }
    }

    fn tx_sync(&mut self, source: &mut impl MessageSource<Message = M>) -> TxState {
        const SYNC: [u8; 2] = [SYNC0, SYNC1];
        if (self.count as usize) < SYNC.len() {
            self.set_byte(SYNC[self.count as usize]);
            TxState::Sync
        } else {
            self.count = 0;
            self.tx_msg(source)
        }
    }

    fn tx_msg(&mut self, source: &mut impl MessageSource<Message = M>) -> TxState {
        let next = self.msg.as_mut().and_then(|msg| source.next_byte(msg));
        match next {
            Some(byte) => {
                self.set_byte(byte);
                TxState::Msg
            }
            None => {
                self.count = 0;
                self.tx_train()
            }
        }
    }

    fn tx_train(&mut self) -> TxState {
        if self.count < TX_TRAIN_LEN {
            self.set_byte(TRAIN_BYTE);
            TxState::Train
        } else {
            self.count = 0;
            TxState::Done
        }
    }
}

impl<B: BitOrder, M> Default for TxEngine<B, M> {
    fn default() -> Self {
        Self::new()
    }
}
