//! Transmit path: the bit-clock-driven frame sequencer.

mod state;

pub use state::{TxEngine, TxState};
