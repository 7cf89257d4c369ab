//! Receive path: edge capture, byte/frame synchronization, and the
//! deferred bit decoder.

mod buffer;
mod decode;
mod state;

pub use state::{RxEngine, RxState};
