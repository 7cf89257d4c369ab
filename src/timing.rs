//! Bit-width constants for the software UART.
//!
//! All of these are derived from a logical 500 kHz sample clock measured
//! against a 38,400 baud line rate: `500_000 / 38_400` is almost exactly 13.
//!
//! Clock rates that are multiples of 500 kHz would push these constants past
//! what fits in a `u8`. Keeping every interval a saturating `u8` keeps the
//! edge-capture path cheap, which matters because it runs at the highest
//! interrupt priority in the system.

/// Nominal bit duration, in sample ticks.
pub const ONE_BIT: u8 = 13;

/// Half a bit duration, used to round comparisons.
pub const HALF_BIT: u8 = 7;

/// Tolerance, in ticks, allowed around a nominal bit boundary.
pub const BIT_TOL: u8 = 4;

/// Shortest interval still accepted as a single bit.
pub const MIN_BIT: u8 = ONE_BIT - BIT_TOL;

/// Longest interval still accepted as a single bit.
pub const MAX_BIT: u8 = ONE_BIT + BIT_TOL;

/// Nominal width of nine bit periods (the SYNC0 low interval).
pub const NINE_BITS: u8 = 9 * ONE_BIT;

/// Lower bound accepted for a nine-bit interval.
pub const NINE_BITS_MIN: u8 = NINE_BITS - HALF_BIT;

/// Upper bound accepted for a nine-bit interval.
pub const NINE_BITS_MAX: u8 = NINE_BITS + HALF_BIT;

/// Nominal width of ten bit periods (one full byte, start to stop).
pub const TEN_BITS: u8 = 10 * ONE_BIT;

/// Lower bound accepted for a ten-bit interval.
pub const TEN_BITS_MIN: u8 = TEN_BITS - HALF_BIT;

/// Upper bound accepted for a ten-bit interval, used when hunting for SYNC1.
pub const TEN_BITS_MAX: u8 = TEN_BITS + HALF_BIT;

/// Longest mark interval still treated as a (possibly extended) stop bit.
///
/// Some devices are observed to emit a stop bit stretched up to roughly 14.5
/// bit widths; anything longer than this is treated as end of frame.
pub const STOP_BITS_MAX: u8 = 14 * ONE_BIT + HALF_BIT;

/// Capacity of each of the two edge-interval scratch buffers.
pub const MAX_EDGE: usize = 24;

/// Cap on the saturating preamble counter.
pub const MAX_PREAMBLE: u8 = 64;

/// Number of `0xAA` bytes sent ahead of the sync word.
pub const TX_PREAMBLE_LEN: u8 = 4;

/// Number of `0xAA` bytes sent after the message body.
pub const TX_TRAIN_LEN: u8 = 2;

/// Preamble/training byte.
pub const TRAIN_BYTE: u8 = 0xAA;

/// First byte of the two-byte sync word.
pub const SYNC0: u8 = 0xFF;

/// Second byte of the two-byte sync word.
pub const SYNC1: u8 = 0x00;

/// Bit-clock counter value at which the start bit is driven.
pub const TX_START_BIT: u8 = 10;

/// Bit-clock counter value at which the stop bit is driven.
pub const TX_STOP_BIT: u8 = 1;

/// Saturating interval used whenever a measurement would overflow a `u8`,
/// or whenever the capture timer wrapped without an intervening edge.
pub const INTERVAL_OVERFLOW: u8 = 255;
