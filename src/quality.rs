//! Frame-quality reporting types.
//!
//! These are plain data, not part of any hot path; they exist so a caller
//! can log or transmit a structured quality report instead of two loose
//! numbers.

/// RSSI and preamble-acquisition snapshot, typically built by the caller
/// right after [`crate::FrameEngine::work`] reports a finished frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameQuality {
    /// RSSI sampled at frame end.
    pub rssi: u8,
    /// Length of the bit-length-interval run observed ahead of the sync
    /// word, capped at [`crate::timing::MAX_PREAMBLE`].
    pub preamble_len: u8,
}
