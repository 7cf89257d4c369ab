//! The deferred bit decoder.
//!
//! Turns one byte's worth of captured edge timestamps into a data byte by
//! time-weighted majority sampling: each edge's sample ticks are
//! distributed across whichever bit windows they span, and a bit window's
//! value is decided by whether it spent more than half its ticks high.
//!
//! This is robust to jitter of a few ticks per edge, and to a missing edge
//! altogether within a bit window (the level simply persists and
//! contributes to the whole window).

use crate::bitorder::BitOrder;
use crate::timing::{HALF_BIT, ONE_BIT, TEN_BITS};

/// Reconstruct the data byte carried by `edges`.
///
/// `edges` holds, for each line transition seen while gathering this byte,
/// the elapsed time in sample ticks since the start bit began (not since
/// the previous edge). Clock recovery only re-anchors at byte boundaries,
/// so these values are cumulative across the whole byte. The level
/// immediately after the start bit is always low, and flips with each
/// successive entry.
pub(crate) fn decode_byte<B: BitOrder>(edges: &[u8]) -> u8 {
    let mut acc: u8 = 0;
    let mut t: u8 = 0;
    let mut t_bit: u8 = ONE_BIT;
    let mut is_hi = false;
    let mut hi_count: u8 = 0;

    for &interval in edges {
        if t_bit >= TEN_BITS {
            break;
        }

        let mut samples = interval.saturating_sub(t);
        while samples > 0 {
            let remaining_in_bit = t_bit - t;
            let step = remaining_in_bit.min(samples);

            if is_hi {
                hi_count += step;
            }
            t += step;
            samples -= step;

            if t == t_bit {
                if t_bit != ONE_BIT && t_bit < TEN_BITS {
                    let bit = hi_count > HALF_BIT;
                    acc = B::push_bit(acc, bit);
                }
                t_bit += ONE_BIT;
                hi_count = 0;
            }
        }

        is_hi = !is_hi;
    }

    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitorder::{LsbFirst, MsbFirst};

    /// Build the edge trace a perfect (zero-jitter) transmitter would emit
    /// for one byte: start bit (space), 8 data bits msb-first as driven on
    /// the wire, stop bit (mark). Returns, for each transition, the
    /// cumulative tick count since the start bit began, which is what clock
    /// recovery actually hands the decoder.
    fn encode_wire_bits(wire_bits_msb_first: &[bool]) -> Vec<u8> {
        let mut levels = vec![false]; // start bit: space
        levels.extend(wire_bits_msb_first.iter().copied());
        levels.push(true); // stop bit: mark

        let mut edges = Vec::new();
        let mut elapsed: u16 = 0;
        for pair in levels.windows(2) {
            elapsed += ONE_BIT as u16;
            if pair[0] != pair[1] {
                edges.push(elapsed as u8);
            }
        }
        elapsed += ONE_BIT as u16;
        edges.push(elapsed as u8);
        edges
    }

    #[test]
    fn decodes_msb_first_byte() {
        let byte = 0b1011_0010u8;
        let wire_bits: Vec<bool> = (0..8).rev().map(|i| (byte >> i) & 1 == 1).collect();
        let edges = encode_wire_bits(&wire_bits);
        assert_eq!(decode_byte::<MsbFirst>(&edges), byte);
    }

    #[test]
    fn decodes_lsb_first_byte() {
        let byte = 0b1011_0010u8;
        // On the wire LSB-first means bit 0 goes out first.
        let wire_bits: Vec<bool> = (0..8).map(|i| (byte >> i) & 1 == 1).collect();
        let edges = encode_wire_bits(&wire_bits);
        assert_eq!(decode_byte::<LsbFirst>(&edges), byte);
    }

    #[test]
    fn tolerates_small_jitter_on_every_edge() {
        let byte = 0xA5u8;
        let wire_bits: Vec<bool> = (0..8).rev().map(|i| (byte >> i) & 1 == 1).collect();
        let mut edges = encode_wire_bits(&wire_bits);
        // nudge every interval by +-3 ticks, alternating
        for (i, e) in edges.iter_mut().enumerate() {
            let jitter: i16 = if i % 2 == 0 { 3 } else { -3 };
            *e = (*e as i16 + jitter).max(1) as u8;
        }
        assert_eq!(decode_byte::<MsbFirst>(&edges), byte);
    }

    #[test]
    fn all_zero_byte_has_no_internal_edges() {
        // 0x00 MSB-first: start bit low, 8 data bits low, so the line stays
        // low for 9 bit periods before rising for the stop bit.
        let edges = [9 * ONE_BIT, 10 * ONE_BIT];
        assert_eq!(decode_byte::<MsbFirst>(&edges), 0x00);
    }

    #[test]
    fn all_one_data_bits_byte() {
        // start bit low (1 bit period), then 8 data bits and the stop bit
        // all high, merging into one long run with a single edge at the
        // very end.
        let edges = [ONE_BIT, 10 * ONE_BIT];
        assert_eq!(decode_byte::<MsbFirst>(&edges), 0xFF);
    }
}
