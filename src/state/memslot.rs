// Legacy 16-byte memory-slot layout
//
// An older reading of 16-byte state slots, kept alongside the channel
// decoder because its field positions do not match the channel frame:
//   bytes 0..5   VFO A digits
//   bytes 6..11  VFO B digits (byte 5 is skipped)
//   byte 11      modes, low nibble A / high nibble B
//   byte 13      data sub-mode, top nibble stored inverted
// It also differs from `BandState`, which reads VFO B from bytes 5..10.

use crate::bitwise::decode_frequency;
use crate::core::modes::{decode_mode, submode_index, Mode, Submode};
use crate::state::accumulator::BandSlot;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemSlot {
    pub vfo_a_hz: u32,
    pub mode_a: Option<Mode>,
    pub vfo_b_hz: u32,
    pub mode_b: Option<Mode>,
    pub submode: Option<Submode>,
}

/// Decode a 16-byte slot with the legacy field positions
pub fn decode_memslot(slot: &BandSlot) -> MemSlot {
    let mut vfo_a = [0u8; 5];
    let mut vfo_b = [0u8; 5];
    vfo_a.copy_from_slice(&slot[0..5]);
    vfo_b.copy_from_slice(&slot[6..11]);

    let (mode_a, mode_b) = decode_mode(slot[11]);
    let submode = if mode_a == Some(Mode::Data) || mode_b == Some(Mode::Data) {
        Submode::from_index(submode_index(slot[13]))
    } else {
        None
    };

    MemSlot {
        vfo_a_hz: decode_frequency(&vfo_a),
        mode_a,
        vfo_b_hz: decode_frequency(&vfo_b),
        mode_b,
        submode,
    }
}
