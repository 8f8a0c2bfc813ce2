// Protocol constants for KX3 memory reads - address map, slot sizes, lookup tables

/// First address of ordinary channel memories
pub const MEM_START: u16 = 0x0C00;

/// Size of one channel memory slot in radio address space
pub const MEM_SIZE: u16 = 0x40;

/// First address of the per-band state table
pub const BAND_START: u16 = 0x0100;

/// Size of one band state slot
pub const BAND_SIZE: usize = 0x10;

/// Number of band state slots
pub const BAND_SLOTS: usize = 25;

/// First address of the transverter state table
pub const XVTR_START: u16 = 0x02A2;

/// Size of one transverter state slot
pub const XVTR_SIZE: usize = 0x0A;

/// Number of transverter state slots
pub const XVTR_SLOTS: usize = 9;

/// Address, length and checksum bytes wrapped around every payload
pub const FRAME_OVERHEAD: usize = 4;

/// Address and length bytes in front of every payload
pub const FRAME_HEADER_LEN: usize = 3;

/// Full size of a decoded channel memory frame, trailer included
pub const CHANNEL_FRAME_LEN: usize = 68;

/// Frames this size or smaller carry no payload
pub const SHORT_FRAME_MAX: usize = 11;

/// Repeater offset byte resolution
pub const REPEATER_OFFSET_STEP_HZ: u32 = 20_000;

/// Operating modes, indexed by the mode nibbles
pub const MODE_NAMES: [&str; 6] = ["CW", "USB", "LSB", "Data", "AM", "FM"];

/// Data sub-modes
pub const SUBMODE_NAMES: [&str; 4] = ["DATA-A", "AFSK-A", "FSK-D", "PSK-D"];

/// Characters the radio can show in a label, in radio code order (0x00..=0x29)
pub const VALID_CHARS: &str = " ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789*+/@_";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charset_covers_radio_codes() {
        assert_eq!(VALID_CHARS.chars().count(), 0x2A);
    }

    #[test]
    fn test_address_map_ordering() {
        assert!(BAND_START < XVTR_START);
        assert!(XVTR_START < MEM_START);
        assert_eq!(CHANNEL_FRAME_LEN, FRAME_HEADER_LEN + 64 + 1);
    }
}
