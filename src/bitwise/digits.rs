// Digit-per-byte frequency groups
//
// The KX3 stores a VFO frequency as five bytes, each holding a whole
// decimal field rather than a pair of BCD nibbles:
//   [MHz, 10 kHz, 100 Hz, 10 Hz, 1 Hz]

/// Byte value marking an unprogrammed digit
pub const BLANK_DIGIT: u8 = 0xFF;

/// Length of a frequency digit group
pub const FREQ_GROUP_LEN: usize = 5;

/// Decode a five-byte frequency group to Hz.
///
/// A group whose MHz, 10 kHz, 100 Hz and 1 Hz bytes are all `0xFF` is a blank
/// slot and decodes to 0. The 10 Hz byte takes no part in that check.
pub fn decode_frequency(digits: &[u8; FREQ_GROUP_LEN]) -> u32 {
    let [mhz, ten_khz, hundred_hz, ten_hz, hz] = *digits;

    if mhz == BLANK_DIGIT
        && ten_khz == BLANK_DIGIT
        && hundred_hz == BLANK_DIGIT
        && hz == BLANK_DIGIT
    {
        return 0;
    }

    u32::from(hz)
        + 10 * u32::from(ten_hz)
        + 100 * u32::from(hundred_hz)
        + 10_000 * u32::from(ten_khz)
        + 1_000_000 * u32::from(mhz)
}

/// Format a frequency in Hz as MHz (e.g., "14.074000")
pub fn format_frequency(hz: u32) -> String {
    format!("{}.{:06}", hz / 1_000_000, hz % 1_000_000)
}
