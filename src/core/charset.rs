// Radio character set used by memory labels

use super::constants::VALID_CHARS;

/// Length of a memory label
pub const LABEL_LEN: usize = 5;

/// Length of a memory comment
pub const COMMENT_LEN: usize = 24;

/// Shown in place of a byte outside the radio character set
pub const PLACEHOLDER: char = ' ';

lazy_static::lazy_static! {
    /// Radio code -> character. Codes past the alphabet (including the 0xFF
    /// erased-cell value) have no mapping.
    pub static ref CHARSET_MAP: [Option<char>; 256] = {
        let mut map = [None; 256];
        for (code, ch) in VALID_CHARS.chars().enumerate() {
            map[code] = Some(ch);
        }
        map
    };
}

/// Translate one radio character code
pub fn decode_char(code: u8) -> Option<char> {
    CHARSET_MAP[usize::from(code)]
}

/// Decode a label. Always five characters; unmapped codes become spaces.
pub fn decode_label(codes: &[u8; LABEL_LEN]) -> String {
    codes
        .iter()
        .map(|&code| decode_char(code).unwrap_or(PLACEHOLDER))
        .collect()
}

/// Decode the free-text comment: ASCII up to the first NUL, trailing blanks
/// removed, unprintable bytes shown as '.'
pub fn decode_comment(bytes: &[u8; COMMENT_LEN]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let text: String = bytes[..end]
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        })
        .collect();
    text.trim_end().to_string()
}
