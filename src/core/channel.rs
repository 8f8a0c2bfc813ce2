// Semantic view of a decoded channel memory

use crate::bitwise::{decode_frequency, format_frequency};
use crate::core::charset::{decode_comment, decode_label};
use crate::core::constants::REPEATER_OFFSET_STEP_HZ;
use crate::core::modes::{decode_mode, decode_submode, mode_label, Mode, Submode};
use crate::records::ChannelRecord;
use serde::Serialize;
use std::fmt;

/// One channel memory with every field translated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    /// Memory slot number
    pub number: u16,

    /// Frame address
    pub address: u16,

    /// Five-character label, padded with spaces
    pub label: String,

    /// VFO A frequency in Hz, 0 when blank
    pub vfo_a_hz: u32,
    pub mode_a: Option<Mode>,

    /// VFO B frequency in Hz, 0 when blank
    pub vfo_b_hz: u32,
    pub mode_b: Option<Mode>,

    /// Only set when either VFO is in Data mode
    pub submode: Option<Submode>,

    /// Raw sub-mode and speed byte
    pub dmode_raw: u8,

    pub band: u8,
    pub subtone: u8,

    /// Repeater offset in Hz
    pub repeater_offset_hz: u32,
    pub repeater_flags: u8,

    pub comment: String,
}

impl Channel {
    /// Translate a complete channel frame. Truncated frames have no
    /// semantic view and return `None`.
    pub fn from_record(number: u16, rec: &ChannelRecord) -> Option<Self> {
        if !rec.is_complete() {
            return None;
        }

        let modes = rec.modes?;
        let dmode = rec.dmode?;
        let (mode_a, mode_b) = decode_mode(modes);

        Some(Self {
            number,
            address: rec.address,
            label: decode_label(&rec.label?),
            vfo_a_hz: decode_frequency(&rec.vfo_a?),
            mode_a,
            vfo_b_hz: decode_frequency(&rec.vfo_b?),
            mode_b,
            submode: decode_submode(dmode, mode_a, mode_b),
            dmode_raw: dmode,
            band: rec.band?,
            subtone: rec.subtone?,
            repeater_offset_hz: u32::from(rec.offset?) * REPEATER_OFFSET_STEP_HZ,
            repeater_flags: rec.repeater_flags?,
            comment: decode_comment(&rec.comment?),
        })
    }

    /// Both VFOs blank
    pub fn is_empty(&self) -> bool {
        self.vfo_a_hz == 0 && self.vfo_b_hz == 0
    }

    pub const CSV_HEADER: &'static [&'static str] = &[
        "Slot",
        "Address",
        "Label",
        "VfoA",
        "ModeA",
        "VfoB",
        "ModeB",
        "SubMode",
        "DMode",
        "Band",
        "Tone",
        "Offset",
        "RptFlags",
        "Comment",
    ];

    /// Export to CSV row
    pub fn to_csv(&self) -> Vec<String> {
        vec![
            format!("{}", self.number),
            format!("{:04X}", self.address),
            self.label.clone(),
            format_frequency(self.vfo_a_hz),
            mode_label(self.mode_a).to_string(),
            format_frequency(self.vfo_b_hz),
            mode_label(self.mode_b).to_string(),
            self.submode.map(|s| s.to_string()).unwrap_or_default(),
            format!("{:02X}", self.dmode_raw),
            format!("{:02X}", self.band),
            format!("{:02X}", self.subtone),
            format_frequency(self.repeater_offset_hz),
            format!("{:02X}", self.repeater_flags),
            csv_field(&self.comment),
        ]
    }
}

/// Quote a free-text field when it would break the row
fn csv_field(text: &str) -> String {
    if text.contains([',', '"']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:3} {:5} A {:>11} {:4} B {:>11} {:4}",
            self.number,
            self.label,
            format_frequency(self.vfo_a_hz),
            mode_label(self.mode_a),
            format_frequency(self.vfo_b_hz),
            mode_label(self.mode_b),
        )?;
        if let Some(sub) = self.submode {
            write!(f, " {}", sub)?;
        }
        if self.repeater_offset_hz != 0 {
            write!(f, " ofs {}", format_frequency(self.repeater_offset_hz))?;
        }
        if !self.comment.is_empty() {
            write!(f, " \"{}\"", self.comment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::decode::fixtures::channel_frame;

    fn sample() -> ChannelRecord {
        let frame = channel_frame(
            0x0C40,
            [14, 7, 40, 0, 0],
            [0xFF, 0xFF, 0xFF, 0x07, 0xFF],
            0x03,
            0xE0,
            [0x06, 0x14, 0x23, 0xFF, 0x00],
            "FT8, \"main\"",
        );
        ChannelRecord::parse(&frame).unwrap()
    }

    #[test]
    fn test_from_record() {
        let ch = Channel::from_record(1, &sample()).unwrap();
        assert_eq!(ch.number, 1);
        assert_eq!(ch.address, 0x0C40);
        assert_eq!(ch.label, "FT8  ");
        assert_eq!(ch.vfo_a_hz, 14_074_000);
        assert_eq!(ch.mode_a, Some(Mode::Data));
        assert_eq!(ch.vfo_b_hz, 0);
        assert_eq!(ch.mode_b, Some(Mode::Cw));
        assert_eq!(ch.submode, Some(Submode::AfskA));
        assert_eq!(ch.band, 0x05);
        assert_eq!(ch.repeater_offset_hz, 600_000);
        assert_eq!(ch.comment, "FT8, \"main\"");
        assert!(!ch.is_empty());
    }

    #[test]
    fn test_truncated_record_has_no_view() {
        let mut rec = sample();
        rec.checksum = None;
        assert_eq!(Channel::from_record(1, &rec), None);
    }

    #[test]
    fn test_csv_row() {
        let ch = Channel::from_record(1, &sample()).unwrap();
        let row = ch.to_csv();
        assert_eq!(row.len(), Channel::CSV_HEADER.len());
        assert_eq!(row[1], "0C40");
        assert_eq!(row[3], "14.074000");
        assert_eq!(row[4], "Data");
        assert_eq!(row[7], "AFSK-A");
        assert_eq!(row[11], "0.600000");
        assert_eq!(row[13], "\"FT8, \"\"main\"\"\"");
    }

    #[test]
    fn test_display() {
        let ch = Channel::from_record(1, &sample()).unwrap();
        let text = ch.to_string();
        assert!(text.starts_with("  1 FT8  "));
        assert!(text.contains("14.074000 Data"));
        assert!(text.contains("AFSK-A"));
    }
}
