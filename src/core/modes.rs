// Operating mode and data sub-mode tables

use super::constants::{MODE_NAMES, SUBMODE_NAMES};
use serde::Serialize;
use std::fmt;

/// Operating mode of one VFO
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Mode {
    #[serde(rename = "CW")]
    Cw,
    #[serde(rename = "USB")]
    Usb,
    #[serde(rename = "LSB")]
    Lsb,
    #[serde(rename = "Data")]
    Data,
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "FM")]
    Fm,
}

impl Mode {
    const ALL: [Mode; 6] = [Mode::Cw, Mode::Usb, Mode::Lsb, Mode::Data, Mode::Am, Mode::Fm];

    /// Look up a mode nibble; indices past the table are unknown
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    pub fn as_str(self) -> &'static str {
        MODE_NAMES[self as usize]
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Digital protocol variant used with [`Mode::Data`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Submode {
    #[serde(rename = "DATA-A")]
    DataA,
    #[serde(rename = "AFSK-A")]
    AfskA,
    #[serde(rename = "FSK-D")]
    FskD,
    #[serde(rename = "PSK-D")]
    PskD,
}

impl Submode {
    const ALL: [Submode; 4] = [Submode::DataA, Submode::AfskA, Submode::FskD, Submode::PskD];

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    pub fn as_str(self) -> &'static str {
        SUBMODE_NAMES[self as usize]
    }
}

impl fmt::Display for Submode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a packed mode byte into (VFO A, VFO B) modes.
/// Low nibble is VFO A, high nibble is VFO B.
pub fn decode_mode(byte: u8) -> (Option<Mode>, Option<Mode>) {
    (Mode::from_index(byte & 0x0F), Mode::from_index(byte >> 4))
}

/// Raw sub-mode index carried in the top nibble, stored inverted
pub fn submode_index(byte: u8) -> u8 {
    (byte ^ 0xF0) >> 4
}

/// Decode the data sub-mode byte of a channel memory.
/// Only meaningful when either VFO is in Data mode.
pub fn decode_submode(byte: u8, mode_a: Option<Mode>, mode_b: Option<Mode>) -> Option<Submode> {
    if mode_a != Some(Mode::Data) && mode_b != Some(Mode::Data) {
        return None;
    }
    Submode::from_index(submode_index(byte))
}

/// Render an optional mode for reports; unknown modes are blank
pub fn mode_label(mode: Option<Mode>) -> &'static str {
    mode.map(Mode::as_str).unwrap_or("")
}
