// Raw frames recovered from a captured command log
//
// Each captured line is `<opcode><hex bytes><terminator>`, e.g.
//   ER0C40400E...;
// The opcode is two characters ("ER" read, "EW" write) and the terminator
// is a single trailing character, normally ';'.

use crate::bitwise::read_u16_be;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Not a capture line: {0:?}")]
    InvalidLine(String),

    #[error("Invalid hex pair {pair:?} at offset {offset}")]
    InvalidHex { pair: String, offset: usize },

    #[error("Frame too short: {0} bytes, need at least 2 for the address")]
    TooShort(usize),
}

pub type Result<T> = std::result::Result<T, FrameError>;

lazy_static::lazy_static! {
    static ref LINE_RE: Regex =
        Regex::new(r"^(?P<op>.{2})(?P<hex>(?:[0-9A-Fa-f]{2})*)(?P<end>.)$")
            .expect("capture line pattern is valid");
}

/// Direction of a captured frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Opcode {
    /// `ER` - memory read
    Read,
    /// `EW` - memory write
    Write,
    /// Any other two-character prefix
    Other,
}

impl Opcode {
    pub fn from_prefix(prefix: &str) -> Self {
        match prefix {
            "ER" => Opcode::Read,
            "EW" => Opcode::Write,
            _ => Opcode::Other,
        }
    }

    /// Four-column tag used in reports
    pub fn tag(self) -> &'static str {
        match self {
            Opcode::Read => "Read",
            Opcode::Write => "Writ",
            Opcode::Other => "Othr",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One raw frame: opcode plus the hex-decoded bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    opcode: Opcode,
    address: u16,
    bytes: Vec<u8>,
}

impl RawRecord {
    /// Wrap decoded bytes; the first two bytes are the big-endian address
    pub fn new(opcode: Opcode, bytes: Vec<u8>) -> Result<Self> {
        let address = read_u16_be(&bytes).map_err(|_| FrameError::TooShort(bytes.len()))?;
        Ok(Self {
            opcode,
            address,
            bytes,
        })
    }

    /// Parse one captured line.
    ///
    /// Returns `Ok(None)` for lines that carry no frame: comments (`#`) and
    /// anything three characters or shorter. Trailing whitespace is ignored.
    pub fn from_line(line: &str) -> Result<Option<Self>> {
        let line = line.trim_end();
        if line.len() <= 3 || line.starts_with('#') {
            return Ok(None);
        }

        let caps = LINE_RE
            .captures(line)
            .ok_or_else(|| FrameError::InvalidLine(line.to_string()))?;
        let opcode = Opcode::from_prefix(&caps["op"]);
        let bytes = decode_hex(&caps["hex"])?;

        Self::new(opcode, bytes).map(Some)
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    /// Length byte following the address, if present
    pub fn declared_length(&self) -> Option<u8> {
        self.bytes.get(2).copied()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Decode a string of hex pairs
pub fn decode_hex(hex: &str) -> Result<Vec<u8>> {
    hex.as_bytes()
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| {
            let invalid = || FrameError::InvalidHex {
                pair: String::from_utf8_lossy(pair).into_owned(),
                offset: i * 2,
            };
            if pair.len() != 2 || !pair.iter().all(u8::is_ascii_hexdigit) {
                return Err(invalid());
            }
            let text = std::str::from_utf8(pair).map_err(|_| invalid())?;
            u8::from_str_radix(text, 16).map_err(|_| invalid())
        })
        .collect()
}

/// Lowercase hex rendering of raw bytes
pub fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
