// Fixed-layout record decoding
//
// Channel memory frame (68 bytes, big-endian):
//   0  address (u16)      13 modes            22 reserved x5
//   2  length             14 data sub-mode    27 padding x8
//   3  VFO A digits x5    15 reserved x3      35 label x5
//   8  VFO B digits x5    18 band / xvtr      40 comment x24
//                         19 sub-tone         64 checksum (i32)
//                         20 repeater offset
//                         21 repeater flags

use super::checksum;
use super::classify::{classify, RecordKind};
use super::frame::{FrameError, RawRecord};
use crate::bitwise::{read_u16_be, PrefixReader};
use crate::core::charset::{COMMENT_LEN, LABEL_LEN};
use crate::core::constants::{
    BAND_SIZE, CHANNEL_FRAME_LEN, FRAME_HEADER_LEN, XVTR_SIZE,
};
use crate::state::{StateAccumulator, StateError};
use serde::Serialize;
use std::ops::Range;
use thiserror::Error;

/// Padding between the reserved flags and the label
const CHANNEL_PADDING: usize = 8;

/// Sub-blocks in a special memory frame
pub const SPECIAL_BLOCKS: usize = 4;

/// Size of one special memory sub-block
pub const SPECIAL_BLOCK_LEN: usize = 16;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Checksum bad: residue {residue:#04x} should be zero")]
    ChecksumMismatch { residue: u8 },

    #[error("Malformed frame: {total} bytes at address {address:#06x}")]
    Malformed { address: u16, total: usize },

    #[error("Frame too short: need {needed} bytes, have {available}")]
    ShortFrame { needed: usize, available: usize },

    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("State table error: {0}")]
    State(#[from] StateError),
}

impl DecodeError {
    /// Errors that mean the address map itself is wrong; the run must stop
    pub fn is_fatal(&self) -> bool {
        matches!(self, DecodeError::State(_))
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;

/// Ordinary channel memory, as stored by the radio.
///
/// A frame shorter than 68 bytes decodes as far as it goes; every field
/// past the first one that does not fit is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelRecord {
    pub address: u16,
    pub length: Option<u8>,
    pub vfo_a: Option<[u8; 5]>,
    pub vfo_b: Option<[u8; 5]>,
    /// VFO A mode in the low nibble, VFO B in the high nibble
    pub modes: Option<u8>,
    /// Data sub-mode and speed
    pub dmode: Option<u8>,
    pub reserved_a: Option<[u8; 3]>,
    /// Transverter bit and band index
    pub band: Option<u8>,
    pub subtone: Option<u8>,
    /// Repeater offset in 20 kHz steps
    pub offset: Option<u8>,
    pub repeater_flags: Option<u8>,
    pub reserved_b: Option<[u8; 5]>,
    pub label: Option<[u8; LABEL_LEN]>,
    pub comment: Option<[u8; COMMENT_LEN]>,
    pub checksum: Option<i32>,
}

impl ChannelRecord {
    pub fn parse(buffer: &[u8]) -> Result<Self> {
        let mut reader = PrefixReader::new(buffer);
        let address = reader.u16_be().ok_or(DecodeError::ShortFrame {
            needed: 2,
            available: buffer.len(),
        })?;

        let length = reader.u8();
        let vfo_a = reader.array();
        let vfo_b = reader.array();
        let modes = reader.u8();
        let dmode = reader.u8();
        let reserved_a = reader.array();
        let band = reader.u8();
        let subtone = reader.u8();
        let offset = reader.u8();
        let repeater_flags = reader.u8();
        let reserved_b = reader.array();
        let label = reader.skip(CHANNEL_PADDING).and_then(|_| reader.array());
        let comment = reader.array();
        let checksum = reader.i32_be();

        if reader.is_exhausted() {
            tracing::debug!(
                "Channel frame at {:#06x} truncated at {} of {} bytes",
                address,
                buffer.len(),
                CHANNEL_FRAME_LEN
            );
        }

        Ok(Self {
            address,
            length,
            vfo_a,
            vfo_b,
            modes,
            dmode,
            reserved_a,
            band,
            subtone,
            offset,
            repeater_flags,
            reserved_b,
            label,
            comment,
            checksum,
        })
    }

    /// Whether every field, trailer included, was present
    pub fn is_complete(&self) -> bool {
        self.checksum.is_some()
    }
}

/// Acknowledgement or request without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandRecord {
    pub address: u16,
    pub length: Option<u8>,
    pub checksum: Option<u8>,
}

impl CommandRecord {
    pub fn parse(buffer: &[u8]) -> Result<Self> {
        let address = read_u16_be(buffer).map_err(|_| DecodeError::ShortFrame {
            needed: 2,
            available: buffer.len(),
        })?;
        let length = buffer.get(2).copied();
        let checksum = if buffer.len() > FRAME_HEADER_LEN {
            buffer.last().copied()
        } else {
            None
        };
        Ok(Self {
            address,
            length,
            checksum,
        })
    }
}

/// One sub-block of a special memory frame. Field meaning is unknown; only
/// the shape is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpecialBlock {
    pub vfo_a: [u8; 5],
    pub vfo_b: [u8; 5],
    pub f0: u8,
    pub f1: u8,
    pub f2: u8,
    pub f3: u8,
    pub f4: u8,
    pub f5: u8,
}

/// Special memory frame: four repeated sub-blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecialRecord {
    pub address: u16,
    pub length: u8,
    pub blocks: [SpecialBlock; SPECIAL_BLOCKS],
    pub checksum: u8,
}

impl SpecialRecord {
    pub const LEN: usize = FRAME_HEADER_LEN + SPECIAL_BLOCKS * SPECIAL_BLOCK_LEN + 1;

    pub fn parse(buffer: &[u8]) -> Result<Self> {
        let short = || DecodeError::ShortFrame {
            needed: Self::LEN,
            available: buffer.len(),
        };
        let mut reader = PrefixReader::new(buffer);
        let address = reader.u16_be().ok_or_else(short)?;
        let length = reader.u8().ok_or_else(short)?;

        let mut blocks = [SpecialBlock {
            vfo_a: [0; 5],
            vfo_b: [0; 5],
            f0: 0,
            f1: 0,
            f2: 0,
            f3: 0,
            f4: 0,
            f5: 0,
        }; SPECIAL_BLOCKS];
        for block in blocks.iter_mut() {
            let vfo_a = reader.array().ok_or_else(short)?;
            let vfo_b = reader.array().ok_or_else(short)?;
            let [f0, f1, f2, f3, f4, f5] = reader.array::<6>().ok_or_else(short)?;
            *block = SpecialBlock {
                vfo_a,
                vfo_b,
                f0,
                f1,
                f2,
                f3,
                f4,
                f5,
            };
        }
        let checksum = reader.u8().ok_or_else(short)?;

        Ok(Self {
            address,
            length,
            blocks,
            checksum,
        })
    }
}

/// Result of decoding one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedRecord {
    Channel { slot: u16, record: ChannelRecord },
    Command(CommandRecord),
    /// Band state slots that were overwritten
    BandState { slots: Range<usize> },
    /// Transverter state slots that were overwritten
    TransverterState { slots: Range<usize> },
}

fn state_payload(buffer: &[u8], count: usize, slot_len: usize) -> Result<&[u8]> {
    let end = FRAME_HEADER_LEN + count * slot_len;
    buffer
        .get(FRAME_HEADER_LEN..end)
        .ok_or(DecodeError::ShortFrame {
            needed: end + 1,
            available: buffer.len(),
        })
}

/// Decode a frame with the layout chosen by [`classify`].
/// State frames are merged into `state` rather than returned.
pub fn decode(
    kind: RecordKind,
    buffer: &[u8],
    state: &mut StateAccumulator,
) -> Result<DecodedRecord> {
    match kind {
        RecordKind::ChannelMemory { slot } => Ok(DecodedRecord::Channel {
            slot,
            record: ChannelRecord::parse(buffer)?,
        }),
        RecordKind::ShortCommand => Ok(DecodedRecord::Command(CommandRecord::parse(buffer)?)),
        RecordKind::BandState { slot, count } => {
            let payload = state_payload(buffer, count, BAND_SIZE)?;
            let slots = state.merge_band_bytes(slot, payload)?;
            Ok(DecodedRecord::BandState { slots })
        }
        RecordKind::TransverterState { slot, count } => {
            let payload = state_payload(buffer, count, XVTR_SIZE)?;
            let slots = state.merge_transverter_bytes(slot, payload)?;
            Ok(DecodedRecord::TransverterState { slots })
        }
        RecordKind::Malformed => Err(DecodeError::Malformed {
            address: read_u16_be(buffer).unwrap_or_default(),
            total: buffer.len(),
        }),
    }
}

/// Check, classify and decode one captured frame
pub fn decode_record(
    raw: &RawRecord,
    state: &mut StateAccumulator,
) -> Result<(RecordKind, DecodedRecord)> {
    let buffer = raw.bytes();
    if !checksum::validate(buffer) {
        return Err(DecodeError::ChecksumMismatch {
            residue: checksum::residue(buffer),
        });
    }

    let declared = raw.declared_length().map(usize::from).unwrap_or_default();
    let kind = classify(raw.address(), declared, raw.len());
    tracing::debug!(
        "{} {:#06x}: {} bytes -> {}",
        raw.opcode(),
        raw.address(),
        raw.len(),
        kind.name()
    );

    let record = decode(kind, buffer, state)?;
    Ok((kind, record))
}
