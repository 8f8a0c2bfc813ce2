// Band and transverter state tables assembled from partial reads
//
// The radio answers long status reads with several consecutive slots, and a
// slot table may be spread over more than one read. Each merge overwrites
// whole slots; the most recent read of a slot wins.

use crate::bitwise::decode_frequency;
use crate::core::constants::{BAND_SIZE, BAND_SLOTS, XVTR_SIZE, XVTR_SLOTS};
use crate::records::frame::encode_hex;
use serde::Serialize;
use std::fmt;
use std::ops::Range;
use thiserror::Error;

/// Raw band state slot: VFO A digits, VFO B digits, 6 state bytes
pub type BandSlot = [u8; BAND_SIZE];

/// Raw transverter state slot
pub type XvtrSlot = [u8; XVTR_SIZE];

/// Which state table an operation touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StateTable {
    Band,
    Transverter,
}

impl fmt::Display for StateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateTable::Band => f.write_str("band"),
            StateTable::Transverter => f.write_str("transverter"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The address map produced a slot the table does not have
    #[error("{table} state slot {index} out of range ({slots} slots)")]
    IndexOutOfRange {
        table: StateTable,
        index: usize,
        slots: usize,
    },
}

pub type Result<T> = std::result::Result<T, StateError>;

/// Decoded view of one band state slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BandState {
    pub vfo_a_hz: u32,
    pub vfo_b_hz: u32,
    pub state: [u8; 6],
}

impl BandState {
    pub fn from_slot(slot: &BandSlot) -> Self {
        let mut vfo_a = [0u8; 5];
        let mut vfo_b = [0u8; 5];
        let mut state = [0u8; 6];
        vfo_a.copy_from_slice(&slot[0..5]);
        vfo_b.copy_from_slice(&slot[5..10]);
        state.copy_from_slice(&slot[10..16]);

        Self {
            vfo_a_hz: decode_frequency(&vfo_a),
            vfo_b_hz: decode_frequency(&vfo_b),
            state,
        }
    }
}

/// Copy one `chunks_exact` chunk into a slot of the same size
fn copy_slot<const N: usize>(chunk: &[u8]) -> [u8; N] {
    let mut slot = [0u8; N];
    slot.copy_from_slice(chunk);
    slot
}

/// Per-session band and transverter state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateAccumulator {
    band: [BandSlot; BAND_SLOTS],
    band_written: [bool; BAND_SLOTS],
    xvtr: [XvtrSlot; XVTR_SLOTS],
    xvtr_written: [bool; XVTR_SLOTS],
}

impl Default for StateAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl StateAccumulator {
    /// All slots start zeroed
    pub fn new() -> Self {
        Self {
            band: [[0u8; BAND_SIZE]; BAND_SLOTS],
            band_written: [false; BAND_SLOTS],
            xvtr: [[0u8; XVTR_SIZE]; XVTR_SLOTS],
            xvtr_written: [false; XVTR_SLOTS],
        }
    }

    fn check_range(
        table: StateTable,
        start: usize,
        len: usize,
        slots: usize,
    ) -> Result<Range<usize>> {
        let end = start + len;
        if end > slots {
            return Err(StateError::IndexOutOfRange {
                table,
                index: end - 1,
                slots,
            });
        }
        Ok(start..end)
    }

    fn check_index(table: StateTable, index: usize, slots: usize) -> Result<()> {
        if index >= slots {
            return Err(StateError::IndexOutOfRange {
                table,
                index,
                slots,
            });
        }
        Ok(())
    }

    /// Overwrite band slots `start..start + chunks.len()`.
    /// Nothing is written if any slot is out of range.
    pub fn merge_band_state(&mut self, start: usize, chunks: &[BandSlot]) -> Result<Range<usize>> {
        if chunks.is_empty() {
            return Ok(start..start);
        }
        let range = Self::check_range(StateTable::Band, start, chunks.len(), BAND_SLOTS)?;
        for (index, chunk) in range.clone().zip(chunks) {
            tracing::debug!("Band state[{}] = {}", index, encode_hex(chunk));
            self.band[index] = *chunk;
            self.band_written[index] = true;
        }
        Ok(range)
    }

    /// Overwrite transverter slots `start..start + chunks.len()`.
    /// Nothing is written if any slot is out of range.
    pub fn merge_transverter_state(
        &mut self,
        start: usize,
        chunks: &[XvtrSlot],
    ) -> Result<Range<usize>> {
        if chunks.is_empty() {
            return Ok(start..start);
        }
        let range = Self::check_range(StateTable::Transverter, start, chunks.len(), XVTR_SLOTS)?;
        for (index, chunk) in range.clone().zip(chunks) {
            tracing::debug!("Transverter state[{}] = {}", index, encode_hex(chunk));
            self.xvtr[index] = *chunk;
            self.xvtr_written[index] = true;
        }
        Ok(range)
    }

    /// Split a run of band slots out of raw bytes and merge it.
    /// Any trailing bytes shorter than a slot are ignored.
    pub fn merge_band_bytes(&mut self, start: usize, bytes: &[u8]) -> Result<Range<usize>> {
        let chunks: Vec<BandSlot> = bytes
            .chunks_exact(BAND_SIZE)
            .map(copy_slot::<BAND_SIZE>)
            .collect();
        self.merge_band_state(start, &chunks)
    }

    /// Split a run of transverter slots out of raw bytes and merge it
    pub fn merge_transverter_bytes(&mut self, start: usize, bytes: &[u8]) -> Result<Range<usize>> {
        let chunks: Vec<XvtrSlot> = bytes
            .chunks_exact(XVTR_SIZE)
            .map(copy_slot::<XVTR_SIZE>)
            .collect();
        self.merge_transverter_state(start, &chunks)
    }

    pub fn band_state(&self, index: usize) -> Result<&BandSlot> {
        Self::check_index(StateTable::Band, index, BAND_SLOTS)?;
        Ok(&self.band[index])
    }

    pub fn transverter_state(&self, index: usize) -> Result<&XvtrSlot> {
        Self::check_index(StateTable::Transverter, index, XVTR_SLOTS)?;
        Ok(&self.xvtr[index])
    }

    /// Decoded frequencies and state bytes of a band slot
    pub fn band_view(&self, index: usize) -> Result<BandState> {
        self.band_state(index).map(BandState::from_slot)
    }

    /// Band slots that have received data, in index order
    pub fn written_band_slots(&self) -> impl Iterator<Item = (usize, &BandSlot)> + '_ {
        self.band
            .iter()
            .enumerate()
            .filter(move |(i, _)| self.band_written[*i])
    }

    /// Transverter slots that have received data, in index order
    pub fn written_transverter_slots(&self) -> impl Iterator<Item = (usize, &XvtrSlot)> + '_ {
        self.xvtr
            .iter()
            .enumerate()
            .filter(move |(i, _)| self.xvtr_written[*i])
    }

    /// Serializable copy of every written slot
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            band: self
                .written_band_slots()
                .map(|(index, slot)| BandSnapshot {
                    index,
                    view: BandState::from_slot(slot),
                    raw: encode_hex(slot),
                })
                .collect(),
            transverter: self
                .written_transverter_slots()
                .map(|(index, slot)| XvtrSnapshot {
                    index,
                    raw: encode_hex(slot),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BandSnapshot {
    pub index: usize,
    #[serde(flatten)]
    pub view: BandState,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XvtrSnapshot {
    pub index: usize,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    pub band: Vec<BandSnapshot>,
    pub transverter: Vec<XvtrSnapshot>,
}
