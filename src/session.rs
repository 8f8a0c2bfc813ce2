// Line-by-line decoding of a captured command log
//
// Each line is parsed, checksummed, classified and decoded before the next
// one is read. Bad lines are logged and skipped; a state table overrun
// stops the run.

use crate::core::constants::SHORT_FRAME_MAX;
use crate::core::Channel;
use crate::records::{
    decode_record, DecodeError, DecodedRecord, Opcode, RawRecord, RecordKind,
};
use crate::state::StateAccumulator;
use serde::Serialize;
use std::io::BufRead;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: {source}")]
    Fatal {
        line: usize,
        #[source]
        source: DecodeError,
    },
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Counters for one decoding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecodeStats {
    pub lines: usize,
    /// Blank, comment and too-short lines
    pub ignored: usize,
    /// Lines that were not valid frames
    pub invalid: usize,
    pub checksum_failures: usize,
    pub malformed: usize,
    pub channels: usize,
    pub commands: usize,
    pub band_updates: usize,
    pub transverter_updates: usize,
}

impl DecodeStats {
    pub fn decoded(&self) -> usize {
        self.channels + self.commands + self.band_updates + self.transverter_updates
    }

    pub fn skipped(&self) -> usize {
        self.invalid + self.checksum_failures + self.malformed
    }
}

/// A successfully decoded line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeEvent {
    /// 1-based line number in the capture
    pub line: usize,
    pub opcode: Opcode,
    pub address: u16,
    pub kind: RecordKind,
    pub record: DecodedRecord,
}

impl DecodeEvent {
    /// Semantic view, for complete channel frames only
    pub fn channel(&self) -> Option<Channel> {
        match &self.record {
            DecodedRecord::Channel { slot, record } => Channel::from_record(*slot, record),
            _ => None,
        }
    }
}

/// Decoder for one capture. Owns the band and transverter state built up
/// from the lines it has seen.
#[derive(Debug, Default)]
pub struct LogDecoder {
    state: StateAccumulator,
    stats: DecodeStats,
    line: usize,
}

impl LogDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next line of the capture.
    ///
    /// Returns `Ok(None)` when the line carries nothing or was skipped.
    pub fn process_line(&mut self, text: &str) -> Result<Option<DecodeEvent>> {
        self.line += 1;
        self.stats.lines += 1;
        let line = self.line;

        let raw = match RawRecord::from_line(text) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.stats.ignored += 1;
                return Ok(None);
            }
            Err(e) => {
                self.stats.invalid += 1;
                tracing::warn!("Skipping line {}: {}", line, e);
                return Ok(None);
            }
        };

        match decode_record(&raw, &mut self.state) {
            Ok((kind, record)) => {
                self.count(&record);
                Ok(Some(DecodeEvent {
                    line,
                    opcode: raw.opcode(),
                    address: raw.address(),
                    kind,
                    record,
                }))
            }
            Err(e) if e.is_fatal() => Err(SessionError::Fatal { line, source: e }),
            Err(e) => {
                match e {
                    DecodeError::ChecksumMismatch { .. } => self.stats.checksum_failures += 1,
                    _ => self.stats.malformed += 1,
                }
                // Bare state requests have no payload
                if matches!(e, DecodeError::Malformed { total, .. } if total <= SHORT_FRAME_MAX) {
                    tracing::debug!("Skipping line {}: {} {}", line, raw.opcode(), e);
                } else {
                    tracing::warn!("Skipping line {}: {} {}", line, raw.opcode(), e);
                }
                Ok(None)
            }
        }
    }

    fn count(&mut self, record: &DecodedRecord) {
        match record {
            DecodedRecord::Channel { .. } => self.stats.channels += 1,
            DecodedRecord::Command(_) => self.stats.commands += 1,
            // A request without payload updates nothing
            DecodedRecord::BandState { slots } | DecodedRecord::TransverterState { slots }
                if slots.is_empty() => {}
            DecodedRecord::BandState { .. } => self.stats.band_updates += 1,
            DecodedRecord::TransverterState { .. } => self.stats.transverter_updates += 1,
        }
    }

    /// Decode every line of `reader`, in order
    pub fn process_reader<R: BufRead>(&mut self, reader: R) -> Result<Vec<DecodeEvent>> {
        let mut events = Vec::new();
        for text in reader.lines() {
            if let Some(event) = self.process_line(&text?)? {
                events.push(event);
            }
        }
        self.log_summary();
        Ok(events)
    }

    pub fn log_summary(&self) {
        tracing::info!(
            "Decoded {} of {} lines ({} channels, {} band, {} transverter, {} commands); \
             skipped {}",
            self.stats.decoded(),
            self.stats.lines,
            self.stats.channels,
            self.stats.band_updates,
            self.stats.transverter_updates,
            self.stats.commands,
            self.stats.skipped()
        );
    }

    pub fn state(&self) -> &StateAccumulator {
        &self.state
    }

    pub fn stats(&self) -> DecodeStats {
        self.stats
    }

    pub fn into_parts(self) -> (StateAccumulator, DecodeStats) {
        (self.state, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::decode::fixtures::{channel_frame, frame};
    use crate::records::encode_hex;

    fn line(op: &str, bytes: &[u8]) -> String {
        format!("{}{};", op, encode_hex(bytes))
    }

    #[test]
    fn test_channel_line() {
        let bytes = channel_frame(
            0x0C80,
            [7, 3, 0, 0, 0],
            [0xFF; 5],
            0x00,
            0xF0,
            [0x03, 0x11, 0x00, 0x00, 0x00],
            "",
        );
        let mut decoder = LogDecoder::new();
        let event = decoder.process_line(&line("ER", &bytes)).unwrap().unwrap();
        assert_eq!(event.line, 1);
        assert_eq!(event.opcode, Opcode::Read);
        assert_eq!(event.address, 0x0C80);
        assert_eq!(event.kind, RecordKind::ChannelMemory { slot: 2 });

        let ch = event.channel().unwrap();
        assert_eq!(ch.number, 2);
        assert_eq!(ch.label, "CQ   ");
        assert_eq!(ch.vfo_a_hz, 7_030_000);
        assert_eq!(ch.vfo_b_hz, 0);
        assert_eq!(ch.submode, None);
        assert_eq!(decoder.stats().channels, 1);
    }

    #[test]
    fn test_skips_bad_lines() {
        let mut decoder = LogDecoder::new();
        assert_eq!(decoder.process_line("# comment").unwrap(), None);
        assert_eq!(decoder.process_line("ER;").unwrap(), None);
        assert_eq!(decoder.process_line("ERZZ0C;").unwrap(), None);
        // Bad checksum
        assert_eq!(decoder.process_line("ER0C404075;").unwrap(), None);
        // Band request with no payload
        let bare = frame(0x0130, 0x10, &[]);
        assert_eq!(decoder.process_line(&line("ER", &bare)).unwrap(), None);

        let stats = decoder.stats();
        assert_eq!(stats.lines, 5);
        assert_eq!(stats.ignored, 2);
        assert_eq!(stats.invalid, 1);
        assert_eq!(stats.checksum_failures, 1);
        assert_eq!(stats.malformed, 1);
        assert_eq!(stats.decoded(), 0);
        assert_eq!(stats.skipped(), 3);
    }

    #[test]
    fn test_state_overrun_is_fatal() {
        let mut decoder = LogDecoder::new();
        // Band slot 24 plus one more runs off the table
        let bytes = frame(0x0100 + 24 * 16, 0x20, &[0u8; 32]);
        let err = decoder.process_line(&line("ER", &bytes)).unwrap_err();
        assert!(matches!(err, SessionError::Fatal { line: 1, .. }));
    }

    #[test]
    fn test_transverter_request_updates_nothing() {
        let mut decoder = LogDecoder::new();
        let bare = frame(0x02A2, 0x0A, &[]);
        let event = decoder.process_line(&line("ER", &bare)).unwrap().unwrap();
        assert_eq!(event.record, DecodedRecord::TransverterState { slots: 0..0 });

        let stats = decoder.stats();
        assert_eq!(stats.transverter_updates, 0);
        assert_eq!(stats.decoded(), 0);
        assert_eq!(decoder.state().written_transverter_slots().count(), 0);
    }

    #[test]
    fn test_process_reader_accumulates_state() {
        let first = frame(0x0110, 0x10, &[14, 0, 0, 0, 0, 14, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let second = frame(0x0110, 0x10, &[21, 0, 0, 0, 0, 21, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let ack = [0x0C, 0x40, 0x40, 0x74];
        let text = format!(
            "{}\n{}\n{}\n",
            line("ER", &first),
            line("EW", &second),
            line("EW", &ack)
        );

        let mut decoder = LogDecoder::new();
        let events = decoder.process_reader(text.as_bytes()).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[1].opcode, Opcode::Write);
        assert_eq!(events[1].record, DecodedRecord::BandState { slots: 1..2 });
        assert!(matches!(events[2].record, DecodedRecord::Command(_)));

        let band = decoder.state().band_view(1).unwrap();
        assert_eq!(band.vfo_a_hz, 21_000_000);
        assert_eq!(band.vfo_b_hz, 21_010_000);
    }
}
