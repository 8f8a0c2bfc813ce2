//! Captured command logs on disk

use crate::core::Channel;
use crate::session::{DecodeEvent, DecodeStats, LogDecoder, Result};
use crate::state::StateAccumulator;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Everything decoded from one capture
#[derive(Debug)]
pub struct CaptureLog {
    pub events: Vec<DecodeEvent>,
    pub state: StateAccumulator,
    pub stats: DecodeStats,
}

impl CaptureLog {
    /// Complete channels by slot number. A slot seen more than once keeps
    /// its last contents.
    pub fn channels(&self) -> Vec<Channel> {
        let mut by_slot = BTreeMap::new();
        for ch in self.events.iter().filter_map(DecodeEvent::channel) {
            by_slot.insert(ch.number, ch);
        }
        by_slot.into_values().collect()
    }
}

/// Decode a capture from any line source
pub fn read_capture<R: BufRead>(reader: R) -> Result<CaptureLog> {
    let mut decoder = LogDecoder::new();
    let events = decoder.process_reader(reader)?;
    let (state, stats) = decoder.into_parts();
    Ok(CaptureLog {
        events,
        state,
        stats,
    })
}

/// Load and decode a capture file
pub fn load_capture(path: impl AsRef<Path>) -> Result<CaptureLog> {
    let path = path.as_ref();
    tracing::info!("Loading capture {}", path.display());
    let file = File::open(path)?;
    read_capture(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::decode::fixtures::channel_frame;
    use crate::records::encode_hex;
    use crate::session::SessionError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn channel_line(address: u16, mhz: u8) -> String {
        let frame = channel_frame(
            address,
            [mhz, 0, 0, 0, 0],
            [0xFF; 5],
            0x11,
            0xF0,
            [0x01, 0x02, 0x03, 0x04, 0x05],
            "",
        );
        format!("ER{};", encode_hex(&frame))
    }

    #[test]
    fn test_load_capture() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# captured at the bench").unwrap();
        writeln!(file, "{}", channel_line(0x0C80, 14)).unwrap();
        writeln!(file, "{}", channel_line(0x0C00, 7)).unwrap();
        writeln!(file, "ER0C404074;").unwrap();
        writeln!(file, "{}", channel_line(0x0C80, 21)).unwrap();
        file.flush().unwrap();

        let log = load_capture(file.path()).unwrap();
        assert_eq!(log.events.len(), 4);
        assert_eq!(log.stats.channels, 3);
        assert_eq!(log.stats.commands, 1);
        assert_eq!(log.stats.ignored, 1);

        let channels = log.channels();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].number, 0);
        assert_eq!(channels[0].vfo_a_hz, 7_000_000);
        assert_eq!(channels[1].number, 2);
        assert_eq!(channels[1].vfo_a_hz, 21_000_000);
        assert_eq!(channels[1].label, "ABCDE");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_capture(dir.path().join("missing.log")).unwrap_err();
        assert!(matches!(err, SessionError::Io(_)));
    }
}
