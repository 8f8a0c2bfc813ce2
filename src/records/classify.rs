// Address-range dispatch for captured frames

use crate::core::constants::{
    BAND_SIZE, BAND_START, FRAME_OVERHEAD, MEM_SIZE, MEM_START, SHORT_FRAME_MAX, XVTR_SIZE,
    XVTR_START,
};
use serde::Serialize;

/// Layout a frame is decoded with, chosen from its address and size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordKind {
    /// Ordinary channel memory
    ChannelMemory { slot: u16 },
    /// One or more consecutive band state slots
    BandState { slot: usize, count: usize },
    /// One or more consecutive transverter state slots; a long read may end
    /// partway into the table, so `count` can be zero
    TransverterState { slot: usize, count: usize },
    /// Acknowledgement or bare request with no payload
    ShortCommand,
    /// Nothing we know how to decode
    Malformed,
}

impl RecordKind {
    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::ChannelMemory { .. } => "channel",
            RecordKind::BandState { .. } => "band state",
            RecordKind::TransverterState { .. } => "transverter state",
            RecordKind::ShortCommand => "command",
            RecordKind::Malformed => "malformed",
        }
    }
}

/// Pick the record layout for a frame.
///
/// `total_bytes` is the decoded frame length, trailer included. The state
/// tables are matched first; below and above them a frame of
/// `SHORT_FRAME_MAX` bytes or fewer is a bare command. The declared length
/// byte is not used to choose the layout.
pub fn classify(address: u16, _declared_length: usize, total_bytes: usize) -> RecordKind {
    let payload = total_bytes.saturating_sub(FRAME_OVERHEAD);

    if (BAND_START..MEM_START).contains(&address) {
        if address >= XVTR_START {
            return RecordKind::TransverterState {
                slot: usize::from(address - XVTR_START) / XVTR_SIZE,
                count: payload / XVTR_SIZE,
            };
        }

        let count = payload / BAND_SIZE;
        if count == 0 {
            return RecordKind::Malformed;
        }
        return RecordKind::BandState {
            slot: usize::from(address - BAND_START) / BAND_SIZE,
            count,
        };
    }

    if total_bytes <= SHORT_FRAME_MAX {
        return RecordKind::ShortCommand;
    }

    if address >= MEM_START {
        return RecordKind::ChannelMemory {
            slot: (address - MEM_START) / MEM_SIZE,
        };
    }

    RecordKind::Malformed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_memory() {
        assert_eq!(
            classify(0x0C40, 0x40, 139),
            RecordKind::ChannelMemory { slot: 1 }
        );
        assert_eq!(
            classify(0x0C00, 0x40, 68),
            RecordKind::ChannelMemory { slot: 0 }
        );
        assert_eq!(
            classify(0x0C7F, 0x40, 68),
            RecordKind::ChannelMemory { slot: 1 }
        );
        assert_eq!(
            classify(0xFFC0, 0x40, 68),
            RecordKind::ChannelMemory { slot: 975 }
        );
    }

    #[test]
    fn test_transverter_state() {
        assert_eq!(
            classify(0x02AC, 0, 24),
            RecordKind::TransverterState { slot: 1, count: 2 }
        );
        assert_eq!(
            classify(0x02A2, 0x0A, 14),
            RecordKind::TransverterState { slot: 0, count: 1 }
        );
        // A bare read request carries no slots
        assert_eq!(
            classify(0x02A2, 0x0A, 4),
            RecordKind::TransverterState { slot: 0, count: 0 }
        );
        assert_eq!(
            classify(0x02A2, 0, 1),
            RecordKind::TransverterState { slot: 0, count: 0 }
        );
    }

    #[test]
    fn test_band_state() {
        assert_eq!(
            classify(0x0100, 0x40, 68),
            RecordKind::BandState { slot: 0, count: 4 }
        );
        assert_eq!(
            classify(0x0130, 0x10, 20),
            RecordKind::BandState { slot: 3, count: 1 }
        );
        // A request for band state is not state data
        assert_eq!(classify(0x0130, 0x10, 4), RecordKind::Malformed);
        assert_eq!(classify(0x0130, 0x10, 19), RecordKind::Malformed);
    }

    #[test]
    fn test_short_command() {
        assert_eq!(classify(0x0C40, 0x40, 4), RecordKind::ShortCommand);
        assert_eq!(classify(0x0000, 0x00, 4), RecordKind::ShortCommand);
        assert_eq!(classify(0x00FF, 0x00, 11), RecordKind::ShortCommand);
    }

    #[test]
    fn test_malformed_below_state_tables() {
        assert_eq!(classify(0x0000, 0x40, 68), RecordKind::Malformed);
        assert_eq!(classify(0x00F0, 0x08, 12), RecordKind::Malformed);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(RecordKind::ShortCommand.name(), "command");
        assert_eq!(RecordKind::ChannelMemory { slot: 0 }.name(), "channel");
    }
}
