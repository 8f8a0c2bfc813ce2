// kx3-mem: decoder for KX3 memory frames captured from the command link
// Copyright 2024 - Licensed under GPLv3

pub mod bitwise;
pub mod core;
pub mod formats;
pub mod records;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use bitwise::{decode_frequency, format_frequency};
pub use crate::core::{constants::*, Channel, Mode, Submode};
pub use formats::{export_channels, load_capture, CaptureLog};
pub use records::{
    classify, decode, ChannelRecord, DecodeError, DecodedRecord, RawRecord, RecordKind,
};
pub use session::{DecodeEvent, DecodeStats, LogDecoder, SessionError};
pub use state::{StateAccumulator, StateError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
