// Captured frame parsing, validation and decoding
pub mod checksum;
pub mod classify;
pub mod decode;
pub mod frame;

pub use classify::{classify, RecordKind};
pub use decode::{
    decode, decode_record, ChannelRecord, CommandRecord, DecodeError, DecodedRecord,
    SpecialBlock, SpecialRecord,
};
pub use frame::{decode_hex, encode_hex, FrameError, Opcode, RawRecord};
