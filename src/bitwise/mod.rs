// Binary parsing helpers for KX3 memory frames

pub mod digits;
pub mod elements;
pub mod parser;

pub use digits::{decode_frequency, format_frequency, FREQ_GROUP_LEN};
pub use elements::{read_u16_be, ElementError};
pub use parser::{parse_array, parse_i32_be, parse_u16_be, parse_u8, PrefixReader};
