// Core module containing the KX3 memory data structures
pub mod channel;
pub mod charset;
pub mod constants;
pub mod modes;

// Re-export commonly used types
pub use channel::Channel;
pub use charset::{decode_comment, decode_label, CHARSET_MAP};
pub use constants::*;
pub use modes::{decode_mode, decode_submode, Mode, Submode};
