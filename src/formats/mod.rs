// File format handlers
pub mod capture;
pub mod csv;

pub use capture::{load_capture, read_capture, CaptureLog};
pub use csv::{export_channels, write_channels, CsvError};
