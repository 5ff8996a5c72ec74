//! Sink implementations
//!
//! Contains JsonLineSink (stdout), FileSink and LogSink.

mod file;
mod json_line;
mod log;

pub use self::file::{FileSink, FileSinkConfig};
pub use self::json_line::JsonLineSink;
pub use self::log::LogSink;
