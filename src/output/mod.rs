//! Result and log sinks.

mod csv;
mod log_sink;

pub use self::csv::{CsvResultSink, FaviconRecord, ResultSink};
pub use log_sink::{
    format_error_line, format_runtime_line, FileLogSink, LogSink, MemoryLogSink,
};
