// Licensed under the Apache-2.0 license

//! Shared utilities for the responder driver.
//!
//! Logging is pluggable through the [`Logger`] trait so the driver never depends on a
//! particular console. [`NoOpLogger`] is the default everywhere a logger type parameter
//! appears; [`IoLogger`] forwards to any `embedded-io` sink such as a UART.

use core::fmt::Write as _;
use heapless::String;

/// Capacity of the scratch buffer used to format a single log line.
pub const LOG_LINE_CAPACITY: usize = 96;

/// Minimal logging interface used by the driver.
pub trait Logger {
    fn debug(&mut self, msg: &str);
    fn error(&mut self, msg: &str);
}

/// Logger that discards every message.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    fn debug(&mut self, _msg: &str) {}
    fn error(&mut self, _msg: &str) {}
}

/// Logger writing `[LEVEL] message\r\n` lines to an `embedded_io::Write` sink.
///
/// Write errors are dropped: losing a log line must never disturb the bus handshake.
pub struct IoLogger<W: embedded_io::Write> {
    writer: W,
}

impl<W: embedded_io::Write> IoLogger<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn line(&mut self, level: &str, msg: &str) {
        let _ = self.writer.write_all(level.as_bytes());
        let _ = self.writer.write_all(msg.as_bytes());
        let _ = self.writer.write_all(b"\r\n");
    }
}

impl<W: embedded_io::Write> Logger for IoLogger<W> {
    fn debug(&mut self, msg: &str) {
        self.line("[DEBUG] ", msg);
    }

    fn error(&mut self, msg: &str) {
        self.line("[ERROR] ", msg);
    }
}

/// Format `args` into a fixed-capacity line. Fragments that do not fit are dropped.
pub(crate) fn format_line(args: core::fmt::Arguments<'_>) -> String<LOG_LINE_CAPACITY> {
    let mut line = String::new();
    let _ = line.write_fmt(args);
    line
}
