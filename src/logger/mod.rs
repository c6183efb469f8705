//! Log sinks for scheduler diagnostics
//!
//! Everything is written through `ufmt::uWrite`, so the same logger can
//! drive a UART on target and a `String` on the host.

use core::convert::Infallible;

use embedded_hal::serial;
use ufmt::{uWrite, uwrite};

use crate::config::{LOG_LEVEL, LOG_TAG};

/// Severity of a log line, most severe first
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl Level {
    pub const fn marker(self) -> &'static str {
        match self {
            Level::Error => "[E]",
            Level::Warn => "[W]",
            Level::Info => "[I]",
            Level::Debug => "[D]",
        }
    }
}

/// Level-filtered, tagged writer on top of a `uWrite` sink
pub struct Logger<W> {
    sink: W,
    level: Level,
    tag: &'static str,
}

impl<W> Logger<W> {
    pub const fn new(sink: W) -> Self {
        Self {
            sink,
            level: LOG_LEVEL,
            tag: LOG_TAG,
        }
    }

    pub const fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub const fn with_tag(mut self, tag: &'static str) -> Self {
        self.tag = tag;
        self
    }

    pub fn set_level(&mut self, level: Level) {
        self.level = level;
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.level
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: uWrite> Logger<W> {
    /// Write the line prefix and hand back the sink, or `None` when `level`
    /// is filtered out. Used by the `log_*!` macros.
    #[doc(hidden)]
    pub fn begin(&mut self, level: Level) -> Option<&mut W> {
        if !self.enabled(level) {
            return None;
        }
        // Logging must never take the caller down
        let _ = uwrite!(self.sink, "{} {} ", level.marker(), self.tag);
        Some(&mut self.sink)
    }
}

#[macro_export]
macro_rules! log_at {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        if let Some(sink) = $logger.begin($level) {
            let _ = ufmt::uwriteln!(sink, $($arg)+);
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::logger::Level::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::logger::Level::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::logger::Level::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::logger::Level::Debug, $($arg)+)
    };
}

/// `uWrite` adapter over a blocking-capable serial transmitter.
///
/// Line feeds go out as CR LF, which is what serial terminals expect.
pub struct SerialSink<S> {
    serial: S,
}

impl<S> SerialSink<S> {
    pub const fn new(serial: S) -> Self {
        Self { serial }
    }

    pub fn release(self) -> S {
        self.serial
    }
}

impl<S: serial::Write<u8>> SerialSink<S> {
    pub fn flush(&mut self) -> Result<(), S::Error> {
        nb::block!(self.serial.flush())
    }
}

impl<S: serial::Write<u8>> uWrite for SerialSink<S> {
    type Error = S::Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for byte in s.bytes() {
            if byte == b'\n' {
                nb::block!(self.serial.write(b'\r'))?;
            }
            nb::block!(self.serial.write(byte))?;
        }
        Ok(())
    }
}

/// Sink for builds without a console
#[derive(Copy, Clone, Debug, Default)]
pub struct Discard;

impl uWrite for Discard {
    type Error = Infallible;

    fn write_str(&mut self, _s: &str) -> Result<(), Infallible> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::serial::{Mock as SerialMock, Transaction as SerialTransaction};

    #[test]
    fn lines_are_prefixed_and_filtered() {
        let mut log = Logger::new(String::new()).with_tag("[TEST]");
        assert_eq!(log.level(), Level::Warn);

        crate::log_warn!(log, "tasks: {}", 3u8);
        crate::log_info!(log, "dropped");
        crate::log_error!(log, "bad {}", "thing");

        assert_eq!(log.sink(), "[W] [TEST] tasks: 3\n[E] [TEST] bad thing\n");
    }

    #[test]
    fn level_can_be_raised() {
        let mut log = Logger::new(String::new()).with_level(Level::Debug);
        crate::log_debug!(log, "x");
        log.set_level(Level::Error);
        crate::log_warn!(log, "y");

        assert_eq!(log.into_inner(), "[D] [SCHEDULER] x\n");
    }

    #[test]
    fn serial_sink_writes_crlf() {
        let expectations = [
            SerialTransaction::write_many(b"[W] [SCHEDULER] up\r\n"),
            SerialTransaction::flush(),
        ];
        let serial = SerialMock::new(&expectations);

        let mut log = Logger::new(SerialSink::new(serial));
        crate::log_warn!(log, "up");
        log.sink_mut().flush().unwrap();

        let mut serial = log.into_inner().release();
        serial.done();
    }

    #[test]
    fn discard_accepts_everything() {
        let mut log = Logger::new(Discard).with_level(Level::Debug);
        crate::log_debug!(log, "{} {}", 1u32, "two");
        assert!(log.enabled(Level::Debug));
    }
}
