//! Configuration constants for the scheduler and the firmware image
//!
//! `MAX_TASKS` and `TICK_PERIOD_MS` come from the build script, which reads
//! `TT_SCHED_MAX_TASKS` and `TT_SCHED_TICK_MS` from the environment.

use crate::logger::Level;

/// Default task table capacity
pub const MAX_TASKS: usize = parse_u32(env!("TT_SCHED_MAX_TASKS")) as usize;

/// Period of the hardware tick in milliseconds
pub const TICK_PERIOD_MS: u32 = parse_u32(env!("TT_SCHED_TICK_MS"));

/// Version marker printed in the status report
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tag prefixed to every scheduler log line
pub const LOG_TAG: &str = "[SCHEDULER]";

/// Most verbose level the scheduler logger emits by default
pub const LOG_LEVEL: Level = Level::Warn;

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// UART baud rate
pub const UART_BAUD: u32 = 9600;

// build.rs has already validated the value, this only has to be const.
const fn parse_u32(raw: &str) -> u32 {
    let bytes = raw.as_bytes();
    let mut value: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        value = value * 10 + (bytes[i] - b'0') as u32;
        i += 1;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_settings() {
        assert_eq!(parse_u32("0"), 0);
        assert_eq!(parse_u32("16"), 16);
        assert_eq!(parse_u32("255"), 255);
    }

    #[test]
    fn build_settings_are_sane() {
        assert!((1..=255).contains(&MAX_TASKS));
        assert!(TICK_PERIOD_MS >= 1);
        assert!(!VERSION.is_empty());
    }
}
