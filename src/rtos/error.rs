//! Scheduler error kinds

use core::fmt;

use ufmt::{uDisplay, uWrite, uwrite, Formatter};

use super::HealthStatus;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Admission rejected, every slot is taken
    TableFull,
    /// The callback is already registered
    DuplicateTask,
    /// Slot index outside the table
    InvalidSlot,
    /// The slot now belongs to a different task
    StaleTask,
    /// Table could not be reset, or reset was attempted after start
    InitializationFailure,
    /// Admission was attempted on a full table
    OverflowDetected,
    /// Sticky failure flag set, or task count outside `1..=N`
    StartPreconditionFailed,
    /// A previous start failed; only a reset gets out of this
    Halted,
}

impl Error {
    pub const fn as_str(self) -> &'static str {
        match self {
            Error::TableFull => "task table full",
            Error::DuplicateTask => "task already registered",
            Error::InvalidSlot => "slot index out of range",
            Error::StaleTask => "task id no longer valid",
            Error::InitializationFailure => "initialization failure",
            Error::OverflowDetected => "task overflow detected",
            Error::StartPreconditionFailed => "start precondition failed",
            Error::Halted => "scheduler halted",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl uDisplay for Error {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(self.as_str())
    }
}

/// Returned by a failed `start`. The scheduler is halted at that point and
/// it is up to the integrator to reset the part, trip the watchdog or fall
/// back to a safe mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FatalError {
    pub kind: Error,
    pub task_count: usize,
    pub health: HealthStatus,
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} tasks)", self.kind, self.task_count)
    }
}

impl uDisplay for FatalError {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        uwrite!(f, "{} ({} tasks)", self.kind, self.task_count)
    }
}
