//! Sticky health flags gating `Scheduler::start`

/// Each flag is only set by the operation it describes and only cleared by
/// `Scheduler::initialize`, except `admission_failed`, which the next
/// successful admission clears.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HealthStatus {
    /// `initialize` was called on a started or halted scheduler
    pub init_failed: bool,
    /// Admission was attempted on a full table
    pub overflow: bool,
    /// The last admission was rejected
    pub admission_failed: bool,
    /// A removal named a slot outside the table or a stale task
    pub removal_failed: bool,
    /// `start` succeeded
    pub run_permitted: bool,
}

impl HealthStatus {
    pub const CLEAR: Self = Self {
        init_failed: false,
        overflow: false,
        admission_failed: false,
        removal_failed: false,
        run_permitted: false,
    };

    /// Any failure flag set
    pub const fn has_failure(&self) -> bool {
        self.init_failed || self.overflow || self.admission_failed || self.removal_failed
    }
}
