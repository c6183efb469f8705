//! Scheduler status report

use ufmt::uWrite;

use crate::config::VERSION;
use crate::logger::Logger;
use crate::rtos::Scheduler;
use crate::log_warn;

const RULE: &str = "***********************************";

/// Dump the task count, every health flag and each registered task.
///
/// Emitted at `Warn` so it survives the default log level.
pub fn report<W, const N: usize>(scheduler: &Scheduler<'_, N>, log: &mut Logger<W>)
where
    W: uWrite,
{
    let health = scheduler.health();

    log_warn!(log, "{}", RULE);
    log_warn!(log, "**     SCHEDULER REPORT STATUS   **");
    log_warn!(log, "{}", RULE);
    log_warn!(log, " v{}", VERSION);
    log_warn!(log, "{}", RULE);
    log_warn!(log, "Tasks:\t{}/{}", scheduler.task_count(), scheduler.capacity());
    log_warn!(log, "{}", RULE);
    log_warn!(log, "Scheduler status flags:");
    flag(log, "INIT_FAILED", health.init_failed);
    flag(log, "OVERFLOW", health.overflow);
    flag(log, "ADMISSION_FAILED", health.admission_failed);
    flag(log, "REMOVAL_FAILED", health.removal_failed);
    flag(log, "RUN_PERMITTED", health.run_permitted);

    for task in scheduler.tasks() {
        log_warn!(log, "{}", RULE);
        log_warn!(log, "Task name:\t{}", task.name());
        log_warn!(log, "{}", RULE);
        log_warn!(log, "Task state:\t{}", task.state());
        log_warn!(log, "Task period:\t{}", task.period());
        log_warn!(log, "Task slot:\t{}", task.slot());
    }

    log_warn!(log, "{}", RULE);
}

fn flag<W: uWrite>(log: &mut Logger<W>, name: &str, value: bool) {
    log_warn!(log, "{}:\t{}", name, u8::from(value));
}
