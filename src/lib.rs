//! Time-triggered, non-preemptive task scheduler for single-core AVR parts
//!
//! Tasks live in a fixed table sized at compile time. A hardware timer
//! drives [`Scheduler::tick`] (directly, or through a [`TickLatch`]) and the
//! main loop keeps calling [`Scheduler::dispatch`]. No heap, no OS.
//!
//! ```
//! use core::cell::Cell;
//! use tt_sched::{Discard, Logger, Scheduler, TaskHandle};
//!
//! let blinks = Cell::new(0u32);
//! let blink = |_: &mut TaskHandle<'_>| blinks.set(blinks.get() + 1);
//!
//! let mut scheduler: Scheduler<'_, 4> = Scheduler::new();
//! scheduler.add_task(&blink, "blink", None, 0, 500).unwrap();
//! scheduler.start(&mut Logger::new(Discard)).unwrap();
//!
//! scheduler.tick();
//! scheduler.dispatch();
//! assert_eq!(blinks.get(), 1);
//! ```

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod diagnostics;
pub mod logger;
pub mod os;
pub mod rtos;

pub use logger::{Discard, Level, Logger, SerialSink};
pub use os::TickLatch;
pub use rtos::{
    DefaultScheduler, Error, FatalError, HealthStatus, Runnable, Scheduler, Status, Task,
    TaskHandle, TaskId, TaskState,
};
