//! Time-triggered cooperative scheduler
//!
//! Two execution contexts touch the task table: the timer interrupt, which
//! only ever advances delays and promotes tasks to `Ready`, and the main
//! loop, which dispatches callbacks and registers or removes tasks. Nothing
//! here locks. On the single-core parts this targets, the contract is that
//! the ISR never runs a callback and only touches delay/state at tick
//! granularity. The preferred wiring avoids sharing the table altogether:
//! the ISR bumps a [`TickLatch`](crate::os::TickLatch) and the main loop
//! calls [`Scheduler::service`], which folds the pending ticks in before each
//! dispatch pass.

mod error;
mod health;
mod scheduler;
mod status;
mod task;

pub use error::{Error, FatalError};
pub use health::HealthStatus;
pub use scheduler::{DefaultScheduler, Scheduler};
pub use status::Status;
pub use task::{Runnable, Task, TaskHandle, TaskId, TaskState};
