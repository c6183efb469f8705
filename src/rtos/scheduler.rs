//! Fixed-capacity task table, tick step, dispatcher and start gate

use core::any::Any;

use ufmt::uWrite;

use super::{Error, FatalError, HealthStatus, Runnable, Status, Task, TaskId, TaskState};
use crate::config::MAX_TASKS;
use crate::diagnostics;
use crate::logger::Logger;
use crate::os::TickLatch;

/// Scheduler sized with the build-time default capacity
pub type DefaultScheduler<'a> = Scheduler<'a, MAX_TASKS>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Halted,
}

struct Slot<'a> {
    generation: u16,
    task: Option<Task<'a>>,
}

impl<'a> Slot<'a> {
    const EMPTY: Self = Self {
        generation: 0,
        task: None,
    };
}

/// Cooperative, time-triggered scheduler over `N` task slots.
///
/// `tick` advances delays, `dispatch` runs whatever is due. Neither
/// allocates. The scheduler never dereferences task contexts, it only hands
/// them back to the callbacks that registered them.
pub struct Scheduler<'a, const N: usize> {
    slots: [Slot<'a>; N],
    active: usize,
    health: HealthStatus,
    phase: Phase,
}

impl<'a, const N: usize> Scheduler<'a, N> {
    const VALID_CAPACITY: () = assert!(N >= 1 && N <= 256, "capacity must be within 1..=256");

    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_CAPACITY;

        Self {
            slots: [Slot::EMPTY; N],
            active: 0,
            health: HealthStatus::CLEAR,
            phase: Phase::Idle,
        }
    }

    /// Empty the table and clear every health flag.
    ///
    /// Only allowed before `start`; afterwards the call is rejected, the
    /// init-failure flag is raised and the table is left as it is.
    pub fn initialize(&mut self) -> Result<(), Error> {
        if self.phase != Phase::Idle {
            self.health.init_failed = true;
            return Err(Error::InitializationFailure);
        }

        for index in 0..N {
            self.release(index);
        }
        self.health = HealthStatus::CLEAR;

        Ok(())
    }

    /// Register a task.
    ///
    /// A zero `period` makes the task `RunAlways`; otherwise it starts
    /// `Stopped` and is promoted once `delay` ticks have elapsed.
    pub fn add_task(
        &mut self,
        callback: &'a dyn Runnable,
        name: &'a str,
        context: Option<&'a dyn Any>,
        delay: u32,
        period: u32,
    ) -> Result<TaskId, Error> {
        if self.phase == Phase::Halted {
            return Err(Error::Halted);
        }

        match self.admit(callback, name, context, delay, period) {
            Ok(id) => {
                self.health.admission_failed = false;
                Ok(id)
            }
            Err(err) => {
                self.health.admission_failed = true;
                if err == Error::TableFull {
                    self.health.overflow = true;
                }
                Err(err)
            }
        }
    }

    fn admit(
        &mut self,
        callback: &'a dyn Runnable,
        name: &'a str,
        context: Option<&'a dyn Any>,
        delay: u32,
        period: u32,
    ) -> Result<TaskId, Error> {
        if self.active >= N {
            return Err(Error::TableFull);
        }
        if self.tasks().any(|task| task.runs(callback)) {
            return Err(Error::DuplicateTask);
        }

        let index = self
            .slots
            .iter()
            .position(|slot| slot.task.is_none())
            .ok_or(Error::TableFull)?;

        let slot = &mut self.slots[index];
        // Wraps after 65536 fills of one slot; see `TaskId`
        slot.generation = slot.generation.wrapping_add(1);
        let id = TaskId::new(index, slot.generation);
        slot.task = Some(Task::new(callback, name, context, delay, period, id));
        self.active += 1;

        Ok(id)
    }

    /// Remove a task. Other tasks keep their slots.
    ///
    /// Removing from a slot that is already empty succeeds without effect.
    pub fn remove_task(&mut self, id: TaskId) -> Result<(), Error> {
        if self.phase == Phase::Halted {
            return Err(Error::Halted);
        }

        let Some(slot) = self.slots.get(id.slot()) else {
            self.health.removal_failed = true;
            return Err(Error::InvalidSlot);
        };

        match &slot.task {
            None => Ok(()),
            Some(task) if task.id() != id => {
                self.health.removal_failed = true;
                Err(Error::StaleTask)
            }
            Some(_) => {
                self.release(id.slot());
                Ok(())
            }
        }
    }

    /// Freeze a task so tick promotion skips it
    pub fn suspend_task(&mut self, id: TaskId) -> Result<(), Error> {
        if self.phase == Phase::Halted {
            return Err(Error::Halted);
        }
        self.live_mut(id)?.state = TaskState::Suspended;
        Ok(())
    }

    /// Undo a suspension. Periodic tasks wait for their next promotion,
    /// zero-period tasks go back to running every pass.
    pub fn resume_task(&mut self, id: TaskId) -> Result<(), Error> {
        if self.phase == Phase::Halted {
            return Err(Error::Halted);
        }
        let task = self.live_mut(id)?;
        if task.state == TaskState::Suspended {
            task.state = if task.period() == 0 {
                TaskState::RunAlways
            } else {
                TaskState::Stopped
            };
        }
        Ok(())
    }

    /// Advance every task by one tick.
    ///
    /// This is the step a timer ISR would run. Use `TickLatch` plus
    /// `service` to defer it to the main loop instead.
    pub fn tick(&mut self) {
        if self.phase == Phase::Halted {
            return;
        }

        for task in self.slots.iter_mut().filter_map(|slot| slot.task.as_mut()) {
            task.tick();
        }
    }

    /// One cooperative pass over the table, in slot order.
    ///
    /// `RunAlways` tasks run on every pass. `Ready` tasks run once, then drop
    /// back to `Stopped` unless the callback picked another state; a `Ready`
    /// task with a zero period is a one-shot and leaves the table afterwards.
    /// Callbacks run to completion, so a slow one delays everything behind it.
    pub fn dispatch(&mut self) {
        if self.phase == Phase::Halted {
            return;
        }

        for index in 0..N {
            let Some(task) = self.slots[index].task.as_mut() else {
                continue;
            };

            if task.state == TaskState::RunAlways {
                task.invoke();
            }

            if task.state == TaskState::Ready {
                task.state = TaskState::Running;
                task.invoke();

                if task.state == TaskState::Running {
                    task.state = TaskState::Stopped;
                }
                if task.period() == 0 {
                    self.release(index);
                }
            }
        }
    }

    /// Apply the ticks the ISR recorded since the last call, then dispatch.
    ///
    /// This is the single point where tick effects become visible to the
    /// table, so callbacks never observe their delay or state changing under
    /// them. Call it from the super-loop.
    pub fn service(&mut self, ticks: &TickLatch) {
        for _ in 0..ticks.take() {
            self.tick();
        }
        self.dispatch();
    }

    /// Check the health flags and task count and, if they allow it, grant
    /// run permission.
    ///
    /// The status report goes to `log` either way. On failure the scheduler
    /// halts for good: `tick`, `dispatch` and registration stop doing
    /// anything and the caller gets the reason back.
    pub fn start<W>(&mut self, log: &mut Logger<W>) -> Result<(), FatalError>
    where
        W: uWrite,
    {
        let verdict = self.check_start();

        match verdict {
            Ok(()) => {
                self.health.run_permitted = true;
                self.phase = Phase::Running;
            }
            Err(_) => {
                self.health.run_permitted = false;
                self.phase = Phase::Halted;
            }
        }

        diagnostics::report(self, log);

        if let Err(fatal) = &verdict {
            crate::log_error!(log, "scheduler start error: {}", fatal);
        }

        verdict
    }

    fn check_start(&self) -> Result<(), FatalError> {
        let kind = if self.phase == Phase::Halted {
            Error::Halted
        } else if self.health.init_failed {
            Error::InitializationFailure
        } else if self.health.overflow {
            Error::OverflowDetected
        } else if self.health.has_failure() || !(1..=N).contains(&self.active) {
            Error::StartPreconditionFailed
        } else {
            return Ok(());
        };

        Err(FatalError {
            kind,
            task_count: self.active,
            health: self.health,
        })
    }

    pub fn task(&self, id: TaskId) -> Option<&Task<'a>> {
        self.slots
            .get(id.slot())?
            .task
            .as_ref()
            .filter(|task| task.id() == id)
    }

    /// Occupied slots in slot order
    pub fn tasks(&self) -> impl Iterator<Item = &Task<'a>> + '_ {
        self.slots.iter().filter_map(|slot| slot.task.as_ref())
    }

    pub fn task_count(&self) -> usize {
        self.active
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn health(&self) -> HealthStatus {
        self.health
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_halted(&self) -> bool {
        self.phase == Phase::Halted
    }

    pub fn status(&self) -> Status {
        match self.phase {
            Phase::Idle => Status::Ok,
            Phase::Running => Status::Running,
            Phase::Halted => Status::Error,
        }
    }

    fn live_mut(&mut self, id: TaskId) -> Result<&mut Task<'a>, Error> {
        self.slots
            .get_mut(id.slot())
            .ok_or(Error::InvalidSlot)?
            .task
            .as_mut()
            .filter(|task| task.id() == id)
            .ok_or(Error::StaleTask)
    }

    fn release(&mut self, index: usize) {
        if self.slots[index].task.take().is_some() {
            self.active -= 1;
        }
    }
}

impl<'a, const N: usize> Default for Scheduler<'a, N> {
    fn default() -> Self {
        Self::new()
    }
}
