//! Task entries and the handle passed to task callbacks

use core::any::Any;
use core::{mem, ptr};

use ufmt::{uDisplay, uWrite, Formatter};

/// Lifecycle state of a registered task
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskState {
    /// Waiting for its delay to expire
    Stopped,
    /// Delay expired, runs on the next dispatch pass
    Ready,
    /// Callback currently executing
    Running,
    /// Invoked on every dispatch pass, never tick-gated
    RunAlways,
    /// Frozen; tick promotion skips it
    Suspended,
}

impl TaskState {
    pub const fn as_str(self) -> &'static str {
        match self {
            TaskState::Stopped => "STOPPED",
            TaskState::Ready => "READY",
            TaskState::Running => "RUNNING",
            TaskState::RunAlways => "RUN_ALWAYS",
            TaskState::Suspended => "SUSPENDED",
        }
    }
}

impl uDisplay for TaskState {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(self.as_str())
    }
}

/// Stable identity of a registered task.
///
/// The slot index alone is reused once a task is removed; the generation
/// tells a live task apart from whatever previously occupied the slot.
/// The generation is 16 bits wide and wraps, so an id kept across 65536
/// reuses of its slot matches again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TaskId {
    slot: u8,
    generation: u16,
}

impl TaskId {
    pub(crate) const fn new(slot: usize, generation: u16) -> Self {
        Self {
            slot: slot as u8,
            generation,
        }
    }

    /// Position of the task in the table
    pub const fn slot(self) -> usize {
        self.slot as usize
    }

    pub const fn generation(self) -> u16 {
        self.generation
    }
}

/// Unit of work invoked by the dispatcher.
///
/// Closures and plain functions taking `&mut TaskHandle` implement this
/// directly. Types carrying their own state implement it by hand and keep
/// that state behind `Cell`/`RefCell`, since the scheduler only holds a
/// shared reference.
pub trait Runnable {
    fn run(&self, handle: &mut TaskHandle<'_>);

    /// Name of the implementing type, used to tell zero-sized callbacks apart
    #[doc(hidden)]
    fn type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

impl<F> Runnable for F
where
    F: Fn(&mut TaskHandle<'_>),
{
    fn run(&self, handle: &mut TaskHandle<'_>) {
        self(handle)
    }
}

/// View of its own task handed to a callback while it runs.
///
/// The only thing a callback may change is its own state; the dispatcher
/// copies it back once `run` returns.
pub struct TaskHandle<'a> {
    id: TaskId,
    context: Option<&'a dyn Any>,
    state: TaskState,
}

impl<'a> TaskHandle<'a> {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn slot(&self) -> usize {
        self.id.slot()
    }

    /// Context registered with the task, if it is a `T`
    pub fn context<T: Any>(&self) -> Option<&'a T> {
        self.context?.downcast_ref::<T>()
    }

    pub fn raw_context(&self) -> Option<&'a dyn Any> {
        self.context
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn set_state(&mut self, state: TaskState) {
        self.state = state;
    }

    /// Freeze the task until it is resumed through the scheduler
    pub fn suspend(&mut self) {
        self.state = TaskState::Suspended;
    }
}

/// A registered task
pub struct Task<'a> {
    callback: &'a dyn Runnable,
    name: &'a str,
    context: Option<&'a dyn Any>,
    pub(crate) delay: u32,
    period: u32,
    pub(crate) state: TaskState,
    id: TaskId,
}

impl<'a> Task<'a> {
    pub(crate) fn new(
        callback: &'a dyn Runnable,
        name: &'a str,
        context: Option<&'a dyn Any>,
        delay: u32,
        period: u32,
        id: TaskId,
    ) -> Self {
        let state = if period == 0 {
            TaskState::RunAlways
        } else {
            TaskState::Stopped
        };

        Self {
            callback,
            name,
            context,
            delay,
            period,
            state,
            id,
        }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Ticks left before the next activation
    pub fn delay(&self) -> u32 {
        self.delay
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn slot(&self) -> usize {
        self.id.slot()
    }

    /// One tick of the delay/readiness update.
    ///
    /// Runs in interrupt context on ports that call it from the timer ISR:
    /// no callback, no allocation, constant time.
    pub(crate) fn tick(&mut self) {
        if self.delay == 0 {
            if !matches!(self.state, TaskState::RunAlways | TaskState::Suspended) {
                self.state = TaskState::Ready;
            }
            if self.period > 0 {
                self.delay = self.period;
            }
        } else {
            self.delay -= 1;
        }
    }

    /// Run the callback and adopt whatever state it left in its handle
    pub(crate) fn invoke(&mut self) {
        let mut handle = TaskHandle {
            id: self.id,
            context: self.context,
            state: self.state,
        };
        self.callback.run(&mut handle);
        self.state = handle.state;
    }

    pub(crate) fn runs(&self, callback: &dyn Runnable) -> bool {
        same_callback(self.callback, callback)
    }
}

// Zero-sized callbacks (fn items, closures without captures) all live at the
// same dangling address, and each coercion site may emit its own vtable.
// Named items are matched by type name. Closures share one name per
// enclosing function, so for those the vtable is all there is.
fn same_callback(a: &dyn Runnable, b: &dyn Runnable) -> bool {
    if mem::size_of_val(a) != 0 || mem::size_of_val(b) != 0 {
        return ptr::addr_eq(a, b);
    }

    let name = a.type_name();
    if name == b.type_name() && !name.contains("closure}") {
        return true;
    }
    ptr::eq(a, b)
}
