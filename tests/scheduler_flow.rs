use std::cell::Cell;

use tt_sched::{
    DefaultScheduler, Error, Logger, Runnable, Scheduler, Status, TaskHandle, TaskState,
    TickLatch,
};

fn capture() -> Logger<String> {
    Logger::new(String::new())
}

#[test]
fn periodic_task_end_to_end() {
    let runs = Cell::new(0u32);
    let task_a = |handle: &mut TaskHandle<'_>| {
        assert_eq!(handle.slot(), 0);
        assert!(handle.raw_context().is_none());
        runs.set(runs.get() + 1);
    };

    let mut sched: Scheduler<'_, 4> = Scheduler::new();
    sched.initialize().unwrap();

    let result = sched.add_task(&task_a, "A", None, 0, 5);
    assert_eq!(Status::of_add(&result), Status::TaskCreated);
    let id = result.unwrap();
    assert_eq!(id.slot(), 0);
    assert_eq!(sched.task(id).unwrap().state(), TaskState::Stopped);

    sched.tick();
    let a = sched.task(id).unwrap();
    assert_eq!((a.state(), a.delay()), (TaskState::Ready, 5));

    sched.dispatch();
    assert_eq!(runs.get(), 1);
    assert_eq!(sched.task(id).unwrap().state(), TaskState::Stopped);

    let mut delays = Vec::new();
    for _ in 0..4 {
        sched.tick();
        delays.push(sched.task(id).unwrap().delay());
    }
    assert_eq!(delays, [4, 3, 2, 1]);

    sched.tick();
    assert_eq!(sched.task(id).unwrap().delay(), 0);
    sched.tick();
    let a = sched.task(id).unwrap();
    assert_eq!((a.state(), a.delay()), (TaskState::Ready, 5));

    sched.dispatch();
    assert_eq!(runs.get(), 2);
}

#[test]
fn capacity_plus_one_overflows() {
    let hits: Vec<Cell<u32>> = (0..5).map(|_| Cell::new(0)).collect();
    let callbacks: Vec<_> = hits
        .iter()
        .map(|hit| move |_: &mut TaskHandle<'_>| hit.set(hit.get() + 1))
        .collect();

    let mut sched: Scheduler<'_, 4> = Scheduler::new();
    for cb in &callbacks[..4] {
        sched.add_task(cb, "t", None, 0, 0).unwrap();
    }

    let overflow = sched.add_task(&callbacks[4], "t", None, 0, 0);
    assert_eq!(overflow, Err(Error::TableFull));
    assert_eq!(Status::of_add(&overflow), Status::TooManyTasks);
    assert!(sched.health().overflow);
    assert_eq!(sched.task_count(), 4);

    sched.dispatch();
    let counts: Vec<u32> = hits.iter().map(Cell::get).collect();
    assert_eq!(counts, [1, 1, 1, 1, 0]);
}

#[test]
fn failed_start_reports_and_halts() {
    let runs = Cell::new(0u32);
    let poll = |_: &mut TaskHandle<'_>| runs.set(runs.get() + 1);

    let mut sched: Scheduler<'_, 2> = Scheduler::new();
    sched.add_task(&poll, "poll", None, 0, 0).unwrap();
    assert_eq!(sched.add_task(&poll, "poll", None, 0, 0), Err(Error::DuplicateTask));

    let mut log = capture();
    let fatal = sched.start(&mut log).unwrap_err();
    assert_eq!(fatal.kind, Error::StartPreconditionFailed);
    assert_eq!(fatal.task_count, 1);
    assert!(fatal.health.admission_failed);
    assert!(sched.is_halted());

    let out = log.into_inner();
    assert!(out.contains("Task name:\tpoll"));
    assert!(out.contains("RUN_PERMITTED:\t0"));
    assert!(out.ends_with("[E] [SCHEDULER] scheduler start error: start precondition failed (1 tasks)\n"));

    sched.dispatch();
    assert_eq!(runs.get(), 0);
}

#[test]
fn successful_start_then_service_loop() {
    let fast = Cell::new(0u32);
    let slow = Cell::new(0u32);
    let fast_cb = |_: &mut TaskHandle<'_>| fast.set(fast.get() + 1);
    let slow_cb = |_: &mut TaskHandle<'_>| slow.set(slow.get() + 1);
    let ticks = TickLatch::new();

    let mut sched = DefaultScheduler::new();
    sched.add_task(&fast_cb, "fast", None, 0, 1).unwrap();
    sched.add_task(&slow_cb, "slow", None, 0, 4).unwrap();

    let mut log = capture();
    sched.start(&mut log).unwrap();
    assert!(sched.health().run_permitted);
    assert!(log.sink().contains("RUN_PERMITTED:\t1"));
    assert!(!log.sink().contains("[E]"));

    // One tick per pass; periods of 1 and 4 fire every 2nd and 5th tick
    for _ in 0..20 {
        ticks.signal();
        sched.service(&ticks);
    }
    assert_eq!(fast.get(), 10);
    assert_eq!(slow.get(), 4);

    // A burst of ticks between passes is applied in one go
    for _ in 0..5 {
        ticks.signal();
    }
    sched.service(&ticks);
    assert_eq!(ticks.pending(), 0);
}

#[test]
fn removal_is_stable_across_reuse() {
    let hits = Cell::new(0u32);
    let a = |_: &mut TaskHandle<'_>| hits.set(hits.get() + 1);
    let b = |_: &mut TaskHandle<'_>| hits.set(hits.get() + 10);

    let mut sched: Scheduler<'_, 2> = Scheduler::new();
    let ida = sched.add_task(&a, "a", None, 0, 0).unwrap();

    assert_eq!(Status::of_remove(&sched.remove_task(ida)), Status::TaskDeleted);
    assert_eq!(Status::of_remove(&sched.remove_task(ida)), Status::TaskDeleted);
    assert_eq!(sched.task_count(), 0);

    let idb = sched.add_task(&b, "b", None, 0, 0).unwrap();
    assert_eq!(idb.slot(), ida.slot());
    assert_eq!(sched.remove_task(ida), Err(Error::StaleTask));

    sched.dispatch();
    assert_eq!(hits.get(), 10);
}

fn heartbeat(handle: &mut TaskHandle<'_>) {
    handle.set_state(TaskState::Stopped);
}

mod boot {
    use tt_sched::Runnable;

    pub fn tasks() -> &'static dyn Runnable {
        &super::heartbeat
    }
}

mod hotplug {
    use tt_sched::Runnable;

    pub fn tasks() -> &'static dyn Runnable {
        &super::heartbeat
    }
}

#[test]
fn same_function_registered_from_two_modules_is_a_duplicate() {
    let first: &dyn Runnable = boot::tasks();
    let second: &dyn Runnable = hotplug::tasks();

    let mut sched: Scheduler<'_, 4> = Scheduler::new();
    sched.add_task(first, "heartbeat", None, 0, 10).unwrap();

    let again = sched.add_task(second, "heartbeat", None, 0, 10);
    assert_eq!(again, Err(Error::DuplicateTask));
    assert_eq!(Status::of_add(&again), Status::TaskCreateFailed);
    assert_eq!(sched.task_count(), 1);
    assert!(sched.health().admission_failed);
}
