//! Runs the scheduler on the host with a thread standing in for the timer
//! interrupt.

use std::cell::Cell;
use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tt_sched::{
    log_info, log_warn, Level, Logger, Scheduler, TaskHandle, TaskState, TickLatch,
};
use ufmt::uWrite;

static TICKS: TickLatch = TickLatch::new();
static DONE: AtomicBool = AtomicBool::new(false);

const SIM_TICKS: u32 = 200;

struct Console;

impl uWrite for Console {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        print!("{}", s);
        Ok(())
    }
}

struct Sensor {
    samples: Cell<u32>,
}

impl tt_sched::Runnable for Sensor {
    fn run(&self, _handle: &mut TaskHandle<'_>) {
        self.samples.set(self.samples.get() + 1);
    }
}

fn main() {
    let mut log = Logger::new(Console).with_level(Level::Info);

    let sensor = Sensor {
        samples: Cell::new(0),
    };
    let reports = Cell::new(0u32);
    let passes = Cell::new(0u64);
    let calibrations = Cell::new(0u32);
    let station: &'static str = "rover-1";

    let telemetry = |handle: &mut TaskHandle<'_>| {
        let name = handle.context::<&'static str>().copied().unwrap_or("?");
        reports.set(reports.get() + 1);
        if reports.get() == 3 {
            println!("{}: telemetry muted after 3 reports", name);
            handle.suspend();
        }
    };
    let idle = |_: &mut TaskHandle<'_>| passes.set(passes.get() + 1);
    // Runs once on the first pass, then once more as a one-shot on the next tick
    let calibrate = |handle: &mut TaskHandle<'_>| {
        calibrations.set(calibrations.get() + 1);
        if handle.state() == TaskState::RunAlways {
            handle.set_state(TaskState::Stopped);
        }
    };

    let mut scheduler: Scheduler<'_, 4> = Scheduler::new();
    let _ = scheduler.initialize();
    let _ = scheduler.add_task(&sensor, "sensor", None, 0, 10);
    let _ = scheduler.add_task(&telemetry, "telemetry", Some(&station), 5, 50);
    let _ = scheduler.add_task(&idle, "idle", None, 0, 0);
    let _ = scheduler.add_task(&calibrate, "calibrate", None, 0, 0);

    if let Err(fatal) = scheduler.start(&mut log) {
        eprintln!("start failed: {}", fatal);
        std::process::exit(1);
    }

    let isr = thread::spawn(|| {
        for _ in 0..SIM_TICKS {
            thread::sleep(Duration::from_millis(1));
            TICKS.signal();
        }
        DONE.store(true, Ordering::Release);
    });

    while !DONE.load(Ordering::Acquire) {
        scheduler.service(&TICKS);
    }
    scheduler.service(&TICKS);
    let _ = isr.join();

    log_info!(log, "sensor samples: {}", sensor.samples.get());
    log_info!(log, "telemetry reports: {}", reports.get());
    log_info!(log, "calibration runs: {}", calibrations.get());
    log_warn!(log, "tasks left: {}", scheduler.task_count());
    println!("idle passes: {}", passes.get());
}
