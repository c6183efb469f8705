use std::env;

const DEFAULT_MAX_TASKS: &str = "8";
const DEFAULT_TICK_MS: &str = "1";

fn main() {
    println!("cargo:rerun-if-env-changed=TT_SCHED_MAX_TASKS");
    println!("cargo:rerun-if-env-changed=TT_SCHED_TICK_MS");

    let max_tasks = setting("TT_SCHED_MAX_TASKS", DEFAULT_MAX_TASKS);
    let tick_ms = setting("TT_SCHED_TICK_MS", DEFAULT_TICK_MS);

    // The task table stores slot indices in a u8.
    if max_tasks == 0 || max_tasks > 255 {
        panic!("TT_SCHED_MAX_TASKS must be within 1..=255, got {}", max_tasks);
    }
    if tick_ms == 0 {
        panic!("TT_SCHED_TICK_MS must be non-zero");
    }

    println!("cargo:rustc-env=TT_SCHED_MAX_TASKS={}", max_tasks);
    println!("cargo:rustc-env=TT_SCHED_TICK_MS={}", tick_ms);

    // Configure for ATmega128A when cross-compiling the firmware image
    let target = env::var("TARGET").unwrap_or_default();
    if target.contains("avr") {
        println!("cargo:rustc-link-arg=-mmcu=atmega128a");
        println!("cargo:warning=Building for ATmega128A, {} task slots, {} ms tick", max_tasks, tick_ms);
    }
}

fn setting(name: &str, default: &str) -> u32 {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse()
        .unwrap_or_else(|_| panic!("{} must be an unsigned integer, got {:?}", name, raw))
}
