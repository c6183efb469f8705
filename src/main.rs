//! ATmega128A firmware image: scheduler ticked by Timer0, status on USART0
#![cfg_attr(target_arch = "avr", no_std, no_main, feature(abi_avr_interrupt))]

#[cfg(target_arch = "avr")]
mod hal;

#[cfg(target_arch = "avr")]
mod firmware {
    use core::cell::Cell;

    use avr_device::atmega128a::Peripherals;
    use panic_halt as _;
    use tt_sched::{log_info, DefaultScheduler, Level, Logger, SerialSink, TaskHandle, TickLatch};

    use crate::hal::watchdog::WatchdogTimeout;
    use crate::hal::{SysTick, Usart0, Watchdog};

    static TICKS: TickLatch = TickLatch::new();

    const LED: u8 = 1 << 0;

    #[avr_device::interrupt(atmega128a)]
    fn TIMER0_COMP() {
        TICKS.signal();
    }

    #[avr_device::entry]
    fn main() -> ! {
        let dp = Peripherals::take().unwrap();

        let mut log = Logger::new(SerialSink::new(Usart0::new(dp.USART0))).with_level(Level::Info);
        let watchdog = Watchdog::start(dp.WDT, WatchdogTimeout::Ms500);
        let portb = dp.PORTB;
        unsafe { portb.ddrb.write(|w| w.bits(LED)) };

        let uptime_s = Cell::new(0u32);
        let kick = |_: &mut TaskHandle<'_>| watchdog.feed();
        let blink = |_: &mut TaskHandle<'_>| unsafe {
            portb.portb.modify(|r, w| w.bits(r.bits() ^ LED));
        };
        let clock = |_: &mut TaskHandle<'_>| uptime_s.set(uptime_s.get().wrapping_add(1));

        // Registration errors are sticky; start() refuses to run on any of them
        let mut scheduler = DefaultScheduler::new();
        let _ = scheduler.initialize();
        let _ = scheduler.add_task(&kick, "watchdog", None, 0, 0);
        let _ = scheduler.add_task(&blink, "blink", None, 0, 500);
        let _ = scheduler.add_task(&clock, "uptime", None, 0, 1000);

        if scheduler.start(&mut log).is_err() {
            watchdog.reset();
        }
        log_info!(log, "scheduler running");

        let _tick = SysTick::start(dp.TC0);
        unsafe { avr_device::interrupt::enable() };

        loop {
            scheduler.service(&TICKS);
        }
    }
}

#[cfg(not(target_arch = "avr"))]
fn main() {
    eprintln!("tt_sched_firmware only runs on the ATmega128A; try `cargo run --example host_sim`");
}
