//! Timer0 compare-match interrupt as the scheduler tick

use avr_device::atmega128a::TC0;
use tt_sched::config::{CPU_FREQ_HZ, TICK_PERIOD_MS};

const PRESCALER: u32 = 64;
// CS02:0 = 0b100 selects clk/64 on Timer0 of the 128A
const CS_DIV64: u8 = 0b100;
const WGM01: u8 = 1 << 3;
const OCIE0: u8 = 1 << 1;

const COMPARE: u32 = CPU_FREQ_HZ / PRESCALER / 1000 * TICK_PERIOD_MS;
const _: () = assert!(
    COMPARE >= 1 && COMPARE <= 256,
    "Timer0 cannot produce TT_SCHED_TICK_MS at clk/64"
);

/// Owns Timer0 for as long as the tick runs
pub struct SysTick {
    _tc0: TC0,
}

impl SysTick {
    /// Put Timer0 in CTC mode and enable the compare interrupt. Ticks start
    /// arriving once interrupts are globally enabled.
    pub fn start(tc0: TC0) -> Self {
        unsafe {
            tc0.tcnt0.write(|w| w.bits(0));
            tc0.ocr0.write(|w| w.bits((COMPARE - 1) as u8));
            tc0.tccr0.write(|w| w.bits(WGM01 | CS_DIV64));
            tc0.timsk.modify(|r, w| w.bits(r.bits() | OCIE0));
        }
        Self { _tc0: tc0 }
    }
}
