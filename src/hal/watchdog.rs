use avr_device::atmega128a::WDT;

#[derive(Clone, Copy)]
#[repr(u8)]
pub enum WatchdogTimeout {
    Ms16 = 0,
    Ms32 = 1,
    Ms64 = 2,
    Ms125 = 3,
    Ms250 = 4,
    Ms500 = 5,
    Ms1000 = 6,
    Ms2000 = 7,
}

// WDCE | WDE, opens the four-cycle change window
const WDCE_WDE: u8 = 0x18;
const WDE: u8 = 0x08;

pub struct Watchdog {
    wdt: WDT,
}

impl Watchdog {
    pub fn start(wdt: WDT, timeout: WatchdogTimeout) -> Self {
        unsafe {
            wdt.wdtcr.write(|w| w.bits(WDCE_WDE));
            wdt.wdtcr.write(|w| w.bits(WDE | timeout as u8));
        }
        Self { wdt }
    }

    #[inline]
    pub fn feed(&self) {
        avr_device::asm::wdr();
    }

    /// Arm the shortest timeout and wait for the reset
    #[allow(clippy::empty_loop)]
    pub fn reset(&self) -> ! {
        unsafe {
            self.wdt.wdtcr.write(|w| w.bits(WDCE_WDE));
            self.wdt.wdtcr.write(|w| w.bits(WDE | WatchdogTimeout::Ms16 as u8));
        }
        loop {}
    }
}
