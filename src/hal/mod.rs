//! Board support used by the firmware image

pub mod timer;
pub mod uart;
pub mod watchdog;

pub use timer::SysTick;
pub use uart::Usart0;
pub use watchdog::Watchdog;
