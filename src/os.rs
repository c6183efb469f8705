//! Tick hand-off between the timer interrupt and the main loop

/// Count of ticks the timer ISR has signalled but the main loop has not yet
/// applied.
///
/// Place one in a `static`, call [`signal`](Self::signal) from the timer
/// interrupt and pass it to [`Scheduler::service`](crate::Scheduler::service)
/// from the super-loop. The count saturates instead of wrapping.
pub struct TickLatch {
    pending: imp::Pending,
}

impl TickLatch {
    pub const fn new() -> Self {
        Self {
            pending: imp::Pending::new(),
        }
    }

    /// Record one elapsed tick. Safe to call from interrupt context.
    #[inline]
    pub fn signal(&self) {
        self.pending.add_one();
    }

    /// Take every recorded tick, leaving the count at zero
    #[inline]
    pub fn take(&self) -> u32 {
        self.pending.take()
    }

    pub fn pending(&self) -> u32 {
        self.pending.get()
    }
}

impl Default for TickLatch {
    fn default() -> Self {
        Self::new()
    }
}

// AVR has no atomic read-modify-write, so the count lives behind an
// interrupt-free critical section there.
#[cfg(target_arch = "avr")]
mod imp {
    use avr_device::interrupt::{self, Mutex};
    use core::cell::Cell;

    pub struct Pending(Mutex<Cell<u16>>);

    impl Pending {
        pub const fn new() -> Self {
            Self(Mutex::new(Cell::new(0)))
        }

        pub fn add_one(&self) {
            interrupt::free(|cs| {
                let count = self.0.borrow(cs);
                count.set(count.get().saturating_add(1));
            })
        }

        pub fn take(&self) -> u32 {
            interrupt::free(|cs| u32::from(self.0.borrow(cs).replace(0)))
        }

        pub fn get(&self) -> u32 {
            interrupt::free(|cs| u32::from(self.0.borrow(cs).get()))
        }
    }
}

#[cfg(not(target_arch = "avr"))]
mod imp {
    use core::sync::atomic::{AtomicU32, Ordering};

    pub struct Pending(AtomicU32);

    impl Pending {
        pub const fn new() -> Self {
            Self(AtomicU32::new(0))
        }

        pub fn add_one(&self) {
            let _ = self
                .0
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| Some(n.saturating_add(1)));
        }

        pub fn take(&self) -> u32 {
            self.0.swap(0, Ordering::AcqRel)
        }

        pub fn get(&self) -> u32 {
            self.0.load(Ordering::Acquire)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn take_drains_the_count() {
        let latch = TickLatch::new();
        latch.signal();
        latch.signal();

        assert_eq!(latch.pending(), 2);
        assert_eq!(latch.take(), 2);
        assert_eq!(latch.take(), 0);
    }

    #[test]
    fn signals_from_another_context_are_not_lost() {
        let latch = Arc::new(TickLatch::new());
        let isr = {
            let latch = Arc::clone(&latch);
            thread::spawn(move || {
                for _ in 0..1000 {
                    latch.signal();
                }
            })
        };

        let mut seen = 0;
        while !isr.is_finished() {
            seen += latch.take();
        }
        isr.join().unwrap();
        seen += latch.take();

        assert_eq!(seen, 1000);
    }
}
