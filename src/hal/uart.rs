//! Polled USART0 transmitter for the log sink

use core::convert::Infallible;

use avr_device::atmega128a::USART0;
use embedded_hal::serial;
use tt_sched::config::{CPU_FREQ_HZ, UART_BAUD};

const UBRR: u16 = (CPU_FREQ_HZ / (16 * UART_BAUD) - 1) as u16;

const TXEN0: u8 = 1 << 3;
const UDRE0: u8 = 1 << 5;
const TXC0: u8 = 1 << 6;
// 8 data bits, no parity, 1 stop bit
const UCSZ_8N1: u8 = 0b0000_0110;

pub struct Usart0 {
    usart: USART0,
}

impl Usart0 {
    pub fn new(usart: USART0) -> Self {
        unsafe {
            usart.ubrr0h.write(|w| w.bits((UBRR >> 8) as u8));
            usart.ubrr0l.write(|w| w.bits(UBRR as u8));
            usart.ucsr0c.write(|w| w.bits(UCSZ_8N1));
            usart.ucsr0b.write(|w| w.bits(TXEN0));
        }
        Self { usart }
    }
}

impl serial::Write<u8> for Usart0 {
    type Error = Infallible;

    fn write(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        if self.usart.ucsr0a.read().bits() & UDRE0 == 0 {
            return Err(nb::Error::WouldBlock);
        }
        // Writing a one clears TXC0, so flush() waits for this byte
        unsafe {
            self.usart.ucsr0a.modify(|r, w| w.bits(r.bits() | TXC0));
            self.usart.udr0.write(|w| w.bits(byte));
        }
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        if self.usart.ucsr0a.read().bits() & TXC0 == 0 {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    }
}
