//! Console UART on USART2 (the ST-Link virtual COM port).
//!
//! Transmit goes through [`ConsoleUart`], the [`platform::UartPort`] handle
//! owned by the serial buffer task. Receive is DMA ring-buffered: the
//! [`crate::tasks::console_rx_pump`] task drains [`ConsoleRx`] and feeds the
//! shared rx-event channel, standing in for a receive ISR.

use embassy_stm32::bind_interrupts;
use embassy_stm32::peripherals::{DMA1_CH6, DMA1_CH7, PA2, PA3, USART2};
use embassy_stm32::usart::{self, Config, RingBufferedUartRx, Uart};
use platform::{DriverError, UartPort};

bind_interrupts!(pub struct Irqs {
    USART2 => usart::InterruptHandler<USART2>;
});

/// Console baud rate. The factory host scripts assume 115200-8-N-1.
pub const BAUD: u32 = 115_200;

/// Ring-buffered receive half, drained by the rx pump task.
pub type ConsoleRx = RingBufferedUartRx<'static, USART2, DMA1_CH6>;

/// Transmit half of the console UART.
pub struct ConsoleUart {
    tx: usart::UartTx<'static, USART2, DMA1_CH7>,
}

/// Open the console UART and split it into the tx handle and the
/// ring-buffered rx half.
pub fn console(
    usart: USART2,
    rx_pin: PA3,
    tx_pin: PA2,
    tx_dma: DMA1_CH7,
    rx_dma: DMA1_CH6,
    rx_buffer: &'static mut [u8],
) -> Result<(ConsoleUart, ConsoleRx), DriverError> {
    let mut config = Config::default();
    config.baudrate = BAUD;
    let uart = Uart::new(usart, rx_pin, tx_pin, Irqs, tx_dma, rx_dma, config)
        .map_err(|_| DriverError::Bus)?;
    let (tx, rx) = uart.split();
    Ok((ConsoleUart { tx }, rx.into_ring_buffered(rx_buffer)))
}

impl UartPort for ConsoleUart {
    fn tx_idle(&self) -> bool {
        // write_burst completes the DMA transfer before returning, so the
        // transmitter is idle whenever the buffer task can observe it.
        true
    }

    async fn write_burst(&mut self, bytes: &[u8]) -> Result<(), DriverError> {
        self.tx.write(bytes).await.map_err(|_| DriverError::Bus)
    }

    fn arm_receive(&mut self) {
        // The DMA ring buffer re-arms itself; nothing to do per cycle.
    }
}
