//! Embassy tasks and the static channels that join them.
//!
//! Channel topology (interface jig; the RF switch jig drops the LED lane):
//!
//! ```text
//! console_rx_pump ─→ RX_EVENTS ─→ buffer_task ─→ CONSOLE_RX ─→ command task
//!                                     ↑                            │
//!                                CONSOLE_TX ←──────────────────────┤
//!                                                  LED_UPDATES ←───┘─→ led_task
//! ```
//!
//! `CriticalSectionRawMutex` everywhere: the pump task competes with thread
//! mode for the event channel, and the cost is a sub-microsecond PRIMASK
//! window per queue operation.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_futures::select::{select, Either};
use embassy_stm32::gpio::{AnyPin, Output};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver};
use embassy_time::{Duration, Timer};
use static_cell::StaticCell;

use serial::{
    RxByteEvent, SerialBufferEngine, SerialCommandEngine, RX_EVENT_DEPTH, RX_QUEUE_DEPTH,
    TX_INBOX_DEPTH,
};

use crate::hal::led::{LedChain, LedUpdate, LED_UPDATE_DEPTH};
use crate::hal::{ConsoleRx, ConsoleUart, InterfaceBoard, RfSwitchBoard};

/// Transmit staging capacity of the console UART burst.
pub const CONSOLE_BURST: usize = 32;

/// UART index of the console in rx events and the channel table.
pub const CONSOLE_UART_INDEX: u8 = 0;

/// DMA ring-buffer size for console receive.
pub const RX_DMA_BUF_LEN: usize = 256;

/// Rx events from the pump task to the buffer task.
pub static RX_EVENTS: Channel<CriticalSectionRawMutex, RxByteEvent, RX_EVENT_DEPTH> =
    Channel::new();

/// Console rx bytes from the buffer task to the command task.
pub static CONSOLE_RX: Channel<CriticalSectionRawMutex, u8, RX_QUEUE_DEPTH> = Channel::new();

/// Response bytes from the command task back to the buffer task.
pub static CONSOLE_TX: Channel<CriticalSectionRawMutex, u8, TX_INBOX_DEPTH> = Channel::new();

/// LED settings from the command task to the LED task.
pub static LED_UPDATES: Channel<CriticalSectionRawMutex, LedUpdate, LED_UPDATE_DEPTH> =
    Channel::new();

/// PPS run flag shared between [`crate::hal::GpioPps`] and [`pps_task`].
pub static PPS_ENABLED: AtomicBool = AtomicBool::new(false);

/// Backing storage for the console DMA ring buffer.
pub static RX_DMA_BUF: StaticCell<[u8; RX_DMA_BUF_LEN]> = StaticCell::new();

/// Drain the DMA ring buffer into the rx-event channel. This task is the
/// interrupt-side producer of the data path; it must never block on the
/// channel, so full-channel bytes are dropped and logged.
#[embassy_executor::task]
pub async fn console_rx_pump(mut rx: ConsoleRx) {
    let mut chunk = [0_u8; 32];
    loop {
        match rx.read(&mut chunk).await {
            Ok(count) => {
                for &byte in chunk.get(..count).unwrap_or_default() {
                    let event = RxByteEvent {
                        uart: CONSOLE_UART_INDEX,
                        byte,
                    };
                    if RX_EVENTS.sender().try_send(event).is_err() {
                        defmt::warn!("rx event channel full, byte dropped");
                    }
                }
            }
            Err(_) => {
                defmt::warn!("console rx overrun, ring buffer restarting");
                Timer::after(Duration::from_millis(2)).await;
            }
        }
    }
}

/// Serial buffer task over the console UART.
#[embassy_executor::task]
pub async fn buffer_task(
    engine: SerialBufferEngine<'static, CriticalSectionRawMutex, ConsoleUart, CONSOLE_BURST>,
) -> ! {
    serial::buffer::run(engine).await
}

/// Serial command task of the interface jig.
#[embassy_executor::task]
pub async fn interface_command_task(
    engine: SerialCommandEngine<'static, CriticalSectionRawMutex, InterfaceBoard>,
) -> ! {
    engine.run().await
}

/// Serial command task of the RF switch jig.
#[embassy_executor::task]
pub async fn rf_switch_command_task(
    engine: SerialCommandEngine<'static, CriticalSectionRawMutex, RfSwitchBoard>,
) -> ! {
    engine.run().await
}

/// Frame period for blink and walk animation.
const LED_FRAME: Duration = Duration::from_millis(250);

/// Own the LED chain: absorb setting changes, advance the animation.
#[embassy_executor::task]
pub async fn led_task(
    mut chain: LedChain,
    updates: Receiver<'static, CriticalSectionRawMutex, LedUpdate, LED_UPDATE_DEPTH>,
) -> ! {
    loop {
        match select(updates.receive(), Timer::after(LED_FRAME)).await {
            Either::First(update) => chain.apply(update),
            Either::Second(()) => chain.tick(),
        }
    }
}

/// Free-run a 1 Hz pulse (100 ms high) while [`PPS_ENABLED`] is set.
#[embassy_executor::task]
pub async fn pps_task(mut pin: Output<'static, AnyPin>) -> ! {
    loop {
        if PPS_ENABLED.load(Ordering::Relaxed) {
            pin.set_high();
            Timer::after(Duration::from_millis(100)).await;
            pin.set_low();
            Timer::after(Duration::from_millis(900)).await;
        } else {
            pin.set_low();
            Timer::after(Duration::from_millis(50)).await;
        }
    }
}
