//! RF switch CCA jig — hardware entry point for STM32L476RG.
//!
//! Signal-only board: relays, a PPS output, and the escape-toggle console.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Pin, Speed};
use embassy_time::{Duration, Timer};

use firmware::boards::rf_switch;
use firmware::hal::{GpioPps, GpioSignalBank, SIGNAL_CAPACITY};
use firmware::tasks;
use platform::DriverError;
use serial::buffer::UartChannelConfig;
use serial::{InitError, OverflowPolicy, SerialBufferEngine, SerialCommandEngine, ToggleBoard};

use defmt_rtt as _;
use panic_probe as _;

#[derive(defmt::Format)]
enum BringUpError {
    Driver(DriverError),
    Engine(InitError),
    Spawn,
}

impl From<DriverError> for BringUpError {
    fn from(err: DriverError) -> Self {
        Self::Driver(err)
    }
}

impl From<InitError> for BringUpError {
    fn from(err: InitError) -> Self {
        Self::Engine(err)
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    defmt::info!(
        "rf switch jig v{=str}, profile {=str}",
        env!("CARGO_PKG_VERSION"),
        rf_switch::PROFILE.name
    );

    let p = embassy_stm32::init(embassy_stm32::Config::default());

    if let Err(err) = bring_up(&spawner, p) {
        defmt::error!("bring-up failed: {}", err);
        loop {
            Timer::after(Duration::from_secs(1)).await;
        }
    }

    defmt::info!("escape console ready on USART2 @ {=u32} baud", firmware::hal::uart::BAUD);
}

fn bring_up(spawner: &Spawner, p: embassy_stm32::Peripherals) -> Result<(), BringUpError> {
    // Relays, pushed in signal-table order.
    let mut signals: GpioSignalBank<SIGNAL_CAPACITY> = GpioSignalBank::new(&rf_switch::SIGNALS);
    signals.push_output(Output::new(p.PA4.degrade(), Level::Low, Speed::Low))?;
    signals.push_output(Output::new(p.PA5.degrade(), Level::Low, Speed::Low))?;
    signals.push_output(Output::new(p.PA6.degrade(), Level::Low, Speed::Low))?;

    let pps = GpioPps::new(&tasks::PPS_ENABLED);
    let pps_pin = Output::new(p.PA8.degrade(), Level::Low, Speed::Low);

    let rx_buffer = tasks::RX_DMA_BUF.init([0; tasks::RX_DMA_BUF_LEN]);
    let (console, console_rx) = firmware::hal::uart::console(
        p.USART2, p.PA3, p.PA2, p.DMA1_CH7, p.DMA1_CH6, rx_buffer,
    )?;

    let mut channels = heapless::Vec::new();
    channels
        .push(UartChannelConfig {
            index: tasks::CONSOLE_UART_INDEX,
            port: console,
            rx_route: tasks::CONSOLE_RX.sender(),
            tx_inbox: tasks::CONSOLE_TX.receiver(),
            tx_policy: OverflowPolicy::DropNewest,
        })
        .ok();
    let buffer = SerialBufferEngine::new(tasks::RX_EVENTS.receiver(), channels)?;

    let board = ToggleBoard { signals, pps };
    let command = SerialCommandEngine::new(
        &rf_switch::PROFILE,
        board,
        tasks::CONSOLE_RX.receiver(),
        tasks::CONSOLE_TX.sender(),
    )?;

    let spawn = |result: Result<(), embassy_executor::SpawnError>| {
        result.map_err(|_| BringUpError::Spawn)
    };
    spawn(spawner.spawn(tasks::console_rx_pump(console_rx)))?;
    spawn(spawner.spawn(tasks::buffer_task(buffer)))?;
    spawn(spawner.spawn(tasks::rf_switch_command_task(command)))?;
    spawn(spawner.spawn(tasks::pps_task(pps_pin)))?;
    Ok(())
}
