//! Interface CCA jig — hardware entry point for STM32L476RG.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_stm32::adc::Adc;
use embassy_stm32::gpio::{Input, Level, Output, Pin, Pull, Speed};
use embassy_stm32::i2c::{self, I2c};
use embassy_stm32::spi::{Config as SpiConfig, Spi};
use embassy_stm32::time::Hertz;
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_time::{Delay, Duration, Timer};

use firmware::boards::interface;
use firmware::hal::{
    GpioPps, GpioSignalBank, JigAdc, JigFan, JigSynth, LedChain, LedHandle, SIGNAL_CAPACITY,
};
use firmware::tasks;
use platform::DriverError;
use serial::buffer::UartChannelConfig;
use serial::{InitError, OverflowPolicy, PeripheralSet, SerialBufferEngine, SerialCommandEngine};

use defmt_rtt as _;
use panic_probe as _;

bind_interrupts!(struct I2cIrqs {
    I2C1_EV => i2c::EventInterruptHandler<peripherals::I2C1>;
    I2C1_ER => i2c::ErrorInterruptHandler<peripherals::I2C1>;
});

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
        "interface jig v{=str}, profile {=str}",
        env!("CARGO_PKG_VERSION"),
        interface::PROFILE.name
    );

    let p = embassy_stm32::init(embassy_stm32::Config::default());

    if let Err(err) = bring_up(&spawner, p).await {
        // Report and park; a half-wired console is worse than a dead one
        // with a defmt trail behind it.
        defmt::error!("bring-up failed: {}", err);
        loop {
            Timer::after(Duration::from_secs(1)).await;
        }
    }

    defmt::info!("serial console ready on USART2 @ {=u32} baud", firmware::hal::uart::BAUD);
}

async fn bring_up(
    spawner: &Spawner,
    p: embassy_stm32::Peripherals,
) -> Result<(), BringUpError> {
    // Named signals, pushed in signal-table order.
    let mut signals: GpioSignalBank<SIGNAL_CAPACITY> = GpioSignalBank::new(&interface::SIGNALS);
    signals.push_output(Output::new(p.PB5.degrade(), Level::Low, Speed::Low))?;
    signals.push_output(Output::new(p.PB4.degrade(), Level::Low, Speed::Low))?;
    signals.push_input(Input::new(p.PC13.degrade(), Pull::Down))?;
    signals.push_input(Input::new(p.PC12.degrade(), Pull::Down))?;

    // Test-point ADC.
    let adc = JigAdc::new(Adc::new(p.ADC1, &mut Delay), p.PC0, p.PC1);

    // Synthesizer on SPI1.
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = Hertz(1_000_000);
    let spi = Spi::new(
        p.SPI1, p.PA5, // SCK
        p.PA7, // MOSI
        p.PA6, // MISO (unused but required by the HAL)
        p.DMA2_CH4, p.DMA2_CH3, spi_config,
    );
    let mut synth = JigSynth::new(spi, Output::new(p.PB6.degrade(), Level::Low, Speed::Low));
    synth.init().await?;

    // Fan controller on I2C1.
    let i2c = I2c::new(
        p.I2C1,
        p.PB8,
        p.PB9,
        I2cIrqs,
        p.DMA2_CH7,
        p.DMA2_CH6,
        Hertz(100_000),
        i2c::Config::default(),
    );
    let fan = JigFan::new(i2c);

    // LED chain task and its command-side handle.
    let chain = LedChain::new(
        Output::new(p.PC5.degrade(), Level::Low, Speed::Low),
        Output::new(p.PC6.degrade(), Level::Low, Speed::Low),
        Output::new(p.PC7.degrade(), Level::Low, Speed::Low),
    );
    let led = LedHandle::new(tasks::LED_UPDATES.sender());

    // PPS output task and its flag handle.
    let pps = GpioPps::new(&tasks::PPS_ENABLED);
    let pps_pin = Output::new(p.PB10.degrade(), Level::Low, Speed::Low);

    // Console UART and the serial engines.
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

    let board = PeripheralSet {
        adc,
        led,
        synth,
        fan,
        signals,
        pps,
        buzzer_signal: interface::BUZZER_SIGNAL,
        ext_reset_signal: interface::EXT_RESET_SIGNAL,
        buttons: &interface::BUTTONS,
    };
    let command = SerialCommandEngine::new(
        &interface::PROFILE,
        board,
        tasks::CONSOLE_RX.receiver(),
        tasks::CONSOLE_TX.sender(),
    )?;

    let spawn = |result: Result<(), embassy_executor::SpawnError>| {
        result.map_err(|_| BringUpError::Spawn)
    };
    spawn(spawner.spawn(tasks::console_rx_pump(console_rx)))?;
    spawn(spawner.spawn(tasks::buffer_task(buffer)))?;
    spawn(spawner.spawn(tasks::interface_command_task(command)))?;
    spawn(spawner.spawn(tasks::led_task(chain, tasks::LED_UPDATES.receiver())))?;
    spawn(spawner.spawn(tasks::pps_task(pps_pin)))?;
    Ok(())
}
