//! Peripheral drivers for the STM32L476RG jig controller.
//!
//! Each driver implements one `platform` façade trait over embassy-stm32
//! peripherals. Board images construct them in `main`, bundle them into a
//! [`serial::PeripheralSet`] or [`serial::ToggleBoard`], and hand the bundle
//! to the serial command task.

pub mod adc;
pub mod fan;
pub mod led;
pub mod pps;
pub mod signals;
pub mod synth;
pub mod uart;

pub use adc::JigAdc;
pub use fan::JigFan;
pub use led::{LedChain, LedHandle, LedUpdate};
pub use pps::GpioPps;
pub use signals::GpioSignalBank;
pub use synth::JigSynth;
pub use uart::{ConsoleRx, ConsoleUart};

/// Signal-table capacity shared by every jig flavour.
pub const SIGNAL_CAPACITY: usize = 8;

/// Peripheral bundle of the interface jig.
pub type InterfaceBoard = serial::PeripheralSet<
    JigAdc,
    LedHandle,
    JigSynth,
    JigFan,
    GpioSignalBank<SIGNAL_CAPACITY>,
    GpioPps,
>;

/// Peripheral bundle of the RF switch jig.
pub type RfSwitchBoard = serial::ToggleBoard<GpioSignalBank<SIGNAL_CAPACITY>, GpioPps>;
