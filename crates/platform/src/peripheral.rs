//! Peripheral façade traits.
//!
//! The serial command task drives every on-board peripheral through these
//! traits and never owns protocol state on their behalf. All operations are
//! async and timeout-bounded; implementations live in the firmware crate
//! (hardware) and in [`crate::mocks`] (host tests).

use crate::error::DriverError;

/// I2C ADC read access.
///
/// Channels are board-defined; conversion to engineering units (millivolts,
/// Kelvin) happens inside the driver using the chip's scaling constants.
pub trait AdcReader {
    /// Number of voltage channels this converter exposes.
    fn channel_count(&self) -> usize;

    /// Read one channel, scaled to millivolts.
    fn read_millivolts(
        &mut self,
        channel: u8,
    ) -> impl core::future::Future<Output = Result<u16, DriverError>>;

    /// Read the temperature channel, scaled to Kelvin.
    fn read_kelvin(&mut self) -> impl core::future::Future<Output = Result<u16, DriverError>>;
}

/// LED matrix driver control.
pub trait LedDriver {
    /// Light the LED at `index`, extinguishing any previously selected one.
    fn set_index(
        &mut self,
        index: u8,
    ) -> impl core::future::Future<Output = Result<(), DriverError>>;

    /// Switch the driver's display mode.
    fn set_mode(
        &mut self,
        mode: LedMode,
    ) -> impl core::future::Future<Output = Result<(), DriverError>>;
}

/// LED driver display modes, as exposed by the `#LDM` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedMode {
    /// All LEDs off.
    Off,
    /// Steady on at the selected index.
    Steady,
    /// Blink the selected index.
    Blink,
    /// Walk the index across the matrix (lamp test).
    Walk,
}

impl TryFrom<u8> for LedMode {
    type Error = DriverError;

    fn try_from(value: u8) -> Result<Self, DriverError> {
        match value {
            0 => Ok(LedMode::Off),
            1 => Ok(LedMode::Steady),
            2 => Ok(LedMode::Blink),
            3 => Ok(LedMode::Walk),
            _ => Err(DriverError::OutOfRange),
        }
    }
}

/// SPI synthesizer / transceiver register access.
pub trait Synthesizer {
    /// Program the output frequency in MHz. Implementations bounds-check
    /// against the part's lock range and return [`DriverError::OutOfRange`]
    /// without touching the hardware when the request cannot lock.
    fn set_frequency_mhz(
        &mut self,
        mhz: u32,
    ) -> impl core::future::Future<Output = Result<(), DriverError>>;

    /// Raw register write, for jig-level register-map checks.
    fn write_register(
        &mut self,
        register: u8,
        value: u32,
    ) -> impl core::future::Future<Output = Result<(), DriverError>>;
}

/// Fan controller push-temperature / read-speed access.
pub trait FanController {
    /// Feed the controller an external temperature reading in °C.
    fn push_temperature(
        &mut self,
        celsius: i16,
    ) -> impl core::future::Future<Output = Result<(), DriverError>>;

    /// Read the measured fan speed in RPM.
    fn read_speed_rpm(&mut self) -> impl core::future::Future<Output = Result<u16, DriverError>>;
}

/// One physical UART's hardware handle, as seen by the serial buffer task.
///
/// The buffer task is the only owner of a port; it alternates bounded
/// transmit bursts with receive re-arming every cooperative cycle.
pub trait UartPort {
    /// `true` when the transmitter can accept a new burst.
    fn tx_idle(&self) -> bool;

    /// Issue one hardware transmit burst. At most the staging-buffer capacity
    /// is ever passed here; the call completes when the burst is handed to
    /// hardware, not when the last bit leaves the pin.
    fn write_burst(
        &mut self,
        bytes: &[u8],
    ) -> impl core::future::Future<Output = Result<(), DriverError>>;

    /// Re-arm single-byte interrupt-driven receive. Idempotent: safe to call
    /// when reception is already armed.
    fn arm_receive(&mut self);
}
