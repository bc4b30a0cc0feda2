//! Board operations bundle.
//!
//! Command handlers talk to one [`BoardOps`] value instead of six separate
//! driver handles. [`PeripheralSet`] is the production implementation,
//! composing the platform façade traits plus the board-profile indices that
//! say which named signals back the buzzer, external reset, and buttons.

use platform::signal::{PinState, SignalBank};
use platform::{AdcReader, DriverError, FanController, LedDriver, LedMode, PpsControl, Synthesizer};
use protocol::board::ToggleTarget;

/// Everything the serial command task can do to the board.
///
/// Bus-backed operations are async and timeout-bounded inside the driver;
/// GPIO and timer operations are synchronous register pokes.
pub trait BoardOps {
    /// Button states, bit N = board-profile `buttons[N]`.
    fn button_mask(&mut self) -> Result<u32, DriverError>;

    /// Drive the buzzer signal.
    fn set_buzzer(&mut self, on: bool) -> Result<(), DriverError>;

    /// Drive the external reset signal.
    fn set_ext_reset(&mut self, asserted: bool) -> Result<(), DriverError>;

    /// Toggle an escape-dialect target; `true` means now asserted/running.
    fn toggle(&mut self, target: ToggleTarget) -> Result<bool, DriverError>;

    /// Number of ADC voltage channels.
    fn adc_channel_count(&self) -> usize;

    /// Read one ADC channel in millivolts.
    async fn read_adc_millivolts(&mut self, channel: u8) -> Result<u16, DriverError>;

    /// Read the board temperature in Kelvin.
    async fn read_temperature_kelvin(&mut self) -> Result<u16, DriverError>;

    /// Select the lit LED.
    async fn set_led_index(&mut self, index: u8) -> Result<(), DriverError>;

    /// Select the LED display mode.
    async fn set_led_mode(&mut self, mode: LedMode) -> Result<(), DriverError>;

    /// Program the synthesizer output frequency.
    async fn set_synth_mhz(&mut self, mhz: u32) -> Result<(), DriverError>;

    /// Read the fan speed in RPM.
    async fn read_fan_rpm(&mut self) -> Result<u16, DriverError>;

    /// Push an external temperature to the fan controller.
    async fn push_fan_temperature(&mut self, celsius: i16) -> Result<(), DriverError>;
}

/// Production [`BoardOps`]: the platform drivers plus signal-table wiring.
pub struct PeripheralSet<A, L, S, F, G, P> {
    /// I2C ADC.
    pub adc: A,
    /// LED matrix driver.
    pub led: L,
    /// SPI synthesizer.
    pub synth: S,
    /// Fan controller.
    pub fan: F,
    /// Named GPIO signals.
    pub signals: G,
    /// PPS timer channel.
    pub pps: P,
    /// Signal-table index of the buzzer output.
    pub buzzer_signal: usize,
    /// Signal-table index of the external reset output.
    pub ext_reset_signal: usize,
    /// Signal-table indices composing the `$BTN` bitmask.
    pub buttons: &'static [usize],
}

impl<A, L, S, F, G, P> BoardOps for PeripheralSet<A, L, S, F, G, P>
where
    A: AdcReader,
    L: LedDriver,
    S: Synthesizer,
    F: FanController,
    G: SignalBank,
    P: PpsControl,
{
    fn button_mask(&mut self) -> Result<u32, DriverError> {
        let mut mask: u32 = 0;
        for (bit, &signal) in self.buttons.iter().enumerate() {
            if self.signals.read(signal)? == PinState::High {
                let bit = u32::try_from(bit).map_err(|_| DriverError::BadIndex)?;
                mask |= 1_u32.checked_shl(bit).ok_or(DriverError::BadIndex)?;
            }
        }
        Ok(mask)
    }

    fn set_buzzer(&mut self, on: bool) -> Result<(), DriverError> {
        self.signals.write(self.buzzer_signal, PinState::from(on))
    }

    fn set_ext_reset(&mut self, asserted: bool) -> Result<(), DriverError> {
        self.signals
            .write(self.ext_reset_signal, PinState::from(asserted))
    }

    fn toggle(&mut self, target: ToggleTarget) -> Result<bool, DriverError> {
        match target {
            ToggleTarget::Signal(index) => {
                Ok(self.signals.toggle(index)? == PinState::High)
            }
            ToggleTarget::Pps => {
                if self.pps.is_enabled() {
                    self.pps.disable()?;
                    Ok(false)
                } else {
                    self.pps.enable()?;
                    Ok(true)
                }
            }
        }
    }

    fn adc_channel_count(&self) -> usize {
        self.adc.channel_count()
    }

    async fn read_adc_millivolts(&mut self, channel: u8) -> Result<u16, DriverError> {
        self.adc.read_millivolts(channel).await
    }

    async fn read_temperature_kelvin(&mut self) -> Result<u16, DriverError> {
        self.adc.read_kelvin().await
    }

    async fn set_led_index(&mut self, index: u8) -> Result<(), DriverError> {
        self.led.set_index(index).await
    }

    async fn set_led_mode(&mut self, mode: LedMode) -> Result<(), DriverError> {
        self.led.set_mode(mode).await
    }

    async fn set_synth_mhz(&mut self, mhz: u32) -> Result<(), DriverError> {
        self.synth.set_frequency_mhz(mhz).await
    }

    async fn read_fan_rpm(&mut self) -> Result<u16, DriverError> {
        self.fan.read_speed_rpm().await
    }

    async fn push_fan_temperature(&mut self, celsius: i16) -> Result<(), DriverError> {
        self.fan.push_temperature(celsius).await
    }
}

/// [`BoardOps`] for escape-dialect boards that carry only named signals and
/// a PPS output. Keyword operations answer `Nack`; an escape-dialect profile
/// never parses the commands that would reach them.
pub struct ToggleBoard<G, P> {
    /// Named GPIO signals.
    pub signals: G,
    /// PPS timer channel.
    pub pps: P,
}

impl<G: SignalBank, P: PpsControl> BoardOps for ToggleBoard<G, P> {
    fn button_mask(&mut self) -> Result<u32, DriverError> {
        Err(DriverError::Nack)
    }

    fn set_buzzer(&mut self, _on: bool) -> Result<(), DriverError> {
        Err(DriverError::Nack)
    }

    fn set_ext_reset(&mut self, _asserted: bool) -> Result<(), DriverError> {
        Err(DriverError::Nack)
    }

    fn toggle(&mut self, target: ToggleTarget) -> Result<bool, DriverError> {
        match target {
            ToggleTarget::Signal(index) => Ok(self.signals.toggle(index)? == PinState::High),
            ToggleTarget::Pps => {
                if self.pps.is_enabled() {
                    self.pps.disable()?;
                    Ok(false)
                } else {
                    self.pps.enable()?;
                    Ok(true)
                }
            }
        }
    }

    fn adc_channel_count(&self) -> usize {
        0
    }

    async fn read_adc_millivolts(&mut self, _channel: u8) -> Result<u16, DriverError> {
        Err(DriverError::Nack)
    }

    async fn read_temperature_kelvin(&mut self) -> Result<u16, DriverError> {
        Err(DriverError::Nack)
    }

    async fn set_led_index(&mut self, _index: u8) -> Result<(), DriverError> {
        Err(DriverError::Nack)
    }

    async fn set_led_mode(&mut self, _mode: LedMode) -> Result<(), DriverError> {
        Err(DriverError::Nack)
    }

    async fn set_synth_mhz(&mut self, _mhz: u32) -> Result<(), DriverError> {
        Err(DriverError::Nack)
    }

    async fn read_fan_rpm(&mut self) -> Result<u16, DriverError> {
        Err(DriverError::Nack)
    }

    async fn push_fan_temperature(&mut self, _celsius: i16) -> Result<(), DriverError> {
        Err(DriverError::Nack)
    }
}
