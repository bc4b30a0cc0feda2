//! Test-point ADC on ADC1.
//!
//! Two external channels (PC0/PC1) plus the internal temperature sensor.
//! Conversions are blocking single-shot reads; the command task only issues
//! them on operator request, so latency is irrelevant.

use embassy_stm32::adc::{Adc, Temperature};
use embassy_stm32::peripherals::{ADC1, PC0, PC1};
use platform::{AdcReader, DriverError};

/// VDDA in millivolts. The jig regulator is a fixed 3.3 V rail.
const VDDA_MV: u32 = 3300;

/// Full-scale 12-bit sample count.
const FULL_SCALE: u32 = 4095;

/// Typical sensor voltage at 30 °C, from the L476 datasheet.
const V30_MV: i32 = 760;

/// Typical sensor slope, 2.5 mV/°C, scaled by 10.
const SLOPE_TENTHS_MV: i32 = 25;

/// Blocking single-shot [`AdcReader`] over ADC1.
pub struct JigAdc {
    adc: Adc<'static, ADC1>,
    ch1: PC0,
    ch2: PC1,
    temperature: Temperature,
}

impl JigAdc {
    /// Take the converter and its test-point pins.
    pub fn new(mut adc: Adc<'static, ADC1>, ch1: PC0, ch2: PC1) -> Self {
        let temperature = adc.enable_temperature();
        Self {
            adc,
            ch1,
            ch2,
            temperature,
        }
    }

    fn to_millivolts(sample: u16) -> u16 {
        let mv = u32::from(sample).saturating_mul(VDDA_MV) / FULL_SCALE;
        u16::try_from(mv).unwrap_or(u16::MAX)
    }
}

impl AdcReader for JigAdc {
    fn channel_count(&self) -> usize {
        2
    }

    async fn read_millivolts(&mut self, channel: u8) -> Result<u16, DriverError> {
        let sample = match channel {
            0 => self.adc.read(&mut self.ch1),
            1 => self.adc.read(&mut self.ch2),
            _ => return Err(DriverError::BadIndex),
        };
        Ok(Self::to_millivolts(sample))
    }

    async fn read_kelvin(&mut self) -> Result<u16, DriverError> {
        let sample = self.adc.read(&mut self.temperature);
        let mv = i32::from(Self::to_millivolts(sample));
        // Typical-curve conversion; the jig only needs degree-level accuracy.
        let celsius = 30_i32.saturating_add(
            V30_MV.saturating_sub(mv).saturating_mul(10) / SLOPE_TENTHS_MV,
        );
        let kelvin = celsius.saturating_add(273);
        u16::try_from(kelvin).map_err(|_| DriverError::OutOfRange)
    }
}
