//! Enclosure fan controller (MAX6650) on I2C1.
//!
//! The controller runs closed-loop on its own; the firmware only feeds it a
//! speed setpoint derived from the UUT temperature and reads the tachometer
//! back for `$FAN`.

use embassy_stm32::i2c::I2c;
use embassy_stm32::peripherals::{DMA2_CH6, DMA2_CH7, I2C1};
use platform::{DriverError, FanController};

/// 7-bit bus address with ADD pin grounded.
const ADDRESS: u8 = 0x48;

/// Speed setpoint register.
const REG_SPEED: u8 = 0x00;

/// Tachometer count register. Two tach pulses per revolution over a one
/// second window, so RPM = count * 30.
const REG_TACH: u8 = 0x0C;

const TACH_TO_RPM: u16 = 30;

/// Temperature-to-setpoint curve, (threshold °C, speed byte). First row at
/// or above the pushed temperature wins; below the table the fan idles.
const SPEED_CURVE: [(i16, u8); 4] = [(60, 0xFF), (45, 0xB0), (30, 0x70), (20, 0x40)];

/// I2C-attached [`FanController`].
pub struct JigFan {
    i2c: I2c<'static, I2C1, DMA2_CH7, DMA2_CH6>,
}

impl JigFan {
    /// Take the bus handle.
    pub fn new(i2c: I2c<'static, I2C1, DMA2_CH7, DMA2_CH6>) -> Self {
        Self { i2c }
    }
}

fn setpoint_for(celsius: i16) -> u8 {
    for (threshold, speed) in SPEED_CURVE {
        if celsius >= threshold {
            return speed;
        }
    }
    0x20
}

impl FanController for JigFan {
    async fn push_temperature(&mut self, celsius: i16) -> Result<(), DriverError> {
        let speed = setpoint_for(celsius);
        self.i2c
            .write(ADDRESS, &[REG_SPEED, speed])
            .await
            .map_err(|_| DriverError::Nack)
    }

    async fn read_speed_rpm(&mut self) -> Result<u16, DriverError> {
        let mut count = [0_u8; 1];
        self.i2c
            .write_read(ADDRESS, &[REG_TACH], &mut count)
            .await
            .map_err(|_| DriverError::Nack)?;
        let [revolutions] = count;
        Ok(u16::from(revolutions).saturating_mul(TACH_TO_RPM))
    }
}
