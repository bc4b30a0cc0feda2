//! RF synthesizer (ADF4351) on SPI1.
//!
//! Registers are 32-bit words, MSB first, with the register number in the
//! low three control bits. A latch-enable pulse after each word loads it.
//! The PFD runs at 10 MHz from the jig TCXO, so whole-MHz requests divide
//! into INT/FRAC with MOD fixed at 10.

use embassy_stm32::gpio::{AnyPin, Output};
use embassy_stm32::peripherals::{DMA2_CH3, DMA2_CH4, SPI1};
use embassy_stm32::spi::Spi;
use platform::{DriverError, Synthesizer};

/// Lowest programmable output, MHz.
pub const MIN_MHZ: u32 = 35;

/// Highest programmable output, MHz.
pub const MAX_MHZ: u32 = 4400;

/// Register words that set up the charge pump, output stage, and MOD=10,
/// written highest register first as the datasheet requires.
const INIT_WORDS: [u32; 5] = [
    0x0058_0005,
    0x00BC_803C,
    0x0000_04B3,
    0x0800_8052,
    0x0800_0051,
];

/// SPI-attached [`Synthesizer`].
pub struct JigSynth {
    spi: Spi<'static, SPI1, DMA2_CH4, DMA2_CH3>,
    latch_enable: Output<'static, AnyPin>,
}

impl JigSynth {
    /// Take the bus and latch-enable line. Call [`Self::init`] before use.
    pub fn new(
        spi: Spi<'static, SPI1, DMA2_CH4, DMA2_CH3>,
        latch_enable: Output<'static, AnyPin>,
    ) -> Self {
        Self { spi, latch_enable }
    }

    /// Program the static register set.
    pub async fn init(&mut self) -> Result<(), DriverError> {
        for word in INIT_WORDS {
            self.write_word(word).await?;
        }
        Ok(())
    }

    async fn write_word(&mut self, word: u32) -> Result<(), DriverError> {
        self.spi
            .write(&word.to_be_bytes())
            .await
            .map_err(|_| DriverError::Bus)?;
        self.latch_enable.set_high();
        self.latch_enable.set_low();
        Ok(())
    }
}

impl Synthesizer for JigSynth {
    async fn set_frequency_mhz(&mut self, mhz: u32) -> Result<(), DriverError> {
        if !(MIN_MHZ..=MAX_MHZ).contains(&mhz) {
            return Err(DriverError::OutOfRange);
        }
        let int = mhz / 10;
        let frac = mhz % 10;
        let word = int
            .checked_shl(15)
            .and_then(|w| frac.checked_shl(3).map(|f| w | f))
            .ok_or(DriverError::OutOfRange)?;
        self.write_word(word).await
    }

    async fn write_register(&mut self, register: u8, value: u32) -> Result<(), DriverError> {
        let word = value
            .checked_shl(3)
            .ok_or(DriverError::OutOfRange)?
            | u32::from(register & 0x07);
        self.write_word(word).await
    }
}
