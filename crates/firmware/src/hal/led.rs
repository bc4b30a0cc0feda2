//! Front-panel LED chain behind a 74HC595 pair.
//!
//! The chain is animated: blink and walk modes need a periodic tick, so the
//! shift-register pins are owned by a dedicated task
//! ([`crate::tasks::led_task`]) and the command task talks to it through
//! [`LedHandle`], a channel-backed [`platform::LedDriver`].

use embassy_stm32::gpio::{AnyPin, Level, Output};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use platform::{DriverError, LedDriver, LedMode};

/// LEDs on the chain.
pub const LED_COUNT: usize = 16;

/// Depth of the update channel between command task and LED task.
pub const LED_UPDATE_DEPTH: usize = 4;

/// One setting change from the command task.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedUpdate {
    /// Select the lit LED.
    Index(u8),
    /// Select the display mode.
    Mode(LedMode),
}

/// Command-task handle; forwards settings to the LED task.
pub struct LedHandle {
    updates: Sender<'static, CriticalSectionRawMutex, LedUpdate, LED_UPDATE_DEPTH>,
}

impl LedHandle {
    /// Handle over the producer side of the update channel.
    pub fn new(
        updates: Sender<'static, CriticalSectionRawMutex, LedUpdate, LED_UPDATE_DEPTH>,
    ) -> Self {
        Self { updates }
    }
}

impl LedDriver for LedHandle {
    async fn set_index(&mut self, index: u8) -> Result<(), DriverError> {
        if usize::from(index) >= LED_COUNT {
            return Err(DriverError::BadIndex);
        }
        self.updates.send(LedUpdate::Index(index)).await;
        Ok(())
    }

    async fn set_mode(&mut self, mode: LedMode) -> Result<(), DriverError> {
        self.updates.send(LedUpdate::Mode(mode)).await;
        Ok(())
    }
}

/// Shift-register chain state, owned by the LED task.
pub struct LedChain {
    data: Output<'static, AnyPin>,
    clock: Output<'static, AnyPin>,
    latch: Output<'static, AnyPin>,
    index: u8,
    mode: LedMode,
    blink_on: bool,
    walk_position: u8,
}

impl LedChain {
    /// Chain over its three control lines, everything dark.
    pub fn new(
        data: Output<'static, AnyPin>,
        clock: Output<'static, AnyPin>,
        latch: Output<'static, AnyPin>,
    ) -> Self {
        let mut chain = Self {
            data,
            clock,
            latch,
            index: 0,
            mode: LedMode::Off,
            blink_on: false,
            walk_position: 0,
        };
        chain.shift_out(0);
        chain
    }

    /// Absorb a setting change from the command task.
    pub fn apply(&mut self, update: LedUpdate) {
        match update {
            LedUpdate::Index(index) => self.index = index,
            LedUpdate::Mode(mode) => {
                self.mode = mode;
                self.blink_on = false;
                self.walk_position = 0;
            }
        }
        self.refresh();
    }

    /// Advance the animation one frame.
    pub fn tick(&mut self) {
        match self.mode {
            LedMode::Off | LedMode::Steady => {}
            LedMode::Blink => self.blink_on = !self.blink_on,
            LedMode::Walk => {
                self.walk_position = self.walk_position.wrapping_add(1);
                if usize::from(self.walk_position) >= LED_COUNT {
                    self.walk_position = 0;
                }
            }
        }
        self.refresh();
    }

    fn refresh(&mut self) {
        let pattern = match self.mode {
            LedMode::Off => 0,
            LedMode::Steady => one_hot(self.index),
            LedMode::Blink => {
                if self.blink_on {
                    one_hot(self.index)
                } else {
                    0
                }
            }
            LedMode::Walk => one_hot(self.walk_position),
        };
        self.shift_out(pattern);
    }

    /// Bit-bang `pattern` MSB-first and latch it. The 74HC595 clocks well
    /// above anything a GPIO loop can produce, so no inter-edge delay.
    fn shift_out(&mut self, pattern: u16) {
        for bit in (0..16).rev() {
            let set = pattern.checked_shr(bit).unwrap_or(0) & 1 == 1;
            self.data
                .set_level(if set { Level::High } else { Level::Low });
            self.clock.set_high();
            self.clock.set_low();
        }
        self.latch.set_high();
        self.latch.set_low();
    }
}

fn one_hot(index: u8) -> u16 {
    1_u16.checked_shl(u32::from(index)).unwrap_or(0)
}
