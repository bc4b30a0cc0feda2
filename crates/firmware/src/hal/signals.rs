//! Named-signal bank over GPIO lines.
//!
//! The bank is built in `main` by pushing one line per entry of the board
//! profile's signal table, in table order. Outputs back relays, the sounder,
//! and reset lines; inputs back the front-panel buttons.

use embassy_stm32::gpio::{AnyPin, Input, Level, Output};
use platform::signal::{PinState, SignalBank, SignalDef};
use platform::DriverError;

enum Line {
    Out(Output<'static, AnyPin>),
    In(Input<'static, AnyPin>),
}

/// GPIO-backed [`SignalBank`] with capacity for `N` lines.
pub struct GpioSignalBank<const N: usize> {
    defs: &'static [SignalDef],
    lines: heapless::Vec<Line, N>,
}

impl<const N: usize> GpioSignalBank<N> {
    /// Empty bank bound to a board profile's signal table.
    pub fn new(defs: &'static [SignalDef]) -> Self {
        Self {
            defs,
            lines: heapless::Vec::new(),
        }
    }

    /// Append an output line; call in signal-table order.
    pub fn push_output(&mut self, pin: Output<'static, AnyPin>) -> Result<(), DriverError> {
        self.lines
            .push(Line::Out(pin))
            .map_err(|_| DriverError::BadIndex)
    }

    /// Append an input line; call in signal-table order.
    pub fn push_input(&mut self, pin: Input<'static, AnyPin>) -> Result<(), DriverError> {
        self.lines
            .push(Line::In(pin))
            .map_err(|_| DriverError::BadIndex)
    }

    /// True when every signal-table entry has a line behind it.
    pub fn complete(&self) -> bool {
        self.lines.len() == self.defs.len()
    }
}

impl<const N: usize> SignalBank for GpioSignalBank<N> {
    fn defs(&self) -> &'static [SignalDef] {
        self.defs
    }

    fn write(&mut self, index: usize, state: PinState) -> Result<(), DriverError> {
        match self.lines.get_mut(index) {
            Some(Line::Out(pin)) => {
                pin.set_level(match state {
                    PinState::High => Level::High,
                    PinState::Low => Level::Low,
                });
                Ok(())
            }
            // Button inputs are read-only.
            Some(Line::In(_)) => Err(DriverError::Bus),
            None => Err(DriverError::BadIndex),
        }
    }

    fn read(&self, index: usize) -> Result<PinState, DriverError> {
        match self.lines.get(index) {
            Some(Line::Out(pin)) => Ok(if pin.is_set_high() {
                PinState::High
            } else {
                PinState::Low
            }),
            Some(Line::In(pin)) => Ok(if pin.is_high() {
                PinState::High
            } else {
                PinState::Low
            }),
            None => Err(DriverError::BadIndex),
        }
    }
}
