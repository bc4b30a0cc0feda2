//! Named GPIO signals.
//!
//! Boards describe their test-relevant pins as static [`SignalDef`] tables;
//! a [`SignalBank`] gives the command task read/write/toggle access by table
//! index, so command handlers never see port or pin numbers.

use crate::error::DriverError;

/// Logical pin state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// High (logic 1)
    High,
    /// Low (logic 0)
    Low,
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<PinState> for bool {
    fn from(value: PinState) -> Self {
        matches!(value, PinState::High)
    }
}

/// One named signal, bound to a (port, pin) pair at board bring-up.
///
/// The name is what the escape-toggle dialect prints in its status lines,
/// so keep it terse and operator-readable ("PWR OFF", "PPS").
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalDef {
    /// Human-readable signal name.
    pub name: &'static str,
    /// GPIO port index (board-specific numbering).
    pub port: u8,
    /// Pin number within the port.
    pub pin: u8,
}

/// Indexed access to a board's signal table.
///
/// Index space follows the board's `&'static [SignalDef]` table; an index
/// outside the table is [`DriverError::BadIndex`], never a panic.
pub trait SignalBank {
    /// The signal table this bank was built from.
    fn defs(&self) -> &'static [SignalDef];

    /// Drive a signal to `state`.
    fn write(&mut self, index: usize, state: PinState) -> Result<(), DriverError>;

    /// Read a signal's current logical state.
    fn read(&self, index: usize) -> Result<PinState, DriverError>;

    /// Invert a signal and return the new state.
    fn toggle(&mut self, index: usize) -> Result<PinState, DriverError> {
        let next = match self.read(index)? {
            PinState::High => PinState::Low,
            PinState::Low => PinState::High,
        };
        self.write(index, next)?;
        Ok(next)
    }
}
