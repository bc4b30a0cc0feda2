//! Shared driver error type.
//!
//! Every façade trait reports failures through [`DriverError`] so the command
//! engine can fold any peripheral fault into a response field without knowing
//! which bus the peripheral sits on.

use thiserror_no_std::Error;

/// Failure modes of a façade operation.
///
/// All bus transfers are bounded by a fixed per-transfer timeout inside the
/// driver; a non-responsive device surfaces as [`DriverError::Timeout`] rather
/// than stalling the calling task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// The transfer did not complete within the driver's timeout budget.
    #[error("transfer timed out")]
    Timeout,
    /// The device did not acknowledge its address or a data byte.
    #[error("device did not acknowledge")]
    Nack,
    /// Bus-level fault (arbitration loss, framing, overrun).
    #[error("bus fault")]
    Bus,
    /// A requested value is outside the device's accepted range.
    #[error("value out of range")]
    OutOfRange,
    /// A channel, index, or signal number that the board does not have.
    #[error("no such channel or signal")]
    BadIndex,
}
