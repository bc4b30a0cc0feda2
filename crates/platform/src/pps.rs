//! PPS timer channel control.

use crate::error::DriverError;

/// Start/stop control for the pulse-per-second timer output.
///
/// The command task only ever flips this on and off; pulse width and period
/// are fixed at board bring-up.
pub trait PpsControl {
    /// Start the PPS output compare channel.
    fn enable(&mut self) -> Result<(), DriverError>;

    /// Stop the PPS output and park the pin low.
    fn disable(&mut self) -> Result<(), DriverError>;

    /// `true` while the output is running.
    fn is_enabled(&self) -> bool;
}
