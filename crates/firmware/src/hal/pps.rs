//! PPS (pulse-per-second) output.
//!
//! The pulse pin is owned by [`crate::tasks::pps_task`], which free-runs a
//! 1 Hz square wave whenever the shared flag is set. [`GpioPps`] is the
//! command task's view of that flag.

use core::sync::atomic::{AtomicBool, Ordering};

use platform::{DriverError, PpsControl};

/// Flag-backed [`PpsControl`].
pub struct GpioPps {
    enabled: &'static AtomicBool,
}

impl GpioPps {
    /// Control handle over the flag shared with the pulse task.
    pub fn new(enabled: &'static AtomicBool) -> Self {
        Self { enabled }
    }
}

impl PpsControl for GpioPps {
    fn enable(&mut self) -> Result<(), DriverError> {
        self.enabled.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn disable(&mut self) -> Result<(), DriverError> {
        self.enabled.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}
