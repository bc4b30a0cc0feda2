//! ISR-to-task byte events.

/// One received byte, tagged with the UART it arrived on.
///
/// Interrupt handlers build these and `try_send` them into the shared
/// rx-event channel; ownership passes through the channel to the buffer
/// task, which routes the byte onward by `uart` index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxByteEvent {
    /// Index into the buffer task's UART channel table.
    pub uart: u8,
    /// The received byte.
    pub byte: u8,
}
