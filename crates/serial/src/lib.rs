//! Serial command subsystem: the protocol core of every jig image.
//!
//! Two cooperating engines, one per task:
//!
//! - [`SerialBufferEngine`] decouples interrupt-time byte arrival from
//!   task-time protocol work. It drains the shared rx-event channel that the
//!   UART interrupt handlers feed, routes each byte to its UART's rx queue,
//!   and drains tx queues into bounded hardware transmit bursts.
//! - [`SerialCommandEngine`] assembles bytes into frames, parses the board's
//!   command grammar, drives the peripheral façade, and formats responses.
//!
//! Data path:
//!
//! ```text
//! ISR ─→ rx-event channel ─→ buffer task ─→ per-UART rx queue ─→ command task
//!                                ↑                                    │
//!                           tx queue ←──────── response bytes ────────┘
//!                                │
//!                                └─→ ≤BURST-byte hardware bursts
//! ```
//!
//! Everything inter-task is an `embassy-sync` channel; everything task-owned
//! is a plain `heapless` structure. Engines are generic over the `RawMutex`
//! so host tests run them on `NoopRawMutex` while hardware images use
//! `CriticalSectionRawMutex`.

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod buffer;
pub mod command;
pub mod event;
pub mod facade;
pub mod queue;

use thiserror_no_std::Error;

pub use buffer::{BufferStats, SerialBufferEngine, UartChannelConfig};
pub use command::{CommandStats, SerialCommandEngine};
pub use event::RxByteEvent;
pub use facade::{BoardOps, PeripheralSet, ToggleBoard};
pub use queue::{ByteQueue, OverflowPolicy};

/// Maximum UART pairs one buffer task services.
pub const MAX_UARTS: usize = 2;

/// Depth of the shared ISR-to-task rx-event channel.
pub const RX_EVENT_DEPTH: usize = 64;

/// Depth of each per-UART rx queue. Must hold at least one maximal frame.
pub const RX_QUEUE_DEPTH: usize = 256;

/// Depth of the command-task-to-buffer-task tx handoff channel.
pub const TX_INBOX_DEPTH: usize = 64;

/// Depth of each per-UART tx data queue.
pub const TX_QUEUE_DEPTH: usize = 256;

/// Task construction failure.
///
/// The legacy images parked themselves in an infinite idle loop on bad init
/// data, detectable only by the board going quiet. Constructors here return
/// this instead so the supervisor can log the fault and decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// The buffer task was handed an empty UART channel table.
    #[error("no UART channels configured")]
    NoChannels,
    /// Two UART channel configs claim the same UART index.
    #[error("duplicate UART index in channel table")]
    DuplicateUart,
    /// A keyword-dialect profile with an empty command set.
    #[error("keyword dialect with empty command set")]
    EmptyCommandSet,
    /// An escape-dialect profile with an empty toggle table.
    #[error("escape dialect with empty toggle table")]
    EmptyToggleTable,
}
