//! Peripheral façade for the CCA test-jig firmware family.
//!
//! This crate provides trait-based abstractions for every peripheral the
//! serial command subsystem drives, enabling development and testing of the
//! protocol engines without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Board images (firmware crate)
//!         ↓
//! Protocol engines (serial, protocol crates)
//!         ↓
//! Peripheral façade (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (Embassy HAL + PAC)
//! ```
//!
//! # Abstraction groups
//!
//! - [`peripheral`] - I2C ADC, LED matrix, SPI synthesizer, fan controller,
//!   UART port traits
//! - [`signal`] - named GPIO signals ([`SignalBank`], static [`SignalDef`]
//!   tables)
//! - [`pps`] - PPS timer channel enable/disable
//! - [`mocks`] - scripted implementations for host tests (`std` feature)
//!
//! Every fallible operation returns [`DriverError`]; the façade never retries
//! and never panics. Retry policy, where a chip needs one, lives inside the
//! board-specific driver behind the trait.

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::must_use_candidate)] // hardware accessors — callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod error;
pub mod mocks;
pub mod peripheral;
pub mod pps;
pub mod signal;

pub use error::DriverError;
pub use peripheral::{AdcReader, FanController, LedDriver, LedMode, Synthesizer, UartPort};
pub use pps::PpsControl;
pub use signal::{PinState, SignalBank, SignalDef};
